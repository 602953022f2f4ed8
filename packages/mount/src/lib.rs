pub use self::{
	config::{Config, Implementation},
	error::{Error, Result},
	init::InitFlags,
	options::Options,
};

pub mod config;
pub mod error;
pub mod init;
pub mod mount;
pub mod options;
pub mod unmount;

/// The name used for `fsname` on Linux when the config does not provide one. Some init systems unmount file systems that mount without an explicit name.
pub const FALLBACK_FS_NAME: &str = "some_fuse_file_system";

/// A platform whose mount conventions the option builder knows about.
#[derive(
	Clone,
	Copy,
	Debug,
	Default,
	Eq,
	PartialEq,
	derive_more::Display,
	serde::Deserialize,
	serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
	#[default]
	#[display("linux")]
	Linux,

	#[display("darwin")]
	Darwin,

	#[display("other")]
	Other,
}

impl Platform {
	/// Get the platform this process was compiled for.
	#[must_use]
	pub fn host() -> Self {
		if cfg!(target_os = "linux") {
			Self::Linux
		} else if cfg!(target_os = "macos") {
			Self::Darwin
		} else {
			Self::Other
		}
	}

	#[must_use]
	pub fn is_linux(self) -> bool {
		matches!(self, Self::Linux)
	}

	#[must_use]
	pub fn is_darwin(self) -> bool {
		matches!(self, Self::Darwin)
	}
}

impl std::str::FromStr for Platform {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"linux" => Ok(Self::Linux),
			"darwin" | "macos" => Ok(Self::Darwin),
			"other" => Ok(Self::Other),
			_ => Err(format!("invalid platform {s:?}")),
		}
	}
}
