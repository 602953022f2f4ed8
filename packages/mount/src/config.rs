use {crate::Platform, std::collections::BTreeMap};

/// A mount's configuration.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
	/// The name of the file system as displayed by e.g. `mount`. The `umount` command requires root privileges if this does not agree with `/etc/fstab`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub fs_name: String,

	/// Mount the file system read only. Opening a file for writing and metadata operations such as chmod will fail.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub read_only: bool,

	/// Linux only. Disable the kernel's writeback caching, so that each write is forwarded to the file system before the caller's syscall returns. Darwin always behaves as if this is set.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub disable_writeback_caching: bool,

	/// Darwin only. Restore the kernel's entry caching, which is disabled with `novncache` by default. The kernel ignores entry expiration on this platform and may cache entries forever.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_vnode_caching: bool,

	/// Linux only. Cache symlink targets in the page cache. The size in a symlink's attributes caps its target once this is enabled.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_symlink_caching: bool,

	/// Linux only. Treat `ENOSYS` from open as not needing open calls at all.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_no_open_support: bool,

	/// Linux only. Treat `ENOSYS` from opendir as not needing opendir calls at all.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_no_opendir_support: bool,

	/// Disable in-kernel permission checks, leaving them entirely to the file system.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub disable_default_permissions: bool,

	/// Return read data as a list of slices instead of copying into a buffer. This is read by the server that answers kernel requests, not by anything in this crate, and has no effect on the mount options or init flags.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub use_vectored_read: bool,

	/// Darwin only. The name of the volume shown in the Finder.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub volume_name: String,

	/// Darwin only. The FUSE implementation to use.
	pub implementation: Implementation,

	/// Additional options passed unchanged to the mount helper. These take precedence over every option derived from the other fields.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub options: BTreeMap<String, String>,

	/// The file system type shown as `fuse.<subtype>` in `/proc/mounts`.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub subtype: String,

	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_async_reads: bool,

	/// Allow parallel lookup and readdir requests.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_parallel_dir_ops: bool,

	/// Send `O_TRUNC` with open requests instead of a separate setattr that truncates to zero.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_atomic_trunc: bool,

	/// Answer readdir with entries and their attributes, saving a lookup per entry.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_readdirplus: bool,

	/// Let the kernel choose between readdirplus and readdir. Only effective with `enable_readdirplus`.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub enable_auto_readdirplus: bool,
}

/// A FUSE implementation on Darwin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
	#[default]
	FuseT,
	MacFuse,
}

impl Config {
	/// Create the options string to pass to the mount helper.
	#[must_use]
	pub fn to_options_string(&self, platform: Platform) -> String {
		crate::Options::new(self, platform).to_string()
	}
}

impl std::str::FromStr for Implementation {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"fuse_t" | "fuse-t" => Ok(Self::FuseT),
			"macfuse" | "mac_fuse" => Ok(Self::MacFuse),
			_ => Err(format!("invalid implementation {s:?}")),
		}
	}
}

#[cfg(test)]
mod tests {
	use {
		super::{Config, Implementation},
		pretty_assertions::assert_eq,
	};

	#[test]
	fn deserialize_empty() {
		let config: Config = serde_json::from_str("{}").unwrap();
		assert!(!config.read_only);
		assert!(config.fs_name.is_empty());
		assert!(config.options.is_empty());
		assert_eq!(config.implementation, Implementation::FuseT);
	}

	#[test]
	fn deserialize() {
		let config: Config = serde_json::from_str(
			r#"{
				"fs_name": "data",
				"read_only": true,
				"implementation": "mac_fuse",
				"options": { "allow_other": "" }
			}"#,
		)
		.unwrap();
		assert_eq!(config.fs_name, "data");
		assert!(config.read_only);
		assert_eq!(config.implementation, Implementation::MacFuse);
		assert_eq!(config.options.get("allow_other").map(String::as_str), Some(""));
	}

	#[test]
	fn serialize_skips_defaults() {
		let config = Config {
			read_only: true,
			..Default::default()
		};
		let json = serde_json::to_string(&config).unwrap();
		assert_eq!(json, r#"{"read_only":true,"implementation":"fuse_t"}"#);
	}
}
