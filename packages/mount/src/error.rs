use std::path::PathBuf;

/// A result alias that defaults to `Error` as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum Error {
	/// The mount point was not created by this process, so it was not unmounted. Callers should treat this as a skip.
	#[display("externally managed mount point, skipping unmount")]
	ExternallyManagedMountPoint,

	#[display("failed to unmount {}", path.display())]
	Unmount {
		path: PathBuf,
		source: std::io::Error,
	},
}

impl Error {
	#[must_use]
	pub fn is_externally_managed(&self) -> bool {
		matches!(self, Self::ExternallyManagedMountPoint)
	}
}
