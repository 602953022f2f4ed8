use {
	crate::{Cli, error::Result},
	mountkit_mount as mount,
	std::path::PathBuf,
};

/// Unmount a file system.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	/// The mount point.
	#[arg(index = 1)]
	pub path: PathBuf,

	/// The platform whose unmount helper to use.
	#[arg(long)]
	pub platform: Option<mount::Platform>,
}

impl Cli {
	pub async fn command_unmount(&self, args: Args) -> Result<()> {
		let platform = self.platform(args.platform);
		match mount::unmount::unmount_with_platform(&args.path, platform).await {
			Ok(()) => {
				tracing::info!(path = %args.path.display(), "unmounted");
				Ok(())
			},
			Err(mount::Error::ExternallyManagedMountPoint) => {
				Cli::print_warning_message(&format!(
					"{} is externally managed, skipping unmount",
					args.path.display()
				));
				Ok(())
			},
			Err(source) => Err(crate::error!(
				!source,
				%path = args.path.display(),
				"the unmount command failed"
			)),
		}
	}
}
