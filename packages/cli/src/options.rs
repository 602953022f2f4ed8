use {
	crate::{Cli, error::Result},
	mountkit_mount as mount,
	std::path::PathBuf,
};

/// Print the options string for a mount.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	#[command(flatten)]
	pub mount: Mount,

	/// Print the mount helper invocation for this mount point instead.
	#[arg(long)]
	pub path: Option<PathBuf>,
}

/// Flags that are applied on top of the config's mount configuration.
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Mount {
	/// The platform whose conventions to use.
	#[arg(long)]
	pub platform: Option<mount::Platform>,

	/// The name of the file system.
	#[arg(long)]
	pub fs_name: Option<String>,

	/// The file system subtype.
	#[arg(long)]
	pub subtype: Option<String>,

	/// Mount read only.
	#[arg(long)]
	pub read_only: bool,

	/// The volume name on Darwin.
	#[arg(long)]
	pub volume_name: Option<String>,

	/// The FUSE implementation on Darwin.
	#[arg(long)]
	pub implementation: Option<mount::Implementation>,

	#[arg(long)]
	pub disable_default_permissions: bool,

	#[arg(long)]
	pub disable_writeback_caching: bool,

	#[arg(long)]
	pub enable_vnode_caching: bool,

	#[arg(long)]
	pub enable_symlink_caching: bool,

	#[arg(long)]
	pub enable_no_open_support: bool,

	#[arg(long)]
	pub enable_no_opendir_support: bool,

	#[arg(long)]
	pub enable_async_reads: bool,

	#[arg(long)]
	pub enable_parallel_dir_ops: bool,

	#[arg(long)]
	pub enable_atomic_trunc: bool,

	#[arg(long)]
	pub enable_readdirplus: bool,

	#[arg(long)]
	pub enable_auto_readdirplus: bool,

	/// Pass an option to the mount helper unchanged, as `key` or `key=value`.
	#[arg(
		action = clap::ArgAction::Append,
		long = "option",
		num_args = 1,
		short = 'o',
		value_parser = parse_option,
	)]
	pub options: Vec<(String, String)>,
}

impl Cli {
	pub async fn command_options(&self, args: Args) -> Result<()> {
		let (config, platform) = self.mount_config(args.mount);
		let options = mount::Options::new(&config, platform);
		tracing::debug!(%platform, count = options.len(), "built the options");

		// Print the options.
		let Some(path) = args.path else {
			println!("{options}");
			return Ok(());
		};

		// Print the helper invocation.
		let Some(helper) = mount::mount::find_helper(platform, config.implementation) else {
			return Err(crate::error!(%platform, "failed to find a mount helper"));
		};
		let mut line = helper.to_string_lossy().into_owned();
		for arg in mount::mount::helper_args(&options, &path) {
			line.push(' ');
			line.push_str(&arg.to_string_lossy());
		}
		println!("{line}");

		Ok(())
	}

	/// Get the mount configuration and platform from the config and the args.
	pub fn mount_config(&self, args: Mount) -> (mount::Config, mount::Platform) {
		let mut config = self
			.config
			.as_ref()
			.and_then(|config| config.mount.clone())
			.unwrap_or_default();
		let platform = self.platform(args.platform);
		args.apply(&mut config);
		(config, platform)
	}
}

impl Mount {
	pub fn apply(self, config: &mut mount::Config) {
		if let Some(fs_name) = self.fs_name {
			config.fs_name = fs_name;
		}
		if let Some(subtype) = self.subtype {
			config.subtype = subtype;
		}
		if let Some(volume_name) = self.volume_name {
			config.volume_name = volume_name;
		}
		if let Some(implementation) = self.implementation {
			config.implementation = implementation;
		}
		config.read_only |= self.read_only;
		config.disable_default_permissions |= self.disable_default_permissions;
		config.disable_writeback_caching |= self.disable_writeback_caching;
		config.enable_vnode_caching |= self.enable_vnode_caching;
		config.enable_symlink_caching |= self.enable_symlink_caching;
		config.enable_no_open_support |= self.enable_no_open_support;
		config.enable_no_opendir_support |= self.enable_no_opendir_support;
		config.enable_async_reads |= self.enable_async_reads;
		config.enable_parallel_dir_ops |= self.enable_parallel_dir_ops;
		config.enable_atomic_trunc |= self.enable_atomic_trunc;
		config.enable_readdirplus |= self.enable_readdirplus;
		config.enable_auto_readdirplus |= self.enable_auto_readdirplus;
		config.options.extend(self.options);
	}
}

fn parse_option(arg: &str) -> Result<(String, String), String> {
	if arg.is_empty() {
		return Err("expected key or key=value".to_owned());
	}
	let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
	Ok((key.to_owned(), value.to_owned()))
}
