use {
	crate::{Cli, error::Result, options::Mount},
	mountkit_mount as mount,
};

/// Print the init flags a mount requests from the kernel.
#[derive(Clone, Debug, clap::Args)]
#[group(skip)]
pub struct Args {
	#[command(flatten)]
	pub mount: Mount,

	/// Keep only the flags the kernel offered, given in hex or decimal.
	#[arg(long, value_parser = parse_flags)]
	pub offered: Option<mount::InitFlags>,
}

impl Cli {
	pub async fn command_init_flags(&self, args: Args) -> Result<()> {
		let (config, platform) = self.mount_config(args.mount);
		let mut flags = config.init_flags(platform);
		if let Some(offered) = args.offered {
			flags = mount::InitFlags::negotiate(flags, offered);
		}
		println!("{flags:#010x}");
		for name in flags.names() {
			if name == "max_pages" {
				println!("{name} = {}", mount::init::MAX_PAGES_VALUE);
			} else {
				println!("{name}");
			}
		}
		Ok(())
	}
}

fn parse_flags(arg: &str) -> Result<mount::InitFlags, String> {
	let bits = if let Some(hex) = arg.strip_prefix("0x") {
		u32::from_str_radix(hex, 16)
	} else {
		arg.parse()
	};
	bits.map(mount::InitFlags)
		.map_err(|error| format!("invalid flags {arg:?}: {error}"))
}

#[cfg(test)]
mod tests {
	use {super::parse_flags, mountkit_mount as mount, pretty_assertions::assert_eq};

	#[test]
	fn flags() {
		assert_eq!(
			parse_flags("0x20").unwrap(),
			mount::InitFlags::BIG_WRITES
		);
		assert_eq!(parse_flags("32").unwrap(), mount::InitFlags::BIG_WRITES);
		assert!(parse_flags("0xzz").is_err());
		assert!(parse_flags("flags").is_err());
	}
}
