use {
	self::{
		config::{Config, TracingFormat},
		error::Result,
	},
	anstream::eprintln,
	clap::Parser as _,
	crossterm::style::Stylize as _,
	mountkit_mount as mount,
	std::path::PathBuf,
	tracing_subscriber::prelude::*,
};

mod config;
mod error;
mod init;
mod options;
mod unmount;

const DEFAULT_TRACING_FILTER: &str = "mountkit_cli=info,mountkit_mount=info";

pub struct Cli {
	config: Option<Config>,
}

#[derive(Clone, Debug, clap::Parser)]
#[command(
	about = "Build FUSE mount option strings and unmount file systems.",
	arg_required_else_help = true,
	disable_help_subcommand = true,
	name = "mountkit",
	version
)]
struct Args {
	#[command(subcommand)]
	command: Command,

	/// The path to the config file.
	#[arg(env = "MOUNTKIT_CONFIG", long, short)]
	config: Option<PathBuf>,

	/// Override the tracing filter.
	#[arg(env = "MOUNTKIT_TRACING", long)]
	tracing: Option<String>,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
	InitFlags(self::init::Args),

	#[command(alias = "o")]
	Options(self::options::Args),

	#[command(alias = "umount")]
	Unmount(self::unmount::Args),
}

fn main() -> std::process::ExitCode {
	Cli::main()
}

impl Cli {
	fn main() -> std::process::ExitCode {
		// Parse the args.
		let args = Args::parse();

		// Read the config.
		let config = match Cli::read_config(args.config.clone()) {
			Ok(config) => config,
			Err(error) => {
				Cli::print_error_message("failed to run the command");
				self::error::print(&error);
				return std::process::ExitCode::FAILURE;
			},
		};

		// Initialize tracing.
		Cli::initialize_tracing(config.as_ref(), args.tracing.as_deref());

		// Create the tokio runtime.
		let runtime = match tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()
		{
			Ok(runtime) => runtime,
			Err(source) => {
				let error = crate::error!(!source, "failed to create the tokio runtime");
				Cli::print_error_message("failed to run the command");
				self::error::print(&error);
				return std::process::ExitCode::FAILURE;
			},
		};

		// Run the command.
		let cli = Cli { config };
		match runtime.block_on(cli.command(args.command)) {
			Ok(()) => std::process::ExitCode::SUCCESS,
			Err(error) => {
				tracing::debug!(trace = %error.trace(), "the command failed");
				Cli::print_error_message("failed to run the command");
				self::error::print(&error);
				std::process::ExitCode::FAILURE
			},
		}
	}

	async fn command(&self, command: Command) -> Result<()> {
		match command {
			Command::InitFlags(args) => self.command_init_flags(args).await,
			Command::Options(args) => self.command_options(args).await,
			Command::Unmount(args) => self.command_unmount(args).await,
		}
	}

	/// Get the platform, preferring the args, then the config, then the host.
	fn platform(&self, platform: Option<mount::Platform>) -> mount::Platform {
		platform
			.or_else(|| self.config.as_ref().and_then(|config| config.platform))
			.unwrap_or_else(mount::Platform::host)
	}

	fn read_config(path: Option<PathBuf>) -> Result<Option<Config>> {
		let path = match path {
			Some(path) => path,
			None => {
				let Some(home) = std::env::var_os("HOME") else {
					return Ok(None);
				};
				PathBuf::from(home).join(".config/mountkit/config.json")
			},
		};
		let config = match std::fs::read_to_string(&path) {
			Ok(config) => config,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(source) => {
				return Err(
					crate::error!(!source, %path = path.display(), "failed to read the config file"),
				);
			},
		};
		let config = serde_json::from_str(&config).map_err(
			|source| crate::error!(!source, %path = path.display(), "failed to deserialize the config"),
		)?;
		Ok(Some(config))
	}

	fn initialize_tracing(config: Option<&Config>, filter: Option<&str>) {
		let default = config::Tracing {
			filter: DEFAULT_TRACING_FILTER.to_owned(),
			format: Some(TracingFormat::Compact),
		};
		let tracing = config
			.and_then(|config| config.tracing.as_ref())
			.unwrap_or(&default);
		let filter = filter.unwrap_or(tracing.filter.as_str());
		let filter =
			tracing_subscriber::filter::EnvFilter::try_new(filter).unwrap_or_else(|error| {
				Cli::print_warning_message(&format!("invalid tracing filter: {error}"));
				tracing_subscriber::filter::EnvFilter::new(DEFAULT_TRACING_FILTER)
			});
		let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
		let layer = match tracing.format.unwrap_or_default() {
			TracingFormat::Compact => layer.compact().boxed(),
			TracingFormat::Json => layer.json().boxed(),
			TracingFormat::Pretty => layer.pretty().boxed(),
		};
		tracing_subscriber::registry()
			.with(layer.with_filter(filter))
			.init();
	}

	fn print_warning_message(string: &str) {
		eprintln!("{} {string}", "warning".yellow().bold());
	}

	fn print_error_message(string: &str) {
		eprintln!("{} {string}", "error".red().bold());
	}
}
