use {
	crate::{Error, Implementation, Platform, Result, mount::find_helper},
	std::{
		ffi::OsString,
		os::fd::RawFd,
		path::{Component, Path},
		process::Stdio,
	},
};

/// Unmount the file system mounted at `path`.
///
/// A mount point of the form `/dev/fd/N` was mounted by a parent process that handed over an open `/dev/fuse` descriptor. It is left alone and [`Error::ExternallyManagedMountPoint`] is returned.
pub async fn unmount(path: &Path) -> Result<()> {
	unmount_with_platform(path, Platform::host()).await
}

/// Unmount with an explicit platform.
pub async fn unmount_with_platform(path: &Path, platform: Platform) -> Result<()> {
	if is_externally_managed(path) {
		tracing::debug!(?path, "skipping an externally managed mount point");
		return Err(Error::ExternallyManagedMountPoint);
	}
	let (program, args) = command(platform, path);
	tracing::debug!(?program, ?args, "unmounting");
	run(&program, &args)
		.await
		.map_err(|source| Error::Unmount {
			path: path.to_owned(),
			source,
		})
		.inspect_err(|error| tracing::error!(%error, "failed to unmount"))
}

/// Check whether `path` has the form `/dev/fd/N`. Only the shape of `N` matters, so a number too large for a descriptor still counts.
#[must_use]
pub fn is_externally_managed(path: &Path) -> bool {
	external_fd_component(path).is_some()
}

/// Get the descriptor of an externally managed mount point, if `path` names one that fits in a [`RawFd`].
#[must_use]
pub fn external_fd(path: &Path) -> Option<RawFd> {
	external_fd_component(path)?.parse().ok()
}

fn external_fd_component(path: &Path) -> Option<&str> {
	let mut components = path.components();
	let (
		Some(Component::RootDir),
		Some(Component::Normal(dev)),
		Some(Component::Normal(fd)),
		Some(Component::Normal(n)),
		None,
	) = (
		components.next(),
		components.next(),
		components.next(),
		components.next(),
		components.next(),
	)
	else {
		return None;
	};
	if dev != "dev" || fd != "fd" {
		return None;
	}
	let n = n.to_str()?;
	if n.is_empty() || !n.bytes().all(|byte| byte.is_ascii_digit()) {
		return None;
	}
	Some(n)
}

/// Get the program and arguments that unmount `path` on a platform.
#[must_use]
pub fn command(platform: Platform, path: &Path) -> (OsString, Vec<OsString>) {
	if platform.is_linux()
		&& let Some(helper) = find_helper(platform, Implementation::default())
	{
		return (helper, vec!["-u".into(), path.as_os_str().to_owned()]);
	}
	("umount".into(), vec![path.as_os_str().to_owned()])
}

async fn run(program: &OsString, args: &[OsString]) -> std::io::Result<()> {
	let output = tokio::process::Command::new(program)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::piped())
		.output()
		.await?;
	if !output.status.success() {
		let program = program.to_string_lossy();
		let status = output.status;
		let stderr = String::from_utf8_lossy(&output.stderr);
		let stderr = stderr.trim();
		let message = if stderr.is_empty() {
			format!("{program} exited with {status}")
		} else {
			format!("{program} exited with {status}: {stderr}")
		};
		return Err(std::io::Error::other(message));
	}
	Ok(())
}
