use {
	crate::{Implementation, Options, Platform},
	std::{
		ffi::{OsStr, OsString},
		os::fd::RawFd,
		path::Path,
	},
};

const FUSERMOUNT: [&str; 2] = ["fusermount3", "fusermount"];

const MACFUSE: [&str; 2] = [
	"/Library/Filesystems/macfuse.fs/Contents/Resources/mount_macfuse",
	"/Library/Filesystems/osxfuse.fs/Contents/Resources/mount_osxfuse",
];

const FUSE_T: [&str; 2] = [
	"/usr/local/bin/go-nfsv4",
	"/Library/Application Support/fuse-t/bin/go-nfsv4",
];

/// Get the mount helpers to try, in order.
#[must_use]
pub fn helper_candidates(
	platform: Platform,
	implementation: Implementation,
) -> &'static [&'static str] {
	match (platform, implementation) {
		(Platform::Linux, _) => &FUSERMOUNT,
		(Platform::Darwin, Implementation::MacFuse) => &MACFUSE,
		(Platform::Darwin, Implementation::FuseT) => &FUSE_T,
		(Platform::Other, _) => &[],
	}
}

/// Find the first mount helper that exists, searching `PATH` for bare names.
#[must_use]
pub fn find_helper(platform: Platform, implementation: Implementation) -> Option<OsString> {
	helper_candidates(platform, implementation)
		.iter()
		.find(|candidate| which(OsStr::new(candidate)))
		.map(OsString::from)
}

fn which(program: &OsStr) -> bool {
	let path = Path::new(program);
	if path.is_absolute() {
		return path.is_file();
	}
	let Some(paths) = std::env::var_os("PATH") else {
		return false;
	};
	std::env::split_paths(&paths).any(|directory| directory.join(program).is_file())
}

/// Create the arguments for a mount helper: `-o <options> -- <path>`.
#[must_use]
pub fn helper_args(options: &Options, path: &Path) -> Vec<OsString> {
	vec![
		"-o".into(),
		options.to_string().into(),
		"--".into(),
		path.as_os_str().to_owned(),
	]
}

/// Create the data string for mounting directly with an open `/dev/fuse` descriptor on Linux.
#[must_use]
pub fn direct_mount_data(fd: RawFd, uid: u32, gid: u32, options: &Options) -> String {
	let mut data = format!("fd={fd},rootmode=40000,user_id={uid},group_id={gid}");
	if !options.is_empty() {
		data.push(',');
		data.push_str(&options.to_string());
	}
	data
}

/// Get the flags for mounting directly on Linux.
#[cfg(target_os = "linux")]
#[must_use]
pub fn direct_mount_flags(config: &crate::Config) -> libc::c_ulong {
	let mut flags = libc::MS_NODEV | libc::MS_NOSUID;
	if config.read_only {
		flags |= libc::MS_RDONLY;
	}
	flags
}
