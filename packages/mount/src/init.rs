use crate::{Config, Platform};

/// The capability flags exchanged in the kernel's init handshake.
#[derive(
	Clone,
	Copy,
	Debug,
	Default,
	Eq,
	PartialEq,
	derive_more::BitAnd,
	derive_more::BitOr,
	derive_more::BitOrAssign,
	derive_more::LowerHex,
)]
pub struct InitFlags(pub u32);

/// The maximum number of pages per request, sent along with [`InitFlags::MAX_PAGES`].
pub const MAX_PAGES_VALUE: u16 = 256;

impl InitFlags {
	pub const ASYNC_READ: Self = Self(1 << 0);
	pub const ATOMIC_O_TRUNC: Self = Self(1 << 3);
	pub const BIG_WRITES: Self = Self(1 << 5);
	pub const DO_READDIRPLUS: Self = Self(1 << 13);
	pub const READDIRPLUS_AUTO: Self = Self(1 << 14);
	pub const WRITEBACK_CACHE: Self = Self(1 << 16);
	pub const NO_OPEN_SUPPORT: Self = Self(1 << 17);
	pub const PARALLEL_DIROPS: Self = Self(1 << 18);
	pub const MAX_PAGES: Self = Self(1 << 22);
	pub const CACHE_SYMLINKS: Self = Self(1 << 23);
	pub const NO_OPENDIR_SUPPORT: Self = Self(1 << 24);

	const NAMES: [(Self, &'static str); 11] = [
		(Self::ASYNC_READ, "async_read"),
		(Self::ATOMIC_O_TRUNC, "atomic_o_trunc"),
		(Self::BIG_WRITES, "big_writes"),
		(Self::DO_READDIRPLUS, "do_readdirplus"),
		(Self::READDIRPLUS_AUTO, "readdirplus_auto"),
		(Self::WRITEBACK_CACHE, "writeback_cache"),
		(Self::NO_OPEN_SUPPORT, "no_open_support"),
		(Self::PARALLEL_DIROPS, "parallel_dirops"),
		(Self::MAX_PAGES, "max_pages"),
		(Self::CACHE_SYMLINKS, "cache_symlinks"),
		(Self::NO_OPENDIR_SUPPORT, "no_opendir_support"),
	];

	#[must_use]
	pub fn empty() -> Self {
		Self(0)
	}

	#[must_use]
	pub fn bits(self) -> u32 {
		self.0
	}

	#[must_use]
	pub fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	#[must_use]
	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Get the names of the known flags that are set.
	pub fn names(self) -> impl Iterator<Item = &'static str> {
		Self::NAMES
			.into_iter()
			.filter(move |(flag, _)| self.contains(*flag))
			.map(|(_, name)| name)
	}

	/// Keep only the requested flags that the kernel offered.
	#[must_use]
	pub fn negotiate(requested: Self, offered: Self) -> Self {
		let negotiated = requested & offered;
		let dropped = Self(requested.0 & !offered.0);
		if !dropped.is_empty() {
			let dropped = dropped.names().collect::<Vec<_>>();
			tracing::debug!(?dropped, "the kernel did not offer the requested init flags");
		}
		negotiated
	}
}

impl Config {
	/// Get the init flags this config requests from the kernel.
	#[must_use]
	pub fn init_flags(&self, platform: Platform) -> InitFlags {
		// Do not use small writes, and allow more pages per request.
		let mut flags = InitFlags::BIG_WRITES | InitFlags::MAX_PAGES;

		if self.enable_async_reads {
			flags |= InitFlags::ASYNC_READ;
		}

		// Darwin never does writeback caching.
		if platform.is_linux() && !self.disable_writeback_caching {
			flags |= InitFlags::WRITEBACK_CACHE;
		}

		if self.enable_symlink_caching {
			flags |= InitFlags::CACHE_SYMLINKS;
		}
		if self.enable_no_open_support {
			flags |= InitFlags::NO_OPEN_SUPPORT;
		}
		if self.enable_no_opendir_support {
			flags |= InitFlags::NO_OPENDIR_SUPPORT;
		}
		if self.enable_parallel_dir_ops {
			flags |= InitFlags::PARALLEL_DIROPS;
		}
		if self.enable_atomic_trunc {
			flags |= InitFlags::ATOMIC_O_TRUNC;
		}

		if self.enable_readdirplus {
			flags |= InitFlags::DO_READDIRPLUS;
			if self.enable_auto_readdirplus {
				flags |= InitFlags::READDIRPLUS_AUTO;
			}
		}

		flags
	}
}

#[cfg(test)]
mod tests {
	use {
		super::InitFlags,
		crate::{Config, Platform},
		pretty_assertions::assert_eq,
	};

	#[test]
	fn defaults() {
		let config = Config::default();
		assert_eq!(
			config.init_flags(Platform::Linux),
			InitFlags::BIG_WRITES | InitFlags::MAX_PAGES | InitFlags::WRITEBACK_CACHE
		);
		assert_eq!(
			config.init_flags(Platform::Darwin),
			InitFlags::BIG_WRITES | InitFlags::MAX_PAGES
		);
	}

	#[test]
	fn writeback_caching() {
		let config = Config {
			disable_writeback_caching: true,
			..Default::default()
		};
		let flags = config.init_flags(Platform::Linux);
		assert!(!flags.contains(InitFlags::WRITEBACK_CACHE));
	}

	#[test]
	fn readdirplus() {
		let config = Config {
			enable_auto_readdirplus: true,
			..Default::default()
		};
		let flags = config.init_flags(Platform::Linux);
		assert!(!flags.contains(InitFlags::DO_READDIRPLUS));
		assert!(!flags.contains(InitFlags::READDIRPLUS_AUTO));

		let config = Config {
			enable_readdirplus: true,
			..Default::default()
		};
		let flags = config.init_flags(Platform::Linux);
		assert!(flags.contains(InitFlags::DO_READDIRPLUS));
		assert!(!flags.contains(InitFlags::READDIRPLUS_AUTO));

		let config = Config {
			enable_readdirplus: true,
			enable_auto_readdirplus: true,
			..Default::default()
		};
		let flags = config.init_flags(Platform::Linux);
		assert!(flags.contains(InitFlags::DO_READDIRPLUS | InitFlags::READDIRPLUS_AUTO));
	}

	#[test]
	fn toggles() {
		let config = Config {
			enable_async_reads: true,
			enable_symlink_caching: true,
			enable_no_open_support: true,
			enable_no_opendir_support: true,
			enable_parallel_dir_ops: true,
			enable_atomic_trunc: true,
			..Default::default()
		};
		let flags = config.init_flags(Platform::Linux);
		let names = flags.names().collect::<Vec<_>>();
		assert_eq!(
			names,
			[
				"async_read",
				"atomic_o_trunc",
				"big_writes",
				"writeback_cache",
				"no_open_support",
				"parallel_dirops",
				"max_pages",
				"cache_symlinks",
				"no_opendir_support",
			]
		);
	}

	#[test]
	fn vectored_read() {
		let config = Config {
			use_vectored_read: true,
			..Default::default()
		};
		for platform in [Platform::Linux, Platform::Darwin, Platform::Other] {
			assert_eq!(
				config.init_flags(platform),
				Config::default().init_flags(platform)
			);
			assert_eq!(
				config.to_options_string(platform),
				Config::default().to_options_string(platform)
			);
		}
	}

	#[test]
	fn negotiate() {
		let requested =
			InitFlags::BIG_WRITES | InitFlags::WRITEBACK_CACHE | InitFlags::CACHE_SYMLINKS;
		let offered = InitFlags::BIG_WRITES | InitFlags::CACHE_SYMLINKS | InitFlags::ASYNC_READ;
		let negotiated = InitFlags::negotiate(requested, offered);
		assert_eq!(negotiated, InitFlags::BIG_WRITES | InitFlags::CACHE_SYMLINKS);
		assert_eq!(format!("{negotiated:x}"), "800020");
	}
}
