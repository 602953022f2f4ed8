use {
	crate::{Config, FALLBACK_FS_NAME, Platform},
	std::{borrow::Cow, collections::BTreeMap},
};

/// The options passed to a mount helper, keyed by option name. An empty value is a flag with no `=value` suffix.
///
/// Keys are kept sorted, so the rendered string is the same for the same config.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options(BTreeMap<String, String>);

impl Options {
	/// Derive the options for a config on a platform.
	#[must_use]
	pub fn new(config: &Config, platform: Platform) -> Self {
		let mut options = BTreeMap::new();

		// Enable permission checks in the kernel.
		if !config.disable_default_permissions {
			options.insert("default_permissions".to_owned(), String::new());
		}

		// Give the file system a name. Some init systems unmount unnamed file systems on Linux.
		let fs_name = if config.fs_name.is_empty() && platform.is_linux() {
			FALLBACK_FS_NAME
		} else {
			config.fs_name.as_str()
		};
		if !fs_name.is_empty() {
			options.insert("fsname".to_owned(), fs_name.to_owned());
		}

		if !config.subtype.is_empty() {
			options.insert("subtype".to_owned(), config.subtype.clone());
		}

		if config.read_only {
			options.insert("ro".to_owned(), String::new());
		}

		if platform.is_darwin() {
			// The kernel extension ignores entry expiration, so disable entry caching unless asked.
			if !config.enable_vnode_caching {
				options.insert("novncache".to_owned(), String::new());
			}

			if !config.volume_name.is_empty() {
				options.insert("volname".to_owned(), config.volume_name.clone());
			}

			// Do not create `._foo` and `.DS_Store` files.
			options.insert("noappledouble".to_owned(), String::new());
		}

		// The caller's options win.
		for (key, value) in &config.options {
			options.insert(key.clone(), value.clone());
		}

		Self(options)
	}

	/// Parse an options string, unescaping keys. Values are taken as is up to the next unescaped comma.
	#[must_use]
	pub fn parse(string: &str) -> Self {
		let mut options = BTreeMap::new();
		if string.is_empty() {
			return Self(options);
		}
		let mut key = String::new();
		let mut value: Option<String> = None;
		let mut chars = string.chars();
		while let Some(char) = chars.next() {
			match (char, value.as_mut()) {
				(',', _) => {
					options.insert(std::mem::take(&mut key), value.take().unwrap_or_default());
				},
				('\\', None) => {
					key.push(chars.next().unwrap_or('\\'));
				},
				('=', None) => {
					value = Some(String::new());
				},
				(char, None) => {
					key.push(char);
				},
				(char, Some(value)) => {
					value.push(char);
				},
			}
		}
		options.insert(key, value.unwrap_or_default());
		Self(options)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(key.into(), value.into())
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl std::fmt::Display for Options {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut first = true;
		for (key, value) in &self.0 {
			if !first {
				write!(f, ",")?;
			}
			first = false;
			write!(f, "{}", escape_key(key))?;
			if !value.is_empty() {
				write!(f, "={value}")?;
			}
		}
		Ok(())
	}
}

impl From<Options> for BTreeMap<String, String> {
	fn from(value: Options) -> Self {
		value.0
	}
}

/// Escape the characters that are special in an options string. Backslashes are doubled and commas are prefixed with a backslash.
#[must_use]
pub fn escape_key(key: &str) -> Cow<'_, str> {
	if !key.contains(['\\', ',']) {
		return Cow::Borrowed(key);
	}
	Cow::Owned(key.replace('\\', r"\\").replace(',', r"\,"))
}

#[cfg(test)]
mod tests {
	use {
		super::{Options, escape_key},
		crate::{Config, FALLBACK_FS_NAME, Platform},
		pretty_assertions::assert_eq,
	};

	#[test]
	fn linux_defaults() {
		let config = Config {
			read_only: true,
			..Default::default()
		};
		let options = Options::new(&config, Platform::Linux);
		assert_eq!(options.get("fsname"), Some(FALLBACK_FS_NAME));
		assert_eq!(
			options.to_string(),
			"default_permissions,fsname=some_fuse_file_system,ro"
		);
	}

	#[test]
	fn empty_config() {
		let config = Config::default();
		assert_eq!(
			config.to_options_string(Platform::Linux),
			"default_permissions,fsname=some_fuse_file_system"
		);
		assert_eq!(config.to_options_string(Platform::Other), "default_permissions");
		assert_eq!(
			config.to_options_string(Platform::Darwin),
			"default_permissions,noappledouble,novncache"
		);
	}

	#[test]
	fn default_permissions() {
		for platform in [Platform::Linux, Platform::Darwin, Platform::Other] {
			let config = Config::default();
			assert!(Options::new(&config, platform).contains_key("default_permissions"));
			let config = Config {
				disable_default_permissions: true,
				..Default::default()
			};
			assert!(!Options::new(&config, platform).contains_key("default_permissions"));
		}
	}

	#[test]
	fn fs_name() {
		let config = Config {
			fs_name: "data".to_owned(),
			..Default::default()
		};
		for platform in [Platform::Linux, Platform::Darwin, Platform::Other] {
			assert_eq!(Options::new(&config, platform).get("fsname"), Some("data"));
		}

		let config = Config::default();
		assert!(!Options::new(&config, Platform::Darwin).contains_key("fsname"));
		assert!(!Options::new(&config, Platform::Other).contains_key("fsname"));
	}

	#[test]
	fn subtype() {
		let config = Config {
			subtype: "mountkit".to_owned(),
			..Default::default()
		};
		let options = Options::new(&config, Platform::Linux);
		assert_eq!(options.get("subtype"), Some("mountkit"));
		let options = Options::new(&Config::default(), Platform::Linux);
		assert!(!options.contains_key("subtype"));
	}

	#[test]
	fn darwin() {
		let config = Config {
			volume_name: "Data".to_owned(),
			..Default::default()
		};
		let options = Options::new(&config, Platform::Darwin);
		assert_eq!(options.get("novncache"), Some(""));
		assert_eq!(options.get("noappledouble"), Some(""));
		assert_eq!(options.get("volname"), Some("Data"));

		let config = Config {
			enable_vnode_caching: true,
			..Default::default()
		};
		let options = Options::new(&config, Platform::Darwin);
		assert!(!options.contains_key("novncache"));
		assert!(!options.contains_key("volname"));
		assert!(options.contains_key("noappledouble"));
	}

	#[test]
	fn darwin_options_ignored_elsewhere() {
		let config = Config {
			volume_name: "Data".to_owned(),
			..Default::default()
		};
		for platform in [Platform::Linux, Platform::Other] {
			let options = Options::new(&config, platform);
			assert!(!options.contains_key("novncache"));
			assert!(!options.contains_key("noappledouble"));
			assert!(!options.contains_key("volname"));
		}
	}

	#[test]
	fn caller_options_win() {
		let mut config = Config {
			fs_name: "data".to_owned(),
			read_only: true,
			..Default::default()
		};
		config.options.insert("fsname".to_owned(), "other".to_owned());
		config.options.insert("ro".to_owned(), "yes".to_owned());
		config
			.options
			.insert("default_permissions".to_owned(), String::new());
		config.options.insert("allow_other".to_owned(), String::new());
		let string = config.to_options_string(Platform::Linux);
		assert_eq!(string, "allow_other,default_permissions,fsname=other,ro=yes");
	}

	#[test]
	fn empty_caller_value_is_a_flag() {
		let mut config = Config {
			subtype: "mountkit".to_owned(),
			..Default::default()
		};
		config.options.insert("subtype".to_owned(), String::new());
		let string = config.to_options_string(Platform::Other);
		assert_eq!(string, "default_permissions,subtype");
	}

	#[test]
	fn deterministic() {
		let mut config = Config {
			fs_name: "data".to_owned(),
			volume_name: "Data".to_owned(),
			..Default::default()
		};
		config.options.insert("zzz".to_owned(), "1".to_owned());
		config.options.insert("aaa".to_owned(), String::new());
		let left = config.to_options_string(Platform::Darwin);
		let right = config.to_options_string(Platform::Darwin);
		assert_eq!(left, right);
	}

	#[test]
	fn escape() {
		assert_eq!(escape_key("plain"), "plain");
		assert_eq!(escape_key("a,b"), r"a\,b");
		assert_eq!(escape_key(r"a\b"), r"a\\b");
		assert_eq!(escape_key(r"a\,b"), r"a\\\,b");
	}

	#[test]
	fn values_are_not_escaped() {
		let mut config = Config {
			disable_default_permissions: true,
			..Default::default()
		};
		config.options.insert("k".to_owned(), r"a\b".to_owned());
		assert_eq!(config.to_options_string(Platform::Other), r"k=a\b");
	}

	#[test]
	fn escaped_keys_round_trip() {
		let keys = [r"a,b", r"c\d", r"e\,f", r"\", ",", "plain"];
		let mut config = Config {
			disable_default_permissions: true,
			..Default::default()
		};
		for key in keys {
			config.options.insert(key.to_owned(), String::new());
		}
		config.options.insert("x,y".to_owned(), "1".to_owned());
		let string = config.to_options_string(Platform::Other);
		let parsed = Options::parse(&string);
		assert_eq!(parsed, Options::new(&config, Platform::Other));
		let pairs = parsed.iter().collect::<Vec<_>>();
		assert_eq!(pairs.first(), Some(&(",", "")));
		assert!(pairs.contains(&("x,y", "1")));
		assert_eq!(pairs.len(), keys.len() + 1);
	}

	#[test]
	fn insert_after_build() {
		let mut options = Options::new(&Config::default(), Platform::Linux);
		assert_eq!(options.insert("allow_other", ""), None);
		assert_eq!(
			options.insert("fsname", "data"),
			Some(FALLBACK_FS_NAME.to_owned())
		);
		assert_eq!(
			options.to_string(),
			"allow_other,default_permissions,fsname=data"
		);
	}

	#[test]
	fn parse_empty() {
		assert!(Options::parse("").is_empty());
		assert_eq!(Options::new(&Config::default(), Platform::Other).len(), 1);
		assert_eq!(Options::default().to_string(), "");
	}
}
