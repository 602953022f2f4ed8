use {
	anstream::eprintln,
	crossterm::style::Stylize as _,
	std::{collections::BTreeMap, sync::Arc},
};

/// A result alias that defaults to `Error` as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error.
#[derive(Clone, Debug, derive_more::Display)]
#[display("{message}")]
pub struct Error {
	/// The error's message.
	pub message: String,

	/// The error's source.
	pub source: Option<Arc<Error>>,

	/// Values associated with the error.
	pub values: BTreeMap<String, String>,
}

pub struct Trace<'a>(&'a Error);

impl Error {
	#[must_use]
	pub fn trace(&self) -> Trace<'_> {
		Trace(self)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
	}
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for Error {
	fn from(value: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
		match value.downcast::<Error>() {
			Ok(error) => *error,
			Err(error) => Self {
				message: error.to_string(),
				source: error.source().map(Into::into).map(Arc::new),
				values: BTreeMap::new(),
			},
		}
	}
}

impl From<&(dyn std::error::Error + 'static)> for Error {
	fn from(value: &(dyn std::error::Error + 'static)) -> Self {
		Self {
			message: value.to_string(),
			source: value.source().map(Into::into).map(Arc::new),
			values: BTreeMap::new(),
		}
	}
}

impl std::fmt::Display for Trace<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut error = Some(self.0);
		while let Some(current) = error {
			writeln!(f, "-> {}", current.message)?;
			for (name, value) in &current.values {
				writeln!(f, "   {name} = {value}")?;
			}
			error = current.source.as_deref();
		}
		Ok(())
	}
}

/// Print an error's trace to stderr.
pub fn print(error: &Error) {
	let mut error = Some(error);
	while let Some(current) = error {
		eprintln!("{} {}", "->".red(), current.message);
		for (name, value) in &current.values {
			let name = name.as_str().blue();
			let value = value.as_str().green();
			eprintln!("   {name} = {value}");
		}
		error = current.source.as_deref();
	}
}

/// Generate an [Error].
///
/// Usage:
/// ```rust
/// error!("error message");
/// error!("error message with interpolation {}", 42);
///
/// let name = "value";
/// error!(%name, "error message with a named value (pretty printed)");
/// error!(?name, "error message with a named value (debug printed)");
///
/// let error = std::io::Error::last_os_error();
/// error!(!error, "an error that wraps an existing error");
/// ```
#[macro_export]
macro_rules! error {
	({ $error:ident }, %$name:ident, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), $name.to_string());
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, ?$name:ident, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), format!("{:?}", $name));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, %$name:ident = $value:expr, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), $value.to_string());
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, ?$name:ident = $value:expr, $($arg:tt)*) => {
		$error.values.insert(stringify!($name).to_owned(), format!("{:?}", $value));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, !$source:expr, $($arg:tt)*) => {
		$error.source.replace(std::sync::Arc::new({
			let source: Box<dyn std::error::Error + Send + Sync + 'static> = Box::new($source);
			source.into()
		}));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, source = $source:expr, $($arg:tt)*) => {
		$error.source.replace(std::sync::Arc::new({
			let source: Box<dyn std::error::Error + Send + Sync + 'static> = Box::new($source);
			source.into()
		}));
		$crate::error!({ $error }, $($arg)*)
	};
	({ $error:ident }, $($arg:tt)*) => {
		$error.message = format!($($arg)*);
	};
	($($arg:tt)*) => {{
		let mut __error = $crate::error::Error {
			message: String::new(),
			source: None,
			values: std::collections::BTreeMap::new(),
		};
		$crate::error!({ __error }, $($arg)*);
		__error
	}};
}
