use mountkit_mount as mount;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
	/// The mount configuration that command line flags are applied on top of.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mount: Option<mount::Config>,

	/// The platform whose conventions to use. Defaults to the host.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platform: Option<mount::Platform>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tracing: Option<Tracing>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tracing {
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub filter: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<TracingFormat>,
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingFormat {
	#[default]
	Compact,
	Json,
	Pretty,
}
