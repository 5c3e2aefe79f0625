use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub notes: Notes,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Optional. Prefix every route is nested under, e.g. "/api" behind a path-routing proxy.
	pub root_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Notes {
	/// Page size used when a list request carries no `limit`.
	pub default_page_size: i64,
	/// Upper bound a requested `limit` is clamped to.
	pub max_page_size: i64,
}
impl Default for Notes {
	fn default() -> Self {
		Self { default_page_size: 100, max_page_size: 500 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}
