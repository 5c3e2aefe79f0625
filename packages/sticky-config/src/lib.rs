mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Notes, Postgres, Security, Service, Storage};

use std::{env, fs, path::Path};

/// Environment variables that override `storage.postgres.dsn`, in priority order.
pub const DSN_ENV_OVERRIDES: [&str; 2] = ["POSTGRES_URL", "DATABASE_URL"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env_overrides(&mut cfg, |key| env::var(key).ok());
	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	let dsn = DSN_ENV_OVERRIDES
		.iter()
		.filter_map(|key| lookup(key))
		.find(|value| !value.trim().is_empty());

	if let Some(dsn) = dsn {
		cfg.storage.postgres.dsn = dsn.trim().to_string();
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if let Some(root_path) = cfg.service.root_path.as_deref()
		&& !root_path.starts_with('/')
	{
		return Err(Error::Validation {
			message: "service.root_path must start with '/'.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.notes.default_page_size <= 0 {
		return Err(Error::Validation {
			message: "notes.default_page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.notes.max_page_size < cfg.notes.default_page_size {
		return Err(Error::Validation {
			message: "notes.max_page_size must be at least notes.default_page_size.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.root_path = cfg
		.service
		.root_path
		.as_deref()
		.map(|path| path.trim().trim_end_matches('/'))
		.filter(|path| !path.is_empty())
		.map(str::to_string);
}
