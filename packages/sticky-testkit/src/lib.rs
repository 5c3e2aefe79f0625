//! Disposable Postgres databases for the Postgres-backed tests.
//!
//! `STICKY_PG_DSN` names a server the tests may create databases on. Each [`TestDatabase`] lives
//! on that server under a random name and is dropped by [`TestDatabase::cleanup`], or on drop.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

const MAINTENANCE_DATABASES: [&str; 2] = ["postgres", "template1"];

pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)?;
		let (maintenance, mut conn) = connect_maintenance(&base).await?;
		let name = format!("sticky_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;
		conn.close().await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		// The test runtime may still be on this thread and cannot be blocked on.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &maintenance)));

			if let Err(err) = result {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});

		let _ = handle.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var("STICKY_PG_DSN").ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn connect_maintenance(
	base: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failures = Vec::new();

	for database in MAINTENANCE_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("No maintenance database reachable ({}).", failures.join("; "))))
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str()).await?;
	conn.close().await?;

	Ok(())
}
