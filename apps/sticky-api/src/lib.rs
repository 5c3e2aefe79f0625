pub mod cli;
pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = cli::VERSION,
	rename_all = "kebab",
	styles = cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sticky_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if config.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(eyre::eyre!(
			"http_bind must be a loopback address when bind_localhost_only is true."
		));
	}

	let root_path = config.service.root_path.clone();
	let state = AppState::new(config).await?;
	let app = routes::app(state, root_path.as_deref());
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(
		%http_addr,
		root_path = root_path.as_deref().unwrap_or("/"),
		"HTTP server listening."
	);

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &sticky_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
