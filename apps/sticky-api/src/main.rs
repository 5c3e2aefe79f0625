use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sticky_api::Args::parse();

	sticky_api::run(args).await
}
