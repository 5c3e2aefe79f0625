use std::sync::Arc;

use sticky_service::StickyService;
use sticky_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<StickyService>,
}
impl AppState {
	pub async fn new(config: sticky_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = StickyService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
