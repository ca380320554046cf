use std::sync::Arc;

use nodup_service::DedupService;
use nodup_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DedupService>,
}
impl AppState {
	pub fn new(service: DedupService) -> Self {
		Self { service: Arc::new(service) }
	}

	/// Opens the Postgres pool and the Qdrant client, provisions the collection, and wires the
	/// service. The pool is returned so the caller can close it on shutdown.
	pub async fn connect(config: nodup_config::Config) -> color_eyre::Result<(Self, Db)> {
		let db = Db::connect(&config.storage.postgres).await?;
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		if !qdrant.ensure_collection().await? {
			tracing::info!(collection = %qdrant.collection, "Qdrant collection already exists.");
		}

		let service = DedupService::new(config, &db, qdrant)?;

		Ok((Self::new(service), db))
	}
}
