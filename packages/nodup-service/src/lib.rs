pub mod resolve;

mod error;

pub use error::{Error, Result};
pub use resolve::{ResolutionOutcome, ResolveRequest};

use std::{future::Future, pin::Pin, sync::Arc};

use nodup_config::{Config, EmbeddingProviderConfig};
use nodup_domain::{corroboration::AuxiliaryMetadata, record::RecordId, threshold::ThresholdPolicy};
use nodup_providers::embedding::EmbeddingClient;
use nodup_storage::{db::Db, metadata::MetadataReader, models::StoredPoint, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, nodup_providers::Result<Vec<Vec<f32>>>>;
}

/// Nearest-neighbor lookup and writes against the vector index.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
	) -> BoxFuture<'a, nodup_storage::Result<Option<StoredPoint>>>;

	fn upsert<'a>(
		&'a self,
		id: &'a RecordId,
		vector: &'a [f32],
		description: &'a str,
	) -> BoxFuture<'a, nodup_storage::Result<()>>;
}

pub trait MetadataStore
where
	Self: Send + Sync,
{
	fn lookup<'a>(
		&'a self,
		id: &'a RecordId,
	) -> BoxFuture<'a, nodup_storage::Result<AuxiliaryMetadata>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub index: Arc<dyn VectorIndex>,
	pub metadata: Arc<dyn MetadataStore>,
}
impl Collaborators {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		index: Arc<dyn VectorIndex>,
		metadata: Arc<dyn MetadataStore>,
	) -> Self {
		Self { embedding, index, metadata }
	}
}

pub struct DedupService {
	pub cfg: Config,
	pub policy: ThresholdPolicy,
	pub collaborators: Collaborators,
}
impl DedupService {
	/// Wires the service to the HTTP embedding provider, Qdrant and the metadata table.
	pub fn new(cfg: Config, db: &Db, qdrant: QdrantStore) -> Result<Self> {
		let embedding = EmbeddingClient::new(&cfg.providers.embedding)?;
		let metadata = MetadataReader::new(db, &cfg.storage.metadata);
		let collaborators =
			Collaborators::new(Arc::new(embedding), Arc::new(qdrant), Arc::new(metadata));

		Ok(Self::with_collaborators(cfg, collaborators))
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		let policy = ThresholdPolicy::from_config(&cfg.dedup);

		Self { cfg, policy, collaborators }
	}
}

impl EmbeddingProvider for EmbeddingClient {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, nodup_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(EmbeddingClient::embed(self, cfg, texts))
	}
}

impl VectorIndex for QdrantStore {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
	) -> BoxFuture<'a, nodup_storage::Result<Option<StoredPoint>>> {
		Box::pin(QdrantStore::nearest(self, vector))
	}

	fn upsert<'a>(
		&'a self,
		id: &'a RecordId,
		vector: &'a [f32],
		description: &'a str,
	) -> BoxFuture<'a, nodup_storage::Result<()>> {
		Box::pin(QdrantStore::upsert(self, id, vector, description))
	}
}

impl MetadataStore for MetadataReader {
	fn lookup<'a>(
		&'a self,
		id: &'a RecordId,
	) -> BoxFuture<'a, nodup_storage::Result<AuxiliaryMetadata>> {
		Box::pin(MetadataReader::lookup(self, id))
	}
}
