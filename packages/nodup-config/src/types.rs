use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_BASE_THRESHOLD: f64 = 0.995;
pub const DEFAULT_COMPANY_WEIGHT: f64 = 0.05;
pub const DEFAULT_TITLE_WEIGHT: f64 = 0.025;
pub const DEFAULT_URL_WEIGHT: f64 = 0.15;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub dedup: Dedup,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
	#[serde(default)]
	pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

/// Location of the externally owned table that holds corroboration columns.
///
/// The table must expose `company`, `title` and `url` columns. Both names are interpolated into
/// SQL, so validation restricts them to plain identifiers.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Metadata {
	pub table: String,
	pub id_column: String,
}
impl Default for Metadata {
	fn default() -> Self {
		Self { table: "job_skillsets".to_string(), id_column: "job_id".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Dedup {
	/// Minimum cosine similarity for a reuse when no auxiliary field corroborates.
	pub base_threshold: f64,
	/// Largest per-component difference still treated as the same vector.
	pub exact_match_tolerance: f32,
	pub weights: DedupWeights,
}
impl Default for Dedup {
	fn default() -> Self {
		Self {
			base_threshold: DEFAULT_BASE_THRESHOLD,
			exact_match_tolerance: 1e-6,
			weights: Default::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DedupWeights {
	pub company: f64,
	pub title: f64,
	pub url: f64,
}
impl Default for DedupWeights {
	fn default() -> Self {
		Self {
			company: DEFAULT_COMPANY_WEIGHT,
			title: DEFAULT_TITLE_WEIGHT,
			url: DEFAULT_URL_WEIGHT,
		}
	}
}
