mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	DEFAULT_BASE_THRESHOLD, DEFAULT_COMPANY_WEIGHT, DEFAULT_TITLE_WEIGHT, DEFAULT_URL_WEIGHT,
	Config, Dedup, DedupWeights, EmbeddingProviderConfig, Metadata, Postgres, Providers, Qdrant,
	Service, Storage,
};

use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;

static SQL_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("SQL identifier pattern must compile.")
});

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a config document held in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.is_empty() {
		return Err(Error::validation("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(Error::validation("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation(
			"storage.postgres.pool_max_conns",
			"must be greater than zero.",
		));
	}
	if cfg.storage.qdrant.collection.is_empty() {
		return Err(Error::validation("storage.qdrant.collection", "must be non-empty."));
	}

	for (key, value) in [
		("storage.metadata.table", &cfg.storage.metadata.table),
		("storage.metadata.id_column", &cfg.storage.metadata.id_column),
	] {
		if !SQL_IDENTIFIER.is_match(value) {
			return Err(Error::validation(key, "must be a plain SQL identifier."));
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions",
			"must be greater than zero.",
		));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions",
			"must match storage.qdrant.vector_dim.",
		));
	}
	if cfg.providers.embedding.api_key.is_empty() {
		return Err(Error::validation("providers.embedding.api_key", "must be non-empty."));
	}

	let dedup = &cfg.dedup;

	if !dedup.base_threshold.is_finite() || !(-1.0..=1.0).contains(&dedup.base_threshold) {
		return Err(Error::validation(
			"dedup.base_threshold",
			"must be a finite number in the range -1.0-1.0.",
		));
	}
	if !dedup.exact_match_tolerance.is_finite() || dedup.exact_match_tolerance < 0.0 {
		return Err(Error::validation(
			"dedup.exact_match_tolerance",
			"must be a finite number, zero or greater.",
		));
	}

	for (key, weight) in [
		("dedup.weights.company", dedup.weights.company),
		("dedup.weights.title", dedup.weights.title),
		("dedup.weights.url", dedup.weights.url),
	] {
		if !weight.is_finite() || weight < 0.0 {
			return Err(Error::validation(key, "must be a finite number, zero or greater."));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for value in [
		&mut cfg.service.http_bind,
		&mut cfg.service.log_level,
		&mut cfg.storage.postgres.dsn,
		&mut cfg.storage.qdrant.url,
		&mut cfg.storage.qdrant.collection,
		&mut cfg.storage.metadata.table,
		&mut cfg.storage.metadata.id_column,
		&mut cfg.providers.embedding.api_key,
	] {
		let trimmed = value.trim();

		if trimmed.len() != value.len() {
			*value = trimmed.to_string();
		}
	}

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
