use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// OpenAI-compatible embeddings endpoint client. Build once and share.
pub struct EmbeddingClient {
	client: Client,
}
impl EmbeddingClient {
	pub fn new(cfg: &nodup_config::EmbeddingProviderConfig) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.build()?;

		Ok(Self { client })
	}

	pub async fn embed(
		&self,
		cfg: &nodup_config::EmbeddingProviderConfig,
		texts: &[String],
	) -> Result<Vec<Vec<f32>>> {
		let url = format!("{}{}", cfg.api_base.trim_end_matches('/'), cfg.path);
		let body = serde_json::json!({
			"model": cfg.model,
			"input": texts,
			"dimensions": cfg.dimensions,
		});
		let res = self.client.post(url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;
		let vectors = parse_embedding_response(json)?;

		if vectors.len() != texts.len() {
			return Err(Error::InvalidResponse {
				message: format!(
					"Embedding response returned {} vectors for {} inputs.",
					vectors.len(),
					texts.len()
				),
			});
		}

		tracing::debug!(
			provider_id = %cfg.provider_id,
			model = %cfg.model,
			count = vectors.len(),
			"Embedded texts."
		);

		Ok(vectors)
	}
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item.get("embedding").and_then(|v| v.as_array()).ok_or_else(|| {
			Error::InvalidResponse { message: "Embedding item missing embedding array.".to_string() }
		})?;
		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: "Embedding value must be numeric.".to_string(),
			})?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
