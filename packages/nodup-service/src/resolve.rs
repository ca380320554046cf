use serde::Deserialize;

use crate::{DedupService, Error, Result};
use nodup_domain::{
	corroboration::{CorroborationField, Corroborators},
	record::{Record, RecordId},
	vector,
};
use nodup_storage::models::StoredPoint;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResolveRequest {
	#[serde(default)]
	pub id: Option<RecordId>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub company: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
}

/// Either the stored record the candidate duplicates, or the candidate itself after it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionOutcome {
	Reused { id: RecordId, description: String },
	Committed { id: RecordId, description: String },
}
impl ResolutionOutcome {
	pub fn is_reused(&self) -> bool {
		matches!(self, Self::Reused { .. })
	}

	pub fn into_parts(self) -> (RecordId, String) {
		match self {
			Self::Reused { id, description } | Self::Committed { id, description } =>
				(id, description),
		}
	}
}

impl DedupService {
	/// Returns the stored record `req` duplicates, or writes `req` and returns it.
	///
	/// Invalid requests are rejected before any collaborator is called. A failed metadata lookup
	/// aborts the resolution instead of being read as "not a duplicate".
	pub async fn resolve(&self, req: ResolveRequest) -> Result<ResolutionOutcome> {
		let record = validate_resolve_request(req)?;
		let embedding = self.embed_description(&record.description).await?;
		let nearest =
			self.collaborators.index.nearest(&embedding).await.map_err(Error::from_index)?;
		let Some(nearest) = nearest else {
			tracing::info!(record_id = %record.id, "Index is empty. Committing record.");

			return self.commit(record, embedding).await;
		};
		let (nearest_id, stored_vector, stored_description) =
			stored_parts(nearest, embedding.len())?;

		if vector::same_vector(&stored_vector, &embedding, self.cfg.dedup.exact_match_tolerance) {
			tracing::info!(
				record_id = %record.id,
				matched_id = %nearest_id,
				"Exact embedding match. Reusing stored record."
			);

			return Ok(ResolutionOutcome::Reused { id: nearest_id, description: stored_description });
		}

		let aux = self.collaborators.metadata.lookup(&nearest_id).await.map_err(|err| {
			tracing::warn!(matched_id = %nearest_id, error = %err, "Metadata lookup failed.");

			Error::LookupFailure { message: format!("Lookup for record {nearest_id} failed: {err}") }
		})?;
		let threshold = self.policy.compute(&record.corroborators, &aux);
		let similarity = vector::cosine_similarity(&stored_vector, &embedding);
		let corroborated =
			threshold.corroborated.iter().map(|field| field.as_str()).collect::<Vec<_>>();

		if threshold.accepts(similarity) {
			tracing::info!(
				record_id = %record.id,
				matched_id = %nearest_id,
				similarity,
				threshold = threshold.value,
				?corroborated,
				"Similarity above threshold. Reusing stored record."
			);

			return Ok(ResolutionOutcome::Reused { id: nearest_id, description: stored_description });
		}

		tracing::info!(
			record_id = %record.id,
			matched_id = %nearest_id,
			similarity,
			threshold = threshold.value,
			?corroborated,
			"Similarity at or below threshold. Committing record."
		);

		self.commit(record, embedding).await
	}

	/// Embeds `description` and scales it to unit length, matching what the cosine index stores and
	/// returns, so an identical description compares equal to its stored point.
	async fn embed_description(&self, description: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let texts = [description.to_string()];
		let mut vectors = self.collaborators.embedding.embed(cfg, &texts).await.map_err(|err| {
			tracing::error!(provider_id = %cfg.provider_id, error = %err, "Embedding failed.");

			Error::from(err)
		})?;
		let mut embedding = vectors.pop().ok_or_else(|| Error::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		})?;
		let expected = self.cfg.storage.qdrant.vector_dim as usize;

		if embedding.len() != expected {
			return Err(Error::Provider {
				message: format!(
					"Embedding has {} dimensions; the index expects {expected}.",
					embedding.len()
				),
			});
		}

		vector::normalize(&mut embedding);

		Ok(embedding)
	}

	async fn commit(&self, record: Record, embedding: Vec<f32>) -> Result<ResolutionOutcome> {
		self.collaborators
			.index
			.upsert(&record.id, &embedding, &record.description)
			.await
			.map_err(Error::from_index)?;

		tracing::debug!(record_id = %record.id, "Record committed.");

		Ok(ResolutionOutcome::Committed { id: record.id, description: record.description })
	}
}

fn validate_resolve_request(req: ResolveRequest) -> Result<Record> {
	let ResolveRequest { id, description, company, title, url } = req;
	let Some(id) = id.filter(|id| !id.is_blank()) else {
		return Err(Error::InvalidInput { message: "id is required.".to_string() });
	};
	let Some(description) = description.filter(|description| !description.trim().is_empty())
	else {
		return Err(Error::InvalidInput { message: "description is required.".to_string() });
	};
	let corroborators = [
		(CorroborationField::Company, company),
		(CorroborationField::Title, title),
		(CorroborationField::Url, url),
	]
	.into_iter()
	.filter_map(|(field, value)| value.map(|value| (field, value)))
	.collect::<Corroborators>();

	Ok(Record { id, description, corroborators })
}

// A matched point must carry both its vector and its description to be reused or compared.
fn stored_parts(point: StoredPoint, dimensions: usize) -> Result<(RecordId, Vec<f32>, String)> {
	let StoredPoint { id, vector, payload, .. } = point;
	let (vector, description) = match (vector, payload) {
		(Some(vector), Some(payload)) => (vector, payload.description),
		(vector, _) => {
			let missing = if vector.is_none() { "vector" } else { "description" };

			tracing::error!(matched_id = %id, missing, "Matched index entry is incomplete.");

			return Err(Error::CorruptIndexEntry {
				message: format!("Point {id} has no stored {missing}."),
			});
		},
	};

	if vector.len() != dimensions {
		tracing::error!(
			matched_id = %id,
			stored = vector.len(),
			expected = dimensions,
			"Matched index entry has the wrong dimension."
		);

		return Err(Error::CorruptIndexEntry {
			message: format!(
				"Point {id} holds a {}-dimensional vector; expected {dimensions}.",
				vector.len()
			),
		});
	}

	Ok((id, vector, description))
}
