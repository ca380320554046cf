use std::collections::HashMap;

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CreateCollectionBuilder, Distance, PointId, PointStruct, Query, QueryPointsBuilder,
		ScoredPoint, UpsertPointsBuilder, Value, VectorOutput, VectorParamsBuilder, VectorsOutput,
		point_id::PointIdOptions, value::Kind, vector_output, vectors_output::VectorsOptions,
	},
};
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{PointPayload, StoredPoint},
};
use nodup_domain::record::RecordId;

pub const DESCRIPTION_KEY: &str = "description";
/// Payload key preserving string ids that had to be hashed into a UUID point id.
pub const RECORD_ID_KEY: &str = "record_id";

const RECORD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6e6f_6475_705f_7265_636f_7264_5f69_6400);

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &nodup_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection with a cosine metric when it does not exist yet. Returns whether a
	/// collection was created.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone())
					.vectors_config(VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine)),
			)
			.await?;

		tracing::info!(
			collection = %self.collection,
			vector_dim = self.vector_dim,
			"Qdrant collection created."
		);

		Ok(true)
	}

	/// Top-1 neighbor under cosine similarity, with vector and payload attached.
	pub async fn nearest(&self, vector: &[f32]) -> Result<Option<StoredPoint>> {
		let query = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.limit(1)
			.with_payload(true)
			.with_vectors(true);
		let response = self.client.query(query).await?;

		response.result.into_iter().next().map(decode_scored_point).transpose()
	}

	/// Writes the point keyed by `id`, replacing any point already stored under the same id.
	pub async fn upsert(&self, id: &RecordId, vector: &[f32], description: &str) -> Result<()> {
		let mut payload = Payload::new();

		payload.insert(DESCRIPTION_KEY, description.to_string());

		if let RecordId::Text(text) = id {
			payload.insert(RECORD_ID_KEY, text.clone());
		}

		let point = PointStruct::new(point_id(id)?, vector.to_vec(), payload);

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
			.await?;

		Ok(())
	}
}

/// Maps a record id onto the point ids the index accepts.
///
/// Integers and UUID strings are used directly. Any other string is hashed into a UUIDv5, and the
/// original string travels in the payload under [`RECORD_ID_KEY`].
pub fn point_id(id: &RecordId) -> Result<PointId> {
	match id {
		RecordId::Num(num) => Ok(PointId::from(*num)),
		RecordId::Text(text) if text.trim().is_empty() =>
			Err(Error::InvalidArgument("Record id must be non-empty.".to_string())),
		RecordId::Text(text) => {
			let uuid = Uuid::parse_str(text)
				.unwrap_or_else(|_| Uuid::new_v5(&RECORD_ID_NAMESPACE, text.as_bytes()));

			Ok(PointId::from(uuid.to_string()))
		},
	}
}

fn decode_scored_point(point: ScoredPoint) -> Result<StoredPoint> {
	let ScoredPoint { id, payload, score, vectors, .. } = point;
	let id = match payload_string(&payload, RECORD_ID_KEY) {
		Some(record_id) => RecordId::Text(record_id),
		None => match id.and_then(|id| id.point_id_options) {
			Some(PointIdOptions::Num(num)) => RecordId::Num(num),
			Some(PointIdOptions::Uuid(uuid)) => RecordId::Text(uuid),
			None => return Err(Error::Corrupt("Nearest point has no id.".to_string())),
		},
	};
	let payload = payload_string(&payload, DESCRIPTION_KEY)
		.map(|description| PointPayload { description });

	Ok(StoredPoint { id, vector: dense_vector(vectors), payload, score })
}

fn dense_vector(vectors: Option<VectorsOutput>) -> Option<Vec<f32>> {
	let output = match vectors?.vectors_options? {
		VectorsOptions::Vector(output) => output,
		// Collections created by this service hold one unnamed vector, so a named map should
		// carry exactly one entry.
		VectorsOptions::Vectors(named) => named.vectors.into_values().next()?,
	};

	dense_data(output)
}

#[allow(deprecated)]
fn dense_data(output: VectorOutput) -> Option<Vec<f32>> {
	match output.vector {
		Some(vector_output::Vector::Dense(dense)) => Some(dense.data),
		Some(_) => None,
		None if !output.data.is_empty() => Some(output.data),
		None => None,
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(text) => Some(text.clone()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use qdrant_client::qdrant::{DenseVector, NamedVectorsOutput};

	use super::*;

	fn string_value(text: &str) -> Value {
		Value { kind: Some(Kind::StringValue(text.to_string())) }
	}

	#[allow(deprecated)]
	fn dense_output(data: Vec<f32>) -> VectorOutput {
		VectorOutput {
			vector: Some(vector_output::Vector::Dense(DenseVector { data })),
			..Default::default()
		}
	}

	fn scored(id: PointId, payload: HashMap<String, Value>, vector: Option<Vec<f32>>) -> ScoredPoint {
		ScoredPoint {
			id: Some(id),
			payload,
			score: 0.9,
			vectors: vector.map(|data| VectorsOutput {
				vectors_options: Some(VectorsOptions::Vector(dense_output(data))),
			}),
			..Default::default()
		}
	}

	#[test]
	fn integer_ids_map_to_numeric_points() {
		let id = point_id(&RecordId::Num(7)).expect("Failed to map id.");

		assert_eq!(id.point_id_options, Some(PointIdOptions::Num(7)));
	}

	#[test]
	fn uuid_strings_are_kept_and_other_strings_hash_stably() {
		let uuid = "5f1c1c3a-5a8e-4f57-9a55-6f3e9f2f0c11";
		let direct = point_id(&RecordId::from(uuid)).expect("Failed to map id.");

		assert_eq!(direct.point_id_options, Some(PointIdOptions::Uuid(uuid.to_string())));

		let first = point_id(&RecordId::from("job-42")).expect("Failed to map id.");
		let second = point_id(&RecordId::from("job-42")).expect("Failed to map id.");
		let other = point_id(&RecordId::from("job-43")).expect("Failed to map id.");

		assert_eq!(first, second);
		assert_ne!(first, other);
	}

	#[test]
	fn blank_string_ids_are_rejected() {
		assert!(matches!(point_id(&RecordId::from(" ")), Err(Error::InvalidArgument(_))));
	}

	#[test]
	fn decodes_vector_payload_and_original_string_id() {
		let payload = HashMap::from([
			(DESCRIPTION_KEY.to_string(), string_value("Backend Engineer at Acme")),
			(RECORD_ID_KEY.to_string(), string_value("job-42")),
		]);
		let id = point_id(&RecordId::from("job-42")).expect("Failed to map id.");
		let point = decode_scored_point(scored(id, payload, Some(vec![0.6, 0.8])))
			.expect("Failed to decode point.");

		assert_eq!(point.id, RecordId::from("job-42"));
		assert_eq!(point.vector, Some(vec![0.6, 0.8]));
		assert_eq!(
			point.payload,
			Some(PointPayload { description: "Backend Engineer at Acme".to_string() })
		);
	}

	#[test]
	fn missing_vector_or_description_decodes_as_absent() {
		let point = decode_scored_point(scored(PointId::from(3), HashMap::new(), None))
			.expect("Failed to decode point.");

		assert_eq!(point.id, RecordId::Num(3));
		assert_eq!(point.vector, None);
		assert_eq!(point.payload, None);
	}

	#[test]
	fn named_vector_output_is_accepted() {
		let vectors = VectorsOutput {
			vectors_options: Some(VectorsOptions::Vectors(NamedVectorsOutput {
				vectors: HashMap::from([(String::new(), dense_output(vec![1.0, 0.0]))]),
			})),
		};

		assert_eq!(dense_vector(Some(vectors)), Some(vec![1.0, 0.0]));
	}

	#[test]
	fn point_without_id_is_corrupt() {
		let point = ScoredPoint { id: None, ..Default::default() };

		assert!(matches!(decode_scored_point(point), Err(Error::Corrupt(_))));
	}
}
