use nodup_domain::record::RecordId;

/// The nearest neighbor as returned by the index.
///
/// `vector` and `payload` are optional because the index may hold entries written without them;
/// callers decide how to treat such entries.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredPoint {
	pub id: RecordId,
	pub vector: Option<Vec<f32>>,
	pub payload: Option<PointPayload>,
	/// Similarity reported by the index. Informational only.
	pub score: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointPayload {
	pub description: String,
}
