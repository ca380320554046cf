pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of a resolution, one variant per stage so callers can tell them apart.
///
/// None of these are retried by the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Corrupt index entry: {message}")]
	CorruptIndexEntry { message: String },
	#[error("Metadata lookup failed: {message}")]
	LookupFailure { message: String },
	#[error("Vector index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Embedding provider error: {message}")]
	Provider { message: String },
}
impl Error {
	pub(crate) fn from_index(err: nodup_storage::Error) -> Self {
		match err {
			nodup_storage::Error::Corrupt(message) => Self::CorruptIndexEntry { message },
			nodup_storage::Error::InvalidArgument(message) => Self::InvalidInput { message },
			other => Self::IndexUnavailable { message: other.to_string() },
		}
	}
}
impl From<nodup_providers::Error> for Error {
	fn from(err: nodup_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
