use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use nodup_domain::record::RecordId;
use nodup_service::{Error, ResolveRequest};

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
	pub id: RecordId,
	pub description: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let (status, code) = match &err {
			Error::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
			Error::CorruptIndexEntry { .. } => (StatusCode::NOT_FOUND, "corrupt_index_entry"),
			Error::LookupFailure { .. } => (StatusCode::BAD_GATEWAY, "lookup_failure"),
			Error::IndexUnavailable { .. } =>
				(StatusCode::SERVICE_UNAVAILABLE, "index_unavailable"),
			Error::Provider { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
		};

		Self::new(status, code, err.to_string())
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new().route("/health", get(health)).route("/embed", post(embed)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Resolves a record against the index. `200` when a stored record is reused, `201` when the
/// candidate is committed.
async fn embed(
	State(state): State<AppState>,
	payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EmbedResponse>), ApiError> {
	let Json(payload) = payload?;
	let outcome = state.service.resolve(payload).await.inspect_err(|err| {
		tracing::warn!(error = %err, "Resolve request failed.");
	})?;
	let status = if outcome.is_reused() { StatusCode::OK } else { StatusCode::CREATED };
	let (id, description) = outcome.into_parts();

	Ok((status, Json(EmbedResponse { id, description })))
}
