use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, patch, put},
};
use serde::Serialize;
use serde_json::{Value, json};

use sticky_service::{
	CreateNoteRequest, DeleteResponse, Error as ServiceError, ListRequest, Note, OwnerFilter,
	TogglePinResponse, UpdateNoteRequest,
};

use crate::state::AppState;

/// Optional header naming the calling owner. Opaque; never verified.
pub const OWNER_HEADER: &str = "x-user-email";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.route("/notes", get(list_notes).post(create_note))
		.route("/notes/", get(list_notes).post(create_note))
		.route("/notes/{note_id}", put(update_note).delete(delete_note))
		.route("/notes/{note_id}/pin", patch(toggle_pin))
		.with_state(state)
}

/// [`router`], nested under `root_path` when one is configured.
pub fn app(state: AppState, root_path: Option<&str>) -> Router {
	match root_path {
		Some(prefix) => Router::new().nest(prefix, router(state)),
		None => router(state),
	}
}

async fn root() -> Json<Value> {
	Json(json!({ "message": "Sticky API is running." }))
}

async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

async fn create_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.create_note(&owner_filter(&headers), payload).await?;

	Ok(Json(response))
}

async fn list_notes(
	State(state): State<AppState>,
	headers: HeaderMap,
	query: Result<Query<ListRequest>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let Query(query) = query?;
	let response = state.service.list_notes(&owner_filter(&headers), query).await?;

	Ok(Json(response))
}

async fn update_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	note_id: Result<Path<i64>, PathRejection>,
	payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
	let Path(note_id) = note_id?;
	let Json(payload) = payload?;
	let response = state.service.update_note(&owner_filter(&headers), note_id, payload).await?;

	Ok(Json(response))
}

async fn delete_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	note_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let Path(note_id) = note_id?;
	let response = state.service.delete_note(&owner_filter(&headers), note_id).await?;

	Ok(Json(response))
}

async fn toggle_pin(
	State(state): State<AppState>,
	headers: HeaderMap,
	note_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TogglePinResponse>, ApiError> {
	let Path(note_id) = note_id?;
	let response = state.service.toggle_pin(&owner_filter(&headers), note_id).await?;

	Ok(Json(response))
}

fn owner_filter(headers: &HeaderMap) -> OwnerFilter {
	OwnerFilter::from_header(headers.get(OWNER_HEADER).and_then(|value| value.to_str().ok()))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn malformed(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST", message, None)
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message, field } => Self::new(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				field.map(|field| vec![field.to_string()]),
			),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			err @ ServiceError::PinLimit { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "PIN_LIMIT_REACHED", err.to_string(), None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Request failed on storage.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"Internal error.",
					None,
				)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		Self::malformed(err.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		Self::malformed(err.body_text())
	}
}

impl From<PathRejection> for ApiError {
	fn from(err: PathRejection) -> Self {
		Self::malformed(err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}
