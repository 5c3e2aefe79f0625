pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: Option<&'static str> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Maximum {max} notes can be pinned.")]
	PinLimit { max: i64 },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), field: Some(field) }
	}

	pub(crate) fn note_not_found(note_id: i64) -> Self {
		Self::NotFound { message: format!("Note {note_id} not found.") }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<sticky_storage::Error> for Error {
	fn from(err: sticky_storage::Error) -> Self {
		match err {
			sticky_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sticky_storage::Error::Codec(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<sticky_domain::note::TitleError> for Error {
	fn from(err: sticky_domain::note::TitleError) -> Self {
		Self::invalid_field("title", err.to_string())
	}
}

impl From<sticky_domain::pin::PinLimitReached> for Error {
	fn from(err: sticky_domain::pin::PinLimitReached) -> Self {
		Self::PinLimit { max: err.max }
	}
}
