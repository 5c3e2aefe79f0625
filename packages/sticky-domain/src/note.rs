/// Color applied to a note created without one.
pub const DEFAULT_COLOR: &str = "bg-yellow-200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
	#[error("title is required.")]
	Missing,
	#[error("title must not be blank.")]
	Blank,
}

pub fn validate_title(title: Option<&str>) -> Result<&str, TitleError> {
	match title {
		None => Err(TitleError::Missing),
		Some(title) if title.trim().is_empty() => Err(TitleError::Blank),
		Some(title) => Ok(title),
	}
}

pub fn color_or_default(color: Option<String>) -> String {
	color.unwrap_or_else(|| DEFAULT_COLOR.to_string())
}
