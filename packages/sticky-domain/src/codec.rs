//! Text encoding for the list-valued note fields (`points`, `tags`).
//!
//! Lists are stored as a JSON array of strings. A missing or blank column decodes to an empty list.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[error("Malformed list field: {source}")]
pub struct Error {
	#[from]
	source: serde_json::Error,
}

pub fn encode_lines(lines: &[String]) -> String {
	// Serializing a slice of strings cannot fail.
	serde_json::to_string(lines).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_lines(raw: Option<&str>) -> Result<Vec<String>> {
	match raw.map(str::trim) {
		None | Some("") => Ok(Vec::new()),
		Some(raw) => Ok(serde_json::from_str(raw)?),
	}
}
