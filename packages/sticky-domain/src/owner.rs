/// Which notes a caller can see, derived from the optional owner header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
	/// No owner supplied; every note is visible.
	Any,
	Owner(String),
}
impl OwnerFilter {
	/// Blank identifiers are treated as absent.
	pub fn from_header(value: Option<&str>) -> Self {
		match value.map(str::trim) {
			Some(owner) if !owner.is_empty() => Self::Owner(owner.to_string()),
			_ => Self::Any,
		}
	}

	pub fn owner(&self) -> Option<&str> {
		match self {
			Self::Any => None,
			Self::Owner(owner) => Some(owner.as_str()),
		}
	}

	pub fn admits(&self, note_owner: Option<&str>) -> bool {
		match self {
			Self::Any => true,
			Self::Owner(owner) => note_owner == Some(owner.as_str()),
		}
	}
}
