use sticky_domain::{codec, pin::PinState};

use crate::Result;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
	pub id: i64,
	pub title: String,
	pub description: Option<String>,
	/// JSON-encoded list; see [`sticky_domain::codec`].
	pub points: Option<String>,
	pub created_at: i64,
	pub updated_at: i64,
	pub owner_email: Option<String>,
	pub reminder_time: Option<i64>,
	pub color: Option<String>,
	/// JSON-encoded list; see [`sticky_domain::codec`].
	pub tags: Option<String>,
	pub pinned: bool,
	pub pin_order: Option<i32>,
}
impl NoteRow {
	pub fn decode_points(&self) -> Result<Vec<String>> {
		Ok(codec::decode_lines(self.points.as_deref())?)
	}

	pub fn decode_tags(&self) -> Result<Vec<String>> {
		Ok(codec::decode_lines(self.tags.as_deref())?)
	}

	pub fn pin_state(&self) -> PinState {
		PinState::from_order(self.pin_order)
	}
}

#[derive(Debug)]
pub struct NewNote<'a> {
	pub title: &'a str,
	pub description: Option<&'a str>,
	pub points: &'a [String],
	pub tags: &'a [String],
	pub reminder_time: Option<i64>,
	pub color: &'a str,
	pub owner_email: Option<&'a str>,
	pub now: i64,
}
