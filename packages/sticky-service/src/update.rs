use serde::{Deserialize, Serialize};

use sticky_domain::{codec, note, owner::OwnerFilter};
use sticky_storage::{models::NoteRow, queries};

use crate::{Error, Note, Result, StickyService};

/// Partial update. Absent keys leave the column unchanged; see [`crate::patch`].
///
/// `null` clears `description`, `reminder_time`, and `color`, empties `points` and `tags`, and is
/// rejected for `title`. Pin state, ownership, and timestamps cannot be patched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub title: Option<Option<String>>,
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub description: Option<Option<String>>,
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub points: Option<Option<Vec<String>>>,
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub reminder_time: Option<Option<i64>>,
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub color: Option<Option<String>>,
	#[serde(
		default,
		deserialize_with = "crate::patch::deserialize_some",
		skip_serializing_if = "Option::is_none"
	)]
	pub tags: Option<Option<Vec<String>>>,
}
impl UpdateNoteRequest {
	fn validate(&self) -> Result<()> {
		if let Some(title) = &self.title {
			note::validate_title(title.as_deref())?;
		}

		Ok(())
	}

	fn apply_to(self, row: &mut NoteRow) {
		if let Some(Some(title)) = self.title {
			row.title = title;
		}
		if let Some(description) = self.description {
			row.description = description;
		}
		if let Some(points) = self.points {
			row.points = Some(codec::encode_lines(&points.unwrap_or_default()));
		}
		if let Some(reminder_time) = self.reminder_time {
			row.reminder_time = reminder_time;
		}
		if let Some(color) = self.color {
			row.color = color;
		}
		if let Some(tags) = self.tags {
			row.tags = Some(codec::encode_lines(&tags.unwrap_or_default()));
		}
	}
}

impl StickyService {
	/// Applies the present fields and refreshes `updated_at`, even when nothing else changed.
	pub async fn update_note(
		&self,
		owner: &OwnerFilter,
		note_id: i64,
		req: UpdateNoteRequest,
	) -> Result<Note> {
		req.validate()?;

		let mut tx = self.db.pool.begin().await?;
		let mut row = queries::fetch_note_for_update(&mut *tx, note_id)
			.await?
			.filter(|row| owner.admits(row.owner_email.as_deref()))
			.ok_or_else(|| Error::note_not_found(note_id))?;

		req.apply_to(&mut row);

		row.updated_at = crate::now_unix();

		queries::update_note_content(&mut *tx, &row).await?;

		tx.commit().await?;

		Note::try_from(row)
	}
}
