use serde::{Deserialize, Serialize};

use sticky_domain::{note, owner::OwnerFilter};
use sticky_storage::{models::NewNote, queries};

use crate::{Note, Result, StickyService};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateNoteRequest {
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub points: Vec<String>,
	#[serde(default)]
	pub reminder_time: Option<i64>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
}

impl StickyService {
	/// Stores a new, unpinned note owned by the caller (if the caller identified itself).
	pub async fn create_note(&self, owner: &OwnerFilter, req: CreateNoteRequest) -> Result<Note> {
		let title = note::validate_title(Some(req.title.as_str()))?;
		let color = note::color_or_default(req.color.clone());
		let new_note = NewNote {
			title,
			description: req.description.as_deref(),
			points: &req.points,
			tags: &req.tags,
			reminder_time: req.reminder_time,
			color: color.as_str(),
			owner_email: owner.owner(),
			now: crate::now_unix(),
		};
		let mut tx = self.db.pool.begin().await?;
		let row = queries::insert_note(&mut *tx, &new_note).await?;

		tx.commit().await?;

		tracing::debug!(note_id = row.id, "Note created.");

		Note::try_from(row)
	}
}
