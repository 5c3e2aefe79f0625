use serde::{Deserialize, Serialize};

use sticky_domain::{
	owner::OwnerFilter,
	pin::{PinScope, PinState},
};
use sticky_storage::queries;

use crate::{Result, StickyService};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub message: String,
}

impl StickyService {
	/// Hard delete. Unknown ids, and notes the caller cannot see, are a silent success.
	///
	/// Deleting a pinned note closes the gap it leaves in its owner's tray, under the same scope
	/// lock `toggle_pin` takes.
	pub async fn delete_note(&self, owner: &OwnerFilter, note_id: i64) -> Result<DeleteResponse> {
		let mut tx = self.db.pool.begin().await?;
		let Some(note_owner) = queries::fetch_note_owner(&mut *tx, note_id)
			.await?
			.filter(|note_owner| owner.admits(note_owner.as_deref()))
		else {
			tracing::debug!(note_id, "Note delete skipped; nothing visible to remove.");

			return Ok(deleted());
		};
		let scope = PinScope::new(note_owner);

		queries::lock_pin_scope(&mut *tx, &scope).await?;

		let vacated = match queries::fetch_note_for_update(&mut *tx, note_id).await? {
			Some(note) => match note.pin_state() {
				PinState::Pinned { order } => Some(order),
				PinState::Unpinned => None,
			},
			None => None,
		};
		let removed = queries::delete_note(&mut *tx, note_id, owner.owner()).await?;

		if removed > 0
			&& let Some(vacated) = vacated
		{
			let shifted = queries::close_pin_gap(&mut *tx, &scope, vacated).await?;

			tracing::debug!(note_id, vacated, shifted, "Closed pinned tray gap.");
		}

		tx.commit().await?;

		tracing::debug!(note_id, removed, "Note delete applied.");

		Ok(deleted())
	}
}

fn deleted() -> DeleteResponse {
	DeleteResponse { message: "Note deleted.".to_string() }
}
