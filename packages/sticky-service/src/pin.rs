use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use sticky_domain::{
	owner::OwnerFilter,
	pin::{self, PinScope, PinTransition},
};
use sticky_storage::queries;

use crate::{Error, Result, StickyService};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TogglePinResponse {
	pub pinned: bool,
	pub pin_order: Option<i32>,
}

impl StickyService {
	/// Pins an unpinned note at the end of its owner's tray, or unpins a pinned one and closes the
	/// gap it leaves.
	///
	/// The tray is the note's own owner scope. Capacity check, mutation, and reorder run in one
	/// transaction that holds the scope's advisory lock, so concurrent toggles cannot overfill a
	/// tray or observe a gap.
	pub async fn toggle_pin(&self, owner: &OwnerFilter, note_id: i64) -> Result<TogglePinResponse> {
		let mut tx = self.db.pool.begin().await?;
		let note_owner = queries::fetch_note_owner(&mut *tx, note_id)
			.await?
			.filter(|note_owner| owner.admits(note_owner.as_deref()))
			.ok_or_else(|| Error::note_not_found(note_id))?;
		let scope = PinScope::new(note_owner);

		// Always take the scope lock before any row lock.
		queries::lock_pin_scope(&mut *tx, &scope).await?;

		let note = queries::fetch_note_for_update(&mut *tx, note_id)
			.await?
			.ok_or_else(|| Error::note_not_found(note_id))?;
		let pinned_in_scope = queries::count_pinned(&mut *tx, &scope).await?;
		let plan = pin::plan_toggle(note.pin_state(), pinned_in_scope).map_err(|err| {
			tracing::info!(note_id, pinned_in_scope, "Pin refused; tray is full.");

			Error::from(err)
		})?;

		queries::set_pin_state(&mut *tx, note.id, plan.pin_order(), crate::now_unix()).await?;

		if let PinTransition::Unpin { vacated } = plan {
			let shifted = queries::close_pin_gap(&mut *tx, &scope, vacated).await?;

			tracing::debug!(note_id, vacated, shifted, "Closed pinned tray gap.");
		}

		let pin_order = repair_tray(&mut *tx, &scope, note.id, plan.pin_order()).await?;

		tx.commit().await?;

		tracing::debug!(note_id, pinned = plan.pinned(), ?pin_order, "Pin toggled.");

		Ok(TogglePinResponse { pinned: plan.pinned(), pin_order })
	}
}

/// Renumbers the scope's tray if it is not `1..=k`, returning the toggled note's final position.
async fn repair_tray(
	conn: &mut PgConnection,
	scope: &PinScope,
	note_id: i64,
	planned: Option<i32>,
) -> Result<Option<i32>> {
	let tray = queries::list_pinned_in_scope(conn, scope).await?;
	let orders = tray.iter().map(|(_, order)| *order).collect::<Vec<_>>();

	if pin::is_dense(&orders) {
		return Ok(planned);
	}

	let fixes = pin::renumber(&tray);

	tracing::warn!(
		owner = ?scope.owner(),
		?orders,
		fixes = fixes.len(),
		"Pinned tray was not densely ordered. Renumbering."
	);

	let mut final_order = planned;

	for (id, order) in fixes {
		queries::set_pin_order(conn, id, order).await?;

		if id == note_id {
			final_order = Some(order);
		}
	}

	Ok(final_order)
}
