//! Pin planning for the pinned tray.
//!
//! Each pin scope holds at most [`MAX_PINNED`] pinned notes whose `pin_order` values are exactly
//! `1..=k`. Planning here is pure; the storage layer applies the plan inside one transaction.

/// Capacity of the pinned tray, per pin scope.
pub const MAX_PINNED: i64 = 3;

const LOCK_DOMAIN: &[u8] = b"sticky.pin_scope.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Maximum {max} notes can be pinned.")]
pub struct PinLimitReached {
	pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
	Unpinned,
	Pinned { order: i32 },
}
impl PinState {
	/// The store keeps `pinned` true exactly when `pin_order` is set, so the order alone decides.
	pub fn from_order(pin_order: Option<i32>) -> Self {
		match pin_order {
			Some(order) => Self::Pinned { order },
			None => Self::Unpinned,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinTransition {
	/// Append to the end of the tray.
	Pin { order: i32 },
	/// Leave the tray. Every scope note with `pin_order > vacated` moves up by one.
	Unpin { vacated: i32 },
}
impl PinTransition {
	pub fn pinned(&self) -> bool {
		matches!(self, Self::Pin { .. })
	}

	pub fn pin_order(&self) -> Option<i32> {
		match self {
			Self::Pin { order } => Some(*order),
			Self::Unpin { .. } => None,
		}
	}
}

/// The set of notes that share one pinned tray: every note with the same `owner_email`, with
/// ownerless notes forming their own scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinScope {
	owner: Option<String>,
}
impl PinScope {
	pub fn new(owner: Option<String>) -> Self {
		Self { owner }
	}

	pub fn owner(&self) -> Option<&str> {
		self.owner.as_deref()
	}

	/// Key for a transaction-scoped advisory lock serializing pin changes within this scope.
	pub fn lock_key(&self) -> i64 {
		let mut hasher = blake3::Hasher::new();

		hasher.update(LOCK_DOMAIN);

		match self.owner.as_deref() {
			Some(owner) => {
				hasher.update(&[1]);
				hasher.update(owner.as_bytes());
			},
			None => {
				hasher.update(&[0]);
			},
		}

		let digest = hasher.finalize();
		let mut prefix = [0_u8; 8];

		prefix.copy_from_slice(&digest.as_bytes()[..8]);

		i64::from_le_bytes(prefix)
	}
}

/// Decides what toggling a note does, given its state and how many notes are pinned in its scope.
pub fn plan_toggle(state: PinState, pinned_in_scope: i64) -> Result<PinTransition, PinLimitReached> {
	match state {
		PinState::Pinned { order } => Ok(PinTransition::Unpin { vacated: order }),
		PinState::Unpinned if pinned_in_scope >= MAX_PINNED =>
			Err(PinLimitReached { max: MAX_PINNED }),
		PinState::Unpinned => Ok(PinTransition::Pin { order: pinned_in_scope as i32 + 1 }),
	}
}

/// Returns the `(note_id, new_order)` assignments that make `pinned` dense again.
///
/// `pinned` holds `(note_id, pin_order)` for every pinned note in one scope. Notes keep their
/// relative order, ties broken by id. An already dense tray yields no assignments.
pub fn renumber(pinned: &[(i64, i32)]) -> Vec<(i64, i32)> {
	let mut sorted = pinned.to_vec();

	sorted.sort_by_key(|(id, order)| (*order, *id));

	sorted
		.into_iter()
		.zip(1..)
		.filter(|((_, order), expected)| order != expected)
		.map(|((id, _), expected)| (id, expected))
		.collect()
}

pub fn is_dense(orders: &[i32]) -> bool {
	let mut sorted = orders.to_vec();

	sorted.sort_unstable();

	sorted.into_iter().zip(1..).all(|(order, expected)| order == expected)
}
