pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
pub mod pin;
pub mod update;

mod error;

pub use create::CreateNoteRequest;
pub use delete::DeleteResponse;
pub use error::{Error, Result};
pub use list::ListRequest;
pub use pin::TogglePinResponse;
pub use sticky_domain::owner::OwnerFilter;
pub use update::UpdateNoteRequest;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use sticky_config::Config;
use sticky_storage::{db::Db, models::NoteRow};

pub struct StickyService {
	pub cfg: Config,
	pub db: Db,
}
impl StickyService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}

/// A note as returned to clients, with list fields decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
	pub id: i64,
	pub title: String,
	pub description: Option<String>,
	pub points: Vec<String>,
	pub created_at: i64,
	pub updated_at: i64,
	pub owner_email: Option<String>,
	pub reminder_time: Option<i64>,
	pub color: Option<String>,
	pub tags: Vec<String>,
	pub pinned: bool,
	pub pin_order: Option<i32>,
}
impl TryFrom<NoteRow> for Note {
	type Error = Error;

	fn try_from(row: NoteRow) -> Result<Self> {
		let points = row.decode_points()?;
		let tags = row.decode_tags()?;

		Ok(Self {
			id: row.id,
			title: row.title,
			description: row.description,
			points,
			created_at: row.created_at,
			updated_at: row.updated_at,
			owner_email: row.owner_email,
			reminder_time: row.reminder_time,
			color: row.color,
			tags,
			pinned: row.pinned,
			pin_order: row.pin_order,
		})
	}
}

pub(crate) fn now_unix() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
