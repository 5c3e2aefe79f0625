use serde::{Deserialize, Serialize};

use sticky_domain::owner::OwnerFilter;
use sticky_storage::queries;

use crate::{Error, Note, Result, StickyService};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListRequest {
	pub skip: Option<i64>,
	pub limit: Option<i64>,
}

impl StickyService {
	pub async fn list_notes(&self, owner: &OwnerFilter, req: ListRequest) -> Result<Vec<Note>> {
		let (offset, limit) = self.resolve_page(&req)?;
		let rows = queries::list_notes(&self.db.pool, owner.owner(), offset, limit).await?;

		rows.into_iter().map(Note::try_from).collect()
	}

	fn resolve_page(&self, req: &ListRequest) -> Result<(i64, i64)> {
		let offset = req.skip.unwrap_or(0);
		let limit = req.limit.unwrap_or(self.cfg.notes.default_page_size);

		if offset < 0 {
			return Err(Error::invalid_field("skip", "skip must be zero or greater."));
		}
		if limit < 0 {
			return Err(Error::invalid_field("limit", "limit must be zero or greater."));
		}

		Ok((offset, limit.min(self.cfg.notes.max_page_size)))
	}
}
