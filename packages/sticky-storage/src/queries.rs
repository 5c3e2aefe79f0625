use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use sticky_domain::{codec, pin::PinScope};

use crate::{
	Result,
	models::{NewNote, NoteRow},
};

macro_rules! note_columns {
	() => {
		"id, title, description, points, created_at, updated_at, owner_email, reminder_time, color, tags, pinned, pin_order"
	};
}

// Capacity counting, gap closing, and repair all go through this one predicate so the three can
// never disagree about which notes share a tray. `$1` is the scope owner.
macro_rules! pin_scope_predicate {
	() => {
		"pinned AND owner_email IS NOT DISTINCT FROM $1"
	};
}

const SELECT_NOTE_FOR_UPDATE: &str =
	concat!("SELECT ", note_columns!(), " FROM notes WHERE id = $1 FOR UPDATE");
const COUNT_PINNED_IN_SCOPE: &str =
	concat!("SELECT count(*) FROM notes WHERE ", pin_scope_predicate!());
const CLOSE_PIN_GAP: &str = concat!(
	"UPDATE notes SET pin_order = pin_order - 1 WHERE ",
	pin_scope_predicate!(),
	" AND pin_order > $2"
);
const LIST_PINNED_IN_SCOPE: &str = concat!(
	"SELECT id, pin_order FROM notes WHERE ",
	pin_scope_predicate!(),
	" ORDER BY pin_order, id"
);

pub async fn insert_note(conn: &mut PgConnection, note: &NewNote<'_>) -> Result<NoteRow> {
	let row = sqlx::query_as::<_, NoteRow>(concat!(
		"\
INSERT INTO notes (
	title,
	description,
	points,
	created_at,
	updated_at,
	owner_email,
	reminder_time,
	color,
	tags,
	pinned,
	pin_order
)
VALUES ($1, $2, $3, $4, $4, $5, $6, $7, $8, false, NULL)
RETURNING ",
		note_columns!()
	))
	.bind(note.title)
	.bind(note.description)
	.bind(codec::encode_lines(note.points))
	.bind(note.now)
	.bind(note.owner_email)
	.bind(note.reminder_time)
	.bind(note.color)
	.bind(codec::encode_lines(note.tags))
	.fetch_one(conn)
	.await?;

	Ok(row)
}

/// Returns `None` when the note does not exist, `Some(owner)` otherwise.
pub async fn fetch_note_owner(
	conn: &mut PgConnection,
	id: i64,
) -> Result<Option<Option<String>>> {
	let owner =
		sqlx::query_scalar::<_, Option<String>>("SELECT owner_email FROM notes WHERE id = $1")
			.bind(id)
			.fetch_optional(conn)
			.await?;

	Ok(owner)
}

pub async fn fetch_note_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<NoteRow>> {
	let row = sqlx::query_as::<_, NoteRow>(SELECT_NOTE_FOR_UPDATE)
		.bind(id)
		.fetch_optional(conn)
		.await?;

	Ok(row)
}

/// Pinned notes first by tray position, then the rest newest first.
pub async fn list_notes(
	pool: &PgPool,
	owner: Option<&str>,
	offset: i64,
	limit: i64,
) -> Result<Vec<NoteRow>> {
	let mut builder =
		QueryBuilder::<Postgres>::new(concat!("SELECT ", note_columns!(), " FROM notes"));

	push_owner_filter(&mut builder, owner, " WHERE ");
	builder.push(" ORDER BY pinned DESC, pin_order ASC NULLS LAST, id DESC OFFSET ");
	builder.push_bind(offset);
	builder.push(" LIMIT ");
	builder.push_bind(limit);

	let rows = builder.build_query_as::<NoteRow>().fetch_all(pool).await?;

	Ok(rows)
}

/// Writes the content columns and `updated_at`. Pin state and ownership are left untouched.
pub async fn update_note_content(conn: &mut PgConnection, note: &NoteRow) -> Result<()> {
	sqlx::query(
		"\
UPDATE notes
SET
	title = $1,
	description = $2,
	points = $3,
	reminder_time = $4,
	color = $5,
	tags = $6,
	updated_at = $7
WHERE id = $8",
	)
	.bind(note.title.as_str())
	.bind(note.description.as_deref())
	.bind(note.points.as_deref())
	.bind(note.reminder_time)
	.bind(note.color.as_deref())
	.bind(note.tags.as_deref())
	.bind(note.updated_at)
	.bind(note.id)
	.execute(conn)
	.await?;

	Ok(())
}

/// Returns the number of rows removed; zero when the id is unknown or hidden by `owner`.
pub async fn delete_note(conn: &mut PgConnection, id: i64, owner: Option<&str>) -> Result<u64> {
	let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM notes WHERE id = ");

	builder.push_bind(id);
	push_owner_filter(&mut builder, owner, " AND ");

	let result = builder.build().execute(conn).await?;

	Ok(result.rows_affected())
}

/// Blocks until no other transaction holds the tray of `scope`; released on commit or rollback.
pub async fn lock_pin_scope(conn: &mut PgConnection, scope: &PinScope) -> Result<()> {
	sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(scope.lock_key()).execute(conn).await?;

	Ok(())
}

pub async fn count_pinned(conn: &mut PgConnection, scope: &PinScope) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>(COUNT_PINNED_IN_SCOPE)
		.bind(scope.owner())
		.fetch_one(conn)
		.await?;

	Ok(count)
}

/// Moves every note behind `vacated` one slot forward.
pub async fn close_pin_gap(conn: &mut PgConnection, scope: &PinScope, vacated: i32) -> Result<u64> {
	let result =
		sqlx::query(CLOSE_PIN_GAP).bind(scope.owner()).bind(vacated).execute(conn).await?;

	Ok(result.rows_affected())
}

/// `(id, pin_order)` of every pinned note in the scope, in tray order.
pub async fn list_pinned_in_scope(
	conn: &mut PgConnection,
	scope: &PinScope,
) -> Result<Vec<(i64, i32)>> {
	let rows = sqlx::query_as::<_, (i64, i32)>(LIST_PINNED_IN_SCOPE)
		.bind(scope.owner())
		.fetch_all(conn)
		.await?;

	Ok(rows)
}

pub async fn set_pin_state(
	conn: &mut PgConnection,
	id: i64,
	pin_order: Option<i32>,
	updated_at: i64,
) -> Result<()> {
	sqlx::query("UPDATE notes SET pinned = $1, pin_order = $2, updated_at = $3 WHERE id = $4")
		.bind(pin_order.is_some())
		.bind(pin_order)
		.bind(updated_at)
		.bind(id)
		.execute(conn)
		.await?;

	Ok(())
}

/// Rewrites a pinned note's position without touching `updated_at`.
pub async fn set_pin_order(conn: &mut PgConnection, id: i64, pin_order: i32) -> Result<()> {
	sqlx::query("UPDATE notes SET pin_order = $1 WHERE id = $2 AND pinned")
		.bind(pin_order)
		.bind(id)
		.execute(conn)
		.await?;

	Ok(())
}

fn push_owner_filter<'a>(
	builder: &mut QueryBuilder<'a, Postgres>,
	owner: Option<&'a str>,
	keyword: &str,
) {
	if let Some(owner) = owner {
		builder.push(keyword);
		builder.push("owner_email = ");
		builder.push_bind(owner);
	}
}
