use std::collections::BTreeSet;

use sticky_config::{Config, Notes, Postgres, Security, Service, Storage};
use sticky_service::{
	CreateNoteRequest, Error, ListRequest, Note, OwnerFilter, StickyService, TogglePinResponse,
	UpdateNoteRequest,
};
use sticky_storage::db::Db;
use sticky_testkit::TestDatabase;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			root_path: None,
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 4 } },
		notes: Notes { default_page_size: 100, max_page_size: 500 },
		security: Security { bind_localhost_only: true },
	}
}

async fn test_service() -> Option<(TestDatabase, StickyService)> {
	let Some(base_dsn) = sticky_testkit::env_dsn() else {
		eprintln!("Skipping service tests; set STICKY_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = test_config(test_db.dsn().to_string());
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, StickyService::new(cfg, db)))
}

fn owner(email: &str) -> OwnerFilter {
	OwnerFilter::Owner(email.to_string())
}

fn note_request(title: &str) -> CreateNoteRequest {
	CreateNoteRequest {
		title: title.to_string(),
		description: None,
		points: Vec::new(),
		reminder_time: None,
		color: None,
		tags: Vec::new(),
	}
}

async fn create(service: &StickyService, filter: &OwnerFilter, title: &str) -> Note {
	service.create_note(filter, note_request(title)).await.expect("Failed to create note.")
}

async fn toggle(service: &StickyService, filter: &OwnerFilter, note_id: i64) -> TogglePinResponse {
	service.toggle_pin(filter, note_id).await.expect("Failed to toggle pin.")
}

async fn pin_orders(service: &StickyService, filter: &OwnerFilter) -> Vec<(i64, Option<i32>)> {
	service
		.list_notes(filter, ListRequest::default())
		.await
		.expect("Failed to list notes.")
		.into_iter()
		.filter(|note| note.pinned)
		.map(|note| (note.id, note.pin_order))
		.collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn create_applies_defaults_and_round_trips_points() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let mut req = note_request("Groceries");

	req.points = vec!["a".to_string(), "b".to_string()];

	let created = service.create_note(&alice, req).await.expect("Failed to create note.");

	assert_eq!(created.points, vec!["a".to_string(), "b".to_string()]);
	assert_eq!(created.color.as_deref(), Some("bg-yellow-200"));
	assert!(created.tags.is_empty());
	assert!(!created.pinned);
	assert_eq!(created.pin_order, None);
	assert_eq!(created.created_at, created.updated_at);
	assert_eq!(created.owner_email.as_deref(), Some("alice@example.com"));

	let empty = create(&service, &alice, "Empty").await;
	let listed = service
		.list_notes(&alice, ListRequest::default())
		.await
		.expect("Failed to list notes.");
	let read_back = listed.iter().find(|note| note.id == created.id).expect("Missing note.");
	let read_empty = listed.iter().find(|note| note.id == empty.id).expect("Missing note.");

	assert_eq!(read_back.points, vec!["a".to_string(), "b".to_string()]);
	assert!(read_empty.points.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn create_rejects_blank_title() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let result = service.create_note(&OwnerFilter::Any, note_request("   ")).await;

	assert!(matches!(result, Err(Error::InvalidRequest { .. })), "Unexpected result: {result:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn list_puts_pinned_first_then_newest() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let first = create(&service, &alice, "first").await;
	let second = create(&service, &alice, "second").await;
	let third = create(&service, &alice, "third").await;
	let fourth = create(&service, &alice, "fourth").await;

	toggle(&service, &alice, third.id).await;
	toggle(&service, &alice, first.id).await;

	let ids = service
		.list_notes(&alice, ListRequest::default())
		.await
		.expect("Failed to list notes.")
		.into_iter()
		.map(|note| note.id)
		.collect::<Vec<_>>();

	assert_eq!(ids, vec![third.id, first.id, fourth.id, second.id]);

	let page = service
		.list_notes(&alice, ListRequest { skip: Some(1), limit: Some(2) })
		.await
		.expect("Failed to list notes.")
		.into_iter()
		.map(|note| note.id)
		.collect::<Vec<_>>();

	assert_eq!(page, vec![first.id, fourth.id]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn list_filters_by_owner_only_when_supplied() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let bob = owner("bob@example.com");

	create(&service, &alice, "alice").await;
	create(&service, &bob, "bob").await;
	create(&service, &OwnerFilter::Any, "nobody").await;

	let alice_notes =
		service.list_notes(&alice, ListRequest::default()).await.expect("Failed to list notes.");
	let all_notes = service
		.list_notes(&OwnerFilter::Any, ListRequest::default())
		.await
		.expect("Failed to list notes.");

	assert_eq!(alice_notes.len(), 1);
	assert_eq!(alice_notes[0].title, "alice");
	assert_eq!(all_notes.len(), 3);

	let negative = service.list_notes(&alice, ListRequest { skip: Some(-1), limit: None }).await;

	assert!(matches!(negative, Err(Error::InvalidRequest { field: Some("skip"), .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn updating_title_only_leaves_other_fields() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let mut req = note_request("Groceries");

	req.description = Some("weekly".to_string());
	req.points = vec!["milk".to_string()];
	req.tags = vec!["home".to_string()];

	let created = service.create_note(&alice, req).await.expect("Failed to create note.");

	toggle(&service, &alice, created.id).await;

	let patch = UpdateNoteRequest {
		title: Some(Some("Errands".to_string())),
		..Default::default()
	};
	let updated =
		service.update_note(&alice, created.id, patch).await.expect("Failed to update note.");

	assert_eq!(updated.title, "Errands");
	assert_eq!(updated.description.as_deref(), Some("weekly"));
	assert_eq!(updated.points, vec!["milk".to_string()]);
	assert_eq!(updated.tags, vec!["home".to_string()]);
	assert!(updated.pinned);
	assert_eq!(updated.pin_order, Some(1));
	assert_eq!(updated.created_at, created.created_at);
	assert!(updated.updated_at >= created.updated_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn updating_unknown_or_foreign_note_is_not_found() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let bob = owner("bob@example.com");
	let note = create(&service, &alice, "mine").await;
	let unknown = service.update_note(&alice, note.id + 1_000, UpdateNoteRequest::default()).await;
	let foreign = service.update_note(&bob, note.id, UpdateNoteRequest::default()).await;

	assert!(matches!(unknown, Err(Error::NotFound { .. })), "Unexpected result: {unknown:?}");
	assert!(matches!(foreign, Err(Error::NotFound { .. })), "Unexpected result: {foreign:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn delete_is_idempotent() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let note = create(&service, &alice, "doomed").await;
	let keep = create(&service, &alice, "kept").await;

	service.delete_note(&alice, note.id).await.expect("Failed to delete note.");
	service.delete_note(&alice, note.id).await.expect("Repeated delete must succeed.");
	service.delete_note(&alice, keep.id + 1_000).await.expect("Unknown delete must succeed.");

	let remaining =
		service.list_notes(&alice, ListRequest::default()).await.expect("Failed to list notes.");

	assert_eq!(remaining.iter().map(|note| note.id).collect::<Vec<_>>(), vec![keep.id]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn fourth_pin_is_refused_without_side_effects() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let mut ids = Vec::new();

	for title in ["one", "two", "three", "four"] {
		ids.push(create(&service, &alice, title).await.id);
	}
	for (idx, id) in ids.iter().take(3).enumerate() {
		let response = toggle(&service, &alice, *id).await;

		assert_eq!(response, TogglePinResponse { pinned: true, pin_order: Some(idx as i32 + 1) });
	}

	let before = pin_orders(&service, &alice).await;
	let refused = service.toggle_pin(&alice, ids[3]).await;

	assert!(matches!(refused, Err(Error::PinLimit { max: 3 })), "Unexpected result: {refused:?}");
	assert_eq!(pin_orders(&service, &alice).await, before);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn unpinning_middle_note_closes_the_gap() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let first = create(&service, &alice, "one").await;
	let second = create(&service, &alice, "two").await;
	let third = create(&service, &alice, "three").await;

	for id in [first.id, second.id, third.id] {
		toggle(&service, &alice, id).await;
	}

	let response = toggle(&service, &alice, second.id).await;

	assert_eq!(response, TogglePinResponse { pinned: false, pin_order: None });
	assert_eq!(
		pin_orders(&service, &alice).await,
		vec![(first.id, Some(1)), (third.id, Some(2))]
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn deleting_pinned_note_closes_the_gap() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let bob = owner("bob@example.com");
	let first = create(&service, &alice, "one").await;
	let second = create(&service, &alice, "two").await;
	let third = create(&service, &alice, "three").await;
	let fourth = create(&service, &alice, "four").await;
	let bobs = create(&service, &bob, "bob's").await;

	for id in [first.id, second.id, third.id] {
		toggle(&service, &alice, id).await;
	}

	toggle(&service, &bob, bobs.id).await;

	// Hidden from bob, so nothing moves.
	service.delete_note(&bob, second.id).await.expect("Hidden delete must succeed.");

	assert_eq!(pin_orders(&service, &alice).await.len(), 3);

	service.delete_note(&alice, second.id).await.expect("Failed to delete note.");

	assert_eq!(
		pin_orders(&service, &alice).await,
		vec![(first.id, Some(1)), (third.id, Some(2))]
	);
	assert_eq!(pin_orders(&service, &bob).await, vec![(bobs.id, Some(1))]);

	let response = toggle(&service, &alice, fourth.id).await;

	assert_eq!(response, TogglePinResponse { pinned: true, pin_order: Some(3) });

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn reorder_walk_is_isolated_per_owner() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let bob = owner("bob@example.com");
	let a1 = create(&service, &alice, "a1").await;
	let a2 = create(&service, &alice, "a2").await;
	let b1 = create(&service, &bob, "b1").await;
	let b2 = create(&service, &bob, "b2").await;
	let loose = create(&service, &OwnerFilter::Any, "loose").await;

	for (filter, id) in [(&alice, a1.id), (&alice, a2.id), (&bob, b1.id), (&bob, b2.id)] {
		toggle(&service, filter, id).await;
	}

	// Ownerless notes share their own tray; the unscoped caller can reach them.
	let pinned = toggle(&service, &OwnerFilter::Any, loose.id).await;

	assert_eq!(pinned, TogglePinResponse { pinned: true, pin_order: Some(1) });

	toggle(&service, &alice, a1.id).await;

	assert_eq!(pin_orders(&service, &alice).await, vec![(a2.id, Some(1))]);
	assert_eq!(pin_orders(&service, &bob).await, vec![(b1.id, Some(1)), (b2.id, Some(2))]);

	let unpinned = toggle(&service, &OwnerFilter::Any, loose.id).await;

	assert_eq!(unpinned, TogglePinResponse { pinned: false, pin_order: None });
	assert_eq!(pin_orders(&service, &bob).await, vec![(b1.id, Some(1)), (b2.id, Some(2))]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn toggling_unknown_or_foreign_note_is_not_found() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let note = create(&service, &alice, "mine").await;
	let unknown = service.toggle_pin(&alice, note.id + 1_000).await;
	let foreign = service.toggle_pin(&owner("bob@example.com"), note.id).await;

	assert!(matches!(unknown, Err(Error::NotFound { .. })), "Unexpected result: {unknown:?}");
	assert!(matches!(foreign, Err(Error::NotFound { .. })), "Unexpected result: {foreign:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STICKY_PG_DSN to run."]
async fn concurrent_pins_never_overfill_the_tray() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = owner("alice@example.com");
	let mut ids = Vec::new();

	for idx in 0..8 {
		ids.push(create(&service, &alice, &format!("note {idx}")).await.id);
	}

	let service = std::sync::Arc::new(service);
	let mut handles = Vec::new();

	for id in ids {
		let service = service.clone();
		let alice = alice.clone();

		handles.push(tokio::spawn(async move { service.toggle_pin(&alice, id).await }));
	}

	let mut pinned = 0;

	for handle in handles {
		match handle.await.expect("Toggle task panicked.") {
			Ok(response) => {
				assert!(response.pinned);

				pinned += 1;
			},
			Err(Error::PinLimit { .. }) => {},
			Err(err) => panic!("Unexpected error: {err}"),
		}
	}

	let orders = pin_orders(&service, &alice)
		.await
		.into_iter()
		.map(|(_, order)| order.expect("Pinned note must have an order."))
		.collect::<BTreeSet<_>>();

	assert_eq!(pinned, 3);
	assert_eq!(orders, BTreeSet::from([1, 2, 3]));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
