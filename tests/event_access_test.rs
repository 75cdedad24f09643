//! Event store access layer integration tests

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use campus_connect::database::repositories::{CollegeRepository, EventRepository};
use campus_connect::models::event::{EventStatus, NewEvent};
use campus_connect::models::user::Role;
use campus_connect::services::events::{EventService, UpcomingEventsSource};
use campus_connect::CampusConnectError;
use helpers::*;

fn event_service(pool: &sqlx::PgPool, storage: campus_connect::services::StorageClient) -> EventService {
    EventService::new(
        EventRepository::new(pool.clone()),
        CollegeRepository::new(pool.clone()),
        storage,
    )
}

#[tokio::test]
#[serial]
async fn test_approved_upcoming_filters_and_sorts() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let other = seed_college(&db.pool, "IITB", "iitb.ac.in").await;

    seed_event(&db.pool, "late", &college, EventStatus::Approved, days_from_now(20)).await;
    seed_event(&db.pool, "soon", &college, EventStatus::Approved, days_from_now(2)).await;
    seed_event(&db.pool, "today", &college, EventStatus::Approved, today()).await;
    seed_event(&db.pool, "past", &college, EventStatus::Approved, days_from_now(-1)).await;
    seed_event(&db.pool, "pending", &college, EventStatus::Pending, days_from_now(3)).await;
    seed_event(&db.pool, "rejected", &college, EventStatus::Rejected, days_from_now(3)).await;
    seed_event(&db.pool, "elsewhere", &other, EventStatus::Approved, days_from_now(3)).await;

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);
    let events = service.list_approved_upcoming(&college.id).await.unwrap();

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["today", "soon", "late"]);
    assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
}

#[tokio::test]
#[serial]
async fn test_get_events_by_ids_collapses_duplicates_and_omits_unknown() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    seed_event(&db.pool, "a", &college, EventStatus::Approved, days_from_now(1)).await;
    seed_event(&db.pool, "b", &college, EventStatus::Pending, days_from_now(2)).await;

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);

    let ids: Vec<String> = ["a", "a", "b", "missing"].iter().map(|s| s.to_string()).collect();
    let events = service.get_events_by_ids(&ids).await.unwrap();

    let mut found: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    found.sort();
    assert_eq!(found, vec!["a", "b"]);
}

#[tokio::test]
#[serial]
async fn test_get_events_by_ids_chunks_past_batch_limit() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;

    let mut ids = Vec::new();
    for i in 0..45 {
        let id = format!("bulk-{i:02}");
        seed_event(&db.pool, &id, &college, EventStatus::Approved, days_from_now(1)).await;
        ids.push(id);
    }

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);
    let events = service.get_events_by_ids(&ids).await.unwrap();

    assert_eq!(events.len(), 45);
    let mut found: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
    found.sort();
    ids.sort();
    assert_eq!(found, ids);
}

#[tokio::test]
#[serial]
async fn test_create_event_status_follows_creator_role() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let admin = seed_user(&db.pool, "admin-1", Role::CollegeAdmin, &college).await;
    let lead = seed_user(&db.pool, "lead-1", Role::ClubLead, &college).await;

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);

    let draft = NewEvent {
        title: "Tech Talk".to_string(),
        description: "Guest lecture".to_string(),
        date: days_from_now(7),
        time: "17:00".to_string(),
        venue: "Seminar Hall".to_string(),
    };

    let approved = service.create_event(&admin, draft.clone(), &poster()).await.unwrap();
    assert_eq!(approved.status, EventStatus::Approved);
    assert!(approved.poster_url.contains(&format!("event-posters/{}/", approved.id)));

    let pending = service.create_event(&lead, draft, &poster()).await.unwrap();
    assert_eq!(pending.status, EventStatus::Pending);
    assert_eq!(pending.organizer_id, lead.uid);
    assert_eq!(pending.college_id, college.id);
}

#[tokio::test]
#[serial]
async fn test_student_creation_gated_by_fest_mode() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let student = seed_user(&db.pool, "student-1", Role::Student, &college).await;
    let colleges = CollegeRepository::new(db.pool.clone());

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);

    let draft = NewEvent {
        title: "Fest Stall".to_string(),
        description: "Robotics demo".to_string(),
        date: days_from_now(5),
        time: "10:00".to_string(),
        venue: "Quad".to_string(),
    };

    let denied = service.create_event(&student, draft.clone(), &poster()).await;
    assert_matches!(denied, Err(CampusConnectError::PermissionDenied(_)));

    colleges.set_fest_mode(&college.id, true).await.unwrap();
    let created = service.create_event(&student, draft, &poster()).await.unwrap();
    assert_eq!(created.status, EventStatus::Pending);
}

#[tokio::test]
#[serial]
async fn test_failed_upload_leaves_no_event_record() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let lead = seed_user(&db.pool, "lead-1", Role::ClubLead, &college).await;

    let (_storage_server, storage) = failing_storage().await;
    let service = event_service(&db.pool, storage);

    let result = service
        .create_event(
            &lead,
            NewEvent {
                title: "Doomed".to_string(),
                description: "Upload will fail".to_string(),
                date: days_from_now(5),
                time: "10:00".to_string(),
                venue: "Quad".to_string(),
            },
            &poster(),
        )
        .await;

    assert_matches!(result, Err(CampusConnectError::UploadFailed(_)));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
#[serial]
async fn test_moderation_queue_and_idempotent_status() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let admin = seed_user(&db.pool, "admin-1", Role::CollegeAdmin, &college).await;
    let student = seed_user(&db.pool, "student-1", Role::Student, &college).await;

    let first = seed_event(&db.pool, "first", &college, EventStatus::Pending, days_from_now(4)).await;
    // Ensure a later created_at for the second pending event.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    seed_event(&db.pool, "second", &college, EventStatus::Pending, days_from_now(1)).await;
    seed_event(&db.pool, "done", &college, EventStatus::Approved, days_from_now(2)).await;

    let (_storage_server, storage) = accepting_storage().await;
    let service = event_service(&db.pool, storage);

    // Oldest pending first, approved/rejected excluded.
    let queue = service.list_pending(&admin, &college.id).await.unwrap();
    let ids: Vec<&str> = queue.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);

    assert_matches!(
        service.list_pending(&student, &college.id).await,
        Err(CampusConnectError::PermissionDenied(_))
    );

    // Approving twice settles on the same state.
    let approved = service
        .set_event_status(&admin, &first.id, EventStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, EventStatus::Approved);
    let again = service
        .set_event_status(&admin, &first.id, EventStatus::Approved)
        .await
        .unwrap();
    assert_eq!(again.status, EventStatus::Approved);

    assert_matches!(
        service.set_event_status(&student, "second", EventStatus::Rejected).await,
        Err(CampusConnectError::PermissionDenied(_))
    );
    assert_matches!(
        service.set_event_status(&admin, "missing", EventStatus::Approved).await,
        Err(CampusConnectError::EventNotFound { .. })
    );
}
