//! Registration index integration tests

mod helpers;

use std::time::Duration;

use serial_test::serial;
use tokio::time::timeout;

use campus_connect::database::repositories::RegistrationRepository;
use campus_connect::models::event::EventStatus;
use campus_connect::models::user::Role;
use campus_connect::services::hub::ChangeHub;
use campus_connect::services::registrations::RegistrationIndex;
use helpers::*;

fn registration_index(pool: &sqlx::PgPool, hub: ChangeHub) -> RegistrationIndex {
    RegistrationIndex::new(RegistrationRepository::new(pool.clone()), hub)
}

#[tokio::test]
#[serial]
async fn test_register_is_idempotent() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let user = seed_user(&db.pool, "student-1", Role::Student, &college).await;
    let event = seed_event(&db.pool, "fest-1", &college, EventStatus::Approved, days_from_now(3)).await;

    let index = registration_index(&db.pool, ChangeHub::new());

    index.register(&event.id, &user.uid, &user.display_name).await.unwrap();
    index.register(&event.id, &user.uid, &user.display_name).await.unwrap();

    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2",
    )
    .bind(&event.id)
    .bind(&user.uid)
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(count.0, 1);
    assert!(index.is_registered(&event.id, &user.uid).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_register_unregister_round_trip() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let user = seed_user(&db.pool, "student-1", Role::Student, &college).await;
    let event = seed_event(&db.pool, "fest-1", &college, EventStatus::Approved, days_from_now(3)).await;

    let index = registration_index(&db.pool, ChangeHub::new());

    index.register(&event.id, &user.uid, &user.display_name).await.unwrap();
    assert!(index.is_registered(&event.id, &user.uid).await.unwrap());

    index.unregister(&event.id, &user.uid).await.unwrap();
    assert!(!index.is_registered(&event.id, &user.uid).await.unwrap());

    // Removing an absent registration is not an error.
    index.unregister(&event.id, &user.uid).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_registered_event_ids_scoped_to_user() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let alice = seed_user(&db.pool, "alice", Role::Student, &college).await;
    let bob = seed_user(&db.pool, "bob", Role::Student, &college).await;
    let first = seed_event(&db.pool, "fest-1", &college, EventStatus::Approved, days_from_now(3)).await;
    let second = seed_event(&db.pool, "fest-2", &college, EventStatus::Approved, days_from_now(4)).await;

    let index = registration_index(&db.pool, ChangeHub::new());
    index.register(&first.id, &alice.uid, &alice.display_name).await.unwrap();
    index.register(&second.id, &alice.uid, &alice.display_name).await.unwrap();
    index.register(&first.id, &bob.uid, &bob.display_name).await.unwrap();

    let alice_ids = index.registered_event_ids(&alice.uid).await.unwrap();
    assert_eq!(alice_ids.len(), 2);
    assert!(alice_ids.contains(&first.id) && alice_ids.contains(&second.id));

    let bob_ids = index.registered_event_ids(&bob.uid).await.unwrap();
    assert_eq!(bob_ids.len(), 1);
    assert!(bob_ids.contains(&first.id));

    // The per-event attendee list carries the captured display names.
    let attendees = index.attendees(&first.id).await.unwrap();
    let names: Vec<&str> = attendees.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["User alice", "User bob"]);
}

#[tokio::test]
#[serial]
async fn test_subscription_tracks_register_and_unregister() {
    let Some(db) = TestDatabase::connect().await else { return };
    let college = seed_college(&db.pool, "SVECW", "svecw.edu.in").await;
    let user = seed_user(&db.pool, "student-1", Role::Student, &college).await;
    let other = seed_user(&db.pool, "student-2", Role::Student, &college).await;
    let event = seed_event(&db.pool, "fest-1", &college, EventStatus::Approved, days_from_now(3)).await;

    let index = registration_index(&db.pool, ChangeHub::new());
    let mut subscription = index.subscribe_user_registrations(&user.uid).await.unwrap();
    assert!(subscription.current().is_empty());

    index.register(&event.id, &user.uid, &user.display_name).await.unwrap();
    assert!(timeout(Duration::from_secs(2), subscription.changed()).await.unwrap());
    assert!(subscription.current().contains(&event.id));

    index.unregister(&event.id, &user.uid).await.unwrap();
    assert!(timeout(Duration::from_secs(2), subscription.changed()).await.unwrap());
    assert!(subscription.current().is_empty());

    // Another user's activity does not wake this subscription.
    index.register(&event.id, &other.uid, &other.display_name).await.unwrap();
    assert!(
        timeout(Duration::from_millis(200), subscription.changed())
            .await
            .is_err()
    );
}
