//! Test fixtures and builders

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus_connect::config::StorageConfig;
use campus_connect::database::repositories::{CollegeRepository, EventRepository, UserRepository};
use campus_connect::models::college::{College, NewCollege};
use campus_connect::models::event::{Event, EventStatus};
use campus_connect::models::user::{NewUser, Role, User};
use campus_connect::services::storage::{ImageUpload, StorageClient};

/// A wiremock-backed storage endpoint accepting every upload.
pub async fn accepting_storage() -> (MockServer, StorageClient) {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let client = storage_client(&server.uri());
    (server, client)
}

/// A wiremock-backed storage endpoint rejecting every upload.
pub async fn failing_storage() -> (MockServer, StorageClient) {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = storage_client(&server.uri());
    (server, client)
}

pub fn storage_client(base_url: &str) -> StorageClient {
    StorageClient::new(&StorageConfig {
        base_url: base_url.to_string(),
        public_base_url: "https://cdn.test.local/campus/".to_string(),
        timeout_seconds: 5,
    })
    .expect("storage client")
}

pub fn poster() -> ImageUpload {
    ImageUpload {
        file_name: "poster.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![1, 2, 3, 4],
    }
}

pub async fn seed_college(pool: &PgPool, name: &str, domain: &str) -> College {
    CollegeRepository::new(pool.clone())
        .create(NewCollege {
            name: name.to_string(),
            domain: domain.to_string(),
        })
        .await
        .expect("seed college")
}

pub async fn seed_user(pool: &PgPool, uid: &str, role: Role, college: &College) -> User {
    UserRepository::new(pool.clone())
        .create(NewUser {
            uid: uid.to_string(),
            display_name: format!("User {uid}"),
            email: format!("{uid}@{}", college.domain),
            photo_url: None,
            role,
            college_id: college.id.clone(),
            college_name: college.name.clone(),
        })
        .await
        .expect("seed user")
}

/// Build an event row directly, bypassing the service, for read-path tests.
pub fn event_row(
    id: &str,
    college: &College,
    status: EventStatus,
    date: NaiveDate,
) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {id}"),
        description: "Fixture event".to_string(),
        date,
        time: "18:00".to_string(),
        venue: "Main Auditorium".to_string(),
        poster_url: format!("https://cdn.test.local/campus/event-posters/{id}/poster.png"),
        organizer_id: "organizer-1".to_string(),
        organizer_name: "Fixture Club".to_string(),
        college_id: college.id.clone(),
        college_name: college.name.clone(),
        status,
        created_at: Utc::now(),
    }
}

pub async fn seed_event(
    pool: &PgPool,
    id: &str,
    college: &College,
    status: EventStatus,
    date: NaiveDate,
) -> Event {
    let event = event_row(id, college, status, date);
    EventRepository::new(pool.clone())
        .insert(&event)
        .await
        .expect("seed event");
    event
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_now(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}
