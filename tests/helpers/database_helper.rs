//! Test database helper utilities
//!
//! Database-backed tests run against the database named by
//! `TEST_DATABASE_URL` and skip (returning early) when it is unset, so the
//! pure-logic suite stays runnable without infrastructure. Tests share one
//! database and truncate between runs; keep them `#[serial]`.

use sqlx::PgPool;

pub struct TestDatabase {
    pub pool: PgPool,
}

impl TestDatabase {
    /// Connect to the test database, run migrations, and wipe all rows.
    /// Returns `None` when `TEST_DATABASE_URL` is not configured.
    pub async fn connect() -> Option<Self> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
                return None;
            }
        };

        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        sqlx::query("TRUNCATE registrations, events, users, colleges CASCADE")
            .execute(&pool)
            .await
            .expect("Failed to truncate test tables");

        Some(Self { pool })
    }
}
