//! College repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::college::{College, NewCollege};
use crate::utils::errors::CampusConnectError;
use crate::utils::helpers::normalize_domain;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct CollegeRepository {
    pool: PgPool,
}

impl CollegeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new college.
    ///
    /// The unique index on `domain` is the authority on duplicates; a
    /// conflict surfaces as `DuplicateDomain` rather than two colleges
    /// resolvable for the same email domain.
    pub async fn create(&self, request: NewCollege) -> Result<College, CampusConnectError> {
        let domain = normalize_domain(&request.domain);
        let college = sqlx::query_as::<_, College>(
            r#"
            INSERT INTO colleges (id, name, domain, fest_mode, created_at)
            VALUES ($1, $2, $3, false, $4)
            RETURNING id, name, domain, fest_mode, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&request.name)
        .bind(&domain)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                CampusConnectError::DuplicateDomain { domain: domain.clone() }
            }
            _ => CampusConnectError::Database(e),
        })?;

        Ok(college)
    }

    /// Find college by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<College>, CampusConnectError> {
        let college = sqlx::query_as::<_, College>(
            "SELECT id, name, domain, fest_mode, created_at FROM colleges WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(college)
    }

    /// Find the college registered for an email domain
    pub async fn find_by_domain(&self, domain: &str) -> Result<Option<College>, CampusConnectError> {
        let college = sqlx::query_as::<_, College>(
            "SELECT id, name, domain, fest_mode, created_at FROM colleges WHERE domain = $1",
        )
        .bind(normalize_domain(domain))
        .fetch_optional(&self.pool)
        .await?;

        Ok(college)
    }

    /// List all colleges
    pub async fn list(&self) -> Result<Vec<College>, CampusConnectError> {
        let colleges = sqlx::query_as::<_, College>(
            "SELECT id, name, domain, fest_mode, created_at FROM colleges ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(colleges)
    }

    /// Current festMode flag for a college
    pub async fn fest_mode(&self, college_id: &str) -> Result<bool, CampusConnectError> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT fest_mode FROM colleges WHERE id = $1")
                .bind(college_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(fest_mode,)| fest_mode)
            .ok_or_else(|| CampusConnectError::CollegeNotFound {
                college_id: college_id.to_string(),
            })
    }

    /// Toggle the festMode flag
    pub async fn set_fest_mode(
        &self,
        college_id: &str,
        enabled: bool,
    ) -> Result<College, CampusConnectError> {
        let college = sqlx::query_as::<_, College>(
            r#"
            UPDATE colleges
            SET fest_mode = $2
            WHERE id = $1
            RETURNING id, name, domain, fest_mode, created_at
            "#,
        )
        .bind(college_id)
        .bind(enabled)
        .fetch_optional(&self.pool)
        .await?;

        college.ok_or_else(|| CampusConnectError::CollegeNotFound {
            college_id: college_id.to_string(),
        })
    }
}
