//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{NewUser, Role, UpdateProfileRequest, User};
use crate::utils::errors::CampusConnectError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user profile, keyed by the auth provider uid
    pub async fn create(&self, request: NewUser) -> Result<User, CampusConnectError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (uid, display_name, email, photo_url, role, college_id, college_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING uid, display_name, email, photo_url, role, college_id, college_name, created_at
            "#,
        )
        .bind(&request.uid)
        .bind(&request.display_name)
        .bind(&request.email)
        .bind(&request.photo_url)
        .bind(request.role)
        .bind(&request.college_id)
        .bind(&request.college_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by uid
    pub async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, CampusConnectError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT uid, display_name, email, photo_url, role, college_id, college_name, created_at FROM users WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Assign a new role; the college binding never changes with it.
    pub async fn set_role(&self, uid: &str, role: Role) -> Result<User, CampusConnectError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2
            WHERE uid = $1
            RETURNING uid, display_name, email, photo_url, role, college_id, college_name, created_at
            "#,
        )
        .bind(uid)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| CampusConnectError::UserNotFound {
            uid: uid.to_string(),
        })
    }

    /// Update the owner-mutable profile fields; role and college stay fixed.
    pub async fn update_profile(
        &self,
        uid: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, CampusConnectError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                photo_url = COALESCE($3, photo_url)
            WHERE uid = $1
            RETURNING uid, display_name, email, photo_url, role, college_id, college_name, created_at
            "#,
        )
        .bind(uid)
        .bind(request.display_name)
        .bind(request.photo_url)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| CampusConnectError::UserNotFound {
            uid: uid.to_string(),
        })
    }
}
