//! PostgreSQL Repository Implementations
//!
//! Tables: `users` (profile, password hash, avatar) and `user_sessions` (one
//! row per live token digest, cascaded away with the user).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    session::{Session, TokenDigest},
    user::{ProfileChanges, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    UserId,
    age::Age,
    avatar::{Avatar, AvatarFormat},
    email::Email,
    user_name::UserName,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violation on `users.email` means the email is taken
fn map_email_conflict(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailTaken,
        _ => AuthError::Database(err),
    }
}

const USER_COLUMNS: &str =
    "user_id, email, name, password_hash, age, number, birthday, created_at, updated_at";

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                name,
                password_hash,
                age,
                number,
                birthday,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.name.as_str())
        .bind(user.password().as_phc_string())
        .bind(user.age.value())
        .bind(user.number.as_deref())
        .bind(user.birthday)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_email_conflict)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<User> {
        // Absent fields keep the stored column; the flags tell "clear" from "keep"
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash),
                number = CASE WHEN $5 THEN $6 ELSE number END,
                birthday = CASE WHEN $7 THEN $8 ELSE birthday END,
                updated_at = $9
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(changes.email.as_ref().map(|e| e.as_str()))
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.password.as_ref().map(|p| p.as_phc_string()))
        .bind(changes.number.is_some())
        .bind(changes.number.as_ref().and_then(|n| n.as_deref()))
        .bind(changes.birthday.is_some())
        .bind(changes.birthday.flatten())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_email_conflict)?;

        row.ok_or(AuthError::NotFound)?.into_user()
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        // user_sessions rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_avatar(&self, user_id: &UserId, avatar: Option<&Avatar>) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                avatar = $2,
                avatar_content_type = $3,
                updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(avatar.map(Avatar::bytes))
        .bind(avatar.map(|a| a.format().content_type()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_avatar(&self, user_id: &UserId) -> AuthResult<Option<Avatar>> {
        let row: Option<(Option<Vec<u8>>, Option<String>)> = sqlx::query_as(
            "SELECT avatar, avatar_content_type FROM users WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some((Some(bytes), Some(content_type))) = row else {
            return Ok(None);
        };
        let format = AvatarFormat::from_content_type(&content_type).ok_or_else(|| {
            AuthError::Internal(format!("Unknown stored avatar type: {content_type}"))
        })?;

        Ok(Some(Avatar::from_db(bytes, format)))
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn append(&self, user_id: &UserId, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, token_digest, issued_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, token_digest) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&session.digest.as_bytes()[..])
        .bind(session.issued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AuthError::NotFound,
            _ => AuthError::Database(e),
        })?;

        Ok(())
    }

    async fn contains(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_sessions
                WHERE user_id = $1 AND token_digest = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&digest.as_bytes()[..])
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn remove(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE user_id = $1 AND token_digest = $2")
                .bind(user_id.as_uuid())
                .bind(&digest.as_bytes()[..])
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: &UserId) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self, user_id: &UserId) -> AuthResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    age: i32,
    number: Option<String>,
    birthday: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User::restore(
            UserId::from_uuid(self.user_id),
            Email::from_db(self.email),
            UserName::from_db(self.name),
            UserPassword::from_db(self.password_hash)?,
            Age::from_db(self.age),
            self.number,
            self.birthday,
            self.created_at,
            self.updated_at,
        ))
    }
}
