//! PostgreSQL Post Repository
//!
//! Table: `posts`, owner column `owner_id` referencing `users`. Every
//! statement that touches a single post filters on both `post_id` and
//! `owner_id`.

use auth::{AuthError, AuthResult, OwnedResourcePurger, OwnedResourceStore};
use chrono::{DateTime, Utc};
use kernel::id::{PostId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::post::Post;
use crate::domain::list_query::{ListQuery, SortField, SortOrder};
use crate::domain::repository::PostRepository;
use crate::error::{PostError, PostResult};

/// PostgreSQL-backed post store
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "post_id, owner_id, destination, start_at, finish_at, person, \
                            route, description, completed, created_at, updated_at";

/// Column names come from this match only, never from the request
fn order_by(query: &ListQuery) -> String {
    let column = match query.sort.field {
        SortField::CreatedAt => "created_at",
        SortField::Start => "start_at",
        SortField::Finish => "finish_at",
    };
    let direction = match query.sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    // Ties go by creation time in the same direction, so paging is stable
    format!("{column} {direction}, created_at {direction}, post_id {direction}")
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> PostResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                owner_id,
                destination,
                start_at,
                finish_at,
                person,
                route,
                description,
                completed,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.owner().as_uuid())
        .bind(&post.destination)
        .bind(post.start)
        .bind(post.finish)
        .bind(post.person)
        .bind(&post.route)
        .bind(&post.description)
        .bind(post.completed)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // Owner deleted after the request authenticated
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                PostError::Auth(AuthError::Unauthenticated)
            }
            _ => PostError::Database(e),
        })?;

        Ok(())
    }

    async fn list_owned(&self, owner: &UserId, query: &ListQuery) -> PostResult<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE owner_id = $1
              AND ($2::boolean IS NULL OR completed = $2)
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            order_by(query)
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(owner.as_uuid())
            .bind(query.completed)
            .bind(query.limit.map(to_i64))
            .bind(to_i64(query.skip))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn update_owned(&self, post: &Post) -> PostResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                description = $3,
                completed = $4,
                updated_at = $5
            WHERE post_id = $1 AND owner_id = $2
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.owner().as_uuid())
        .bind(&post.description)
        .bind(post.completed)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Ownership Ports
// ============================================================================

impl OwnedResourceStore for PgPostRepository {
    type Id = PostId;
    type Resource = Post;

    async fn find_owned(&self, id: &PostId, owner: &UserId) -> AuthResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE post_id = $1 AND owner_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn delete_owned(&self, id: &PostId, owner: &UserId) -> AuthResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "DELETE FROM posts WHERE post_id = $1 AND owner_id = $2 RETURNING {POST_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }
}

impl OwnedResourcePurger for PgPostRepository {
    async fn delete_all_owned_by(&self, owner: &UserId) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE owner_id = $1")
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    owner_id: Uuid,
    destination: String,
    start_at: DateTime<Utc>,
    finish_at: DateTime<Utc>,
    person: i32,
    route: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post::restore(
            PostId::from_uuid(self.post_id),
            UserId::from_uuid(self.owner_id),
            self.destination,
            self.start_at,
            self.finish_at,
            self.person,
            self.route,
            self.description,
            self.completed,
            self.created_at,
            self.updated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::list_query::SortBy;

    #[test]
    fn test_order_by_uses_fixed_columns() {
        let query = ListQuery {
            sort: SortBy {
                field: SortField::Finish,
                order: SortOrder::Desc,
            },
            ..ListQuery::default()
        };
        assert!(order_by(&query).starts_with("finish_at DESC"));
        assert!(order_by(&ListQuery::default()).starts_with("created_at ASC"));
    }
}
