//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::post::{NewPost, Post};
use crate::domain::list_query::{ListQuery, SortBy};
use crate::error::PostResult;

// ============================================================================
// Create
// ============================================================================

/// Create post request. Unknown keys (an `owner`, say) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub destination: String,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub person: i64,
    pub route: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            destination: req.destination,
            start: req.start,
            finish: req.finish,
            person: req.person,
            route: req.route,
            description: req.description,
            completed: req.completed,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub destination: String,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub person: i32,
    pub route: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.post_id.into_uuid(),
            owner: post.owner().into_uuid(),
            destination: post.destination.clone(),
            start: post.start,
            finish: post.finish,
            person: post.person,
            route: post.route.clone(),
            description: post.description.clone(),
            completed: post.completed,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

// ============================================================================
// List
// ============================================================================

/// Raw `GET /posts` query string.
///
/// Parsed leniently: a `completed` other than `true`/`false` and numbers that
/// do not parse are ignored. Only `sortBy` can fail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    pub completed: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sort_by: Option<String>,
}

impl ListPostsParams {
    pub fn into_query(self) -> PostResult<ListQuery> {
        let completed = match self.completed.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        let limit = self
            .limit
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|l| *l > 0);
        let skip = self
            .skip
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0);
        let sort = match self.sort_by {
            Some(raw) => raw.parse::<SortBy>()?,
            None => SortBy::default(),
        };

        Ok(ListQuery {
            completed,
            limit,
            skip,
            sort,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::list_query::{SortField, SortOrder};

    #[test]
    fn test_list_params_lenient() {
        let query = ListPostsParams {
            completed: Some("yes".into()),
            limit: Some("ten".into()),
            skip: Some("-3".into()),
            sort_by: None,
        }
        .into_query()
        .unwrap();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn test_list_params_parsed() {
        let query = ListPostsParams {
            completed: Some("true".into()),
            limit: Some("10".into()),
            skip: Some("20".into()),
            sort_by: Some("start:desc".into()),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.completed, Some(true));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.skip, 20);
        assert_eq!(query.sort.field, SortField::Start);
        assert_eq!(query.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_list_params_bad_sort_field() {
        let params = ListPostsParams {
            sort_by: Some("password:asc".into()),
            ..ListPostsParams::default()
        };
        assert!(params.into_query().is_err());
    }
}
