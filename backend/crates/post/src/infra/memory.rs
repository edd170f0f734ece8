//! In-Memory Post Store
//!
//! Posts kept in insertion order behind one `RwLock`. Every lookup filters
//! on the owner as well as the id.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use auth::{AuthError, AuthResult, OwnedResourcePurger, OwnedResourceStore};
use kernel::id::{PostId, UserId};
use tokio::sync::RwLock;

use crate::domain::entity::post::Post;
use crate::domain::list_query::{ListQuery, SortField, SortOrder};
use crate::domain::repository::PostRepository;
use crate::error::{PostError, PostResult};

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    /// Owners whose posts were purged; stands in for the users FK
    retired_owners: HashSet<UserId>,
}

/// Cloning shares the underlying state
#[derive(Clone, Default)]
pub struct InMemoryPostStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Post, b: &Post, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Start => a.start.cmp(&b.start),
        SortField::Finish => a.finish.cmp(&b.finish),
    }
}

impl PostRepository for InMemoryPostStore {
    async fn create(&self, post: &Post) -> PostResult<()> {
        let mut state = self.state.write().await;
        if state.retired_owners.contains(post.owner()) {
            return Err(PostError::Auth(AuthError::Unauthenticated));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn list_owned(&self, owner: &UserId, query: &ListQuery) -> PostResult<Vec<Post>> {
        let state = self.state.read().await;
        let mut owned: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.owner() == owner)
            .filter(|p| query.completed.is_none_or(|c| p.completed == c))
            .cloned()
            .collect();

        // Stable sort: ties follow insertion order, reversed for descending
        match query.sort.order {
            SortOrder::Asc => owned.sort_by(|a, b| compare(a, b, query.sort.field)),
            SortOrder::Desc => {
                owned.reverse();
                owned.sort_by(|a, b| compare(b, a, query.sort.field));
            }
        }

        Ok(owned
            .into_iter()
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn update_owned(&self, post: &Post) -> PostResult<bool> {
        let mut state = self.state.write().await;
        match state
            .posts
            .iter_mut()
            .find(|p| p.post_id == post.post_id && p.owner() == post.owner())
        {
            Some(stored) => {
                *stored = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl OwnedResourceStore for InMemoryPostStore {
    type Id = PostId;
    type Resource = Post;

    async fn find_owned(&self, id: &PostId, owner: &UserId) -> AuthResult<Option<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .iter()
            .find(|p| p.post_id == *id && p.owner() == owner)
            .cloned())
    }

    async fn delete_owned(&self, id: &PostId, owner: &UserId) -> AuthResult<Option<Post>> {
        let mut state = self.state.write().await;
        let position = state
            .posts
            .iter()
            .position(|p| p.post_id == *id && p.owner() == owner);
        Ok(position.map(|i| state.posts.remove(i)))
    }
}

impl OwnedResourcePurger for InMemoryPostStore {
    async fn delete_all_owned_by(&self, owner: &UserId) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        state.retired_owners.insert(*owner);
        let before = state.posts.len();
        state.posts.retain(|p| p.owner() != owner);
        Ok((before - state.posts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::post::NewPost;
    use crate::domain::list_query::SortBy;
    use chrono::{Duration, TimeZone, Utc};

    fn post(owner: UserId, day: u32, completed: bool) -> Post {
        let start = Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap();
        Post::create(
            owner,
            NewPost {
                destination: format!("Stop {day}"),
                start,
                finish: start + Duration::hours(10),
                person: 1,
                route: "coast road".into(),
                description: "day trip".into(),
                completed,
            },
        )
        .unwrap()
    }

    async fn seeded(owner: UserId) -> InMemoryPostStore {
        let store = InMemoryPostStore::new();
        for (day, completed) in [(5, false), (1, true), (3, false)] {
            store.create(&post(owner, day, completed)).await.unwrap();
        }
        store.create(&post(UserId::new(), 2, true)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_only_own_posts() {
        let owner = UserId::new();
        let store = seeded(owner).await;

        let posts = store.list_owned(&owner, &ListQuery::default()).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.owner() == &owner));
    }

    #[tokio::test]
    async fn test_list_filter_sort_page() {
        let owner = UserId::new();
        let store = seeded(owner).await;

        let done = ListQuery {
            completed: Some(true),
            ..ListQuery::default()
        };
        assert_eq!(store.list_owned(&owner, &done).await.unwrap().len(), 1);

        let by_start_desc = ListQuery {
            sort: SortBy {
                field: SortField::Start,
                order: SortOrder::Desc,
            },
            skip: 1,
            limit: Some(1),
            ..ListQuery::default()
        };
        let posts = store.list_owned(&owner, &by_start_desc).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].destination, "Stop 3");
    }

    #[tokio::test]
    async fn test_foreign_update_and_delete_miss() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let store = InMemoryPostStore::new();
        let mine = post(owner, 1, false);
        store.create(&mine).await.unwrap();

        assert!(store.find_owned(&mine.post_id, &stranger).await.unwrap().is_none());
        assert!(store.delete_owned(&mine.post_id, &stranger).await.unwrap().is_none());

        let forged = Post::restore(
            mine.post_id,
            stranger,
            mine.destination.clone(),
            mine.start,
            mine.finish,
            mine.person,
            mine.route.clone(),
            "hijacked".into(),
            true,
            mine.created_at,
            mine.updated_at,
        );
        assert!(!store.update_owned(&forged).await.unwrap());
        assert_eq!(
            store.find_owned(&mine.post_id, &owner).await.unwrap(),
            Some(mine)
        );
    }

    #[tokio::test]
    async fn test_purge() {
        let owner = UserId::new();
        let store = seeded(owner).await;

        assert_eq!(store.delete_all_owned_by(&owner).await.unwrap(), 3);
        assert!(store.list_owned(&owner, &ListQuery::default()).await.unwrap().is_empty());
        assert_eq!(store.state.read().await.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_create_after_purge_rejected() {
        let owner = UserId::new();
        let store = InMemoryPostStore::new();
        store.delete_all_owned_by(&owner).await.unwrap();

        let result = store.create(&post(owner, 1, false)).await;
        assert!(matches!(
            result,
            Err(PostError::Auth(AuthError::Unauthenticated))
        ));
        assert!(store.list_owned(&owner, &ListQuery::default()).await.unwrap().is_empty());

        store.create(&post(UserId::new(), 1, false)).await.unwrap();
    }
}
