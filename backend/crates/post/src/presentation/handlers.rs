//! HTTP Handlers
//!
//! Every route here sits behind `auth::require_identity`; the requester is
//! always `identity.user`.

use std::sync::Arc;

use auth::{Identity, OwnershipAuthorizer};
use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::PostId;
use serde_json::{Map, Value};

use crate::application::{
    CreatePostUseCase, DeletePostUseCase, GetPostUseCase, ListPostsUseCase, UpdatePostUseCase,
};
use crate::domain::repository::PostStore;
use crate::error::{PostError, PostResult};
use crate::presentation::dto::{CreatePostRequest, ListPostsParams, PostResponse};

/// Shared state for post handlers
pub struct PostAppState<S> {
    pub store: Arc<S>,
    pub authorizer: OwnershipAuthorizer<S>,
}

impl<S> Clone for PostAppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            authorizer: self.authorizer.clone(),
        }
    }
}

/// Ids that do not parse cannot name an existing post
fn parse_post_id(raw: &str) -> PostResult<PostId> {
    PostId::parse(raw).map_err(|_| PostError::NotFound)
}

/// POST /posts
pub async fn create_post<S: PostStore>(
    State(state): State<PostAppState<S>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreatePostRequest>,
) -> PostResult<impl IntoResponse> {
    let post = CreatePostUseCase::new(state.store.clone())
        .execute(&identity.user.user_id, req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(&post))))
}

/// GET /posts
pub async fn list_posts<S: PostStore>(
    State(state): State<PostAppState<S>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ListPostsParams>,
) -> PostResult<Json<Vec<PostResponse>>> {
    let query = params.into_query()?;
    let posts = ListPostsUseCase::new(state.store.clone())
        .execute(&identity.user.user_id, &query)
        .await?;

    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}

/// GET /posts/{id}
pub async fn get_post<S: PostStore>(
    State(state): State<PostAppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> PostResult<Json<PostResponse>> {
    let post_id = parse_post_id(&id)?;
    let post = GetPostUseCase::new(state.authorizer.clone())
        .execute(&identity.user.user_id, &post_id)
        .await?;

    Ok(Json(PostResponse::from(&post)))
}

/// PATCH /posts/{id}
pub async fn update_post<S: PostStore>(
    State(state): State<PostAppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> PostResult<Json<PostResponse>> {
    let post_id = parse_post_id(&id)?;
    let post = UpdatePostUseCase::new(state.store.clone())
        .execute(&identity.user.user_id, &post_id, patch)
        .await?;

    Ok(Json(PostResponse::from(&post)))
}

/// DELETE /posts/{id}
pub async fn delete_post<S: PostStore>(
    State(state): State<PostAppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> PostResult<Json<PostResponse>> {
    let post_id = parse_post_id(&id)?;
    let post = DeletePostUseCase::new(state.authorizer.clone())
        .execute(&identity.user.user_id, &post_id)
        .await?;

    Ok(Json(PostResponse::from(&post)))
}
