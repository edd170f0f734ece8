//! Post Router

use std::sync::Arc;

use auth::{AuthStore, IdentityResolver, OwnershipAuthorizer, require_identity};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::PostStore;
use crate::presentation::handlers::{self, PostAppState};

/// Create a generic Post router for any store implementation
///
/// `resolver` must come from the same `AuthContext` as the auth router, or
/// tokens issued there will not resolve here.
pub fn post_router_generic<S, R>(store: S, resolver: IdentityResolver<R>) -> Router
where
    S: PostStore,
    R: AuthStore,
{
    let store = Arc::new(store);
    let state = PostAppState {
        authorizer: OwnershipAuthorizer::new(store.clone()),
        store,
    };

    Router::new()
        .route(
            "/posts",
            post(handlers::create_post::<S>).get(handlers::list_posts::<S>),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post::<S>)
                .patch(handlers::update_post::<S>)
                .delete(handlers::delete_post::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            resolver,
            require_identity::<R>,
        ))
        .with_state(state)
}
