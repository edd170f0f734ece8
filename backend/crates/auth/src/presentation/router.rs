//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::context::AuthContext;
use crate::domain::repository::{AccountNotifier, AuthStore, OwnedResourcePurger};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_identity;

/// Create a generic Auth router for any store implementation
///
/// Takes the `AuthContext` rather than building it, so the same session
/// state can back other routers' identity middleware.
pub fn auth_router_generic<R, P, N>(ctx: AuthContext<R>, purger: P, notifier: N) -> Router
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let resolver = ctx.identity_resolver();
    let state = AuthAppState {
        ctx,
        purger: Arc::new(purger),
        notifier: Arc::new(notifier),
    };

    let public = Router::new()
        .route("/users", post(handlers::sign_up::<R, P, N>))
        .route("/users/login", post(handlers::sign_in::<R, P, N>))
        .route("/users/{id}/avatar", get(handlers::get_avatar::<R, P, N>))
        // Shadows `{id}/avatar`; "me" is never a user id, so other methods 404
        .route(
            "/users/me/avatar",
            post(handlers::upload_avatar::<R, P, N>)
                .delete(handlers::delete_avatar::<R, P, N>)
                .route_layer(middleware::from_fn_with_state(
                    resolver.clone(),
                    require_identity::<R>,
                ))
                .fallback(handlers::not_found),
        );

    let protected = Router::new()
        .route("/users/logout", post(handlers::sign_out::<R, P, N>))
        .route("/users/logoutAll", post(handlers::sign_out_all::<R, P, N>))
        .route(
            "/users/me",
            get(handlers::me)
                .patch(handlers::update_me::<R, P, N>)
                .delete(handlers::delete_me::<R, P, N>),
        )
        .route("/users/{id}", get(handlers::get_user::<R, P, N>))
        .route_layer(middleware::from_fn_with_state(
            resolver,
            require_identity::<R>,
        ));

    public.merge(protected).with_state(state)
}
