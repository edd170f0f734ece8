//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes. On success
//! the resolved [`Identity`] is placed in the request extensions for
//! handlers to pick up with `Extension<Identity>`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::identity::IdentityResolver;
use crate::domain::repository::AuthStore;
use crate::error::AuthError;

/// Middleware that requires a valid bearer token
///
/// ```rust,ignore
/// router.route_layer(axum::middleware::from_fn_with_state(
///     resolver,
///     require_identity::<R>,
/// ))
/// ```
pub async fn require_identity<R>(
    State(resolver): State<IdentityResolver<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AuthStore,
{
    let identity = resolver.resolve(req.headers()).await?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
