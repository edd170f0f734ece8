//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::Extension;
use serde_json::{Map, Value};

use crate::application::{
    AuthContext, AvatarUseCase, DeleteAccountUseCase, GetProfileUseCase, Identity, SignInInput,
    SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase, UpdateProfileUseCase,
};
use crate::domain::repository::{AccountNotifier, AuthStore, OwnedResourcePurger};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    SessionResponse, SignInRequest, SignOutAllResponse, SignUpRequest, UserResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, P, N> {
    pub ctx: AuthContext<R>,
    /// Deletes a user's resources when the account goes away
    pub purger: Arc<P>,
    pub notifier: Arc<N>,
}

impl<R, P, N> Clone for AuthAppState<R, P, N> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            purger: Arc::clone(&self.purger),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

/// Ids that do not parse cannot name an existing user
fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    UserId::parse(raw).map_err(|_| AuthError::NotFound)
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /users
pub async fn sign_up<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.ctx.clone(), state.notifier.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        age: req.age,
        number: req.number,
        birthday: req.birthday,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserResponse::from(&output.user),
            token: output.token,
        }),
    ))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /users/login
pub async fn sign_in<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.ctx.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(&output.user),
        token: output.token,
    }))
}

/// POST /users/logout
pub async fn sign_out<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<StatusCode>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    SignOutUseCase::new(state.ctx.clone())
        .execute(&identity)
        .await?;

    Ok(StatusCode::OK)
}

/// POST /users/logoutAll
pub async fn sign_out_all<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<Json<SignOutAllResponse>>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let revoked_sessions = SignOutUseCase::new(state.ctx.clone())
        .execute_all(&identity)
        .await?;

    Ok(Json(SignOutAllResponse { revoked_sessions }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /users/me
pub async fn me(Extension(identity): Extension<Identity>) -> Json<UserResponse> {
    Json(UserResponse::from(identity.user.as_ref()))
}

/// PATCH /users/me
pub async fn update_me<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
    Json(patch): Json<Map<String, Value>>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let updated = UpdateProfileUseCase::new(state.ctx.clone())
        .execute(&identity.user.user_id, patch)
        .await?;

    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /users/me
pub async fn delete_me<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let use_case = DeleteAccountUseCase::new(
        state.ctx.clone(),
        state.purger.clone(),
        state.notifier.clone(),
    );
    let deleted = use_case.execute(&identity).await?;

    Ok(Json(UserResponse::from(&deleted)))
}

/// GET /users/{id}
pub async fn get_user<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;
    let user = GetProfileUseCase::new(state.ctx.clone())
        .execute(&user_id)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Avatar
// ============================================================================

/// POST /users/me/avatar (raw PNG or JPEG body)
pub async fn upload_avatar<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> AuthResult<StatusCode>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    AvatarUseCase::new(state.ctx.clone())
        .upload(&identity.user.user_id, body.to_vec())
        .await?;

    Ok(StatusCode::OK)
}

/// DELETE /users/me/avatar
pub async fn delete_avatar<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<StatusCode>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    AvatarUseCase::new(state.ctx.clone())
        .remove(&identity.user.user_id)
        .await?;

    Ok(StatusCode::OK)
}

/// GET /users/{id}/avatar (public)
pub async fn get_avatar<R, P, N>(
    State(state): State<AuthAppState<R, P, N>>,
    Path(id): Path<String>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: OwnedResourcePurger + Send + Sync + 'static,
    N: AccountNotifier + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;
    let avatar = AvatarUseCase::new(state.ctx.clone())
        .fetch(&user_id)
        .await?;

    Ok((
        [(header::CONTENT_TYPE, avatar.format().content_type())],
        avatar.into_bytes(),
    ))
}

/// Any other method on /users/me/avatar
pub async fn not_found() -> AuthError {
    AuthError::NotFound
}
