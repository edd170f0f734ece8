//! Profile Use Cases
//!
//! Reading any user's public profile, and partial updates of one's own.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::application::context::AuthContext;
use crate::application::ownership::{FieldPolicy, authorize_fields};
use crate::application::sign_up::normalize_number;
use crate::domain::entity::user::{ProfileChanges, User};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{UserId, email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Get profile use case
pub struct GetProfileUseCase<R> {
    ctx: AuthContext<R>,
}

impl<R: AuthStore> GetProfileUseCase<R> {
    pub fn new(ctx: AuthContext<R>) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        self.ctx
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

/// Typed view of an update body, once its keys passed the field policy.
///
/// `number` and `birthday` distinguish "absent" (`None`) from "null"
/// (`Some(None)`, clears the value).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserPatch {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    birthday: Option<Option<NaiveDate>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Update profile use case
pub struct UpdateProfileUseCase<R> {
    ctx: AuthContext<R>,
}

impl<R: AuthStore> UpdateProfileUseCase<R> {
    pub fn new(ctx: AuthContext<R>) -> Self {
        Self { ctx }
    }

    /// Validate `patch` and merge it into the stored user.
    ///
    /// All-or-nothing: a disallowed key or an invalid value leaves the stored
    /// user untouched. Fields the patch does not name are never written.
    pub async fn execute(&self, user_id: &UserId, patch: Map<String, Value>) -> AuthResult<User> {
        authorize_fields(&FieldPolicy::USER, &patch)?;

        let patch: UserPatch = serde_json::from_value(Value::Object(patch))
            .map_err(|e| AuthError::Validation(format!("Invalid update: {e}")))?;

        let mut changes = ProfileChanges {
            name: patch.name.map(UserName::new).transpose()?,
            email: patch.email.map(Email::new).transpose()?,
            password: None,
            number: patch.number.map(normalize_number),
            birthday: patch.birthday,
        };
        // Last, so a bad field above does not cost a hash
        if let Some(password) = patch.password {
            changes.password = Some(self.ctx.credentials.hash(password).await?);
        }

        if changes.is_empty() {
            return self
                .ctx
                .repo
                .find_by_id(user_id)
                .await?
                .ok_or(AuthError::NotFound);
        }

        let updated = self.ctx.repo.update_profile(user_id, &changes).await?;

        tracing::info!(user_id = %updated.user_id, "Profile updated");
        Ok(updated)
    }
}
