//! Ownership Authorization
//!
//! Gatekeeper for user-owned resources and for partial updates.
//!
//! - Reads and deletes go through [`OwnershipAuthorizer`], which only ever
//!   asks the store for `(id, owner)`. A resource owned by someone else comes
//!   back as [`Access::NotFound`], exactly like one that does not exist.
//! - Partial updates are screened by a [`FieldPolicy`] first: every key must
//!   be on the allow-list, or nothing is applied.

use std::sync::Arc;

use crate::domain::repository::OwnedResourceStore;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Outcome of an ownership-scoped lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<R> {
    Allowed(R),
    /// Absent, or owned by another user
    NotFound,
}

impl<R> Access<R> {
    pub fn into_result(self) -> AuthResult<R> {
        match self {
            Access::Allowed(resource) => Ok(resource),
            Access::NotFound => Err(AuthError::NotFound),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed(_))
    }
}

impl<R> From<Option<R>> for Access<R> {
    fn from(value: Option<R>) -> Self {
        value.map_or(Access::NotFound, Access::Allowed)
    }
}

pub struct OwnershipAuthorizer<S> {
    store: Arc<S>,
}

impl<S> Clone for OwnershipAuthorizer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: OwnedResourceStore> OwnershipAuthorizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn authorize_read(
        &self,
        requester: &UserId,
        id: &S::Id,
    ) -> AuthResult<Access<S::Resource>> {
        Ok(self.store.find_owned(id, requester).await?.into())
    }

    /// Deletes in the same step as the ownership check
    pub async fn authorize_delete(
        &self,
        requester: &UserId,
        id: &S::Id,
    ) -> AuthResult<Access<S::Resource>> {
        Ok(self.store.delete_owned(id, requester).await?.into())
    }
}

/// Allow-list of fields a client may change on one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    allowed: &'static [&'static str],
}

impl FieldPolicy {
    /// Profile fields a user may change on their own account
    pub const USER: FieldPolicy =
        FieldPolicy::new(&["name", "email", "password", "number", "birthday"]);

    /// Fields an owner may change on a post
    pub const POST: FieldPolicy = FieldPolicy::new(&["description", "completed"]);

    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }

    /// `AuthError::InvalidField` listing every disallowed key.
    ///
    /// An empty update passes.
    pub fn authorize<'a>(&self, requested: impl IntoIterator<Item = &'a str>) -> AuthResult<()> {
        let mut rejected: Vec<String> = requested
            .into_iter()
            .filter(|field| !self.allowed.contains(field))
            .map(str::to_owned)
            .collect();

        if rejected.is_empty() {
            Ok(())
        } else {
            rejected.sort();
            rejected.dedup();
            Err(AuthError::InvalidField(rejected))
        }
    }
}

/// Screen the keys of a JSON patch body against `policy`
pub fn authorize_fields(
    policy: &FieldPolicy,
    patch: &serde_json::Map<String, serde_json::Value>,
) -> AuthResult<()> {
    policy.authorize(patch.keys().map(String::as_str))
}
