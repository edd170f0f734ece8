//! In-Memory Repository Implementation
//!
//! Same contract as the Postgres store, held in a `RwLock`ed map. Used when
//! no `DATABASE_URL` is configured, and by tests. Every trait method takes
//! the lock once, so each one is atomic.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::{
    session::{Session, TokenDigest},
    user::{ProfileChanges, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{UserId, avatar::Avatar, email::Email};
use crate::error::{AuthError, AuthResult};

struct UserRecord {
    user: User,
    avatar: Option<Avatar>,
    sessions: Vec<Session>,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserRecord>,
    /// email -> owner, enforces uniqueness
    emails: HashMap<Email, UserId>,
}

/// Cloning shares the underlying state
#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryAuthStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if state.emails.contains_key(&user.email) {
            return Err(AuthError::EmailTaken);
        }

        state.emails.insert(user.email.clone(), user.user_id);
        state.users.insert(
            user.user_id,
            UserRecord {
                user: user.clone(),
                avatar: None,
                sessions: Vec::new(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).map(|r| r.user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .map(|r| r.user.clone()))
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<User> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let record = state.users.get_mut(user_id).ok_or(AuthError::NotFound)?;

        if let Some(email) = changes.email.as_ref().filter(|e| **e != record.user.email) {
            if state.emails.contains_key(email) {
                return Err(AuthError::EmailTaken);
            }
            state.emails.remove(&record.user.email);
            state.emails.insert(email.clone(), *user_id);
        }

        record.user.apply(changes);
        Ok(record.user.clone())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        match state.users.remove(user_id) {
            Some(record) => {
                state.emails.remove(&record.user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_avatar(&self, user_id: &UserId, avatar: Option<&Avatar>) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        match state.users.get_mut(user_id) {
            Some(record) => {
                record.avatar = avatar.cloned();
                record.user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_avatar(&self, user_id: &UserId) -> AuthResult<Option<Avatar>> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).and_then(|r| r.avatar.clone()))
    }
}

impl SessionRepository for InMemoryAuthStore {
    async fn append(&self, user_id: &UserId, session: &Session) -> AuthResult<()> {
        let mut state = self.state.write().await;
        let record = state.users.get_mut(user_id).ok_or(AuthError::NotFound)?;
        record.sessions.push(session.clone());
        Ok(())
    }

    async fn contains(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(user_id)
            .is_some_and(|r| r.sessions.iter().any(|s| s.digest.matches(digest))))
    }

    async fn remove(&self, user_id: &UserId, digest: &TokenDigest) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        let Some(record) = state.users.get_mut(user_id) else {
            return Ok(false);
        };

        let before = record.sessions.len();
        record.sessions.retain(|s| !s.digest.matches(digest));
        Ok(record.sessions.len() < before)
    }

    async fn clear(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        Ok(state
            .users
            .get_mut(user_id)
            .map(|r| std::mem::take(&mut r.sessions).len() as u64)
            .unwrap_or(0))
    }

    async fn count(&self, user_id: &UserId) -> AuthResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(user_id)
            .map(|r| r.sessions.len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
    use crate::test_support::seed_user;
    use chrono::Utc;
    use platform::password::ClearTextPassword;

    fn email_change(email: &str) -> ProfileChanges {
        ProfileChanges {
            email: Some(Email::new(email).unwrap()),
            ..ProfileChanges::default()
        }
    }

    #[tokio::test]
    async fn test_email_unique_on_create_and_update() {
        let store = InMemoryAuthStore::new();
        let jess = seed_user(&store, "jess@example.com").await;
        let sam = seed_user(&store, "sam@example.com").await;

        let mut dup = jess.clone();
        dup.user_id = UserId::new();
        assert!(matches!(store.create(&dup).await, Err(AuthError::EmailTaken)));

        assert!(matches!(
            store.update_profile(&sam.user_id, &email_change("jess@example.com")).await,
            Err(AuthError::EmailTaken)
        ));

        // Freed email can be reused
        store
            .update_profile(&sam.user_id, &email_change("samuel@example.com"))
            .await
            .unwrap();
        assert!(
            store
                .find_by_email(&Email::new("sam@example.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .find_by_email(&Email::new("samuel@example.com").unwrap())
                .await
                .unwrap()
                .is_some()
        );

        // Re-sending one's own email is not a conflict
        store
            .update_profile(&sam.user_id, &email_change("samuel@example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_profile_update_keeps_sessions() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let session = Session::for_token("tok", Utc::now());
        store.append(&user.user_id, &session).await.unwrap();

        let changes = ProfileChanges {
            number: Some(Some("555-0100".into())),
            ..ProfileChanges::default()
        };
        store.update_profile(&user.user_id, &changes).await.unwrap();

        assert!(store.contains(&user.user_id, &session.digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_profile_update_writes_only_given_fields() {
        let store = InMemoryAuthStore::new();
        let snapshot = seed_user(&store, "jess@example.com").await;

        let new_password = UserPassword::from_hashed(
            ClearTextPassword::unchecked("another-secret".into())
                .hash(None)
                .unwrap(),
        );
        let password_change = ProfileChanges {
            password: Some(new_password.clone()),
            ..ProfileChanges::default()
        };
        store
            .update_profile(&snapshot.user_id, &password_change)
            .await
            .unwrap();

        // Built from the same snapshot, after the password moved on
        let name_change = ProfileChanges {
            name: Some(UserName::new("Jessica").unwrap()),
            ..ProfileChanges::default()
        };
        let stored = store
            .update_profile(&snapshot.user_id, &name_change)
            .await
            .unwrap();

        assert_eq!(stored.name.as_str(), "Jessica");
        assert_eq!(stored.password().as_phc_string(), new_password.as_phc_string());
        assert!(matches!(
            store.update_profile(&UserId::new(), &name_change).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_drops_everything() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;
        let session = Session::for_token("tok", Utc::now());
        store.append(&user.user_id, &session).await.unwrap();

        assert!(store.delete(&user.user_id).await.unwrap());
        assert!(!store.delete(&user.user_id).await.unwrap());
        assert!(!store.contains(&user.user_id, &session.digest).await.unwrap());
        assert!(store.find_by_email(&user.email).await.unwrap().is_none());
        assert!(matches!(
            store.append(&user.user_id, &session).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let store = InMemoryAuthStore::new();
        let user = seed_user(&store, "jess@example.com").await;

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                let user_id = user.user_id;
                tokio::spawn(async move {
                    let session = Session::for_token(&format!("tok-{i}"), Utc::now());
                    store.append(&user_id, &session).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.count(&user.user_id).await.unwrap(), 32);
    }
}
