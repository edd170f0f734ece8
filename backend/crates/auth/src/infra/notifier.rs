//! Account Notifier backed by the log
//!
//! Stands in for a mail provider: each notification becomes one structured
//! `info` event on the `auth::notifier` target.

use crate::domain::repository::AccountNotifier;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl AccountNotifier for TracingNotifier {
    async fn welcome(&self, email: &Email, name: &str) -> AuthResult<()> {
        tracing::info!(
            target: "auth::notifier",
            to = %email,
            subject = "Thanks for joining in!",
            "Welcome to the app, {name}. Let me know how you get along with the app."
        );
        Ok(())
    }

    async fn farewell(&self, email: &Email, name: &str) -> AuthResult<()> {
        tracing::info!(
            target: "auth::notifier",
            to = %email,
            subject = "Sorry to see you go!",
            "Goodbye, {name}. I hope to see you back sometime soon."
        );
        Ok(())
    }
}
