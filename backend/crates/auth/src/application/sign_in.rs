//! Sign In Use Case
//!
//! Checks email + password and issues a fresh session token.

use crate::application::context::AuthContext;
use crate::domain::entity::user::User;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub token: String,
}

/// Sign in use case
pub struct SignInUseCase<R> {
    ctx: AuthContext<R>,
}

impl<R: AuthStore> SignInUseCase<R> {
    pub fn new(ctx: AuthContext<R>) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let user = match Email::new(&input.email) {
            Ok(email) => self.ctx.repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        // Unknown email and wrong password must look the same, timing included
        let Some(user) = user else {
            self.ctx.credentials.verify_absent(input.password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .ctx
            .credentials
            .verify(input.password, user.password())
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.ctx.tokens.issue(&user.user_id).await?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { user, token })
    }
}
