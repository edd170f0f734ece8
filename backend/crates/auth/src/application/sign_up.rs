//! Sign Up Use Case
//!
//! Creates a new account and logs it in.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::context::AuthContext;
use crate::domain::entity::user::User;
use crate::domain::repository::{AccountNotifier, AuthStore};
use crate::domain::value_object::{age::Age, email::Email, user_name::UserName};
use crate::error::AuthResult;

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i64>,
    pub number: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    pub token: String,
}

/// Sign up use case
pub struct SignUpUseCase<R, N> {
    ctx: AuthContext<R>,
    notifier: Arc<N>,
}

impl<R, N> SignUpUseCase<R, N>
where
    R: AuthStore,
    N: AccountNotifier + Send + Sync,
{
    pub fn new(ctx: AuthContext<R>, notifier: Arc<N>) -> Self {
        Self { ctx, notifier }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let name = UserName::new(&input.name)?;
        let email = Email::new(&input.email)?;
        let age = input.age.map(Age::new).transpose()?;

        // Policy check happens here, before anything is stored
        let password = self.ctx.credentials.hash(input.password).await?;

        let mut user = User::new(email, name, password);
        if let Some(age) = age {
            user.age = age;
        }
        user.number = normalize_number(input.number);
        user.birthday = input.birthday;

        self.ctx.repo.create(&user).await?;
        let token = self.ctx.tokens.issue(&user.user_id).await?;

        if let Err(e) = self.notifier.welcome(&user.email, user.name.as_str()).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Welcome notification failed");
        }

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(SignUpOutput { user, token })
    }
}

/// Trim, and treat blank as absent
pub(crate) fn normalize_number(number: Option<String>) -> Option<String> {
    number
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
