//! User Entity
//!
//! An account: login identity plus public profile. The password is only
//! reachable through `password()` / `set_password()`, and the setter takes an
//! already hashed value. The avatar image lives beside the user in the store
//! and is read and written on its own.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::value_object::{
    UserId, age::Age, email::Email, user_name::UserName, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lower-cased
    pub email: Email,
    pub name: UserName,
    password: UserPassword,
    pub age: Age,
    pub number: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, name: UserName, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            name,
            password,
            age: Age::default(),
            number: None,
            birthday: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a persisted user
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        user_id: UserId,
        email: Email,
        name: UserName,
        password: UserPassword,
        age: Age,
        number: Option<String>,
        birthday: Option<NaiveDate>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email,
            name,
            password,
            age,
            number,
            birthday,
            created_at,
            updated_at,
        }
    }

    pub fn password(&self) -> &UserPassword {
        &self.password
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
        self.touch();
    }

    pub fn set_number(&mut self, number: Option<String>) {
        self.number = number;
        self.touch();
    }

    pub fn set_birthday(&mut self, birthday: Option<NaiveDate>) {
        self.birthday = birthday;
        self.touch();
    }

    /// Apply the fields `changes` carries, leave the rest as stored
    pub fn apply(&mut self, changes: &ProfileChanges) {
        if let Some(name) = &changes.name {
            self.set_name(name.clone());
        }
        if let Some(email) = &changes.email {
            self.set_email(email.clone());
        }
        if let Some(password) = &changes.password {
            self.set_password(password.clone());
        }
        if let Some(number) = &changes.number {
            self.set_number(number.clone());
        }
        if let Some(birthday) = changes.birthday {
            self.set_birthday(birthday);
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A validated partial profile update
///
/// `None` keeps the stored value. For `number` and `birthday`, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    /// Already hashed
    pub password: Option<UserPassword>,
    pub number: Option<Option<String>>,
    pub birthday: Option<Option<NaiveDate>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.number.is_none()
            && self.birthday.is_none()
    }
}
