//! Post Entity
//!
//! A planned or completed trip. The owner is fixed at creation; only the
//! description and the completed flag change afterwards.

use chrono::{DateTime, Utc};
use kernel::id::{PostId, UserId};

use crate::error::{PostError, PostResult};

/// Longest accepted text field, in characters
pub const POST_TEXT_MAX_LENGTH: usize = 2000;

/// Client-supplied fields of a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub destination: String,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub person: i64,
    pub route: String,
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub post_id: PostId,
    owner: UserId,
    pub destination: String,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    pub person: i32,
    pub route: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn required_text(field: &str, value: &str) -> PostResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PostError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > POST_TEXT_MAX_LENGTH {
        return Err(PostError::Validation(format!(
            "{field} must be at most {POST_TEXT_MAX_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}

impl Post {
    pub fn create(owner: UserId, new: NewPost) -> PostResult<Self> {
        let destination = required_text("destination", &new.destination)?;
        let route = required_text("route", &new.route)?;
        let description = required_text("description", &new.description)?;

        if new.finish < new.start {
            return Err(PostError::Validation("finish must not be before start".into()));
        }
        let person = i32::try_from(new.person)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| PostError::Validation("person must be a positive number".into()))?;

        let now = Utc::now();
        Ok(Self {
            post_id: PostId::new(),
            owner,
            destination,
            start: new.start,
            finish: new.finish,
            person,
            route,
            description,
            completed: new.completed,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a persisted post
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        post_id: PostId,
        owner: UserId,
        destination: String,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
        person: i32,
        route: String,
        description: String,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            post_id,
            owner,
            destination,
            start,
            finish,
            person,
            route,
            description,
            completed,
            created_at,
            updated_at,
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn set_description(&mut self, description: &str) -> PostResult<()> {
        self.description = required_text("description", description)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_post() -> NewPost {
        NewPost {
            destination: "  Bandung ".into(),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            finish: Utc.with_ymd_and_hms(2024, 3, 3, 18, 0, 0).unwrap(),
            person: 2,
            route: "Jakarta - Bandung".into(),
            description: "Weekend trip".into(),
            completed: false,
        }
    }

    #[test]
    fn test_create_trims_and_sets_owner() {
        let owner = UserId::new();
        let post = Post::create(owner, new_post()).unwrap();
        assert_eq!(post.destination, "Bandung");
        assert_eq!(post.owner(), &owner);
        assert!(!post.completed);
    }

    #[test]
    fn test_create_validation() {
        let owner = UserId::new();

        let mut blank = new_post();
        blank.route = "   ".into();
        assert!(matches!(Post::create(owner, blank), Err(PostError::Validation(_))));

        let mut nobody = new_post();
        nobody.person = 0;
        assert!(Post::create(owner, nobody).is_err());

        let mut backwards = new_post();
        std::mem::swap(&mut backwards.start, &mut backwards.finish);
        assert!(Post::create(owner, backwards).is_err());
    }

    #[test]
    fn test_set_description_rejects_blank() {
        let mut post = Post::create(UserId::new(), new_post()).unwrap();
        assert!(post.set_description("  ").is_err());
        assert_eq!(post.description, "Weekend trip");

        post.set_description(" Rainy weekend ").unwrap();
        assert_eq!(post.description, "Rainy weekend");
    }
}
