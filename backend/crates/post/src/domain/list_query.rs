//! Listing options for a user's posts
//!
//! `GET /posts?completed=true&limit=10&skip=20&sortBy=createdAt:desc`

use std::str::FromStr;

use crate::error::PostError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Start,
    Finish,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortBy {
    pub field: SortField,
    pub order: SortOrder,
}

impl FromStr for SortBy {
    type Err = PostError;

    /// `<field>` or `<field>:<asc|desc>`; anything but `desc` sorts ascending
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s.split_once(':').unwrap_or((s, "asc"));

        let field = match field {
            "createdAt" => SortField::CreatedAt,
            "start" => SortField::Start,
            "finish" => SortField::Finish,
            other => {
                return Err(PostError::Validation(format!(
                    "Cannot sort by {other:?}; use createdAt, start or finish"
                )));
            }
        };
        let order = if order == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };

        Ok(Self { field, order })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub completed: Option<bool>,
    pub limit: Option<usize>,
    pub skip: usize,
    pub sort: SortBy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_by() {
        assert_eq!(
            "createdAt:desc".parse::<SortBy>().unwrap(),
            SortBy {
                field: SortField::CreatedAt,
                order: SortOrder::Desc
            }
        );
        assert_eq!(
            "start".parse::<SortBy>().unwrap(),
            SortBy {
                field: SortField::Start,
                order: SortOrder::Asc
            }
        );
        assert_eq!(
            "finish:sideways".parse::<SortBy>().unwrap().order,
            SortOrder::Asc
        );
    }

    #[test]
    fn test_unknown_sort_field() {
        assert!(matches!(
            "owner:asc".parse::<SortBy>(),
            Err(PostError::Validation(_))
        ));
    }
}
