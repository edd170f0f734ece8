//! Age Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const AGE_MAX: i64 = 150;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Age(i32);

impl Age {
    pub fn new(value: i64) -> AppResult<Self> {
        if value < 0 {
            return Err(AppError::bad_request("Age must be a positive number"));
        }
        if value > AGE_MAX {
            return Err(AppError::bad_request(format!("Age must be at most {AGE_MAX}")));
        }
        // Bounded above, cannot truncate
        Ok(Self(value as i32))
    }

    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}
