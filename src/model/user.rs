use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised when validating a user identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("User id must not be empty")]
    Empty,

    #[error("User id must not start with '.': {0:?}")]
    LeadingDot(String),

    #[error("User id contains invalid character {ch:?}: {id:?}")]
    InvalidChar { id: String, ch: char },
}

/// Identifier of the user whose data is loaded
///
/// Embedded in per-user file names, so only ASCII alphanumerics, `-`, `_`
/// and `.` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdError::Empty);
        }
        if id.starts_with('.') {
            return Err(UserIdError::LeadingDot(id));
        }
        if let Some(ch) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(UserIdError::InvalidChar { id, ch });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
