//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in QueryNet. These prevent
//! accidental identifier confusion — you cannot pass a `UserId` where a
//! `QuestionId` is expected, and an answer id never stands in for the
//! question that holds it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique identifier for a submitted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub Uuid);

/// Unique identifier for an answer within a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerId(pub Uuid);

/// Unique identifier for a platform user (student, expert, or admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl QuestionId {
    /// Generate a new random question identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a question identifier from its string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let uuid = Uuid::parse_str(s).map_err(|_| CoreError::InvalidIdentifier {
            kind: "question",
            value: s.to_string(),
        })?;
        Ok(Self(uuid))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AnswerId {
    /// Generate a new random answer identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl UserId {
    /// Generate a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user identifier from its string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let uuid = Uuid::parse_str(s).map_err(|_| CoreError::InvalidIdentifier {
            kind: "user",
            value: s.to_string(),
        })?;
        Ok(Self(uuid))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for AnswerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "question:{}", self.0)
    }
}

impl std::fmt::Display for AnswerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "answer:{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}
