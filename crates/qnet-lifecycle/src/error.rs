//! # Lifecycle Error Types
//!
//! Structured errors for the question lifecycle engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors name the offending field.
//! - Not-found errors carry the identifier that missed.
//! - State machine errors include the current state, attempted transition,
//!   and rejection reason.
//!
//! Every operation either succeeds with a defined postcondition or fails
//! with one of these kinds; nothing is retried internally.

use thiserror::Error;

/// Errors arising from question lifecycle operations.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Malformed submission (empty title, body, or answer content).
    #[error("validation error: {0}")]
    Validation(String),

    /// Question not found in the manager's store.
    #[error("question not found: {0}")]
    QuestionNotFound(String),

    /// Answer not found within the referenced question.
    #[error("answer {answer_id} not found in question {question_id}")]
    AnswerNotFound {
        /// The question that was searched.
        question_id: String,
        /// The answer identifier that missed.
        answer_id: String,
    },

    /// Attempted state transition is not valid from the current state.
    #[error("invalid transition for {question_id}: {from} -> {to}: {reason}")]
    InvalidTransition {
        /// The question whose transition was rejected.
        question_id: String,
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// Reason the transition was rejected.
        reason: String,
    },
}
