//! # Review Deadline Policy
//!
//! Pure decision function for the 24-hour auto-publish rule. Stateless,
//! deterministic, and idempotent: repeated evaluation with the same inputs
//! yields the same result, so it is safe to call at any rate — from a
//! periodic sweeper, lazily on read, or both. Triggering the transition
//! exactly once is the caller's responsibility (`LifecycleManager`), not
//! the policy's.

use qnet_core::Timestamp;

use crate::question::{Question, QuestionState};

/// Whether a question should auto-publish at `now`.
///
/// True iff the review deadline has passed (inclusive) and the question
/// is still awaiting expert review. Resolved questions never re-fire.
pub fn should_auto_publish(question: &Question, now: Timestamp) -> bool {
    question.state == QuestionState::PendingReview && now >= question.review_deadline
}
