//! # qnet-lifecycle — Question Lifecycle Engine
//!
//! The engine behind QueryNet's expert-review flow: questions are submitted
//! into a `PendingReview` state and resolve exactly once, either by the
//! first expert answer (`ExpertAnswered`) or by expiry of the 24-hour
//! review window (`PublicAutoPublished`). Both terminal states are final;
//! later answers still append but never change state.
//!
//! ## Modules
//!
//! - **Question** (`question.rs`): the question entity, answers, categories,
//!   and the validated state machine with its transition log.
//!
//! - **Policy** (`policy.rs`): the pure deadline decision
//!   `should_auto_publish(question, now)`. Stateless and idempotent.
//!
//! - **Clock** (`clock.rs`): the `Clock` trait with `SystemClock` and a
//!   settable `ManualClock`. The engine never reads wall-clock time itself.
//!
//! - **Manager** (`manager.rs`): `LifecycleManager`, the single owner of
//!   all question state. DashMap-backed; every transition-causing mutation
//!   runs read-validate-update under one entry lock, so racing expert
//!   answers and deadline sweeps settle to exactly one winner.
//!
//! - **Sweeper** (`sweeper.rs`): optional tokio task that periodically
//!   drives `check_deadlines` through a `Clock`.
//!
//! The manager is consumed by an external presentation layer through plain
//! data values; persistence, transport, and role verification are external
//! collaborators.

pub mod clock;
pub mod error;
pub mod manager;
pub mod policy;
pub mod question;
pub mod sweeper;

// ─── Re-exports ──────────────────────────────────────────────────────

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LifecycleError;
pub use manager::{LifecycleManager, LifecycleStats};
pub use policy::should_auto_publish;
pub use question::{
    Answer, Category, Question, QuestionState, TransitionCause, TransitionRecord, Vote,
    REVIEW_WINDOW_HOURS,
};
pub use sweeper::{DeadlineSweeper, DEFAULT_SWEEP_PERIOD};
