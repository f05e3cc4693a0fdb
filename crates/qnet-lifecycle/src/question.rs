//! # Question Lifecycle State Machine
//!
//! Models the lifecycle of a submitted question under expert review,
//! including the 24-hour auto-publish window.
//!
//! ## States
//!
//! ```text
//! PendingReview ──[first expert answer]──▶ ExpertAnswered      (terminal)
//!       │
//!       └────────[now >= review deadline]─▶ PublicAutoPublished (terminal)
//! ```
//!
//! Initial state: `PendingReview`. No transition leaves a terminal state,
//! and exactly one of the two terminal transitions may fire per question —
//! whichever mutation is applied first wins. Later answers still append to
//! the answer list but never change state.
//!
//! ## Design Decision
//!
//! With three states and two transitions, an enum with validated
//! `Result`-returning transition methods is the right weight; a typestate
//! encoding would add three types and generic plumbing without proportional
//! safety benefit. The invariants (forward-only, terminal-once) are
//! straightforward to validate at runtime and are exercised by the
//! property tests in `manager.rs`.

use serde::{Deserialize, Serialize};

use qnet_core::{AnswerId, QuestionId, Timestamp, UserId};

use crate::error::LifecycleError;

/// Length of the expert review window, in hours.
///
/// A question left unreviewed for this long is auto-published to the
/// community. The deadline is computed once at submission and never
/// recomputed.
pub const REVIEW_WINDOW_HOURS: i64 = 24;

// ─── Category ────────────────────────────────────────────────────────

/// Academic category of a question.
///
/// Fixed set matching the platform's submission form. Serialized
/// kebab-case (`computer-science`, `mathematics`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ComputerScience,
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    Engineering,
    Business,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ComputerScience => "computer-science",
            Self::Mathematics => "mathematics",
            Self::Physics => "physics",
            Self::Chemistry => "chemistry",
            Self::Biology => "biology",
            Self::Engineering => "engineering",
            Self::Business => "business",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

// ─── Question State ──────────────────────────────────────────────────

/// The lifecycle state of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionState {
    /// Newly submitted, awaiting expert action or deadline expiry.
    PendingReview,
    /// An expert answered within the review window (terminal).
    ExpertAnswered,
    /// No expert answered before the deadline; published to the
    /// community automatically (terminal).
    PublicAutoPublished,
}

impl QuestionState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::PendingReview)
    }
}

impl std::fmt::Display for QuestionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PendingReview => "PENDING_REVIEW",
            Self::ExpertAnswered => "EXPERT_ANSWERED",
            Self::PublicAutoPublished => "PUBLIC_AUTO_PUBLISHED",
        };
        f.write_str(s)
    }
}

// ─── Transition Records ──────────────────────────────────────────────

/// What caused a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    /// First expert answer resolved the question.
    ExpertAnswer {
        /// The answer that triggered the transition.
        answer_id: AnswerId,
    },
    /// The review deadline expired with no expert answer.
    DeadlineExpired,
}

/// Record of a question state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: QuestionState,
    /// State after the transition.
    pub to_state: QuestionState,
    /// What caused the transition.
    pub cause: TransitionCause,
    /// When the transition occurred.
    pub at: Timestamp,
}

// ─── Answer ──────────────────────────────────────────────────────────

/// Vote direction on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Up,
    Down,
}

/// An answer attached to a question. Append-only; answers are never
/// removed or edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Unique answer identifier.
    pub id: AnswerId,
    /// Back-reference to the owning question.
    pub question_id: QuestionId,
    /// The answering user.
    pub author_id: UserId,
    /// Answer text.
    pub content: String,
    /// True iff the author held the Expert role at time of posting.
    /// Established by the caller's entry point; role verification is
    /// an external auth collaborator concern.
    pub is_expert_answer: bool,
    /// Upvote count. Only ever incremented.
    pub upvotes: u32,
    /// Downvote count. Only ever incremented.
    pub downvotes: u32,
    /// When the answer was posted.
    pub created_at: Timestamp,
}

impl Answer {
    /// Net vote score as displayed (upvotes minus downvotes).
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Apply a vote to this answer.
    pub fn apply_vote(&mut self, vote: Vote) {
        match vote {
            Vote::Up => self.upvotes += 1,
            Vote::Down => self.downvotes += 1,
        }
    }
}

// ─── Question ────────────────────────────────────────────────────────

/// A question with its lifecycle state, answers, and transition history.
///
/// Enforces valid state transitions. Invalid transitions are rejected
/// with structured errors identifying the current state, attempted
/// transition, and the reason for rejection. Mutation flows through the
/// `LifecycleManager`, which serializes all transition-causing operations
/// per question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier.
    pub id: QuestionId,
    /// The submitting user.
    pub author_id: UserId,
    /// Question title. Immutable once submitted.
    pub title: String,
    /// Question body. Immutable once submitted.
    pub body: String,
    /// Academic category.
    pub category: Category,
    /// Classification tags, normalized at submission (trimmed,
    /// duplicates dropped).
    pub tags: Vec<String>,
    /// When the question was submitted. Immutable.
    pub created_at: Timestamp,
    /// Current lifecycle state.
    pub state: QuestionState,
    /// `created_at + 24h`. Computed once at submission, never recomputed.
    pub review_deadline: Timestamp,
    /// Ordered, append-only sequence of answers.
    pub answers: Vec<Answer>,
    /// View counter.
    pub views: u64,
    /// Ordered log of all state transitions.
    pub transitions: Vec<TransitionRecord>,
}

impl Question {
    /// Create a new question in the PendingReview state.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the title or body is empty or
    /// whitespace-only. No question is created on failure.
    pub fn new(
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        category: Category,
        tags: Vec<String>,
        now: Timestamp,
    ) -> Result<Self, LifecycleError> {
        let title = title.into();
        let body = body.into();
        if title.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "question title must not be empty".to_string(),
            ));
        }
        if body.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "question body must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: QuestionId::new(),
            author_id,
            title,
            body,
            category,
            tags: normalize_tags(tags),
            created_at: now,
            state: QuestionState::PendingReview,
            review_deadline: now.plus_hours(REVIEW_WINDOW_HOURS),
            answers: Vec::new(),
            views: 0,
            transitions: Vec::new(),
        })
    }

    /// Whether the question has reached a terminal state.
    pub fn is_resolved(&self) -> bool {
        self.state.is_terminal()
    }

    /// Append an answer. Always permitted, regardless of state — answers
    /// after resolution are kept but never change state.
    pub fn append_answer(&mut self, answer: Answer) {
        self.answers.push(answer);
    }

    /// Find an answer by id.
    pub fn answer(&self, answer_id: &AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == *answer_id)
    }

    /// Increment the view counter and return the new count.
    pub fn record_view(&mut self) -> u64 {
        self.views += 1;
        self.views
    }

    /// Resolve via expert review (PENDING_REVIEW → EXPERT_ANSWERED).
    ///
    /// `answer_id` is the expert answer that triggered the resolution.
    /// Rejected if the question has already reached a terminal state:
    /// the first transition wins and later ones are errors at this level.
    pub fn mark_expert_answered(
        &mut self,
        answer_id: AnswerId,
        now: Timestamp,
    ) -> Result<(), LifecycleError> {
        self.require_pending("EXPERT_ANSWERED")?;
        self.do_transition(
            QuestionState::ExpertAnswered,
            TransitionCause::ExpertAnswer { answer_id },
            now,
        );
        Ok(())
    }

    /// Auto-publish after deadline expiry (PENDING_REVIEW → PUBLIC_AUTO_PUBLISHED).
    ///
    /// The caller is responsible for evaluating the deadline policy first;
    /// this method only enforces that the transition leaves PendingReview.
    pub fn auto_publish(&mut self, now: Timestamp) -> Result<(), LifecycleError> {
        self.require_pending("PUBLIC_AUTO_PUBLISHED")?;
        self.do_transition(
            QuestionState::PublicAutoPublished,
            TransitionCause::DeadlineExpired,
            now,
        );
        Ok(())
    }

    /// Validate that the question is still pending review.
    fn require_pending(&self, target: &str) -> Result<(), LifecycleError> {
        if self.state.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                question_id: self.id.to_string(),
                from: self.state.to_string(),
                to: target.to_string(),
                reason: "question is already resolved; terminal states admit no transitions"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Record a state transition.
    fn do_transition(&mut self, to: QuestionState, cause: TransitionCause, now: Timestamp) {
        self.transitions.push(TransitionRecord {
            from_state: self.state,
            to_state: to,
            cause,
            at: now,
        });
        self.state = to;
    }
}

/// Trim tags and drop empties and duplicates, preserving first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let t = tag.trim();
        if t.is_empty() {
            continue;
        }
        if !out.iter().any(|existing| existing == t) {
            out.push(t.to_string());
        }
    }
    out
}

// ─── Tests ───────────────────────────────────────────────────────────
