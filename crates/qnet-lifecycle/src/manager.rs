//! # Lifecycle Manager
//!
//! In-memory question lifecycle manager backed by `DashMap`. Owns every
//! question's mutable state and serializes all transition-causing
//! operations per question: read-validate-update runs under a single
//! entry write lock, so exactly one terminal transition can win even
//! when an expert answer races a deadline sweep.
//!
//! Reads clone the record under the entry lock and therefore observe a
//! consistent snapshot — never a partially applied transition.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use qnet_core::{AnswerId, QuestionId, Timestamp, UserId};

use crate::error::LifecycleError;
use crate::policy::should_auto_publish;
use crate::question::{Answer, Category, Question, QuestionState, Vote};

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Aggregate counts across the question store, one snapshot per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStats {
    pub total_questions: usize,
    pub pending_review: usize,
    pub expert_answered: usize,
    pub auto_published: usize,
    pub total_answers: usize,
}

// ---------------------------------------------------------------------------
// Lifecycle Manager
// ---------------------------------------------------------------------------

/// In-memory question lifecycle manager.
///
/// Thread-safe via `DashMap`. Time never comes from inside: every
/// time-sensitive operation takes `now` explicitly, so callers control the
/// clock and deadline evaluation is a pure wall-clock comparison.
pub struct LifecycleManager {
    questions: DashMap<QuestionId, Question>,
}

impl LifecycleManager {
    /// Create a new empty manager.
    pub fn new() -> Self {
        Self {
            questions: DashMap::new(),
        }
    }

    /// Submit a new question.
    ///
    /// The question starts in PendingReview with
    /// `review_deadline = now + 24h`.
    ///
    /// # Errors
    ///
    /// `Validation` if title or body is empty; nothing is stored on failure.
    pub fn submit_question(
        &self,
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        category: Category,
        tags: Vec<String>,
        now: Timestamp,
    ) -> Result<Question, LifecycleError> {
        let question = Question::new(author_id, title, body, category, tags, now)?;
        tracing::info!(
            question_id = %question.id,
            author_id = %question.author_id,
            category = %question.category,
            deadline = %question.review_deadline,
            "question submitted"
        );
        self.questions.insert(question.id, question.clone());
        Ok(question)
    }

    /// Submit an expert answer.
    ///
    /// Appends the answer with `is_expert_answer = true`. If the question
    /// is still PendingReview, atomically resolves it to ExpertAnswered
    /// under the same entry lock — first answer wins. Answers posted after
    /// resolution are appended without error and never change state.
    ///
    /// `expert_id` must have been verified as holding the Expert role by
    /// the caller's entry point; role verification is an external auth
    /// collaborator, not modeled here.
    pub fn submit_expert_answer(
        &self,
        question_id: QuestionId,
        expert_id: UserId,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Result<Answer, LifecycleError> {
        self.append_answer(question_id, expert_id, content, true, now)
    }

    /// Submit a community answer.
    ///
    /// Appends the answer with `is_expert_answer = false`; never changes
    /// state.
    pub fn submit_user_answer(
        &self,
        question_id: QuestionId,
        user_id: UserId,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Result<Answer, LifecycleError> {
        self.append_answer(question_id, user_id, content, false, now)
    }

    fn append_answer(
        &self,
        question_id: QuestionId,
        author_id: UserId,
        content: impl Into<String>,
        is_expert_answer: bool,
        now: Timestamp,
    ) -> Result<Answer, LifecycleError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "answer content must not be empty".to_string(),
            ));
        }

        let mut entry = self
            .questions
            .get_mut(&question_id)
            .ok_or_else(|| LifecycleError::QuestionNotFound(question_id.to_string()))?;
        let question = entry.value_mut();

        let answer = Answer {
            id: AnswerId::new(),
            question_id,
            author_id,
            content,
            is_expert_answer,
            upvotes: 0,
            downvotes: 0,
            created_at: now,
        };
        question.append_answer(answer.clone());

        // The first expert answer while still pending resolves the question.
        // Append and transition happen under the same entry lock, so a
        // concurrent deadline sweep cannot interleave.
        if is_expert_answer && question.state == QuestionState::PendingReview {
            question.mark_expert_answered(answer.id, now)?;
            tracing::info!(
                question_id = %question_id,
                answer_id = %answer.id,
                "question resolved by expert answer"
            );
        } else {
            tracing::debug!(
                question_id = %question_id,
                answer_id = %answer.id,
                is_expert_answer,
                state = %question.state,
                "answer appended"
            );
        }

        Ok(answer)
    }

    /// Scan all PendingReview questions and auto-publish those past their
    /// review deadline. Returns the ids that transitioned.
    ///
    /// Idempotent for a fixed `now`: a second call transitions nothing
    /// further. The scan collects candidate ids without holding a
    /// store-wide lock, then re-evaluates the policy per question under
    /// that question's entry lock, so a racing expert answer loses or wins
    /// cleanly but never double-fires.
    pub fn check_deadlines(&self, now: Timestamp) -> Vec<QuestionId> {
        let candidates: Vec<QuestionId> = self
            .questions
            .iter()
            .filter(|entry| entry.value().state == QuestionState::PendingReview)
            .map(|entry| *entry.key())
            .collect();

        let mut transitioned = Vec::new();
        for question_id in candidates {
            let Some(mut entry) = self.questions.get_mut(&question_id) else {
                continue;
            };
            let question = entry.value_mut();

            // Re-evaluate under the entry lock: an expert answer may have
            // resolved the question between the scan and this point.
            if !should_auto_publish(question, now) {
                continue;
            }
            match question.auto_publish(now) {
                Ok(()) => {
                    tracing::info!(
                        question_id = %question_id,
                        deadline = %question.review_deadline,
                        "question auto-published after review deadline"
                    );
                    transitioned.push(question_id);
                }
                // Unreachable while the policy holds under this entry lock;
                // logged rather than swallowed if the invariant ever breaks.
                Err(err) => {
                    tracing::error!(question_id = %question_id, error = %err, "auto-publish rejected");
                }
            }
        }
        transitioned
    }

    /// Get a consistent snapshot of a question.
    pub fn get_question(&self, question_id: &QuestionId) -> Result<Question, LifecycleError> {
        self.questions
            .get(question_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LifecycleError::QuestionNotFound(question_id.to_string()))
    }

    /// Apply a vote to an answer. Counters only ever increment.
    pub fn vote_answer(
        &self,
        question_id: QuestionId,
        answer_id: AnswerId,
        vote: Vote,
    ) -> Result<Answer, LifecycleError> {
        let mut entry = self
            .questions
            .get_mut(&question_id)
            .ok_or_else(|| LifecycleError::QuestionNotFound(question_id.to_string()))?;
        let question = entry.value_mut();

        let answer = question
            .answers
            .iter_mut()
            .find(|a| a.id == answer_id)
            .ok_or_else(|| LifecycleError::AnswerNotFound {
                question_id: question_id.to_string(),
                answer_id: answer_id.to_string(),
            })?;
        answer.apply_vote(vote);
        Ok(answer.clone())
    }

    /// Increment a question's view counter and return the new count.
    pub fn record_view(&self, question_id: &QuestionId) -> Result<u64, LifecycleError> {
        let mut entry = self
            .questions
            .get_mut(question_id)
            .ok_or_else(|| LifecycleError::QuestionNotFound(question_id.to_string()))?;
        Ok(entry.value_mut().record_view())
    }

    /// List all questions.
    pub fn list_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// The expert review queue: PendingReview questions sorted by review
    /// deadline ascending (most urgent first).
    pub fn list_pending(&self) -> Vec<Question> {
        let mut pending: Vec<Question> = self
            .questions
            .iter()
            .filter(|entry| entry.value().state == QuestionState::PendingReview)
            .map(|entry| entry.value().clone())
            .collect();
        pending.sort_by_key(|q| q.review_deadline);
        pending
    }

    /// All questions by one author, most recent first.
    pub fn questions_by_author(&self, author_id: &UserId) -> Vec<Question> {
        let mut mine: Vec<Question> = self
            .questions
            .iter()
            .filter(|entry| entry.value().author_id == *author_id)
            .map(|entry| entry.value().clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    /// Aggregate counts for the admin dashboard.
    pub fn stats(&self) -> LifecycleStats {
        let mut stats = LifecycleStats::default();
        for entry in self.questions.iter() {
            let q = entry.value();
            stats.total_questions += 1;
            stats.total_answers += q.answers.len();
            match q.state {
                QuestionState::PendingReview => stats.pending_review += 1,
                QuestionState::ExpertAnswered => stats.expert_answered += 1,
                QuestionState::PublicAutoPublished => stats.auto_published += 1,
            }
        }
        stats
    }

    /// Insert a question record directly (used for hydration from an
    /// external store).
    pub fn insert(&self, question: Question) {
        self.questions.insert(question.id, question);
    }

    /// Number of questions in the store.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("questions_count", &self.questions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Timestamp {
        Timestamp::parse("2026-03-01T09:00:00Z").unwrap()
    }

    fn submit(manager: &LifecycleManager) -> Question {
        manager
            .submit_question(
                UserId::new(),
                "What is Big-O notation?",
                "I keep seeing O(n log n) and do not know how to read it.",
                Category::ComputerScience,
                vec!["algorithms".to_string()],
                t0(),
            )
            .unwrap()
    }

    #[test]
    fn submit_question_initializes_correctly() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);
        assert_eq!(q.state, QuestionState::PendingReview);
        assert_eq!(q.review_deadline, t0().plus_hours(24));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn submit_question_empty_title_creates_nothing() {
        let manager = LifecycleManager::new();
        let result = manager.submit_question(
            UserId::new(),
            "",
            "body",
            Category::Other,
            vec![],
            t0(),
        );
        assert!(matches!(result, Err(LifecycleError::Validation(_))));
        assert!(manager.is_empty());
    }

    #[test]
    fn expert_answer_resolves_pending_question() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        let answer = manager
            .submit_expert_answer(q.id, UserId::new(), "Expert take.", t0().plus_hours(1))
            .unwrap();
        assert!(answer.is_expert_answer);

        let q = manager.get_question(&q.id).unwrap();
        assert_eq!(q.state, QuestionState::ExpertAnswered);
        assert_eq!(q.answers.len(), 1);
        assert_eq!(q.transitions.len(), 1);
    }

    #[test]
    fn second_expert_answer_appends_without_second_transition() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        manager
            .submit_expert_answer(q.id, UserId::new(), "First.", t0().plus_hours(1))
            .unwrap();
        manager
            .submit_expert_answer(q.id, UserId::new(), "Second.", t0().plus_hours(2))
            .unwrap();

        let q = manager.get_question(&q.id).unwrap();
        assert_eq!(q.answers.len(), 2);
        assert_eq!(q.transitions.len(), 1);
        assert_eq!(q.state, QuestionState::ExpertAnswered);
    }

    #[test]
    fn user_answer_never_changes_state() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        let answer = manager
            .submit_user_answer(q.id, UserId::new(), "Community take.", t0().plus_hours(1))
            .unwrap();
        assert!(!answer.is_expert_answer);

        let q = manager.get_question(&q.id).unwrap();
        assert_eq!(q.state, QuestionState::PendingReview);
        assert_eq!(q.answers.len(), 1);
        assert!(q.transitions.is_empty());
    }

    #[test]
    fn empty_answer_content_rejected() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);
        let result = manager.submit_user_answer(q.id, UserId::new(), "  ", t0());
        assert!(matches!(result, Err(LifecycleError::Validation(_))));
        assert!(manager.get_question(&q.id).unwrap().answers.is_empty());
    }

    #[test]
    fn answer_to_missing_question_returns_not_found() {
        let manager = LifecycleManager::new();
        let result =
            manager.submit_expert_answer(QuestionId::new(), UserId::new(), "answer", t0());
        assert!(matches!(result, Err(LifecycleError::QuestionNotFound(_))));
    }

    #[test]
    fn get_missing_question_returns_not_found() {
        let manager = LifecycleManager::new();
        let result = manager.get_question(&QuestionId::new());
        assert!(matches!(result, Err(LifecycleError::QuestionNotFound(_))));
    }

    #[test]
    fn check_deadlines_before_deadline_is_noop() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        let transitioned = manager.check_deadlines(t0().plus_hours(23).plus_secs(59 * 60));
        assert!(transitioned.is_empty());
        assert_eq!(
            manager.get_question(&q.id).unwrap().state,
            QuestionState::PendingReview
        );
    }

    #[test]
    fn check_deadlines_after_deadline_auto_publishes() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        let transitioned = manager.check_deadlines(t0().plus_hours(24).plus_secs(60));
        assert_eq!(transitioned, vec![q.id]);
        assert_eq!(
            manager.get_question(&q.id).unwrap().state,
            QuestionState::PublicAutoPublished
        );
    }

    #[test]
    fn check_deadlines_is_idempotent_for_fixed_now() {
        let manager = LifecycleManager::new();
        submit(&manager);

        let now = t0().plus_hours(25);
        let first = manager.check_deadlines(now);
        assert_eq!(first.len(), 1);
        let second = manager.check_deadlines(now);
        assert!(second.is_empty());
    }

    #[test]
    fn expert_answered_question_survives_later_deadline_check() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);

        manager
            .submit_expert_answer(q.id, UserId::new(), "Resolved.", t0().plus_hours(1))
            .unwrap();

        let transitioned = manager.check_deadlines(t0().plus_hours(25));
        assert!(transitioned.is_empty());
        assert_eq!(
            manager.get_question(&q.id).unwrap().state,
            QuestionState::ExpertAnswered
        );
    }

    #[test]
    fn vote_answer_increments_counters() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);
        let a = manager
            .submit_user_answer(q.id, UserId::new(), "Answer.", t0())
            .unwrap();

        manager.vote_answer(q.id, a.id, Vote::Up).unwrap();
        manager.vote_answer(q.id, a.id, Vote::Up).unwrap();
        let a = manager.vote_answer(q.id, a.id, Vote::Down).unwrap();
        assert_eq!(a.upvotes, 2);
        assert_eq!(a.downvotes, 1);
        assert_eq!(a.score(), 1);
    }

    #[test]
    fn vote_missing_answer_returns_not_found() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);
        let result = manager.vote_answer(q.id, AnswerId::new(), Vote::Up);
        assert!(matches!(result, Err(LifecycleError::AnswerNotFound { .. })));
    }

    #[test]
    fn record_view_counts_up() {
        let manager = LifecycleManager::new();
        let q = submit(&manager);
        assert_eq!(manager.record_view(&q.id).unwrap(), 1);
        assert_eq!(manager.record_view(&q.id).unwrap(), 2);
    }

    #[test]
    fn list_pending_sorted_by_deadline() {
        let manager = LifecycleManager::new();
        let later = manager
            .submit_question(
                UserId::new(),
                "Later question",
                "body",
                Category::Biology,
                vec![],
                t0().plus_hours(3),
            )
            .unwrap();
        let earlier = manager
            .submit_question(
                UserId::new(),
                "Earlier question",
                "body",
                Category::Biology,
                vec![],
                t0(),
            )
            .unwrap();

        let pending = manager.list_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, earlier.id);
        assert_eq!(pending[1].id, later.id);
    }

    #[test]
    fn questions_by_author_most_recent_first() {
        let manager = LifecycleManager::new();
        let author = UserId::new();
        let old = manager
            .submit_question(author, "Old", "body", Category::Other, vec![], t0())
            .unwrap();
        let new = manager
            .submit_question(
                author,
                "New",
                "body",
                Category::Other,
                vec![],
                t0().plus_hours(2),
            )
            .unwrap();
        // Someone else's question is excluded.
        submit(&manager);

        let mine = manager.questions_by_author(&author);
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, new.id);
        assert_eq!(mine[1].id, old.id);
    }

    #[test]
    fn stats_count_states_and_answers() {
        let manager = LifecycleManager::new();
        let q1 = submit(&manager);
        let q2 = submit(&manager);
        submit(&manager);

        manager
            .submit_expert_answer(q1.id, UserId::new(), "Expert.", t0().plus_hours(1))
            .unwrap();
        manager
            .submit_user_answer(q1.id, UserId::new(), "Follow-up.", t0().plus_hours(2))
            .unwrap();
        // q2 expires.
        let q2_only: Vec<QuestionId> = manager
            .check_deadlines(t0().plus_hours(25))
            .into_iter()
            .filter(|id| *id == q2.id)
            .collect();
        assert_eq!(q2_only, vec![q2.id]);

        // The third question also expired in the same sweep, so recount
        // from a fresh snapshot.
        let stats = manager.stats();
        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.expert_answered, 1);
        assert_eq!(stats.pending_review, 0);
        assert_eq!(stats.auto_published, 2);
        assert_eq!(stats.total_answers, 2);
    }

    #[test]
    fn insert_hydrates_existing_record() {
        let manager = LifecycleManager::new();
        let q = Question::new(
            UserId::new(),
            "Hydrated",
            "from an external store",
            Category::Engineering,
            vec![],
            t0(),
        )
        .unwrap();
        manager.insert(q.clone());
        assert_eq!(manager.get_question(&q.id).unwrap().title, "Hydrated");
    }
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------
