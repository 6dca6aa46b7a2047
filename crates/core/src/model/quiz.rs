use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::curriculum::{Exercise, Module};
use crate::model::ids::ModuleId;
use crate::model::progress::percentage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizStateError {
    #[error("module {module_id} has no exercises to practice")]
    NoExercises { module_id: ModuleId },

    #[error("quiz already completed")]
    AlreadyCompleted,
}

/// A recorded answer to one quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResponse {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    /// Free-text feedback from the grader. May carry an error message.
    pub evaluation: String,
    /// Exact match of `user_answer` against `correct_answer`.
    pub is_correct: bool,
}

/// Final tally of a completed quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    InProgress,
    Completed,
}

/// One practice attempt over a module's exercises.
///
/// Questions are answered strictly in order: the current question is always
/// `questions[responses.len()]`.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    subject: String,
    module_id: ModuleId,
    module_title: String,
    questions: Vec<Exercise>,
    responses: Vec<QuizResponse>,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// Copy the module's exercises into a new attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizStateError::NoExercises` if the module has nothing to practice.
    pub fn start(subject: impl Into<String>, module: &Module) -> Result<Self, QuizStateError> {
        if !module.has_exercises() {
            return Err(QuizStateError::NoExercises {
                module_id: module.id,
            });
        }
        Ok(Self {
            subject: subject.into(),
            module_id: module.id,
            module_title: module.title.clone(),
            questions: module.exercises.clone(),
            responses: Vec::new(),
            outcome: None,
        })
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn module_title(&self) -> &str {
        &self.module_title
    }

    #[must_use]
    pub fn questions(&self) -> &[Exercise] {
        &self.questions
    }

    #[must_use]
    pub fn responses(&self) -> &[QuizResponse] {
        &self.responses
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.outcome.is_some() {
            QuizPhase::Completed
        } else {
            QuizPhase::InProgress
        }
    }

    /// Zero-based index of the question awaiting an answer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question awaiting an answer, or `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Exercise> {
        if self.outcome.is_some() {
            return None;
        }
        self.questions.get(self.responses.len())
    }

    /// Append a response; the last one completes the attempt and scores it.
    ///
    /// # Errors
    ///
    /// Returns `QuizStateError::AlreadyCompleted` if every question is answered.
    pub fn record_response(
        &mut self,
        response: QuizResponse,
        at: DateTime<Utc>,
    ) -> Result<Option<&QuizOutcome>, QuizStateError> {
        if self.outcome.is_some() || self.responses.len() >= self.questions.len() {
            return Err(QuizStateError::AlreadyCompleted);
        }

        self.responses.push(response);

        if self.responses.len() == self.questions.len() {
            let correct = self.responses.iter().filter(|r| r.is_correct).count();
            let total = self.questions.len();
            self.outcome = Some(QuizOutcome {
                correct,
                total,
                score: percentage(correct, total).unwrap_or(0.0),
                completed_at: at,
            });
        }

        Ok(self.outcome.as_ref())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject", &self.subject)
            .field("module_id", &self.module_id)
            .field("questions_len", &self.questions.len())
            .field("responses_len", &self.responses.len())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
