use pathway_core::Clock;
use pathway_core::model::{
    Exercise, ModuleId, QuizOutcome, QuizPhase, QuizResponse, QuizSession, QuizStateError,
    SessionState,
};

use crate::error::{ProgressError, QuizError};
use crate::grading::GradingService;
use crate::progress;
use crate::prompts::{GradingRequest, LearnerContext};

/// What one submitted answer produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub response: QuizResponse,
    /// Present when this answer completed the quiz.
    pub outcome: Option<QuizOutcome>,
}

/// Drives the session's quiz: `Idle -> InProgress -> Completed -> Idle`.
///
/// Idle is the absence of a quiz in `SessionState`. Every call outside the
/// state it needs is rejected without touching the session.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    grader: GradingService,
    clock: Clock,
}

impl QuizEngine {
    #[must_use]
    pub fn new(grader: GradingService, clock: Clock) -> Self {
        Self { grader, clock }
    }

    /// Start practising `module_id` of `subject`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyActive` if a quiz exists, `UnknownSubject` or
    /// `UnknownModule` for a missing path or module, and
    /// `QuizError::Session(NoExercises)` if the module has no exercises.
    pub fn start<'s>(
        &self,
        state: &'s mut SessionState,
        subject: &str,
        module_id: ModuleId,
    ) -> Result<&'s QuizSession, QuizError> {
        if state.quiz().is_some() {
            return Err(QuizError::AlreadyActive);
        }
        let curriculum = state
            .curriculum(subject)
            .ok_or_else(|| QuizError::UnknownSubject(subject.to_string()))?;
        let module = curriculum
            .module(module_id)
            .ok_or_else(|| QuizError::UnknownModule {
                subject: subject.to_string(),
                module: module_id,
            })?;
        let session = QuizSession::start(subject, module)?;

        tracing::info!(subject, module = %module_id, questions = session.total(), "quiz started");
        Ok(state.begin_quiz(session))
    }

    /// The question awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` when idle and
    /// `QuizError::Session(AlreadyCompleted)` once every question is answered.
    pub fn current_question<'s>(&self, state: &'s SessionState) -> Result<&'s Exercise, QuizError> {
        let quiz = state.quiz().ok_or(QuizError::NoActiveQuiz)?;
        quiz.current_question()
            .ok_or(QuizError::Session(QuizStateError::AlreadyCompleted))
    }

    /// Answer the current question.
    ///
    /// Correctness is an exact match against the stored answer. The grader's
    /// feedback is recorded even when it is an error message. The answer that
    /// completes the quiz also appends the score to the subject's progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` when idle,
    /// `QuizError::Session(AlreadyCompleted)` when nothing is left to answer, and
    /// `QuizError::Progress` if the subject lost its progress record.
    pub async fn submit(
        &self,
        state: &mut SessionState,
        user_answer: &str,
    ) -> Result<AnswerResult, QuizError> {
        let quiz = state.quiz().ok_or(QuizError::NoActiveQuiz)?;
        let question = quiz
            .current_question()
            .ok_or(QuizError::Session(QuizStateError::AlreadyCompleted))?
            .clone();
        let subject = quiz.subject().to_string();
        let module_title = quiz.module_title().to_string();
        let module_id = quiz.module_id();
        if state.progress(&subject).is_none() {
            return Err(ProgressError::UnknownSubject(subject).into());
        }

        let is_correct = question.is_correct(user_answer);
        let evaluation = self
            .grader
            .grade(&GradingRequest {
                user_answer,
                correct_answer: &question.answer,
                question: &question.question,
                subject: &subject,
                module_title: &module_title,
                learner: LearnerContext::from_profile(state.profile()),
            })
            .await;

        let response = QuizResponse {
            question: question.question,
            user_answer: user_answer.to_string(),
            correct_answer: question.answer,
            evaluation,
            is_correct,
        };
        let outcome = state
            .quiz_mut()
            .ok_or(QuizError::NoActiveQuiz)?
            .record_response(response.clone(), self.clock.now())?
            .cloned();

        tracing::debug!(subject = %subject, module = %module_id, is_correct, "answer recorded");

        if let Some(outcome) = &outcome {
            progress::record_score(
                state,
                &subject,
                module_id,
                outcome.score,
                outcome.completed_at,
            )?;
            tracing::info!(
                subject = %subject,
                module = %module_id,
                correct = outcome.correct,
                total = outcome.total,
                score = outcome.score,
                "quiz completed"
            );
        }

        Ok(AnswerResult { response, outcome })
    }

    /// Dismiss a completed quiz and return to idle.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` when idle and `QuizError::NotCompleted`
    /// while questions remain.
    pub fn close(&self, state: &mut SessionState) -> Result<QuizSession, QuizError> {
        let quiz = state.quiz().ok_or(QuizError::NoActiveQuiz)?;
        if quiz.phase() == QuizPhase::InProgress {
            return Err(QuizError::NotCompleted);
        }
        state.take_quiz().ok_or(QuizError::NoActiveQuiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ScriptedGenerator, TextCapability};
    use crate::error::CapabilityError;
    use pathway_core::model::{CurriculumDraft, Module};
    use pathway_core::time::fixed_clock;
    use std::sync::Arc;

    fn exercise(question: &str, answer: &str) -> Exercise {
        Exercise {
            question: question.into(),
            options: vec![answer.into(), "wrong".into()],
            answer: answer.into(),
            explanation: String::new(),
        }
    }

    fn state() -> SessionState {
        let draft = CurriculumDraft {
            subject: "Arithmetic".into(),
            overview: String::new(),
            modules: vec![
                Module {
                    id: ModuleId::new(1),
                    title: "Addition".into(),
                    description: String::new(),
                    content: "Adding numbers".into(),
                    exercises: vec![exercise("2 + 2?", "4"), exercise("3 + 3?", "6")],
                    additional_resources: Vec::new(),
                },
                Module {
                    id: ModuleId::new(2),
                    title: "Reading".into(),
                    description: String::new(),
                    content: "No exercises here".into(),
                    exercises: Vec::new(),
                    additional_resources: Vec::new(),
                },
            ],
        };
        let mut state = SessionState::new();
        state.install_curriculum(draft.validate().unwrap(), fixed_clock().today());
        state
    }

    fn engine(script: &ScriptedGenerator) -> QuizEngine {
        QuizEngine::new(
            GradingService::new(TextCapability::new(Arc::new(script.clone()))),
            fixed_clock(),
        )
    }

    #[test]
    fn start_requires_exercises() {
        let mut state = state();
        let err = engine(&ScriptedGenerator::new())
            .start(&mut state, "Arithmetic", ModuleId::new(2))
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Session(QuizStateError::NoExercises { .. })
        ));
        assert!(state.quiz().is_none());
    }

    #[test]
    fn start_rejects_unknown_targets_and_second_quiz() {
        let mut state = state();
        let engine = engine(&ScriptedGenerator::new());
        assert!(matches!(
            engine.start(&mut state, "Biology", ModuleId::FIRST),
            Err(QuizError::UnknownSubject(_))
        ));
        assert!(matches!(
            engine.start(&mut state, "Arithmetic", ModuleId::new(7)),
            Err(QuizError::UnknownModule { .. })
        ));

        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();
        assert!(matches!(
            engine.start(&mut state, "Arithmetic", ModuleId::FIRST),
            Err(QuizError::AlreadyActive)
        ));
    }

    #[tokio::test]
    async fn one_right_one_wrong_scores_fifty() {
        let script = ScriptedGenerator::new()
            .with_reply("Correct!")
            .with_reply("Not quite.");
        let engine = engine(&script);
        let mut state = state();
        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();

        assert_eq!(engine.current_question(&state).unwrap().question, "2 + 2?");
        let first = engine.submit(&mut state, "4").await.unwrap();
        assert!(first.response.is_correct);
        assert_eq!(first.response.evaluation, "Correct!");
        assert!(first.outcome.is_none());

        assert_eq!(engine.current_question(&state).unwrap().question, "3 + 3?");
        let second = engine.submit(&mut state, "wrong").await.unwrap();
        assert!(!second.response.is_correct);
        let outcome = second.outcome.unwrap();
        assert_eq!((outcome.correct, outcome.total), (1, 2));
        assert!((outcome.score - 50.0).abs() < f64::EPSILON);

        let scores = state.progress("Arithmetic").unwrap().quiz_scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].module_id(), ModuleId::FIRST);
        assert!((scores[0].score() - 50.0).abs() < f64::EPSILON);
        assert_eq!(state.quiz().unwrap().phase(), QuizPhase::Completed);
    }

    #[tokio::test]
    async fn correctness_is_case_sensitive() {
        let script = ScriptedGenerator::new().with_reply("ok");
        let engine = engine(&script);
        let mut state = state();
        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();

        let result = engine.submit(&mut state, " 4").await.unwrap();
        assert!(!result.response.is_correct);
    }

    #[tokio::test]
    async fn grading_failure_is_recorded_not_fatal() {
        let script = ScriptedGenerator::new().with_failure(CapabilityError::EmptyResponse);
        let engine = engine(&script);
        let mut state = state();
        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();

        let result = engine.submit(&mut state, "4").await.unwrap();
        assert!(result.response.is_correct);
        assert!(result.response.evaluation.starts_with("Error evaluating answer:"));
        assert_eq!(state.quiz().unwrap().responses().len(), 1);
    }

    #[tokio::test]
    async fn submit_when_idle_is_rejected() {
        let script = ScriptedGenerator::new();
        let mut state = state();
        let err = engine(&script).submit(&mut state, "4").await.unwrap_err();
        assert!(matches!(err, QuizError::NoActiveQuiz));
        assert!(script.prompts().is_empty());
    }

    #[tokio::test]
    async fn submit_after_completion_is_rejected_without_mutation() {
        let script = ScriptedGenerator::new().with_reply("a").with_reply("b");
        let engine = engine(&script);
        let mut state = state();
        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();
        engine.submit(&mut state, "4").await.unwrap();
        engine.submit(&mut state, "6").await.unwrap();

        let err = engine.submit(&mut state, "6").await.unwrap_err();
        assert!(matches!(
            err,
            QuizError::Session(QuizStateError::AlreadyCompleted)
        ));
        assert_eq!(state.quiz().unwrap().responses().len(), 2);
        assert_eq!(state.progress("Arithmetic").unwrap().quiz_scores().len(), 1);
        assert!(engine.current_question(&state).is_err());
    }

    #[tokio::test]
    async fn close_only_after_completion() {
        let script = ScriptedGenerator::new().with_reply("a").with_reply("b");
        let engine = engine(&script);
        let mut state = state();
        assert!(matches!(engine.close(&mut state), Err(QuizError::NoActiveQuiz)));

        engine
            .start(&mut state, "Arithmetic", ModuleId::FIRST)
            .unwrap();
        assert!(matches!(engine.close(&mut state), Err(QuizError::NotCompleted)));

        engine.submit(&mut state, "4").await.unwrap();
        engine.submit(&mut state, "6").await.unwrap();
        let closed = engine.close(&mut state).unwrap();
        assert_eq!(closed.responses().len(), 2);
        assert!(state.quiz().is_none());
    }
}
