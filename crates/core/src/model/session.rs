use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::model::curriculum::Curriculum;
use crate::model::ids::ModuleId;
use crate::model::profile::UserProfile;
use crate::model::progress::SubjectProgress;
use crate::model::quiz::QuizSession;

/// Everything one learner's session knows about.
///
/// Created empty when the session starts and dropped when it ends. Nothing is
/// persisted and nothing is shared between sessions; every operation receives
/// the state explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    profile: UserProfile,
    curricula: BTreeMap<String, Curriculum>,
    progress: BTreeMap<String, SubjectProgress>,
    current_subject: Option<String>,
    current_module: Option<ModuleId>,
    quiz: Option<QuizSession>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    /// Learning paths keyed by subject, in subject order.
    pub fn curricula(&self) -> impl Iterator<Item = (&str, &Curriculum)> {
        self.curricula.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn curriculum(&self, subject: &str) -> Option<&Curriculum> {
        self.curricula.get(subject)
    }

    #[must_use]
    pub fn has_subject(&self, subject: &str) -> bool {
        self.curricula.contains_key(subject)
    }

    pub fn progress_entries(&self) -> impl Iterator<Item = (&str, &SubjectProgress)> {
        self.progress.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn progress(&self, subject: &str) -> Option<&SubjectProgress> {
        self.progress.get(subject)
    }

    pub fn progress_mut(&mut self, subject: &str) -> Option<&mut SubjectProgress> {
        self.progress.get_mut(subject)
    }

    /// Store a freshly generated path under its subject and make it current.
    ///
    /// Replaces any earlier path and progress for the same subject, and drops
    /// a quiz running on the replaced path.
    pub fn install_curriculum(&mut self, curriculum: Curriculum, started: NaiveDate) {
        let subject = curriculum.subject().to_string();
        if self.quiz.as_ref().is_some_and(|quiz| quiz.subject() == subject) {
            self.quiz = None;
        }
        self.progress
            .insert(subject.clone(), SubjectProgress::new(started));
        self.curricula.insert(subject.clone(), curriculum);
        self.current_subject = Some(subject);
        self.current_module = Some(ModuleId::FIRST);
    }

    #[must_use]
    pub fn current_subject(&self) -> Option<&str> {
        self.current_subject.as_deref()
    }

    #[must_use]
    pub fn current_module(&self) -> Option<ModuleId> {
        self.current_module
    }

    /// Curriculum of the current subject, if one is selected.
    #[must_use]
    pub fn current_curriculum(&self) -> Option<&Curriculum> {
        self.current_subject
            .as_deref()
            .and_then(|subject| self.curricula.get(subject))
    }

    pub fn set_current(&mut self, subject: impl Into<String>, module: ModuleId) {
        self.current_subject = Some(subject.into());
        self.current_module = Some(module);
    }

    pub fn set_current_module(&mut self, module: ModuleId) {
        self.current_module = Some(module);
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    /// Replace the active quiz and return a reference to it.
    pub fn begin_quiz(&mut self, quiz: QuizSession) -> &QuizSession {
        self.quiz.insert(quiz)
    }

    /// Remove and return the active quiz.
    pub fn take_quiz(&mut self) -> Option<QuizSession> {
        self.quiz.take()
    }
}
