use chrono::{DateTime, NaiveDate, Utc};

use pathway_core::model::{
    KnowledgeLevel, LearningStyle, Module, ModuleId, QuizPhase, QuizResponse, QuizSession,
    SessionState,
};

/// Score history timestamps are shown to the minute.
pub const SCORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    /// Less prominent than success; used for degraded results.
    Info,
    Warning,
    Error,
}

/// A user-visible message produced by one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub learning_style: LearningStyle,
    pub knowledge_level: KnowledgeLevel,
}

/// One entry of the learning-path list.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub subject: String,
    pub overview: String,
    pub module_count: usize,
    pub completion: Option<f64>,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleItem {
    pub id: ModuleId,
    pub title: String,
    pub completed: bool,
}

impl ModuleItem {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Module {}: {}", self.id, self.title)
    }
}

/// The module currently being studied, plus the outline to pick another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleView {
    pub subject: String,
    pub module: Module,
    pub completed: bool,
    pub outline: Vec<ModuleItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationView {
    pub question: String,
    pub module_title: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub module_id: ModuleId,
    pub module_title: String,
    /// One-based.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    /// Empty for free-text questions.
    pub options: Vec<String>,
}

impl QuestionView {
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Question {}/{}", self.number, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub module_id: ModuleId,
    pub module_title: String,
    pub correct: usize,
    pub total: usize,
    pub score: f64,
    pub review: Vec<QuizResponse>,
}

impl ResultsView {
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{:.1}%", self.score)
    }

    #[must_use]
    pub fn tally_label(&self) -> String {
        format!("{}/{} correct", self.correct, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizView {
    Question(QuestionView),
    Results(ResultsView),
}

impl QuizView {
    fn from_session(quiz: &QuizSession) -> Option<Self> {
        match quiz.phase() {
            QuizPhase::InProgress => {
                let question = quiz.current_question()?;
                Some(QuizView::Question(QuestionView {
                    module_id: quiz.module_id(),
                    module_title: quiz.module_title().to_string(),
                    number: quiz.position() + 1,
                    total: quiz.total(),
                    prompt: question.question.clone(),
                    options: question.options.clone(),
                }))
            }
            QuizPhase::Completed => {
                let outcome = quiz.outcome()?;
                Some(QuizView::Results(ResultsView {
                    module_id: quiz.module_id(),
                    module_title: quiz.module_title().to_string(),
                    correct: outcome.correct,
                    total: outcome.total,
                    score: outcome.score,
                    review: quiz.responses().to_vec(),
                }))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLine {
    pub module_id: ModuleId,
    pub module_title: Option<String>,
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreLine {
    /// `Module 1 (Variables): 50.0% on 2023-11-14 22:13`
    #[must_use]
    pub fn label(&self) -> String {
        let when = self.recorded_at.format(SCORE_TIME_FORMAT);
        match &self.module_title {
            Some(title) => format!(
                "Module {} ({title}): {:.1}% on {when}",
                self.module_id, self.score
            ),
            None => format!("Module {}: {:.1}% on {when}", self.module_id, self.score),
        }
    }
}

/// Progress report for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub subject: String,
    pub started: NaiveDate,
    pub completed: usize,
    /// Module count of the subject's path, if it still has one.
    pub total: Option<usize>,
    pub completion: Option<f64>,
    pub completed_modules: Vec<ModuleItem>,
    pub scores: Vec<ScoreLine>,
}

impl ProgressView {
    #[must_use]
    pub fn summary_label(&self) -> String {
        match (self.total, self.completion) {
            (Some(total), Some(pct)) => format!(
                "Completed {} out of {total} modules ({pct:.1}%)",
                self.completed
            ),
            _ => format!("Completed {} modules", self.completed),
        }
    }
}

/// Everything the presentation layer needs to draw the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub profile: ProfileView,
    pub ai_enabled: bool,
    pub notices: Vec<Notice>,
    pub paths: Vec<PathItem>,
    pub module: Option<ModuleView>,
    pub explanation: Option<ExplanationView>,
    pub quiz: Option<QuizView>,
    pub progress: Vec<ProgressView>,
}

impl ViewModel {
    /// Project the session into a view. Notices and the explanation start empty.
    #[must_use]
    pub fn build(state: &SessionState, ai_enabled: bool) -> Self {
        let profile = state.profile();
        Self {
            profile: ProfileView {
                name: profile.name().to_string(),
                learning_style: profile.learning_style(),
                knowledge_level: profile.knowledge_level(),
            },
            ai_enabled,
            notices: Vec::new(),
            paths: path_items(state),
            module: module_view(state),
            explanation: None,
            quiz: state.quiz().and_then(QuizView::from_session),
            progress: progress_views(state),
        }
    }

    #[must_use]
    pub fn has_notice(&self, level: NoticeLevel) -> bool {
        self.notices.iter().any(|n| n.level == level)
    }
}

fn path_items(state: &SessionState) -> Vec<PathItem> {
    state
        .curricula()
        .map(|(subject, curriculum)| PathItem {
            subject: subject.to_string(),
            overview: curriculum.overview().to_string(),
            module_count: curriculum.module_count(),
            completion: state
                .progress(subject)
                .and_then(|p| p.completion_percentage(curriculum.module_count())),
            is_current: state.current_subject() == Some(subject),
        })
        .collect()
}

fn module_view(state: &SessionState) -> Option<ModuleView> {
    let subject = state.current_subject()?;
    let curriculum = state.current_curriculum()?;
    let module = curriculum.module(state.current_module()?)?;
    let progress = state.progress(subject);
    let is_completed = |id| progress.is_some_and(|p| p.is_completed(id));

    Some(ModuleView {
        subject: subject.to_string(),
        module: module.clone(),
        completed: is_completed(module.id),
        outline: curriculum
            .modules()
            .iter()
            .map(|m| ModuleItem {
                id: m.id,
                title: m.title.clone(),
                completed: is_completed(m.id),
            })
            .collect(),
    })
}

fn progress_views(state: &SessionState) -> Vec<ProgressView> {
    state
        .progress_entries()
        .map(|(subject, progress)| {
            let curriculum = state.curriculum(subject);
            let title_of = |id| {
                curriculum
                    .and_then(|c| c.module(id))
                    .map(|m| m.title.clone())
            };
            ProgressView {
                subject: subject.to_string(),
                started: progress.started(),
                completed: progress.modules_completed().len(),
                total: curriculum.map(|c| c.module_count()),
                completion: curriculum
                    .and_then(|c| progress.completion_percentage(c.module_count())),
                completed_modules: curriculum
                    .map(|c| {
                        c.modules()
                            .iter()
                            .filter(|m| progress.is_completed(m.id))
                            .map(|m| ModuleItem {
                                id: m.id,
                                title: m.title.clone(),
                                completed: true,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                scores: progress
                    .quiz_scores()
                    .iter()
                    .map(|record| ScoreLine {
                        module_id: record.module_id(),
                        module_title: title_of(record.module_id()),
                        score: record.score(),
                        recorded_at: record.recorded_at(),
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_core::model::{CurriculumDraft, Exercise};
    use pathway_core::model::ScoreRecord;
    use pathway_core::time::{fixed_clock, fixed_now};

    fn state() -> SessionState {
        let module = |id: u32, title: &str| Module {
            id: ModuleId::new(id),
            title: title.into(),
            description: "desc".into(),
            content: "content".into(),
            exercises: vec![Exercise {
                question: "1 + 1?".into(),
                options: vec!["2".into(), "3".into()],
                answer: "2".into(),
                explanation: String::new(),
            }],
            additional_resources: vec!["Book".into()],
        };
        let draft = CurriculumDraft {
            subject: "Algebra".into(),
            overview: "Numbers and letters".into(),
            modules: vec![module(1, "Variables"), module(2, "Equations")],
        };
        let mut state = SessionState::new();
        state.install_curriculum(draft.validate().unwrap(), fixed_clock().today());
        state
    }

    #[test]
    fn fresh_path_shows_first_module() {
        let view = ViewModel::build(&state(), true);

        assert_eq!(view.paths.len(), 1);
        assert!(view.paths[0].is_current);
        assert_eq!(view.paths[0].completion, Some(0.0));
        let module = view.module.unwrap();
        assert_eq!(module.module.heading(), "Module 1: Variables");
        assert_eq!(module.outline.len(), 2);
        assert!(view.quiz.is_none());
        assert_eq!(view.profile.name, "Learner");
    }

    #[test]
    fn progress_report_lists_completions_and_scores() {
        let mut state = state();
        let last = state.curriculum("Algebra").unwrap().last_module_id();
        let progress = state.progress_mut("Algebra").unwrap();
        progress.complete_module(ModuleId::new(1), last);
        progress.push_score(ScoreRecord::new(ModuleId::new(1), 50.0, fixed_now()).unwrap());

        let view = ViewModel::build(&state, true);
        let report = &view.progress[0];

        assert_eq!(report.summary_label(), "Completed 1 out of 2 modules (50.0%)");
        assert_eq!(report.completed_modules[0].heading(), "Module 1: Variables");
        assert_eq!(
            report.scores[0].label(),
            "Module 1 (Variables): 50.0% on 2023-11-14 22:13"
        );
    }

    #[test]
    fn quiz_question_and_results_labels() {
        let mut state = state();
        let module = state.curriculum("Algebra").unwrap().modules()[0].clone();
        state.begin_quiz(QuizSession::start("Algebra", &module).unwrap());

        let view = ViewModel::build(&state, true);
        let Some(QuizView::Question(question)) = view.quiz else {
            panic!("expected a question");
        };
        assert_eq!(question.position_label(), "Question 1/1");
        assert_eq!(question.options, vec!["2".to_string(), "3".to_string()]);

        let response = QuizResponse {
            question: "1 + 1?".into(),
            user_answer: "3".into(),
            correct_answer: "2".into(),
            evaluation: "Not quite".into(),
            is_correct: false,
        };
        state
            .quiz_mut()
            .unwrap()
            .record_response(response, fixed_now())
            .unwrap();

        let view = ViewModel::build(&state, true);
        let Some(QuizView::Results(results)) = view.quiz else {
            panic!("expected results");
        };
        assert_eq!(results.score_label(), "0.0%");
        assert_eq!(results.tally_label(), "0/1 correct");
        assert_eq!(results.review.len(), 1);
    }
}
