use pathway_core::Clock;
use pathway_core::model::{ModuleId, SessionState};

use crate::ai::TextCapability;
use crate::content::{ContentGenerator, GenerationTier};
use crate::error::{ErrorKind, HandlerError};
use crate::explanation::ExplanationService;
use crate::grading::GradingService;
use crate::progress;
use crate::prompts::LearnerContext;
use crate::quiz::QuizEngine;

use super::action::Action;
use super::view::{ExplanationView, Notice, ViewModel};

/// Applies one `Action` to a session and returns the view to render.
///
/// Failures never escape: they become notices, and the session is left as it
/// was before the failed action.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    content: ContentGenerator,
    explainer: ExplanationService,
    quiz: QuizEngine,
    clock: Clock,
    ai_enabled: bool,
}

#[derive(Debug, Default)]
struct Applied {
    notices: Vec<Notice>,
    explanation: Option<ExplanationView>,
}

impl Applied {
    fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            explanation: None,
        }
    }
}

impl InteractionHandler {
    #[must_use]
    pub fn new(capability: TextCapability, clock: Clock) -> Self {
        Self {
            ai_enabled: capability.enabled(),
            content: ContentGenerator::new(capability.clone()),
            explainer: ExplanationService::new(capability.clone()),
            quiz: QuizEngine::new(GradingService::new(capability), clock),
            clock,
        }
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub async fn handle(&self, state: &mut SessionState, action: Action) -> ViewModel {
        let name = action.name();
        let applied = match self.apply(state, action).await {
            Ok(applied) => applied,
            Err(err) => {
                let kind = err.kind();
                tracing::warn!(action = name, ?kind, error = %err, "action rejected");
                Applied::notice(match kind {
                    ErrorKind::Configuration => Notice::warning(err.to_string()),
                    ErrorKind::Generation | ErrorKind::State => Notice::error(err.to_string()),
                })
            }
        };

        let mut view = ViewModel::build(state, self.ai_enabled);
        view.notices = applied.notices;
        view.explanation = applied.explanation;
        view
    }

    async fn apply(
        &self,
        state: &mut SessionState,
        action: Action,
    ) -> Result<Applied, HandlerError> {
        if action.requires_capability() && !self.ai_enabled {
            return Err(HandlerError::CapabilityDisabled);
        }

        match action {
            Action::Refresh => Ok(Applied::default()),
            Action::UpdateProfile {
                name,
                learning_style,
                knowledge_level,
            } => {
                let profile = state.profile_mut();
                if let Some(name) = name {
                    profile.set_name(&name);
                }
                if let Some(style) = learning_style {
                    profile.set_learning_style(style);
                }
                if let Some(level) = knowledge_level {
                    profile.set_knowledge_level(level);
                }
                Ok(Applied::notice(Notice::success("Profile updated")))
            }
            Action::CreatePath { subject } => self.create_path(state, &subject).await,
            Action::OpenPath { subject } => {
                let subject = subject.trim();
                if !state.has_subject(subject) {
                    return Err(HandlerError::UnknownSubject(subject.to_string()));
                }
                let module = state
                    .progress(subject)
                    .and_then(|p| p.current_module())
                    .unwrap_or(ModuleId::FIRST);
                state.set_current(subject, module);
                Ok(Applied::default())
            }
            Action::SelectModule { module_id } => {
                let curriculum = state
                    .current_curriculum()
                    .ok_or(HandlerError::NoCurrentPath)?;
                if curriculum.module(module_id).is_none() {
                    return Err(HandlerError::UnknownModule(module_id));
                }
                state.set_current_module(module_id);
                Ok(Applied::default())
            }
            Action::CompleteModule { module_id } => {
                let subject = current_subject(state)?;
                let completion = progress::complete_module(state, &subject, module_id)?;
                state.set_current_module(completion.current_module);
                Ok(Applied::notice(Notice::success(format!(
                    "Module {module_id} marked as complete!"
                ))))
            }
            Action::AskQuestion { question } => self.ask(state, &question).await,
            Action::StartQuiz { module_id } => {
                let subject = current_subject(state)?;
                self.quiz.start(state, &subject, module_id)?;
                Ok(Applied::default())
            }
            Action::SubmitAnswer { answer } => {
                if answer.trim().is_empty() {
                    return Ok(Applied::notice(Notice::warning("Please enter an answer")));
                }
                let result = self.quiz.submit(state, &answer).await?;
                Ok(match result.outcome {
                    Some(_) => Applied::notice(Notice::success("Quiz completed!")),
                    None => Applied::default(),
                })
            }
            Action::CloseQuiz => {
                self.quiz.close(state)?;
                Ok(Applied::default())
            }
        }
    }

    async fn create_path(
        &self,
        state: &mut SessionState,
        subject: &str,
    ) -> Result<Applied, HandlerError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(Applied::notice(Notice::warning(
                "Please enter a subject to start learning",
            )));
        }

        let tier = self
            .content
            .generate_into(state, subject, &self.clock)
            .await?;
        Ok(Applied::notice(match tier {
            GenerationTier::Full => {
                Notice::success(format!("Learning path for {subject} created successfully!"))
            }
            GenerationTier::Simplified => Notice::info(format!(
                "Learning path for {subject} was created from a simplified outline; \
                 content may be shallower than requested."
            )),
        }))
    }

    async fn ask(&self, state: &SessionState, question: &str) -> Result<Applied, HandlerError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Applied::notice(Notice::warning("Please enter a question")));
        }

        let subject = state.current_subject().ok_or(HandlerError::NoCurrentPath)?;
        let curriculum = state
            .current_curriculum()
            .ok_or(HandlerError::NoCurrentPath)?;
        let module_id = state.current_module().unwrap_or(ModuleId::FIRST);
        let module = curriculum
            .module(module_id)
            .ok_or(HandlerError::UnknownModule(module_id))?;

        let answer = self
            .explainer
            .explain(
                question,
                subject,
                &module.title,
                LearnerContext::from_profile(state.profile()),
            )
            .await;
        Ok(Applied {
            notices: Vec::new(),
            explanation: Some(ExplanationView {
                question: question.to_string(),
                module_title: module.title.clone(),
                answer,
            }),
        })
    }
}

fn current_subject(state: &SessionState) -> Result<String, HandlerError> {
    state
        .current_subject()
        .map(str::to_string)
        .ok_or(HandlerError::NoCurrentPath)
}
