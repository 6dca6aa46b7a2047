use pathway_core::model::{KnowledgeLevel, LearningStyle, ModuleId};

/// One user interaction, as produced by the presentation layer.
///
/// Module-scoped actions apply to the current learning path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-render without changing anything.
    Refresh,
    UpdateProfile {
        name: Option<String>,
        learning_style: Option<LearningStyle>,
        knowledge_level: Option<KnowledgeLevel>,
    },
    CreatePath {
        subject: String,
    },
    OpenPath {
        subject: String,
    },
    SelectModule {
        module_id: ModuleId,
    },
    CompleteModule {
        module_id: ModuleId,
    },
    AskQuestion {
        question: String,
    },
    StartQuiz {
        module_id: ModuleId,
    },
    SubmitAnswer {
        answer: String,
    },
    CloseQuiz,
}

impl Action {
    /// Whether the action calls the text-generation capability.
    #[must_use]
    pub fn requires_capability(&self) -> bool {
        matches!(
            self,
            Action::CreatePath { .. }
                | Action::AskQuestion { .. }
                | Action::StartQuiz { .. }
                | Action::SubmitAnswer { .. }
        )
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Refresh => "refresh",
            Action::UpdateProfile { .. } => "update_profile",
            Action::CreatePath { .. } => "create_path",
            Action::OpenPath { .. } => "open_path",
            Action::SelectModule { .. } => "select_module",
            Action::CompleteModule { .. } => "complete_module",
            Action::AskQuestion { .. } => "ask_question",
            Action::StartQuiz { .. } => "start_quiz",
            Action::SubmitAnswer { .. } => "submit_answer",
            Action::CloseQuiz => "close_quiz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_generation_actions_need_the_capability() {
        assert!(
            Action::CreatePath {
                subject: "Algebra".into()
            }
            .requires_capability()
        );
        assert!(
            Action::SubmitAnswer {
                answer: "4".into()
            }
            .requires_capability()
        );
        assert!(
            !Action::CompleteModule {
                module_id: ModuleId::FIRST
            }
            .requires_capability()
        );
        assert!(!Action::CloseQuiz.requires_capability());
        assert!(!Action::Refresh.requires_capability());
    }
}
