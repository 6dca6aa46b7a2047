use crate::ai::TextCapability;
use crate::prompts::{self, LearnerContext};

/// Answers free-text questions about a module. Never fails: errors come back as text.
#[derive(Debug, Clone)]
pub struct ExplanationService {
    capability: TextCapability,
}

impl ExplanationService {
    #[must_use]
    pub fn new(capability: TextCapability) -> Self {
        Self { capability }
    }

    pub async fn explain(
        &self,
        question: &str,
        subject: &str,
        module_title: &str,
        learner: LearnerContext<'_>,
    ) -> String {
        let prompt = prompts::explanation_prompt(question, subject, module_title, learner);
        match self.capability.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(subject, module_title, error = %err, "explanation request failed");
                format!("Error generating explanation: {err}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedGenerator;
    use crate::error::CapabilityError;
    use pathway_core::model::{KnowledgeLevel, LearningStyle};
    use std::sync::Arc;

    fn learner() -> LearnerContext<'static> {
        LearnerContext {
            user_name: "Learner",
            knowledge_level: KnowledgeLevel::Advanced,
            learning_style: LearningStyle::ReadingWriting,
        }
    }

    #[tokio::test]
    async fn reply_is_returned_verbatim() {
        let script = ScriptedGenerator::new().with_reply("Because **x** is unknown.");
        let service = ExplanationService::new(TextCapability::new(Arc::new(script.clone())));

        let text = service
            .explain("What is x?", "Algebra", "Variables", learner())
            .await;

        assert_eq!(text, "Because **x** is unknown.");
        assert!(script.prompts()[0].contains("What is x?"));
    }

    #[tokio::test]
    async fn failure_becomes_error_text() {
        let script = ScriptedGenerator::new().with_failure(CapabilityError::Timeout);
        let service = ExplanationService::new(TextCapability::new(Arc::new(script)));

        let text = service
            .explain("What is x?", "Algebra", "Variables", learner())
            .await;

        assert_eq!(text, "Error generating explanation: text generation timed out");
    }
}
