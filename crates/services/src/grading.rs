use crate::ai::TextCapability;
use crate::prompts::{self, GradingRequest};

/// Free-text feedback on a quiz answer.
///
/// The feedback never decides correctness; that is an exact match done by the
/// quiz engine. Failures are returned as the feedback text.
#[derive(Debug, Clone)]
pub struct GradingService {
    capability: TextCapability,
}

impl GradingService {
    #[must_use]
    pub fn new(capability: TextCapability) -> Self {
        Self { capability }
    }

    pub async fn grade(&self, request: &GradingRequest<'_>) -> String {
        let prompt = prompts::grading_prompt(request);
        match self.capability.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(subject = request.subject, module_title = request.module_title, error = %err, "grading request failed");
                format!("Error evaluating answer: {err}")
            }
        }
    }
}
