mod extract;

use std::fmt;
use std::ops::RangeInclusive;

use pathway_core::Clock;
use pathway_core::model::{Curriculum, KnowledgeLevel, SessionState};

use crate::ai::TextCapability;
use crate::error::ContentError;
use crate::prompts::{self, LearnerContext};

pub use extract::{decode_reply, extract_payload, parse_curriculum, repair_payload};

const FULL_MODULES: RangeInclusive<usize> = 5..=7;
const SIMPLIFIED_MODULES: RangeInclusive<usize> = 3..=3;

/// Which prompt produced a learning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTier {
    Full,
    /// Fallback after the full reply could not be parsed; content may be shallower.
    Simplified,
}

impl fmt::Display for GenerationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationTier::Full => f.write_str("full"),
            GenerationTier::Simplified => f.write_str("simplified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPath {
    pub curriculum: Curriculum,
    pub tier: GenerationTier,
}

/// Requests learning paths from the capability and decodes the replies.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    capability: TextCapability,
}

impl ContentGenerator {
    #[must_use]
    pub fn new(capability: TextCapability) -> Self {
        Self { capability }
    }

    /// Generate a learning path, falling back to the simplified prompt once.
    ///
    /// Only an unusable reply triggers the fallback; a failed capability call
    /// is returned as is.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptySubject` for a blank subject,
    /// `ContentError::Capability` when a request fails, and
    /// `ContentError::Unparseable` when the simplified reply is unusable too.
    pub async fn generate(
        &self,
        subject: &str,
        learner: LearnerContext<'_>,
    ) -> Result<GeneratedPath, ContentError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ContentError::EmptySubject);
        }

        let prompt = prompts::learning_path_prompt(subject, learner);
        let reply = self.capability.complete(&prompt).await?;

        match decode_reply(&reply, subject) {
            Ok(curriculum) => {
                check_module_count(&curriculum, GenerationTier::Full);
                tracing::info!(subject, modules = curriculum.module_count(), "learning path generated");
                Ok(GeneratedPath {
                    curriculum,
                    tier: GenerationTier::Full,
                })
            }
            Err(err) => {
                tracing::warn!(subject, error = %err, "learning path reply unusable, retrying with simplified prompt");
                let curriculum = self
                    .generate_simplified(subject, learner.knowledge_level)
                    .await?;
                Ok(GeneratedPath {
                    curriculum,
                    tier: GenerationTier::Simplified,
                })
            }
        }
    }

    /// Generate a small learning path with the constrained prompt. No further fallback.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Capability` when the request fails and
    /// `ContentError::Unparseable` when the reply is unusable.
    pub async fn generate_simplified(
        &self,
        subject: &str,
        knowledge_level: KnowledgeLevel,
    ) -> Result<Curriculum, ContentError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ContentError::EmptySubject);
        }

        let prompt = prompts::simplified_path_prompt(subject, knowledge_level);
        let reply = self.capability.complete(&prompt).await?;

        let curriculum =
            decode_reply(&reply, subject).map_err(|source| ContentError::Unparseable {
                tier: GenerationTier::Simplified,
                source,
            })?;
        check_module_count(&curriculum, GenerationTier::Simplified);
        tracing::info!(subject, modules = curriculum.module_count(), "simplified learning path generated");
        Ok(curriculum)
    }

    /// Generate for the session's learner and install the result.
    ///
    /// On success the path replaces any earlier one for `subject`, progress is
    /// reset to today, and the subject becomes current. On failure the state is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Same as [`ContentGenerator::generate`].
    pub async fn generate_into(
        &self,
        state: &mut SessionState,
        subject: &str,
        clock: &Clock,
    ) -> Result<GenerationTier, ContentError> {
        let generated = self
            .generate(subject, LearnerContext::from_profile(state.profile()))
            .await?;
        let tier = generated.tier;
        state.install_curriculum(generated.curriculum, clock.today());
        Ok(tier)
    }
}

fn check_module_count(curriculum: &Curriculum, tier: GenerationTier) {
    let target = match tier {
        GenerationTier::Full => FULL_MODULES,
        GenerationTier::Simplified => SIMPLIFIED_MODULES,
    };
    if !target.contains(&curriculum.module_count()) {
        tracing::warn!(
            subject = curriculum.subject(),
            %tier,
            modules = curriculum.module_count(),
            "module count outside the requested range"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedGenerator;
    use crate::error::CapabilityError;
    use pathway_core::model::{LearningStyle, ModuleId};
    use pathway_core::time::fixed_clock;
    use std::sync::Arc;

    fn path_json(subject: &str, modules: u32, exercises: u32) -> String {
        let modules: Vec<_> = (1..=modules)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "title": format!("Module {id}"),
                    "description": "desc",
                    "content": "content",
                    "exercises": (1..=exercises).map(|n| serde_json::json!({
                        "question": format!("Question {n}"),
                        "options": ["yes", "no"],
                        "answer": "yes",
                        "explanation": "because"
                    })).collect::<Vec<_>>(),
                    "additional_resources": []
                })
            })
            .collect();
        serde_json::json!({ "subject": subject, "overview": "overview", "modules": modules })
            .to_string()
    }

    fn learner() -> LearnerContext<'static> {
        LearnerContext {
            user_name: "Learner",
            knowledge_level: KnowledgeLevel::Beginner,
            learning_style: LearningStyle::Visual,
        }
    }

    fn generator(script: &ScriptedGenerator) -> ContentGenerator {
        ContentGenerator::new(TextCapability::new(Arc::new(script.clone())))
    }

    #[tokio::test]
    async fn full_reply_is_accepted_without_fallback() {
        let script = ScriptedGenerator::new().with_reply(path_json("Algebra", 5, 3));
        let path = generator(&script).generate("Algebra", learner()).await.unwrap();

        assert_eq!(path.tier, GenerationTier::Full);
        assert_eq!(path.curriculum.subject(), "Algebra");
        assert_eq!(path.curriculum.module_count(), 5);
        assert_eq!(script.prompts().len(), 1);
    }

    #[tokio::test]
    async fn unusable_reply_falls_back_to_simplified_prompt() {
        let script = ScriptedGenerator::new()
            .with_reply("Here is your path! Module one is about...")
            .with_reply(format!("```json\n{}\n```", path_json("Algebra", 3, 2)));
        let path = generator(&script).generate("Algebra", learner()).await.unwrap();

        assert_eq!(path.tier, GenerationTier::Simplified);
        assert_eq!(path.curriculum.module_count(), 3);
        let prompts = script.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("Return ONLY a valid JSON object"));
    }

    #[tokio::test]
    async fn schema_mismatch_also_falls_back() {
        let gap = path_json("Algebra", 5, 3).replace("\"id\":2", "\"id\":9");
        let script = ScriptedGenerator::new()
            .with_reply(gap)
            .with_reply(path_json("Algebra", 3, 2));
        let path = generator(&script).generate("Algebra", learner()).await.unwrap();
        assert_eq!(path.tier, GenerationTier::Simplified);
    }

    #[tokio::test]
    async fn second_unusable_reply_is_terminal() {
        let script = ScriptedGenerator::new()
            .with_reply("no json here")
            .with_reply("still no json");
        let err = generator(&script)
            .generate("Algebra", learner())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::Unparseable {
                tier: GenerationTier::Simplified,
                ..
            }
        ));
        assert_eq!(script.prompts().len(), 2);
    }

    #[tokio::test]
    async fn capability_failure_does_not_fall_back() {
        let script = ScriptedGenerator::new()
            .with_failure(CapabilityError::Timeout)
            .with_reply(path_json("Algebra", 3, 2));
        let err = generator(&script)
            .generate("Algebra", learner())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Capability(CapabilityError::Timeout)));
        assert_eq!(script.pending(), 1);
    }

    #[tokio::test]
    async fn blank_subject_is_rejected_before_any_request() {
        let script = ScriptedGenerator::new();
        let err = generator(&script).generate("   ", learner()).await.unwrap_err();
        assert!(matches!(err, ContentError::EmptySubject));
        assert!(script.prompts().is_empty());
    }

    #[tokio::test]
    async fn generate_into_installs_path_and_progress() {
        let script = ScriptedGenerator::new().with_reply(path_json("Algebra", 5, 3));
        let mut state = SessionState::new();
        let clock = fixed_clock();

        let tier = generator(&script)
            .generate_into(&mut state, "Algebra", &clock)
            .await
            .unwrap();

        assert_eq!(tier, GenerationTier::Full);
        assert_eq!(state.current_subject(), Some("Algebra"));
        assert_eq!(state.current_module(), Some(ModuleId::FIRST));
        assert_eq!(state.progress("Algebra").unwrap().started(), clock.today());
    }

    #[tokio::test]
    async fn failed_generation_leaves_state_untouched() {
        let script = ScriptedGenerator::new()
            .with_reply("nope")
            .with_reply("nope again");
        let mut state = SessionState::new();

        let result = generator(&script)
            .generate_into(&mut state, "Algebra", &fixed_clock())
            .await;

        assert!(result.is_err());
        assert!(!state.has_subject("Algebra"));
        assert!(state.progress("Algebra").is_none());
        assert!(state.current_subject().is_none());
    }

    #[tokio::test]
    async fn prompt_uses_session_profile() {
        let script = ScriptedGenerator::new().with_reply(path_json("Chemistry", 5, 3));
        let mut state = SessionState::new();
        state.profile_mut().set_name("Grace");
        state
            .profile_mut()
            .set_learning_style(LearningStyle::Auditory);

        generator(&script)
            .generate_into(&mut state, "Chemistry", &fixed_clock())
            .await
            .unwrap();

        let prompt = &script.prompts()[0];
        assert!(prompt.contains("Grace"));
        assert!(prompt.contains("Auditory"));
    }
}
