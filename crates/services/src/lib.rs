#![forbid(unsafe_code)]

pub mod ai;
pub mod content;
pub mod error;
pub mod explanation;
pub mod grading;
pub mod interaction;
pub mod progress;
pub mod prompts;
pub mod quiz;

pub use pathway_core::Clock;

pub use ai::{AiConfig, GeminiClient, ScriptedGenerator, TextCapability, TextGenerator};
pub use content::{ContentGenerator, GeneratedPath, GenerationTier};
pub use error::{
    CapabilityError, ConfigError, ContentError, ErrorKind, HandlerError, PayloadError,
    ProgressError, QuizError,
};
pub use explanation::ExplanationService;
pub use grading::GradingService;
pub use interaction::{Action, InteractionHandler, Notice, NoticeLevel, ViewModel};
pub use progress::ModuleCompletion;
pub use prompts::{GradingRequest, LearnerContext};
pub use quiz::{AnswerResult, QuizEngine};
