//! Shared error types for the services crate.

use thiserror::Error;

use pathway_core::model::{CurriculumError, ModuleId, QuizStateError, ScoreError};

use crate::content::GenerationTier;

/// Problems with the credential/configuration needed to reach the capability.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
    #[error("invalid {key} value: {raw}")]
    InvalidValue { key: &'static str, raw: String },
}

/// Failures talking to the text-generation capability.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CapabilityError {
    #[error("text generation is not configured")]
    Disabled,
    #[error("text generation returned an empty response")]
    EmptyResponse,
    #[error("text generation was blocked: {0}")]
    Blocked(String),
    #[error("text generation timed out")]
    Timeout,
    #[error("text generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// A generator reply that could not be turned into a curriculum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PayloadError {
    #[error("reply is not valid learning-path JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply does not match the learning-path schema: {0}")]
    Schema(#[from] CurriculumError),
}

/// Errors emitted by `ContentGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("subject cannot be empty")]
    EmptySubject,
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error("could not build a learning path from the {tier} reply: {source}")]
    Unparseable {
        tier: GenerationTier,
        #[source]
        source: PayloadError,
    },
}

/// Errors emitted by the progress operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no progress recorded for {0:?}")]
    UnknownSubject(String),
    #[error("no learning path exists for {0:?}")]
    NoCurriculum(String),
    #[error("module {module} does not exist in {subject:?}")]
    UnknownModule { subject: String, module: ModuleId },
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Errors emitted by `QuizEngine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no learning path exists for {0:?}")]
    UnknownSubject(String),
    #[error("module {module} does not exist in {subject:?}")]
    UnknownModule { subject: String, module: ModuleId },
    #[error("a quiz is already active; close it first")]
    AlreadyActive,
    #[error("no quiz is active")]
    NoActiveQuiz,
    #[error("the quiz still has unanswered questions")]
    NotCompleted,
    #[error(transparent)]
    Session(#[from] QuizStateError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// How a failed interaction should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credential; generation actions are unavailable.
    Configuration,
    /// The capability failed or its reply was unusable.
    Generation,
    /// The action does not fit the current session state.
    State,
}

/// Everything `InteractionHandler::handle` can catch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandlerError {
    #[error("text generation is not configured; set {} to enable this action", crate::ai::API_KEY_VAR)]
    CapabilityDisabled,
    #[error("no learning path is selected")]
    NoCurrentPath,
    #[error("no learning path exists for {0:?}")]
    UnknownSubject(String),
    #[error("module {0} does not exist in the current learning path")]
    UnknownModule(ModuleId),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

impl HandlerError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::CapabilityDisabled
            | HandlerError::Content(ContentError::Capability(CapabilityError::Disabled)) => {
                ErrorKind::Configuration
            }
            HandlerError::Content(_) => ErrorKind::Generation,
            HandlerError::NoCurrentPath
            | HandlerError::UnknownSubject(_)
            | HandlerError::UnknownModule(_)
            | HandlerError::Quiz(_)
            | HandlerError::Progress(_) => ErrorKind::State,
        }
    }
}
