mod curriculum;
mod ids;
mod profile;
mod progress;
mod quiz;
mod session;

pub use curriculum::{Curriculum, CurriculumDraft, CurriculumError, Exercise, Module};
pub use ids::{ModuleId, ParseIdError};
pub use profile::{
    DEFAULT_LEARNER_NAME, KnowledgeLevel, LearningStyle, ProfileError, UserProfile,
};
pub use progress::{ScoreError, ScoreRecord, SubjectProgress, percentage};
pub use quiz::{QuizOutcome, QuizPhase, QuizResponse, QuizSession, QuizStateError};
pub use session::SessionState;
