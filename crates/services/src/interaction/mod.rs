mod action;
mod handler;
mod view;

// Public API of the interaction layer.
pub use crate::error::{ErrorKind, HandlerError};
pub use action::Action;
pub use handler::InteractionHandler;
pub use view::{
    ExplanationView, ModuleItem, ModuleView, Notice, NoticeLevel, PathItem, ProfileView,
    ProgressView, QuestionView, QuizView, ResultsView, SCORE_TIME_FORMAT, ScoreLine, ViewModel,
};
