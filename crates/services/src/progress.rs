//! Progress Tracker: completion events and score history per subject.

use chrono::{DateTime, Utc};

use pathway_core::model::{Curriculum, ModuleId, ScoreRecord, SessionState};

use crate::error::ProgressError;

/// Result of marking a module complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleCompletion {
    /// `false` when the module had already been completed.
    pub newly_completed: bool,
    pub current_module: ModuleId,
}

fn curriculum_for<'s>(
    state: &'s SessionState,
    subject: &str,
) -> Result<&'s Curriculum, ProgressError> {
    state
        .curriculum(subject)
        .ok_or_else(|| ProgressError::NoCurriculum(subject.to_string()))
}

/// Mark `module_id` of `subject` completed and advance the progress pointer.
///
/// Idempotent with respect to the completed set. The pointer moves to the
/// following module, or stays put on the last one.
///
/// # Errors
///
/// Returns `ProgressError::UnknownSubject` if no progress exists for `subject`,
/// `ProgressError::NoCurriculum` if its path is missing, and
/// `ProgressError::UnknownModule` if the path has no such module.
pub fn complete_module(
    state: &mut SessionState,
    subject: &str,
    module_id: ModuleId,
) -> Result<ModuleCompletion, ProgressError> {
    if state.progress(subject).is_none() {
        return Err(ProgressError::UnknownSubject(subject.to_string()));
    }
    let curriculum = curriculum_for(state, subject)?;
    if curriculum.module(module_id).is_none() {
        return Err(ProgressError::UnknownModule {
            subject: subject.to_string(),
            module: module_id,
        });
    }
    let last = curriculum.last_module_id();

    let progress = state
        .progress_mut(subject)
        .ok_or_else(|| ProgressError::UnknownSubject(subject.to_string()))?;
    let newly_completed = progress.complete_module(module_id, last);
    let current_module = progress.current_module().unwrap_or(module_id);

    tracing::info!(subject, module = %module_id, newly_completed, next = %current_module, "module completed");
    Ok(ModuleCompletion {
        newly_completed,
        current_module,
    })
}

/// Append a quiz score to `subject`'s history. Earlier attempts are kept.
///
/// # Errors
///
/// Returns `ProgressError::UnknownSubject` if no progress exists for `subject`
/// and `ProgressError::Score` if `score` is outside `0..=100`.
pub fn record_score(
    state: &mut SessionState,
    subject: &str,
    module_id: ModuleId,
    score: f64,
    at: DateTime<Utc>,
) -> Result<(), ProgressError> {
    let record = ScoreRecord::new(module_id, score, at)?;
    let progress = state
        .progress_mut(subject)
        .ok_or_else(|| ProgressError::UnknownSubject(subject.to_string()))?;
    progress.push_score(record);
    tracing::info!(subject, module = %module_id, score, "quiz score recorded");
    Ok(())
}

/// Share of `subject`'s modules completed, in percent.
///
/// # Errors
///
/// Returns `ProgressError::NoCurriculum` if no path exists for `subject` and
/// `ProgressError::UnknownSubject` if it has no progress record.
pub fn completion_percentage(state: &SessionState, subject: &str) -> Result<f64, ProgressError> {
    let curriculum = curriculum_for(state, subject)?;
    let progress = state
        .progress(subject)
        .ok_or_else(|| ProgressError::UnknownSubject(subject.to_string()))?;
    progress
        .completion_percentage(curriculum.module_count())
        .ok_or_else(|| ProgressError::NoCurriculum(subject.to_string()))
}
