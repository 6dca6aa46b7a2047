use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::ModuleId;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("quiz score must be within 0..=100, got {0}")]
    OutOfRange(f64),
}

/// Percentage of `part` in `whole`, or `None` when `whole` is zero.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    // Counts here are module and question tallies, far below f64's exact range.
    #[allow(clippy::cast_precision_loss)]
    let pct = 100.0 * part as f64 / whole as f64;
    Some(pct)
}

/// One finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    module_id: ModuleId,
    score: f64,
    recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// # Errors
    ///
    /// Returns `ScoreError::OutOfRange` if `score` is not a finite value in `0..=100`.
    pub fn new(
        module_id: ModuleId,
        score: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ScoreError> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ScoreError::OutOfRange(score));
        }
        Ok(Self {
            module_id,
            score,
            recorded_at,
        })
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Completion and score history for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    started: NaiveDate,
    modules_completed: BTreeSet<ModuleId>,
    current_module: Option<ModuleId>,
    quiz_scores: Vec<ScoreRecord>,
}

impl SubjectProgress {
    /// Fresh progress: nothing completed, no module pointer yet, no scores.
    #[must_use]
    pub fn new(started: NaiveDate) -> Self {
        Self {
            started,
            modules_completed: BTreeSet::new(),
            current_module: None,
            quiz_scores: Vec::new(),
        }
    }

    #[must_use]
    pub fn started(&self) -> NaiveDate {
        self.started
    }

    #[must_use]
    pub fn modules_completed(&self) -> &BTreeSet<ModuleId> {
        &self.modules_completed
    }

    #[must_use]
    pub fn is_completed(&self, module_id: ModuleId) -> bool {
        self.modules_completed.contains(&module_id)
    }

    /// Module the learner should continue with; `None` until one is completed.
    #[must_use]
    pub fn current_module(&self) -> Option<ModuleId> {
        self.current_module
    }

    #[must_use]
    pub fn quiz_scores(&self) -> &[ScoreRecord] {
        &self.quiz_scores
    }

    /// Mark `module_id` completed and move the pointer past it.
    ///
    /// The pointer stays on `module_id` when it is `last_module_id`.
    /// Returns `true` if the module was not completed before.
    pub fn complete_module(&mut self, module_id: ModuleId, last_module_id: ModuleId) -> bool {
        let newly_completed = self.modules_completed.insert(module_id);
        self.current_module = Some(if module_id >= last_module_id {
            module_id
        } else {
            module_id.next()
        });
        newly_completed
    }

    /// Append an attempt. History is cumulative; earlier attempts are kept.
    pub fn push_score(&mut self, record: ScoreRecord) {
        self.quiz_scores.push(record);
    }

    /// Share of `total_modules` completed, in percent.
    #[must_use]
    pub fn completion_percentage(&self, total_modules: usize) -> Option<f64> {
        percentage(self.modules_completed.len(), total_modules)
    }
}
