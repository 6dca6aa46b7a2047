use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ModuleId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("a learning path needs at least one module")]
    NoModules,

    #[error("module ids must run 1..=n in order: expected {expected}, found {found}")]
    NonContiguousModuleId { expected: u32, found: ModuleId },

    #[error("module {module} has an empty title")]
    EmptyModuleTitle { module: ModuleId },

    #[error("module {module}, exercise {number}: question cannot be empty")]
    EmptyQuestion { module: ModuleId, number: usize },

    #[error("module {module}, exercise {number}: multiple choice needs at least two options")]
    TooFewOptions { module: ModuleId, number: usize },

    #[error("module {module}, exercise {number}: answer is not one of the options")]
    AnswerNotInOptions { module: ModuleId, number: usize },
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// One practice question.
///
/// An empty `options` list means free-text; otherwise it is multiple choice and
/// `answer` is one of the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Exercise {
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        !self.options.is_empty()
    }

    /// Exact, case-sensitive comparison against the stored answer.
    #[must_use]
    pub fn is_correct(&self, user_answer: &str) -> bool {
        user_answer == self.answer
    }

    fn validate(&self, module: ModuleId, number: usize) -> Result<(), CurriculumError> {
        if self.question.trim().is_empty() {
            return Err(CurriculumError::EmptyQuestion { module, number });
        }
        if self.options.len() == 1 {
            return Err(CurriculumError::TooFewOptions { module, number });
        }
        if self.is_multiple_choice() && !self.options.iter().any(|o| o == &self.answer) {
            return Err(CurriculumError::AnswerNotInOptions { module, number });
        }
        Ok(())
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// One ordered unit of a learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub additional_resources: Vec<String>,
}

impl Module {
    /// Label used when listing modules, e.g. `Module 2: Linear equations`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Module {}: {}", self.id, self.title)
    }

    #[must_use]
    pub fn has_exercises(&self) -> bool {
        !self.exercises.is_empty()
    }

    fn validate(&self) -> Result<(), CurriculumError> {
        if self.title.trim().is_empty() {
            return Err(CurriculumError::EmptyModuleTitle { module: self.id });
        }
        for (index, exercise) in self.exercises.iter().enumerate() {
            exercise.validate(self.id, index + 1)?;
        }
        Ok(())
    }
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// Unvalidated learning path, exactly as decoded from a generator reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurriculumDraft {
    pub subject: String,
    pub overview: String,
    pub modules: Vec<Module>,
}

impl CurriculumDraft {
    /// Check the schema invariants and produce a `Curriculum`.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` for an empty subject, no modules, module ids that
    /// do not run `1..=n`, empty titles or questions, a single option, or an
    /// answer missing from its options.
    pub fn validate(self) -> Result<Curriculum, CurriculumError> {
        if self.subject.trim().is_empty() {
            return Err(CurriculumError::EmptySubject);
        }
        if self.modules.is_empty() {
            return Err(CurriculumError::NoModules);
        }

        let mut expected = ModuleId::FIRST;
        for module in &self.modules {
            if module.id != expected {
                return Err(CurriculumError::NonContiguousModuleId {
                    expected: expected.value(),
                    found: module.id,
                });
            }
            module.validate()?;
            expected = expected.next();
        }

        Ok(Curriculum {
            subject: self.subject,
            overview: self.overview,
            modules: self.modules,
        })
    }
}

/// A validated learning path for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Curriculum {
    subject: String,
    overview: String,
    modules: Vec<Module>,
}

impl Curriculum {
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn overview(&self) -> &str {
        &self.overview
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Id of the final module. Always present since a curriculum is never empty.
    #[must_use]
    pub fn last_module_id(&self) -> ModuleId {
        self.modules.last().map_or(ModuleId::FIRST, |m| m.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(answer: &str) -> Exercise {
        Exercise {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            answer: answer.into(),
            explanation: String::new(),
        }
    }

    fn module(id: u32) -> Module {
        Module {
            id: ModuleId::new(id),
            title: format!("Unit {id}"),
            description: String::new(),
            content: "Read this".into(),
            exercises: vec![exercise("4")],
            additional_resources: Vec::new(),
        }
    }

    fn draft(modules: Vec<Module>) -> CurriculumDraft {
        CurriculumDraft {
            subject: "Arithmetic".into(),
            overview: "Numbers".into(),
            modules,
        }
    }

    #[test]
    fn valid_draft_becomes_curriculum() {
        let curriculum = draft(vec![module(1), module(2), module(3)]).validate().unwrap();
        assert_eq!(curriculum.subject(), "Arithmetic");
        assert_eq!(curriculum.module_count(), 3);
        assert_eq!(curriculum.last_module_id(), ModuleId::new(3));
        assert_eq!(curriculum.module(ModuleId::new(2)).unwrap().title, "Unit 2");
        assert!(curriculum.module(ModuleId::new(4)).is_none());
    }

    #[test]
    fn empty_subject_and_modules_are_rejected() {
        let mut blank = draft(vec![module(1)]);
        blank.subject = "  ".into();
        assert_eq!(blank.validate().unwrap_err(), CurriculumError::EmptySubject);
        assert_eq!(draft(Vec::new()).validate().unwrap_err(), CurriculumError::NoModules);
    }

    #[test]
    fn module_ids_must_be_contiguous_from_one() {
        let err = draft(vec![module(1), module(3)]).validate().unwrap_err();
        assert_eq!(
            err,
            CurriculumError::NonContiguousModuleId {
                expected: 2,
                found: ModuleId::new(3)
            }
        );

        let err = draft(vec![module(0)]).validate().unwrap_err();
        assert!(matches!(err, CurriculumError::NonContiguousModuleId { expected: 1, .. }));
    }

    #[test]
    fn answer_must_match_an_option() {
        let mut bad = module(1);
        bad.exercises.push(exercise("five"));
        let err = draft(vec![bad]).validate().unwrap_err();
        assert_eq!(
            err,
            CurriculumError::AnswerNotInOptions {
                module: ModuleId::new(1),
                number: 2
            }
        );
    }

    #[test]
    fn single_option_is_rejected_but_free_text_is_fine() {
        let mut single = module(1);
        single.exercises[0].options = vec!["4".into()];
        assert!(matches!(
            draft(vec![single]).validate().unwrap_err(),
            CurriculumError::TooFewOptions { .. }
        ));

        let mut free_text = module(1);
        free_text.exercises[0].options.clear();
        free_text.exercises[0].answer = "four".into();
        assert!(draft(vec![free_text]).validate().is_ok());
    }

    #[test]
    fn exact_match_grading_is_case_sensitive() {
        let ex = exercise("4");
        assert!(ex.is_correct("4"));
        assert!(!ex.is_correct(" 4"));

        let mut word = exercise("Four");
        word.options = vec!["Four".into(), "Five".into()];
        assert!(!word.is_correct("four"));
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let json = r#"{
            "subject": "Algebra",
            "overview": "Symbols",
            "modules": [
                {
                    "id": 1,
                    "title": "Variables",
                    "content": "x stands for a number",
                    "exercises": [{ "question": "What is x in x + 1 = 2?", "answer": "1" }]
                }
            ]
        }"#;
        let draft: CurriculumDraft = serde_json::from_str(json).unwrap();
        let curriculum = draft.validate().unwrap();
        let module = &curriculum.modules()[0];
        assert!(module.additional_resources.is_empty());
        assert!(module.description.is_empty());
        assert!(!module.exercises[0].is_multiple_choice());
        assert_eq!(module.heading(), "Module 1: Variables");
    }
}
