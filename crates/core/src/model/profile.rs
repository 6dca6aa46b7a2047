use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("unknown knowledge level: {0}")]
    UnknownKnowledgeLevel(String),

    #[error("unknown learning style: {0}")]
    UnknownLearningStyle(String),
}

/// Self-reported familiarity with a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl KnowledgeLevel {
    pub const ALL: [KnowledgeLevel; 4] = [
        KnowledgeLevel::Beginner,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
        KnowledgeLevel::Expert,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            KnowledgeLevel::Beginner => "Beginner",
            KnowledgeLevel::Intermediate => "Intermediate",
            KnowledgeLevel::Advanced => "Advanced",
            KnowledgeLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KnowledgeLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProfileError::UnknownKnowledgeLevel(s.to_string()))
    }
}

/// Preferred way of taking in new material; prompts adapt examples to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    ReadingWriting,
    Kinesthetic,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::ReadingWriting,
        LearningStyle::Kinesthetic,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditory",
            LearningStyle::ReadingWriting => "Reading/Writing",
            LearningStyle::Kinesthetic => "Kinesthetic",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LearningStyle {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "readingwriting" | "reading" | "writing" => Ok(LearningStyle::ReadingWriting),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            _ => Err(ProfileError::UnknownLearningStyle(s.to_string())),
        }
    }
}

pub const DEFAULT_LEARNER_NAME: &str = "Learner";

/// Who is learning, and how they like to learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    learning_style: LearningStyle,
    knowledge_level: KnowledgeLevel,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_LEARNER_NAME.to_string(),
            learning_style: LearningStyle::default(),
            knowledge_level: KnowledgeLevel::default(),
        }
    }
}

impl UserProfile {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn learning_style(&self) -> LearningStyle {
        self.learning_style
    }

    #[must_use]
    pub fn knowledge_level(&self) -> KnowledgeLevel {
        self.knowledge_level
    }

    /// Blank names fall back to the default learner name.
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_LEARNER_NAME.to_string()
        } else {
            trimmed.to_string()
        };
    }

    pub fn set_learning_style(&mut self, style: LearningStyle) {
        self.learning_style = style;
    }

    pub fn set_knowledge_level(&mut self, level: KnowledgeLevel) {
        self.knowledge_level = level;
    }
}
