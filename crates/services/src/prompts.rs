//! Natural-language instructions sent to the text-generation capability.

use pathway_core::model::{KnowledgeLevel, LearningStyle, UserProfile};
use serde_json::json;

/// The learner attributes every prompt is tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnerContext<'a> {
    pub user_name: &'a str,
    pub knowledge_level: KnowledgeLevel,
    pub learning_style: LearningStyle,
}

impl<'a> LearnerContext<'a> {
    #[must_use]
    pub fn from_profile(profile: &'a UserProfile) -> Self {
        Self {
            user_name: profile.name(),
            knowledge_level: profile.knowledge_level(),
            learning_style: profile.learning_style(),
        }
    }

    fn level(&self) -> String {
        self.knowledge_level.label().to_lowercase()
    }
}

/// Full learning-path request: 5-7 modules, 3-5 exercises each, adapted to the style.
#[must_use]
pub fn learning_path_prompt(subject: &str, learner: LearnerContext<'_>) -> String {
    let style = learner.learning_style.label();
    let example = json!({
        "subject": subject,
        "overview": "A short overview of what the learner will achieve",
        "modules": [{
            "id": 1,
            "title": "Module title",
            "description": "One or two sentence summary",
            "content": format!("Detailed lesson content written for {style} learners"),
            "exercises": [{
                "question": "Practice question",
                "options": ["Option A", "Option B", "Option C", "Option D"],
                "answer": "Option A",
                "explanation": "Why this answer is right"
            }],
            "additional_resources": ["Resource 1", "Resource 2"]
        }]
    });

    format!(
        "Design a complete learning path that teaches {subject} to a {level} learner named {name} \
who prefers the {style} learning style.\n\n\
Respond with a single JSON object shaped exactly like this example:\n{example:#}\n\n\
Requirements:\n\
- 5 to 7 modules of steadily increasing difficulty, with ids numbered 1, 2, 3 and so on.\n\
- 3 to 5 exercises per module. For multiple choice, \"answer\" must repeat one of the \"options\" word for word.\n\
- Choose examples, analogies and activities that suit {style} learners.\n\
- The JSON must be syntactically valid: double quotes for every key and string, no trailing commas, \
all brackets closed.",
        level = learner.level(),
        name = learner.user_name,
    )
}

/// Constrained fallback request: 3 modules, 2 exercises each, bare JSON only.
#[must_use]
pub fn simplified_path_prompt(subject: &str, knowledge_level: KnowledgeLevel) -> String {
    let example = json!({
        "subject": subject,
        "overview": "brief overview",
        "modules": [{
            "id": 1,
            "title": "title1",
            "description": "description1",
            "content": "content1",
            "exercises": [{
                "question": "question1",
                "options": ["opt1", "opt2", "opt3", "opt4"],
                "answer": "opt1",
                "explanation": "explanation1"
            }],
            "additional_resources": ["res1", "res2"]
        }]
    });

    format!(
        "Create a simple learning path for {subject} at {level} level.\n\n\
Return ONLY a valid JSON object with exactly this structure:\n{example:#}\n\n\
Include 3 modules with 2 exercises each. Do not use markdown or code fences, and do not add \
any text before or after the JSON.",
        level = knowledge_level.label().to_lowercase(),
    )
}

/// Free-text question about one module.
#[must_use]
pub fn explanation_prompt(
    question: &str,
    subject: &str,
    module_title: &str,
    learner: LearnerContext<'_>,
) -> String {
    let style = learner.learning_style.label();
    format!(
        "{name} is studying {subject}, currently the module \"{module_title}\". \
They are at {level} level and prefer the {style} learning style.\n\n\
Their question: \"{question}\"\n\n\
Write a helpful, detailed explanation that:\n\
1. Answers the question directly\n\
2. Uses examples and explanations suited to {style} learners\n\
3. Connects the answer to the wider context of {subject}\n\
4. Fits someone at {level} level",
        name = learner.user_name,
        level = learner.level(),
    )
}

/// Inputs for grading one quiz answer.
#[derive(Debug, Clone, Copy)]
pub struct GradingRequest<'a> {
    pub user_answer: &'a str,
    pub correct_answer: &'a str,
    pub question: &'a str,
    pub subject: &'a str,
    pub module_title: &'a str,
    pub learner: LearnerContext<'a>,
}

#[must_use]
pub fn grading_prompt(request: &GradingRequest<'_>) -> String {
    format!(
        "Evaluate a learner's answer to a question about {subject} from the module \"{module_title}\".\n\n\
Question: {question}\n\
Correct answer: {correct}\n\
Learner's answer: {answer}\n\n\
Provide:\n\
1. Whether the answer is correct, partially correct, or incorrect\n\
2. A detailed explanation of why\n\
3. Any misconceptions the answer reveals\n\
4. Tips that help the learner understand better\n\n\
The learner is at {level} level and prefers the {style} learning style.",
        subject = request.subject,
        module_title = request.module_title,
        question = request.question,
        correct = request.correct_answer,
        answer = request.user_answer,
        level = request.learner.level(),
        style = request.learner.learning_style.label(),
    )
}
