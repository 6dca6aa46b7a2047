//! Plain-text rendering of a `ViewModel` for the terminal front end.

use std::fmt::Write as _;

use services::interaction::{
    ExplanationView, ModuleView, NoticeLevel, ProgressView, QuestionView, QuizView, ResultsView,
};
use services::{Notice, ViewModel};

const RULE: &str = "────────────────────────────────────────";

/// What follows a single action: notices, a fresh explanation, and the quiz.
#[must_use]
pub fn after_action(view: &ViewModel) -> String {
    let mut out = String::new();
    for notice in &view.notices {
        push_notice(&mut out, notice);
    }
    if let Some(explanation) = &view.explanation {
        push_explanation(&mut out, explanation);
    }
    if let Some(quiz) = &view.quiz {
        push_quiz(&mut out, quiz);
    }
    out
}

/// The whole session, as shown by `show`.
#[must_use]
pub fn full(view: &ViewModel) -> String {
    let mut out = String::new();
    if !view.ai_enabled {
        push_notice(
            &mut out,
            &Notice::warning("AI features are disabled: no API key is configured."),
        );
    }
    let _ = writeln!(
        out,
        "Learner: {} ({}, {})",
        view.profile.name, view.profile.knowledge_level, view.profile.learning_style
    );

    let _ = writeln!(out, "\n{RULE}\nLearning paths");
    if view.paths.is_empty() {
        let _ = writeln!(out, "  none yet; try `create <subject>`");
    }
    for path in &view.paths {
        let marker = if path.is_current { '*' } else { ' ' };
        let completion = path
            .completion
            .map_or_else(String::new, |pct| format!(", {pct:.1}% complete"));
        let _ = writeln!(
            out,
            "{marker} {} ({} modules{completion})\n    {}",
            path.subject, path.module_count, path.overview
        );
    }

    if let Some(module) = &view.module {
        push_module(&mut out, module);
    }
    out.push_str(&after_action(view));

    if !view.progress.is_empty() {
        let _ = writeln!(out, "\n{RULE}\nProgress");
        for progress in &view.progress {
            push_progress(&mut out, progress);
        }
    }
    out
}

fn push_notice(out: &mut String, notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    let _ = writeln!(out, "[{tag}] {}", notice.text);
}

fn push_module(out: &mut String, view: &ModuleView) {
    let module = &view.module;
    let done = if view.completed { " (completed)" } else { "" };
    let _ = writeln!(out, "\n{RULE}\n{}{done}", module.heading());
    if !module.description.is_empty() {
        let _ = writeln!(out, "{}", module.description);
    }
    let _ = writeln!(out, "\n{}", module.content);
    if !module.additional_resources.is_empty() {
        let _ = writeln!(out, "\nAdditional resources:");
        for resource in &module.additional_resources {
            let _ = writeln!(out, "  - {resource}");
        }
    }
    let _ = writeln!(out, "\nModules in {}:", view.subject);
    for item in &view.outline {
        let check = if item.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "  [{check}] {}", item.heading());
    }
}

fn push_explanation(out: &mut String, view: &ExplanationView) {
    let _ = writeln!(
        out,
        "\n{RULE}\nQ ({}): {}\n\n{}",
        view.module_title, view.question, view.answer
    );
}

fn push_quiz(out: &mut String, quiz: &QuizView) {
    match quiz {
        QuizView::Question(question) => push_question(out, question),
        QuizView::Results(results) => push_results(out, results),
    }
}

fn push_question(out: &mut String, view: &QuestionView) {
    let _ = writeln!(
        out,
        "\n{RULE}\nModule {}: {}, {}\n{}",
        view.module_id,
        view.module_title,
        view.position_label(),
        view.prompt
    );
    if view.options.is_empty() {
        let _ = writeln!(out, "Type `answer <your answer>`.");
    } else {
        for (i, option) in view.options.iter().enumerate() {
            let _ = writeln!(out, "  {}. {option}", i + 1);
        }
        let _ = writeln!(out, "Type `answer #n` or the option text.");
    }
}

fn push_results(out: &mut String, view: &ResultsView) {
    let _ = writeln!(
        out,
        "\n{RULE}\nQuiz results for Module {}: {}\nScore: {} ({})",
        view.module_id,
        view.module_title,
        view.score_label(),
        view.tally_label()
    );
    for (i, response) in view.review.iter().enumerate() {
        let mark = if response.is_correct { "correct" } else { "incorrect" };
        let _ = writeln!(
            out,
            "\nQuestion {} ({mark})\n{}\nYour answer: {}\nCorrect answer: {}\nFeedback:\n{}",
            i + 1,
            response.question,
            response.user_answer,
            response.correct_answer,
            response.evaluation
        );
    }
    let _ = writeln!(out, "\nType `quiz close` when you are done reviewing.");
}

fn push_progress(out: &mut String, view: &ProgressView) {
    let _ = writeln!(
        out,
        "Subject: {}\n  Started on: {}\n  {}",
        view.subject,
        view.started,
        view.summary_label()
    );
    for module in &view.completed_modules {
        let _ = writeln!(out, "  done: {}", module.heading());
    }
    for score in &view.scores {
        let _ = writeln!(out, "  quiz: {}", score.label());
    }
}
