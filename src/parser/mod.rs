pub mod lines;
pub mod markers;
pub mod plan;
pub mod questions;
pub mod split;

pub use plan::{Item, Section};
pub use questions::{QuestionRow, QuestionSection};

/// Four-stage pipeline for development-plan style texts:
/// raw text → normalized lines → classified markers → section tree → plan split.
pub fn parse_plan(text: &str) -> Vec<Section> {
    let lines = lines::normalize(text);
    let sections = plan::build_sections(&lines);
    split::split_plan_sections(sections)
}

/// Sibling pipeline for interview-question texts, sharing the normalizer and
/// classifier but building tabular rows instead of items.
pub fn parse_questions(text: &str) -> Vec<QuestionSection> {
    let lines = lines::normalize(text);
    questions::build_sections(&lines)
}

// ── Tests ──
