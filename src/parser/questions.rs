use serde::Serialize;

use super::markers::{classify_line, LineClass, MarkerKind};

/// Tabular variant of a section: a titled list of interview-question rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSection {
    pub title: Option<String>,
    pub rows: Vec<QuestionRow>,
}

/// One table row: a development area, its interview question, and any number of
/// follow-up questions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub development_area: Option<String>,
    pub interview_question: Option<String>,
    pub follow_up_questions: Vec<String>,
}

impl QuestionRow {
    fn has_content(&self) -> bool {
        self.development_area.is_some()
            || self.interview_question.is_some()
            || !self.follow_up_questions.is_empty()
    }
}

/// Which row field unmatched lines currently flow into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    /// No row marker seen yet; unmatched lines fill the row positionally
    /// (area, then question, then follow-ups).
    None,
    InArea,
    InQuestion,
    InFollowUp,
}

/// Accumulate classified lines into interview-question sections.
pub fn build_sections(lines: &[String]) -> Vec<QuestionSection> {
    let mut builder = TableBuilder::new();
    for line in lines {
        builder.push(line);
    }
    builder.finish()
}

struct TableBuilder {
    done: Vec<QuestionSection>,
    section: Option<QuestionSection>,
    row: QuestionRow,
    state: RowState,
}

impl TableBuilder {
    fn new() -> Self {
        TableBuilder {
            done: Vec::new(),
            section: None,
            row: QuestionRow::default(),
            state: RowState::None,
        }
    }

    fn push(&mut self, line: &str) {
        match classify_line(line) {
            LineClass::Marker { kind: MarkerKind::SectionTitle, inline, .. } => {
                self.flush_row();
                self.flush_section();
                self.section = Some(QuestionSection { title: inline, rows: Vec::new() });
                self.state = RowState::None;
            }
            LineClass::Marker { kind: MarkerKind::DevelopmentArea, inline, .. } => {
                // Flush-then-start: a second area marker always finalizes the
                // prior row before opening a new one.
                if self.row.has_content() {
                    self.flush_row();
                }
                self.row.development_area = inline;
                self.state = RowState::InArea;
            }
            LineClass::Marker { kind: MarkerKind::InterviewQuestion, inline, .. } => {
                self.row.interview_question = inline;
                self.state = RowState::InQuestion;
            }
            LineClass::Marker { kind: MarkerKind::FollowUp, inline, .. } => {
                if let Some(question) = inline {
                    self.row.follow_up_questions.push(question);
                }
                self.state = RowState::InFollowUp;
            }
            // Other marker kinds and heuristic labels carry no meaning in the
            // tabular layout; treat the whole line as free text.
            _ => self.unmatched(line),
        }
    }

    fn unmatched(&mut self, line: &str) {
        match self.state {
            RowState::InArea => append(&mut self.row.development_area, line),
            RowState::InQuestion => append(&mut self.row.interview_question, line),
            RowState::InFollowUp => self.row.follow_up_questions.push(line.to_string()),
            RowState::None => {
                // Positional fallback: fill the row left to right.
                if self.row.development_area.is_none() {
                    self.row.development_area = Some(line.to_string());
                } else if self.row.interview_question.is_none() {
                    self.row.interview_question = Some(line.to_string());
                } else {
                    self.row.follow_up_questions.push(line.to_string());
                }
            }
        }
    }

    fn flush_row(&mut self) {
        if !self.row.has_content() {
            return;
        }
        let row = std::mem::take(&mut self.row);
        self.section
            .get_or_insert_with(|| QuestionSection { title: None, rows: Vec::new() })
            .rows
            .push(row);
        self.state = RowState::None;
    }

    fn flush_section(&mut self) {
        let Some(section) = self.section.take() else {
            return;
        };
        if section.rows.is_empty() {
            return;
        }
        self.done.push(section);
    }

    fn finish(mut self) -> Vec<QuestionSection> {
        self.flush_row();
        self.flush_section();
        self.done
    }
}

fn append(slot: &mut Option<String>, line: &str) {
    match slot {
        Some(text) => {
            text.push(' ');
            text.push_str(line);
        }
        None => *slot = Some(line.to_string()),
    }
}

// ── Tests ──
