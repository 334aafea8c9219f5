use std::sync::LazyLock;

use regex::Regex;

/// Optional ordinal + separator between a marker phrase and its inline content,
/// e.g. the " 1: " in "Gelişim Planı 1: Delegasyon".
static LEAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d*\s*[:\-–—]?\s*").unwrap());

const SEPARATORS: &[char] = &[':', '-', '–', '—'];

/// Recognized heading categories. Sub-markers (`DailyQuestion`, `MonthlyCheck`,
/// `QuarterlyCheck`) are content-level: inside a Practice/Daily Usage body they
/// never open a new item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    PlanTitle,
    SectionTitle,
    AltHeading,
    Goal,
    DailyUsage,
    Training,
    Podcast,
    Practice,
    DailyQuestion,
    MonthlyCheck,
    QuarterlyCheck,
    DevelopmentArea,
    InterviewQuestion,
    FollowUp,
}

impl MarkerKind {
    pub fn is_sub_marker(self) -> bool {
        matches!(
            self,
            Self::DailyQuestion | Self::MonthlyCheck | Self::QuarterlyCheck
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Tr,
    En,
}

pub struct Marker {
    pub locale: Locale,
    pub label: &'static str,
    pub kind: MarkerKind,
}

/// Heading phrases recognized by the upstream report generator; part of the wire
/// contract. First match wins, so compound phrases sit above their shorter
/// variants ("Podcast/Okuma" before bare "Podcast"). Adding a locale is a matter
/// of adding rows here.
pub static MARKERS: &[Marker] = &[
    // Turkish
    Marker { locale: Locale::Tr, label: "Gelişim Planı", kind: MarkerKind::PlanTitle },
    Marker { locale: Locale::Tr, label: "Gelişim Alanı", kind: MarkerKind::DevelopmentArea },
    Marker { locale: Locale::Tr, label: "Mülakat Sorusu", kind: MarkerKind::InterviewQuestion },
    Marker { locale: Locale::Tr, label: "Devam Sorusu", kind: MarkerKind::FollowUp },
    Marker { locale: Locale::Tr, label: "Başlık", kind: MarkerKind::SectionTitle },
    Marker { locale: Locale::Tr, label: "Detay", kind: MarkerKind::AltHeading },
    Marker { locale: Locale::Tr, label: "Günlük Kullanım", kind: MarkerKind::DailyUsage },
    Marker { locale: Locale::Tr, label: "Günlük Soru", kind: MarkerKind::DailyQuestion },
    Marker { locale: Locale::Tr, label: "Hedef", kind: MarkerKind::Goal },
    Marker { locale: Locale::Tr, label: "Eğitim", kind: MarkerKind::Training },
    Marker { locale: Locale::Tr, label: "Podcast/Okuma", kind: MarkerKind::Podcast },
    Marker { locale: Locale::Tr, label: "Uygulama", kind: MarkerKind::Practice },
    Marker { locale: Locale::Tr, label: "Aylık", kind: MarkerKind::MonthlyCheck },
    Marker { locale: Locale::Tr, label: "Çeyreklik", kind: MarkerKind::QuarterlyCheck },
    // English
    Marker { locale: Locale::En, label: "Development Plan", kind: MarkerKind::PlanTitle },
    Marker { locale: Locale::En, label: "Development Area", kind: MarkerKind::DevelopmentArea },
    Marker { locale: Locale::En, label: "Interview Question", kind: MarkerKind::InterviewQuestion },
    Marker { locale: Locale::En, label: "Follow-up Question", kind: MarkerKind::FollowUp },
    Marker { locale: Locale::En, label: "Follow up Question", kind: MarkerKind::FollowUp },
    Marker { locale: Locale::En, label: "Title", kind: MarkerKind::SectionTitle },
    Marker { locale: Locale::En, label: "Detail", kind: MarkerKind::AltHeading },
    Marker { locale: Locale::En, label: "Daily Usage", kind: MarkerKind::DailyUsage },
    Marker { locale: Locale::En, label: "Daily Question", kind: MarkerKind::DailyQuestion },
    Marker { locale: Locale::En, label: "Goal", kind: MarkerKind::Goal },
    Marker { locale: Locale::En, label: "Training", kind: MarkerKind::Training },
    Marker { locale: Locale::En, label: "Podcast/Reading", kind: MarkerKind::Podcast },
    Marker { locale: Locale::En, label: "Podcast", kind: MarkerKind::Podcast },
    Marker { locale: Locale::En, label: "Practice", kind: MarkerKind::Practice },
    Marker { locale: Locale::En, label: "Monthly", kind: MarkerKind::MonthlyCheck },
    Marker { locale: Locale::En, label: "Quarterly", kind: MarkerKind::QuarterlyCheck },
];

/// Classification result for one normalized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// A canonical marker hit, with the display label and locale from the
    /// marker table and any content following the marker on the same line.
    Marker {
        kind: MarkerKind,
        label: &'static str,
        locale: Locale,
        inline: Option<String>,
    },
    /// Ad-hoc "Label: value" line split by the secondary heuristic.
    Labeled { label: String, value: String },
    /// No marker and no heuristic applied; handled by the builders' fallbacks.
    Plain,
}

/// Classify one normalized line against the marker table, falling back to the
/// separator-split and first-sentence heuristics.
pub fn classify_line(line: &str) -> LineClass {
    for m in MARKERS {
        let Some(rest) = strip_prefix_ignore_case(line, m.label) else {
            continue;
        };
        // The phrase must end the line or continue with whitespace, an ordinal,
        // or a separator. "Development planning..." is not a PlanTitle.
        if !boundary_ok(rest) {
            continue;
        }
        let inline = strip_lead(rest);
        return LineClass::Marker {
            kind: m.kind,
            label: m.label,
            locale: m.locale,
            inline: (!inline.is_empty()).then(|| inline.to_string()),
        };
    }

    if let Some((label, value)) = split_at_separator(line) {
        return LineClass::Labeled { label, value };
    }
    if let Some((label, value)) = split_at_sentence(line) {
        return LineClass::Labeled { label, value };
    }

    LineClass::Plain
}

/// Case-insensitive prefix match returning the rest of `line` after `phrase`.
pub(crate) fn strip_prefix_ignore_case<'a>(line: &'a str, phrase: &str) -> Option<&'a str> {
    let mut rest = line;
    for pc in phrase.chars() {
        let c = rest.chars().next()?;
        if !c.to_lowercase().eq(pc.to_lowercase()) {
            return None;
        }
        rest = &rest[c.len_utf8()..];
    }
    Some(rest)
}

/// Strip the optional ordinal and separator after a matched phrase.
pub(crate) fn strip_lead(rest: &str) -> &str {
    match LEAD_RE.find(rest) {
        Some(m) => rest[m.end()..].trim(),
        None => rest.trim(),
    }
}

fn boundary_ok(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || c.is_ascii_digit() || SEPARATORS.contains(&c),
    }
}

/// "Label: value" split at the first separator with non-trivial trailing text.
/// Dashes only count when surrounded by whitespace, so hyphenated words like
/// "follow-up" survive intact; a colon counts anywhere.
fn split_at_separator(line: &str) -> Option<(String, String)> {
    let mut prev: Option<char> = None;
    let mut iter = line.char_indices().peekable();
    let mut split: Option<(usize, usize)> = None;

    while let Some((i, c)) = iter.next() {
        let hit = match c {
            ':' => true,
            '-' | '–' | '—' => {
                prev.is_some_and(char::is_whitespace)
                    && iter.peek().is_some_and(|&(_, n)| n.is_whitespace())
            }
            _ => false,
        };
        if hit {
            split = Some((i, c.len_utf8()));
            break;
        }
        prev = Some(c);
    }

    let (i, len) = split?;
    let label = line[..i].trim();
    let value = line[i + len..].trim();
    if label.is_empty() || !is_nontrivial(value) {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

/// Split at the first sentence-terminating period that has trailing text.
fn split_at_sentence(line: &str) -> Option<(String, String)> {
    let idx = line
        .match_indices('.')
        .find(|&(i, _)| line[i + 1..].starts_with(char::is_whitespace))
        .map(|(i, _)| i)?;
    let label = line[..idx].trim();
    let value = line[idx + 1..].trim();
    if label.is_empty() || !is_nontrivial(value) {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

fn is_nontrivial(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(line: &str) -> (MarkerKind, Option<String>) {
        match classify_line(line) {
            LineClass::Marker { kind, inline, .. } => (kind, inline),
            other => panic!("expected marker for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn turkish_markers() {
        assert_eq!(
            marker("Başlık: Plan A"),
            (MarkerKind::SectionTitle, Some("Plan A".into()))
        );
        assert_eq!(
            marker("Hedef: Grow skill X"),
            (MarkerKind::Goal, Some("Grow skill X".into()))
        );
        assert_eq!(
            marker("Gelişim Alanı: Güven"),
            (MarkerKind::DevelopmentArea, Some("Güven".into()))
        );
        assert_eq!(
            marker("Devam Sorusu: Sonra ne değişti?"),
            (MarkerKind::FollowUp, Some("Sonra ne değişti?".into()))
        );
    }

    #[test]
    fn english_markers() {
        assert_eq!(
            marker("Development Area: Trust"),
            (MarkerKind::DevelopmentArea, Some("Trust".into()))
        );
        assert_eq!(
            marker("Follow-up Question: What changed?"),
            (MarkerKind::FollowUp, Some("What changed?".into()))
        );
        assert_eq!(marker("Goal"), (MarkerKind::Goal, None));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(marker("title: Overview").0, MarkerKind::SectionTitle);
        assert_eq!(marker("DEVELOPMENT PLAN 2").0, MarkerKind::PlanTitle);
    }

    #[test]
    fn plan_ordinal_stripped() {
        assert_eq!(
            marker("Gelişim Planı 1: Delegasyon"),
            (MarkerKind::PlanTitle, Some("Delegasyon".into()))
        );
        assert_eq!(marker("Development Plan 3"), (MarkerKind::PlanTitle, None));
    }

    #[test]
    fn dash_separators() {
        assert_eq!(
            marker("Hedef - daha iyi dinleme"),
            (MarkerKind::Goal, Some("daha iyi dinleme".into()))
        );
        assert_eq!(
            marker("Practice – weekly retro"),
            (MarkerKind::Practice, Some("weekly retro".into()))
        );
    }

    #[test]
    fn compound_phrase_wins_over_bare() {
        assert_eq!(marker("Podcast/Okuma: Radical Candor").0, MarkerKind::Podcast);
        assert_eq!(marker("Podcast/Reading: Deep Work").0, MarkerKind::Podcast);
        assert_eq!(marker("Podcast: Lenny's").0, MarkerKind::Podcast);
    }

    #[test]
    fn phrase_must_end_at_word_boundary() {
        // "Development planning" is not a PlanTitle marker; the colon heuristic
        // picks it up instead.
        assert_eq!(
            classify_line("Development planning for Q1: focus areas"),
            LineClass::Labeled {
                label: "Development planning for Q1".into(),
                value: "focus areas".into()
            }
        );
        assert_eq!(classify_line("Titles matter here"), LineClass::Plain);
    }

    #[test]
    fn sub_markers() {
        let (kind, inline) = marker("Günlük Soru: Bugün ne öğrendim?");
        assert_eq!(kind, MarkerKind::DailyQuestion);
        assert_eq!(inline.as_deref(), Some("Bugün ne öğrendim?"));
        assert!(kind.is_sub_marker());
        assert!(marker("Monthly: review metrics").0.is_sub_marker());
    }

    #[test]
    fn labeled_heuristic() {
        assert_eq!(
            classify_line("Mentor görüşmesi: ayda bir kez"),
            LineClass::Labeled {
                label: "Mentor görüşmesi".into(),
                value: "ayda bir kez".into()
            }
        );
        // hyphenated words are not split
        assert_eq!(classify_line("well-known approach"), LineClass::Plain);
        // spaced dash is
        assert_eq!(
            classify_line("Kitap – Atomic Habits"),
            LineClass::Labeled { label: "Kitap".into(), value: "Atomic Habits".into() }
        );
    }

    #[test]
    fn sentence_heuristic() {
        assert_eq!(
            classify_line("Delege etmeyi öğren. Haftada bir görev devret"),
            LineClass::Labeled {
                label: "Delege etmeyi öğren".into(),
                value: "Haftada bir görev devret".into()
            }
        );
        // trailing period alone is not a split point
        assert_eq!(classify_line("Tek cümlelik bir değerlendirme yapın."), LineClass::Plain);
    }

    #[test]
    fn plain_line() {
        assert_eq!(classify_line("Random unstructured sentence without colons"), LineClass::Plain);
    }

    #[test]
    fn marker_exclusivity() {
        // every table phrase classifies as its own kind
        for m in MARKERS {
            let line = format!("{}: x", m.label);
            match classify_line(&line) {
                LineClass::Marker { kind, .. } => assert_eq!(kind, m.kind, "phrase {}", m.label),
                other => panic!("phrase {} not classified: {:?}", m.label, other),
            }
        }
    }
}
