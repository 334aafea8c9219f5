use serde::Serialize;

use super::markers::{classify_line, LineClass, MarkerKind};

/// A top-level titled group of items, analogous to a chapter. An empty title
/// means the section was opened implicitly at input start.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<Item>,
}

/// A titled sub-unit holding free-form content lines.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub title: String,
    pub content: Vec<String>,
}

impl Section {
    pub(crate) fn untitled() -> Self {
        Section { title: String::new(), items: Vec::new() }
    }
}

/// Accumulate classified lines into a section tree.
pub fn build_sections(lines: &[String]) -> Vec<Section> {
    let mut builder = Builder::default();
    for line in lines {
        builder.push(line);
    }
    builder.finish()
}

/// What the next unmatched line will be consumed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// A SectionTitle/PlanTitle marker had no inline content.
    SectionTitle,
    /// An AltHeading marker had no inline content.
    ItemTitle,
    /// An implicit item was just opened from a bare line; the next line is
    /// eagerly taken as its first content line.
    EagerContent,
}

#[derive(Default)]
struct Builder {
    done: Vec<Section>,
    section: Option<Section>,
    item: Option<Item>,
    /// Marker that opened the current item, if any. Drives the sub-marker rule:
    /// Daily Question/Monthly/Quarterly lines stay inline inside Practice and
    /// Daily Usage bodies.
    item_kind: Option<MarkerKind>,
    pending: Pending,
}

impl Default for Pending {
    fn default() -> Self {
        Pending::None
    }
}

impl Builder {
    fn push(&mut self, line: &str) {
        let class = classify_line(line);

        // Eager pairing: the line right after an implicit title is taken
        // verbatim as content, unless it is a canonical marker.
        if self.pending == Pending::EagerContent {
            self.pending = Pending::None;
            if !matches!(class, LineClass::Marker { .. }) {
                if let Some(item) = self.item.as_mut() {
                    item.content.push(line.to_string());
                }
                return;
            }
        }

        // A pending title consumes the raw line before any heuristic split.
        if !matches!(class, LineClass::Marker { .. }) {
            match self.pending {
                Pending::SectionTitle => {
                    self.pending = Pending::None;
                    if let Some(section) = self.section.as_mut() {
                        section.title = line.to_string();
                    }
                    return;
                }
                Pending::ItemTitle => {
                    self.pending = Pending::None;
                    self.open_item(line.to_string(), None, None);
                    return;
                }
                _ => {}
            }
        }

        match class {
            LineClass::Marker { kind, label, inline, .. } => {
                self.pending = Pending::None;
                self.on_marker(kind, label, inline);
            }
            LineClass::Labeled { label, value } => {
                self.flush_item();
                self.open_item(label, Some(value), None);
            }
            LineClass::Plain => {
                if let Some(item) = self.item.as_mut() {
                    item.content.push(line.to_string());
                } else {
                    // Last-resort pairing: this line titles a new implicit item
                    // and the next line becomes its first content line.
                    self.open_item(line.to_string(), None, None);
                    self.pending = Pending::EagerContent;
                }
            }
        }
    }

    fn on_marker(&mut self, kind: MarkerKind, label: &'static str, inline: Option<String>) {
        match kind {
            MarkerKind::PlanTitle | MarkerKind::SectionTitle => {
                self.flush_item();
                self.flush_section();
                self.section = Some(Section {
                    title: inline.clone().unwrap_or_default(),
                    items: Vec::new(),
                });
                if inline.is_none() {
                    self.pending = Pending::SectionTitle;
                }
            }
            MarkerKind::AltHeading => {
                self.flush_item();
                match inline {
                    Some(title) => self.open_item(title, None, Some(kind)),
                    None => self.pending = Pending::ItemTitle,
                }
            }
            MarkerKind::DailyQuestion | MarkerKind::MonthlyCheck | MarkerKind::QuarterlyCheck => {
                let in_body = matches!(
                    self.item_kind,
                    Some(MarkerKind::Practice | MarkerKind::DailyUsage)
                );
                if in_body {
                    // Keep practice/daily-usage blocks cohesive: the sub-marker
                    // becomes a content line, not a new item.
                    if let Some(item) = self.item.as_mut() {
                        item.content.push(match inline {
                            Some(content) => format!("{}: {}", label, content),
                            None => label.to_string(),
                        });
                        return;
                    }
                }
                self.flush_item();
                self.open_item(label.to_string(), inline, Some(kind));
            }
            // Goal, Daily Usage, Training, Podcast, Practice, and the row-level
            // markers all open an item titled with the canonical label.
            _ => {
                self.flush_item();
                self.open_item(label.to_string(), inline, Some(kind));
            }
        }
    }

    fn open_item(&mut self, title: String, first_content: Option<String>, kind: Option<MarkerKind>) {
        self.item = Some(Item {
            title,
            content: first_content.into_iter().collect(),
        });
        self.item_kind = kind;
    }

    fn flush_item(&mut self) {
        self.item_kind = None;
        let Some(mut item) = self.item.take() else {
            return;
        };
        // Title-is-first-line fallback: an item never ends up untitled.
        if item.title.is_empty() {
            if item.content.is_empty() {
                return;
            }
            item.title = item.content.remove(0);
        }
        self.section
            .get_or_insert_with(Section::untitled)
            .items
            .push(item);
    }

    fn flush_section(&mut self) {
        let Some(section) = self.section.take() else {
            return;
        };
        // A section with no items is dropped.
        if section.items.is_empty() {
            return;
        }
        self.done.push(section);
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush_item();
        self.flush_section();
        self.done
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    fn build(text: &str) -> Vec<Section> {
        build_sections(&normalize(text))
    }

    #[test]
    fn titled_plan_with_items() {
        let sections = build("Başlık: Plan A\nHedef: Grow skill X\nGünlük Soru: What did I learn today?");
        assert_eq!(sections.len(), 1);
        let s = &sections[0];
        assert_eq!(s.title, "Plan A");
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.items[0].title, "Hedef");
        assert_eq!(s.items[0].content, vec!["Grow skill X"]);
        assert_eq!(s.items[1].title, "Günlük Soru");
        assert_eq!(s.items[1].content, vec!["What did I learn today?"]);
    }

    #[test]
    fn sub_marker_stays_inside_practice_body() {
        let sections = build(
            "Uygulama: Her sprintte bir görev devret\nGünlük Soru: Bugün ne devrettim?\nAylık: Devir sayısını gözden geçir",
        );
        assert_eq!(sections.len(), 1);
        let item = &sections[0].items[0];
        assert_eq!(item.title, "Uygulama");
        assert_eq!(
            item.content,
            vec![
                "Her sprintte bir görev devret",
                "Günlük Soru: Bugün ne devrettim?",
                "Aylık: Devir sayısını gözden geçir",
            ]
        );
    }

    #[test]
    fn continuation_lines_append() {
        let sections = build("Podcast/Okuma: Radical Candor, Kim Scott\nCrucial Conversations, Patterson");
        let item = &sections[0].items[0];
        assert_eq!(item.title, "Podcast/Okuma");
        assert_eq!(item.content.len(), 2);
    }

    #[test]
    fn awaiting_section_title_consumes_next_line() {
        let sections = build("Başlık:\nİletişim Planı\nHedef: Daha çok dinle");
        assert_eq!(sections[0].title, "İletişim Planı");
        assert_eq!(sections[0].items[0].title, "Hedef");
    }

    #[test]
    fn awaiting_item_title_consumes_next_line() {
        let sections = build("Başlık: X\nDetay\nGüçlü yönler üzerine notlar\ndevamı burada");
        let item = &sections[0].items[0];
        assert_eq!(item.title, "Güçlü yönler üzerine notlar");
        assert_eq!(item.content, vec!["devamı burada"]);
    }

    #[test]
    fn multiple_plan_titles_split_sections() {
        let sections = build(
            "Gelişim Planı 1: Title One\nHedef: A\nGelişim Planı 2: Title Two\nHedef: B",
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Title One");
        assert_eq!(sections[0].items.len(), 1);
        assert_eq!(sections[1].title, "Title Two");
        assert_eq!(sections[1].items[0].content, vec!["B"]);
    }

    #[test]
    fn markerless_single_line() {
        let sections = build("Random unstructured sentence without colons");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].items.len(), 1);
        assert_eq!(sections[0].items[0].title, "Random unstructured sentence without colons");
        assert!(sections[0].items[0].content.is_empty());
    }

    #[test]
    fn markerless_lines_pair_up() {
        let sections = build("İlk serbest satır\nikinci satır içerik olur\nüçüncü satır da eklenir");
        let item = &sections[0].items[0];
        assert_eq!(item.title, "İlk serbest satır");
        assert_eq!(item.content, vec!["ikinci satır içerik olur", "üçüncü satır da eklenir"]);
    }

    #[test]
    fn eager_content_does_not_swallow_markers() {
        let sections = build("Serbest giriş satırı\nHedef: Delegasyon");
        assert_eq!(sections[0].items.len(), 2);
        assert_eq!(sections[0].items[0].title, "Serbest giriş satırı");
        assert_eq!(sections[0].items[1].title, "Hedef");
    }

    #[test]
    fn labeled_heuristic_opens_item() {
        let sections = build("Başlık: Plan\nMentor görüşmesi: ayda bir kez");
        let item = &sections[0].items[0];
        assert_eq!(item.title, "Mentor görüşmesi");
        assert_eq!(item.content, vec!["ayda bir kez"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(build("").is_empty());
        assert!(build("\n \n").is_empty());
    }

    #[test]
    fn title_only_section_dropped() {
        assert!(build("Başlık: Yalnız Başlık").is_empty());
    }
}
