use super::markers::{strip_lead, strip_prefix_ignore_case};
use super::plan::{Item, Section};

/// Literal plan-heading phrases, one per supported locale.
const PLAN_PHRASES: &[&str] = &["Gelişim Planı", "Development Plan"];

/// Post-processing pass over the built section list.
///
/// One logical input sometimes contains several independent development-plan
/// blocks concatenated with no stronger delimiter than repeated plan headings.
/// When those headings survived as *items* (the classifier missed them, e.g.
/// "Development planning…" style variants), a section ends up holding more than
/// one plan-title item; such a section is split into one section per plan item.
/// A single plan-title item leading an untitled section is demoted into the
/// section's own title instead.
pub fn split_plan_sections(sections: Vec<Section>) -> Vec<Section> {
    sections.into_iter().flat_map(split_one).collect()
}

fn split_one(section: Section) -> Vec<Section> {
    let plan_items = section.items.iter().filter(|i| is_plan_item(i)).count();
    match plan_items {
        0 => vec![section],
        1 => demote_leading_plan_item(section),
        _ => split_many(section),
    }
}

fn is_plan_item(item: &Item) -> bool {
    let title = item.title.trim_start_matches('\u{feff}').trim();
    PLAN_PHRASES
        .iter()
        .any(|phrase| strip_prefix_ignore_case(title, phrase).is_some())
}

/// An untitled section whose first item is the sole plan heading takes that
/// heading as its title; any other single-plan-item section passes through.
fn demote_leading_plan_item(mut section: Section) -> Vec<Section> {
    let leading = section.title.is_empty()
        && section.items.first().is_some_and(is_plan_item);
    if !leading {
        return vec![section];
    }
    let plan_item = section.items.remove(0);
    vec![section_from_plan_item(plan_item, section.items)]
}

fn split_many(section: Section) -> Vec<Section> {
    let mut out = Vec::new();
    let mut lead: Vec<Item> = Vec::new();
    let mut current: Option<(Item, Vec<Item>)> = None;

    for item in section.items {
        if is_plan_item(&item) {
            match current.take() {
                Some((plan, body)) => out.push(section_from_plan_item(plan, body)),
                None => {
                    // Content preceding the first plan heading becomes a
                    // (possibly title-less) leading section.
                    if !lead.is_empty() {
                        out.push(Section {
                            title: section.title.clone(),
                            items: std::mem::take(&mut lead),
                        });
                    }
                }
            }
            current = Some((item, Vec::new()));
        } else {
            match current.as_mut() {
                Some((_, body)) => body.push(item),
                None => lead.push(item),
            }
        }
    }

    if let Some((plan, body)) = current {
        out.push(section_from_plan_item(plan, body));
    }
    out
}

/// Turn a plan-title item into a section owning `body`. The new title is the
/// item's first content line when present, else the heading's own trailing
/// text with the plan phrase stripped; leftover content lines are kept as a
/// leading item so nothing is dropped.
fn section_from_plan_item(item: Item, body: Vec<Item>) -> Section {
    let mut content = item.content;
    let title = if content.is_empty() {
        stripped_heading(&item.title)
    } else {
        content.remove(0)
    };

    let mut items = Vec::new();
    if !content.is_empty() {
        let first = content.remove(0);
        items.push(Item { title: first, content });
    }
    items.extend(body);

    Section { title, items }
}

fn stripped_heading(title: &str) -> String {
    let trimmed = title.trim_start_matches('\u{feff}').trim();
    for phrase in PLAN_PHRASES {
        if let Some(rest) = strip_prefix_ignore_case(trimmed, phrase) {
            let rest = strip_lead(rest);
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    trimmed.to_string()
}

// ── Tests ──
