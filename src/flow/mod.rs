//! Flow builder: document + layout config → per-column node flows

use serde::Serialize;

use crate::document::{
    CvDocument, Education, PersonalInfo, Reference, SectionEntry, SectionId, WorkExperience, Zone,
};
use crate::style::RenderStyle;

/// The three page columns a flow node can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Top,
    Main,
    Sidebar,
}

/// Structural role of a flow node; pagination treats roles differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Personal header (name, contact, photo).
    Header,
    /// Section title line.
    Title,
    /// One entry of a repeatable section.
    Item,
    /// Free-standing text content (profile summary).
    Block,
}

/// Visual kind of a text run inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextKind {
    Name,
    Headline,
    SectionTitle,
    ItemHeading,
    ItemMeta,
    Body,
    Bullet,
    /// Photo data URL; occupies fixed height, not measured as text.
    Photo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub kind: TextKind,
    pub text: String,
}

impl TextBlock {
    fn new(kind: TextKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// One pagination unit. Nodes of a section share an `order_key`; reassembly
/// is a stable sort, so intra-section order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub order_key: u32,
    pub section: SectionId,
    pub role: NodeRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub blocks: Vec<TextBlock>,
}

/// Flow output: one ordered node list per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFlows {
    pub top: Vec<FlowNode>,
    pub main: Vec<FlowNode>,
    pub sidebar: Vec<FlowNode>,
}

impl ColumnFlows {
    pub fn column(&self, column: Column) -> &[FlowNode] {
        match column {
            Column::Top => &self.top,
            Column::Main => &self.main,
            Column::Sidebar => &self.sidebar,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.main.is_empty() && self.sidebar.is_empty()
    }
}

const ORDER_STEP: u32 = 100;

fn order_key(position: usize) -> u32 {
    ORDER_STEP * (1 + position as u32)
}

/// Builds the column flows from scratch on every call; flows are never
/// patched incrementally.
pub struct FlowBuilder;

impl FlowBuilder {
    pub fn build(doc: &CvDocument, style: &RenderStyle) -> ColumnFlows {
        let mut flows = ColumnFlows::default();

        if let Some(header) = header_node(&doc.personal_info) {
            if style.top_band {
                flows.top.push(header);
            } else {
                flows.main.push(header);
            }
        }

        for (zone, ids) in [
            (Zone::Main, &doc.section_layout.main),
            (Zone::Sidebar, &doc.section_layout.sidebar),
        ] {
            for (position, section) in ids.iter().copied().enumerate() {
                let key = order_key(position);
                let out = match zone {
                    Zone::Main => &mut flows.main,
                    Zone::Sidebar => &mut flows.sidebar,
                };
                emit_section(doc, section, key, out);
            }
        }

        flows
    }
}

fn emit_section(doc: &CvDocument, section: SectionId, key: u32, out: &mut Vec<FlowNode>) {
    match section {
        SectionId::Profile => {
            let summary = doc.personal_info.summary.trim();
            if summary.is_empty() {
                return;
            }
            out.push(FlowNode {
                order_key: key,
                section,
                role: NodeRole::Title,
                item_id: None,
                blocks: vec![TextBlock::new(
                    TextKind::SectionTitle,
                    doc.labels.section_title(section),
                )],
            });
            out.push(FlowNode {
                order_key: key,
                section,
                role: NodeRole::Block,
                item_id: None,
                blocks: vec![TextBlock::new(TextKind::Body, summary)],
            });
        }
        SectionId::WorkExperience => {
            emit_items(doc, section, key, &doc.work_experience, work_blocks, out)
        }
        SectionId::Education => emit_items(doc, section, key, &doc.education, education_blocks, out),
        SectionId::References => {
            emit_items(doc, section, key, &doc.references, reference_blocks, out)
        }
        SectionId::Courses => emit_items(doc, section, key, &doc.courses, |item| {
            let mut blocks = vec![TextBlock::new(TextKind::ItemHeading, item.name.trim())];
            if let Some(meta) = join_meta(&[item.institution.as_deref(), item.date.as_deref()]) {
                blocks.push(TextBlock::new(TextKind::ItemMeta, meta));
            }
            push_body(&mut blocks, item.description.as_deref());
            blocks
        }, out),
        SectionId::Skills => emit_items(doc, section, key, &doc.skills, |item| {
            vec![
                TextBlock::new(TextKind::ItemHeading, item.name.trim()),
                TextBlock::new(TextKind::ItemMeta, item.level.label()),
            ]
        }, out),
        SectionId::Languages => emit_items(doc, section, key, &doc.languages, |item| {
            vec![
                TextBlock::new(TextKind::ItemHeading, item.language.trim()),
                TextBlock::new(TextKind::ItemMeta, item.level.label()),
            ]
        }, out),
        SectionId::Projects => emit_items(doc, section, key, &doc.projects, |item| {
            let mut blocks = vec![TextBlock::new(TextKind::ItemHeading, item.name.trim())];
            let tech = if item.technologies.is_empty() {
                None
            } else {
                Some(item.technologies.join(", "))
            };
            if let Some(meta) = join_meta(&[tech.as_deref(), item.date.as_deref()]) {
                blocks.push(TextBlock::new(TextKind::ItemMeta, meta));
            }
            push_body(&mut blocks, item.description.as_deref());
            if let Some(url) = item.url.as_deref().filter(|u| !u.trim().is_empty()) {
                blocks.push(TextBlock::new(TextKind::ItemMeta, url.trim()));
            }
            blocks
        }, out),
    }
}

fn emit_items<T: SectionEntry>(
    doc: &CvDocument,
    section: SectionId,
    key: u32,
    items: &[T],
    blocks_for: impl Fn(&T) -> Vec<TextBlock>,
    out: &mut Vec<FlowNode>,
) {
    let visible: Vec<&T> = items.iter().filter(|item| item.is_visible()).collect();
    if visible.is_empty() {
        return;
    }
    out.push(FlowNode {
        order_key: key,
        section,
        role: NodeRole::Title,
        item_id: None,
        blocks: vec![TextBlock::new(
            TextKind::SectionTitle,
            doc.labels.section_title(section),
        )],
    });
    for item in visible {
        out.push(FlowNode {
            order_key: key,
            section,
            role: NodeRole::Item,
            item_id: Some(item.id().to_string()),
            blocks: blocks_for(item),
        });
    }
}

fn header_node(info: &PersonalInfo) -> Option<FlowNode> {
    let mut blocks = Vec::new();
    let name = info.full_name();
    if !name.is_empty() {
        blocks.push(TextBlock::new(TextKind::Name, name));
    }
    if !info.job_title.trim().is_empty() {
        blocks.push(TextBlock::new(TextKind::Headline, info.job_title.trim()));
    }
    for value in [
        &info.email,
        &info.phone,
        &info.location,
        &info.nationality,
        &info.birth_date,
    ] {
        if !value.trim().is_empty() {
            blocks.push(TextBlock::new(TextKind::ItemMeta, value.trim()));
        }
    }
    if !info.photo.is_empty() {
        blocks.push(TextBlock::new(TextKind::Photo, info.photo.clone()));
    }
    if blocks.is_empty() {
        return None;
    }
    Some(FlowNode {
        order_key: 0,
        section: SectionId::Profile,
        role: NodeRole::Header,
        item_id: None,
        blocks,
    })
}

fn work_blocks(item: &WorkExperience) -> Vec<TextBlock> {
    let mut blocks = vec![TextBlock::new(TextKind::ItemHeading, item.role.trim())];
    let range = date_range(&item.start_date, item.end_date.as_deref(), item.currently_working);
    if let Some(meta) = join_meta(&[non_empty(&item.company), range.as_deref()]) {
        blocks.push(TextBlock::new(TextKind::ItemMeta, meta));
    }
    push_body(&mut blocks, item.description.as_deref());
    for line in item.achievements.iter().flat_map(|a| split_bullet_lines(a)) {
        blocks.push(TextBlock::new(TextKind::Bullet, line));
    }
    blocks
}

fn education_blocks(item: &Education) -> Vec<TextBlock> {
    let mut blocks = vec![TextBlock::new(TextKind::ItemHeading, item.degree.trim())];
    let range = date_range(&item.start_date, item.end_date.as_deref(), item.in_progress);
    if let Some(meta) = join_meta(&[
        non_empty(&item.institution),
        item.location.as_deref(),
        range.as_deref(),
    ]) {
        blocks.push(TextBlock::new(TextKind::ItemMeta, meta));
    }
    if let Some(gpa) = item.gpa.as_deref().filter(|g| !g.trim().is_empty()) {
        blocks.push(TextBlock::new(TextKind::ItemMeta, gpa.trim()));
    }
    push_body(&mut blocks, item.description.as_deref());
    blocks
}

fn reference_blocks(item: &Reference) -> Vec<TextBlock> {
    let mut blocks = vec![TextBlock::new(TextKind::ItemHeading, item.name.trim())];
    if let Some(meta) = join_meta(&[
        item.role.as_deref(),
        item.company.as_deref(),
        item.relationship.as_deref(),
    ]) {
        blocks.push(TextBlock::new(TextKind::ItemMeta, meta));
    }
    if let Some(contact) = join_meta(&[item.phone.as_deref(), item.email.as_deref()]) {
        blocks.push(TextBlock::new(TextKind::ItemMeta, contact));
    }
    blocks
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn join_meta(parts: &[Option<&str>]) -> Option<String> {
    let kept: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" · "))
    }
}

fn push_body(blocks: &mut Vec<TextBlock>, body: Option<&str>) {
    if let Some(text) = body.map(str::trim).filter(|t| !t.is_empty()) {
        blocks.push(TextBlock::new(TextKind::Body, text));
    }
}

fn date_range(start: &str, end: Option<&str>, ongoing: bool) -> Option<String> {
    let start = start.trim();
    let end = if ongoing {
        Some("Present")
    } else {
        end.map(str::trim).filter(|e| !e.is_empty())
    };
    match (start.is_empty(), end) {
        (true, None) => None,
        (true, Some(end)) => Some(end.to_string()),
        (false, None) => Some(start.to_string()),
        (false, Some(end)) => Some(format!("{start} - {end}")),
    }
}

/// Split a free-text achievement field into clean bullet lines: one per
/// line, trimmed, empties dropped, leading list markers stripped.
pub fn split_bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim_start()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AppLang, Language, Skill};
    use crate::style::StyleSettings;

    fn style() -> RenderStyle {
        StyleSettings::default().resolve()
    }

    fn doc_with_work(count: usize) -> CvDocument {
        let mut doc = CvDocument::new(AppLang::En);
        doc.update_personal_info(|info| info.first_name = "Ada".into());
        for i in 0..count {
            doc.add_work_experience(WorkExperience {
                company: format!("Company {i}"),
                role: "Engineer".into(),
                start_date: "2020-01".into(),
                currently_working: true,
                ..Default::default()
            });
        }
        doc
    }

    #[test]
    fn test_empty_document_builds_empty_flows() {
        let flows = FlowBuilder::build(&CvDocument::default(), &style());
        assert!(flows.is_empty());
    }

    #[test]
    fn test_title_precedes_items_with_shared_key() {
        let flows = FlowBuilder::build(&doc_with_work(2), &style());
        let work: Vec<&FlowNode> = flows
            .main
            .iter()
            .filter(|n| n.section == SectionId::WorkExperience)
            .collect();
        assert_eq!(work.len(), 3);
        assert_eq!(work[0].role, NodeRole::Title);
        assert_eq!(work[1].role, NodeRole::Item);
        assert!(work.iter().all(|n| n.order_key == work[0].order_key));
    }

    #[test]
    fn test_hidden_items_are_skipped() {
        let mut doc = doc_with_work(1);
        let id = doc.work_experience[0].id.clone();
        doc.update_work_experience(&id, |item| item.visible = Some(false));
        let flows = FlowBuilder::build(&doc, &style());
        // Last visible item gone: the whole section vanishes, title included.
        assert!(!flows
            .main
            .iter()
            .any(|n| n.section == SectionId::WorkExperience));
    }

    #[test]
    fn test_header_goes_to_top_with_band() {
        let doc = doc_with_work(1);
        let mut settings = StyleSettings::default();
        let flows = FlowBuilder::build(&doc, &settings.resolve());
        assert_eq!(flows.main[0].role, NodeRole::Header);
        assert_eq!(flows.main[0].order_key, 0);
        assert!(flows.top.is_empty());

        settings.set_template("template-2");
        let flows = FlowBuilder::build(&doc, &settings.resolve());
        assert_eq!(flows.top.len(), 1);
        assert_eq!(flows.top[0].role, NodeRole::Header);
    }

    #[test]
    fn test_order_keys_follow_zone_positions() {
        let mut doc = CvDocument::new(AppLang::En);
        doc.update_personal_info(|info| info.summary = "Seasoned engineer".into());
        doc.add_skill(Skill {
            name: "Rust".into(),
            ..Default::default()
        });
        doc.add_language(Language {
            language: "English".into(),
            ..Default::default()
        });
        let flows = FlowBuilder::build(&doc, &style());

        // Profile is main position 0, languages sidebar position 0,
        // skills sidebar position 1.
        let profile = flows.main.iter().find(|n| n.section == SectionId::Profile);
        assert_eq!(profile.unwrap().order_key, 100);
        let langs = flows
            .sidebar
            .iter()
            .find(|n| n.section == SectionId::Languages)
            .unwrap();
        let skills = flows
            .sidebar
            .iter()
            .find(|n| n.section == SectionId::Skills)
            .unwrap();
        assert_eq!(langs.order_key, 100);
        assert_eq!(skills.order_key, 200);
    }

    #[test]
    fn test_split_bullet_lines() {
        let lines = split_bullet_lines("- Shipped the thing\n\n  * Cut costs\nplain");
        assert_eq!(lines, vec!["Shipped the thing", "Cut costs", "plain"]);
    }

    #[test]
    fn test_date_range() {
        assert_eq!(
            date_range("2020", Some("2022"), false).as_deref(),
            Some("2020 - 2022")
        );
        assert_eq!(
            date_range("2020", Some("2022"), true).as_deref(),
            Some("2020 - Present")
        );
        assert_eq!(date_range("", None, false), None);
    }
}
