//! Layout state: page geometry, the text measurer, and the relayout pass

use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::document::CvDocument;
use crate::flow::{Column, ColumnFlows, FlowBuilder, FlowNode, NodeRole, TextKind};
use crate::layout::font::{FontMetrics, StyleMetrics};
use crate::layout::line_break::line_count;
use crate::layout::paginate::{paginate_column, reset_to_flow, FrameMetrics, PageFrame};
use crate::style::RenderStyle;

/// Fixed height reserved for the profile photo block.
pub const PHOTO_HEIGHT: f32 = 96.0;

/// Horizontal inset of bullet lines.
pub const BULLET_INDENT: f32 = 14.0;

/// A4 page geometry at 96 dpi.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConstraints {
    pub page_width: f32,
    pub page_height: f32,
    pub padding: f32,
    /// Reserve at the bottom edge so content never touches the cut line.
    pub bottom_safety: f32,
    pub sidebar_fraction: f32,
    pub column_gap: f32,
}

impl Default for PageConstraints {
    fn default() -> Self {
        Self {
            page_width: 794.0,
            page_height: 1123.0,
            padding: 48.0,
            bottom_safety: 8.0,
            sidebar_fraction: 0.34,
            column_gap: 24.0,
        }
    }
}

impl PageConstraints {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.padding
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.padding - self.bottom_safety
    }

    pub fn sidebar_width(&self) -> f32 {
        (self.content_width() - self.column_gap) * self.sidebar_fraction
    }

    pub fn main_width(&self) -> f32 {
        self.content_width() - self.column_gap - self.sidebar_width()
    }

    pub fn column_width(&self, column: Column) -> f32 {
        match column {
            Column::Top => self.content_width(),
            Column::Main => self.main_width(),
            Column::Sidebar => self.sidebar_width(),
        }
    }
}

// Vertical padding per node role, at spacing factor 1.0.
fn role_padding(role: NodeRole) -> f32 {
    match role {
        NodeRole::Header => 16.0,
        NodeRole::Title => 4.0,
        NodeRole::Item => 10.0,
        NodeRole::Block => 8.0,
    }
}

const NODE_MARGIN: f32 = 8.0;
const BLOCK_GAP: f32 = 2.0;

/// Default `FrameMetrics`: wrapped-line text measurement over the resolved
/// style. Node heights are cached per (node, column); the cache lives as
/// long as the measurer, which is rebuilt whenever the style changes.
#[derive(Debug)]
pub struct TextMetrics {
    constraints: PageConstraints,
    fonts: StyleMetrics,
    spacing_factor: f32,
    /// Height the top band consumes on page 0, pushing `Main`/`Sidebar` down.
    top_offset: Cell<f32>,
    cache: RefCell<FxHashMap<u64, f32>>,
}

impl TextMetrics {
    pub fn new(constraints: PageConstraints, style: &RenderStyle) -> Self {
        Self {
            constraints,
            fonts: StyleMetrics::from_style(style),
            spacing_factor: style.spacing_factor,
            top_offset: Cell::new(0.0),
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn constraints(&self) -> &PageConstraints {
        &self.constraints
    }

    pub fn set_top_offset(&self, offset: f32) {
        self.top_offset.set(offset);
    }

    /// Content-box y where a column starts on the given page.
    pub fn column_start(&self, column: Column, page_index: usize) -> f32 {
        if column != Column::Top && page_index == 0 {
            self.top_offset.get()
        } else {
            0.0
        }
    }

    /// Bottom margin appended after every node.
    pub fn node_margin(&self) -> f32 {
        NODE_MARGIN * self.spacing_factor
    }

    fn font_for(&self, kind: TextKind) -> &FontMetrics {
        match kind {
            TextKind::Name | TextKind::SectionTitle | TextKind::ItemHeading => &self.fonts.heading,
            _ => &self.fonts.body,
        }
    }

    /// Measured height of one node at its column's width.
    pub fn node_height(&self, column: Column, node: &FlowNode) -> f32 {
        let width = self.constraints.column_width(column);
        let key = cache_key(column, node, width);
        if let Some(height) = self.cache.borrow().get(&key) {
            return *height;
        }

        let mut height = role_padding(node.role) * self.spacing_factor;
        for (idx, block) in node.blocks.iter().enumerate() {
            if idx > 0 {
                height += BLOCK_GAP * self.spacing_factor;
            }
            height += match block.kind {
                TextKind::Photo => PHOTO_HEIGHT,
                kind => {
                    let font = self.font_for(kind);
                    let text_width = if kind == TextKind::Bullet {
                        width - BULLET_INDENT
                    } else {
                        width
                    };
                    line_count(&block.text, font, text_width.max(1.0)) as f32 * font.line_height
                }
            };
        }

        self.cache.borrow_mut().insert(key, height);
        height
    }
}

impl FrameMetrics for TextMetrics {
    fn available_height(&self, frame: &PageFrame) -> f32 {
        self.constraints.content_height() - self.column_start(frame.column, frame.page_index)
    }

    fn used_height(&self, frame: &PageFrame) -> f32 {
        frame
            .nodes
            .iter()
            .map(|node| self.node_height(frame.column, node) + self.node_margin())
            .sum()
    }
}

fn cache_key(column: Column, node: &FlowNode, width: f32) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    (column as u8).hash(&mut hasher);
    width.to_bits().hash(&mut hasher);
    (node.role as u8).hash(&mut hasher);
    for block in &node.blocks {
        (block.kind as u8).hash(&mut hasher);
        block.text.hash(&mut hasher);
    }
    hasher.finish()
}

/// Placed frames for all three columns, padded to a common page count.
#[derive(Debug, Clone, Default)]
pub struct ColumnFrames {
    pub top: Vec<PageFrame>,
    pub main: Vec<PageFrame>,
    pub sidebar: Vec<PageFrame>,
}

impl ColumnFrames {
    pub fn column(&self, column: Column) -> &[PageFrame] {
        match column {
            Column::Top => &self.top,
            Column::Main => &self.main,
            Column::Sidebar => &self.sidebar,
        }
    }
}

/// Current layout: the placed frames and the measurer that produced them.
pub struct LayoutState {
    constraints: PageConstraints,
    frames: ColumnFrames,
    metrics: Option<TextMetrics>,
    page_count: usize,
    view_attached: bool,
    layout_version: u64,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new(PageConstraints::default())
    }
}

impl LayoutState {
    pub fn new(constraints: PageConstraints) -> Self {
        Self {
            constraints,
            frames: ColumnFrames::default(),
            metrics: None,
            page_count: 1,
            view_attached: false,
            layout_version: 0,
        }
    }

    /// Mark the host viewport as present. Until then every layout request
    /// no-ops: without a viewport there is nothing to measure against.
    pub fn attach_view(&mut self) {
        self.view_attached = true;
    }

    pub fn view_attached(&self) -> bool {
        self.view_attached
    }

    pub fn constraints(&self) -> &PageConstraints {
        &self.constraints
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn frames(&self) -> &ColumnFrames {
        &self.frames
    }

    pub fn metrics(&self) -> Option<&TextMetrics> {
        self.metrics.as_ref()
    }

    pub fn layout_version(&self) -> u64 {
        self.layout_version
    }

    /// Full pass: rebuild the flows from the document and repaginate.
    /// Returns false when skipped because no view is attached.
    pub fn relayout(&mut self, doc: &CvDocument, style: &RenderStyle) -> bool {
        if !self.view_attached {
            log::debug!("relayout skipped: no view attached");
            return false;
        }
        let flows = FlowBuilder::build(doc, style);
        self.apply_flows(flows, style);
        self.layout_version = doc.version();
        log::debug!("relayout done: {} page(s)", self.page_count);
        true
    }

    /// Repaginate the already-placed nodes without consulting the document:
    /// frames are merged back into flows, sorted, and redistributed.
    pub fn repaginate_in_place(&mut self, style: &RenderStyle) -> bool {
        if !self.view_attached {
            return false;
        }
        let frames = std::mem::take(&mut self.frames);
        let flows = ColumnFlows {
            top: reset_to_flow(frames.top, Vec::new()),
            main: reset_to_flow(frames.main, Vec::new()),
            sidebar: reset_to_flow(frames.sidebar, Vec::new()),
        };
        self.apply_flows(flows, style);
        true
    }

    fn apply_flows(&mut self, flows: ColumnFlows, style: &RenderStyle) {
        let metrics = TextMetrics::new(self.constraints, style);

        // The top band paginates first: its page-0 height offsets the
        // other columns.
        let top = paginate_column(Column::Top, flows.top, &metrics);
        let top_used = top
            .first()
            .filter(|frame| !frame.is_empty())
            .map(|frame| metrics.used_height(frame))
            .unwrap_or(0.0);
        metrics.set_top_offset(top_used);

        let main = paginate_column(Column::Main, flows.main, &metrics);
        let sidebar = paginate_column(Column::Sidebar, flows.sidebar, &metrics);

        // Reconcile: the document is as long as its longest column, and an
        // empty document is still one page.
        let page_count = top.len().max(main.len()).max(sidebar.len()).max(1);
        let mut frames = ColumnFrames { top, main, sidebar };
        for column in [Column::Top, Column::Main, Column::Sidebar] {
            let list = match column {
                Column::Top => &mut frames.top,
                Column::Main => &mut frames.main,
                Column::Sidebar => &mut frames.sidebar,
            };
            while list.len() < page_count {
                list.push(PageFrame::new(column, list.len()));
            }
        }

        self.frames = frames;
        self.page_count = page_count;
        self.metrics = Some(metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AppLang, CvDocument, SectionId, WorkExperience};
    use crate::flow::TextBlock;
    use crate::style::StyleSettings;

    fn style() -> RenderStyle {
        StyleSettings::default().resolve()
    }

    fn filled_doc(work_items: usize, description_lines: usize) -> CvDocument {
        let mut doc = CvDocument::new(AppLang::En);
        doc.update_personal_info(|info| {
            info.first_name = "Ada".into();
            info.last_name = "Lovelace".into();
            info.job_title = "Engineer".into();
        });
        let body = vec!["A line of descriptive prose about this role."; description_lines].join(" ");
        for i in 0..work_items {
            doc.add_work_experience(WorkExperience {
                company: format!("Company {i}"),
                role: "Engineer".into(),
                start_date: "2019".into(),
                end_date: Some("2023".into()),
                description: Some(body.clone()),
                ..Default::default()
            });
        }
        doc
    }

    #[test]
    fn test_page_geometry() {
        let constraints = PageConstraints::default();
        assert_eq!(constraints.content_width(), 698.0);
        assert_eq!(constraints.content_height(), 1019.0);
        let split = constraints.main_width() + constraints.sidebar_width() + constraints.column_gap;
        assert!((split - constraints.content_width()).abs() < 0.01);
    }

    #[test]
    fn test_relayout_noop_without_view() {
        let mut layout = LayoutState::default();
        assert!(!layout.relayout(&filled_doc(3, 2), &style()));
        assert_eq!(layout.page_count(), 1);

        layout.attach_view();
        assert!(layout.relayout(&filled_doc(3, 2), &style()));
    }

    #[test]
    fn test_empty_document_is_one_page() {
        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&CvDocument::default(), &style());
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.frames().main.len(), 1);
        assert!(layout.frames().main[0].is_empty());
    }

    #[test]
    fn test_columns_padded_to_page_count() {
        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&filled_doc(30, 6), &style());
        assert!(layout.page_count() > 1);
        assert_eq!(layout.frames().main.len(), layout.page_count());
        assert_eq!(layout.frames().sidebar.len(), layout.page_count());
        assert_eq!(layout.frames().top.len(), layout.page_count());
    }

    #[test]
    fn test_page_count_covers_every_column() {
        let mut settings = StyleSettings::default();
        settings.set_template("template-2");

        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&filled_doc(30, 6), &settings.resolve());

        assert!(!layout.frames().top[0].is_empty());
        for column in [Column::Top, Column::Main, Column::Sidebar] {
            assert_eq!(layout.frames().column(column).len(), layout.page_count());
        }
    }

    #[test]
    fn test_adding_content_never_shrinks_pages() {
        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&filled_doc(5, 4), &style());
        let before = layout.page_count();
        layout.relayout(&filled_doc(25, 4), &style());
        assert!(layout.page_count() >= before);
    }

    #[test]
    fn test_repaginate_in_place_is_stable() {
        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&filled_doc(20, 5), &style());
        let shape: Vec<usize> = layout.frames().main.iter().map(|f| f.nodes.len()).collect();
        layout.repaginate_in_place(&style());
        let again: Vec<usize> = layout.frames().main.iter().map(|f| f.nodes.len()).collect();
        assert_eq!(shape, again);
    }

    #[test]
    fn test_top_band_offsets_other_columns() {
        let mut settings = StyleSettings::default();
        settings.set_template("template-2");
        let banded = settings.resolve();

        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&filled_doc(1, 1), &banded);

        let metrics = layout.metrics().unwrap();
        assert!(!layout.frames().top[0].is_empty());
        assert!(metrics.column_start(Column::Main, 0) > 0.0);
        assert_eq!(metrics.column_start(Column::Main, 1), 0.0);
        assert_eq!(metrics.column_start(Column::Top, 0), 0.0);
    }

    #[test]
    fn test_node_height_cache_consistent() {
        let metrics = TextMetrics::new(PageConstraints::default(), &style());
        let node = FlowNode {
            order_key: 100,
            section: SectionId::Profile,
            role: NodeRole::Block,
            item_id: None,
            blocks: vec![TextBlock {
                kind: TextKind::Body,
                text: "Some body text that wraps over a couple of lines maybe".into(),
            }],
        };
        let first = metrics.node_height(Column::Main, &node);
        let second = metrics.node_height(Column::Main, &node);
        assert_eq!(first, second);
        // Narrower column, more lines, taller node.
        assert!(metrics.node_height(Column::Sidebar, &node) >= first);
    }
}
