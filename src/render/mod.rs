//! Page view snapshots for the host renderer

use serde::Serialize;

use crate::document::SectionId;
use crate::flow::{Column, NodeRole, TextBlock};
use crate::layout::{LayoutState, PageFrame, TextMetrics};

/// One node as placed on a page: content plus resolved geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode {
    pub section: SectionId,
    pub role: NodeRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub blocks: Vec<TextBlock>,
    /// Offset from the top of the page content box.
    pub y: f32,
    pub height: f32,
}

/// One rendered page. Rebuilt from scratch on every pass; pages are output
/// artifacts, not state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page_index: usize,
    pub top: Vec<PlacedNode>,
    pub main: Vec<PlacedNode>,
    pub sidebar: Vec<PlacedNode>,
}

impl PageView {
    fn empty(page_index: usize) -> Self {
        Self {
            page_index,
            top: Vec::new(),
            main: Vec::new(),
            sidebar: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.main.is_empty() && self.sidebar.is_empty()
    }
}

/// Snapshot the current layout as serializable page views.
pub fn build_page_views(layout: &LayoutState) -> Vec<PageView> {
    let Some(metrics) = layout.metrics() else {
        return vec![PageView::empty(0)];
    };

    let frames = layout.frames();
    let mut pages: Vec<PageView> = (0..layout.page_count()).map(PageView::empty).collect();

    for column in [Column::Top, Column::Main, Column::Sidebar] {
        for frame in frames.column(column) {
            let Some(page) = pages.get_mut(frame.page_index) else {
                continue;
            };
            let placed = place_frame(frame, metrics);
            match column {
                Column::Top => page.top = placed,
                Column::Main => page.main = placed,
                Column::Sidebar => page.sidebar = placed,
            }
        }
    }

    pages
}

fn place_frame(frame: &PageFrame, metrics: &TextMetrics) -> Vec<PlacedNode> {
    let mut y = metrics.column_start(frame.column, frame.page_index);
    frame
        .nodes
        .iter()
        .map(|node| {
            let height = metrics.node_height(frame.column, node);
            let placed = PlacedNode {
                section: node.section,
                role: node.role,
                item_id: node.item_id.clone(),
                blocks: node.blocks.clone(),
                y,
                height,
            };
            y += height + metrics.node_margin();
            placed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AppLang, CvDocument, WorkExperience};
    use crate::style::StyleSettings;

    fn laid_out(work_items: usize) -> LayoutState {
        let mut doc = CvDocument::new(AppLang::En);
        doc.update_personal_info(|info| info.first_name = "Ada".into());
        for i in 0..work_items {
            doc.add_work_experience(WorkExperience {
                company: format!("Company {i}"),
                role: "Engineer".into(),
                description: Some("Did a number of useful things over several years.".into()),
                ..Default::default()
            });
        }
        let mut layout = LayoutState::default();
        layout.attach_view();
        layout.relayout(&doc, &StyleSettings::default().resolve());
        layout
    }

    #[test]
    fn test_unmeasured_layout_yields_one_empty_page() {
        let layout = LayoutState::default();
        let pages = build_page_views(&layout);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_pages_match_layout_count() {
        let layout = laid_out(40);
        let pages = build_page_views(&layout);
        assert_eq!(pages.len(), layout.page_count());
        assert!(pages.len() > 1);
        for (idx, page) in pages.iter().enumerate() {
            assert_eq!(page.page_index, idx);
        }
    }

    #[test]
    fn test_placed_nodes_stack_downward() {
        let layout = laid_out(5);
        let pages = build_page_views(&layout);
        let main = &pages[0].main;
        assert!(main.len() > 1);
        for pair in main.windows(2) {
            assert!(pair[1].y > pair[0].y);
            assert!(pair[1].y >= pair[0].y + pair[0].height);
        }
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let layout = laid_out(1);
        let pages = build_page_views(&layout);
        let json = serde_json::to_value(&pages).unwrap();
        let first = &json[0];
        assert!(first.get("pageIndex").is_some());
        let node = &first["main"][0];
        assert!(node.get("blocks").is_some());
        assert!(node.get("height").is_some());
    }
}
