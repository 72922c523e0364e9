//! Column pagination: greedy fill with backtrack and orphan-heading carry

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::flow::{Column, FlowNode, NodeRole};

/// One page's worth of a column.
#[derive(Debug, Clone)]
pub struct PageFrame {
    pub column: Column,
    pub page_index: usize,
    pub nodes: SmallVec<[FlowNode; 4]>,
}

impl PageFrame {
    pub fn new(column: Column, page_index: usize) -> Self {
        Self {
            column,
            page_index,
            nodes: SmallVec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Geometry oracle for pagination. The algorithm never computes heights
/// itself; it only compares these two quantities.
pub trait FrameMetrics {
    /// Vertical space the frame may use.
    fn available_height(&self, frame: &PageFrame) -> f32;
    /// Vertical space the frame's nodes currently consume.
    fn used_height(&self, frame: &PageFrame) -> f32;
}

/// Merge placed frames and any unplaced remainder back into a single flow,
/// ordered by `order_key`. The sort is stable, so nodes sharing a key keep
/// their relative order.
pub fn reset_to_flow(frames: Vec<PageFrame>, residue: Vec<FlowNode>) -> Vec<FlowNode> {
    let mut flow: Vec<FlowNode> = frames
        .into_iter()
        .flat_map(|frame| frame.nodes.into_iter())
        .collect();
    flow.extend(residue);
    flow.sort_by_key(|node| node.order_key);
    flow
}

/// Distribute a column flow over pages. Nodes are appended greedily; when a
/// frame overflows, its last node moves to the next page, pulling the
/// section title along when leaving it behind would orphan it. A frame
/// always keeps at least one node, so a single oversized node overflows in
/// place instead of cascading forever.
pub fn paginate_column<M: FrameMetrics>(
    column: Column,
    flow: Vec<FlowNode>,
    metrics: &M,
) -> Vec<PageFrame> {
    let mut frames = vec![PageFrame::new(column, 0)];
    if flow.is_empty() {
        return frames;
    }

    let mut pending: VecDeque<FlowNode> = flow.into();
    let mut page = 0usize;

    while let Some(node) = pending.pop_front() {
        frames[page].nodes.push(node);

        let frame = &frames[page];
        let overflows = metrics.used_height(frame) > metrics.available_height(frame);
        if !overflows || frame.nodes.len() <= 1 {
            continue;
        }

        let evicted = frames[page].nodes.pop().expect("frame has nodes");
        let carry_title = evicted.role == NodeRole::Item
            && evicted.section.keeps_title_with_items()
            && frames[page].nodes.len() > 1
            && frames[page]
                .nodes
                .last()
                .is_some_and(|last| last.role == NodeRole::Title && last.section == evicted.section);

        pending.push_front(evicted);
        if carry_title {
            let title = frames[page].nodes.pop().expect("checked above");
            pending.push_front(title);
        }

        page += 1;
        frames.push(PageFrame::new(column, page));
    }

    frames
}
