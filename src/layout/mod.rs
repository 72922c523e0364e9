//! Measurement and pagination

mod engine;
pub mod font;
mod line_break;
mod paginate;

pub use engine::{
    ColumnFrames, LayoutState, PageConstraints, TextMetrics, BULLET_INDENT, PHOTO_HEIGHT,
};
pub use font::{FontMetrics, StyleMetrics};
pub use line_break::{line_count, wrap_lines};
pub use paginate::{paginate_column, reset_to_flow, FrameMetrics, PageFrame};
