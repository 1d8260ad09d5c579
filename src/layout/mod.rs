//! Pagination and footer layout

pub mod capacity;
pub mod config;
mod engine;
pub mod font;
pub mod line_break;
pub mod pagination;
pub mod stack;


pub use capacity::{capacity, DensityMode, PageRole};
pub use config::{BlockHeights, LayoutConfig, WrapWidths};
pub use engine::{assemble, canvas_height, footer_base_y, LayoutEngine, LayoutPlan, Page};
pub use font::FontScale;
pub use line_break::wrap;
pub use pagination::{plan, PageSlice, Pagination, PaginationPolicy};
pub use stack::{
    block_height, resolve_footer, resolve_footer_anchors, AnchorEntry, FooterAnchor,
    FooterAnchors, FooterLayout, PaymentEntryLayout,
};
