//! Invoice Layout: pagination and layout planning for invoices and estimates
//!
//! This crate turns a numerically resolved invoice into a renderer-agnostic
//! layout plan that a canvas rasterizer and a markup exporter can both follow:
//! - Greedy word wrapping for notes and payment details
//! - Per-page item capacity with normal/compact density
//! - Two pagination policies (capacity-based and fixed chunks)
//! - Footer anchors stacked from whichever optional blocks are present

pub mod document;
pub mod error;
pub mod layout;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmLayoutEngine;

// Re-export primary types
pub use document::{
    BlockKind, Discount, DiscountKind, InvoiceSnapshot, LineItem, OptionalBlock, PaymentKind,
    PaymentMethod, Tax,
};
pub use error::{ConfigError, Error, Result, ValidationError};
pub use layout::{
    DensityMode, FooterAnchor, FooterAnchors, LayoutConfig, LayoutEngine, LayoutPlan, Page,
    PageRole, PaginationPolicy,
};

/// Canvas rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Lay out a snapshot with the default configuration
pub fn layout(snapshot: &InvoiceSnapshot) -> Result<LayoutPlan> {
    LayoutEngine::default().layout(snapshot)
}
