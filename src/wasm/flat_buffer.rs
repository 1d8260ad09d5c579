//! Flat buffer protocol for zero-copy plan reads from JS
//!
//! Item text is not copied: renderers already hold the invoice and index
//! into it with `first_item_index` / `item_count`.
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x494E564C = "INVL" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     density (0 = normal, 1 = compact)
//! [4]     anchor_count
//! [5]     item_count (whole document)
//! [6..]   page data, then anchor data
//!
//! Per-page:   [page_number, first_item_index, item_count, flags]
//!   flags: bit0=last page, bit1=repeats header, bit2=placeholder row
//! Per-anchor: [anchor_code, payment_index, payment_kind]
//!   payment_index and payment_kind are only meaningful for anchor_code 2
//!   (payment entry); other anchors carry 0 and NO_PAYMENT_KIND
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Header:     [row_height, page_width, page_height, canvas_height, footer_bottom]
//! Per-page:   [y_offset, items_top, height]
//! Per-anchor: [offset]
//! ```

use crate::layout::{DensityMode, FooterAnchor, LayoutPlan};

/// Magic number for format validation: "INVL" (INVoice Layout)
pub const MAGIC: u32 = 0x494E564C;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 6;

/// Header size in f32 elements
pub const F32_HEADER_SIZE: usize = 5;

pub const U32_PER_PAGE: usize = 4;
pub const F32_PER_PAGE: usize = 3;
pub const U32_PER_ANCHOR: usize = 3;
pub const F32_PER_ANCHOR: usize = 1;

/// Payment kind slot of anchors that are not payment entries
pub const NO_PAYMENT_KIND: u32 = u32::MAX;

/// Page flags bitmask
pub const FLAG_LAST_PAGE: u32 = 0b001;
pub const FLAG_REPEATS_HEADER: u32 = 0b010;
pub const FLAG_PLACEHOLDER: u32 = 0b100;

/// Plan buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct PlanBuffer {
    /// Integer data (counts, indices, flags, anchor codes)
    pub u32_data: Vec<u32>,
    /// Float data (offsets, heights)
    pub f32_data: Vec<f32>,
}

/// A page record read back from the buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRecord {
    pub page_number: u32,
    pub first_item_index: u32,
    pub item_count: u32,
    pub flags: u32,
    pub y_offset: f32,
    pub items_top: f32,
    pub height: f32,
}

/// An anchor record read back from the buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRecord {
    pub code: u32,
    pub payment_index: u32,
    pub payment_kind: u32,
    pub offset: f32,
}

impl PlanBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(64),
            f32_data: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
    }

    /// Reserve room for a plan up front.
    /// JS holds views into these buffers, so they must not reallocate mid-write.
    pub fn prepare(&mut self, page_count: usize, anchor_count: usize) {
        let u32_needed = HEADER_SIZE + page_count * U32_PER_PAGE + anchor_count * U32_PER_ANCHOR;
        let f32_needed =
            F32_HEADER_SIZE + page_count * F32_PER_PAGE + anchor_count * F32_PER_ANCHOR;

        // Reuse buffers if capacity is sufficient
        self.clear();
        self.u32_data.reserve(u32_needed);
        self.f32_data.reserve(f32_needed);
    }

    /// Encode a plan, replacing previous contents
    pub fn write_plan(&mut self, plan: &LayoutPlan) {
        let anchors = plan.footer_anchors();
        self.prepare(plan.pages.len(), anchors.len());

        let item_count: usize = plan.pages.iter().map(|p| p.items.len()).sum();
        let density = match plan.density_mode {
            DensityMode::Normal => 0,
            DensityMode::Compact => 1,
        };

        self.u32_data.push(MAGIC);
        self.u32_data.push(SCHEMA_VERSION);
        self.u32_data.push(plan.pages.len() as u32);
        self.u32_data.push(density);
        self.u32_data.push(anchors.len() as u32);
        self.u32_data.push(item_count as u32);

        self.f32_data.push(plan.row_height);
        self.f32_data.push(plan.page_width);
        self.f32_data.push(plan.page_height);
        self.f32_data.push(plan.canvas_height);
        self.f32_data.push(plan.footer_bottom);

        for page in &plan.pages {
            let mut flags = 0;
            if page.is_last_page {
                flags |= FLAG_LAST_PAGE;
            }
            if page.repeats_header {
                flags |= FLAG_REPEATS_HEADER;
            }
            if page.shows_placeholder {
                flags |= FLAG_PLACEHOLDER;
            }

            self.u32_data.push(page.page_number as u32);
            self.u32_data.push(page.first_item_index as u32);
            self.u32_data.push(page.items.len() as u32);
            self.u32_data.push(flags);

            self.f32_data.push(page.y_offset);
            self.f32_data.push(page.items_top);
            self.f32_data.push(page.height);
        }

        for entry in anchors.iter() {
            let (payment_index, payment_kind) = match entry.anchor {
                FooterAnchor::PaymentMethod(index) => (
                    index as u32,
                    plan.payment_entries
                        .get(index)
                        .map_or(NO_PAYMENT_KIND, |e| e.kind.code()),
                ),
                _ => (0, NO_PAYMENT_KIND),
            };
            self.u32_data.push(entry.anchor.code());
            self.u32_data.push(payment_index);
            self.u32_data.push(payment_kind);
            self.f32_data.push(entry.offset);
        }

        #[cfg(debug_assertions)]
        self.validate_layout();
    }

    /// Page count from the header, 0 if nothing was written
    pub fn page_count(&self) -> usize {
        if self.u32_data.len() < HEADER_SIZE {
            return 0;
        }
        self.u32_data[2] as usize
    }

    /// Decode the page at `index`
    pub fn page(&self, index: usize) -> Option<PageRecord> {
        if index >= self.page_count() {
            return None;
        }
        let u = HEADER_SIZE + index * U32_PER_PAGE;
        let f = F32_HEADER_SIZE + index * F32_PER_PAGE;
        let ints = self.u32_data.get(u..u + U32_PER_PAGE)?;
        let floats = self.f32_data.get(f..f + F32_PER_PAGE)?;
        Some(PageRecord {
            page_number: ints[0],
            first_item_index: ints[1],
            item_count: ints[2],
            flags: ints[3],
            y_offset: floats[0],
            items_top: floats[1],
            height: floats[2],
        })
    }

    /// Decode the anchor at `index`
    pub fn anchor(&self, index: usize) -> Option<AnchorRecord> {
        if self.u32_data.len() < HEADER_SIZE || index >= self.u32_data[4] as usize {
            return None;
        }
        let page_count = self.page_count();
        let u = HEADER_SIZE + page_count * U32_PER_PAGE + index * U32_PER_ANCHOR;
        let f = F32_HEADER_SIZE + page_count * F32_PER_PAGE + index * F32_PER_ANCHOR;
        let ints = self.u32_data.get(u..u + U32_PER_ANCHOR)?;
        Some(AnchorRecord {
            code: ints[0],
            payment_index: ints[1],
            payment_kind: ints[2],
            offset: *self.f32_data.get(f)?,
        })
    }

    /// Check buffer lengths agree with the header (debug builds only)
    #[cfg(debug_assertions)]
    fn validate_layout(&self) {
        let page_count = self.u32_data[2] as usize;
        let anchor_count = self.u32_data[4] as usize;
        debug_assert_eq!(
            self.u32_data.len(),
            HEADER_SIZE + page_count * U32_PER_PAGE + anchor_count * U32_PER_ANCHOR,
            "u32 buffer length disagrees with header"
        );
        debug_assert_eq!(
            self.f32_data.len(),
            F32_HEADER_SIZE + page_count * F32_PER_PAGE + anchor_count * F32_PER_ANCHOR,
            "f32 buffer length disagrees with header"
        );
    }
}
