//! Page geometry and block heights, in points

use crate::error::{ConfigError, Result};
use crate::layout::capacity::{capacity, DensityMode, PageRole};
use crate::layout::font::FontScale;
use crate::layout::pagination::PaginationPolicy;
use serde::{Deserialize, Serialize};

/// Layout constraints for invoice pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Gap between stacked pages on a multi-page canvas
    pub page_separator: f32,
    /// Y of the first item row on page 1 (below letterhead, client block and table header)
    pub first_item_offset: f32,
    /// Y where page 1 reserves room for the footer
    pub footer_start_offset: f32,
    /// Y of the first item row on continuation pages (below the repeated header)
    pub continuation_item_offset: f32,
    pub bottom_margin: f32,
    pub base_row_height: f32,
    /// Row and body-font multiplier in compact mode
    pub compact_scale: f32,
    /// Item counts that select compact density
    pub compact_min_items: usize,
    pub compact_max_items: usize,
    pub compact_first_page_capacity: usize,
    pub two_page_first_page_capacity: usize,
    /// Space between the last table row and the footer stack
    pub table_footer_gap: f32,
    pub block_heights: BlockHeights,
    pub wrap: WrapWidths,
    pub fonts: FontScale,
    pub policy: PaginationPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 595.0, // A4
            page_height: 842.0,
            page_separator: 24.0,
            first_item_offset: 300.0,
            footer_start_offset: 600.0,
            continuation_item_offset: 200.0,
            bottom_margin: 40.0,
            base_row_height: 30.0,
            compact_scale: 0.75,
            compact_min_items: 9,
            compact_max_items: 11,
            compact_first_page_capacity: 11,
            two_page_first_page_capacity: 12,
            table_footer_gap: 20.0,
            block_heights: BlockHeights::default(),
            wrap: WrapWidths::default(),
            fonts: FontScale::default(),
            policy: PaginationPolicy::default(),
        }
    }
}

/// Fixed height contribution of each footer block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockHeights {
    pub subtotal: f32,
    pub discount: f32,
    pub tax: f32,
    pub paid: f32,
    pub balance_due: f32,
    pub grand_total_gap: f32,
    pub grand_total_box: f32,
    pub notes_header: f32,
    pub notes_line: f32,
    pub notes_spacing: f32,
    pub payment_header: f32,
    pub payment_entry_header: f32,
    pub payment_line: f32,
    pub payment_spacing: f32,
}

impl Default for BlockHeights {
    fn default() -> Self {
        Self {
            subtotal: 20.0,
            discount: 20.0,
            tax: 20.0,
            paid: 20.0,
            balance_due: 20.0,
            grand_total_gap: 10.0,
            grand_total_box: 36.0,
            notes_header: 18.0,
            notes_line: 14.0,
            notes_spacing: 10.0,
            payment_header: 18.0,
            payment_entry_header: 16.0,
            payment_line: 14.0,
            payment_spacing: 10.0,
        }
    }
}

/// Wrap widths in characters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapWidths {
    pub notes: usize,
    pub payment_details: usize,
}

impl Default for WrapWidths {
    fn default() -> Self {
        Self {
            notes: 70,
            payment_details: 48,
        }
    }
}

impl LayoutConfig {
    /// Parse a config, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Vertical space for rows on a continuation page
    pub fn available_vertical_space(&self) -> f32 {
        self.page_height - self.continuation_item_offset - self.bottom_margin
    }

    /// Y where page content must end
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Y of the first item row for a page role
    pub fn items_top(&self, role: PageRole) -> f32 {
        match role {
            PageRole::First => self.first_item_offset,
            PageRole::Continuation => self.continuation_item_offset,
        }
    }

    /// Check the constants can produce a plan for any document
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let heights = &self.block_heights;
        let dimensions = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("base row height", self.base_row_height),
            ("first item offset", self.first_item_offset),
            ("continuation item offset", self.continuation_item_offset),
            ("notes line height", heights.notes_line),
            ("payment line height", heights.payment_line),
        ];
        for (name, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        let non_negative = [
            ("page separator", self.page_separator),
            ("bottom margin", self.bottom_margin),
            ("table footer gap", self.table_footer_gap),
            ("subtotal height", heights.subtotal),
            ("discount height", heights.discount),
            ("tax height", heights.tax),
            ("paid height", heights.paid),
            ("balance due height", heights.balance_due),
            ("grand total gap", heights.grand_total_gap),
            ("grand total box height", heights.grand_total_box),
            ("notes header height", heights.notes_header),
            ("notes spacing", heights.notes_spacing),
            ("payment header height", heights.payment_header),
            ("payment entry header height", heights.payment_entry_header),
            ("payment spacing", heights.payment_spacing),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        if !(self.compact_scale > 0.0 && self.compact_scale <= 1.0) {
            return Err(ConfigError::ScaleOutOfRange(self.compact_scale));
        }
        if !(self.footer_start_offset.is_finite()
            && self.footer_start_offset > self.first_item_offset)
        {
            return Err(ConfigError::InvertedFirstPage {
                first_item: self.first_item_offset,
                footer_start: self.footer_start_offset,
            });
        }
        if self.compact_min_items > self.compact_max_items {
            return Err(ConfigError::EmptyCompactBand {
                min: self.compact_min_items,
                max: self.compact_max_items,
            });
        }

        let counts = [
            ("compact first page capacity", self.compact_first_page_capacity),
            ("two-page first page capacity", self.two_page_first_page_capacity),
            ("notes wrap width", self.wrap.notes),
            ("payment details wrap width", self.wrap.payment_details),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::ZeroCount { name });
            }
        }
        self.policy.validate()?;
        self.fonts.validate()?;

        for density in [DensityMode::Normal, DensityMode::Compact] {
            for role in [PageRole::First, PageRole::Continuation] {
                if capacity(self, role, density, false) == 0 {
                    return Err(ConfigError::ZeroCapacity {
                        role: role.name(),
                        density: density.name(),
                    });
                }
            }
        }

        Ok(())
    }
}
