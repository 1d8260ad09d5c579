//! Rows-per-page capacity model

use crate::layout::config::LayoutConfig;
use serde::{Deserialize, Serialize};

/// Row density for the whole document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DensityMode {
    #[default]
    Normal,
    /// Rows and body text shrink so a borderline document stays on one page
    Compact,
}

impl DensityMode {
    /// Compact for counts inside the configured band, Normal otherwise
    pub fn for_item_count(item_count: usize, config: &LayoutConfig) -> Self {
        if (config.compact_min_items..=config.compact_max_items).contains(&item_count) {
            DensityMode::Compact
        } else {
            DensityMode::Normal
        }
    }

    /// Multiplier applied to rows and body fonts
    pub fn scale(&self, config: &LayoutConfig) -> f32 {
        match self {
            DensityMode::Normal => 1.0,
            DensityMode::Compact => config.compact_scale,
        }
    }

    /// Row height in effect, rounded down to whole points
    pub fn row_height(&self, config: &LayoutConfig) -> f32 {
        match self {
            DensityMode::Normal => config.base_row_height,
            DensityMode::Compact => (config.base_row_height * config.compact_scale).floor(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DensityMode::Normal => "normal",
            DensityMode::Compact => "compact",
        }
    }

    pub fn is_compact(&self) -> bool {
        matches!(self, DensityMode::Compact)
    }
}

/// Which kind of page a capacity is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    /// Page 1, which also reserves room for the footer
    First,
    /// Any later page; only the repeated header is reserved
    Continuation,
}

impl PageRole {
    pub fn name(&self) -> &'static str {
        match self {
            PageRole::First => "first",
            PageRole::Continuation => "continuation",
        }
    }
}

fn rows_in(space: f32, row_height: f32) -> usize {
    if row_height <= 0.0 || space <= 0.0 {
        return 0;
    }
    (space / row_height).floor() as usize
}

/// First-page capacity from geometry alone, at normal row height
pub fn baseline_first_page_capacity(config: &LayoutConfig) -> usize {
    rows_in(
        config.footer_start_offset - config.first_item_offset,
        DensityMode::Normal.row_height(config),
    )
}

/// Capacity of a continuation page
pub fn continuation_capacity(config: &LayoutConfig, density: DensityMode) -> usize {
    rows_in(config.available_vertical_space(), density.row_height(config))
}

/// Maximum item rows a page can hold.
///
/// For the first page the geometric baseline is overridden, in order, by the
/// compact cap and then by the two-page balance cap. The caller decides
/// `two_page_exception` from the baseline, before any override.
pub fn capacity(
    config: &LayoutConfig,
    role: PageRole,
    density: DensityMode,
    two_page_exception: bool,
) -> usize {
    match role {
        PageRole::Continuation => continuation_capacity(config, density),
        PageRole::First => {
            let mut first = baseline_first_page_capacity(config);
            if density.is_compact() {
                first = config.compact_first_page_capacity;
            }
            if two_page_exception {
                first = config.two_page_first_page_capacity;
            }
            first
        }
    }
}
