//! Splitting line items into pages

use crate::document::LineItem;
use crate::error::ConfigError;
use crate::layout::capacity::{
    baseline_first_page_capacity, capacity, continuation_capacity, DensityMode, PageRole,
};
use crate::layout::config::LayoutConfig;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::ops::Range;

const DEFAULT_THRESHOLD: usize = 8;
const DEFAULT_CHUNK_SIZE: usize = 12;

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// How items are distributed over pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaginationPolicy {
    /// Geometry-driven capacities with density selection and first-page overrides
    #[default]
    Capacity,
    /// Uniform chunks with no density scaling. Up to `threshold` items
    /// always stay on one page, even if they overflow it.
    FixedChunk {
        #[serde(default = "default_threshold")]
        threshold: usize,
        #[serde(default = "default_chunk_size", rename = "chunkSize")]
        chunk_size: usize,
    },
}

impl PaginationPolicy {
    /// Fixed chunking with the stock threshold (8) and chunk size (12)
    pub fn fixed_chunk() -> Self {
        PaginationPolicy::FixedChunk {
            threshold: DEFAULT_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaginationPolicy::Capacity => "capacity",
            PaginationPolicy::FixedChunk { .. } => "fixedChunk",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PaginationPolicy::FixedChunk { chunk_size: 0, .. } => {
                Err(ConfigError::ZeroCount { name: "chunk size" })
            }
            _ => Ok(()),
        }
    }

    /// Partition `items` into pages.
    ///
    /// Fails if `config` or this policy could produce a zero-capacity page.
    pub fn plan(
        &self,
        items: &[LineItem],
        config: &LayoutConfig,
    ) -> Result<Pagination, ConfigError> {
        self.validate()?;
        config.validate()?;
        Ok(self.partition(items.len(), config))
    }

    /// Partition without checking the config. `config` must have passed
    /// [`LayoutConfig::validate`] and `self` [`PaginationPolicy::validate`].
    pub(crate) fn partition(&self, item_count: usize, config: &LayoutConfig) -> Pagination {
        let pagination = match *self {
            PaginationPolicy::Capacity => plan_by_capacity(item_count, config),
            PaginationPolicy::FixedChunk {
                threshold,
                chunk_size,
            } => plan_fixed_chunks(item_count, threshold, chunk_size),
        };

        for page in &pagination.pages {
            trace!(
                "page {}: items {:?}{}",
                page.page_number,
                page.items,
                if page.is_last_page { " (last)" } else { "" }
            );
        }

        pagination
    }
}

/// Item range assigned to one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    /// 1-based page number
    pub page_number: usize,
    /// Indices into the input item list
    pub items: Range<usize>,
    pub role: PageRole,
    pub is_last_page: bool,
}

impl PageSlice {
    fn new(page_number: usize, items: Range<usize>) -> Self {
        let role = if page_number == 1 {
            PageRole::First
        } else {
            PageRole::Continuation
        };
        Self {
            page_number,
            items,
            role,
            is_last_page: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Output of the planner
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub pages: Vec<PageSlice>,
    pub density: DensityMode,
    /// Whether the two-page balance cap replaced the first-page capacity
    pub two_page_exception: bool,
}

impl Pagination {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn last_page(&self) -> Option<&PageSlice> {
        self.pages.last()
    }
}

/// Partition `items` with the configured policy
pub fn plan(items: &[LineItem], config: &LayoutConfig) -> Result<Pagination, ConfigError> {
    config.policy.plan(items, config)
}

/// Pages needed for `item_count` rows given first and continuation capacities
pub fn estimate_page_count(item_count: usize, first: usize, continuation: usize) -> usize {
    if item_count <= first {
        1
    } else {
        1 + (item_count - first).div_ceil(continuation.max(1))
    }
}

fn plan_by_capacity(item_count: usize, config: &LayoutConfig) -> Pagination {
    let density = DensityMode::for_item_count(item_count, config);
    let continuation = continuation_capacity(config, density);
    let baseline = baseline_first_page_capacity(config);

    // The balance check looks at the geometric baseline, not the compact cap
    let preliminary = estimate_page_count(item_count, baseline, continuation);
    let two_page_exception = preliminary == 2;
    let first = capacity(config, PageRole::First, density, two_page_exception);

    debug!(
        "{} items: {} density, baseline {} -> first page {}, continuation {}, preliminary {} pages",
        item_count,
        density.name(),
        baseline,
        first,
        continuation,
        preliminary
    );

    Pagination {
        pages: slice_pages(item_count, first, continuation),
        density,
        two_page_exception,
    }
}

fn plan_fixed_chunks(item_count: usize, threshold: usize, chunk_size: usize) -> Pagination {
    let pages = if item_count <= threshold {
        slice_pages(item_count, item_count, chunk_size)
    } else {
        slice_pages(item_count, chunk_size, chunk_size)
    };

    debug!(
        "{} items: fixed chunks of {} (threshold {}) -> {} pages",
        item_count,
        chunk_size,
        threshold,
        pages.len()
    );

    Pagination {
        pages,
        density: DensityMode::Normal,
        two_page_exception: false,
    }
}

fn slice_pages(item_count: usize, first: usize, continuation: usize) -> Vec<PageSlice> {
    debug_assert!(continuation > 0, "continuation capacity must be validated");
    debug_assert!(first > 0 || item_count == 0, "first page capacity must be validated");
    let mut pages = Vec::with_capacity(estimate_page_count(item_count, first, continuation));

    let first_end = first.min(item_count);
    pages.push(PageSlice::new(1, 0..first_end));

    let mut start = first_end;
    while start < item_count {
        let end = (start + continuation).min(item_count);
        pages.push(PageSlice::new(pages.len() + 1, start..end));
        start = end;
    }

    if let Some(last) = pages.last_mut() {
        last.is_last_page = true;
    }
    pages
}
