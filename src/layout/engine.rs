//! Layout plan assembly and the engine entry point

use crate::document::{InvoiceSnapshot, LineItem};
use crate::error::Result;
use crate::layout::capacity::DensityMode;
use crate::layout::config::LayoutConfig;
use crate::layout::font::FontScale;
use crate::layout::line_break::contains_line_breaks;
use crate::layout::pagination::{PageSlice, Pagination, PaginationPolicy};
use crate::layout::stack::{resolve_footer, FooterAnchors, FooterLayout, PaymentEntryLayout};
use crate::Rect;
use log::{debug, warn};
use serde::Serialize;

/// One page of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,
    /// Index of `items[0]` in the whole document, for row numbering
    pub first_item_index: usize,
    pub items: Vec<LineItem>,
    pub is_last_page: bool,
    pub repeats_header: bool,
    /// Empty document: draw one placeholder row
    pub shows_placeholder: bool,
    /// Y of the first item row, relative to the page top
    pub items_top: f32,
    /// Top of this page on a stacked multi-page canvas
    pub y_offset: f32,
    pub height: f32,
}

impl Page {
    /// Rows the table occupies, counting the placeholder
    pub fn row_count(&self) -> usize {
        if self.shows_placeholder {
            1
        } else {
            self.items.len()
        }
    }

    /// Y of row `row` relative to the page top
    pub fn row_y(&self, row: usize, row_height: f32) -> f32 {
        self.items_top + row as f32 * row_height
    }

    /// Page rectangle on the stacked canvas
    pub fn bounds(&self, page_width: f32) -> Rect {
        Rect::new(0.0, self.y_offset, page_width, self.height)
    }
}

/// Renderer-agnostic result of laying out one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub pages: Vec<Page>,
    pub total_pages: usize,
    pub density_mode: DensityMode,
    pub row_height: f32,
    pub fonts: FontScale,
    pub page_width: f32,
    pub page_height: f32,
    pub page_separator: f32,
    /// Height of all pages stacked with separators
    pub canvas_height: f32,
    /// Y where last-page content must end
    pub content_bottom: f32,
    /// Footer positions on the last page
    pub footer_anchors: FooterAnchors,
    pub footer_bottom: f32,
    pub notes_lines: Vec<String>,
    pub payment_entries: Vec<PaymentEntryLayout>,
    /// Notes contained line breaks that were reflowed into spaces
    pub notes_reflowed: bool,
    pub policy: PaginationPolicy,
}

impl LayoutPlan {
    /// Page by 1-based number, for rendering a single page
    pub fn page(&self, page_number: usize) -> Option<&Page> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
    }

    pub fn last_page(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn footer_anchors(&self) -> &FooterAnchors {
        &self.footer_anchors
    }

    /// Whether the footer ends above the last page's bottom margin
    pub fn footer_fits(&self) -> bool {
        self.footer_bottom <= self.content_bottom
    }

    /// Pages that intersect a scrolled preview viewport
    pub fn visible_pages(&self, viewport: Rect) -> impl Iterator<Item = &Page> + '_ {
        let width = self.page_width;
        self.pages
            .iter()
            .filter(move |page| page.bounds(width).intersects(&viewport))
    }

    /// All items in document order
    pub fn items(&self) -> impl Iterator<Item = &LineItem> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn is_compact(&self) -> bool {
        self.density_mode.is_compact()
    }
}

/// Height of `page_count` pages stacked with separators between them
pub fn canvas_height(page_count: usize, config: &LayoutConfig) -> f32 {
    let pages = page_count.max(1) as f32;
    pages * config.page_height + (pages - 1.0) * config.page_separator
}

/// Y where the footer stack starts on the page described by `slice`
pub fn footer_base_y(slice: &PageSlice, density: DensityMode, config: &LayoutConfig) -> f32 {
    let rows = slice.len().max(1);
    config.items_top(slice.role) + rows as f32 * density.row_height(config) + config.table_footer_gap
}

/// Combine pagination and footer layout into a plan
pub fn assemble(
    items: &[LineItem],
    pagination: Pagination,
    footer: FooterLayout,
    notes_reflowed: bool,
    config: &LayoutConfig,
) -> LayoutPlan {
    let density = pagination.density;
    let stride = config.page_height + config.page_separator;
    let empty_document = items.is_empty();

    let pages: Vec<Page> = pagination
        .pages
        .into_iter()
        .map(|slice| Page {
            page_number: slice.page_number,
            first_item_index: slice.items.start,
            items: items[slice.items.clone()].to_vec(),
            is_last_page: slice.is_last_page,
            repeats_header: true,
            shows_placeholder: empty_document,
            items_top: config.items_top(slice.role),
            y_offset: (slice.page_number - 1) as f32 * stride,
            height: config.page_height,
        })
        .collect();

    let total_pages = pages.len();
    let footer_bottom = footer.anchors.bottom();

    LayoutPlan {
        pages,
        total_pages,
        density_mode: density,
        row_height: density.row_height(config),
        fonts: config.fonts.for_density(density, config.compact_scale),
        page_width: config.page_width,
        page_height: config.page_height,
        page_separator: config.page_separator,
        canvas_height: canvas_height(total_pages, config),
        content_bottom: config.content_bottom(),
        footer_anchors: footer.anchors,
        footer_bottom,
        notes_lines: footer.notes_lines,
        payment_entries: footer.payment_entries,
        notes_reflowed,
        policy: config.policy,
    }
}

/// Validated configuration plus the validate, paginate, stack and assemble pipeline
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine. A config that cannot produce a plan is rejected here.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out one document
    pub fn layout(&self, snapshot: &InvoiceSnapshot) -> Result<LayoutPlan> {
        snapshot.validate()?;

        let config = &self.config;
        let pagination = config.policy.partition(snapshot.items.len(), config);
        let base_y = pagination
            .last_page()
            .map(|last| footer_base_y(last, pagination.density, config))
            .unwrap_or(config.first_item_offset);

        let footer = resolve_footer(&snapshot.blocks(), base_y, config);

        let notes_reflowed = snapshot
            .notes
            .as_deref()
            .is_some_and(contains_line_breaks);
        if notes_reflowed {
            debug!("notes contain line breaks, reflowed into a single paragraph");
        }

        let layout = assemble(&snapshot.items, pagination, footer, notes_reflowed, config);

        if !layout.footer_fits() {
            warn!(
                "footer ends at {} on page {}, past content bottom {}",
                layout.footer_bottom, layout.total_pages, layout.content_bottom
            );
        }
        debug!(
            "planned {} items on {} pages ({} density, row height {})",
            snapshot.items.len(),
            layout.total_pages,
            layout.density_mode.name(),
            layout.row_height
        );

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::OptionalBlock;
    use crate::error::{Error, ValidationError};
    use crate::layout::stack::FooterAnchor;

    fn items(n: usize) -> Vec<LineItem> {
        (0..n)
            .map(|i| LineItem::new(1, format!("Item {}", i), 5.0, 5.0))
            .collect()
    }

    #[test]
    fn test_canvas_height() {
        let config = LayoutConfig::default();
        assert_eq!(canvas_height(1, &config), 842.0);
        assert_eq!(canvas_height(3, &config), 3.0 * 842.0 + 2.0 * 24.0);
    }

    #[test]
    fn test_zero_items_plan() {
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(Vec::new()))
            .unwrap();

        assert_eq!(plan.total_pages, 1);
        assert!(plan.pages[0].items.is_empty());
        assert!(plan.pages[0].shows_placeholder);
        assert!(plan.pages[0].is_last_page);
        assert_eq!(plan.pages[0].row_count(), 1);
        // Placeholder row still pushes the footer down: 300 + 30 + 20
        assert_eq!(plan.footer_anchors.get(FooterAnchor::Subtotal), Some(350.0));
    }

    #[test]
    fn test_pages_and_offsets() {
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(items(31)))
            .unwrap();

        assert_eq!(plan.total_pages, 3);
        assert_eq!(plan.pages.len(), plan.total_pages);
        assert_eq!(
            plan.pages.iter().map(|p| p.first_item_index).collect::<Vec<_>>(),
            vec![0, 10, 30]
        );
        assert_eq!(plan.pages[1].y_offset, 866.0);
        assert_eq!(plan.pages[1].items_top, 200.0);
        assert_eq!(plan.pages[0].items_top, 300.0);
        assert!(plan.pages.iter().all(|p| p.repeats_header));
        assert!(plan.pages.iter().all(|p| !p.shows_placeholder));
        assert_eq!(plan.pages.iter().filter(|p| p.is_last_page).count(), 1);
        assert!(plan.pages[2].is_last_page);
        assert_eq!(plan.canvas_height, 3.0 * 842.0 + 2.0 * 24.0);
        assert_eq!(plan.pages[2].row_y(0, plan.row_height), 200.0);
    }

    #[test]
    fn test_items_round_trip_in_order() {
        let input = items(45);
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(input.clone()))
            .unwrap();
        let flattened: Vec<LineItem> = plan.items().cloned().collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_compact_plan_scales_rows_and_fonts() {
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(items(10)))
            .unwrap();

        assert!(plan.is_compact());
        assert_eq!(plan.row_height, 22.0);
        assert_eq!(plan.fonts.body, 7.5);
        assert_eq!(plan.fonts.title, 28.0);
        // 300 + 10 * 22 + 20
        assert_eq!(plan.footer_anchors.get(FooterAnchor::Subtotal), Some(540.0));
    }

    #[test]
    fn test_page_lookup() {
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(items(13)))
            .unwrap();
        assert_eq!(plan.page(0), None);
        assert_eq!(plan.page(1).map(|p| p.items.len()), Some(12));
        assert_eq!(plan.page(2).map(|p| p.items.len()), Some(1));
        assert_eq!(plan.page(3), None);
        assert_eq!(plan.last_page().map(|p| p.page_number), Some(2));
    }

    #[test]
    fn test_visible_pages() {
        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(items(60)))
            .unwrap();
        assert_eq!(plan.total_pages, 4);

        let viewport = Rect::new(0.0, 900.0, 595.0, 900.0);
        let visible: Vec<_> = plan.visible_pages(viewport).map(|p| p.page_number).collect();
        assert_eq!(visible, vec![2, 3]);
    }

    #[test]
    fn test_footer_overflow_detected() {
        // 12 rows on page 1 at normal height push the footer to the bottom
        let snapshot = InvoiceSnapshot::new(items(12))
            .with_block(OptionalBlock::notes("word ".repeat(200)));
        let plan = LayoutEngine::default().layout(&snapshot).unwrap();
        assert_eq!(plan.total_pages, 1);
        assert!(!plan.footer_fits());

        let plan = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(items(3)))
            .unwrap();
        assert!(plan.footer_fits());
    }

    #[test]
    fn test_full_continuation_page_leaves_no_footer_room() {
        // 30 items: 12 + 18, so the footer starts at 200 + 18 * 30 + 20 = 760
        // and the grand total box ends at 826, past 802
        let engine = LayoutEngine::default();
        let plan = engine.layout(&InvoiceSnapshot::new(items(30))).unwrap();
        assert_eq!(plan.pages.iter().map(|p| p.items.len()).collect::<Vec<_>>(), vec![12, 18]);
        assert_eq!(plan.footer_bottom, 826.0);
        assert!(!plan.footer_fits());

        // 47 items: 10 + 20 + 17 ends the box at 796
        let plan = engine.layout(&InvoiceSnapshot::new(items(47))).unwrap();
        assert!(plan.footer_fits());
        let plan = engine.layout(&InvoiceSnapshot::new(items(48))).unwrap();
        assert!(!plan.footer_fits());

        // Overflow is reported, never corrected by repagination
        assert_eq!(plan.total_pages, 3);
        assert!(plan.footer_bottom > plan.content_bottom);
    }

    #[test]
    fn test_notes_reflow_flag() {
        let snapshot = InvoiceSnapshot::new(items(1))
            .with_block(OptionalBlock::notes("Line one\nLine two"));
        let plan = LayoutEngine::default().layout(&snapshot).unwrap();
        assert!(plan.notes_reflowed);
        assert_eq!(plan.notes_lines, vec!["Line one Line two"]);
    }

    #[test]
    fn test_invalid_input_rejected_before_pagination() {
        let mut list = items(5);
        list[4].total_price = f64::NAN;
        let err = LayoutEngine::default()
            .layout(&InvoiceSnapshot::new(list))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NonFinitePrice { index: 4, .. })
        ));
    }

    #[test]
    fn test_bad_config_rejected_at_construction() {
        let config = LayoutConfig {
            base_row_height: -4.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(LayoutEngine::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_plan_json_shape() {
        let snapshot = InvoiceSnapshot::new(items(2)).with_block(OptionalBlock::tax(5.0, "GST"));
        let plan = LayoutEngine::default().layout(&snapshot).unwrap();
        let json: serde_json::Value = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["densityMode"], "normal");
        assert_eq!(json["policy"]["kind"], "capacity");
        assert_eq!(json["pages"][0]["isLastPage"], true);
        assert_eq!(json["pages"][0]["items"][1]["name"], "Item 1");
        assert!(json["footerAnchors"]["tax"].is_number());
        assert!(json["footerAnchors"].get("discount").is_none());
    }
}
