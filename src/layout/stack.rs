//! Vertical stacking of the footer blocks on the last page

use crate::document::{BlockKind, OptionalBlock, PaymentKind, PaymentMethod};
use crate::layout::config::LayoutConfig;
use crate::layout::line_break::{wrap, wrapped_line_count};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Named vertical position in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FooterAnchor {
    Notes,
    PaymentMethods,
    /// One entry inside the payment block, by position
    PaymentMethod(usize),
    Subtotal,
    Discount,
    Tax,
    Paid,
    BalanceDue,
    GrandTotalBox,
}

impl FooterAnchor {
    /// Stable numeric code used by the flat plan buffer
    pub fn code(&self) -> u32 {
        match self {
            FooterAnchor::Notes => 0,
            FooterAnchor::PaymentMethods => 1,
            FooterAnchor::PaymentMethod(_) => 2,
            FooterAnchor::Subtotal => 3,
            FooterAnchor::Discount => 4,
            FooterAnchor::Tax => 5,
            FooterAnchor::Paid => 6,
            FooterAnchor::BalanceDue => 7,
            FooterAnchor::GrandTotalBox => 8,
        }
    }

    fn for_block(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Notes => FooterAnchor::Notes,
            BlockKind::PaymentMethods => FooterAnchor::PaymentMethods,
            BlockKind::Discount => FooterAnchor::Discount,
            BlockKind::Tax => FooterAnchor::Tax,
            BlockKind::PaidAmount => FooterAnchor::Paid,
            BlockKind::BalanceDue => FooterAnchor::BalanceDue,
        }
    }
}

impl fmt::Display for FooterAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FooterAnchor::Notes => f.write_str("notes"),
            FooterAnchor::PaymentMethods => f.write_str("paymentMethods"),
            FooterAnchor::PaymentMethod(index) => write!(f, "paymentMethod[{}]", index),
            FooterAnchor::Subtotal => f.write_str("subtotal"),
            FooterAnchor::Discount => f.write_str("discount"),
            FooterAnchor::Tax => f.write_str("tax"),
            FooterAnchor::Paid => f.write_str("paid"),
            FooterAnchor::BalanceDue => f.write_str("balanceDue"),
            FooterAnchor::GrandTotalBox => f.write_str("grandTotalBox"),
        }
    }
}

/// Slots of the footer stack, top to bottom
#[derive(Debug, Clone, Copy)]
enum StackSlot {
    Optional(BlockKind),
    Subtotal,
}

const STACK_ORDER: [StackSlot; 7] = [
    StackSlot::Optional(BlockKind::Notes),
    StackSlot::Optional(BlockKind::PaymentMethods),
    StackSlot::Subtotal,
    StackSlot::Optional(BlockKind::Discount),
    StackSlot::Optional(BlockKind::Tax),
    StackSlot::Optional(BlockKind::PaidAmount),
    StackSlot::Optional(BlockKind::BalanceDue),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorEntry {
    pub anchor: FooterAnchor,
    pub offset: f32,
}

/// Anchor offsets in stack order. Absent blocks have no entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FooterAnchors {
    entries: SmallVec<[AnchorEntry; 10]>,
    bottom: f32,
}

impl FooterAnchors {
    pub fn get(&self, anchor: FooterAnchor) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.anchor == anchor)
            .map(|e| e.offset)
    }

    /// Look up by the serialized name, e.g. `"grandTotalBox"`
    pub fn get_named(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.anchor.to_string() == name)
            .map(|e| e.offset)
    }

    pub fn contains(&self, anchor: FooterAnchor) -> bool {
        self.get(anchor).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Y just below the grand total box
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    fn push(&mut self, anchor: FooterAnchor, offset: f32) {
        self.entries.push(AnchorEntry { anchor, offset });
    }
}

impl Serialize for FooterAnchors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.anchor.to_string(), &entry.offset)?;
        }
        map.end()
    }
}

/// Wrapped lines of one payment entry
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntryLayout {
    pub kind: PaymentKind,
    pub lines: Vec<String>,
}

/// Footer anchors plus the wrapped text they were sized from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FooterLayout {
    pub anchors: FooterAnchors,
    pub notes_lines: Vec<String>,
    pub payment_entries: Vec<PaymentEntryLayout>,
}

fn wrap_payment_entry(method: &PaymentMethod, config: &LayoutConfig) -> PaymentEntryLayout {
    PaymentEntryLayout {
        kind: method.kind,
        lines: method
            .detail_lines
            .iter()
            .flat_map(|line| wrap(line, config.wrap.payment_details))
            .collect(),
    }
}

fn payment_entry_height(entry: &PaymentEntryLayout, config: &LayoutConfig) -> f32 {
    let heights = &config.block_heights;
    heights.payment_entry_header + entry.lines.len() as f32 * heights.payment_line
}

fn notes_height(line_count: usize, config: &LayoutConfig) -> f32 {
    let heights = &config.block_heights;
    heights.notes_header + line_count as f32 * heights.notes_line + heights.notes_spacing
}

/// Height a block adds to the footer stack
pub fn block_height(block: &OptionalBlock, config: &LayoutConfig) -> f32 {
    let heights = &config.block_heights;
    if block.is_empty() {
        return 0.0;
    }
    match block {
        OptionalBlock::Notes { text } => {
            notes_height(wrapped_line_count(text, config.wrap.notes), config)
        }
        OptionalBlock::PaymentMethods(methods) => {
            let entries: f32 = methods
                .iter()
                .map(|m| payment_entry_height(&wrap_payment_entry(m, config), config))
                .sum();
            heights.payment_header + entries + heights.payment_spacing
        }
        OptionalBlock::Discount(_) => heights.discount,
        OptionalBlock::Tax(_) => heights.tax,
        OptionalBlock::PaidAmount { .. } => heights.paid,
        OptionalBlock::BalanceDue { .. } => heights.balance_due,
    }
}

/// Stack the present blocks downward from `base_y`.
///
/// Order is fixed (notes, payment methods, subtotal, discount, tax, paid,
/// balance due, grand total box) regardless of the order of `blocks`. An
/// absent block takes no space, so later blocks move up. Blank notes and an
/// empty payment list count as absent. If a kind appears more than once, the
/// first non-empty occurrence is used.
pub fn resolve_footer(blocks: &[OptionalBlock], base_y: f32, config: &LayoutConfig) -> FooterLayout {
    let heights = &config.block_heights;
    let mut layout = FooterLayout::default();
    let mut running_y = base_y;

    for slot in STACK_ORDER {
        let kind = match slot {
            StackSlot::Subtotal => {
                layout.anchors.push(FooterAnchor::Subtotal, running_y);
                running_y += heights.subtotal;
                continue;
            }
            StackSlot::Optional(kind) => kind,
        };

        let Some(block) = blocks.iter().find(|b| b.kind() == kind && !b.is_empty()) else {
            continue;
        };
        layout.anchors.push(FooterAnchor::for_block(kind), running_y);

        match block {
            OptionalBlock::Notes { text } => {
                layout.notes_lines = wrap(text, config.wrap.notes);
                running_y += notes_height(layout.notes_lines.len(), config);
            }
            OptionalBlock::PaymentMethods(methods) => {
                let mut entry_y = running_y + heights.payment_header;
                for (index, method) in methods.iter().enumerate() {
                    let entry = wrap_payment_entry(method, config);
                    layout.anchors.push(FooterAnchor::PaymentMethod(index), entry_y);
                    entry_y += payment_entry_height(&entry, config);
                    layout.payment_entries.push(entry);
                }
                running_y = entry_y + heights.payment_spacing;
            }
            _ => running_y += block_height(block, config),
        }
    }

    let grand_total = running_y + heights.grand_total_gap;
    layout.anchors.push(FooterAnchor::GrandTotalBox, grand_total);
    layout.anchors.bottom = grand_total + heights.grand_total_box;
    layout
}

/// Anchor offsets only; see [`resolve_footer`]
pub fn resolve_footer_anchors(
    blocks: &[OptionalBlock],
    base_y: f32,
    config: &LayoutConfig,
) -> FooterAnchors {
    resolve_footer(blocks, base_y, config).anchors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DiscountKind;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn discount() -> OptionalBlock {
        OptionalBlock::discount(DiscountKind::Percentage, 10.0)
    }

    fn tax() -> OptionalBlock {
        OptionalBlock::tax(8.25, "Sales tax")
    }

    #[test]
    fn test_subtotal_and_grand_total_always_present() {
        let anchors = resolve_footer_anchors(&[], 100.0, &config());
        assert_eq!(anchors.get(FooterAnchor::Subtotal), Some(100.0));
        // 100 + subtotal 20 + gap 10
        assert_eq!(anchors.get(FooterAnchor::GrandTotalBox), Some(130.0));
        assert_eq!(anchors.bottom(), 166.0);
        assert_eq!(anchors.len(), 2);
    }

    #[test]
    fn test_enabling_discount_shifts_tax_only() {
        let config = config();
        let without = resolve_footer_anchors(&[tax()], 0.0, &config);
        let with = resolve_footer_anchors(&[tax(), discount()], 0.0, &config);

        let shift = config.block_heights.discount;
        assert_eq!(
            with.get(FooterAnchor::Subtotal),
            without.get(FooterAnchor::Subtotal)
        );
        assert_eq!(
            with.get(FooterAnchor::Tax).unwrap(),
            without.get(FooterAnchor::Tax).unwrap() + shift
        );
        assert_eq!(
            with.get(FooterAnchor::GrandTotalBox).unwrap(),
            without.get(FooterAnchor::GrandTotalBox).unwrap() + shift
        );
        assert!(!without.contains(FooterAnchor::Discount));
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let config = config();
        let blocks = vec![
            OptionalBlock::BalanceDue { value: 50.0 },
            tax(),
            OptionalBlock::notes("Thank you"),
            discount(),
            OptionalBlock::PaidAmount { value: 50.0 },
        ];
        let mut reversed = blocks.clone();
        reversed.reverse();

        let a = resolve_footer_anchors(&blocks, 10.0, &config);
        let b = resolve_footer_anchors(&reversed, 10.0, &config);
        assert_eq!(a, b);

        let order: Vec<_> = a.iter().map(|e| e.anchor).collect();
        assert_eq!(
            order,
            vec![
                FooterAnchor::Notes,
                FooterAnchor::Subtotal,
                FooterAnchor::Discount,
                FooterAnchor::Tax,
                FooterAnchor::Paid,
                FooterAnchor::BalanceDue,
                FooterAnchor::GrandTotalBox,
            ]
        );
    }

    #[test]
    fn test_notes_height_from_wrapped_lines() {
        let config = LayoutConfig {
            wrap: crate::layout::config::WrapWidths {
                notes: 10,
                payment_details: 48,
            },
            ..LayoutConfig::default()
        };
        let notes = OptionalBlock::notes("the quick brown fox jumps");
        // header 18 + 3 lines * 14 + spacing 10
        assert_eq!(block_height(&notes, &config), 70.0);

        let footer = resolve_footer(&[notes], 0.0, &config);
        assert_eq!(footer.notes_lines, vec!["the quick", "brown fox", "jumps"]);
        assert_eq!(footer.anchors.get(FooterAnchor::Notes), Some(0.0));
        assert_eq!(footer.anchors.get(FooterAnchor::Subtotal), Some(70.0));
    }

    #[test]
    fn test_payment_entries_anchored_inside_block() {
        let config = config();
        let methods = vec![
            PaymentMethod::new(PaymentKind::Stripe).with_line("Pay online at pay.example.com"),
            PaymentMethod::new(PaymentKind::BankTransfer)
                .with_line("Account: Example Ltd")
                .with_line("IBAN: GB00 EXMP 0000 0000 0000 00")
                .with_line("Sort code: 00-00-00"),
        ];
        let footer = resolve_footer(&[OptionalBlock::PaymentMethods(methods)], 0.0, &config);
        let anchors = &footer.anchors;

        assert_eq!(anchors.get(FooterAnchor::PaymentMethods), Some(0.0));
        // header 18
        assert_eq!(anchors.get(FooterAnchor::PaymentMethod(0)), Some(18.0));
        // + entry header 16 + 1 line * 14
        assert_eq!(anchors.get(FooterAnchor::PaymentMethod(1)), Some(48.0));
        // + entry header 16 + 3 lines * 14 + spacing 10
        assert_eq!(anchors.get(FooterAnchor::Subtotal), Some(116.0));

        assert_eq!(footer.payment_entries.len(), 2);
        assert_eq!(footer.payment_entries[1].kind, PaymentKind::BankTransfer);
        assert_eq!(footer.payment_entries[1].lines.len(), 3);
    }

    #[test]
    fn test_payment_block_height_matches_stack() {
        let config = config();
        let block = OptionalBlock::PaymentMethods(vec![
            PaymentMethod::new(PaymentKind::Paypal).with_line("billing@example.com"),
        ]);
        let anchors = resolve_footer_anchors(std::slice::from_ref(&block), 0.0, &config);
        assert_eq!(anchors.get(FooterAnchor::Subtotal), Some(block_height(&block, &config)));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let config = config();
        let long = "word ".repeat(20);
        assert_eq!(wrapped_line_count(&long, config.wrap.notes), 2);

        let footer = resolve_footer(
            &[OptionalBlock::notes("one"), OptionalBlock::notes(long.clone())],
            0.0,
            &config,
        );
        assert_eq!(footer.anchors.len(), 3);
        assert_eq!(footer.notes_lines, vec!["one"]);
        // header 18 + 1 line * 14 + spacing 10
        assert_eq!(footer.anchors.get(FooterAnchor::Subtotal), Some(42.0));

        let footer = resolve_footer(
            &[OptionalBlock::notes(long), OptionalBlock::notes("one")],
            0.0,
            &config,
        );
        assert_eq!(footer.anchors.get(FooterAnchor::Subtotal), Some(56.0));
    }

    #[test]
    fn test_blank_blocks_are_absent() {
        let config = config();
        let blank = [
            OptionalBlock::notes("  \n "),
            OptionalBlock::PaymentMethods(Vec::new()),
        ];
        for block in &blank {
            assert_eq!(block_height(block, &config), 0.0);
        }

        let footer = resolve_footer(&blank, 100.0, &config);
        assert!(!footer.anchors.contains(FooterAnchor::Notes));
        assert!(!footer.anchors.contains(FooterAnchor::PaymentMethods));
        assert!(footer.notes_lines.is_empty());
        assert_eq!(footer.anchors, resolve_footer_anchors(&[], 100.0, &config));

        // A later non-blank duplicate is used
        let footer = resolve_footer(
            &[OptionalBlock::notes(""), OptionalBlock::notes("Net 30")],
            0.0,
            &config,
        );
        assert_eq!(footer.notes_lines, vec!["Net 30"]);
    }

    #[test]
    fn test_named_lookup_and_json() {
        let anchors = resolve_footer_anchors(&[tax()], 0.0, &config());
        assert_eq!(anchors.get_named("tax"), Some(20.0));
        assert_eq!(anchors.get_named("grandTotalBox"), Some(50.0));
        assert_eq!(anchors.get_named("discount"), None);

        let json = serde_json::to_string(&anchors).unwrap();
        assert_eq!(json, r#"{"subtotal":0.0,"tax":20.0,"grandTotalBox":50.0}"#);
    }

    #[test]
    fn test_anchor_names() {
        assert_eq!(FooterAnchor::PaymentMethod(2).to_string(), "paymentMethod[2]");
        assert_eq!(FooterAnchor::BalanceDue.to_string(), "balanceDue");
    }
}
