//! Document model: the numerically resolved invoice the engine lays out

mod block;
mod line_item;

pub use block::{
    BlockKind, Discount, DiscountKind, OptionalBlock, PaymentKind, PaymentMethod, Tax,
};
pub use line_item::LineItem;

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of an invoice or estimate, as handed over by the data layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSnapshot {
    /// Line items in display order
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub tax: Option<Tax>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub balance_due: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

impl InvoiceSnapshot {
    /// Create a snapshot with items and no optional blocks
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Parse a snapshot from the JSON shape the app stores
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enable a block, replacing any existing block of the same kind
    pub fn with_block(mut self, block: OptionalBlock) -> Self {
        match block {
            OptionalBlock::Discount(d) => self.discount = Some(d),
            OptionalBlock::Tax(t) => self.tax = Some(t),
            OptionalBlock::PaidAmount { value } => self.paid_amount = Some(value),
            OptionalBlock::BalanceDue { value } => self.balance_due = Some(value),
            OptionalBlock::Notes { text } => self.notes = Some(text),
            OptionalBlock::PaymentMethods(methods) => self.payment_methods = methods,
        }
        self
    }

    /// Blocks that will be rendered. Blank notes and an empty
    /// payment list count as absent.
    pub fn blocks(&self) -> Vec<OptionalBlock> {
        let mut blocks = Vec::with_capacity(6);

        if let Some(text) = &self.notes {
            blocks.push(OptionalBlock::Notes { text: text.clone() });
        }
        blocks.push(OptionalBlock::PaymentMethods(self.payment_methods.clone()));
        if let Some(discount) = &self.discount {
            blocks.push(OptionalBlock::Discount(discount.clone()));
        }
        if let Some(tax) = &self.tax {
            blocks.push(OptionalBlock::Tax(tax.clone()));
        }
        if let Some(value) = self.paid_amount {
            blocks.push(OptionalBlock::PaidAmount { value });
        }
        if let Some(value) = self.balance_due {
            blocks.push(OptionalBlock::BalanceDue { value });
        }

        blocks.retain(|block| !block.is_empty());
        blocks
    }

    /// Validate every item and block. Stops at the first defect.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (index, item) in self.items.iter().enumerate() {
            item.validate(index)?;
        }
        for block in self.blocks() {
            block.validate()?;
        }
        Ok(())
    }
}
