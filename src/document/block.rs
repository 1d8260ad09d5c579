//! Optional content blocks shown under the item table

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// How a discount value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub percentage: f64,
    #[serde(default)]
    pub label: String,
}

/// Payment channel offered on the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentKind {
    Stripe,
    Paypal,
    BankTransfer,
}

impl PaymentKind {
    /// Stable numeric code used by the flat plan buffer
    pub fn code(&self) -> u32 {
        match self {
            PaymentKind::Stripe => 0,
            PaymentKind::Paypal => 1,
            PaymentKind::BankTransfer => 2,
        }
    }
}

/// A payment instruction entry (card link, PayPal address, bank details)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub kind: PaymentKind,
    #[serde(default)]
    pub detail_lines: Vec<String>,
}

impl PaymentMethod {
    pub fn new(kind: PaymentKind) -> Self {
        Self {
            kind,
            detail_lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.detail_lines.push(line.into());
        self
    }
}

/// The kind of optional block, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Notes,
    PaymentMethods,
    Discount,
    Tax,
    PaidAmount,
    BalanceDue,
}

/// A named content unit that may or may not be present on the document
#[derive(Debug, Clone, PartialEq)]
pub enum OptionalBlock {
    Discount(Discount),
    Tax(Tax),
    PaidAmount { value: f64 },
    BalanceDue { value: f64 },
    Notes { text: String },
    PaymentMethods(Vec<PaymentMethod>),
}

impl OptionalBlock {
    /// Blank notes and an empty payment list render nothing
    pub fn is_empty(&self) -> bool {
        match self {
            OptionalBlock::Notes { text } => text.trim().is_empty(),
            OptionalBlock::PaymentMethods(methods) => methods.is_empty(),
            _ => false,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            OptionalBlock::Discount(_) => BlockKind::Discount,
            OptionalBlock::Tax(_) => BlockKind::Tax,
            OptionalBlock::PaidAmount { .. } => BlockKind::PaidAmount,
            OptionalBlock::BalanceDue { .. } => BlockKind::BalanceDue,
            OptionalBlock::Notes { .. } => BlockKind::Notes,
            OptionalBlock::PaymentMethods(_) => BlockKind::PaymentMethods,
        }
    }

    pub fn notes(text: impl Into<String>) -> Self {
        OptionalBlock::Notes { text: text.into() }
    }

    pub fn discount(kind: DiscountKind, value: f64) -> Self {
        OptionalBlock::Discount(Discount { kind, value })
    }

    pub fn tax(percentage: f64, label: impl Into<String>) -> Self {
        OptionalBlock::Tax(Tax {
            percentage,
            label: label.into(),
        })
    }

    /// Reject non-finite amounts
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (block, field, value) = match self {
            OptionalBlock::Discount(d) => ("discount", "value", d.value),
            OptionalBlock::Tax(t) => ("tax", "percentage", t.percentage),
            OptionalBlock::PaidAmount { value } => ("paid amount", "value", *value),
            OptionalBlock::BalanceDue { value } => ("balance due", "value", *value),
            OptionalBlock::Notes { .. } | OptionalBlock::PaymentMethods(_) => return Ok(()),
        };
        if value.is_finite() {
            Ok(())
        } else {
            Err(ValidationError::NonFiniteAmount { block, field })
        }
    }
}
