//! Invoice line items

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A single billed row. Totals arrive already computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit_price: f64,
    pub total_price: f64,
}

impl LineItem {
    pub fn new(quantity: i64, name: impl Into<String>, unit_price: f64, total_price: f64) -> Self {
        Self {
            quantity,
            name: name.into(),
            description: None,
            unit_price,
            total_price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the row at `index` is renderable as given
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity {
                index,
                quantity: self.quantity,
            });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
        if !self.unit_price.is_finite() {
            return Err(ValidationError::NonFinitePrice {
                index,
                field: "unit price",
            });
        }
        if !self.total_price.is_finite() {
            return Err(ValidationError::NonFinitePrice {
                index,
                field: "total price",
            });
        }
        Ok(())
    }
}
