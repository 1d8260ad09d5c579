//! Font sizes handed to renderers

use crate::error::ConfigError;
use crate::layout::capacity::DensityMode;
use serde::{Deserialize, Serialize};

/// Font sizes in points for each text role on the document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontScale {
    /// Document title ("INVOICE" / "ESTIMATE")
    pub title: f32,
    /// Business header and table column headings
    pub header: f32,
    /// Item rows, notes and payment details
    pub body: f32,
    /// Totals labels and captions
    pub label: f32,
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            title: 28.0,
            header: 12.0,
            body: 10.0,
            label: 9.0,
        }
    }
}

impl FontScale {
    pub fn new(title: f32, header: f32, body: f32, label: f32) -> Self {
        Self {
            title,
            header,
            body,
            label,
        }
    }

    /// Sizes in effect for a density. Title and header are never scaled.
    pub fn for_density(&self, density: DensityMode, compact_scale: f32) -> Self {
        match density {
            DensityMode::Normal => *self,
            DensityMode::Compact => Self {
                body: self.body * compact_scale,
                label: self.label * compact_scale,
                ..*self
            },
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("title font size", self.title),
            ("header font size", self.header),
            ("body font size", self.body),
            ("label font size", self.label),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        Ok(())
    }
}
