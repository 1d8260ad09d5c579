//! WASM bindings for the layout engine

mod flat_buffer;

pub use flat_buffer::{
    AnchorRecord, PageRecord, PlanBuffer, FLAG_LAST_PAGE, FLAG_PLACEHOLDER,
    FLAG_REPEATS_HEADER, MAGIC, NO_PAYMENT_KIND, SCHEMA_VERSION,
};

use crate::{InvoiceSnapshot, LayoutConfig, LayoutEngine, LayoutPlan, Rect};
use log::debug;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: crate::Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// WASM-exposed layout engine wrapper
#[wasm_bindgen]
pub struct WasmLayoutEngine {
    engine: LayoutEngine,
    buffer: PlanBuffer,
    /// Last plan produced, kept for viewport queries
    last_plan: Option<LayoutPlan>,
}

#[wasm_bindgen]
impl WasmLayoutEngine {
    /// Create an engine with the default A4 configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: LayoutEngine::default(),
            buffer: PlanBuffer::new(),
            last_plan: None,
        }
    }

    /// Create an engine from a JSON configuration; missing fields use defaults
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmLayoutEngine, JsValue> {
        Self::from_config_json(config_json).map_err(to_js_error)
    }

    /// Lay out a JSON snapshot and return the plan as JSON
    pub fn layout(&mut self, snapshot_json: &str) -> Result<String, JsValue> {
        self.layout_json(snapshot_json).map_err(to_js_error)
    }

    /// Lay out a JSON snapshot into the flat buffers, returning the page count
    #[wasm_bindgen(js_name = layoutBuffer)]
    pub fn layout_buffer(&mut self, snapshot_json: &str) -> Result<usize, JsValue> {
        self.fill_buffer(snapshot_json).map_err(to_js_error)
    }

    /// Get pointer to u32 buffer
    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> *const u32 {
        self.buffer.u32_data.as_ptr()
    }

    /// Get u32 buffer length
    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> usize {
        self.buffer.u32_data.len()
    }

    /// Get pointer to f32 buffer
    #[wasm_bindgen(js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> *const f32 {
        self.buffer.f32_data.as_ptr()
    }

    /// Get f32 buffer length
    #[wasm_bindgen(js_name = f32Len)]
    pub fn f32_len(&self) -> usize {
        self.buffer.f32_data.len()
    }

    /// Page numbers of the last plan intersecting a scrolled viewport
    #[wasm_bindgen(js_name = visiblePages)]
    pub fn visible_pages(&self, viewport_y: f32, viewport_height: f32) -> Vec<u32> {
        let Some(plan) = &self.last_plan else {
            return Vec::new();
        };
        let viewport = Rect::new(0.0, viewport_y, plan.page_width, viewport_height);
        plan.visible_pages(viewport)
            .map(|page| page.page_number as u32)
            .collect()
    }

    /// Active configuration as JSON
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> String {
        serde_json::to_string(self.engine.config()).unwrap_or_default()
    }
}

impl WasmLayoutEngine {
    fn from_config_json(config_json: &str) -> crate::Result<Self> {
        let config = LayoutConfig::from_json(config_json)?;
        Ok(Self {
            engine: LayoutEngine::new(config)?,
            buffer: PlanBuffer::new(),
            last_plan: None,
        })
    }

    fn run(&mut self, snapshot_json: &str) -> crate::Result<&LayoutPlan> {
        let snapshot = InvoiceSnapshot::from_json(snapshot_json)?;
        let plan = self.engine.layout(&snapshot)?;
        Ok(self.last_plan.insert(plan))
    }

    fn layout_json(&mut self, snapshot_json: &str) -> crate::Result<String> {
        let plan = self.run(snapshot_json)?;
        Ok(serde_json::to_string(plan)?)
    }

    fn fill_buffer(&mut self, snapshot_json: &str) -> crate::Result<usize> {
        let snapshot = InvoiceSnapshot::from_json(snapshot_json)?;
        let plan = self.engine.layout(&snapshot)?;
        self.buffer.write_plan(&plan);
        debug!(
            "wrote plan buffer: {} u32, {} f32",
            self.buffer.u32_data.len(),
            self.buffer.f32_data.len()
        );
        let pages = plan.total_pages;
        self.last_plan = Some(plan);
        Ok(pages)
    }

    /// Decoded view of the flat buffer
    pub fn buffer(&self) -> &PlanBuffer {
        &self.buffer
    }
}

impl Default for WasmLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    const SNAPSHOT: &str = r#"{
        "items": [
            {"quantity": 2, "name": "Design", "unitPrice": 50.0, "totalPrice": 100.0},
            {"quantity": 1, "name": "Hosting", "description": "Annual", "unitPrice": 120.0, "totalPrice": 120.0}
        ],
        "tax": {"percentage": 8.0, "label": "Sales tax"},
        "paymentMethods": [{"kind": "bankTransfer", "detailLines": ["IBAN DE00 1234 5678 9000"]}]
    }"#;

    #[test]
    fn test_layout_json() {
        let mut engine = WasmLayoutEngine::new();
        let json = engine.layout_json(SNAPSHOT).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["pages"][0]["items"][1]["description"], "Annual");
        assert!(value["footerAnchors"]["paymentMethod[0]"].is_number());
        assert!(value["footerAnchors"]["tax"].is_number());
    }

    #[test]
    fn test_fill_buffer() {
        let mut engine = WasmLayoutEngine::new();
        assert_eq!(engine.fill_buffer(SNAPSHOT).unwrap(), 1);

        let buffer = engine.buffer();
        assert_eq!(buffer.u32_data[0], MAGIC);
        assert_eq!(engine.u32_len(), buffer.u32_data.len());
        assert_eq!(engine.f32_len(), buffer.f32_data.len());
        let page = buffer.page(0).unwrap();
        assert_eq!(page.item_count, 2);
        assert_ne!(page.flags & FLAG_LAST_PAGE, 0);
    }

    #[test]
    fn test_visible_pages_uses_last_plan() {
        let mut engine = WasmLayoutEngine::new();
        assert!(engine.visible_pages(0.0, 800.0).is_empty());

        let items: Vec<String> = (0..31)
            .map(|i| {
                format!(
                    r#"{{"quantity":1,"name":"Row {}","unitPrice":1.0,"totalPrice":1.0}}"#,
                    i
                )
            })
            .collect();
        let snapshot = format!(r#"{{"items":[{}]}}"#, items.join(","));
        assert_eq!(engine.fill_buffer(&snapshot).unwrap(), 3);
        assert_eq!(engine.visible_pages(800.0, 100.0), vec![1, 2]);
    }

    #[test]
    fn test_config_json() {
        let engine = WasmLayoutEngine::from_config_json(r#"{"pageHeight": 900.0}"#).unwrap();
        assert_eq!(engine.engine.config().page_height, 900.0);
        assert!(engine.get_config().contains("\"pageHeight\":900.0"));

        let err = WasmLayoutEngine::from_config_json(r#"{"baseRowHeight": 0.0}"#)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Config(ConfigError::NonPositiveDimension { .. })
        ));
    }

    #[test]
    fn test_malformed_snapshot() {
        let mut engine = WasmLayoutEngine::new();
        assert!(matches!(engine.layout_json("{"), Err(Error::Json(_))));
        assert!(matches!(
            engine.layout_json(r#"{"items":[{"quantity":0,"name":"x","unitPrice":1.0,"totalPrice":0.0}]}"#),
            Err(Error::Validation(_))
        ));
    }
}
