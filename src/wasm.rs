//! WebAssembly exports for the layer stack.
//!
//! These are exposed to JavaScript via wasm-bindgen. Images cross the
//! boundary as flat RGBA bytes (`ImageData.data`), layers are addressed by
//! the string form of their [`LayerId`].

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::filters::{Filter, FilterKind};
use crate::layers::{LayerId, LayerStack, MoveDirection};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_id(id: &str) -> Result<LayerId, JsValue> {
    id.parse::<LayerId>().map_err(to_js)
}

/// Ids of the available filters, in palette order.
#[wasm_bindgen]
pub fn filter_ids() -> Vec<String> {
    FilterKind::ALL.iter().map(|kind| kind.id().to_string()).collect()
}

/// Apply a single default-parameter filter to flat RGBA bytes.
///
/// # Arguments
/// * `id` - Filter id, e.g. `"gaussian-blur"`
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
#[wasm_bindgen]
pub fn apply_filter_wasm(id: &str, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let kind = id.parse::<FilterKind>().map_err(to_js)?;
    let input = PixelBuffer::new(width, height, data.to_vec()).map_err(to_js)?;
    Ok(Filter::from(kind).apply(&input).into_bytes())
}

// ============================================================================
// Layer Stack
// ============================================================================

/// A layer stack owned by JavaScript.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmLayerStack {
    inner: LayerStack,
}

#[wasm_bindgen]
impl WasmLayerStack {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default-parameter layer of filter `id`; returns the layer id.
    pub fn add_filter(&mut self, id: &str) -> Result<String, JsValue> {
        let kind = id.parse::<FilterKind>().map_err(to_js)?;
        Ok(self.inner.add(&kind.into()).to_string())
    }

    pub fn remove(&mut self, layer: &str) -> Result<(), JsValue> {
        self.inner.remove(parse_id(layer)?).map(|_| ()).map_err(to_js)
    }

    /// Returns the new enabled state.
    pub fn toggle(&mut self, layer: &str) -> Result<bool, JsValue> {
        self.inner.toggle(parse_id(layer)?).map_err(to_js)
    }

    pub fn move_up(&mut self, layer: &str) -> Result<(), JsValue> {
        self.inner
            .move_layer(parse_id(layer)?, MoveDirection::Up)
            .map_err(to_js)
    }

    pub fn move_down(&mut self, layer: &str) -> Result<(), JsValue> {
        self.inner
            .move_layer(parse_id(layer)?, MoveDirection::Down)
            .map_err(to_js)
    }

    /// Set a parameter of a live layer; the value is clamped to its range.
    pub fn set_param(&mut self, layer: &str, name: &str, value: f64) -> Result<(), JsValue> {
        let id = parse_id(layer)?;
        let entry = self
            .inner
            .get_mut(id)
            .ok_or_else(|| to_js(crate::error::FilterError::LayerNotFound(id)))?;
        if entry.filter.set_param(name, value) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!(
                "{} has no parameter named {}",
                entry.filter.id(),
                name
            )))
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Layer ids in composition order.
    pub fn layer_ids(&self) -> Vec<String> {
        self.inner.layers().iter().map(|layer| layer.id().to_string()).collect()
    }

    /// Compose every enabled layer over flat RGBA bytes.
    ///
    /// # Arguments
    /// * `data` - Flat array of RGBA bytes (length = width * height * 4)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    /// Flat array of RGBA bytes, same length as `data`
    pub fn compose(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        let base = PixelBuffer::new(width, height, data.to_vec()).map_err(to_js)?;
        Ok(self.inner.compose(&base).into_bytes())
    }
}
