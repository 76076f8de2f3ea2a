//! Filter layers and the layer stack.
//!
//! A [`LayerStack`] is an ordered list of [`FilterLayer`]s. Composition
//! folds the enabled layers, in stack order, over a base buffer. Order is
//! significant: the filters do not commute in general (blur then sharpen is
//! not sharpen then blur).
//!
//! `compose` borrows the stack immutably and never touches the base buffer,
//! so a host may start a recomputation, change parameters, and throw the
//! stale result away without any cleanup.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};
use crate::filters::Filter;

// ============================================================================
// Layer Identity
// ============================================================================

/// Opaque unique identifier of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(Uuid);

impl LayerId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0.simple())
    }
}

impl std::str::FromStr for LayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.strip_prefix("layer-").unwrap_or(s);
        Uuid::parse_str(raw).map(LayerId)
    }
}

/// Direction for [`LayerStack::move_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Towards index 0 (applied earlier).
    Up,
    /// Towards the end (applied later).
    Down,
}

// ============================================================================
// Filter Layer
// ============================================================================

/// A named, independently toggleable filter instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterLayer {
    id: LayerId,
    pub filter: Filter,
    pub enabled: bool,
    pub name: String,
}

impl FilterLayer {
    /// New enabled layer holding a private copy of `template`.
    pub fn new(template: &Filter, name: impl Into<String>) -> Self {
        Self {
            id: LayerId::generate(),
            filter: template.clone(),
            enabled: true,
            name: name.into(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }
}

// ============================================================================
// Layer Stack
// ============================================================================

/// Ordered sequence of filter layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<FilterLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer built from `template` and return its id.
    ///
    /// The template is cloned; editing the new layer later never affects the
    /// template or other layers made from it.
    pub fn add(&mut self, template: &Filter) -> LayerId {
        let name = format!("{} {}", template.name(), self.layers.len() + 1);
        let layer = FilterLayer::new(template, name);
        let id = layer.id();
        log::debug!("add layer {} ({}) at index {}", id, layer.name, self.layers.len());
        self.layers.push(layer);
        id
    }

    /// Remove the layer with `id`, returning it.
    pub fn remove(&mut self, id: LayerId) -> Result<FilterLayer> {
        let index = self.index_of(id)?;
        log::debug!("remove layer {} from index {}", id, index);
        Ok(self.layers.remove(index))
    }

    /// Flip the enabled flag; returns the new state.
    pub fn toggle(&mut self, id: LayerId) -> Result<bool> {
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];
        layer.enabled = !layer.enabled;
        log::debug!("toggle layer {} -> enabled={}", id, layer.enabled);
        Ok(layer.enabled)
    }

    pub fn set_enabled(&mut self, id: LayerId, enabled: bool) -> Result<()> {
        let index = self.index_of(id)?;
        self.layers[index].enabled = enabled;
        Ok(())
    }

    /// Swap the layer with its neighbor in `direction`.
    ///
    /// Moving the first layer up or the last layer down is a no-op.
    pub fn move_layer(&mut self, id: LayerId, direction: MoveDirection) -> Result<()> {
        let index = self.index_of(id)?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.layers.len()),
        };
        if let Some(target) = target {
            self.layers.swap(index, target);
            log::debug!("move layer {} from index {} to {}", id, index, target);
        }
        Ok(())
    }

    /// Drop every layer. Called when the base image changes.
    pub fn clear(&mut self) {
        log::debug!("clear {} layers", self.layers.len());
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.enabled).count()
    }

    /// Layers in composition order.
    pub fn layers(&self) -> &[FilterLayer] {
        &self.layers
    }

    pub fn get(&self, id: LayerId) -> Option<&FilterLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Mutable access for editing a live layer's filter parameters.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut FilterLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Fold the enabled layers, in order, over `base`.
    ///
    /// With no enabled layers the result is a byte-identical copy of `base`.
    /// Disabled layers are skipped without being evaluated.
    pub fn compose(&self, base: &PixelBuffer) -> PixelBuffer {
        log::debug!(
            "compose {}x{} through {} of {} layers",
            base.width(),
            base.height(),
            self.enabled_count(),
            self.layers.len()
        );

        self.layers
            .iter()
            .filter(|layer| layer.enabled)
            .fold(base.clone(), |output, layer| {
                log::trace!("apply {} ({})", layer.name, layer.filter);
                layer.filter.apply(&output)
            })
    }

    fn index_of(&self, id: LayerId) -> Result<usize> {
        self.position(id).ok_or_else(|| {
            log::warn!("no layer with id {}", id);
            FilterError::LayerNotFound(id)
        })
    }
}

// ============================================================================
// Stack Configuration
// ============================================================================

/// Serializable snapshot of one layer. Ids are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub filter: Filter,
}

fn enabled_by_default() -> bool {
    true
}

/// Serializable snapshot of a whole stack (a preset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub layers: Vec<LayerConfig>,
}

impl LayerStack {
    pub fn to_config(&self) -> StackConfig {
        StackConfig {
            layers: self
                .layers
                .iter()
                .map(|layer| LayerConfig {
                    name: layer.name.clone(),
                    enabled: layer.enabled,
                    filter: layer.filter,
                })
                .collect(),
        }
    }

    /// Build a stack from a preset. Every layer gets a fresh id.
    pub fn from_config(config: &StackConfig) -> Self {
        let layers = config
            .layers
            .iter()
            .map(|layer| {
                let mut built = FilterLayer::new(&layer.filter, layer.name.clone());
                built.enabled = layer.enabled;
                built
            })
            .collect();
        Self { layers }
    }
}
