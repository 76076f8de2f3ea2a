//! Sharpen filter: 3x3 convolution on RGB.
//!
//! Kernel, where a = amount:
//!
//! ```text
//!  0  -a    0
//! -a  1+4a -a
//!  0  -a    0
//! ```
//!
//! The one-pixel image border is copied verbatim (no convolution there).
//! Alpha is never convolved.

use serde::Serialize;

use super::core::{map_rows, to_u8};
use super::params::{clamp_param, ParamSpec};
use crate::buffer::{PixelBuffer, CHANNELS};

/// Edge-enhancing 3x3 sharpen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sharpen {
    amount: f64,
}

impl Sharpen {
    pub const AMOUNT: ParamSpec = ParamSpec {
        name: "amount",
        label: "Amount",
        min: 0.0,
        max: 3.0,
        step: 0.1,
        default: 1.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::AMOUNT];

    pub fn new(amount: f64) -> Self {
        let mut filter = Self::default();
        filter.set_amount(amount);
        filter
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Clamped to [0, 3].
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = clamp_param(amount, Self::AMOUNT.min, Self::AMOUNT.max);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        let width = input.width() as usize;
        let height = input.height() as usize;
        if width < 3 || height < 3 {
            return input.clone();
        }

        let center_weight = 1.0 + 4.0 * self.amount;
        let edge_weight = -self.amount;
        let src = input.view();

        map_rows(input, |y, row| {
            if y == 0 || y == height - 1 {
                return;
            }
            for x in 1..width - 1 {
                for c in 0..3 {
                    let sum = src[[y - 1, x, c]] as f64 * edge_weight
                        + src[[y + 1, x, c]] as f64 * edge_weight
                        + src[[y, x - 1, c]] as f64 * edge_weight
                        + src[[y, x + 1, c]] as f64 * edge_weight
                        + src[[y, x, c]] as f64 * center_weight;

                    row[x * CHANNELS + c] = to_u8(sum);
                }
            }
        })
    }
}

impl Default for Sharpen {
    fn default() -> Self {
        Self {
            amount: Self::AMOUNT.default,
        }
    }
}
