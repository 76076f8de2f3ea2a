//! filterstack
//!
//! Non-destructive, layered image filtering: an ordered stack of
//! independently toggleable filter layers composed over a base image.
//! Python bindings via PyO3 and WASM bindings for JavaScript are available
//! behind the `python` and `wasm` features.
//!
//! ## Image Format
//! All filters work on 8-bit RGBA ([`PixelBuffer`]):
//! - row-major, top-left origin, 4 bytes per pixel
//! - as an ndarray the shape is (height, width, 4)
//!
//! ## Pipeline
//! ```text
//! base ──► layer 1 ──► layer 2 ──► ... ──► output
//!          (skipped when disabled)
//! ```
//! Every filter produces a new buffer of the input's dimensions; the base
//! image is never modified. See [`LayerStack::compose`].

pub mod buffer;
pub mod error;
pub mod filters;
pub mod layers;

#[cfg(feature = "codec")]
pub mod codec;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{PixelBuffer, CHANNELS};
pub use error::{FilterError, Result};
pub use filters::{Filter, FilterKind, ParamSpec};
pub use layers::{FilterLayer, LayerConfig, LayerId, LayerStack, MoveDirection, StackConfig};

#[cfg(feature = "codec")]
pub use codec::{ImageCodec, PngCodec};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::collections::HashMap;

    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::filters::{
        Filter, FilterKind, GaussianBlur, GrayscaleContrastBrightness, HueRotate,
        MedianNoiseReduction, Saturation, Sharpen,
    };
    use crate::layers::LayerStack;

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        PixelBuffer::from_array(image.as_array().to_owned())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn run<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: Filter,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        Ok(filter.apply(&input).to_array().into_pyarray(py))
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Grayscale with contrast and brightness.
    ///
    /// # Arguments
    /// * `image` - RGBA u8 image, shape (height, width, 4)
    /// * `contrast` - -100 to 100
    /// * `brightness` - -100 to 100
    #[pyfunction]
    #[pyo3(signature = (image, contrast=0.0, brightness=0.0))]
    pub fn black_and_white<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        contrast: f64,
        brightness: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = GrayscaleContrastBrightness::new(contrast, brightness);
        run(py, image, Filter::GrayscaleContrastBrightness(filter))
    }

    /// Separable Gaussian blur, alpha included.
    #[pyfunction]
    #[pyo3(signature = (image, radius=3, sigma=2.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i64,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Filter::GaussianBlur(GaussianBlur::new(radius, sigma)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, degrees=0.0))]
    pub fn hue_rotate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        degrees: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Filter::HueRotate(HueRotate::new(degrees)))
    }

    /// Saturation in percent, 0 to 200 (100 = unchanged).
    #[pyfunction]
    #[pyo3(signature = (image, saturation=100.0))]
    pub fn saturation<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        saturation: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Filter::Saturation(Saturation::new(saturation)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, amount=1.0))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Filter::Sharpen(Sharpen::new(amount)))
    }

    /// Median filter with a (2 * strength + 1) square window.
    #[pyfunction]
    #[pyo3(signature = (image, strength=1.0))]
    pub fn noise_reduction<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        strength: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(
            py,
            image,
            Filter::MedianNoiseReduction(MedianNoiseReduction::new(strength)),
        )
    }

    // ========================================================================
    // Layer Stack
    // ========================================================================

    /// Compose a list of `(filter_id, {param: value})` layers over `image`.
    ///
    /// Missing parameters keep their defaults; values are clamped.
    #[pyfunction]
    pub fn compose<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        layers: Vec<(String, HashMap<String, f64>)>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut stack = LayerStack::new();
        for (id, params) in &layers {
            let kind = id
                .parse::<FilterKind>()
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            let mut filter = Filter::from(kind);
            for (name, value) in params {
                if !filter.set_param(name, *value) {
                    return Err(PyValueError::new_err(format!(
                        "{} has no parameter named {}",
                        id, name
                    )));
                }
            }
            stack.add(&filter);
        }

        let input = to_buffer(image)?;
        Ok(stack.compose(&input).to_array().into_pyarray(py))
    }

    /// Ids of the available filters, in palette order.
    #[pyfunction]
    pub fn filter_ids() -> Vec<&'static str> {
        FilterKind::ALL.iter().map(|kind| kind.id()).collect()
    }

    /// filterstack Rust extension module
    #[pymodule]
    pub fn filterstack(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Filters
        m.add_function(wrap_pyfunction!(black_and_white, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(hue_rotate, m)?)?;
        m.add_function(wrap_pyfunction!(saturation, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(noise_reduction, m)?)?;

        // Layer stack
        m.add_function(wrap_pyfunction!(compose, m)?)?;
        m.add_function(wrap_pyfunction!(filter_ids, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::filterstack;
