// src/processing/simulate.rs
use ndarray::{Array2, ArrayView2};

use crate::error::Result;
use crate::raster::{BandSet, ColorImage};

// Linear stand-ins for the infrared bands of an RGB image. Demo data only.
const NIR_GREEN_GAIN: f64 = 1.2;
const NIR_OFFSET: f64 = 20.0;
const SWIR_RED_GAIN: f64 = 0.8;
const SWIR_BLUE_GAIN: f64 = 0.3;

/// Approximate a multispectral band set from an 8-bit color image.
///
/// `nir = clip(1.2 * green + 20, 0, 255)` and
/// `swir = clip(0.8 * red + 0.3 * blue, 0, 255)`, both truncated to 8 bits.
/// The visible channels are carried through as red, green and blue.
pub fn simulate_bands_from_color_image(image: &ColorImage) -> Result<BandSet> {
    let red = image.red();
    let green = image.green();
    let blue = image.blue();

    let nir = green.mapv(|g| quantize(NIR_GREEN_GAIN * f64::from(g) + NIR_OFFSET));
    let swir = ndarray::Zip::from(&red)
        .and(&blue)
        .map_collect(|&r, &b| quantize(SWIR_RED_GAIN * f64::from(r) + SWIR_BLUE_GAIN * f64::from(b)));

    BandSet::new(nir, widen(red), swir)?
        .with_green(widen(green))?
        .with_blue(widen(blue))
}

/// Clip to the 8-bit range and drop the fraction, as an 8-bit cast does
#[inline]
fn quantize(value: f64) -> f64 {
    value.clamp(0.0, 255.0).trunc()
}

fn widen(channel: ArrayView2<'_, u8>) -> Array2<f64> {
    channel.mapv(f64::from)
}
