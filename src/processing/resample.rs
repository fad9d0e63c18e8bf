// src/processing/resample.rs
use ndarray::{Array2, Array3, Axis, Zip};

use crate::error::Result;
use crate::raster::{BandSet, ColorImage};

/// Bilinear resize of a raster to `shape` (rows, cols).
///
/// Pixel centres are aligned (half-pixel offset) and sampling is clamped at
/// the borders, so a same-shape call returns the input unchanged.
pub fn resample_bilinear(src: &Array2<f64>, shape: (usize, usize)) -> Array2<f64> {
    if src.dim() == shape {
        return src.clone();
    }
    if src.is_empty() {
        return Array2::zeros(shape);
    }

    let (src_rows, src_cols) = src.dim();
    let (dst_rows, dst_cols) = shape;
    let scale_y = src_rows as f64 / dst_rows as f64;
    let scale_x = src_cols as f64 / dst_cols as f64;

    let mut out = Array2::<f64>::zeros(shape);
    Zip::indexed(&mut out).par_for_each(|(row, col), value| {
        let y = source_coordinate(row, scale_y, src_rows);
        let x = source_coordinate(col, scale_x, src_cols);
        *value = bilinear(src, y, x);
    });
    out
}

/// Resample every band of `bands` to `shape`
pub fn resample_band_set(bands: &BandSet, shape: (usize, usize)) -> Result<BandSet> {
    bands.map_bands(|band| resample_bilinear(band, shape))
}

/// Resample each channel of an 8-bit image, rounding back to 8 bits
pub fn resample_color_image(image: &ColorImage, shape: (usize, usize)) -> Result<ColorImage> {
    if image.shape() == shape {
        return Ok(image.clone());
    }

    let channels = image.channels();
    let mut out = Array3::<u8>::zeros((shape.0, shape.1, channels));
    for (channel, mut dst) in out.axis_iter_mut(Axis(2)).enumerate() {
        let src = image.data().index_axis(Axis(2), channel).mapv(f64::from);
        let resized = resample_bilinear(&src, shape);
        Zip::from(&mut dst)
            .and(&resized)
            .for_each(|d, &v| *d = v.round().clamp(0.0, 255.0) as u8);
    }
    ColorImage::new(out)
}

#[inline]
fn source_coordinate(dst: usize, scale: f64, src_len: usize) -> f64 {
    let coord = (dst as f64 + 0.5) * scale - 0.5;
    coord.clamp(0.0, (src_len - 1) as f64)
}

#[inline]
fn bilinear(image: &Array2<f64>, y: f64, x: f64) -> f64 {
    let (rows, cols) = image.dim();
    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(rows - 1);
    let x1 = (x0 + 1).min(cols - 1);

    let dy = y - y0 as f64;
    let dx = x - x0 as f64;

    let v00 = image[[y0, x0]];
    let v01 = image[[y0, x1]];
    let v10 = image[[y1, x0]];
    let v11 = image[[y1, x1]];

    (1.0 - dy) * ((1.0 - dx) * v00 + dx * v01) + dy * ((1.0 - dx) * v10 + dx * v11)
}
