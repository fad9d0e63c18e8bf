// src/io/json.rs
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use log::info;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::{ChangeError, Result};
use crate::processing::{ChangeResult, Interpretation};
use crate::raster::{BandSet, ColorImage};

/// Color image on disk: rows of `[r, g, b]` pixels, or rows of gray values
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ImageFile {
    Gray(Vec<Vec<u8>>),
    Color(Vec<Vec<Vec<u8>>>),
}

/// Report written for a change detection run
#[derive(Serialize, Debug)]
pub struct ChangeReport<'a> {
    pub version: &'static str,
    #[serde(flatten)]
    pub result: &'a ChangeResult,
    pub interpretation: &'a Interpretation,
    pub summary: String,
}

/// Read a band set from a JSON object of band name -> rows of samples.
///
/// `nir`, `red` and `swir` are required; `green` and `blue` are optional.
pub fn load_band_set<P: AsRef<Path>>(path: P) -> Result<BandSet> {
    let path = path.as_ref();
    info!("Reading band set from: {}", path.display());

    let content = fs::read_to_string(path)?;
    let raw: HashMap<String, Vec<Vec<f64>>> = serde_json::from_str(&content)?;

    let mut bands = HashMap::with_capacity(raw.len());
    for (name, rows) in raw {
        let grid = rows_to_array(&name, rows)?;
        bands.insert(name, grid);
    }
    BandSet::from_map(bands)
}

/// Read an 8-bit color (or grayscale) image from JSON
pub fn load_color_image_json<P: AsRef<Path>>(path: P) -> Result<ColorImage> {
    let path = path.as_ref();
    info!("Reading color image from: {}", path.display());

    let content = fs::read_to_string(path)?;
    let name = path.display().to_string();
    match serde_json::from_str::<ImageFile>(&content)? {
        ImageFile::Gray(rows) => ColorImage::from_gray(rows_to_array(&name, rows)?),
        ImageFile::Color(rows) => {
            let height = rows.len();
            let width = rows.first().map_or(0, Vec::len);
            let channels = rows.first().and_then(|r| r.first()).map_or(0, Vec::len);

            let mut data = Vec::with_capacity(height * width * channels);
            for (y, row) in rows.into_iter().enumerate() {
                if row.len() != width {
                    return Err(malformed(&name, format!("row {} has {} pixels, expected {}", y, row.len(), width)));
                }
                for pixel in row {
                    if pixel.len() != channels {
                        return Err(malformed(&name, format!("row {} mixes channel counts", y)));
                    }
                    data.extend(pixel);
                }
            }
            let data = Array3::from_shape_vec((height, width, channels), data)
                .map_err(|e| malformed(&name, e.to_string()))?;
            ColorImage::new(data)
        }
    }
}

/// Write the full result (rasters, statistics, findings) as pretty JSON
pub fn write_report<P: AsRef<Path>>(
    result: &ChangeResult,
    interpretation: &Interpretation,
    output_path: P,
) -> Result<()> {
    let report = ChangeReport {
        version: crate::VERSION,
        result,
        interpretation,
        summary: interpretation.to_string(),
    };
    write_json(&report, output_path)
}

/// Write a single raster as rows of values
pub fn write_raster_json<P: AsRef<Path>>(name: &str, raster: &Array2<f64>, output_path: P) -> Result<()> {
    #[derive(Serialize)]
    struct RasterFile<'a> {
        name: &'a str,
        rows: usize,
        cols: usize,
        data: Vec<Vec<f64>>,
    }

    let (rows, cols) = raster.dim();
    let file = RasterFile {
        name,
        rows,
        cols,
        data: raster.outer_iter().map(|row| row.to_vec()).collect(),
    };
    write_json(&file, output_path)
}

fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, value)?;
    info!("Wrote {}", output_path.display());
    Ok(())
}

fn rows_to_array<T: Clone>(name: &str, rows: Vec<Vec<T>>) -> Result<Array2<T>> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(malformed(name, format!("row {} has {} values, expected {}", y, row.len(), width)));
    }

    let data: Vec<T> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), data).map_err(|e| malformed(name, e.to_string()))
}

fn malformed(name: &str, reason: String) -> ChangeError {
    ChangeError::Malformed {
        name: name.to_string(),
        reason,
    }
}
