// src/io/writer.rs
use gdal::raster::{Buffer, RasterCreationOptions};
use gdal::{DriverManager, Metadata};
use log::info;
use ndarray::Array2;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::processing::indices::IndexKind;
use crate::processing::ChangeResult;
use crate::utils::fixed_point::{to_fixed_point, validate_scale_factor, FIXED_POINT_NODATA};

use super::reader::GeoInfo;
use super::RASTER_NODATA;

const NODATA_VALUE_FLOAT: f32 = RASTER_NODATA as f32;

/// Write each change raster of `result` as a GeoTIFF next to `output_path`.
///
/// `out.tif` becomes `out_ndvi_change.tif`, `out_ndmi_change.tif`,
/// `out_ndbi_change.tif` and `out_cva_magnitude.tif`.
pub fn write_change_rasters(
    result: &ChangeResult,
    geo_info: Option<&GeoInfo>,
    output_path: &Path,
    use_fixed_point: bool,
    scale_factor: i32,
) -> Result<Vec<PathBuf>> {
    let mut layers: Vec<(String, &Array2<f64>)> = IndexKind::ALL
        .iter()
        .map(|kind| (format!("{}_change", kind.name().to_lowercase()), result.change(*kind)))
        .collect();
    layers.push(("cva_magnitude".to_string(), &result.magnitude));

    let mut written = Vec::with_capacity(layers.len());
    for (suffix, raster) in layers {
        let path = layer_path(output_path, &suffix);
        write_raster(raster, &suffix, geo_info, &path, use_fixed_point, scale_factor, result.provenance.label())?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_raster(
    raster: &Array2<f64>,
    description: &str,
    geo_info: Option<&GeoInfo>,
    output_path: &Path,
    use_fixed_point: bool,
    scale_factor: i32,
    data_source: &str,
) -> Result<()> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let (height, width) = raster.dim();

    let creation_options = RasterCreationOptions::from_iter([
        "COMPRESS=DEFLATE",
        "TILED=YES",
        "NUM_THREADS=ALL_CPUS",
    ]);

    let data: Vec<f64> = raster.iter().copied().collect();

    if use_fixed_point {
        validate_scale_factor(scale_factor)?;
        // Create int16 output
        let mut out_ds = driver.create_with_band_type_with_options::<i16, _>(
            output_path,
            width,
            height,
            1,
            &creation_options,
        )?;

        if let Some(geo_info) = geo_info {
            out_ds.set_projection(&geo_info.projection)?;
            out_ds.set_geo_transform(&geo_info.geo_transform)?;
        }
        out_ds.set_metadata_item("DATA_SOURCE", data_source, "")?;

        let mut band = out_ds.rasterband(1)?;
        band.set_no_data_value(Some(FIXED_POINT_NODATA as f64))?;
        band.set_metadata_item("SCALE", &format!("{}", 1.0 / scale_factor as f64), "")?;
        band.set_metadata_item("OFFSET", "0", "")?;
        band.set_description(&format!("{} (scaled by {})", description, scale_factor))?;

        let fixed_data = to_fixed_point(&data, scale_factor);
        let mut buffer = Buffer::new((width, height), fixed_data);
        band.write((0, 0), (width, height), &mut buffer)?;

        out_ds.flush_cache()?;
    } else {
        // Create float32 output
        let mut out_ds = driver.create_with_band_type_with_options::<f32, _>(
            output_path,
            width,
            height,
            1,
            &creation_options,
        )?;

        if let Some(geo_info) = geo_info {
            out_ds.set_projection(&geo_info.projection)?;
            out_ds.set_geo_transform(&geo_info.geo_transform)?;
        }
        out_ds.set_metadata_item("DATA_SOURCE", data_source, "")?;

        let mut band = out_ds.rasterband(1)?;
        band.set_no_data_value(Some(NODATA_VALUE_FLOAT as f64))?;
        band.set_description(description)?;

        let float_data: Vec<f32> = data
            .iter()
            .map(|&v| if v.is_finite() { v as f32 } else { NODATA_VALUE_FLOAT })
            .collect();
        let mut buffer = Buffer::new((width, height), float_data);
        band.write((0, 0), (width, height), &mut buffer)?;

        out_ds.flush_cache()?;
    }

    info!("Wrote {}", output_path.display());
    Ok(())
}

fn layer_path(output_path: &Path, suffix: &str) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "change".to_string());
    output_path.with_file_name(format!("{}_{}.tif", stem, suffix))
}
