// src/batch.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::io;
use crate::processing::indices::{IndexCalculator, IndexKind};
use crate::processing::{ChangeDetector, ChangeResult};
use crate::utils::fixed_point::validate_scale_factor;

#[derive(Deserialize, Serialize, Debug)]
pub struct BatchConfig {
    #[serde(default)]
    pub global: GlobalParams,
    pub operations: Vec<Operation>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GlobalParams {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub float: bool,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: i32,
}

fn default_scale_factor() -> i32 {
    10000
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            float: false,
            scale_factor: default_scale_factor(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Operation {
    #[serde(rename = "type")]
    pub op_type: String,
    pub params: OperationParams,
    pub output: String,
    pub config: Option<EngineConfig>,
    pub float: Option<bool>,
    pub scale_factor: Option<i32>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum OperationParams {
    PairParams { before: String, after: String },
    IndexParams { kind: IndexKind, bands: String },
}

/// How results are written to disk
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub use_fixed_point: bool,
    pub scale_factor: i32,
}

impl OutputOptions {
    /// Rejects a non-positive `scale_factor`
    pub fn new(use_fixed_point: bool, scale_factor: i32) -> crate::error::Result<Self> {
        validate_scale_factor(scale_factor)?;
        Ok(Self { use_fixed_point, scale_factor })
    }
}

/// Detect changes between two JSON band sets and write the report
pub fn run_detect(detector: &ChangeDetector, before: &Path, after: &Path, output: &Path, options: OutputOptions) -> Result<()> {
    let before = io::load_band_set(before)?;
    let after = io::load_band_set(after)?;
    let result = detector.detect_changes(&before, &after)?;
    emit(detector, &result, output, options)
}

/// Demo-mode detection from two color images
pub fn run_demo(detector: &ChangeDetector, before: &Path, after: &Path, output: &Path, options: OutputOptions) -> Result<()> {
    let before = io::load_color_image(before)?;
    let after = io::load_color_image(after)?;
    let result = detector.detect_changes_from_color_images(&before, &after)?;
    emit(detector, &result, output, options)
}

/// Compute one index from a JSON band set.
///
/// Degenerate pixels are zero-filled in JSON and nodata in rasters.
pub fn run_index(kind: IndexKind, bands: &Path, output: &Path) -> Result<()> {
    let bands = io::load_band_set(bands)?;
    let calculator = kind.calculator().with_policy(io::index_policy(output));
    let index = calculator.calculate(&bands)?;

    if io::is_json(output) {
        io::write_raster_json(calculator.name(), &index, output)?;
        return Ok(());
    }

    #[cfg(feature = "gdal")]
    {
        io::writer::write_raster(
            &index,
            calculator.name(),
            None,
            output,
            false,
            1,
            crate::processing::DataProvenance::RealBands.label(),
        )?;
        Ok(())
    }
    #[cfg(not(feature = "gdal"))]
    {
        Err(unsupported_output(output).into())
    }
}

/// Write a result: a JSON report, or GeoTIFF layers when built with GDAL
pub fn emit(detector: &ChangeDetector, result: &ChangeResult, output: &Path, options: OutputOptions) -> Result<()> {
    let interpretation = detector.interpret(result);
    if let Some(warning) = &result.warning {
        warn!("{}", warning);
    }

    if io::is_json(output) {
        io::write_report(result, &interpretation, output)?;
        return Ok(());
    }

    #[cfg(feature = "gdal")]
    {
        io::write_change_rasters(result, None, output, options.use_fixed_point, options.scale_factor)?;
        info!("{}", interpretation);
        Ok(())
    }
    #[cfg(not(feature = "gdal"))]
    {
        let _ = options;
        Err(unsupported_output(output).into())
    }
}

#[cfg(not(feature = "gdal"))]
fn unsupported_output(output: &Path) -> crate::error::ChangeError {
    crate::error::ChangeError::UnsupportedFormat(format!(
        "{} (only .json output is supported without the gdal feature)",
        output.display()
    ))
}

fn run_operation(op: &Operation, global: &GlobalParams) -> Result<PathBuf> {
    let config = op.config.clone().unwrap_or_else(|| global.config.clone());
    let detector = ChangeDetector::new(config)?;
    let options = OutputOptions::new(
        !op.float.unwrap_or(global.float),
        op.scale_factor.unwrap_or(global.scale_factor),
    )?;
    let output = PathBuf::from(&op.output);

    match (op.op_type.to_lowercase().as_str(), &op.params) {
        ("detect", OperationParams::PairParams { before, after }) => {
            run_detect(&detector, Path::new(before), Path::new(after), &output, options)?
        }
        ("demo", OperationParams::PairParams { before, after }) => {
            run_demo(&detector, Path::new(before), Path::new(after), &output, options)?
        }
        ("index", OperationParams::IndexParams { kind, bands }) => {
            run_index(*kind, Path::new(bands), &output)?
        }
        ("detect" | "demo" | "index", _) => {
            return Err(anyhow::anyhow!("Invalid parameters for {} operation", op.op_type))
        }
        _ => return Err(anyhow::anyhow!("Unknown operation type: {}", op.op_type)),
    }
    Ok(output)
}

/// Run every operation of a batch file in parallel.
///
/// All operations are attempted; the batch fails if any of them failed.
pub fn process_batch(config_path: &Path) -> Result<Vec<PathBuf>> {
    // Read and parse configuration file
    let config_content = fs::read_to_string(config_path)?;
    let config: BatchConfig = serde_json::from_str(&config_content)?;
    config.global.config.validate()?;
    validate_scale_factor(config.global.scale_factor)?;

    let total = config.operations.len();
    info!("Starting batch processing with {} operations...", total);

    let mut outputs = Vec::with_capacity(total);
    let mut failures = 0usize;

    std::thread::scope(|scope| {
        let (tx, rx) = flume::unbounded::<(usize, Result<PathBuf>)>();
        let operations = &config.operations;
        let global = &config.global;

        scope.spawn(move || {
            operations
                .par_iter()
                .enumerate()
                .for_each_with(tx, |tx, (i, op)| {
                    let _ = tx.send((i, run_operation(op, global)));
                });
        });

        for (done, (i, outcome)) in rx.iter().enumerate() {
            let op = &operations[i];
            match outcome {
                Ok(path) => {
                    info!("[{}/{}] {} -> {}", done + 1, total, op.op_type, path.display());
                    outputs.push(path);
                }
                Err(e) => {
                    error!("[{}/{}] {} -> {} failed: {:#}", done + 1, total, op.op_type, op.output, e);
                    failures += 1;
                }
            }
        }
    });

    if failures > 0 {
        return Err(anyhow::anyhow!("{} of {} batch operations failed", failures, total));
    }

    info!("Batch processing complete!");
    Ok(outputs)
}
