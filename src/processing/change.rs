// src/processing/change.rs
use itertools::Itertools;
use log::{debug, warn};
use ndarray::{Array2, Zip};
use serde::{Serialize, Serializer};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::processing::indices::{compute_index, IndexKind};
use crate::processing::interpret::{interpret, Interpretation};
use crate::processing::resample::{resample_band_set, resample_color_image};
use crate::processing::simulate::simulate_bands_from_color_image;
use crate::processing::stats::{
    directional, magnitude_tiers, summarize, ChangeStatistics, MoistureStats, UrbanStats,
    VegetationStats,
};
use crate::raster::{BandSet, ColorImage};

pub const SIMULATED_WARNING: &str =
    "Results use simulated bands and may not be scientifically accurate";

/// Where the bands behind a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvenance {
    RealBands,
    SimulatedFromColor,
}

impl DataProvenance {
    pub fn label(&self) -> &'static str {
        match self {
            DataProvenance::RealBands => "Real Satellite Bands (Landsat/Sentinel)",
            DataProvenance::SimulatedFromColor => "Simulated Bands (Demo Mode - NOT ACCURATE)",
        }
    }

    pub fn bands_used(&self) -> &'static str {
        match self {
            DataProvenance::RealBands => "NIR, Red, SWIR (multispectral)",
            DataProvenance::SimulatedFromColor => "RGB-derived (not real multispectral)",
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, DataProvenance::SimulatedFromColor)
    }
}

impl Serialize for DataProvenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The two acquisitions to compare, tagged by how their bands were obtained
#[derive(Debug, Clone)]
pub enum ChangeInput {
    RealBands { before: BandSet, after: BandSet },
    SimulatedFromColor { before: ColorImage, after: ColorImage },
}

/// Output of one change detection run.
///
/// All rasters share the shape of the earlier acquisition.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeResult {
    #[serde(serialize_with = "serialize_raster")]
    pub ndvi_change: Array2<f64>,
    #[serde(serialize_with = "serialize_raster")]
    pub ndmi_change: Array2<f64>,
    #[serde(serialize_with = "serialize_raster")]
    pub ndbi_change: Array2<f64>,
    /// Change-vector magnitude, min-max normalized over this scene
    #[serde(rename = "cva_magnitude", serialize_with = "serialize_raster")]
    pub magnitude: Array2<f64>,
    pub statistics: ChangeStatistics,
    #[serde(rename = "data_source")]
    pub provenance: DataProvenance,
    pub bands_used: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ChangeResult {
    pub fn shape(&self) -> (usize, usize) {
        self.magnitude.dim()
    }

    pub fn change(&self, kind: IndexKind) -> &Array2<f64> {
        match kind {
            IndexKind::Ndvi => &self.ndvi_change,
            IndexKind::Ndmi => &self.ndmi_change,
            IndexKind::Ndbi => &self.ndbi_change,
        }
    }

    fn mark_simulated(mut self) -> Self {
        self.provenance = DataProvenance::SimulatedFromColor;
        self.bands_used = DataProvenance::SimulatedFromColor.bands_used();
        self.warning = Some(SIMULATED_WARNING.to_string());
        self
    }
}

/// Rasters as nested row arrays
fn serialize_raster<S: Serializer>(raster: &Array2<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(raster.outer_iter().map(|row| row.to_vec()))
}

/// Change detection between two acquisitions of the same footprint.
///
/// Holds only its thresholds; every call is a pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    config: EngineConfig,
}

impl ChangeDetector {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run(&self, input: &ChangeInput) -> Result<ChangeResult> {
        match input {
            ChangeInput::RealBands { before, after } => self.detect_changes(before, after),
            ChangeInput::SimulatedFromColor { before, after } => {
                self.detect_changes_from_color_images(before, after)
            }
        }
    }

    /// Compare two real multispectral band sets.
    ///
    /// `after` is resampled to the shape of `before` when they differ.
    pub fn detect_changes(&self, before: &BandSet, after: &BandSet) -> Result<ChangeResult> {
        let shape = before.shape();
        let resampled;
        let after = if after.shape() != shape {
            debug!("Resampling later bands from {:?} to {:?}", after.shape(), shape);
            resampled = resample_band_set(after, shape)?;
            &resampled
        } else {
            after
        };

        let ndvi_change = self.index_change(IndexKind::Ndvi, before, after)?;
        let ndmi_change = self.index_change(IndexKind::Ndmi, before, after)?;
        let ndbi_change = self.index_change(IndexKind::Ndbi, before, after)?;

        let magnitude = self.normalized_magnitude(&ndvi_change, &ndmi_change, &ndbi_change);
        let statistics = self.statistics(&ndvi_change, &ndmi_change, &ndbi_change, &magnitude);
        debug!(
            "Change detection on {}x{} pixels: {:.2}% significant",
            shape.0, shape.1, statistics.cva.significant_change_percent
        );

        Ok(ChangeResult {
            ndvi_change,
            ndmi_change,
            ndbi_change,
            magnitude,
            statistics,
            provenance: DataProvenance::RealBands,
            bands_used: DataProvenance::RealBands.bands_used(),
            warning: None,
        })
    }

    /// Demo path: simulate NIR and SWIR from two color images, then compare.
    ///
    /// The result is tagged as simulated and carries a warning.
    pub fn detect_changes_from_color_images(
        &self,
        before: &ColorImage,
        after: &ColorImage,
    ) -> Result<ChangeResult> {
        warn!("Running change detection on simulated bands; results are not scientifically accurate");

        let resampled;
        let after = if after.shape() != before.shape() {
            debug!("Resampling later image from {:?} to {:?}", after.shape(), before.shape());
            resampled = resample_color_image(after, before.shape())?;
            &resampled
        } else {
            after
        };

        let bands_before = simulate_bands_from_color_image(before)?;
        let bands_after = simulate_bands_from_color_image(after)?;

        Ok(self.detect_changes(&bands_before, &bands_after)?.mark_simulated())
    }

    pub fn interpret(&self, result: &ChangeResult) -> Interpretation {
        interpret(result, &self.config.interpretation)
    }

    fn index_change(&self, kind: IndexKind, before: &BandSet, after: &BandSet) -> Result<Array2<f64>> {
        let (a, b) = kind.bands();
        let index_before = compute_index(kind, before.require(a)?, before.require(b)?)?;
        let index_after = compute_index(kind, after.require(a)?, after.require(b)?)?;
        Ok(index_after - index_before)
    }

    /// Euclidean norm of the three index changes, rescaled to [0, 1]
    fn normalized_magnitude(
        &self,
        ndvi: &Array2<f64>,
        ndmi: &Array2<f64>,
        ndbi: &Array2<f64>,
    ) -> Array2<f64> {
        let magnitude = Zip::from(ndvi)
            .and(ndmi)
            .and(ndbi)
            .par_map_collect(|&v, &m, &b| (v * v + m * m + b * b).sqrt());

        let (min, max) = magnitude.iter().copied().minmax().into_option().unwrap_or((0.0, 0.0));
        let range = max - min + self.config.normalization_epsilon;

        magnitude.mapv_into(|m| (m - min) / range)
    }

    fn statistics(
        &self,
        ndvi: &Array2<f64>,
        ndmi: &Array2<f64>,
        ndbi: &Array2<f64>,
        magnitude: &Array2<f64>,
    ) -> ChangeStatistics {
        let threshold = self.config.change_threshold;
        let [(ndvi_summary, ndvi_dir), (ndmi_summary, ndmi_dir), (ndbi_summary, ndbi_dir)] =
            [ndvi, ndmi, ndbi].map(|change| (summarize(change), directional(change, threshold)));

        ChangeStatistics {
            ndvi: VegetationStats {
                summary: ndvi_summary,
                vegetation_gain: ndvi_dir.gain_percent,
                vegetation_loss: ndvi_dir.loss_percent,
            },
            ndmi: MoistureStats {
                summary: ndmi_summary,
                moisture_gain: ndmi_dir.gain_percent,
                moisture_loss: ndmi_dir.loss_percent,
            },
            ndbi: UrbanStats {
                summary: ndbi_summary,
                urban_expansion: ndbi_dir.gain_percent,
                urban_reduction: ndbi_dir.loss_percent,
            },
            cva: magnitude_tiers(
                magnitude,
                self.config.moderate_cutoff,
                self.config.significant_cutoff,
            ),
        }
    }
}
