// src/processing/stats.rs
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one change raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub mean_change: f64,
    pub max_change: f64,
    pub min_change: f64,
    /// Population standard deviation
    pub std_change: f64,
}

/// Percent of pixels moving past +threshold (gain) and below -threshold (loss)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directional {
    pub gain_percent: f64,
    pub loss_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationStats {
    #[serde(flatten)]
    pub summary: ChangeSummary,
    pub vegetation_gain: f64,
    pub vegetation_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureStats {
    #[serde(flatten)]
    pub summary: ChangeSummary,
    pub moisture_gain: f64,
    pub moisture_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrbanStats {
    #[serde(flatten)]
    pub summary: ChangeSummary,
    pub urban_expansion: f64,
    pub urban_reduction: f64,
}

/// Tier percentages and summary of the normalized change-vector magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CvaStats {
    pub no_change_percent: f64,
    pub moderate_change_percent: f64,
    pub significant_change_percent: f64,
    pub mean_magnitude: f64,
    pub max_magnitude: f64,
}

/// Statistics for every index plus the combined magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeStatistics {
    pub ndvi: VegetationStats,
    pub ndmi: MoistureStats,
    pub ndbi: UrbanStats,
    pub cva: CvaStats,
}

pub fn summarize(change: &Array2<f64>) -> ChangeSummary {
    let n = change.len() as f64;
    let (sum, min, max) = change.iter().fold(
        (0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), &v| (sum + v, min.min(v), max.max(v)),
    );
    let mean = sum / n;
    let variance = change.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;

    ChangeSummary {
        mean_change: mean,
        max_change: max,
        min_change: min,
        std_change: variance.sqrt(),
    }
}

pub fn directional(change: &Array2<f64>, threshold: f64) -> Directional {
    let gain = change.iter().filter(|&&v| v > threshold).count();
    let loss = change.iter().filter(|&&v| v < -threshold).count();
    Directional {
        gain_percent: percent(gain, change.len()),
        loss_percent: percent(loss, change.len()),
    }
}

/// Classify a normalized magnitude raster into no-change / moderate /
/// significant tiers: `< moderate`, `[moderate, significant)`, `>= significant`.
pub fn magnitude_tiers(magnitude: &Array2<f64>, moderate: f64, significant: f64) -> CvaStats {
    let total = magnitude.len();
    let (mut no_change, mut moderate_change, mut significant_change) = (0usize, 0usize, 0usize);
    for &m in magnitude.iter() {
        if m < moderate {
            no_change += 1;
        } else if m < significant {
            moderate_change += 1;
        } else {
            significant_change += 1;
        }
    }

    let summary = summarize(magnitude);
    CvaStats {
        no_change_percent: percent(no_change, total),
        moderate_change_percent: percent(moderate_change, total),
        significant_change_percent: percent(significant_change, total),
        mean_magnitude: summary.mean_change,
        max_magnitude: summary.max_change,
    }
}

#[inline]
fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}
