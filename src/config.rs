// src/config.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChangeError, Result};

/// Thresholds used by the change detection engine.
///
/// Defaults reproduce the dashboard's behaviour exactly. They are empirical
/// constants, exposed here so they can be tuned without code changes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Per-index change beyond +/- this value counts as gain / loss
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,
    /// Normalized magnitude below this is "no change"
    #[serde(default = "default_moderate_cutoff")]
    pub moderate_cutoff: f64,
    /// Normalized magnitude at or above this is "significant"
    #[serde(default = "default_significant_cutoff")]
    pub significant_cutoff: f64,
    #[serde(default = "default_normalization_epsilon")]
    pub normalization_epsilon: f64,
    #[serde(default)]
    pub interpretation: InterpretationThresholds,
}

fn default_change_threshold() -> f64 {
    0.1
}

fn default_moderate_cutoff() -> f64 {
    0.2
}

fn default_significant_cutoff() -> f64 {
    0.5
}

fn default_normalization_epsilon() -> f64 {
    1e-8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            change_threshold: default_change_threshold(),
            moderate_cutoff: default_moderate_cutoff(),
            significant_cutoff: default_significant_cutoff(),
            normalization_epsilon: default_normalization_epsilon(),
            interpretation: InterpretationThresholds::default(),
        }
    }
}

/// Percent-of-area cut points for the qualitative summary
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct InterpretationThresholds {
    #[serde(default = "default_vegetation")]
    pub vegetation_loss: f64,
    #[serde(default = "default_vegetation")]
    pub vegetation_gain: f64,
    #[serde(default = "default_urban_expansion")]
    pub urban_expansion: f64,
    #[serde(default = "default_moisture")]
    pub moisture_loss: f64,
    #[serde(default = "default_moisture")]
    pub moisture_gain: f64,
    #[serde(default = "default_significant_change")]
    pub significant_change: f64,
    #[serde(default = "default_moderate_change")]
    pub moderate_change: f64,
}

fn default_vegetation() -> f64 {
    10.0
}

fn default_urban_expansion() -> f64 {
    5.0
}

fn default_moisture() -> f64 {
    15.0
}

fn default_significant_change() -> f64 {
    20.0
}

fn default_moderate_change() -> f64 {
    30.0
}

impl Default for InterpretationThresholds {
    fn default() -> Self {
        Self {
            vegetation_loss: default_vegetation(),
            vegetation_gain: default_vegetation(),
            urban_expansion: default_urban_expansion(),
            moisture_loss: default_moisture(),
            moisture_gain: default_moisture(),
            significant_change: default_significant_change(),
            moderate_change: default_moderate_change(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("change_threshold", self.change_threshold),
            ("moderate_cutoff", self.moderate_cutoff),
            ("significant_cutoff", self.significant_cutoff),
            ("normalization_epsilon", self.normalization_epsilon),
            ("interpretation.vegetation_loss", self.interpretation.vegetation_loss),
            ("interpretation.vegetation_gain", self.interpretation.vegetation_gain),
            ("interpretation.urban_expansion", self.interpretation.urban_expansion),
            ("interpretation.moisture_loss", self.interpretation.moisture_loss),
            ("interpretation.moisture_gain", self.interpretation.moisture_gain),
            ("interpretation.significant_change", self.interpretation.significant_change),
            ("interpretation.moderate_change", self.interpretation.moderate_change),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ChangeError::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if self.normalization_epsilon <= 0.0 {
            return Err(ChangeError::Config(
                "normalization_epsilon must be greater than zero".to_string(),
            ));
        }
        if self.moderate_cutoff >= self.significant_cutoff || self.significant_cutoff > 1.0 {
            return Err(ChangeError::Config(format!(
                "magnitude cut points must satisfy 0 <= moderate < significant <= 1 (got {} / {})",
                self.moderate_cutoff, self.significant_cutoff
            )));
        }
        Ok(())
    }
}
