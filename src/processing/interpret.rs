// src/processing/interpret.rs
use std::fmt;

use serde::Serialize;

use crate::config::InterpretationThresholds;
use crate::processing::change::ChangeResult;

/// One qualitative statement about a change result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    SimulatedData { warning: String },
    VegetationLoss { percent: f64 },
    VegetationGrowth { percent: f64 },
    UrbanExpansion { percent: f64 },
    MoistureDepletion { percent: f64 },
    MoistureIncrease { percent: f64 },
    MajorChange { percent: f64 },
    ModerateChange { percent: f64 },
    Stable { percent: f64 },
}

impl Finding {
    pub fn title(&self) -> &'static str {
        match self {
            Finding::SimulatedData { .. } => "Simulated Data",
            Finding::VegetationLoss { .. } => "Significant Vegetation Loss",
            Finding::VegetationGrowth { .. } => "Vegetation Growth",
            Finding::UrbanExpansion { .. } => "Urban Expansion Detected",
            Finding::MoistureDepletion { .. } => "Moisture Depletion",
            Finding::MoistureIncrease { .. } => "Moisture Increase",
            Finding::MajorChange { .. } => "Major Environmental Change",
            Finding::ModerateChange { .. } => "Moderate Environmental Change",
            Finding::Stable { .. } => "Stable Environment",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title();
        match self {
            Finding::SimulatedData { warning } => write!(f, "**{}**", warning),
            Finding::VegetationLoss { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows vegetation decline",
                title, percent
            ),
            Finding::VegetationGrowth { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows vegetation increase",
                title, percent
            ),
            Finding::UrbanExpansion { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows urban development",
                title, percent
            ),
            Finding::MoistureDepletion { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows moisture loss (possible drought)",
                title, percent
            ),
            Finding::MoistureIncrease { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows moisture gain",
                title, percent
            ),
            Finding::MajorChange { percent } => write!(
                f,
                "**{}**: {:.2}% of area experienced significant transformation",
                title, percent
            ),
            Finding::ModerateChange { percent } => write!(
                f,
                "**{}**: {:.2}% of area shows moderate changes",
                title, percent
            ),
            Finding::Stable { percent } => write!(
                f,
                "**{}**: {:.2}% of area remains unchanged",
                title, percent
            ),
        }
    }
}

/// Ordered findings for a change result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub findings: Vec<Finding>,
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.findings.is_empty() {
            return f.write_str("No significant changes detected");
        }
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", finding)?;
        }
        Ok(())
    }
}

/// Turn the statistics of `result` into findings.
///
/// Order: data warning, vegetation, urban, moisture, overall. Loss wins
/// over gain within a group; the overall finding is always present.
pub fn interpret(result: &ChangeResult, thresholds: &InterpretationThresholds) -> Interpretation {
    let stats = &result.statistics;
    let mut findings = Vec::new();

    if let Some(warning) = &result.warning {
        findings.push(Finding::SimulatedData {
            warning: warning.clone(),
        });
    }

    if stats.ndvi.vegetation_loss > thresholds.vegetation_loss {
        findings.push(Finding::VegetationLoss {
            percent: stats.ndvi.vegetation_loss,
        });
    } else if stats.ndvi.vegetation_gain > thresholds.vegetation_gain {
        findings.push(Finding::VegetationGrowth {
            percent: stats.ndvi.vegetation_gain,
        });
    }

    if stats.ndbi.urban_expansion > thresholds.urban_expansion {
        findings.push(Finding::UrbanExpansion {
            percent: stats.ndbi.urban_expansion,
        });
    }

    if stats.ndmi.moisture_loss > thresholds.moisture_loss {
        findings.push(Finding::MoistureDepletion {
            percent: stats.ndmi.moisture_loss,
        });
    } else if stats.ndmi.moisture_gain > thresholds.moisture_gain {
        findings.push(Finding::MoistureIncrease {
            percent: stats.ndmi.moisture_gain,
        });
    }

    let cva = &stats.cva;
    findings.push(if cva.significant_change_percent > thresholds.significant_change {
        Finding::MajorChange {
            percent: cva.significant_change_percent,
        }
    } else if cva.moderate_change_percent > thresholds.moderate_change {
        Finding::ModerateChange {
            percent: cva.moderate_change_percent,
        }
    } else {
        Finding::Stable {
            percent: cva.no_change_percent,
        }
    });

    Interpretation { findings }
}
