// src/processing/mod.rs
pub mod change;
pub mod indices;
pub mod interpret;
pub mod resample;
pub mod simulate;
pub mod stats;

// Re-export main components
pub use change::{ChangeDetector, ChangeInput, ChangeResult, DataProvenance};
pub use interpret::{Finding, Interpretation};
pub use simulate::simulate_bands_from_color_image;
