// src/lib.rs
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod processing;
pub mod raster;
pub mod utils;

pub use config::EngineConfig;
pub use error::{ChangeError, Result};
pub use processing::{ChangeDetector, ChangeInput, ChangeResult, DataProvenance};
pub use raster::{Band, BandSet, ColorImage};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
