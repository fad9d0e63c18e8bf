use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::processing::indices::IndexKind;

#[derive(Parser)]
#[command(name = "spectral-change")]
#[command(about = "Multi-temporal change detection from NDVI, NDMI and NDBI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output file path (.json report, or .tif stem with the gdal feature)
    #[arg(short, long, default_value = "change.json", global = true)]
    pub output: PathBuf,

    /// Engine thresholds as JSON (defaults apply to missing fields)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Worker threads for pixel processing (default: all CPUs)
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Use float32 instead of int16 for raster outputs
    #[arg(long, global = true)]
    pub float: bool,

    /// Scaling factor for fixed-point raster outputs
    #[arg(long, default_value = "10000", global = true)]
    pub scale_factor: i32,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two multispectral band sets (JSON: {"nir": [[..]], "red": .., "swir": ..})
    Detect {
        /// Earlier acquisition (T1)
        #[arg(short = 'a', long)]
        before: PathBuf,

        /// Later acquisition (T2)
        #[arg(short = 'b', long)]
        after: PathBuf,
    },

    /// Compare two GeoTIFF acquisitions, one file per band
    #[cfg(feature = "gdal")]
    DetectRasters {
        /// T1 near-infrared band
        #[arg(long)]
        t1_nir: PathBuf,

        /// T1 red band
        #[arg(long)]
        t1_red: PathBuf,

        /// T1 short-wave infrared band
        #[arg(long)]
        t1_swir: PathBuf,

        /// T2 near-infrared band
        #[arg(long)]
        t2_nir: PathBuf,

        /// T2 red band
        #[arg(long)]
        t2_red: PathBuf,

        /// T2 short-wave infrared band
        #[arg(long)]
        t2_swir: PathBuf,
    },

    /// Demo mode: simulate NIR/SWIR from two color images (NOT scientifically accurate)
    Demo {
        /// Earlier color image (T1)
        #[arg(short = 'a', long)]
        before: PathBuf,

        /// Later color image (T2)
        #[arg(short = 'b', long)]
        after: PathBuf,
    },

    /// Compute a single index from one band set
    Index {
        /// Index to compute
        #[arg(short, long, value_enum)]
        kind: IndexKind,

        /// Band set (JSON)
        #[arg(short, long)]
        bands: PathBuf,
    },

    /// Run the operations listed in a JSON batch file
    Batch {
        /// Batch file
        file: PathBuf,
    },
}
