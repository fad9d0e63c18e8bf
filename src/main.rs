// src/main.rs
use anyhow::Result;
use clap::Parser;
use log::info;

use spectral_change::batch::{process_batch, run_demo, run_detect, run_index, OutputOptions};
use spectral_change::cli::{Cli, Commands};
use spectral_change::{ChangeDetector, EngineConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let threads = cli.threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    info!("spectral-change {} using {} threads", spectral_change::VERSION, threads);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let detector = ChangeDetector::new(config)?;
    let options = OutputOptions::new(!cli.float, cli.scale_factor)?;

    match &cli.command {
        Commands::Detect { before, after } => {
            run_detect(&detector, before, after, &cli.output, options)?;
        }
        #[cfg(feature = "gdal")]
        Commands::DetectRasters {
            t1_nir,
            t1_red,
            t1_swir,
            t2_nir,
            t2_red,
            t2_swir,
        } => {
            use spectral_change::io;

            let (before, geo_info) = io::read_band_set(t1_nir, t1_red, t1_swir)?;
            let (after, _) = io::read_band_set(t2_nir, t2_red, t2_swir)?;
            let result = detector.detect_changes(&before, &after)?;
            let interpretation = detector.interpret(&result);
            if io::is_json(&cli.output) {
                io::write_report(&result, &interpretation, &cli.output)?;
            } else {
                io::write_change_rasters(
                    &result,
                    Some(&geo_info),
                    &cli.output,
                    options.use_fixed_point,
                    options.scale_factor,
                )?;
            }
            println!("{}", interpretation);
        }
        Commands::Demo { before, after } => {
            run_demo(&detector, before, after, &cli.output, options)?;
        }
        Commands::Index { kind, bands } => {
            run_index(*kind, bands, &cli.output)?;
        }
        Commands::Batch { file } => {
            let outputs = process_batch(file)?;
            println!("Batch complete: {} output(s)", outputs.len());
            return Ok(());
        }
    }

    println!("Processing complete: {}", cli.output.display());
    Ok(())
}
