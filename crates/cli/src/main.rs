//! firegrid CLI - wildfire scenario generation from elevation rasters

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use firegrid_algorithms::terrain::{
    aspect, slope, AspectOutput, AspectParams, SlopeParams, SlopeUnits,
};
use firegrid_core::io::write_geotiff;
use firegrid_core::Raster;
use firegrid_scenario::pipeline::{self, ScenarioPaths};
use firegrid_scenario::{CellKey, ScenarioConfig};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "firegrid")]
#[command(author, version, about = "Wildfire scenario generation from elevation rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Calculate slope from DEM
    Slope {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Output units: degrees, percent, radians
        #[arg(short, long, default_value = "degrees")]
        units: String,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate aspect from DEM
    Aspect {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Output format: degrees, radians, compass
        #[arg(short, long, default_value = "degrees")]
        format: String,
    },
    /// Build a simulation scenario (JSON) from a DEM
    Scenario(ScenarioArgs),
}

#[derive(clap::Args)]
struct ScenarioArgs {
    /// Input DEM file; nothing is done when omitted or empty
    input: Option<OsString>,
    /// Cell that starts the fire, as X_Y truncated world coordinates
    #[arg(short, long, value_parser = parse_ignition)]
    ignition: Option<CellKey>,
    /// Sampling interval in pixels
    #[arg(short, long, default_value = "100")]
    stride: usize,
    /// Z-factor for slope
    #[arg(short, long, default_value = "1.0")]
    z_factor: f64,
    /// Fuel model number for every cell
    #[arg(long, default_value = "1")]
    fuel_model: u32,
    /// Wind direction in degrees
    #[arg(long, default_value = "90.0")]
    wind_direction: f64,
    /// Wind speed
    #[arg(long, default_value = "10.0")]
    wind_speed: f64,
    /// Distance between neighboring cells reported to the simulator
    #[arg(long, default_value = "100")]
    vicinity: u32,
    /// Output JSON (default: input with .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ScenarioArgs {
    fn config(&self, ignition: CellKey) -> ScenarioConfig {
        ScenarioConfig {
            stride: self.stride,
            z_factor: self.z_factor,
            vicinity: self.vicinity,
            fuel_model_number: self.fuel_model,
            wind_direction: self.wind_direction,
            wind_speed: self.wind_speed,
            ignition,
            ..Default::default()
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_ignition(s: &str) -> std::result::Result<CellKey, String> {
    s.parse::<CellKey>().map_err(|e| e.to_string())
}

fn read_dem(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster = pipeline::read_dem(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    Ok(raster)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_slope_units(units: &str) -> SlopeUnits {
    match units.to_lowercase().as_str() {
        "degrees" | "deg" | "d" => SlopeUnits::Degrees,
        "percent" | "pct" | "%" => SlopeUnits::Percent,
        "radians" | "rad" | "r" => SlopeUnits::Radians,
        _ => {
            eprintln!("Unknown units: {}. Using degrees.", units);
            SlopeUnits::Degrees
        }
    }
}

fn parse_aspect_format(format: &str) -> AspectOutput {
    match format.to_lowercase().as_str() {
        "degrees" | "deg" | "d" => AspectOutput::Degrees,
        "radians" | "rad" | "r" => AspectOutput::Radians,
        "compass" | "c" => AspectOutput::Compass,
        _ => {
            eprintln!("Unknown format: {}. Using degrees.", format);
            AspectOutput::Degrees
        }
    }
}

fn run_scenario(args: ScenarioArgs) -> Result<()> {
    let input = match args.input.as_deref() {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => {
            info!("No input raster selected, nothing to do");
            return Ok(());
        }
    };

    let ignition = args.ignition.context("--ignition is required with an input raster")?;
    let config = args.config(ignition);
    let paths = ScenarioPaths::for_input(&input).with_output(args.output.clone());
    let start = Instant::now();

    let pb = spinner("Building scenario...");
    let report = pipeline::run(&paths, &config)
        .with_context(|| format!("Failed to build scenario from {}", paths.input.display()))?;
    pb.finish_and_clear();
    info!("Slope: {}", paths.slope.display());
    info!("Aspect: {}", paths.aspect.display());

    let (width, height) = report.shape;
    println!("Grid: {} x {} ({} cells)", width, height, report.cells);
    done("Scenario", &paths.output, start.elapsed());
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let raster = read_dem(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let gt = raster.transform();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Pixel size: {} x {}", gt.pixel_width, gt.pixel_height);
            println!("Origin: ({:.6}, {:.6})", gt.origin_x, gt.origin_y);
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if !gt.is_north_up() {
                println!("Transform is rotated or south-up");
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            if !raster.is_empty() {
                println!(
                    "  Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / raster.len() as f64
                );
            }
        }

        Commands::Slope {
            input,
            output,
            units,
            z_factor,
        } => {
            let units = parse_slope_units(&units);
            let dem = read_dem(&input)?;
            let start = Instant::now();
            let result = slope(&dem, SlopeParams { units, z_factor })
                .context("Failed to calculate slope")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("Slope", &output, elapsed);
        }

        Commands::Aspect {
            input,
            output,
            format,
        } => {
            let params = AspectParams {
                format: parse_aspect_format(&format),
                ..Default::default()
            };
            let dem = read_dem(&input)?;
            let start = Instant::now();
            let result = aspect(&dem, params).context("Failed to calculate aspect")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("Aspect", &output, elapsed);
        }

        Commands::Scenario(args) => run_scenario(args)?,
    }

    Ok(())
}
