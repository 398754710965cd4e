//! Samatala command line.
//!
//! Reads an XYZ point cloud, runs segmentation and anomaly flagging, and
//! writes the merged inliers and a JSON report.
//!
//! Usage:
//!   samatala --input road.xyz --output merged.xyz --report report.json
//!   samatala -i road.xyz -o merged.xyz -c configs/samatala.yaml --filter se --seed 7

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use samatala::io::{read_xyz, write_xyz};
use samatala::{Analysis, AnalysisConfig, RansacPlaneFitter, StatisticKind};

/// Road-surface anomaly detection over LiDAR point clouds
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults to configs/samatala.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input point cloud (x y z per line)
    #[arg(short, long)]
    input: PathBuf,

    /// Write merged absolute inliers here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON report here
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Merge the segments accepted by this filter (mean, sd or se) instead
    /// of the default SD selection. Requires --output.
    #[arg(short, long, requires = "output")]
    filter: Option<StatisticKind>,

    /// RANSAC seed (overrides the config; 0 = entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::load_default()?,
    };
    if let Some(seed) = args.seed {
        config.fit.seed = seed;
    }

    log::info!("samatala starting");
    log::info!("  Input: {}", args.input.display());
    log::info!("  Voxel size: {}", config.voxel.size);
    log::info!(
        "  RANSAC: threshold {}, sample {}, {} iterations",
        config.fit.distance_threshold,
        config.fit.sample_size,
        config.fit.iterations
    );
    log::info!("  Scale factor: {}", config.split.scale_factor);
    log::info!("  Flag threshold: {}", config.thresholds.flag);

    let points = read_xyz(&args.input)?;
    let outcome = Analysis::new(&config).run(points, &RansacPlaneFitter::new())?;

    for id in outcome.flagged() {
        if let Some(segment) = outcome.tree().get(*id) {
            let origin = segment.origin();
            log::info!(
                "Anomaly in segment {} at ({:.3}, {:.3}, {:.3})",
                id,
                origin.x,
                origin.y,
                origin.z
            );
        }
    }

    if let Some(path) = &args.report {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &outcome.report())?;
        writer.flush()?;
        log::info!("Report written to {}", path.display());
    }

    if let Some(path) = &args.output {
        let merged = outcome.merged(args.filter)?;
        write_xyz(path, &merged)?;
    }

    log::info!("samatala done");
    Ok(())
}
