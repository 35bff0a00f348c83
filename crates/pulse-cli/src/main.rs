use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use pulse_lib::{
    analyzer::{analyze_with_config, Analysis},
    config::AnalyzerConfig,
    detectors::peaks::{find_peaks_with_config, PeakDetectorConfig},
    io::recording::{read_recording_csv, write_recording_csv},
    metrics::quality::{evaluate_quality, SignalQuality},
    synth,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pulse", version, about = "Single-lead ECG heart-rate estimation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate heart rate from a Time/ECG CSV, falling back to a synthetic trace
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// TOML file overriding analyzer defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the windowed peak detector on the raw ECG column
    FindPeaks {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 50)]
        min_distance: usize,
        /// Defaults to mean + 0.5 * std of the column
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Write a synthetic Time/ECG CSV
    Synth {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Emit the deterministic sinusoid composite instead
        #[arg(long)]
        fallback: bool,
    },
}

#[derive(Serialize)]
struct AnalyzeReport {
    #[serde(flatten)]
    analysis: Analysis,
    quality: SignalQuality,
    looks_like_ecg: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { input, config } => cmd_analyze(&input, config.as_deref())?,
        Commands::FindPeaks {
            input,
            min_distance,
            threshold,
        } => cmd_find_peaks(&input, min_distance, threshold)?,
        Commands::Synth {
            out,
            seed,
            fallback,
        } => cmd_synth(&out, seed, fallback)?,
    }
    Ok(())
}

fn cmd_analyze(input: &Path, config: Option<&Path>) -> Result<()> {
    let cfg = match config {
        Some(path) => AnalyzerConfig::read(path)?,
        None => AnalyzerConfig::default(),
    };
    let analysis = analyze_with_config(input, &cfg);
    let quality = evaluate_quality(&analysis.amplitudes, &analysis.rr);
    let report = AnalyzeReport {
        looks_like_ecg: quality.looks_like_ecg(),
        analysis,
        quality,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_find_peaks(input: &Path, min_distance: usize, threshold: Option<f64>) -> Result<()> {
    let signal = read_recording_csv(input)?;
    let cfg = PeakDetectorConfig {
        min_distance,
        threshold,
    };
    let events = find_peaks_with_config(&signal.amplitudes, &cfg);
    println!("{}", serde_json::to_string(&events)?);
    Ok(())
}

fn cmd_synth(out: &Path, seed: Option<u64>, fallback: bool) -> Result<()> {
    let generated = match (fallback, seed) {
        (true, _) => synth::fallback(),
        (false, Some(seed)) => synth::primary_seeded(seed),
        (false, None) => synth::primary(),
    };
    write_recording_csv(out, &generated.signal)?;
    info!(
        "wrote {} samples ({} beats) to {}",
        generated.signal.len(),
        generated.peaks.len(),
        out.display()
    );
    Ok(())
}
