use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lib_xyz::{convert_files, convert_folder, BatchReport, Direction, Progress};
use log::info;
use thiserror::Error;

const BAR_LENGTH: usize = 40;

#[derive(Parser)]
#[command(name = "xyz-convert")]
#[command(about = "Convert PNG images to and from the XYZ1 palette format")]
pub struct Cli {
    /// Conversion direction
    #[arg(value_enum)]
    pub mode: Mode,

    /// Files and/or folders to convert; folders are walked recursively
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output root (defaults to PNG2XYZ_Output or XYZ2PNG_Output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log every codec step to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    /// PNG -> XYZ
    ToXyz,
    /// XYZ -> PNG
    ToPng,
}

impl From<Mode> for Direction {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ToXyz => Direction::PngToXyz,
            Mode::ToPng => Direction::XyzToPng,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No such file or folder: {0}")]
    MissingPath(PathBuf),
    #[error("No files selected. Exiting.")]
    NothingToConvert,
}

pub fn run(cli: &Cli) -> Result<BatchReport, CliError> {
    let direction = Direction::from(cli.mode);
    let output_root = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(direction.default_output_folder()));

    if let Some(missing) = cli.paths.iter().find(|p| !p.exists()) {
        return Err(CliError::MissingPath(missing.clone()));
    }

    let (folders, files): (Vec<PathBuf>, Vec<PathBuf>) =
        cli.paths.iter().cloned().partition(|p| p.is_dir());

    if folders.is_empty() && !files.iter().any(|f| direction.accepts(f)) {
        return Err(CliError::NothingToConvert);
    }

    let mut report = BatchReport::new(&output_root);
    let mut show = |p: &Progress| display_progress(p);

    if !files.is_empty() {
        report.merge(convert_files(&files, &output_root, direction, Some(&mut show)));
    }

    for folder in &folders {
        info!("Processing folder: {}", folder.display());
        eprintln!("\nProcessing folder: {}", folder.display());
        report.merge(convert_folder(folder, &output_root, direction, Some(&mut show)));
    }

    Ok(report)
}

fn display_progress(progress: &Progress) {
    let filled = ((BAR_LENGTH as f64 * progress.fraction) as usize).min(BAR_LENGTH);
    let bar = format!("{}{}", "█".repeat(filled), "-".repeat(BAR_LENGTH - filled));

    let secs = progress.remaining.as_secs();
    let eta = if secs > 0 {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    } else {
        "--:--".to_string()
    };

    let mut stderr = io::stderr().lock();
    let _ = write!(
        stderr,
        "\rConverting: [{}] {}/{} ({:.1}%) ETA: {}",
        bar,
        progress.processed,
        progress.total,
        progress.fraction * 100.0,
        eta
    );
    let _ = stderr.flush();
}
