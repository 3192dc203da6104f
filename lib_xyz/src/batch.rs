use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::SUMMARY_ERROR_LIMIT;
use crate::convert::{convert_file, Direction};

/// Snapshot handed to the progress callback after each file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub fraction: f64,
    pub remaining: Duration,
}

impl Progress {
    /// Linear estimate: average time per processed file times files left.
    pub fn estimate(processed: usize, total: usize, elapsed: Duration) -> Self {
        let fraction = if total == 0 {
            1.0
        } else {
            processed as f64 / total as f64
        };
        let remaining = if processed == 0 {
            Duration::ZERO
        } else {
            let left = total.saturating_sub(processed) as f64;
            Duration::try_from_secs_f64(elapsed.as_secs_f64() / processed as f64 * left)
                .unwrap_or(Duration::MAX)
        };

        Self {
            processed,
            total,
            fraction,
            remaining,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub output_root: PathBuf,
    pub converted: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn new(output_root: &Path) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.converted.extend(other.converted);
        self.errors.extend(other.errors);
    }

    /// End-of-run text: totals, the first few errors and the output location.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Conversion complete!\n\nTotal files converted: {}",
            self.converted.len()
        );

        if !self.errors.is_empty() {
            let _ = write!(
                summary,
                "\n\nErrors encountered ({}):\n{}",
                self.errors.len(),
                self.errors
                    .iter()
                    .take(SUMMARY_ERROR_LIMIT)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            );
            if self.errors.len() > SUMMARY_ERROR_LIMIT {
                let _ = write!(
                    summary,
                    "\n\n... and {} more errors.",
                    self.errors.len() - SUMMARY_ERROR_LIMIT
                );
            }
        }

        let _ = write!(summary, "\n\nFiles saved to: {}", self.output_root.display());
        summary
    }
}

/// `output_root/<folder name>/<dir of file relative to folder>/<stem>.<target ext>`
pub fn mirrored_output_path(
    folder: &Path,
    file: &Path,
    output_root: &Path,
    direction: Direction,
) -> PathBuf {
    let relative_dir = file
        .strip_prefix(folder)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));

    let mut out = output_root.to_path_buf();
    if let Some(name) = folder_name(folder) {
        out.push(name);
    }
    if !relative_dir.as_os_str().is_empty() {
        out.push(relative_dir);
    }
    out.push(target_file_name(file, direction));
    out
}

/// `output_root/<stem>.<target ext>`
pub fn flat_output_path(file: &Path, output_root: &Path, direction: Direction) -> PathBuf {
    output_root.join(target_file_name(file, direction))
}

fn target_file_name(file: &Path, direction: Direction) -> PathBuf {
    // Appended, not `with_extension`: a stem like "hero.v2" keeps its inner dot.
    let mut name = file.file_stem().unwrap_or(file.as_os_str()).to_os_string();
    name.push(".");
    name.push(direction.target_extension());
    PathBuf::from(name)
}

fn folder_name(folder: &Path) -> Option<PathBuf> {
    folder
        .file_name()
        .map(PathBuf::from)
        .or_else(|| {
            folder
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(PathBuf::from))
        })
}

/// Every file under `folder` the direction can read, in file-name order.
/// Directory entries that can't be read come back as error lines.
pub fn collect_sources(folder: &Path, direction: Direction) -> (Vec<PathBuf>, Vec<String>) {
    let mut sources = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(folder).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() && direction.accepts(entry.path()) => {
                sources.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                let path = e.path().unwrap_or(folder).to_path_buf();
                warn!("Skipping unreadable entry {}: {}", path.display(), e);
                errors.push(format!("Error in {}: {}", path.display(), e));
            }
        }
    }

    (sources, errors)
}

/// Converts every matching file under `folder`, mirroring its layout under
/// `output_root/<folder name>`. A failing file is recorded and skipped.
pub fn convert_folder(
    folder: &Path,
    output_root: &Path,
    direction: Direction,
    mut progress: Option<&mut dyn FnMut(&Progress)>,
) -> BatchReport {
    info!("Processing folder: {}", folder.display());

    let mut report = BatchReport::new(output_root);
    let (sources, walk_errors) = collect_sources(folder, direction);
    report.errors.extend(walk_errors);

    let total = sources.len();
    debug!("{} file(s) to convert", total);
    let start = Instant::now();

    for (i, source) in sources.iter().enumerate() {
        let output = mirrored_output_path(folder, source, output_root, direction);
        let outcome = convert_file(direction, source, &output);

        if outcome.success {
            report.converted.push(output);
        } else {
            let relative = source.strip_prefix(folder).unwrap_or(source);
            report.errors.push(format!(
                "Error in {}: {}",
                relative.display(),
                outcome.error.unwrap_or_default()
            ));
        }

        if let Some(callback) = progress.as_mut() {
            callback(&Progress::estimate(i + 1, total, start.elapsed()));
        }
    }

    info!(
        "Folder done: {} converted, {} failed",
        report.converted.len(),
        report.errors.len()
    );
    report
}

/// Converts individually chosen files straight into `output_root`.
/// Paths without the direction's source extension are skipped.
pub fn convert_files(
    paths: &[PathBuf],
    output_root: &Path,
    direction: Direction,
    mut progress: Option<&mut dyn FnMut(&Progress)>,
) -> BatchReport {
    let mut report = BatchReport::new(output_root);

    let sources: Vec<&PathBuf> = paths
        .iter()
        .filter(|p| {
            let accepted = direction.accepts(p);
            if !accepted {
                warn!("Skipping {}: not a .{} file", p.display(), direction.source_extension());
            }
            accepted
        })
        .collect();

    let total = sources.len();
    let start = Instant::now();

    for (i, source) in sources.into_iter().enumerate() {
        let output = flat_output_path(source, output_root, direction);
        let outcome = convert_file(direction, source, &output);

        if outcome.success {
            report.converted.push(output);
        } else {
            let name = source.file_name().unwrap_or(source.as_os_str());
            report.errors.push(format!(
                "Error in {}: {}",
                name.to_string_lossy(),
                outcome.error.unwrap_or_default()
            ));
        }

        if let Some(callback) = progress.as_mut() {
            callback(&Progress::estimate(i + 1, total, start.elapsed()));
        }
    }

    report
}
