//! Trial-file collector.
//!
//! Walks the data directory and gathers the result records belonging to
//! one experimental condition. The simulation names its output after the
//! run parameters, e.g. `EIH-SNR-30-RandSeed-1.json`, so the condition tag
//! and the SNR value are both recoverable from the filename alone.

use crate::error::SweepError;
use crate::models::Condition;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One discovered trial record, not yet loaded.
#[derive(Debug, Clone)]
pub struct TrialFile {
    /// Absolute path to the record.
    pub path: PathBuf,
    /// File name, for progress lines.
    pub name: String,
    /// Condition tag found in the name.
    pub condition: Condition,
    /// SNR value parsed from the `SNR-<value>` name segment, when present.
    /// The record's own `SNR` field stays authoritative; this is used to
    /// cross-check the two at load time.
    pub snr_tag: Option<f64>,
}

/// Collects trial records for one condition under a data directory.
pub struct Collector {
    data_dir: PathBuf,
}

impl Collector {
    /// Create a collector rooted at `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Collect all records tagged with `condition`, sorted by file name.
    ///
    /// Fails with [`SweepError::MissingData`] when nothing matches: an
    /// empty condition means the sweep being reproduced was never run,
    /// and aggregating nothing would silently produce an empty figure.
    pub fn collect(&self, condition: Condition) -> Result<Vec<TrialFile>, SweepError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.data_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            if name.starts_with('.') || !name.contains(condition.tag()) {
                continue;
            }

            let snr_tag = parse_snr_tag(path);
            debug!("Matched {} (SNR tag: {:?})", name, snr_tag);

            files.push(TrialFile {
                path: path.to_path_buf(),
                name,
                condition,
                snr_tag,
            });
        }

        if files.is_empty() {
            return Err(SweepError::MissingData {
                dir: self.data_dir.clone(),
                pattern: condition.tag().to_string(),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

/// Parse the SNR value out of a `SNR-<value>` filename segment.
fn parse_snr_tag(path: &Path) -> Option<f64> {
    let stem = path.file_stem()?.to_str()?;
    let mut segments = stem.split('-');
    while let Some(segment) = segments.next() {
        if segment == "SNR" {
            return segments.next()?.parse().ok();
        }
    }
    None
}
