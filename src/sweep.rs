//! Sweep orchestration.
//!
//! The complete forward pass: collect trial files per condition, load and
//! evaluate each trial, aggregate by SNR, and assemble the report. Every
//! stage consumes its input; a failure anywhere aborts the run.

use crate::analysis::aggregate_by_snr;
use crate::collector::Collector;
use crate::config::Config;
use crate::loader::load_trial;
use crate::metrics::Evaluator;
use crate::models::{Condition, ConditionSummary, ReportMetadata, SweepReport};
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Run the full sweep over `data_dir` for the selected conditions.
pub fn run_sweep(
    data_dir: &Path,
    conditions: &[Condition],
    config: &Config,
    show_progress: bool,
) -> Result<SweepReport> {
    let start_time = Instant::now();
    let collector = Collector::new(data_dir.to_path_buf());
    let evaluator = Evaluator::new(config);

    let mut summaries = Vec::new();
    let mut files_processed = 0usize;

    for &condition in conditions {
        let files = collector
            .collect(condition)
            .with_context(|| format!("Collecting {} trials", condition))?;

        let progress = make_progress_bar(files.len() as u64, show_progress);

        let mut per_trial = Vec::with_capacity(files.len());
        for file in &files {
            info!("Processing {}", file.name);
            if let Some(ref pb) = progress {
                pb.set_message(file.name.clone());
            }

            let trial = load_trial(file, config.sweep.length_policy)
                .with_context(|| format!("Loading {}", file.name))?;
            let metrics = evaluator
                .evaluate(&trial)
                .with_context(|| format!("Evaluating {}", file.name))?;
            per_trial.push((trial.snr, metrics));

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("{} done", condition));
        }

        files_processed += files.len();
        summaries.push(ConditionSummary {
            condition,
            trials: per_trial.len(),
            snr_conditions: aggregate_by_snr(&per_trial),
        });
    }

    Ok(SweepReport {
        metadata: ReportMetadata {
            data_dir: data_dir.to_path_buf(),
            generated_at: Utc::now(),
            files_processed,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        conditions: summaries,
    })
}

fn make_progress_bar(len: u64, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}
