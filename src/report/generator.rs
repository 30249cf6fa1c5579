//! Report generation.
//!
//! Renders the aggregated sweep as a pretty-printed JSON document (the
//! machine-readable artifact downstream figure scripts consume) and as a
//! Markdown summary with one table per experimental condition.

use crate::cli::OutputFormat;
use crate::metrics::stats;
use crate::models::{ConditionSummary, ReportMetadata, SnrCondition, SweepReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SweepReport) -> String {
    let mut output = String::new();

    output.push_str("# SNR Sweep Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    for condition in &report.conditions {
        output.push_str(&generate_condition_section(condition));
    }

    output.push_str("---\n\n*Generated by snrsweep*\n");
    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SweepReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the report to `out_dir` in the requested format(s).
///
/// Returns the paths written. The directory is created when absent.
pub fn write_report(
    report: &SweepReport,
    out_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();

    if matches!(format, OutputFormat::Json | OutputFormat::Both) {
        let path = out_dir.join("sweep_report.json");
        let content = generate_json_report(report)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        written.push(path);
    }

    if matches!(format, OutputFormat::Markdown | OutputFormat::Both) {
        let path = out_dir.join("sweep_report.md");
        let content = generate_markdown_report(report);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Data Directory:** {}\n",
        metadata.data_dir.display()
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Files Processed:** {}\n",
        metadata.files_processed
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the section for one experimental condition.
fn generate_condition_section(condition: &ConditionSummary) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## {} ({} trials)\n\n",
        condition.condition, condition.trials
    ));

    let has_ergodicity = condition
        .snr_conditions
        .iter()
        .any(|c| !c.ergodicity_mean.is_empty());

    section.push_str(
        "| SNR | Trials | RMS Error | Mean Error | Rel. Exploration | Stationary % | Entropy |",
    );
    if has_ergodicity {
        section.push_str(" Ergodicity |");
    }
    section.push('\n');
    section.push_str("|-----|--------|-----------|------------|------------------|--------------|---------|");
    if has_ergodicity {
        section.push_str("------------|");
    }
    section.push('\n');

    for snr in &condition.snr_conditions {
        section.push_str(&generate_snr_row(snr, has_ergodicity));
    }
    section.push('\n');

    section
}

/// One table row: the across-trial mean of each per-trial metric array.
fn generate_snr_row(snr: &SnrCondition, with_ergodicity: bool) -> String {
    let mut row = format!(
        "| {} | {} | {:.4} | {:.4} | {:.3} | {:.1} | {:.3} |",
        snr.snr,
        snr.trials,
        stats::mean(&snr.error_rms),
        stats::mean(&snr.error_mean),
        stats::mean(&snr.relative_exploration),
        stats::mean(&snr.percent_stationary),
        stats::mean(&snr.entropy_mean),
    );
    if with_ergodicity {
        if snr.ergodicity_mean.is_empty() {
            row.push_str(" - |");
        } else {
            row.push_str(&format!(" {:.4} |", stats::mean(&snr.ergodicity_mean)));
        }
    }
    row.push('\n');
    row
}
