//! Trial record loading and validation.
//!
//! Records are JSON objects written by the simulation, one per trial,
//! with the field names the simulation uses: `SNR`, `sTrajList`,
//! `oTrajList`, `dt`, `pB`, and optionally `enpList` and `ergList`.
//! Every required field is checked explicitly so a truncated or
//! hand-edited record fails with the name of the missing field instead
//! of a generic parse error downstream.

use crate::collector::TrialFile;
use crate::config::LengthPolicy;
use crate::error::SweepError;
use crate::models::{Belief, Trial};
use serde::Deserialize;
use tracing::warn;

/// On-disk shape of one trial record. All fields optional at this layer;
/// [`load_trial`] turns absences into [`SweepError::MissingField`].
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "SNR")]
    snr: Option<f64>,
    #[serde(rename = "sTrajList")]
    sensor_traj: Option<Vec<f64>>,
    #[serde(rename = "oTrajList")]
    target_traj: Option<Vec<f64>>,
    dt: Option<f64>,
    #[serde(rename = "pB")]
    belief: Option<Belief>,
    #[serde(rename = "enpList")]
    entropy_list: Option<Vec<f64>>,
    #[serde(rename = "ergList")]
    ergodicity_list: Option<Vec<f64>>,
}

/// Load and validate one trial record.
pub fn load_trial(file: &TrialFile, policy: LengthPolicy) -> Result<Trial, SweepError> {
    let content = std::fs::read_to_string(&file.path)?;
    let raw: RawRecord = serde_json::from_str(&content)?;

    let missing = |field: &'static str| SweepError::MissingField {
        path: file.path.clone(),
        field,
    };

    let snr = raw.snr.ok_or_else(|| missing("SNR"))?;
    let mut sensor_traj = raw.sensor_traj.ok_or_else(|| missing("sTrajList"))?;
    let mut target_traj = raw.target_traj.ok_or_else(|| missing("oTrajList"))?;
    let dt = raw.dt.ok_or_else(|| missing("dt"))?;
    let belief = raw.belief.ok_or_else(|| missing("pB"))?;

    // The filename tag is only a label; the record's SNR field is the
    // grouping key. Disagreement usually means a renamed file.
    if let Some(tag) = file.snr_tag {
        if (tag - snr).abs() > f64::EPSILON {
            warn!(
                "{}: filename SNR tag {} disagrees with record SNR {}; using the record",
                file.name, tag, snr
            );
        }
    }

    if sensor_traj.len() != target_traj.len() {
        match policy {
            LengthPolicy::Strict => {
                return Err(SweepError::LengthMismatch {
                    estimate: sensor_traj.len(),
                    target: target_traj.len(),
                });
            }
            LengthPolicy::Truncate => {
                let common = sensor_traj.len().min(target_traj.len());
                warn!(
                    "{}: sensor trajectory has {} samples, target has {}; truncating to {}",
                    file.name,
                    sensor_traj.len(),
                    target_traj.len(),
                    common
                );
                sensor_traj.truncate(common);
                target_traj.truncate(common);
            }
        }
    }

    Ok(Trial {
        snr,
        sensor_traj,
        target_traj,
        dt,
        belief,
        entropy_list: raw.entropy_list,
        ergodicity_list: raw.ergodicity_list,
    })
}
