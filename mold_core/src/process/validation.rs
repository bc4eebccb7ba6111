//! # Limit Validator
//!
//! Classifies pipeline outputs against machine capacity and process
//! rules of thumb.
//!
//! ```text
//! Standard (value ≤ limit):
//!
//!   0 ───────── OK ───────── 0.9·L ── CLOSE ── L ── EXCEEDED ──►
//!
//! Inverted range [min, max]:
//!
//!   ◄─ EXCEEDED ─ min ─ CLOSE ─┬──── OK ────┬─ CLOSE ─ max ─ EXCEEDED ─►
//!                       10 % of (max − min) inward
//! ```
//!
//! A limit of 0 means no limit is known: the value is still reported but
//! carries no status.

use serde::{Deserialize, Serialize};

use super::pipeline::ComputedResults;
use crate::catalog::MachineRecord;
use crate::config::PipelineConstants;

/// Tri-state outcome of a limit check, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitStatus {
    Ok,
    Close,
    Exceeded,
}

impl LimitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LimitStatus::Ok => "OK",
            LimitStatus::Close => "CLOSE",
            LimitStatus::Exceeded => "EXCEEDED",
        }
    }
}

/// What a value is checked against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Limit {
    /// Value must not exceed `max`; 0 means unknown
    Max { max: f64 },
    /// Value must stay within `[min, max]`
    Range { min: f64, max: f64 },
}

/// Classify `value` against `limit`.
///
/// `close_band` is the CLOSE threshold as a fraction (0.1 = within 10 %).
/// Returns `None` when the limit is unknown.
///
/// # Example
///
/// ```rust
/// use mold_core::process::{classify, Limit, LimitStatus};
///
/// let limit = Limit::Max { max: 100.0 };
/// assert_eq!(classify(50.0, limit, 0.1), Some(LimitStatus::Ok));
/// assert_eq!(classify(95.0, limit, 0.1), Some(LimitStatus::Close));
/// assert_eq!(classify(105.0, limit, 0.1), Some(LimitStatus::Exceeded));
/// assert_eq!(classify(105.0, Limit::Max { max: 0.0 }, 0.1), None);
/// ```
pub fn classify(value: f64, limit: Limit, close_band: f64) -> Option<LimitStatus> {
    match limit {
        Limit::Max { max } => {
            if max <= 0.0 {
                return None;
            }
            if value > max {
                Some(LimitStatus::Exceeded)
            } else if value > (1.0 - close_band) * max {
                Some(LimitStatus::Close)
            } else {
                Some(LimitStatus::Ok)
            }
        }
        Limit::Range { min, max } => {
            if min == 0.0 && max == 0.0 {
                return None;
            }
            if value < min || value > max {
                return Some(LimitStatus::Exceeded);
            }
            let band = (max - min) * close_band;
            if value < min + band || value > max - band {
                Some(LimitStatus::Close)
            } else {
                Some(LimitStatus::Ok)
            }
        }
    }
}

/// One displayed check: the value, its limit and the status if known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub limit: Limit,
    pub status: Option<LimitStatus>,
}

impl ValidationCheck {
    fn new(label: &str, value: f64, unit: &str, limit: Limit, close_band: f64) -> Self {
        ValidationCheck {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            limit,
            status: classify(value, limit, close_band),
        }
    }
}

/// Checks shown beside the results, in display order:
///
/// 1. clamping force and shot volume against the resolved machine
/// 2. barrel fill against the recommended range
/// 3. screw speed, residence time and flow ratio against their maxima
///
/// Without a machine the first two carry a limit of 0 and no status.
pub fn validate(
    results: &ComputedResults,
    machine: Option<&MachineRecord>,
    constants: &PipelineConstants,
) -> Vec<ValidationCheck> {
    let band = constants.close_band;
    let clamp_limit = machine.map(|m| m.clamping_force_kn).unwrap_or(0.0);
    let shot_limit = if machine.is_some() { results.max_shot_volume } else { 0.0 };

    vec![
        ValidationCheck::new(
            "Clamping Force",
            results.clamping_force,
            "kN",
            Limit::Max { max: clamp_limit },
            band,
        ),
        ValidationCheck::new(
            "Shot Volume",
            results.shot_volume_total,
            "cm³",
            Limit::Max { max: shot_limit },
            band,
        ),
        ValidationCheck::new(
            "Barrel Fill",
            results.shot_vs_barrel,
            "%",
            Limit::Range {
                min: constants.barrel_fill_min_pct,
                max: constants.barrel_fill_max_pct,
            },
            band,
        ),
        ValidationCheck::new(
            "Screw Speed",
            results.screw_speed,
            "m/s",
            Limit::Max { max: constants.max_screw_speed_m_s },
            band,
        ),
        ValidationCheck::new(
            "Residence Time",
            results.residence_time,
            "s",
            Limit::Max { max: constants.max_residence_time_s },
            band,
        ),
        ValidationCheck::new(
            "Flow Ratio",
            results.flow_ratio,
            ":1",
            Limit::Max { max: constants.max_flow_ratio },
            band,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_limit() {
        let limit = Limit::Max { max: 100.0 };
        assert_eq!(classify(95.0, limit, 0.1), Some(LimitStatus::Close));
        assert_eq!(classify(105.0, limit, 0.1), Some(LimitStatus::Exceeded));
        assert_eq!(classify(50.0, limit, 0.1), Some(LimitStatus::Ok));
    }

    #[test]
    fn test_standard_boundaries() {
        let limit = Limit::Max { max: 100.0 };
        assert_eq!(classify(90.0, limit, 0.1), Some(LimitStatus::Ok));
        assert_eq!(classify(100.0, limit, 0.1), Some(LimitStatus::Close));
        assert_eq!(classify(0.0, limit, 0.1), Some(LimitStatus::Ok));
    }

    #[test]
    fn test_unknown_limit_has_no_status() {
        assert_eq!(classify(1e6, Limit::Max { max: 0.0 }, 0.1), None);
        assert_eq!(classify(5.0, Limit::Range { min: 0.0, max: 0.0 }, 0.1), None);
    }

    #[test]
    fn test_range_limit() {
        let limit = Limit::Range { min: 20.0, max: 80.0 };
        assert_eq!(classify(10.0, limit, 0.1), Some(LimitStatus::Exceeded));
        assert_eq!(classify(85.0, limit, 0.1), Some(LimitStatus::Exceeded));
        // band is 6 % wide
        assert_eq!(classify(22.0, limit, 0.1), Some(LimitStatus::Close));
        assert_eq!(classify(77.0, limit, 0.1), Some(LimitStatus::Close));
        assert_eq!(classify(50.0, limit, 0.1), Some(LimitStatus::Ok));
        assert_eq!(classify(27.0, limit, 0.1), Some(LimitStatus::Ok));
        assert_eq!(classify(20.0, limit, 0.1), Some(LimitStatus::Close));
    }

    #[test]
    fn test_validate_without_machine() {
        let results = ComputedResults {
            clamping_force: 600.0,
            shot_volume_total: 25.0,
            shot_vs_barrel: 50.0,
            max_shot_volume: 125.0,
            ..Default::default()
        };
        let checks = validate(&results, None, &PipelineConstants::default());
        assert_eq!(checks.len(), 6);
        assert_eq!(checks[0].status, None);
        assert_eq!(checks[0].value, 600.0);
        assert_eq!(checks[1].status, None);
        assert_eq!(checks[2].status, Some(LimitStatus::Ok));
    }

    #[test]
    fn test_validate_with_machine() {
        let machine = MachineRecord::new("Engel", "e-mac 50", 500.0, "110", 25.0);
        let results = ComputedResults {
            clamping_force: 600.0,
            shot_volume_total: 28.0,
            shot_vs_barrel: 91.0,
            max_shot_volume: 30.0,
            ..Default::default()
        };
        let checks = validate(&results, Some(&machine), &PipelineConstants::default());
        assert_eq!(checks[0].status, Some(LimitStatus::Exceeded));
        assert_eq!(checks[0].limit, Limit::Max { max: 500.0 });
        assert_eq!(checks[1].status, Some(LimitStatus::Close));
        assert_eq!(checks[2].status, Some(LimitStatus::Exceeded));
    }

    #[test]
    fn test_screw_speed_warning() {
        let c = PipelineConstants::default();
        let slow = ComputedResults { screw_speed: 0.5, ..Default::default() };
        let fast = ComputedResults { screw_speed: 1.2, ..Default::default() };
        assert_eq!(validate(&slow, None, &c)[3].status, Some(LimitStatus::Ok));
        let check = &validate(&fast, None, &c)[3];
        assert_eq!(check.label, "Screw Speed");
        assert_eq!(check.status, Some(LimitStatus::Exceeded));
    }

    #[test]
    fn test_residence_time_warning() {
        let c = PipelineConstants::default();
        let short = ComputedResults { residence_time: 120.0, ..Default::default() };
        let long = ComputedResults { residence_time: 301.0, ..Default::default() };
        assert_eq!(validate(&short, None, &c)[4].status, Some(LimitStatus::Ok));
        let check = &validate(&long, None, &c)[4];
        assert_eq!(check.label, "Residence Time");
        assert_eq!(check.limit, Limit::Max { max: 300.0 });
        assert_eq!(check.status, Some(LimitStatus::Exceeded));
    }

    #[test]
    fn test_flow_ratio_warning() {
        let c = PipelineConstants::default();
        let thin = ComputedResults { flow_ratio: 250.0, ..Default::default() };
        assert_eq!(validate(&thin, None, &c)[5].status, Some(LimitStatus::Exceeded));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&LimitStatus::Exceeded).unwrap();
        assert_eq!(json, "\"EXCEEDED\"");
        let limit = serde_json::to_string(&Limit::Range { min: 20.0, max: 80.0 }).unwrap();
        assert!(limit.contains("\"kind\":\"range\""));
    }
}
