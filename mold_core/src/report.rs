//! # Quotation Report
//!
//! A self-contained snapshot of one recomputation for the presentation
//! layer: job metadata, the machine and material used, every result and
//! every limit check. Reports serialize to JSON and carry the schema version
//! they were written with.
//!
//! ```text
//! QuotationReport
//! ├── meta: ReportMetadata (id, version, job info, timestamp)
//! ├── inputs: ProcessInputs
//! ├── machine / material: Option<...>
//! ├── results: ComputedResults
//! └── checks: Vec<ValidationCheck>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{MachineRecord, MaterialRecord};
use crate::engine::Recalculation;
use crate::errors::CalcResult;
use crate::process::{ComputedResults, LimitStatus, ProcessInputs, ValidationCheck};

/// Current schema version for quotation reports
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Who and what the quotation is for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInfo {
    pub customer: String,
    pub part_number: String,
    pub engineer: String,
}

impl JobInfo {
    pub fn new(customer: impl Into<String>, part_number: impl Into<String>, engineer: impl Into<String>) -> Self {
        JobInfo {
            customer: customer.into(),
            part_number: part_number.into(),
            engineer: engineer.into(),
        }
    }
}

/// Report identity and provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub id: Uuid,
    /// Schema version (for future migrations)
    pub version: String,
    pub job: JobInfo,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationReport {
    pub meta: ReportMetadata,
    pub inputs: ProcessInputs,
    pub machine: Option<MachineRecord>,
    pub material: Option<MaterialRecord>,
    pub results: ComputedResults,
    pub checks: Vec<ValidationCheck>,
}

impl QuotationReport {
    /// Build a report from the inputs and their recomputation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mold_core::catalog::{Catalog, SelectionState};
    /// use mold_core::engine::recompute;
    /// use mold_core::process::ProcessInputs;
    /// use mold_core::report::{JobInfo, QuotationReport};
    ///
    /// let inputs = ProcessInputs::session_defaults();
    /// let recalc = recompute(&inputs, &SelectionState::default(), Catalog::builtin().unwrap());
    ///
    /// let report = QuotationReport::new(JobInfo::new("ACME", "HX-100", "J. Doe"), inputs, recalc);
    /// assert_eq!(report.meta.job.customer, "ACME");
    /// assert_eq!(report.meta.version, "0.1.0");
    /// ```
    pub fn new(job: JobInfo, inputs: ProcessInputs, recalc: Recalculation) -> Self {
        QuotationReport {
            meta: ReportMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                job,
                created: Utc::now(),
            },
            inputs,
            machine: recalc.machine,
            material: recalc.material,
            results: recalc.results,
            checks: recalc.checks,
        }
    }

    /// Worst status among the checks that have one
    pub fn worst_status(&self) -> Option<LimitStatus> {
        self.checks.iter().filter_map(|c| c.status).max()
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SelectionState};
    use crate::engine::recompute;
    use crate::process::Limit;

    fn report() -> QuotationReport {
        let inputs = ProcessInputs::session_defaults();
        let recalc = recompute(&inputs, &SelectionState::default(), Catalog::builtin().unwrap());
        QuotationReport::new(JobInfo::new("ACME Corp", "HX-100", "Jane Engineer"), inputs, recalc)
    }

    #[test]
    fn test_report_creation() {
        let r = report();
        assert_eq!(r.meta.version, SCHEMA_VERSION);
        assert_eq!(r.meta.job.part_number, "HX-100");
        assert!(r.machine.is_none());
        assert_eq!(r.checks.len(), 6);
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(report().meta.id, report().meta.id);
    }

    #[test]
    fn test_json_roundtrip() {
        let r = report();
        let json = r.to_json().unwrap();
        assert!(json.contains("\"customer\": \"ACME Corp\""));
        let back = QuotationReport::from_json(&json).unwrap();
        assert_eq!(r.meta, back.meta);
        assert_eq!(r.inputs, back.inputs);
        assert_eq!(r.checks.len(), back.checks.len());
        assert!((r.results.max_shot_volume - back.results.max_shot_volume).abs() < 1e-9);
    }

    #[test]
    fn test_worst_status() {
        let mut r = report();
        r.checks = vec![
            ValidationCheck {
                label: "A".to_string(),
                value: 1.0,
                unit: "kN".to_string(),
                limit: Limit::Max { max: 0.0 },
                status: None,
            },
            ValidationCheck {
                label: "B".to_string(),
                value: 95.0,
                unit: "kN".to_string(),
                limit: Limit::Max { max: 100.0 },
                status: Some(LimitStatus::Close),
            },
        ];
        assert_eq!(r.worst_status(), Some(LimitStatus::Close));

        r.checks.clear();
        assert_eq!(r.worst_status(), None);
    }
}
