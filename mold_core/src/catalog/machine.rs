//! # Machine Records
//!
//! Injection molding machine catalog rows plus the browsing filter used to
//! list them page by page.
//!
//! Field names serialize in snake_case; the camelCase keys of exported
//! catalog files (`clampingForce`, `screwDiameter`, ...) are accepted too.

use serde::{Deserialize, Serialize};

/// Rows per page when browsing the machine catalog
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One machine configuration from the catalog.
///
/// Identity is the tuple of the five selector fields; the catalog may hold
/// several rows with the same tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub manufacturer: String,
    pub model: String,
    /// Maximum clamping force (kN)
    #[serde(alias = "clampingForce", alias = "clampingForceKN")]
    pub clamping_force_kn: f64,
    /// Injection unit designation (e.g., "800")
    #[serde(alias = "injectionUnit")]
    pub injection_unit: String,
    /// Screw diameter (mm)
    #[serde(alias = "screwDiameter", alias = "screwDiameterMm")]
    pub screw_diameter_mm: f64,
    /// Tie bar distance, free text (e.g., "570 x 570")
    #[serde(default, alias = "tieBarDistance", skip_serializing_if = "Option::is_none")]
    pub tie_bar_distance: Option<String>,
}

impl MachineRecord {
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        clamping_force_kn: f64,
        injection_unit: impl Into<String>,
        screw_diameter_mm: f64,
    ) -> Self {
        MachineRecord {
            manufacturer: manufacturer.into(),
            model: model.into(),
            clamping_force_kn,
            injection_unit: injection_unit.into(),
            screw_diameter_mm,
            tie_bar_distance: None,
        }
    }

    /// Short label, e.g. "Arburg Allrounder 470 A (1000 kN, 170, Ø30 mm)"
    pub fn label(&self) -> String {
        format!(
            "{} {} ({} kN, {}, Ø{} mm)",
            self.manufacturer, self.model, self.clamping_force_kn, self.injection_unit, self.screw_diameter_mm
        )
    }
}

// ============================================================================
// Browsing
// ============================================================================

/// Filter for the machine catalog listing. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineFilter {
    /// Exact manufacturer
    pub manufacturer: Option<String>,
    /// Case-insensitive substring of the model
    pub query: Option<String>,
    /// Inclusive lower bound on clamping force (kN)
    pub min_clamping_force_kn: Option<f64>,
    /// Inclusive upper bound on clamping force (kN)
    pub max_clamping_force_kn: Option<f64>,
}

impl MachineFilter {
    pub fn matches(&self, machine: &MachineRecord) -> bool {
        if let Some(manufacturer) = self.manufacturer.as_deref().filter(|m| !m.is_empty()) {
            if machine.manufacturer != manufacturer {
                return false;
            }
        }

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            if !machine.model.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }

        if let Some(min) = self.min_clamping_force_kn {
            if machine.clamping_force_kn < min {
                return false;
            }
        }

        if let Some(max) = self.max_clamping_force_kn {
            if machine.clamping_force_kn > max {
                return false;
            }
        }

        true
    }

    /// All matching machines, in catalog order
    pub fn apply<'a>(&self, machines: &'a [MachineRecord]) -> Vec<&'a MachineRecord> {
        machines.iter().filter(|m| self.matches(m)).collect()
    }

    /// One page of matching machines.
    ///
    /// `page` is 1-based and clamped into `1..=total_pages`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mold_core::catalog::{MachineFilter, MachineRecord};
    ///
    /// let machines: Vec<MachineRecord> = (0..120)
    ///     .map(|i| MachineRecord::new("Engel", format!("victory {}", i), 500.0, "200", 30.0))
    ///     .collect();
    ///
    /// let page = MachineFilter::default().page(&machines, 3, 50);
    /// assert_eq!(page.total_pages, 3);
    /// assert_eq!(page.items.len(), 20);
    /// ```
    pub fn page<'a>(&self, machines: &'a [MachineRecord], page: usize, per_page: usize) -> MachinePage<'a> {
        let matches = self.apply(machines);
        let per_page = per_page.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(per_page);

        let page = page.clamp(1, total_pages.max(1));
        let items = matches.into_iter().skip((page - 1) * per_page).take(per_page).collect();

        MachinePage {
            items,
            page,
            total_pages,
            total_matches,
        }
    }
}

/// A page of filtered machine rows
#[derive(Debug, Clone, Serialize)]
pub struct MachinePage<'a> {
    pub items: Vec<&'a MachineRecord>,
    /// Current page (1-based)
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<MachineRecord> {
        vec![
            MachineRecord::new("Arburg", "Allrounder 470 A", 1000.0, "290", 30.0),
            MachineRecord::new("Arburg", "Allrounder 570 A", 2000.0, "800", 40.0),
            MachineRecord::new("Engel", "victory 120", 1200.0, "350", 35.0),
            MachineRecord::new("Engel", "e-mac 50", 500.0, "110", 25.0),
        ]
    }

    #[test]
    fn test_filter_by_manufacturer_and_query() {
        let machines = fleet();
        let filter = MachineFilter {
            manufacturer: Some("Arburg".to_string()),
            query: Some("570".to_string()),
            ..Default::default()
        };
        let found = filter.apply(&machines);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].model, "Allrounder 570 A");
    }

    #[test]
    fn test_filter_query_case_insensitive() {
        let machines = fleet();
        let filter = MachineFilter {
            query: Some("VICTORY".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&machines).len(), 1);
    }

    #[test]
    fn test_filter_clamping_bounds_inclusive() {
        let machines = fleet();
        let filter = MachineFilter {
            min_clamping_force_kn: Some(1000.0),
            max_clamping_force_kn: Some(1200.0),
            ..Default::default()
        };
        let found = filter.apply(&machines);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_empty_strings_match_everything() {
        let machines = fleet();
        let filter = MachineFilter {
            manufacturer: Some(String::new()),
            query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&machines).len(), 4);
    }

    #[test]
    fn test_pagination() {
        let machines = fleet();
        let page = MachineFilter::default().page(&machines, 2, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_matches, 4);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].model, "e-mac 50");

        // Out of range clamps to the last page
        let page = MachineFilter::default().page(&machines, 9, 3);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_pagination_no_matches() {
        let machines = fleet();
        let filter = MachineFilter {
            manufacturer: Some("Haitian".to_string()),
            ..Default::default()
        };
        let page = filter.page(&machines, 1, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_camel_case_keys_accepted() {
        let json = r#"{
            "manufacturer": "KraussMaffei",
            "model": "CX 160",
            "clampingForce": 1600,
            "injectionUnit": "750",
            "screwDiameter": 45,
            "tieBarDistance": "570 x 570"
        }"#;
        let m: MachineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(m.clamping_force_kn, 1600.0);
        assert_eq!(m.screw_diameter_mm, 45.0);
        assert_eq!(m.tie_bar_distance.as_deref(), Some("570 x 570"));
    }
}
