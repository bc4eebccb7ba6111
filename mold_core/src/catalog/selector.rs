//! # Cascading Machine Selector
//!
//! Narrows the machine catalog through five dependent levels:
//!
//! ```text
//! L0 manufacturer ─► L1 model ─► L2 clamping force ─► L3 injection unit ─► L4 screw diameter
//! ```
//!
//! The options offered at a level are the distinct values among catalog rows
//! that agree with every level above it. Setting a level clears all levels
//! below it, so a level is never set while one above it is unset.
//!
//! Options and resolution are plain functions of the selection and the
//! catalog; callers re-derive them after each change.
//!
//! ## Example
//!
//! ```rust
//! use mold_core::catalog::{MachineRecord, SelectionLevel, SelectionState, SelectionValue};
//! use mold_core::catalog::selector::{options_at, resolve};
//!
//! let machines = vec![
//!     MachineRecord::new("Arburg", "470 A", 1000.0, "290", 30.0),
//!     MachineRecord::new("Arburg", "470 A", 1000.0, "290", 35.0),
//! ];
//!
//! let mut sel = SelectionState::default();
//! sel.set(SelectionLevel::Manufacturer, SelectionValue::text("Arburg"));
//! sel.set(SelectionLevel::Model, SelectionValue::text("470 A"));
//! sel.set(SelectionLevel::ClampingForce, SelectionValue::Number(1000.0));
//! sel.set(SelectionLevel::InjectionUnit, SelectionValue::text("290"));
//!
//! assert_eq!(options_at(SelectionLevel::ScrewDiameter, &sel, &machines).len(), 2);
//!
//! sel.set(SelectionLevel::ScrewDiameter, SelectionValue::Number(35.0));
//! assert_eq!(resolve(&sel, &machines).unwrap().screw_diameter_mm, 35.0);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::machine::MachineRecord;

// ============================================================================
// Levels and Values
// ============================================================================

/// The five selector levels, top-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLevel {
    Manufacturer,
    Model,
    ClampingForce,
    InjectionUnit,
    ScrewDiameter,
}

impl SelectionLevel {
    pub const ALL: [SelectionLevel; 5] = [
        SelectionLevel::Manufacturer,
        SelectionLevel::Model,
        SelectionLevel::ClampingForce,
        SelectionLevel::InjectionUnit,
        SelectionLevel::ScrewDiameter,
    ];

    /// Position in the cascade (0 = manufacturer)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SelectionLevel::Manufacturer => "Manufacturer",
            SelectionLevel::Model => "Model",
            SelectionLevel::ClampingForce => "Clamping Force (kN)",
            SelectionLevel::InjectionUnit => "Injection Unit",
            SelectionLevel::ScrewDiameter => "Screw Diameter (mm)",
        }
    }

    /// Whether values at this level are numbers rather than text
    pub fn is_numeric(&self) -> bool {
        matches!(self, SelectionLevel::ClampingForce | SelectionLevel::ScrewDiameter)
    }

    /// This level's value on a catalog row
    pub fn value_of(&self, machine: &MachineRecord) -> SelectionValue {
        match self {
            SelectionLevel::Manufacturer => SelectionValue::Text(machine.manufacturer.clone()),
            SelectionLevel::Model => SelectionValue::Text(machine.model.clone()),
            SelectionLevel::ClampingForce => SelectionValue::Number(machine.clamping_force_kn),
            SelectionLevel::InjectionUnit => SelectionValue::Text(machine.injection_unit.clone()),
            SelectionLevel::ScrewDiameter => SelectionValue::Number(machine.screw_diameter_mm),
        }
    }
}

/// A chosen or offered value at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Number(f64),
    Text(String),
}

impl SelectionValue {
    pub fn text(s: impl Into<String>) -> Self {
        SelectionValue::Text(s.into())
    }

    /// Parse operator text into the value kind the level expects
    pub fn parse_for(level: SelectionLevel, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if level.is_numeric() {
            text.parse::<f64>().ok().filter(|v| v.is_finite()).map(SelectionValue::Number)
        } else {
            Some(SelectionValue::text(text))
        }
    }

    /// Ordering for option lists: numbers ascending, text lexicographic
    fn cmp_options(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SelectionValue::Number(a), SelectionValue::Number(b)) => a.total_cmp(b),
            (SelectionValue::Text(a), SelectionValue::Text(b)) => a.cmp(b),
            (SelectionValue::Number(_), SelectionValue::Text(_)) => Ordering::Less,
            (SelectionValue::Text(_), SelectionValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for SelectionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionValue::Number(v) => write!(f, "{}", v),
            SelectionValue::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Selection State
// ============================================================================

/// Current choice at each level; `None` until chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub clamping_force: Option<f64>,
    pub injection_unit: Option<String>,
    pub screw_diameter: Option<f64>,
}

impl SelectionState {
    /// Value chosen at a level
    pub fn get(&self, level: SelectionLevel) -> Option<SelectionValue> {
        match level {
            SelectionLevel::Manufacturer => self.manufacturer.clone().map(SelectionValue::Text),
            SelectionLevel::Model => self.model.clone().map(SelectionValue::Text),
            SelectionLevel::ClampingForce => self.clamping_force.map(SelectionValue::Number),
            SelectionLevel::InjectionUnit => self.injection_unit.clone().map(SelectionValue::Text),
            SelectionLevel::ScrewDiameter => self.screw_diameter.map(SelectionValue::Number),
        }
    }

    pub fn is_set(&self, level: SelectionLevel) -> bool {
        match level {
            SelectionLevel::Manufacturer => self.manufacturer.is_some(),
            SelectionLevel::Model => self.model.is_some(),
            SelectionLevel::ClampingForce => self.clamping_force.is_some(),
            SelectionLevel::InjectionUnit => self.injection_unit.is_some(),
            SelectionLevel::ScrewDiameter => self.screw_diameter.is_some(),
        }
    }

    /// All five levels are chosen
    pub fn is_complete(&self) -> bool {
        SelectionLevel::ALL.iter().all(|l| self.is_set(*l))
    }

    /// Every level above `level` is chosen
    pub fn prerequisites_met(&self, level: SelectionLevel) -> bool {
        SelectionLevel::ALL[..level.index()].iter().all(|l| self.is_set(*l))
    }

    /// Choose a value at `level` and clear every level below it.
    ///
    /// Returns `false` and leaves the state untouched when a level above is
    /// unset or the value kind does not fit the level.
    pub fn set(&mut self, level: SelectionLevel, value: SelectionValue) -> bool {
        if !self.prerequisites_met(level) {
            warn!(level = ?level, "rejected selection: a level above is unset");
            return false;
        }

        match (level, value) {
            (SelectionLevel::Manufacturer, SelectionValue::Text(v)) => self.manufacturer = Some(v),
            (SelectionLevel::Model, SelectionValue::Text(v)) => self.model = Some(v),
            (SelectionLevel::ClampingForce, SelectionValue::Number(v)) => self.clamping_force = Some(v),
            (SelectionLevel::InjectionUnit, SelectionValue::Text(v)) => self.injection_unit = Some(v),
            (SelectionLevel::ScrewDiameter, SelectionValue::Number(v)) => self.screw_diameter = Some(v),
            (level, value) => {
                warn!(level = ?level, value = %value, "rejected selection: wrong value kind");
                return false;
            }
        }

        self.clear_below(level);
        true
    }

    /// Unset `level` and everything below it
    pub fn clear(&mut self, level: SelectionLevel) {
        match level {
            SelectionLevel::Manufacturer => self.manufacturer = None,
            SelectionLevel::Model => self.model = None,
            SelectionLevel::ClampingForce => self.clamping_force = None,
            SelectionLevel::InjectionUnit => self.injection_unit = None,
            SelectionLevel::ScrewDiameter => self.screw_diameter = None,
        }
        self.clear_below(level);
    }

    fn clear_below(&mut self, level: SelectionLevel) {
        if let Some(next) = SelectionLevel::ALL.get(level.index() + 1) {
            self.clear(*next);
        }
    }

    /// Whether a catalog row agrees with every chosen level above `level`
    fn matches_above(&self, level: SelectionLevel, machine: &MachineRecord) -> bool {
        SelectionLevel::ALL[..level.index()]
            .iter()
            .all(|l| self.get(*l).as_ref() == Some(&l.value_of(machine)))
    }
}

// ============================================================================
// Narrowing and Resolution
// ============================================================================

/// Distinct values offered at `level`, sorted. Empty if a level above it is unset.
pub fn options_at(level: SelectionLevel, selection: &SelectionState, machines: &[MachineRecord]) -> Vec<SelectionValue> {
    if !selection.prerequisites_met(level) {
        return Vec::new();
    }

    let mut options: Vec<SelectionValue> = Vec::new();
    for machine in machines.iter().filter(|m| selection.matches_above(level, m)) {
        let value = level.value_of(machine);
        if !options.contains(&value) {
            options.push(value);
        }
    }

    options.sort_by(|a, b| a.cmp_options(b));
    options
}

/// The catalog row matching a complete selection.
///
/// Duplicate rows resolve to the first in catalog order. Returns `None` for
/// an incomplete selection or when no row matches.
pub fn resolve<'a>(selection: &SelectionState, machines: &'a [MachineRecord]) -> Option<&'a MachineRecord> {
    if !selection.is_complete() {
        return None;
    }

    let mut matches = machines
        .iter()
        .filter(|m| selection.matches_above(SelectionLevel::ScrewDiameter, m))
        .filter(|m| selection.screw_diameter == Some(m.screw_diameter_mm));

    let first = matches.next();
    match first {
        Some(machine) => {
            let duplicates = matches.count();
            if duplicates > 0 {
                warn!(machine = %machine.label(), duplicates, "ambiguous selection, using first catalog row");
            }
            debug!(machine = %machine.label(), "resolved machine");
        }
        None => debug!("selection matches no catalog row"),
    }
    first
}
