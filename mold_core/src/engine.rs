//! # Recompute Entry Point
//!
//! Ties the selector, the pipeline and the validator together:
//!
//! ```text
//! (inputs, selection, catalog) ─► resolve machine ─► compute ─► validate ─► Recalculation
//! ```
//!
//! [`recompute`] is a pure function; [`Session`] wraps it for front ends
//! that apply one operator mutation at a time and want fresh results after
//! each.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, Catalog, MachineRecord, MaterialRecord, SelectionLevel, SelectionState, SelectionValue};
use crate::config::PipelineConstants;
use crate::errors::CalcResult;
use crate::process::{self, ComputedResults, InputField, ProcessInputs, ValidationCheck};

/// Output of one full recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recalculation {
    /// Machine resolved from the selection, if any
    pub machine: Option<MachineRecord>,
    /// Material named by `inputs.material.material_id`, if in the catalog
    pub material: Option<MaterialRecord>,
    pub results: ComputedResults,
    pub checks: Vec<ValidationCheck>,
}

/// Recompute with the default pipeline constants.
///
/// # Example
///
/// ```rust
/// use mold_core::catalog::{Catalog, SelectionState};
/// use mold_core::engine::recompute;
/// use mold_core::process::ProcessInputs;
///
/// let catalog = Catalog::builtin().unwrap();
/// let mut inputs = ProcessInputs::session_defaults();
/// inputs.mold.projected_area = 50.0;
///
/// let recalc = recompute(&inputs, &SelectionState::default(), catalog);
/// assert!(recalc.machine.is_none());
/// assert!((recalc.results.clamping_force - 600.0).abs() < 1e-9);
/// ```
pub fn recompute(inputs: &ProcessInputs, selection: &SelectionState, catalog: &Catalog) -> Recalculation {
    recompute_with(inputs, selection, catalog, &PipelineConstants::default())
}

/// Recompute with explicit pipeline constants.
pub fn recompute_with(
    inputs: &ProcessInputs,
    selection: &SelectionState,
    catalog: &Catalog,
    constants: &PipelineConstants,
) -> Recalculation {
    let machine = catalog::resolve(selection, &catalog.machines);
    let material = Some(inputs.material.material_id.as_str())
        .filter(|id| !id.is_empty())
        .and_then(|id| catalog.material(id));

    let results = process::compute(inputs, machine, constants);
    let checks = process::validate(&results, machine, constants);

    let label = machine.map(|m| m.label()).unwrap_or_default();
    debug!(
        machine = %label,
        shot_weight = results.shot_weight_total,
        cycle = results.total_cycle_time,
        quoted_price = results.quoted_price,
        "recomputed"
    );

    Recalculation {
        machine: machine.cloned(),
        material: material.cloned(),
        results,
        checks,
    }
}

// ============================================================================
// Session
// ============================================================================

/// Mutable operator state over a read-only catalog.
///
/// Every mutator applies one change and returns the full recomputation for
/// the new state.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    catalog: &'a Catalog,
    pub constants: PipelineConstants,
    pub inputs: ProcessInputs,
    pub selection: SelectionState,
}

impl<'a> Session<'a> {
    /// New session with the process sheet's starting values
    pub fn new(catalog: &'a Catalog, constants: PipelineConstants) -> Self {
        Session {
            catalog,
            constants,
            inputs: ProcessInputs::session_defaults(),
            selection: SelectionState::default(),
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn recalculate(&self) -> Recalculation {
        recompute_with(&self.inputs, &self.selection, self.catalog, &self.constants)
    }

    /// Set an input from operator text
    pub fn set_input(&mut self, field: InputField, text: &str) -> Recalculation {
        self.inputs.set_raw(field, text);
        self.recalculate()
    }

    /// Choose a selector value; rejected choices leave the selection unchanged
    pub fn select(&mut self, level: SelectionLevel, value: SelectionValue) -> (bool, Recalculation) {
        let accepted = self.selection.set(level, value);
        (accepted, self.recalculate())
    }

    pub fn clear_selection(&mut self, level: SelectionLevel) -> Recalculation {
        self.selection.clear(level);
        self.recalculate()
    }

    /// Options currently offered at a selector level
    pub fn options(&self, level: SelectionLevel) -> Vec<SelectionValue> {
        catalog::options_at(level, &self.selection, &self.catalog.machines)
    }

    /// Prefill the material inputs from a catalog material
    pub fn select_material(&mut self, id: &str) -> CalcResult<Recalculation> {
        let material = self.catalog.require_material(id)?;
        material.prefill(&mut self.inputs.material);
        Ok(self.recalculate())
    }

    pub fn clear_material(&mut self) -> Recalculation {
        catalog::clear_material(&mut self.inputs.material);
        self.recalculate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_recompute_idempotent() {
        let mut inputs = ProcessInputs::session_defaults();
        inputs.mold.part_volume = 12.0;
        inputs.mold.wall_thickness = 2.0;
        let selection = SelectionState::default();

        let a = recompute(&inputs, &selection, catalog());
        let b = recompute(&inputs, &selection, catalog());
        assert_eq!(a, b);
    }

    #[test]
    fn test_recompute_resolves_material() {
        let mut inputs = ProcessInputs::default();
        inputs.material.material_id = "ABS".to_string();
        let recalc = recompute(&inputs, &SelectionState::default(), catalog());
        assert_eq!(recalc.material.unwrap().id, "ABS");

        inputs.material.material_id = "unobtainium".to_string();
        assert!(recompute(&inputs, &SelectionState::default(), catalog()).material.is_none());
    }

    #[test]
    fn test_session_machine_selection() {
        let mut session = Session::new(catalog(), PipelineConstants::default());
        session.select(SelectionLevel::Manufacturer, SelectionValue::text("Arburg"));
        session.select(SelectionLevel::Model, SelectionValue::text("Allrounder 470 A"));
        session.select(SelectionLevel::ClampingForce, SelectionValue::Number(1000.0));
        session.select(SelectionLevel::InjectionUnit, SelectionValue::text("290"));

        assert_eq!(
            session.options(SelectionLevel::ScrewDiameter),
            vec![SelectionValue::Number(30.0), SelectionValue::Number(35.0)]
        );

        let (accepted, recalc) = session.select(SelectionLevel::ScrewDiameter, SelectionValue::Number(35.0));
        assert!(accepted);
        assert_eq!(recalc.machine.unwrap().screw_diameter_mm, 35.0);
        assert_eq!(recalc.results.screw_diameter, 35.0);
    }

    #[test]
    fn test_session_material_prefill() {
        let mut session = Session::new(catalog(), PipelineConstants::default());
        let recalc = session.select_material("PC").unwrap();
        assert_eq!(session.inputs.material.density, 1.2);
        assert_eq!(session.inputs.material.dryer_temp, 120.0);
        assert_eq!(recalc.material.unwrap().name, "Polycarbonate");

        let err = session.select_material("PEEK").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");

        let recalc = session.clear_material();
        assert!(recalc.material.is_none());
        assert_eq!(session.inputs.material.eject_temp, 100.0);
    }

    #[test]
    fn test_session_input_mutation() {
        let mut session = Session::new(catalog(), PipelineConstants::default());
        let recalc = session.set_input(InputField::ProjectedArea, "50");
        assert!((recalc.results.clamping_force - 600.0).abs() < 1e-9);

        let recalc = session.set_input(InputField::ProjectedArea, "garbage");
        assert_eq!(recalc.results.clamping_force, 0.0);
    }
}
