//! # Calculation Pipeline
//!
//! One ordered pass from the input record (plus the resolved machine) to a
//! complete [`ComputedResults`]. Each stage reads only the inputs and the
//! outputs of earlier stages:
//!
//! ```text
//! 1 part & shot ─► 2 clamp ─► 3 cooling/cycle ─► 4 machine-dependent
//!                                                   │
//!           8 quotation ◄─ 7 costing ◄─ 6 recovery ◄─ 5 cushion
//! ```
//!
//! The pass never fails and has no hidden state: the same inputs always give
//! bit-identical results. Undefined quantities come out as 0.

use serde::{Deserialize, Serialize};

use super::inputs::ProcessInputs;
use crate::catalog::MachineRecord;
use crate::config::PipelineConstants;
use crate::formulas::molding;
use crate::units::{Grams, Kilograms};

/// Every derived quantity of one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedResults {
    // Part & shot
    /// Weight of one part (g)
    pub part_weight: f64,
    /// Shot weight of all cavities plus runner (g)
    pub shot_weight_total: f64,
    /// Shot volume (cm³)
    pub shot_volume_total: f64,

    // Clamp
    /// Required clamping force including safety factor (kN)
    pub clamping_force: f64,

    // Cooling & cycle
    /// Cooling time from the wall thickness formula (s)
    pub cooling_time_calc: f64,
    /// Larger of computed and operator cooling time (s)
    pub cooling_time_effective: f64,
    /// Total cycle time (s)
    pub total_cycle_time: f64,

    // Machine dependent
    /// Screw diameter used, machine or fallback (mm)
    pub screw_diameter: f64,
    /// Theoretical maximum shot volume of the screw, also the barrel capacity
    pub max_shot_volume: f64,
    /// Residence time in the barrel (s)
    pub residence_time: f64,
    /// Dosing stroke (mm)
    pub dosing_stroke: f64,
    /// Screw peripheral speed (m/s)
    pub screw_speed: f64,
    /// Flow path to wall thickness ratio
    pub flow_ratio: f64,
    /// Volumetric flow rate (cm³/s)
    pub flow_rate: f64,
    /// Shot volume as share of max shot volume (%)
    pub shot_vs_barrel: f64,

    // Cushion
    /// Recommended cushion range (cm³)
    pub cushion_min: f64,
    pub cushion_max: f64,

    // Recovery
    /// Time to dose the next shot (s)
    pub recovery_time: f64,

    // Costing
    pub parts_per_hour: f64,
    /// Parts per hour after scrap
    pub good_parts_per_hour: f64,
    /// Per-part cost breakdown (€)
    pub material_cost_per_part: f64,
    pub machine_cost_per_part: f64,
    pub labor_cost_per_part: f64,
    pub amortization_per_part: f64,
    pub energy_cost_per_part: f64,

    // Quotation
    /// Sum of the five per-part costs (€)
    pub part_cost: f64,
    /// Price per part after margin and discount (€)
    pub quoted_price: f64,
    /// Quoted price × annual volume (€)
    pub total_revenue: f64,
}

/// Run the full pipeline.
///
/// `machine` is the resolved selector row; without one the screw diameter
/// falls back to `constants.fallback_screw_diameter_mm`.
///
/// # Example
///
/// ```rust
/// use mold_core::config::PipelineConstants;
/// use mold_core::process::{compute, ProcessInputs};
///
/// let mut inputs = ProcessInputs::default();
/// inputs.mold.part_volume = 10.0;
/// inputs.mold.cavities = 2.0;
/// inputs.mold.runner_weight = 5.0;
/// inputs.material.density = 1.0;
///
/// let results = compute(&inputs, None, &PipelineConstants::default());
/// assert_eq!(results.shot_weight_total, 25.0);
/// assert_eq!(results.shot_volume_total, 25.0);
/// ```
pub fn compute(inputs: &ProcessInputs, machine: Option<&MachineRecord>, constants: &PipelineConstants) -> ComputedResults {
    let mat = &inputs.material;
    let mold = &inputs.mold;
    let process = &inputs.process;
    let costing = &inputs.costing;

    // 1. Part & shot
    let density_or_one = if mat.density == 0.0 { 1.0 } else { mat.density };
    let part_weight = molding::shot_weight(mold.part_volume, mat.density);
    let shot_weight_total = part_weight * mold.cavities + mold.runner_weight;
    let shot_volume_total = shot_weight_total / density_or_one;

    // 2. Clamp
    let clamping_force = molding::clamping_force(mold.projected_area, process.specific_injection_pressure) * mold.safety_factor;

    // 3. Cooling & cycle
    let cooling_time_calc = molding::cooling_time(
        mold.wall_thickness,
        mat.thermal_diffusivity,
        mat.melt_temp,
        mat.mold_temp,
        mat.eject_temp,
    );
    let cooling_time_effective = cooling_time_calc.max(process.cooling_time_set);
    let handling = if process.robot_used { constants.robot_handling_time_s } else { 0.0 };
    let total_cycle_time = molding::cycle_time(
        process.injection_time,
        cooling_time_effective,
        process.mold_move_time + process.eject_time + handling,
    );

    // 4. Machine dependent
    let screw_diameter = machine
        .map(|m| m.screw_diameter_mm)
        .unwrap_or(constants.fallback_screw_diameter_mm);
    let max_shot_volume = molding::theoretical_max_shot_volume(screw_diameter, constants.stroke_to_bore_ratio);

    let residence_time = molding::residence_time(max_shot_volume, shot_weight_total, total_cycle_time);
    let dosing_stroke = molding::dosing_stroke(shot_weight_total, mat.density, screw_diameter);
    let screw_speed = molding::screw_speed(screw_diameter, process.screw_rpm);
    let flow_ratio = molding::flow_ratio(mold.flow_length, mold.wall_thickness);
    let flow_rate = molding::flow_rate(shot_volume_total, process.injection_time);
    let shot_vs_barrel = molding::shot_vs_barrel(shot_volume_total, max_shot_volume);

    // 5. Cushion
    let cushion_min = max_shot_volume * constants.cushion_min_fraction;
    let cushion_max = max_shot_volume * constants.cushion_max_fraction;

    // 6. Recovery
    let recovery_time = if process.plasticizing_rate > 0.0 {
        shot_weight_total / process.plasticizing_rate
    } else {
        0.0
    };

    // 7. Costing
    let parts_per_hour = if total_cycle_time > 0.0 {
        3600.0 / total_cycle_time * mold.cavities
    } else {
        0.0
    };
    let good_parts_per_hour = parts_per_hour * (1.0 - costing.scrap_rate / 100.0);

    let material_cost_per_part = if mold.cavities > 0.0 {
        (Kilograms::from(Grams(shot_weight_total)).0 * mat.material_cost) / mold.cavities
    } else {
        0.0
    };
    let per_good_part = |hourly_rate: f64| {
        if good_parts_per_hour > 0.0 {
            hourly_rate / good_parts_per_hour
        } else {
            0.0
        }
    };
    let machine_cost_per_part = per_good_part(costing.machine_rate);
    let labor_cost_per_part = per_good_part(costing.labor_rate);
    let amortization_per_part = if costing.annual_volume > 0.0 {
        costing.tool_investment / costing.annual_volume
    } else {
        0.0
    };
    // Flat estimate, not derived from machine power
    let energy_cost_per_part = constants.energy_coefficient * costing.energy_rate;

    // 8. Quotation
    let part_cost = material_cost_per_part
        + machine_cost_per_part
        + labor_cost_per_part
        + amortization_per_part
        + energy_cost_per_part;
    let quoted_price = part_cost * (1.0 + costing.margin / 100.0) * (1.0 - costing.discount / 100.0);
    let total_revenue = quoted_price * costing.annual_volume;

    ComputedResults {
        part_weight,
        shot_weight_total,
        shot_volume_total,
        clamping_force,
        cooling_time_calc,
        cooling_time_effective,
        total_cycle_time,
        screw_diameter,
        max_shot_volume,
        residence_time,
        dosing_stroke,
        screw_speed,
        flow_ratio,
        flow_rate,
        shot_vs_barrel,
        cushion_min,
        cushion_max,
        recovery_time,
        parts_per_hour,
        good_parts_per_hour,
        material_cost_per_part,
        machine_cost_per_part,
        labor_cost_per_part,
        amortization_per_part,
        energy_cost_per_part,
        part_cost,
        quoted_price,
        total_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::inputs::InputField;

    fn constants() -> PipelineConstants {
        PipelineConstants::default()
    }

    #[test]
    fn test_all_zero_inputs_never_fail() {
        let r = compute(&ProcessInputs::default(), None, &constants());
        assert_eq!(r.shot_weight_total, 0.0);
        assert_eq!(r.cooling_time_calc, 0.0);
        assert_eq!(r.total_cycle_time, 0.0);
        assert_eq!(r.parts_per_hour, 0.0);
        assert_eq!(r.machine_cost_per_part, 0.0);
        assert_eq!(r.part_cost, 0.0);
        // Fallback screw still yields a barrel
        assert_eq!(r.screw_diameter, 40.0);
        assert!(r.max_shot_volume > 0.0);
        for v in [r.residence_time, r.dosing_stroke, r.flow_ratio, r.flow_rate, r.shot_vs_barrel] {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_shot_with_zero_density() {
        let mut inputs = ProcessInputs::default();
        inputs.mold.cavities = 2.0;
        inputs.mold.runner_weight = 5.0;
        let r = compute(&inputs, None, &constants());
        assert_eq!(r.shot_weight_total, 5.0);
        // density guarded to 1
        assert_eq!(r.shot_volume_total, 5.0);
    }

    #[test]
    fn test_clamp_with_safety_factor() {
        let mut inputs = ProcessInputs::default();
        inputs.mold.projected_area = 50.0;
        inputs.process.specific_injection_pressure = 1000.0;
        inputs.mold.safety_factor = 1.2;
        let r = compute(&inputs, None, &constants());
        assert!((r.clamping_force - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_cooling_override_and_robot() {
        let mut inputs = ProcessInputs::default();
        inputs.process.injection_time = 1.5;
        inputs.process.cooling_time_set = 12.0;
        inputs.process.mold_move_time = 2.5;
        inputs.process.eject_time = 1.0;
        inputs.process.robot_used = true;

        let r = compute(&inputs, None, &constants());
        assert_eq!(r.cooling_time_effective, 12.0);
        // 1.5 + 12 + (2.5 + 1.0 + 1.5)
        assert!((r.total_cycle_time - 18.5).abs() < 1e-12);
    }

    #[test]
    fn test_machine_screw_used() {
        let machine = MachineRecord::new("Arburg", "470 A", 1000.0, "290", 30.0);
        let mut inputs = ProcessInputs::default();
        inputs.material.density = 1.0;
        inputs.mold.part_volume = 20.0;
        inputs.mold.cavities = 1.0;

        let r = compute(&inputs, Some(&machine), &constants());
        assert_eq!(r.screw_diameter, 30.0);
        // π · 15² · 75
        assert!((r.max_shot_volume - 53_014.376).abs() < 0.001);
        assert!((r.cushion_min - 0.05 * r.max_shot_volume).abs() < 1e-12);
        assert!((r.cushion_max - 0.15 * r.max_shot_volume).abs() < 1e-12);
        assert!((r.shot_vs_barrel - 20.0 / r.max_shot_volume * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_residence_time_uses_max_shot_volume() {
        let mut inputs = ProcessInputs::default();
        inputs.material.density = 2.0;
        inputs.mold.part_volume = 10.0;
        inputs.mold.cavities = 1.0;
        inputs.process.injection_time = 2.0;
        inputs.process.cooling_time_set = 8.0;

        let r = compute(&inputs, None, &constants());
        assert_eq!(r.shot_weight_total, 20.0);
        assert_eq!(r.total_cycle_time, 10.0);
        // Capacity is the screw volume itself, independent of density
        let expected = r.max_shot_volume / (r.shot_weight_total / r.total_cycle_time);
        assert!((r.residence_time - expected).abs() < 1e-9);
        assert!((r.residence_time - 62_831.853).abs() < 0.001);
    }

    #[test]
    fn test_max_shot_volume_and_cushion_literal() {
        let r = compute(&ProcessInputs::default(), None, &constants());
        // fallback 40 mm screw: π · 20² · 100
        assert!((r.max_shot_volume - 125_663.706).abs() < 0.001);
        assert!((r.cushion_min - 6_283.185).abs() < 0.001);
        assert!((r.cushion_max - 18_849.556).abs() < 0.001);
    }

    #[test]
    fn test_recovery_time() {
        let mut inputs = ProcessInputs::default();
        inputs.mold.runner_weight = 50.0;
        inputs.process.plasticizing_rate = 25.0;
        assert_eq!(compute(&inputs, None, &constants()).recovery_time, 2.0);

        inputs.process.plasticizing_rate = 0.0;
        assert_eq!(compute(&inputs, None, &constants()).recovery_time, 0.0);
    }

    #[test]
    fn test_costing_and_quotation() {
        let mut inputs = ProcessInputs::default();
        inputs.material.density = 1.0;
        inputs.material.material_cost = 2.0;
        inputs.mold.part_volume = 10.0;
        inputs.mold.cavities = 2.0;
        inputs.process.injection_time = 2.0;
        inputs.process.cooling_time_set = 6.0;
        inputs.process.mold_move_time = 2.0;
        inputs.costing.machine_rate = 72.0;
        inputs.costing.labor_rate = 36.0;
        inputs.costing.energy_rate = 0.25;
        inputs.costing.tool_investment = 10_000.0;
        inputs.costing.annual_volume = 100_000.0;
        inputs.costing.margin = 20.0;
        inputs.costing.discount = 10.0;

        let r = compute(&inputs, None, &constants());
        // cycle 10 s → 360 shots/h × 2 cavities
        assert!((r.parts_per_hour - 720.0).abs() < 1e-9);
        assert!((r.good_parts_per_hour - 720.0).abs() < 1e-9);
        // 20 g shot, 0.02 kg × 2 €/kg / 2 cavities
        assert!((r.material_cost_per_part - 0.02).abs() < 1e-12);
        assert!((r.machine_cost_per_part - 0.1).abs() < 1e-12);
        assert!((r.labor_cost_per_part - 0.05).abs() < 1e-12);
        assert!((r.amortization_per_part - 0.1).abs() < 1e-12);
        assert!((r.energy_cost_per_part - 0.005).abs() < 1e-12);
        assert!((r.part_cost - 0.275).abs() < 1e-12);
        // 0.275 · 1.2 · 0.9
        assert!((r.quoted_price - 0.297).abs() < 1e-12);
        assert!((r.total_revenue - 29_700.0).abs() < 1e-6);
    }

    #[test]
    fn test_scrap_reduces_good_parts() {
        let mut inputs = ProcessInputs::default();
        inputs.mold.cavities = 1.0;
        inputs.process.cooling_time_set = 10.0;
        inputs.costing.scrap_rate = 5.0;
        inputs.costing.machine_rate = 34.2;
        let r = compute(&inputs, None, &constants());
        assert!((r.parts_per_hour - 360.0).abs() < 1e-9);
        assert!((r.good_parts_per_hour - 342.0).abs() < 1e-9);
        assert!((r.machine_cost_per_part - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_constants_override() {
        let mut c = constants();
        c.fallback_screw_diameter_mm = 30.0;
        c.energy_coefficient = 0.1;
        let mut inputs = ProcessInputs::default();
        inputs.set(InputField::EnergyRate, 0.5);
        let r = compute(&inputs, None, &c);
        assert_eq!(r.screw_diameter, 30.0);
        assert!((r.energy_cost_per_part - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let mut inputs = ProcessInputs::session_defaults();
        inputs.material.density = 1.05;
        inputs.material.melt_temp = 240.0;
        inputs.material.mold_temp = 60.0;
        inputs.mold.part_volume = 18.0;
        inputs.mold.wall_thickness = 2.0;
        let a = compute(&inputs, None, &constants());
        let b = compute(&inputs, None, &constants());
        assert_eq!(a, b);
    }
}
