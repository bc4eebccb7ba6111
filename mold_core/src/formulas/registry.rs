//! # Formula Registry
//!
//! Central registry of every formula in the library. Each formula has a
//! stable string id, metadata (plain-text formula, argument list with units,
//! result unit, domain guard) and can be evaluated from a slice of numbers.
//!
//! Front ends use the registry to offer standalone calculators without
//! hard-coding a dispatch table, and `gen-formulas` uses it to regenerate
//! the formula reference.
//!
//! ## Usage
//!
//! ```rust
//! use mold_core::formulas::registry::Formula;
//!
//! let formula = Formula::from_id("clamping_force").unwrap();
//! let kn = formula.evaluate(&[100.0, 1000.0]).unwrap();
//! assert_eq!(kn, 1000.0);
//!
//! let meta = formula.metadata();
//! println!("{} = {} [{}]", meta.name, meta.formula_plain, meta.result_unit);
//! ```

use serde::{Deserialize, Serialize};

use super::{geometry, molding};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Formula Categories
// ============================================================================

/// Groups of formulas, in the order calculators are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaCategory {
    /// Injection molding process formulas
    Process,
    /// Area primitives
    Area,
    /// Volume primitives
    Volume,
}

impl FormulaCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Process => "Process",
            FormulaCategory::Area => "Area",
            FormulaCategory::Volume => "Volume",
        }
    }

    /// Sort order (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaCategory::Process => 1,
            FormulaCategory::Area => 2,
            FormulaCategory::Volume => 3,
        }
    }

    /// All categories in presentation order
    pub fn all() -> [FormulaCategory; 3] {
        [FormulaCategory::Process, FormulaCategory::Area, FormulaCategory::Volume]
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a formula argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Argument key (e.g., "wall_thickness")
    pub key: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "mm", "g/cm³")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(key: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { key, description, units }
    }
}

// ============================================================================
// Formula Metadata
// ============================================================================

/// Complete metadata for a formula.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    /// Human-readable name (e.g., "Clamping Force")
    pub name: &'static str,
    /// Brief description of what this formula calculates
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Arguments, in evaluation order
    pub inputs: Vec<Variable>,
    /// Unit of the result
    pub result_unit: &'static str,
    /// What the formula returns outside its domain
    pub guard: &'static str,
    /// Category for grouping
    pub category: FormulaCategory,
    /// Function name implementing the formula
    pub source_function: &'static str,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// All formulas in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    ClampingForce,
    ShotWeight,
    CoolingTime,
    ResidenceTime,
    ScrewSpeed,
    DosingStroke,
    FlowRatio,
    CycleTime,
    FlowRate,
    ShotVsBarrel,
    MaxShotVolume,
    /// Projected area approximated as a rectangle
    ProjectedArea,
    RectangleArea,
    CircleArea,
    CylinderVolume,
    CuboidVolume,
    SphereVolume,
}

/// All formulas in the registry (for iteration)
pub static ALL_FORMULAS: &[Formula] = &[
    Formula::ClampingForce,
    Formula::ShotWeight,
    Formula::CoolingTime,
    Formula::ResidenceTime,
    Formula::ScrewSpeed,
    Formula::DosingStroke,
    Formula::FlowRatio,
    Formula::CycleTime,
    Formula::FlowRate,
    Formula::ShotVsBarrel,
    Formula::MaxShotVolume,
    Formula::ProjectedArea,
    Formula::RectangleArea,
    Formula::CircleArea,
    Formula::CylinderVolume,
    Formula::CuboidVolume,
    Formula::SphereVolume,
];

impl Formula {
    /// Stable identifier used by front ends
    pub fn id(&self) -> &'static str {
        match self {
            Formula::ClampingForce => "clamping_force",
            Formula::ShotWeight => "shot_weight",
            Formula::CoolingTime => "cooling_time",
            Formula::ResidenceTime => "residence_time",
            Formula::ScrewSpeed => "screw_speed",
            Formula::DosingStroke => "dosing_stroke",
            Formula::FlowRatio => "flow_ratio",
            Formula::CycleTime => "cycle_time",
            Formula::FlowRate => "flow_rate",
            Formula::ShotVsBarrel => "shot_vs_barrel",
            Formula::MaxShotVolume => "max_shot_volume",
            Formula::ProjectedArea => "projected_area",
            Formula::RectangleArea => "rectangle_area",
            Formula::CircleArea => "circle_area",
            Formula::CylinderVolume => "cylinder_volume",
            Formula::CuboidVolume => "cuboid_volume",
            Formula::SphereVolume => "sphere_volume",
        }
    }

    /// Look up a formula by id (case-insensitive, `-` accepted for `_`)
    pub fn from_id(id: &str) -> CalcResult<Formula> {
        let normalized = id.trim().to_lowercase().replace('-', "_");
        ALL_FORMULAS
            .iter()
            .copied()
            .find(|f| f.id() == normalized)
            .ok_or_else(|| CalcError::unknown_formula(id))
    }

    /// Number of arguments `evaluate` expects
    pub fn arity(&self) -> usize {
        self.metadata().inputs.len()
    }

    /// Evaluate the formula with positional arguments.
    ///
    /// Returns `InvalidInput` if the argument count does not match. Domain
    /// guards still apply, so a well-formed call never fails.
    pub fn evaluate(&self, args: &[f64]) -> CalcResult<f64> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(CalcError::invalid_input(
                self.id(),
                format!("{} arguments", args.len()),
                format!("Expected {} arguments", expected),
            ));
        }

        let value = match self {
            Formula::ClampingForce => molding::clamping_force(args[0], args[1]),
            Formula::ShotWeight => molding::shot_weight(args[0], args[1]),
            Formula::CoolingTime => molding::cooling_time(args[0], args[1], args[2], args[3], args[4]),
            Formula::ResidenceTime => molding::residence_time(args[0], args[1], args[2]),
            Formula::ScrewSpeed => molding::screw_speed(args[0], args[1]),
            Formula::DosingStroke => molding::dosing_stroke(args[0], args[1], args[2]),
            Formula::FlowRatio => molding::flow_ratio(args[0], args[1]),
            Formula::CycleTime => molding::cycle_time(args[0], args[1], args[2]),
            Formula::FlowRate => molding::flow_rate(args[0], args[1]),
            Formula::ShotVsBarrel => molding::shot_vs_barrel(args[0], args[1]),
            Formula::MaxShotVolume => molding::theoretical_max_shot_volume(args[0], args[1]),
            Formula::ProjectedArea | Formula::RectangleArea => geometry::rectangle_area(args[0], args[1]),
            Formula::CircleArea => geometry::circle_area(args[0]),
            Formula::CylinderVolume => geometry::cylinder_volume(args[0], args[1]),
            Formula::CuboidVolume => geometry::cuboid_volume(args[0], args[1], args[2]),
            Formula::SphereVolume => geometry::sphere_volume(args[0]),
        };
        Ok(value)
    }

    /// Get the full metadata for this formula
    pub fn metadata(&self) -> FormulaMetadata {
        match self {
            Formula::ClampingForce => FormulaMetadata {
                name: "Clamping Force",
                description: "Force needed to keep the mold shut against injection pressure",
                formula_plain: "F = A * p / 100",
                inputs: vec![
                    Variable::new("area", "Total projected area of all cavities", "cm²"),
                    Variable::new("pressure", "Specific injection pressure", "bar"),
                ],
                result_unit: "kN",
                guard: "none",
                category: FormulaCategory::Process,
                source_function: "clamping_force",
            },
            Formula::ShotWeight => FormulaMetadata {
                name: "Shot Weight",
                description: "Mass of polymer for a given volume",
                formula_plain: "m = V * rho",
                inputs: vec![
                    Variable::new("volume", "Total volume", "cm³"),
                    Variable::new("density", "Material density", "g/cm³"),
                ],
                result_unit: "g",
                guard: "none",
                category: FormulaCategory::Process,
                source_function: "shot_weight",
            },
            Formula::CoolingTime => FormulaMetadata {
                name: "Cooling Time",
                description: "Time for the wall to cool from melt to demolding temperature",
                formula_plain: "t = s^2 / (pi^2 * a) * ln((4/pi) * (Tm - Tw) / (Te - Tw))",
                inputs: vec![
                    Variable::new("wall_thickness", "Wall thickness s", "mm"),
                    Variable::new("thermal_diffusivity", "Thermal diffusivity a", "mm²/s"),
                    Variable::new("melt_temp", "Melt temperature Tm", "°C"),
                    Variable::new("mold_temp", "Mold temperature Tw", "°C"),
                    Variable::new("eject_temp", "Ejection temperature Te", "°C"),
                ],
                result_unit: "s",
                guard: "0 if a <= 0, Te = Tw, or log argument <= 0; floored at 0",
                category: FormulaCategory::Process,
                source_function: "cooling_time",
            },
            Formula::ResidenceTime => FormulaMetadata {
                name: "Residence Time",
                description: "Time the melt spends in the heated barrel",
                formula_plain: "t_res = (m_barrel / m_shot) * t_cycle",
                inputs: vec![
                    Variable::new("barrel_capacity", "Barrel capacity (theoretical max shot volume)", "-"),
                    Variable::new("shot_weight", "Shot weight", "g"),
                    Variable::new("cycle_time", "Cycle time", "s"),
                ],
                result_unit: "s",
                guard: "0 if shot weight <= 0",
                category: FormulaCategory::Process,
                source_function: "residence_time",
            },
            Formula::ScrewSpeed => FormulaMetadata {
                name: "Screw Peripheral Speed",
                description: "Surface speed of the screw flights, relevant for shear-sensitive melts",
                formula_plain: "v = d * pi * n / 60000",
                inputs: vec![
                    Variable::new("screw_diameter", "Screw diameter", "mm"),
                    Variable::new("rpm", "Screw rotational speed", "1/min"),
                ],
                result_unit: "m/s",
                guard: "none",
                category: FormulaCategory::Process,
                source_function: "screw_speed",
            },
            Formula::DosingStroke => FormulaMetadata {
                name: "Dosing Stroke",
                description: "Screw stroke needed to meter one shot",
                formula_plain: "s = (m / rho * 1000) / (pi * (d/2)^2)",
                inputs: vec![
                    Variable::new("shot_weight", "Shot weight", "g"),
                    Variable::new("density", "Melt density", "g/cm³"),
                    Variable::new("screw_diameter", "Screw diameter", "mm"),
                ],
                result_unit: "mm",
                guard: "0 if density <= 0 or diameter <= 0",
                category: FormulaCategory::Process,
                source_function: "dosing_stroke",
            },
            Formula::FlowRatio => FormulaMetadata {
                name: "Flow Ratio",
                description: "Flow path length over wall thickness, a moldability indicator",
                formula_plain: "L/T = flow_length / wall_thickness",
                inputs: vec![
                    Variable::new("flow_length", "Longest flow path from gate", "mm"),
                    Variable::new("wall_thickness", "Wall thickness", "mm"),
                ],
                result_unit: ":1",
                guard: "0 if wall thickness <= 0",
                category: FormulaCategory::Process,
                source_function: "flow_ratio",
            },
            Formula::CycleTime => FormulaMetadata {
                name: "Cycle Time",
                description: "Total time of one molding cycle",
                formula_plain: "t = t_inj + t_cool + t_move",
                inputs: vec![
                    Variable::new("injection_time", "Injection time", "s"),
                    Variable::new("cooling_time", "Cooling time", "s"),
                    Variable::new("mold_movement_time", "Mold open/eject/close time", "s"),
                ],
                result_unit: "s",
                guard: "0 if any operand < 0",
                category: FormulaCategory::Process,
                source_function: "cycle_time",
            },
            Formula::FlowRate => FormulaMetadata {
                name: "Flow Rate",
                description: "Volumetric flow rate into the mold",
                formula_plain: "Q = V / t_inj",
                inputs: vec![
                    Variable::new("shot_volume", "Shot volume", "cm³"),
                    Variable::new("injection_time", "Injection time", "s"),
                ],
                result_unit: "cm³/s",
                guard: "0 if either operand <= 0",
                category: FormulaCategory::Process,
                source_function: "flow_rate",
            },
            Formula::ShotVsBarrel => FormulaMetadata {
                name: "Shot vs Barrel",
                description: "Shot volume as a share of barrel volume (20-80 % recommended)",
                formula_plain: "fill = V_shot / V_barrel * 100",
                inputs: vec![
                    Variable::new("shot_volume", "Shot volume", "cm³"),
                    Variable::new("barrel_volume", "Usable barrel volume", "cm³"),
                ],
                result_unit: "%",
                guard: "0 if either operand <= 0",
                category: FormulaCategory::Process,
                source_function: "shot_vs_barrel",
            },
            Formula::MaxShotVolume => FormulaMetadata {
                name: "Theoretical Max Shot Volume",
                description: "Swept volume of the screw over a stroke of k times the bore",
                formula_plain: "V = pi * (d/2)^2 * (k * d)",
                inputs: vec![
                    Variable::new("screw_diameter", "Screw diameter", "mm"),
                    Variable::new("stroke_to_bore", "Stroke to bore ratio k", "-"),
                ],
                result_unit: "mm³",
                guard: "0 if diameter <= 0",
                category: FormulaCategory::Process,
                source_function: "theoretical_max_shot_volume",
            },
            Formula::ProjectedArea => FormulaMetadata {
                name: "Projected Area",
                description: "Projected part area approximated by its bounding rectangle",
                formula_plain: "A = l * w",
                inputs: vec![
                    Variable::new("length", "Part length", "cm"),
                    Variable::new("width", "Part width", "cm"),
                ],
                result_unit: "cm²",
                guard: "none",
                category: FormulaCategory::Area,
                source_function: "rectangle_area",
            },
            Formula::RectangleArea => FormulaMetadata {
                name: "Rectangle Area",
                description: "Area of a rectangle",
                formula_plain: "A = l * w",
                inputs: vec![
                    Variable::new("length", "Length", "cm"),
                    Variable::new("width", "Width", "cm"),
                ],
                result_unit: "cm²",
                guard: "none",
                category: FormulaCategory::Area,
                source_function: "rectangle_area",
            },
            Formula::CircleArea => FormulaMetadata {
                name: "Circle Area",
                description: "Area of a circle",
                formula_plain: "A = pi * r^2",
                inputs: vec![Variable::new("radius", "Radius", "cm")],
                result_unit: "cm²",
                guard: "none",
                category: FormulaCategory::Area,
                source_function: "circle_area",
            },
            Formula::CylinderVolume => FormulaMetadata {
                name: "Cylinder Volume",
                description: "Volume of a cylinder",
                formula_plain: "V = pi * r^2 * h",
                inputs: vec![
                    Variable::new("radius", "Base radius", "cm"),
                    Variable::new("height", "Height", "cm"),
                ],
                result_unit: "cm³",
                guard: "none",
                category: FormulaCategory::Volume,
                source_function: "cylinder_volume",
            },
            Formula::CuboidVolume => FormulaMetadata {
                name: "Cuboid Volume",
                description: "Volume of a cuboid",
                formula_plain: "V = l * w * h",
                inputs: vec![
                    Variable::new("length", "Length", "cm"),
                    Variable::new("width", "Width", "cm"),
                    Variable::new("height", "Height", "cm"),
                ],
                result_unit: "cm³",
                guard: "none",
                category: FormulaCategory::Volume,
                source_function: "cuboid_volume",
            },
            Formula::SphereVolume => FormulaMetadata {
                name: "Sphere Volume",
                description: "Volume of a sphere",
                formula_plain: "V = 4/3 * pi * r^3",
                inputs: vec![Variable::new("radius", "Radius", "cm")],
                result_unit: "cm³",
                guard: "none",
                category: FormulaCategory::Volume,
                source_function: "sphere_volume",
            },
        }
    }

    /// Get all formulas in a given category
    pub fn in_category(category: FormulaCategory) -> Vec<Formula> {
        ALL_FORMULAS
            .iter()
            .filter(|f| f.metadata().category == category)
            .copied()
            .collect()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ============================================================================
// Markdown Generation for FORMULAS.md
// ============================================================================

/// Generate the FORMULAS.md reference document.
///
/// # Example
///
/// ```rust
/// use mold_core::formulas::registry::generate_formulas_markdown;
///
/// let markdown = generate_formulas_markdown();
/// assert!(markdown.contains("Moldsheet Formula Reference"));
/// assert!(markdown.contains("Cooling Time"));
/// ```
pub fn generate_formulas_markdown() -> String {
    let mut output = String::with_capacity(12_000);

    output.push_str(
        r#"# Moldsheet Formula Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

Every formula returns 0 outside its domain instead of failing.

---

"#,
    );

    for category in FormulaCategory::all() {
        let formulas = Formula::in_category(category);
        if formulas.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in formulas {
            let meta = formula.metadata();
            output.push_str(&format!("### {} (`{}`)\n\n", meta.name, formula.id()));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));
            output.push_str(&format!("**Result:** {}\n\n", meta.result_unit));

            if !meta.inputs.is_empty() {
                output.push_str("| Argument | Description | Units |\n");
                output.push_str("|----------|-------------|-------|\n");
                for var in &meta.inputs {
                    output.push_str(&format!("| {} | {} | {} |\n", var.key, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Guard:** {}\n\n", meta.guard));
            output.push_str(&format!("**Source:** `formulas::{}`\n\n", meta.source_function));
        }
    }

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_formulas_have_metadata() {
        assert_eq!(ALL_FORMULAS.len(), 17);

        for formula in ALL_FORMULAS {
            let meta = formula.metadata();
            assert!(!meta.name.is_empty(), "Formula {:?} has no name", formula);
            assert!(!meta.formula_plain.is_empty(), "Formula {:?} has no formula", formula);
            assert!(!meta.inputs.is_empty(), "Formula {:?} has no inputs", formula);
        }
    }

    #[test]
    fn test_ids_roundtrip() {
        for formula in ALL_FORMULAS {
            assert_eq!(Formula::from_id(formula.id()).unwrap(), *formula);
        }
        assert_eq!(Formula::from_id("Cooling-Time").unwrap(), Formula::CoolingTime);
    }

    #[test]
    fn test_unknown_id() {
        let err = Formula::from_id("warpage").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FORMULA");
    }

    #[test]
    fn test_evaluate_dispatch() {
        assert_eq!(Formula::ClampingForce.evaluate(&[100.0, 1000.0]).unwrap(), 1000.0);
        assert_eq!(Formula::FlowRatio.evaluate(&[120.0, 0.0]).unwrap(), 0.0);
        assert_eq!(Formula::CycleTime.evaluate(&[-1.0, 5.0, 5.0]).unwrap(), 0.0);
        assert_eq!(Formula::CuboidVolume.evaluate(&[2.0, 3.0, 4.0]).unwrap(), 24.0);
    }

    #[test]
    fn test_evaluate_wrong_arity() {
        let err = Formula::CoolingTime.evaluate(&[2.0, 0.1]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_categories_cover_all() {
        let total: usize = FormulaCategory::all()
            .iter()
            .map(|c| Formula::in_category(*c).len())
            .sum();
        assert_eq!(total, ALL_FORMULAS.len());
        assert_eq!(Formula::in_category(FormulaCategory::Volume).len(), 3);
    }

    #[test]
    fn test_generate_markdown() {
        let md = generate_formulas_markdown();
        assert!(md.contains("## Process"));
        assert!(md.contains("## Volume"));
        assert!(md.contains("`dosing_stroke`"));
        assert!(md.contains("0 if wall thickness <= 0"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Formula::ShotVsBarrel).unwrap();
        assert_eq!(json, "\"shot_vs_barrel\"");
    }
}
