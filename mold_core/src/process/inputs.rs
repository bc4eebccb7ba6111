//! # Process Inputs
//!
//! The operator-editable input record, grouped into material, mold, process
//! and costing sections. Every numeric field is a plain `f64` that is 0 when
//! unset or unparsable; the pipeline never sees a missing value.
//!
//! Front ends mutate the record one field at a time through [`InputField`]:
//!
//! ```rust
//! use mold_core::process::{InputField, ProcessInputs};
//!
//! let mut inputs = ProcessInputs::session_defaults();
//! inputs.set_raw(InputField::Cavities, "4");
//! inputs.set_raw(InputField::PartVolume, "12,5 cm3"); // unparsable -> leading "12"
//! inputs.set_raw(InputField::WallThickness, "n/a");   // unparsable -> 0
//!
//! assert_eq!(inputs.mold.cavities, 4.0);
//! assert_eq!(inputs.mold.part_volume, 12.0);
//! assert_eq!(inputs.mold.wall_thickness, 0.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CalcError;

// ============================================================================
// Lenient Number Parsing
// ============================================================================

/// Parse the leading number of a string, 0 if there is none.
///
/// Accepts surrounding whitespace, an optional exponent and trailing text
/// ("2.5 mm" → 2.5, "1e3 g" → 1000). Non-finite results become 0.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if let Ok(v) = text.parse::<f64>() {
        return if v.is_finite() { v } else { 0.0 };
    }

    let bytes = text.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return 0.0;
    }

    // Exponent counts only with at least one digit after it
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let digits = bytes[j..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            end = j + digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Deserialize a number that may arrive as a JSON number, a string or null.
/// Any other JSON value reads as 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(v)) if v.is_finite() => v,
        Some(Raw::Text(s)) => parse_number(&s),
        _ => 0.0,
    })
}

/// Deserialize a flag from a JSON bool, a number (non-zero is set) or text
/// such as "yes". Anything else reads as unset.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(b)) => b,
        Some(Raw::Number(v)) => v != 0.0,
        Some(Raw::Text(s)) => parse_flag(&s),
        _ => false,
    })
}

fn parse_flag(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

// ============================================================================
// Input Record
// ============================================================================

/// Maps a numeric field to its slot in the record, borrowed as given.
macro_rules! numeric_slot {
    ($inputs:expr, $field:expr, $($borrow:tt)+) => {{
        use InputField::*;
        match $field {
            Density => Some($($borrow)+ $inputs.material.density),
            MeltTemp => Some($($borrow)+ $inputs.material.melt_temp),
            MoldTemp => Some($($borrow)+ $inputs.material.mold_temp),
            EjectTemp => Some($($borrow)+ $inputs.material.eject_temp),
            ThermalDiffusivity => Some($($borrow)+ $inputs.material.thermal_diffusivity),
            MaterialCost => Some($($borrow)+ $inputs.material.material_cost),
            DryerTemp => Some($($borrow)+ $inputs.material.dryer_temp),
            Cavities => Some($($borrow)+ $inputs.mold.cavities),
            PartVolume => Some($($borrow)+ $inputs.mold.part_volume),
            RunnerWeight => Some($($borrow)+ $inputs.mold.runner_weight),
            ProjectedArea => Some($($borrow)+ $inputs.mold.projected_area),
            WallThickness => Some($($borrow)+ $inputs.mold.wall_thickness),
            FlowLength => Some($($borrow)+ $inputs.mold.flow_length),
            SafetyFactor => Some($($borrow)+ $inputs.mold.safety_factor),
            MoldWeight => Some($($borrow)+ $inputs.mold.mold_weight),
            InjectionTime => Some($($borrow)+ $inputs.process.injection_time),
            CoolingTimeSet => Some($($borrow)+ $inputs.process.cooling_time_set),
            MoldMoveTime => Some($($borrow)+ $inputs.process.mold_move_time),
            EjectTime => Some($($borrow)+ $inputs.process.eject_time),
            SpecificInjectionPressure => Some($($borrow)+ $inputs.process.specific_injection_pressure),
            ScrewRpm => Some($($borrow)+ $inputs.process.screw_rpm),
            PlasticizingRate => Some($($borrow)+ $inputs.process.plasticizing_rate),
            TempControllers => Some($($borrow)+ $inputs.process.temp_controllers),
            MachineRate => Some($($borrow)+ $inputs.costing.machine_rate),
            LaborRate => Some($($borrow)+ $inputs.costing.labor_rate),
            EnergyRate => Some($($borrow)+ $inputs.costing.energy_rate),
            ScrapRate => Some($($borrow)+ $inputs.costing.scrap_rate),
            ToolInvestment => Some($($borrow)+ $inputs.costing.tool_investment),
            AnnualVolume => Some($($borrow)+ $inputs.costing.annual_volume),
            Margin => Some($($borrow)+ $inputs.costing.margin),
            Discount => Some($($borrow)+ $inputs.costing.discount),
            RobotUsed | MoldSteel => None,
        }
    }};
}

/// Material section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialInputs {
    /// Catalog id of the prefilled material, empty when none
    pub material_id: String,
    /// Density (g/cm³)
    #[serde(deserialize_with = "lenient_f64")]
    pub density: f64,
    /// Melt temperature (°C)
    #[serde(deserialize_with = "lenient_f64")]
    pub melt_temp: f64,
    /// Mold temperature (°C)
    #[serde(deserialize_with = "lenient_f64")]
    pub mold_temp: f64,
    /// Demolding temperature (°C)
    #[serde(deserialize_with = "lenient_f64")]
    pub eject_temp: f64,
    /// Thermal diffusivity (mm²/s)
    #[serde(deserialize_with = "lenient_f64")]
    pub thermal_diffusivity: f64,
    /// Material price (€/kg)
    #[serde(deserialize_with = "lenient_f64")]
    pub material_cost: f64,
    /// Dryer temperature (°C), informational
    #[serde(deserialize_with = "lenient_f64")]
    pub dryer_temp: f64,
}

/// Mold section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoldInputs {
    #[serde(deserialize_with = "lenient_f64")]
    pub cavities: f64,
    /// Volume of one part (cm³)
    #[serde(deserialize_with = "lenient_f64")]
    pub part_volume: f64,
    /// Runner weight per shot (g)
    #[serde(deserialize_with = "lenient_f64")]
    pub runner_weight: f64,
    /// Total projected area (cm²)
    #[serde(deserialize_with = "lenient_f64")]
    pub projected_area: f64,
    /// Wall thickness (mm)
    #[serde(deserialize_with = "lenient_f64")]
    pub wall_thickness: f64,
    /// Longest flow path (mm)
    #[serde(deserialize_with = "lenient_f64")]
    pub flow_length: f64,
    /// Multiplier applied to the clamping force
    #[serde(deserialize_with = "lenient_f64")]
    pub safety_factor: f64,
    /// Mold steel grade, informational (e.g., "1.2311")
    pub mold_steel: String,
    /// Mold weight (kg), informational
    #[serde(deserialize_with = "lenient_f64")]
    pub mold_weight: f64,
}

/// Cycle and process section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessSettings {
    /// Injection time (s)
    #[serde(deserialize_with = "lenient_f64")]
    pub injection_time: f64,
    /// Operator cooling time; the larger of this and the computed one is used (s)
    #[serde(deserialize_with = "lenient_f64")]
    pub cooling_time_set: f64,
    /// Mold open/close time (s)
    #[serde(deserialize_with = "lenient_f64")]
    pub mold_move_time: f64,
    /// Ejection time (s)
    #[serde(deserialize_with = "lenient_f64")]
    pub eject_time: f64,
    /// Specific injection pressure (bar)
    #[serde(deserialize_with = "lenient_f64")]
    pub specific_injection_pressure: f64,
    /// Screw speed (1/min)
    #[serde(deserialize_with = "lenient_f64")]
    pub screw_rpm: f64,
    /// Plasticizing rate (g/s)
    #[serde(deserialize_with = "lenient_f64")]
    pub plasticizing_rate: f64,
    #[serde(deserialize_with = "lenient_bool")]
    pub robot_used: bool,
    /// Number of mold temperature controllers, informational
    #[serde(deserialize_with = "lenient_f64")]
    pub temp_controllers: f64,
}

/// Costing section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostingInputs {
    /// Machine hour rate (€/h)
    #[serde(deserialize_with = "lenient_f64")]
    pub machine_rate: f64,
    /// Labor rate (€/h)
    #[serde(deserialize_with = "lenient_f64")]
    pub labor_rate: f64,
    /// Energy rate (€/kWh)
    #[serde(deserialize_with = "lenient_f64")]
    pub energy_rate: f64,
    /// Scrap rate (%)
    #[serde(deserialize_with = "lenient_f64")]
    pub scrap_rate: f64,
    /// Tool investment (€)
    #[serde(deserialize_with = "lenient_f64")]
    pub tool_investment: f64,
    /// Parts per year
    #[serde(deserialize_with = "lenient_f64")]
    pub annual_volume: f64,
    /// Desired margin (%)
    #[serde(deserialize_with = "lenient_f64")]
    pub margin: f64,
    /// Volume discount (%)
    #[serde(deserialize_with = "lenient_f64")]
    pub discount: f64,
}

/// Complete operator input record.
///
/// `Default` is all zeros (and no robot); use [`ProcessInputs::session_defaults`]
/// for the values a new process sheet starts with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessInputs {
    pub material: MaterialInputs,
    pub mold: MoldInputs,
    pub process: ProcessSettings,
    pub costing: CostingInputs,
}

impl ProcessInputs {
    /// Starting values of a fresh process sheet.
    pub fn session_defaults() -> Self {
        ProcessInputs {
            material: MaterialInputs {
                material_id: String::new(),
                density: 0.0,
                melt_temp: 0.0,
                mold_temp: 0.0,
                eject_temp: 100.0,
                thermal_diffusivity: 0.1,
                material_cost: 0.0,
                dryer_temp: 80.0,
            },
            mold: MoldInputs {
                cavities: 1.0,
                safety_factor: 1.2,
                mold_steel: "1.2311".to_string(),
                ..Default::default()
            },
            process: ProcessSettings {
                injection_time: 1.5,
                cooling_time_set: 0.0,
                mold_move_time: 2.5,
                eject_time: 1.0,
                specific_injection_pressure: 1000.0,
                screw_rpm: 60.0,
                plasticizing_rate: 25.0,
                robot_used: false,
                temp_controllers: 1.0,
            },
            costing: CostingInputs {
                machine_rate: 65.0,
                labor_rate: 45.0,
                energy_rate: 0.25,
                scrap_rate: 2.0,
                tool_investment: 25_000.0,
                annual_volume: 100_000.0,
                margin: 20.0,
                discount: 0.0,
            },
        }
    }

    /// Set a field from a number. Non-finite values are stored as 0.
    ///
    /// The robot flag is set when `value != 0`; the mold steel grade takes
    /// the number's text form.
    pub fn set(&mut self, field: InputField, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        match field {
            InputField::RobotUsed => self.process.robot_used = value != 0.0,
            InputField::MoldSteel => self.mold.mold_steel = value.to_string(),
            _ => {
                if let Some(slot) = self.numeric_mut(field) {
                    *slot = value;
                }
            }
        }
    }

    /// Set a field from operator text, parsed leniently.
    pub fn set_raw(&mut self, field: InputField, text: &str) {
        match field {
            InputField::RobotUsed => self.process.robot_used = parse_flag(text),
            InputField::MoldSteel => self.mold.mold_steel = text.trim().to_string(),
            _ => self.set(field, parse_number(text)),
        }
    }

    /// Current numeric value of a field (robot flag as 0/1, text fields as 0)
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::RobotUsed => {
                if self.process.robot_used {
                    1.0
                } else {
                    0.0
                }
            }
            InputField::MoldSteel => 0.0,
            _ => self.numeric(field).unwrap_or(0.0),
        }
    }

    fn numeric(&self, field: InputField) -> Option<f64> {
        numeric_slot!(self, field, &).copied()
    }

    fn numeric_mut(&mut self, field: InputField) -> Option<&mut f64> {
        numeric_slot!(self, field, &mut)
    }
}

// ============================================================================
// Field Names
// ============================================================================

/// Every operator-editable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    // Material
    Density,
    MeltTemp,
    MoldTemp,
    EjectTemp,
    ThermalDiffusivity,
    MaterialCost,
    DryerTemp,
    // Mold
    Cavities,
    PartVolume,
    RunnerWeight,
    ProjectedArea,
    WallThickness,
    FlowLength,
    SafetyFactor,
    MoldSteel,
    MoldWeight,
    // Process
    InjectionTime,
    CoolingTimeSet,
    MoldMoveTime,
    EjectTime,
    SpecificInjectionPressure,
    ScrewRpm,
    PlasticizingRate,
    RobotUsed,
    TempControllers,
    // Costing
    MachineRate,
    LaborRate,
    EnergyRate,
    ScrapRate,
    ToolInvestment,
    AnnualVolume,
    Margin,
    Discount,
}

impl InputField {
    pub const ALL: [InputField; 33] = [
        InputField::Density,
        InputField::MeltTemp,
        InputField::MoldTemp,
        InputField::EjectTemp,
        InputField::ThermalDiffusivity,
        InputField::MaterialCost,
        InputField::DryerTemp,
        InputField::Cavities,
        InputField::PartVolume,
        InputField::RunnerWeight,
        InputField::ProjectedArea,
        InputField::WallThickness,
        InputField::FlowLength,
        InputField::SafetyFactor,
        InputField::MoldSteel,
        InputField::MoldWeight,
        InputField::InjectionTime,
        InputField::CoolingTimeSet,
        InputField::MoldMoveTime,
        InputField::EjectTime,
        InputField::SpecificInjectionPressure,
        InputField::ScrewRpm,
        InputField::PlasticizingRate,
        InputField::RobotUsed,
        InputField::TempControllers,
        InputField::MachineRate,
        InputField::LaborRate,
        InputField::EnergyRate,
        InputField::ScrapRate,
        InputField::ToolInvestment,
        InputField::AnnualVolume,
        InputField::Margin,
        InputField::Discount,
    ];

    /// snake_case name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            InputField::Density => "density",
            InputField::MeltTemp => "melt_temp",
            InputField::MoldTemp => "mold_temp",
            InputField::EjectTemp => "eject_temp",
            InputField::ThermalDiffusivity => "thermal_diffusivity",
            InputField::MaterialCost => "material_cost",
            InputField::DryerTemp => "dryer_temp",
            InputField::Cavities => "cavities",
            InputField::PartVolume => "part_volume",
            InputField::RunnerWeight => "runner_weight",
            InputField::ProjectedArea => "projected_area",
            InputField::WallThickness => "wall_thickness",
            InputField::FlowLength => "flow_length",
            InputField::SafetyFactor => "safety_factor",
            InputField::MoldSteel => "mold_steel",
            InputField::MoldWeight => "mold_weight",
            InputField::InjectionTime => "injection_time",
            InputField::CoolingTimeSet => "cooling_time_set",
            InputField::MoldMoveTime => "mold_move_time",
            InputField::EjectTime => "eject_time",
            InputField::SpecificInjectionPressure => "specific_injection_pressure",
            InputField::ScrewRpm => "screw_rpm",
            InputField::PlasticizingRate => "plasticizing_rate",
            InputField::RobotUsed => "robot_used",
            InputField::TempControllers => "temp_controllers",
            InputField::MachineRate => "machine_rate",
            InputField::LaborRate => "labor_rate",
            InputField::EnergyRate => "energy_rate",
            InputField::ScrapRate => "scrap_rate",
            InputField::ToolInvestment => "tool_investment",
            InputField::AnnualVolume => "annual_volume",
            InputField::Margin => "margin",
            InputField::Discount => "discount",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputField {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        InputField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| CalcError::unknown_field(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let inputs = ProcessInputs::default();
        for field in InputField::ALL {
            assert_eq!(inputs.get(field), 0.0, "{} should default to 0", field);
        }
        assert!(!inputs.process.robot_used);
    }

    #[test]
    fn test_session_defaults() {
        let inputs = ProcessInputs::session_defaults();
        assert_eq!(inputs.material.eject_temp, 100.0);
        assert_eq!(inputs.mold.cavities, 1.0);
        assert_eq!(inputs.mold.safety_factor, 1.2);
        assert_eq!(inputs.process.specific_injection_pressure, 1000.0);
        assert_eq!(inputs.costing.annual_volume, 100_000.0);
        assert_eq!(inputs.mold.mold_steel, "1.2311");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2.5"), 2.5);
        assert_eq!(parse_number("  40 mm "), 40.0);
        assert_eq!(parse_number("-3.5x"), -3.5);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
    }

    #[test]
    fn test_parse_number_exponent() {
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("2.5e-1 mm"), 0.25);
        assert_eq!(parse_number("4E+2kg"), 400.0);
        assert_eq!(parse_number("3e"), 3.0);
        assert_eq!(parse_number("3e-x"), 3.0);
        assert_eq!(parse_number("12.5 mm"), 12.5);
        assert_eq!(parse_number("1e999 g"), 0.0);
    }

    #[test]
    fn test_set_and_get() {
        let mut inputs = ProcessInputs::default();
        inputs.set(InputField::ProjectedArea, 50.0);
        inputs.set(InputField::Margin, f64::NAN);
        assert_eq!(inputs.mold.projected_area, 50.0);
        assert_eq!(inputs.get(InputField::ProjectedArea), 50.0);
        assert_eq!(inputs.costing.margin, 0.0);
    }

    #[test]
    fn test_set_raw_robot_flag() {
        let mut inputs = ProcessInputs::default();
        inputs.set_raw(InputField::RobotUsed, "yes");
        assert!(inputs.process.robot_used);
        inputs.set_raw(InputField::RobotUsed, "0");
        assert!(!inputs.process.robot_used);
        inputs.set(InputField::RobotUsed, 1.0);
        assert_eq!(inputs.get(InputField::RobotUsed), 1.0);
    }

    #[test]
    fn test_set_raw_text_field() {
        let mut inputs = ProcessInputs::default();
        inputs.set_raw(InputField::MoldSteel, " 1.2738 ");
        assert_eq!(inputs.mold.mold_steel, "1.2738");
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in InputField::ALL {
            assert_eq!(field.name().parse::<InputField>().unwrap(), field);
        }
        assert_eq!("Screw-RPM".parse::<InputField>().unwrap(), InputField::ScrewRpm);
        assert_eq!("cavitiez".parse::<InputField>().unwrap_err().error_code(), "UNKNOWN_FIELD");
    }

    #[test]
    fn test_deserialize_missing_and_unparsable() {
        let json = r#"{
            "mold": { "cavities": "4", "part_volume": "oops", "wall_thickness": null },
            "costing": { "margin": 15 }
        }"#;
        let inputs: ProcessInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.mold.cavities, 4.0);
        assert_eq!(inputs.mold.part_volume, 0.0);
        assert_eq!(inputs.mold.wall_thickness, 0.0);
        assert_eq!(inputs.costing.margin, 15.0);
        assert_eq!(inputs.material.density, 0.0);
    }

    #[test]
    fn test_deserialize_other_json_values_read_as_zero() {
        let inputs: ProcessInputs = serde_json::from_str(r#"{"mold":{"cavities":true}}"#).unwrap();
        assert_eq!(inputs.mold.cavities, 0.0);

        let json = r#"{"mold":{"part_volume":[1,2],"projected_area":{"cm2":50}}}"#;
        let inputs: ProcessInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.mold.part_volume, 0.0);
        assert_eq!(inputs.mold.projected_area, 0.0);
    }

    #[test]
    fn test_deserialize_lenient_robot_flag() {
        let flag = |json: &str| serde_json::from_str::<ProcessInputs>(json).unwrap().process.robot_used;
        assert!(flag(r#"{"process":{"robot_used":"yes"}}"#));
        assert!(flag(r#"{"process":{"robot_used":true}}"#));
        assert!(flag(r#"{"process":{"robot_used":1}}"#));
        assert!(!flag(r#"{"process":{"robot_used":"no"}}"#));
        assert!(!flag(r#"{"process":{"robot_used":0}}"#));
        assert!(!flag(r#"{"process":{"robot_used":null}}"#));
        assert!(!flag(r#"{"process":{"robot_used":[true]}}"#));
        assert!(!flag(r#"{"process":{}}"#));
    }

    #[test]
    fn test_serde_roundtrip() {
        let inputs = ProcessInputs::session_defaults();
        let json = serde_json::to_string(&inputs).unwrap();
        let back: ProcessInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(inputs, back);
    }
}
