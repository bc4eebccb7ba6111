//! # Material Records
//!
//! Polymer datasheet rows as the catalog ships them: properties are free
//! text ranges ("0.90-0.92", "200-280 °C") and have to be reduced to single
//! numbers before they can prefill the process inputs.
//!
//! ```rust
//! use mold_core::catalog::material::parse_range;
//!
//! assert!((parse_range("0.90-0.92") - 0.91).abs() < 1e-9);
//! assert_eq!(parse_range("1.05"), 1.05);
//! assert_eq!(parse_range("n/a"), 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::process::inputs::{parse_number, MaterialInputs};

/// Dryer temperature used when the drying instructions name none (°C)
pub const DEFAULT_DRYER_TEMP: f64 = 80.0;

/// Ejection temperature estimate above the mold temperature (°C)
pub const EJECT_TEMP_OFFSET: f64 = 40.0;

/// Ejection temperature after clearing the material (°C)
pub const CLEARED_EJECT_TEMP: f64 = 100.0;

/// One polymer grade from the material catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Density range (g/cm³), e.g. "0.90-0.92"
    pub density: String,
    /// Melt temperature range (°C)
    #[serde(alias = "meltTemp")]
    pub melt_temp: String,
    /// Mold temperature range (°C)
    #[serde(alias = "moldTemp")]
    pub mold_temp: String,
    /// Price (€/kg)
    #[serde(default, alias = "costPerKg")]
    pub cost_per_kg: f64,
    /// Shrinkage range (%), informational
    #[serde(default)]
    pub shrinkage: String,
    /// Drying instructions, e.g. "80°C / 2-4 h"
    #[serde(default)]
    pub drying: String,
    #[serde(default, alias = "tradeNames")]
    pub trade_names: Vec<String>,
}

impl MaterialRecord {
    /// Case-insensitive substring match over name, id, category,
    /// description and trade names. An empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        [&self.name, &self.id, &self.category, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
            || self.trade_names.iter().any(|tn| tn.to_lowercase().contains(&term))
    }

    /// Leading temperature of the drying instructions, or [`DEFAULT_DRYER_TEMP`]
    pub fn dryer_temp(&self) -> f64 {
        let head = self.drying.split('°').next().unwrap_or("").trim();
        let digits: String = head.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<f64>() {
            Ok(t) if t > 0.0 => t,
            _ => DEFAULT_DRYER_TEMP,
        }
    }

    /// Copy this material's properties into the material inputs.
    ///
    /// Density and temperatures take the midpoint of their ranges and the
    /// ejection temperature is estimated as mold temperature + 40 °C.
    /// Thermal diffusivity is left as the operator set it.
    pub fn prefill(&self, inputs: &mut MaterialInputs) {
        let mold_temp = parse_range(&self.mold_temp);

        inputs.material_id = self.id.clone();
        inputs.density = parse_range(&self.density);
        inputs.melt_temp = parse_range(&self.melt_temp);
        inputs.mold_temp = mold_temp;
        inputs.eject_temp = mold_temp + EJECT_TEMP_OFFSET;
        inputs.material_cost = if self.cost_per_kg.is_finite() { self.cost_per_kg } else { 0.0 };
        inputs.dryer_temp = self.dryer_temp();
    }
}

/// Reset the material-derived inputs after the material is deselected.
pub fn clear_material(inputs: &mut MaterialInputs) {
    inputs.material_id.clear();
    inputs.density = 0.0;
    inputs.melt_temp = 0.0;
    inputs.mold_temp = 0.0;
    inputs.eject_temp = CLEARED_EJECT_TEMP;
    inputs.material_cost = 0.0;
    inputs.dryer_temp = DEFAULT_DRYER_TEMP;
}

/// Reduce a range string to one number.
///
/// "a-b" gives the midpoint, anything else its leading number, and
/// unparsable text gives 0.
pub fn parse_range(text: &str) -> f64 {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() == 2 && !parts[0].trim().is_empty() {
        let low = parse_number(parts[0]);
        let high = parse_number(parts[1]);
        return (low + high) / 2.0;
    }
    parse_number(text)
}
