//! # Unit Types
//!
//! Type-safe wrappers for the fixed unit system used by the engine. These are
//! plain f64 newtypes that serialize as bare numbers; they exist for the few
//! places where the formulas cross a unit boundary: cm³ → mm³ for the dosing
//! stroke, g → kg for material pricing and mm/min → m/s for screw speed.
//!
//! ## Unit System
//!
//! - Length: millimeters (mm)
//! - Area: square centimeters (cm²)
//! - Volume: cubic centimeters (cm³), cubic millimeters (mm³) for screw geometry
//! - Mass: grams (g), kilograms (kg) for material pricing
//! - Temperature: °C, time: s, force: kN, pressure: bar, currency: €
//!
//! ## Example
//!
//! ```rust
//! use mold_core::units::{CubicCm, CubicMm, Grams, Kilograms};
//!
//! let shot = CubicCm(25.0);
//! let shot_mm3: CubicMm = shot.into();
//! assert_eq!(shot_mm3.0, 25_000.0);
//!
//! let kg: Kilograms = Grams(250.0).into();
//! assert_eq!(kg.0, 0.25);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCm(pub f64);

/// Volume in cubic millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMm(pub f64);

impl From<CubicCm> for CubicMm {
    fn from(cm3: CubicCm) -> Self {
        CubicMm(cm3.0 * 1000.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / 1000.0)
    }
}

// ============================================================================
// Speed Units
// ============================================================================

/// Linear speed in millimeters per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MmPerMin(pub f64);

/// Linear speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSec(pub f64);

impl From<MmPerMin> for MetersPerSec {
    fn from(v: MmPerMin) -> Self {
        MetersPerSec(v.0 / 60_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm3_to_mm3() {
        let mm3: CubicMm = CubicCm(1.5).into();
        assert_eq!(mm3.0, 1500.0);
    }

    #[test]
    fn test_grams_to_kilograms() {
        let kg: Kilograms = Grams(1250.0).into();
        assert_eq!(kg.0, 1.25);
    }

    #[test]
    fn test_surface_speed_conversion() {
        let v: MetersPerSec = MmPerMin(60_000.0).into();
        assert_eq!(v.0, 1.0);
    }

    #[test]
    fn test_serialization() {
        let v = CubicCm(12.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: CubicCm = serde_json::from_str(&json).unwrap();
        assert_eq!(v, roundtrip);
    }
}
