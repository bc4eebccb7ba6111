//! # Injection Molding Formulas
//!
//! Process-engineering equations for shot sizing, clamping, thermal cycle and
//! screw/barrel utilization. Every function is total: where the formula is
//! undefined (zero divisor, non-positive rate, non-positive log argument) it
//! returns 0 instead of NaN or infinity, so the pipeline can always produce a
//! complete result set.
//!
//! ## Units
//!
//! - Length: mm (wall thickness, flow length, screw diameter, stroke)
//! - Area: cm² (projected area)
//! - Volume: cm³ (shot, barrel)
//! - Mass: g, density: g/cm³
//! - Pressure: bar, force: kN
//! - Temperature: °C, time: s, thermal diffusivity: mm²/s

use std::f64::consts::PI;

use crate::units::{CubicCm, CubicMm, MetersPerSec, MmPerMin};

// =============================================================================
// SHOT & CLAMP
// =============================================================================

/// Shot weight from volume and density
///
/// # Formula
/// m = V × ρ
///
/// # Arguments
/// * `volume_cm3` - Total volume (cm³)
/// * `density` - Material density (g/cm³)
///
/// # Returns
/// Weight in grams
#[inline]
pub fn shot_weight(volume_cm3: f64, density: f64) -> f64 {
    volume_cm3 * density
}

/// Required clamping force
///
/// ```text
///   bar · cm² = 10 N/cm² · cm² = 10 N  →  /100 gives kN
/// ```
///
/// # Formula
/// F = A × p / 100
///
/// # Arguments
/// * `projected_area_cm2` - Total projected area of all cavities (cm²)
/// * `pressure_bar` - Specific injection pressure (bar)
///
/// # Returns
/// Clamping force in kN. No safety factor is applied here.
///
/// # Example
/// ```rust
/// use mold_core::formulas::molding::clamping_force;
///
/// assert_eq!(clamping_force(100.0, 1000.0), 1000.0);
/// ```
#[inline]
pub fn clamping_force(projected_area_cm2: f64, pressure_bar: f64) -> f64 {
    projected_area_cm2 * pressure_bar / 100.0
}

// =============================================================================
// THERMAL & CYCLE
// =============================================================================

/// Cooling time for a plate-like wall
///
/// # Formula
/// ```text
/// t = s² / (π² · a) · ln( (4/π) · (Tm − Tw) / (Te − Tw) )
/// ```
///
/// # Arguments
/// * `wall_thickness_mm` - Wall thickness s (mm)
/// * `diffusivity_mm2_s` - Thermal diffusivity a (mm²/s), around 0.1 for most polymers
/// * `melt_temp_c` - Melt temperature Tm (°C)
/// * `mold_temp_c` - Mold wall temperature Tw (°C)
/// * `eject_temp_c` - Demolding temperature Te (°C)
///
/// # Returns
/// Cooling time in seconds, never negative. Returns 0 when a ≤ 0,
/// Te = Tw, or the log argument is not positive.
///
/// # Example
/// ```rust
/// use mold_core::formulas::molding::cooling_time;
///
/// // Eject temperature equal to mold temperature is undefined
/// assert_eq!(cooling_time(2.0, 0.1, 230.0, 40.0, 40.0), 0.0);
/// ```
pub fn cooling_time(
    wall_thickness_mm: f64,
    diffusivity_mm2_s: f64,
    melt_temp_c: f64,
    mold_temp_c: f64,
    eject_temp_c: f64,
) -> f64 {
    if diffusivity_mm2_s <= 0.0 {
        return 0.0;
    }

    let numerator = melt_temp_c - mold_temp_c;
    let denominator = eject_temp_c - mold_temp_c;
    if denominator == 0.0 {
        return 0.0;
    }

    let log_arg = (4.0 / PI) * (numerator / denominator);
    if log_arg <= 0.0 {
        return 0.0;
    }

    let geometry = wall_thickness_mm.powi(2) / (PI * PI * diffusivity_mm2_s);
    (geometry * log_arg.ln()).max(0.0)
}

/// Total cycle time
///
/// # Formula
/// t_cycle = t_inj + t_cool + t_move
///
/// # Returns
/// Sum in seconds, or 0 if any operand is negative.
#[inline]
pub fn cycle_time(injection_s: f64, cooling_s: f64, mold_move_s: f64) -> f64 {
    if injection_s < 0.0 || cooling_s < 0.0 || mold_move_s < 0.0 {
        return 0.0;
    }
    injection_s + cooling_s + mold_move_s
}

// =============================================================================
// SCREW & BARREL
// =============================================================================

/// Screw cross-section area in mm²
///
/// # Formula
/// A = π (d/2)²
#[inline]
pub fn screw_cross_section_mm2(screw_diameter_mm: f64) -> f64 {
    PI * (screw_diameter_mm / 2.0).powi(2)
}

/// Theoretical maximum shot volume of a screw
///
/// Assumes a usable stroke of `stroke_to_bore_ratio` × d. The product is
/// bore area (mm²) times stroke (mm) and is reported as is; it also serves
/// as the barrel capacity for residence time and barrel fill.
///
/// # Formula
/// V_max = π (d/2)² · (k · d)
///
/// # Returns
/// 0 for a non-positive diameter.
///
/// # Example
/// ```rust
/// use mold_core::formulas::molding::theoretical_max_shot_volume;
///
/// let v = theoretical_max_shot_volume(40.0, 2.5);
/// assert!((v - 125_663.706).abs() < 0.001);
/// ```
pub fn theoretical_max_shot_volume(screw_diameter_mm: f64, stroke_to_bore_ratio: f64) -> f64 {
    if screw_diameter_mm <= 0.0 {
        return 0.0;
    }
    screw_cross_section_mm2(screw_diameter_mm) * stroke_to_bore_ratio * screw_diameter_mm
}

/// Dosing stroke needed for a shot
///
/// # Formula
/// ```text
/// stroke = (m / ρ · 1000) / (π (d/2)²)
/// ```
///
/// # Arguments
/// * `shot_weight_g` - Shot weight (g)
/// * `density` - Melt density (g/cm³)
/// * `screw_diameter_mm` - Screw diameter (mm)
///
/// # Returns
/// Stroke in mm, or 0 if density or diameter is not positive.
pub fn dosing_stroke(shot_weight_g: f64, density: f64, screw_diameter_mm: f64) -> f64 {
    if density <= 0.0 || screw_diameter_mm <= 0.0 {
        return 0.0;
    }
    let volume: CubicMm = CubicCm(shot_weight_g / density).into();
    volume.0 / screw_cross_section_mm2(screw_diameter_mm)
}

/// Peripheral (surface) speed of the screw
///
/// # Formula
/// v = d · π · n / 60000
///
/// # Returns
/// Speed in m/s
#[inline]
pub fn screw_speed(screw_diameter_mm: f64, rpm: f64) -> f64 {
    MetersPerSec::from(MmPerMin(screw_diameter_mm * PI * rpm)).0
}

/// Melt residence time in the barrel
///
/// # Formula
/// t_res = (C_barrel / m_shot) · t_cycle
///
/// The pipeline passes the theoretical max shot volume as `C_barrel`.
///
/// # Returns
/// Seconds, or 0 if the shot weight is not positive.
#[inline]
pub fn residence_time(barrel_capacity: f64, shot_weight_g: f64, cycle_time_s: f64) -> f64 {
    if shot_weight_g <= 0.0 {
        return 0.0;
    }
    (barrel_capacity / shot_weight_g) * cycle_time_s
}

/// Shot volume as a percentage of barrel volume
///
/// 20–80 % is the usual recommended working window.
///
/// # Returns
/// Percentage, or 0 if either volume is not positive.
#[inline]
pub fn shot_vs_barrel(shot_volume_cm3: f64, barrel_volume_cm3: f64) -> f64 {
    if shot_volume_cm3 <= 0.0 || barrel_volume_cm3 <= 0.0 {
        return 0.0;
    }
    (shot_volume_cm3 / barrel_volume_cm3) * 100.0
}

// =============================================================================
// FLOW
// =============================================================================

/// Flow path to wall thickness ratio (L/T)
///
/// # Returns
/// Dimensionless ratio, or 0 if the wall thickness is not positive.
#[inline]
pub fn flow_ratio(flow_length_mm: f64, wall_thickness_mm: f64) -> f64 {
    if wall_thickness_mm <= 0.0 {
        return 0.0;
    }
    flow_length_mm / wall_thickness_mm
}

/// Volumetric injection flow rate
///
/// # Returns
/// cm³/s, or 0 if either operand is not positive.
#[inline]
pub fn flow_rate(shot_volume_cm3: f64, injection_time_s: f64) -> f64 {
    if shot_volume_cm3 <= 0.0 || injection_time_s <= 0.0 {
        return 0.0;
    }
    shot_volume_cm3 / injection_time_s
}
