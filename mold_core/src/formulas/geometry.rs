//! # Area and Volume Primitives
//!
//! Euclidean formulas used to estimate projected areas and part volumes
//! from simple mold geometry. Units follow the inputs: lengths in cm give
//! cm² and cm³.
//!
//! ## Notation
//!
//! - `l` = Length
//! - `w` = Width
//! - `h` = Height
//! - `r` = Radius

// =============================================================================
// AREAS
// =============================================================================

/// Area of a rectangle
///
/// ```text
///     ┌─────────┐
///     │         │
///   w │         │
///     │         │
///     └─────────┘
///          l
/// ```
///
/// # Formula
/// A = l × w
///
/// # Example
/// ```rust
/// use mold_core::formulas::geometry::rectangle_area;
///
/// let area = rectangle_area(10.0, 5.0);
/// assert_eq!(area, 50.0);
/// ```
#[inline]
pub fn rectangle_area(length: f64, width: f64) -> f64 {
    length * width
}

/// Area of a circle
///
/// # Formula
/// A = π r²
#[inline]
pub fn circle_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

// =============================================================================
// VOLUMES
// =============================================================================

/// Volume of a cuboid
///
/// # Formula
/// V = l × w × h
#[inline]
pub fn cuboid_volume(length: f64, width: f64, height: f64) -> f64 {
    length * width * height
}

/// Volume of a cylinder
///
/// # Formula
/// V = π r² h
///
/// # Example
/// ```rust
/// use mold_core::formulas::geometry::cylinder_volume;
///
/// // r = 1 cm, h = 2 cm
/// let v = cylinder_volume(1.0, 2.0);
/// assert!((v - 6.2832).abs() < 0.001);
/// ```
#[inline]
pub fn cylinder_volume(radius: f64, height: f64) -> f64 {
    circle_area(radius) * height
}

/// Volume of a sphere
///
/// # Formula
/// V = 4/3 π r³
#[inline]
pub fn sphere_volume(radius: f64) -> f64 {
    (4.0 / 3.0) * std::f64::consts::PI * radius.powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rectangle_area() {
        assert_eq!(rectangle_area(4.0, 2.5), 10.0);
        assert_eq!(rectangle_area(0.0, 2.5), 0.0);
    }

    #[test]
    fn test_circle_area() {
        assert!((circle_area(2.0) - 4.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_cuboid_volume() {
        assert_eq!(cuboid_volume(2.0, 3.0, 4.0), 24.0);
    }

    #[test]
    fn test_cylinder_volume() {
        // V = π · 3² · 10 = 282.74
        assert!((cylinder_volume(3.0, 10.0) - 282.743).abs() < 0.001);
    }

    #[test]
    fn test_sphere_volume() {
        // V = 4/3 π · 3³ = 36π
        assert!((sphere_volume(3.0) - 36.0 * PI).abs() < 1e-9);
    }
}
