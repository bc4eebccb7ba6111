//! # Formula Library
//!
//! Independent, pure numeric functions used by the calculation pipeline and
//! exposed as standalone calculators. None of them share state and none of
//! them fail: each guards its own domain and returns 0 where the expression is
//! undefined.
//!
//! ## Modules
//!
//! - [`geometry`] - Area and volume primitives (rectangle, circle, cuboid, cylinder, sphere)
//! - [`molding`] - Injection molding process formulas
//! - [`registry`] - Formula metadata, id lookup and generic evaluation

pub mod geometry;
pub mod molding;
pub mod registry;

// Re-export commonly used items
pub use geometry::{circle_area, cuboid_volume, cylinder_volume, rectangle_area, sphere_volume};

pub use molding::{
    clamping_force,
    cooling_time,
    cycle_time,
    dosing_stroke,
    flow_rate,
    flow_ratio,
    residence_time,
    screw_cross_section_mm2,
    screw_speed,
    shot_vs_barrel,
    shot_weight,
    theoretical_max_shot_volume,
};

pub use registry::{
    generate_formulas_markdown,
    Formula,
    FormulaCategory,
    FormulaMetadata,
    Variable,
    ALL_FORMULAS,
};
