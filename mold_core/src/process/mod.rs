//! # Process Calculation
//!
//! The operator input record, the calculation pipeline built on it and the
//! limit validator that grades the results.
//!
//! - [`inputs`] - `ProcessInputs`, field-by-field mutation, lenient parsing
//! - [`pipeline`] - `compute` and `ComputedResults`
//! - [`validation`] - `classify`, `validate` and the tri-state `LimitStatus`

pub mod inputs;
pub mod pipeline;
pub mod validation;

pub use inputs::{
    parse_number,
    CostingInputs,
    InputField,
    MaterialInputs,
    MoldInputs,
    ProcessInputs,
    ProcessSettings,
};
pub use pipeline::{compute, ComputedResults};
pub use validation::{classify, validate, Limit, LimitStatus, ValidationCheck};
