//! # mold_core - Injection Molding Process & Quotation Engine
//!
//! `mold_core` derives injection molding process parameters and a per-part
//! cost quotation from machine and material reference data plus the mold and
//! part parameters an engineer types in. All inputs and outputs are
//! JSON-serializable so any front end can drive it.
//!
//! ## Design Philosophy
//!
//! - **Total**: The calculation core never fails; undefined domains give 0
//! - **Stateless**: Results are a pure function of inputs, selection and catalog
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Tunable**: Simplified approximations are named constants in [`config`]
//!
//! ## Quick Start
//!
//! ```rust
//! use mold_core::catalog::{Catalog, SelectionState};
//! use mold_core::engine::recompute;
//! use mold_core::process::{InputField, ProcessInputs};
//!
//! let catalog = Catalog::builtin().unwrap();
//!
//! let mut inputs = ProcessInputs::session_defaults();
//! catalog.material("ABS").unwrap().prefill(&mut inputs.material);
//! inputs.set(InputField::PartVolume, 10.0);
//! inputs.set(InputField::ProjectedArea, 50.0);
//! inputs.set(InputField::WallThickness, 2.0);
//!
//! let recalc = recompute(&inputs, &SelectionState::default(), catalog);
//! assert!(recalc.results.total_cycle_time > 0.0);
//! assert!(recalc.results.quoted_price > recalc.results.part_cost);
//! ```
//!
//! ## Modules
//!
//! - [`formulas`] - Pure molding, area and volume formulas plus their registry
//! - [`catalog`] - Machine and material catalogs and the cascading machine selector
//! - [`process`] - Input record, calculation pipeline and limit validator
//! - [`engine`] - The `recompute` entry point and an operator session
//! - [`config`] - Pipeline constants and TOML configuration
//! - [`report`] - Quotation report document
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod config;
pub mod engine;
pub mod errors;
pub mod formulas;
pub mod process;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Catalog, MachineRecord, MaterialRecord, SelectionLevel, SelectionState, SelectionValue};
pub use config::{EngineConfig, PipelineConstants};
pub use engine::{recompute, recompute_with, Recalculation, Session};
pub use errors::{CalcError, CalcResult};
pub use process::{ComputedResults, InputField, LimitStatus, ProcessInputs, ValidationCheck};
pub use report::{JobInfo, QuotationReport};
