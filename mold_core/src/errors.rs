//! # Error Types
//!
//! Structured error types for mold_core. The calculation pipeline itself never
//! fails (undefined domains evaluate to 0), so these errors only come from the
//! edges of the crate: loading catalogs and configuration, naming an input
//! field or formula that does not exist, or calling a formula with the wrong
//! number of arguments.
//!
//! ## Example
//!
//! ```rust
//! use mold_core::errors::{CalcError, CalcResult};
//!
//! fn validate_cavities(cavities: f64) -> CalcResult<()> {
//!     if cavities < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "cavities".to_string(),
//!             value: cavities.to_string(),
//!             reason: "Cavity count cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mold_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog, configuration and registry operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by front ends.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (wrong arity, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An input field name does not exist
    #[error("Unknown input field: {field}")]
    UnknownField { field: String },

    /// Material id not found in the catalog
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// Formula id not found in the registry
    #[error("Unknown formula: {formula_id}")]
    UnknownFormula { formula_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Configuration file could not be parsed
    #[error("Config error: {reason}")]
    ConfigError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        CalcError::UnknownField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_id: material_id.into(),
        }
    }

    /// Create an UnknownFormula error
    pub fn unknown_formula(formula_id: impl Into<String>) -> Self {
        CalcError::UnknownFormula {
            formula_id: formula_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownField { .. } => "UNKNOWN_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::UnknownFormula { .. } => "UNKNOWN_FORMULA",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(e: toml::de::Error) -> Self {
        CalcError::config(e.to_string())
    }
}
