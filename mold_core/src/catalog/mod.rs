//! # Reference Catalogs
//!
//! Machine and material reference data, loaded once and only read
//! afterwards, plus the cascading machine selector.
//!
//! ## Modules
//!
//! - [`machine`] - Machine rows and catalog browsing (filter, pagination)
//! - [`material`] - Material rows, range parsing, search and input prefill
//! - [`selector`] - Five-level cascading machine selection
//!
//! ## Example
//!
//! ```rust
//! use mold_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! assert!(!catalog.machines.is_empty());
//!
//! let abs = catalog.material("ABS").unwrap();
//! assert_eq!(abs.category, "Styrenics");
//! ```

pub mod machine;
pub mod material;
pub mod selector;

pub use machine::{MachineFilter, MachinePage, MachineRecord, DEFAULT_PAGE_SIZE};
pub use material::{clear_material, parse_range, MaterialRecord};
pub use selector::{options_at, resolve, SelectionLevel, SelectionState, SelectionValue};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CatalogSources;
use crate::errors::{CalcError, CalcResult};

const BUILTIN_MACHINES: &str = include_str!("../../data/machines.json");
const BUILTIN_MATERIALS: &str = include_str!("../../data/materials.json");

static BUILTIN: Lazy<CalcResult<Catalog>> = Lazy::new(|| Catalog::from_json_str(BUILTIN_MACHINES, BUILTIN_MATERIALS));

/// Machine and material rows in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub machines: Vec<MachineRecord>,
    pub materials: Vec<MaterialRecord>,
}

impl Catalog {
    pub fn new(machines: Vec<MachineRecord>, materials: Vec<MaterialRecord>) -> Self {
        Catalog { machines, materials }
    }

    /// The sample catalog compiled into the crate
    pub fn builtin() -> CalcResult<&'static Catalog> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parse both catalogs from JSON arrays
    pub fn from_json_str(machines_json: &str, materials_json: &str) -> CalcResult<Self> {
        let machines: Vec<MachineRecord> = serde_json::from_str(machines_json)?;
        let materials: Vec<MaterialRecord> = serde_json::from_str(materials_json)?;
        Ok(Catalog { machines, materials })
    }

    /// Load the catalogs named in the config, using the built-in sample for
    /// any source that is not given.
    pub fn load(sources: &CatalogSources) -> CalcResult<Self> {
        let machines = match &sources.machines {
            Some(path) => read_json_array(path, "machines")?,
            None => Catalog::builtin()?.machines.clone(),
        };
        let materials = match &sources.materials {
            Some(path) => read_json_array(path, "materials")?,
            None => Catalog::builtin()?.materials.clone(),
        };

        info!(machines = machines.len(), materials = materials.len(), "catalog loaded");
        Ok(Catalog { machines, materials })
    }

    /// Material by exact id
    pub fn material(&self, id: &str) -> Option<&MaterialRecord> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Material by exact id, or `MaterialNotFound`
    pub fn require_material(&self, id: &str) -> CalcResult<&MaterialRecord> {
        self.material(id).ok_or_else(|| CalcError::material_not_found(id))
    }

    /// Materials matching a search term, in catalog order
    pub fn search_materials(&self, term: &str) -> Vec<&MaterialRecord> {
        self.materials.iter().filter(|m| m.matches_search(term)).collect()
    }

    /// Materials grouped by category, categories sorted by name
    pub fn materials_by_category(&self) -> BTreeMap<&str, Vec<&MaterialRecord>> {
        let mut groups: BTreeMap<&str, Vec<&MaterialRecord>> = BTreeMap::new();
        for m in &self.materials {
            groups.entry(m.category.as_str()).or_default().push(m);
        }
        groups
    }
}

fn read_json_array<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> CalcResult<Vec<T>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error(format!("read {}", what), path.display().to_string(), e.to_string()))?;
    let rows: Vec<T> = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), rows = rows.len(), "read {} catalog", what);
    Ok(rows)
}
