//! # Engine Configuration
//!
//! The pipeline's simplified physical approximations are named constants
//! here instead of literals inside the formulas, so a shop can tune them
//! without touching the pipeline.
//!
//! Configuration is read from TOML. Every key is optional:
//!
//! ```toml
//! [constants]
//! fallback_screw_diameter_mm = 40.0
//! stroke_to_bore_ratio = 2.5
//! energy_coefficient = 0.02
//!
//! [catalog]
//! machines = "data/machines.json"
//! materials = "data/materials.json"
//! ```
//!
//! Relative catalog paths are resolved against the directory of the config
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Pipeline Constants
// ============================================================================

/// Tunable constants used by the calculation pipeline and the validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConstants {
    /// Screw diameter when no machine is resolved (mm)
    pub fallback_screw_diameter_mm: f64,
    /// Assumed maximum screw stroke as a multiple of the bore
    pub stroke_to_bore_ratio: f64,
    /// Energy cost per part = coefficient × energy rate (not physically derived)
    pub energy_coefficient: f64,
    /// Extra handling time added to the cycle when a robot is used (s)
    pub robot_handling_time_s: f64,
    /// Lower cushion bound as a fraction of max shot volume
    pub cushion_min_fraction: f64,
    /// Upper cushion bound as a fraction of max shot volume
    pub cushion_max_fraction: f64,
    /// Recommended barrel fill range (%)
    pub barrel_fill_min_pct: f64,
    pub barrel_fill_max_pct: f64,
    /// Screw peripheral speed above which shear-sensitive melts degrade (m/s)
    pub max_screw_speed_m_s: f64,
    /// Longest acceptable melt residence time (s)
    pub max_residence_time_s: f64,
    /// Flow path to wall thickness ratio above which filling is at risk
    pub max_flow_ratio: f64,
    /// A value within this fraction of a limit is classified CLOSE
    pub close_band: f64,
}

impl Default for PipelineConstants {
    fn default() -> Self {
        PipelineConstants {
            fallback_screw_diameter_mm: 40.0,
            stroke_to_bore_ratio: 2.5,
            energy_coefficient: 0.02,
            robot_handling_time_s: 1.5,
            cushion_min_fraction: 0.05,
            cushion_max_fraction: 0.15,
            barrel_fill_min_pct: 20.0,
            barrel_fill_max_pct: 80.0,
            max_screw_speed_m_s: 1.0,
            max_residence_time_s: 300.0,
            max_flow_ratio: 200.0,
            close_band: 0.10,
        }
    }
}

impl PipelineConstants {
    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> CalcResult<()> {
        let named = [
            ("fallback_screw_diameter_mm", self.fallback_screw_diameter_mm),
            ("stroke_to_bore_ratio", self.stroke_to_bore_ratio),
            ("energy_coefficient", self.energy_coefficient),
            ("robot_handling_time_s", self.robot_handling_time_s),
            ("cushion_min_fraction", self.cushion_min_fraction),
            ("cushion_max_fraction", self.cushion_max_fraction),
            ("barrel_fill_min_pct", self.barrel_fill_min_pct),
            ("barrel_fill_max_pct", self.barrel_fill_max_pct),
            ("max_screw_speed_m_s", self.max_screw_speed_m_s),
            ("max_residence_time_s", self.max_residence_time_s),
            ("max_flow_ratio", self.max_flow_ratio),
            ("close_band", self.close_band),
        ];

        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::config(format!("{} must be a non-negative number, got {}", name, value)));
            }
        }

        if self.cushion_min_fraction > self.cushion_max_fraction {
            return Err(CalcError::config("cushion_min_fraction exceeds cushion_max_fraction"));
        }
        if self.barrel_fill_min_pct > self.barrel_fill_max_pct {
            return Err(CalcError::config("barrel_fill_min_pct exceeds barrel_fill_max_pct"));
        }
        if self.close_band >= 1.0 {
            return Err(CalcError::config("close_band must be below 1.0"));
        }

        Ok(())
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Where to read the reference catalogs from. `None` uses the built-in sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSources {
    pub machines: Option<PathBuf>,
    pub materials: Option<PathBuf>,
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub constants: PipelineConstants,
    pub catalog: CatalogSources,
}

impl EngineConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mold_core::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("[constants]\nstroke_to_bore_ratio = 3.0\n").unwrap();
    /// assert_eq!(config.constants.stroke_to_bore_ratio, 3.0);
    /// assert_eq!(config.constants.fallback_screw_diameter_mm, 40.0);
    /// ```
    pub fn from_toml_str(contents: &str) -> CalcResult<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.constants.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read config", path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.catalog.machines = config.catalog.machines.map(|p| resolve_relative(base, p));
            config.catalog.materials = config.catalog.materials.map(|p| resolve_relative(base, p));
        }

        info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Serialize to TOML (used to print the effective configuration)
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = PipelineConstants::default();
        assert_eq!(c.fallback_screw_diameter_mm, 40.0);
        assert_eq!(c.stroke_to_bore_ratio, 2.5);
        assert_eq!(c.energy_coefficient, 0.02);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            [constants]
            energy_coefficient = 0.05
            barrel_fill_max_pct = 85.0
            "#,
        )
        .unwrap();
        assert_eq!(config.constants.energy_coefficient, 0.05);
        assert_eq!(config.constants.barrel_fill_max_pct, 85.0);
        assert_eq!(config.constants.barrel_fill_min_pct, 20.0);
        assert!(config.catalog.machines.is_none());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = EngineConfig::from_toml_str("[constants]\nbarrel_fill_min_pct = 90.0\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_rejects_negative() {
        let err = EngineConfig::from_toml_str("[constants]\nstroke_to_bore_ratio = -1.0\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[constants\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moldsheet.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[catalog]\nmachines = \"fleet.json\"\nmaterials = \"/srv/materials.json\"").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.catalog.machines, Some(dir.path().join("fleet.json")));
        assert_eq!(config.catalog.materials, Some(PathBuf::from("/srv/materials.json")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/moldsheet.toml")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        let back = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
