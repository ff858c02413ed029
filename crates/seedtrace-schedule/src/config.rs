//! Projector configuration
//!
//! ```toml
//! harvest_offset_days = 63
//! transplant_offset_days = 14
//! drying_check_offset_days = 7
//!
//! [[audit_catalogue]]
//! offset_days = 3
//! kind = "inspection"
//! label = "Site inspection: Greenhouse 2"
//! ```

use crate::audit::{AuditItem, AUDIT_CATALOGUE};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Days from planting to expected harvest
pub const DEFAULT_HARVEST_OFFSET_DAYS: i64 = 60;
/// Days from planting to transplant
pub const DEFAULT_TRANSPLANT_OFFSET_DAYS: i64 = 14;
/// Days from harvest to drying check
pub const DEFAULT_DRYING_CHECK_OFFSET_DAYS: i64 = 5;

/// Settings for [`crate::ScheduleProjector`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub harvest_offset_days: i64,
    pub transplant_offset_days: i64,
    pub drying_check_offset_days: i64,
    /// Replaces [`AUDIT_CATALOGUE`] when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_catalogue: Option<Vec<AuditItem>>,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            harvest_offset_days: DEFAULT_HARVEST_OFFSET_DAYS,
            transplant_offset_days: DEFAULT_TRANSPLANT_OFFSET_DAYS,
            drying_check_offset_days: DEFAULT_DRYING_CHECK_OFFSET_DAYS,
            audit_catalogue: None,
        }
    }
}

impl ProjectorConfig {
    /// Set days to expected harvest
    #[must_use]
    pub fn with_harvest_offset(mut self, days: i64) -> Self {
        self.harvest_offset_days = days;
        self
    }

    /// Set days to transplant
    #[must_use]
    pub fn with_transplant_offset(mut self, days: i64) -> Self {
        self.transplant_offset_days = days;
        self
    }

    /// Set days to drying check
    #[must_use]
    pub fn with_drying_check_offset(mut self, days: i64) -> Self {
        self.drying_check_offset_days = days;
        self
    }

    /// Replace the audit catalogue
    #[must_use]
    pub fn with_audit_catalogue(mut self, catalogue: Vec<AuditItem>) -> Self {
        self.audit_catalogue = Some(catalogue);
        self
    }

    /// Catalogue in effect
    #[must_use]
    pub fn catalogue(&self) -> &[AuditItem] {
        self.audit_catalogue.as_deref().unwrap_or(AUDIT_CATALOGUE)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] on malformed input, or a validation error.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input, or a validation error.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file
    ///
    /// # Errors
    /// Fails when the file cannot be read, has another extension, or does not
    /// parse and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?)?,
            Some("json") => Self::from_json_str(&read()?)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!("Loaded projector config from {}", path.display());
        Ok(config)
    }

    /// Check offsets and catalogue labels
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        let offsets = [
            ("harvest_offset_days", self.harvest_offset_days),
            ("transplant_offset_days", self.transplant_offset_days),
            ("drying_check_offset_days", self.drying_check_offset_days),
        ];
        if let Some((field, value)) = offsets.into_iter().find(|(_, value)| *value < 0) {
            return Err(ConfigError::NegativeOffset { field, value });
        }

        if let Some(index) = self
            .catalogue()
            .iter()
            .position(|item| item.label.trim().is_empty())
        {
            return Err(ConfigError::EmptyLabel { index });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_sixty_fourteen_five() {
        let config = ProjectorConfig::default();
        assert_eq!(config.harvest_offset_days, 60);
        assert_eq!(config.transplant_offset_days, 14);
        assert_eq!(config.drying_check_offset_days, 5);
        assert_eq!(config.catalogue().len(), AUDIT_CATALOGUE.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ProjectorConfig::from_toml_str("harvest_offset_days = 70\n").unwrap();
        assert_eq!(config, ProjectorConfig::default().with_harvest_offset(70));
    }

    #[test]
    fn toml_catalogue_override() {
        let config = ProjectorConfig::from_toml_str(
            r#"
            [[audit_catalogue]]
            offset_days = 3
            kind = "inspection"
            label = "Site inspection: Greenhouse 2"
            "#,
        )
        .unwrap();
        let catalogue = config.catalogue();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue[0].kind, ScheduleKind::Inspection);
        assert_eq!(catalogue[0].href, None);
    }

    #[test]
    fn json_config() {
        let config =
            ProjectorConfig::from_json_str(r#"{"drying_check_offset_days": 7}"#).unwrap();
        assert_eq!(config.drying_check_offset_days, 7);
        assert_eq!(config.harvest_offset_days, 60);
    }

    #[test]
    fn rejects_negative_offsets() {
        let err = ProjectorConfig::from_toml_str("transplant_offset_days = -1").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeOffset {
                field: "transplant_offset_days",
                value: -1
            }
        ));
    }

    #[test]
    fn rejects_empty_labels() {
        let err = ProjectorConfig::from_json_str(
            r#"{"audit_catalogue": [{"offset_days": 1, "kind": "audit", "label": "ok"},
                                    {"offset_days": 2, "kind": "audit", "label": "  "}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLabel { index: 1 }));
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("projector.toml");
        std::fs::write(&toml_path, "harvest_offset_days = 55").unwrap();
        assert_eq!(ProjectorConfig::load(&toml_path).unwrap().harvest_offset_days, 55);

        let json_path = dir.path().join("projector.json");
        std::fs::write(&json_path, r#"{"harvest_offset_days": 65}"#).unwrap();
        assert_eq!(ProjectorConfig::load(&json_path).unwrap().harvest_offset_days, 65);

        let yaml_path = dir.path().join("projector.yaml");
        std::fs::write(&yaml_path, "harvest_offset_days: 1").unwrap();
        assert!(matches!(
            ProjectorConfig::load(&yaml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            ProjectorConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
