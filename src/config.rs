//! Engine configuration.

use crate::error::ConfigError;
use crate::input::InputConfig;
use crate::modal::MAX_CONTEXT_DEPTH;
use crate::navigator::ScoringConfig;
use crate::sync::DEFAULT_MAX_SYNC_PASSES;
use crate::taxonomy::TypeTaxonomy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything tunable about an [`Engine`](crate::Engine). All fields default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Type name to role lookup.
    pub taxonomy: TypeTaxonomy,

    /// Directional cost function.
    pub scoring: ScoringConfig,

    /// Button bindings and repeat timing.
    pub input: InputConfig,

    /// Bound on idle passes per `run_pending` call.
    pub max_sync_passes: usize,

    /// Bound on pushed modal and interaction contexts.
    pub max_context_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            taxonomy: TypeTaxonomy::default(),
            scoring: ScoringConfig::default(),
            input: InputConfig::default(),
            max_sync_passes: DEFAULT_MAX_SYNC_PASSES,
            max_context_depth: MAX_CONTEXT_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Parse and validate YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sync_passes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_sync_passes",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_context_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_context_depth",
                reason: "must be at least 1".into(),
            });
        }
        self.scoring
            .validate()
            .and_then(|_| self.input.validate())
            .map_err(|(field, reason)| ConfigError::Invalid { field, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::ResolvedRole;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_default() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let yaml = r#"
scoring:
  same_parent_bonus: 0.5
max_sync_passes: 3
taxonomy:
  leaf_types: [Knob]
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.scoring.same_parent_bonus, 0.5);
        assert_eq!(config.scoring.alignment_bonus, 0.8);
        assert_eq!(config.max_sync_passes, 3);
        assert_eq!(config.taxonomy.resolve("Knob"), Some(ResolvedRole::Leaf));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_yaml_str("max_sync_passes: 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_sync_passes",
                ..
            }
        ));

        let err = EngineConfig::from_yaml_str("scoring: { epsilon: 0.0 }").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "scoring.epsilon",
                ..
            }
        ));

        let err = EngineConfig::from_yaml_str("max_sync_passes: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_context_depth: 4").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.max_context_depth, 4);

        let err = EngineConfig::load("/nonexistent/padnav.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
