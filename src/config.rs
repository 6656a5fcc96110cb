//! Resolver settings
//!
//! Loaded from YAML; the path comes from `ENTITY_RESOLVER_CONFIG` and
//! defaults to `config/resolver.yaml`.
//!
//! ```yaml
//! roster_path: data/roster.json
//! aliases_path: data/aliases.json
//! supplier: { floor: 3, ratio: 0.3 }
//! employee: { floor: 4, ratio: 0.4 }
//! max_alternates: 5
//! alternate_slack: 0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entity_linking::{
    EntityKind, Resolver, ResolverConfig, ThresholdPolicy, DEFAULT_MAX_ALTERNATES,
};
use crate::error::ConfigError;

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "ENTITY_RESOLVER_CONFIG";

/// Default settings path
pub const DEFAULT_CONFIG_PATH: &str = "config/resolver.yaml";

/// Upper bound for `max_alternates`
const MAX_ALTERNATES_LIMIT: usize = 50;

/// Upper bound for `alternate_slack`
const ALTERNATE_SLACK_LIMIT: usize = 20;

/// Root settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// JSON roster with supplier and employee rows
    pub roster_path: PathBuf,
    /// Optional JSON alias table
    #[serde(default)]
    pub aliases_path: Option<PathBuf>,
    #[serde(default = "ThresholdPolicy::supplier")]
    pub supplier: ThresholdPolicy,
    #[serde(default = "ThresholdPolicy::employee")]
    pub employee: ThresholdPolicy,
    #[serde(default = "default_max_alternates")]
    pub max_alternates: usize,
    #[serde(default)]
    pub alternate_slack: usize,
}

fn default_max_alternates() -> usize {
    DEFAULT_MAX_ALTERNATES
}

impl ResolverSettings {
    /// Load from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string and validate
    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from the file named by `ENTITY_RESOLVER_CONFIG` (or the default path)
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        tracing::info!(path = %path, "Loading resolver settings");
        Self::from_file(Path::new(&path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "roster_path",
                reason: "must not be empty".to_string(),
            });
        }
        self.supplier
            .validate()
            .map_err(|e| ConfigError::Invalid {
                field: "supplier",
                reason: e.to_string(),
            })?;
        self.employee
            .validate()
            .map_err(|e| ConfigError::Invalid {
                field: "employee",
                reason: e.to_string(),
            })?;
        if self.max_alternates > MAX_ALTERNATES_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_alternates",
                reason: format!("must be at most {MAX_ALTERNATES_LIMIT}"),
            });
        }
        if self.alternate_slack > ALTERNATE_SLACK_LIMIT {
            return Err(ConfigError::Invalid {
                field: "alternate_slack",
                reason: format!("must be at most {ALTERNATE_SLACK_LIMIT}"),
            });
        }
        Ok(())
    }

    pub fn threshold(&self, kind: EntityKind) -> ThresholdPolicy {
        match kind {
            EntityKind::Supplier => self.supplier,
            EntityKind::Employee => self.employee,
        }
    }

    pub fn resolver_config(&self, kind: EntityKind) -> ResolverConfig {
        ResolverConfig {
            threshold: self.threshold(kind),
            max_alternates: self.max_alternates,
            alternate_slack: self.alternate_slack,
        }
    }

    /// Resolver for `kind`; thresholds were validated on load
    pub fn resolver(&self, kind: EntityKind) -> Result<Resolver, ConfigError> {
        Resolver::new(self.resolver_config(kind)).map_err(|e| ConfigError::Invalid {
            field: "threshold",
            reason: e.to_string(),
        })
    }
}
