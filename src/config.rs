//! Gateway configuration file
//!
//! One JSON document describes the listener, the API keys, the models the
//! in-memory store exposes, their permission records and optional seed
//! records.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::{ApiKeyEntry, ApiKeyStore};
use crate::http_server::HttpServerConfig;
use crate::permission::{PermissionRecord, PermissionRegistry};
use crate::store::{MemoryStore, ModelSchema, ModelStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to seed {model}: {source}")]
    Seed { model: String, source: StoreError },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,

    #[serde(default)]
    pub models: Vec<ModelSchema>,

    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,

    /// Records created at startup, keyed by model
    #[serde(default)]
    pub seed: BTreeMap<String, Vec<Map<String, Value>>>,
}

impl GatewayConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: GatewayConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let mut models = HashSet::new();
        for schema in &self.models {
            schema.validate()?;
            if !models.insert(schema.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "model '{}' is declared twice",
                    schema.name
                )));
            }
        }

        for schema in &self.models {
            for (field, def) in &schema.fields {
                if let Some(comodel) = &def.comodel {
                    if !models.contains(comodel.as_str()) {
                        return Err(ConfigError::Invalid(format!(
                            "{}.{}: unknown comodel '{}'",
                            schema.name, field, comodel
                        )));
                    }
                }
            }
        }

        for record in &self.permissions {
            if !models.contains(record.model.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "permission record for unknown model '{}'",
                    record.model
                )));
            }
        }

        for model in self.seed.keys() {
            if !models.contains(model.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "seed records for unknown model '{}'",
                    model
                )));
            }
        }

        let mut key_names = HashSet::new();
        for entry in &self.api_keys {
            if entry.key_hash.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "api key '{}' has an empty key_hash",
                    entry.name
                )));
            }
            if !key_names.insert(entry.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "api key name '{}' is used twice",
                    entry.name
                )));
            }
        }

        Ok(())
    }

    /// Build the store and create the seed records.
    ///
    /// Seeds are created model by model in declaration order, so relations
    /// can point at records of models declared earlier.
    pub fn build_store(&self) -> ConfigResult<MemoryStore> {
        let store = MemoryStore::from_schemas(self.models.iter().cloned())?;

        for schema in &self.models {
            let Some(records) = self.seed.get(&schema.name) else {
                continue;
            };
            for values in records {
                store
                    .create(&schema.name, values)
                    .map_err(|source| ConfigError::Seed {
                        model: schema.name.clone(),
                        source,
                    })?;
            }
        }

        Ok(store)
    }

    pub fn build_registry(&self) -> PermissionRegistry {
        PermissionRegistry::from_records(self.permissions.iter().cloned())
    }

    pub fn build_api_keys(&self) -> ApiKeyStore {
        ApiKeyStore::new(self.api_keys.clone())
    }

    /// Number of seed records across all models
    pub fn seed_count(&self) -> usize {
        self.seed.values().map(Vec::len).sum()
    }
}
