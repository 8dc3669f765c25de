//! Board layout configuration

use super::ConfigError;
use crate::render::DEFAULT_MAX_TICKS;
use crate::status::ServiceKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One service card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Stable key; derived from `name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    pub name: String,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The configured key, or one derived from the display name.
    pub fn key(&self) -> Result<ServiceKey, crate::status::KeyError> {
        match &self.id {
            Some(id) => ServiceKey::parse(id),
            None => Ok(ServiceKey::derive(&self.name)),
        }
    }
}

/// Board layout and chart settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Services to lay out, in order. Empty means "whatever the endpoint
    /// reports".
    pub services: Vec<ServiceConfig>,
    /// Most time-axis ticks per chart
    pub max_ticks: usize,
    /// State changes listed under each chart
    pub recent_changes: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            max_ticks: DEFAULT_MAX_TICKS,
            recent_changes: 3,
        }
    }
}

impl BoardConfig {
    /// Resolve every service to `(key, name)`, rejecting bad and duplicate
    /// keys.
    pub fn resolved_services(&self) -> Result<Vec<(ServiceKey, String)>, ConfigError> {
        let mut seen: HashMap<ServiceKey, usize> = HashMap::new();
        let mut resolved = Vec::with_capacity(self.services.len());

        for (i, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("board.services[{}].name", i),
                    message: "name cannot be empty".to_string(),
                });
            }
            let key = service.key().map_err(|source| ConfigError::InvalidKey {
                field: format!("board.services[{}].id", i),
                source,
            })?;
            if let Some(&first) = seen.get(&key) {
                return Err(ConfigError::DuplicateKey {
                    key: key.to_string(),
                    first,
                    second: i,
                });
            }
            seen.insert(key.clone(), i);
            resolved.push((key, service.name.clone()));
        }

        Ok(resolved)
    }
}
