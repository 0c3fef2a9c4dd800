//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::error::AvmError;

/// Host-tunable settings for an [`Avm`](crate::Avm).
///
/// Missing fields take their defaults, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvmConfig {
    /// Reported by `Stage.width`
    pub stage_width: f64,
    /// Reported by `Stage.height`
    pub stage_height: f64,
    /// Nested scripted calls allowed before `AvmError::CallDepth`
    pub max_call_depth: usize,
}

impl Default for AvmConfig {
    fn default() -> Self {
        Self {
            stage_width: 1024.0,
            stage_height: 768.0,
            max_call_depth: 256,
        }
    }
}

impl AvmConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(source: &str) -> Result<Self, AvmError> {
        serde_json::from_str(source)
            .map_err(|e| AvmError::host_error(format!("invalid AVM configuration: {}", e)))
    }

    pub fn to_json(&self) -> Result<String, AvmError> {
        serde_json::to_string(self)
            .map_err(|e| AvmError::internal_error(format!("serializing configuration: {}", e)))
    }
}
