use serde::{Deserialize, Serialize};

/// Gives access to the name a controller is seeded from.
pub trait NamedConfig {
    fn name(&self) -> &str;
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationControllerConfig {
    pub name: String,
    pub namespace: Option<String>,
    pub replicas: Option<i32>,
    pub min_ready_seconds: Option<i32>,
}

impl ReplicationControllerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl NamedConfig for ReplicationControllerConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// `max_unavailable` and `max_surge` take either an absolute number (`"1"`) or a percentage
/// (`"25%"`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DeploymentStrategyConfig {
    Recreate,
    RollingUpdate {
        max_unavailable: Option<String>,
        max_surge: Option<String>,
    },
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub name: String,
    pub namespace: Option<String>,
    pub replicas: Option<i32>,
    pub min_ready_seconds: Option<i32>,
    pub revision_history_limit: Option<i32>,
    pub paused: Option<bool>,
    pub strategy: Option<DeploymentStrategyConfig>,
}

impl DeploymentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl NamedConfig for DeploymentConfig {
    fn name(&self) -> &str {
        &self.name
    }
}
