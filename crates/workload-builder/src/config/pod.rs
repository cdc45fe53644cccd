use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::config::selector::{ExpressionRequirementConfig, SelectorConfig};

#[derive(AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, PartialEq, Serialize)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodConfig {
    pub name: String,
    pub namespace: Option<String>,
    pub service_account: Option<String>,
    pub restart_policy: Option<RestartPolicy>,
    pub termination_grace_period_seconds: Option<i64>,
    pub node_name: Option<String>,
    pub host_network: Option<bool>,
}

impl PodConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Source of a volume. Exactly one source per volume.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VolumeSourceConfig {
    EmptyDir {
        medium: Option<String>,
        size_limit: Option<String>,
    },
    ConfigMap {
        name: String,
        default_mode: Option<i32>,
    },
    Secret {
        secret_name: String,
        default_mode: Option<i32>,
        #[serde(default)]
        optional: bool,
    },
    HostPath {
        path: String,
        #[serde(rename = "hostPathType")]
        type_: Option<String>,
    },
    PersistentVolumeClaim {
        claim_name: String,
        #[serde(default)]
        read_only: bool,
    },
}

impl Default for VolumeSourceConfig {
    fn default() -> Self {
        Self::EmptyDir {
            medium: None,
            size_limit: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConfig {
    pub name: String,
    #[serde(default)]
    pub source: VolumeSourceConfig,
}

#[derive(AsRefStr, Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchedulingType {
    /// `requiredDuringSchedulingIgnoredDuringExecution`
    #[default]
    Required,
    /// `preferredDuringSchedulingIgnoredDuringExecution`, weighted by the rule's `weight`
    Preferred,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAffinityConfig {
    #[serde(default)]
    pub scheduling: SchedulingType,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub expressions: Vec<ExpressionRequirementConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAffinityConfig {
    #[serde(default)]
    pub scheduling: SchedulingType,
    #[serde(default)]
    pub weight: i32,
    pub topology_key: String,
    #[serde(default)]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub selector: SelectorConfig,
}

/// A single scheduling rule, see [`crate::builder::pod::PodBuilder::add_affinity`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AffinityConfig {
    Node(NodeAffinityConfig),
    Pod(PodAffinityConfig),
    PodAnti(PodAffinityConfig),
}
