use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, PartialEq, Serialize,
)]
pub enum PullPolicy {
    Always,
    IfNotPresent,
    Never,
}

/// The base of a container: identity, image and the resource envelope.
///
/// `min_*` values end up as resource requests, `max_*` values as limits. Empty strings count as
/// "not set".
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfig {
    pub name: String,
    pub image: String,
    pub pull_policy: Option<PullPolicy>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub min_cpu: Option<String>,
    pub max_cpu: Option<String>,
    pub min_mem: Option<String>,
    pub max_mem: Option<String>,
    pub uid: Option<i64>,
    pub gid: Option<i64>,
    pub privileged: Option<bool>,
    pub allow_privilege_escalation: Option<bool>,
    pub read_only_root_filesystem: Option<bool>,
}

/// Where the value of an environment entry comes from.
#[derive(AsRefStr, Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvKind {
    /// `key_or_value` is the literal value.
    #[default]
    Value,
    /// `key_or_value` is a key inside the ConfigMap `from_name`.
    ConfigMapKey,
    /// `key_or_value` is a key inside the Secret `from_name`.
    SecretKey,
    /// `key_or_value` is a downward API field path, e.g. `metadata.namespace`.
    FieldPath,
    /// Imports all keys of the ConfigMap `from_name`, `name_or_prefix` is used as prefix.
    ConfigMap,
    /// Imports all keys of the Secret `from_name`, `name_or_prefix` is used as prefix.
    Secret,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    pub name_or_prefix: String,
    #[serde(default)]
    pub kind: EnvKind,
    #[serde(default)]
    pub key_or_value: String,
    #[serde(default)]
    pub from_name: String,
}

impl EnvConfig {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name_or_prefix: name.into(),
            kind: EnvKind::Value,
            key_or_value: value.into(),
            ..Self::default()
        }
    }
}

#[derive(AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, PartialEq, Serialize)]
pub enum MountPropagation {
    None,
    HostToContainer,
    Bidirectional,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMountConfig {
    pub name: String,
    pub mount_path: String,
    pub sub_path: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    pub propagation: Option<MountPropagation>,
}

impl VolumeMountConfig {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            ..Self::default()
        }
    }
}

#[derive(AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, PartialEq, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConfig {
    pub name: Option<String>,
    pub container_port: i32,
    pub protocol: Option<Protocol>,
    pub host_port: Option<i32>,
    pub host_ip: Option<String>,
}

impl PortConfig {
    pub fn new(container_port: i32) -> Self {
        Self {
            container_port,
            ..Self::default()
        }
    }
}

#[derive(AsRefStr, Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    #[default]
    Command,
    Http,
    Https,
    Tcp,
}

/// An action used by lifecycle hooks and probes.
///
/// `command` is only used by [`ActionKind::Command`], the remaining fields only by the network
/// kinds.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(default)]
    pub kind: ActionKind,
    #[serde(default)]
    pub command: Vec<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub path: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ActionConfig {
    pub fn command(command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind: ActionKind::Command,
            command: command.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn http_get(port: i32, path: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Http,
            port: Some(port),
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// A probe. Unset timings fall back to the Kubernetes defaults.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    pub action: ActionConfig,
    #[serde(default)]
    pub initial_delay_seconds: u32,
    pub period_seconds: Option<u32>,
    pub timeout_seconds: Option<u32>,
    pub success_threshold: Option<i32>,
    pub failure_threshold: Option<i32>,
}

/// Everything needed to build one container, see [`crate::compose::build_container`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub config: ContainerConfig,
    #[serde(default)]
    pub envs: Vec<EnvConfig>,
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMountConfig>,
    pub port: Option<PortConfig>,
    pub post_start_action: Option<ActionConfig>,
    #[serde(default)]
    pub liveness_probes: Vec<ProbeConfig>,
    #[serde(default)]
    pub readiness_probes: Vec<ProbeConfig>,
}
