//! Configuration fragments consumed by the builders.
//!
//! Every fragment is a plain record. They derive [`serde::Deserialize`] so callers can load them
//! from whatever format they like, but nothing in this crate parses anything: fragments are
//! handed to the builders in memory.
pub mod container;
pub mod controller;
pub mod pod;
pub mod secret;
pub mod selector;

pub use container::{
    ActionConfig, ActionKind, ContainerConfig, ContainerDefinition, EnvConfig, EnvKind,
    MountPropagation, PortConfig, ProbeConfig, Protocol, PullPolicy, VolumeMountConfig,
};
pub use controller::{
    DeploymentConfig, DeploymentStrategyConfig, NamedConfig, ReplicationControllerConfig,
};
pub use pod::{
    AffinityConfig, NodeAffinityConfig, PodAffinityConfig, PodConfig, RestartPolicy,
    SchedulingType, VolumeConfig, VolumeSourceConfig,
};
pub use secret::{SecretConfig, SecretType};
pub use selector::{ExpressionRequirementConfig, SelectorConfig, SelectorOperator};
