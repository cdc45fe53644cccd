use indexmap::IndexMap;
use k8s_openapi::{
    api::core::v1::{Affinity, Container, Pod, PodSpec, PodTemplateSpec, Volume},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use snafu::Snafu;
use tracing::{debug, instrument};

use crate::{
    builder::meta::ObjectMetaBuilder,
    config::{AffinityConfig, PodConfig},
    metadata::ObjectMetaExt,
};

pub mod affinity;
pub mod container;
pub mod env;
pub mod lifecycle;
pub mod probe;
pub mod resources;
pub mod security;
pub mod volume;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display("container name {container_name:?} is already used in the pod"))]
    ContainerNameCollision { container_name: String },

    #[snafu(display(
        "Colliding volume name {colliding_volume_name:?} in volumes with different content"
    ))]
    VolumeNameCollision { colliding_volume_name: String },
}

/// A builder to build [`Pod`] or [`PodTemplateSpec`] objects.
///
/// Volumes are kept in an [`IndexMap`] so they are emitted in insertion order while still being
/// looked up by name.
#[derive(Clone, Debug, Default)]
pub struct PodBuilder {
    metadata: ObjectMeta,
    containers: Vec<Container>,
    init_containers: Option<Vec<Container>>,
    volumes: IndexMap<String, Volume>,
    service_account_name: Option<String>,
    affinity: Affinity,
    node_name: Option<String>,
    host_network: Option<bool>,
    restart_policy: Option<String>,
    termination_grace_period_seconds: Option<i64>,
}

impl PodBuilder {
    /// Creates a pod seeded with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).build(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &PodConfig) -> Self {
        let mut builder = Self {
            metadata: ObjectMetaBuilder::new()
                .name(&config.name)
                .namespace_opt(config.namespace.clone())
                .build(),
            ..Self::default()
        };
        if let Some(service_account) = &config.service_account {
            builder.service_account_name(service_account);
        }
        if let Some(restart_policy) = config.restart_policy {
            builder.restart_policy(restart_policy.to_string());
        }
        builder.termination_grace_period_seconds = config.termination_grace_period_seconds;
        builder.node_name.clone_from(&config.node_name);
        builder.host_network = config.host_network;
        builder
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    pub fn service_account_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.service_account_name = Some(value.into());
        self
    }

    pub fn restart_policy(&mut self, restart_policy: impl Into<String>) -> &mut Self {
        self.restart_policy = Some(restart_policy.into());
        self
    }

    pub fn node_name(&mut self, node_name: impl Into<String>) -> &mut Self {
        self.node_name = Some(node_name.into());
        self
    }

    pub fn host_network(&mut self, host_network: bool) -> &mut Self {
        self.host_network = Some(host_network);
        self
    }

    pub fn add_container(&mut self, container: Container) -> &mut Self {
        self.containers.push(container);
        self
    }

    /// Adds the init container unless its name is already taken by a container or another init
    /// container of this pod.
    #[instrument(skip_all, fields(container_name = %container.name))]
    pub fn add_init_container(&mut self, container: Container) -> Result<&mut Self> {
        let init_containers = self.init_containers.as_deref().unwrap_or_default();
        if self
            .containers
            .iter()
            .chain(init_containers)
            .any(|existing| existing.name == container.name)
        {
            debug!("Rejecting init container with a colliding name");
            return ContainerNameCollisionSnafu {
                container_name: container.name,
            }
            .fail();
        }

        self.init_containers
            .get_or_insert_with(Vec::new)
            .push(container);
        Ok(self)
    }

    /// Adding a volume that is equal to an already present volume of the same name is a no-op.
    pub fn add_volume(&mut self, volume: Volume) -> Result<&mut Self> {
        if let Some(existing_volume) = self.volumes.get(&volume.name) {
            if existing_volume != &volume {
                let colliding_volume_name = &volume.name;
                // We don't want to include the details in the error message, but instead trace them
                tracing::error!(
                    colliding_volume_name,
                    ?existing_volume,
                    "Colliding volume name in volumes with different content"
                );

                return VolumeNameCollisionSnafu {
                    colliding_volume_name,
                }
                .fail();
            }
        } else {
            self.volumes.insert(volume.name.clone(), volume);
        }

        Ok(self)
    }

    pub fn add_affinity(&mut self, rule: &AffinityConfig) -> &mut Self {
        affinity::add_affinity_rule(&mut self.affinity, rule);
        self
    }

    /// Returns a constructed [`Pod`]
    pub fn build(&self) -> Pod {
        Pod {
            metadata: self.metadata.clone(),
            spec: Some(self.build_spec()),
            ..Pod::default()
        }
    }

    /// Returns a [`PodTemplateSpec`], usable for building a controller
    pub fn build_template(&self) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(self.metadata.clone()),
            spec: Some(self.build_spec()),
        }
    }

    fn build_spec(&self) -> PodSpec {
        let volumes = if self.volumes.is_empty() {
            None
        } else {
            Some(self.volumes.values().cloned().collect())
        };
        let affinity = (self.affinity != Affinity::default()).then(|| self.affinity.clone());

        PodSpec {
            affinity,
            containers: self.containers.clone(),
            host_network: self.host_network,
            init_containers: self.init_containers.clone(),
            node_name: self.node_name.clone(),
            volumes,
            service_account_name: self.service_account_name.clone(),
            restart_policy: self.restart_policy.clone(),
            termination_grace_period_seconds: self.termination_grace_period_seconds,
            ..PodSpec::default()
        }
    }
}

impl ObjectMetaExt for PodBuilder {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn object_meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
