use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvFromSource, EnvVar, Lifecycle, LifecycleHandler, Probe,
    ResourceRequirements, SecurityContext, VolumeMount,
};
use tracing::debug;

use crate::{
    builder::pod::{
        env::EnvEntry, lifecycle::Action, probe::ProbeBuilder,
        resources::ResourceRequirementsBuilder, security::SecurityContextBuilder,
        volume::VolumeMountBuilder,
    },
    config::{ActionConfig, ContainerConfig, EnvConfig, PortConfig, ProbeConfig, VolumeMountConfig},
};

/// A builder to build [`Container`] objects.
#[derive(Clone, Debug, Default)]
pub struct ContainerBuilder {
    args: Option<Vec<String>>,
    container_ports: Option<Vec<ContainerPort>>,
    command: Option<Vec<String>>,
    env: Option<Vec<EnvVar>>,
    env_from: Option<Vec<EnvFromSource>>,
    image: Option<String>,
    image_pull_policy: Option<String>,
    name: String,
    resources: Option<ResourceRequirements>,
    volume_mounts: Option<Vec<VolumeMount>>,
    readiness_probe: Option<Probe>,
    liveness_probe: Option<Probe>,
    post_start: Option<LifecycleHandler>,
    security_context: Option<SecurityContext>,
}

impl ContainerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Seeds the builder with the base configuration: image, pull policy, entrypoint, the
    /// resource envelope and the security context.
    pub fn from_config(config: &ContainerConfig) -> Self {
        let mut builder = Self::new(&config.name);
        builder.image(&config.image);
        if let Some(pull_policy) = config.pull_policy {
            builder.image_pull_policy(pull_policy.to_string());
        }
        if !config.command.is_empty() {
            builder.command(config.command.clone());
        }
        if !config.args.is_empty() {
            builder.args(config.args.clone());
        }

        let resources = ResourceRequirementsBuilder::from_container_config(config);
        if !resources.is_empty() {
            builder.resources(resources.build());
        }
        if let Some(security_context) = SecurityContextBuilder::from_container_config(config) {
            builder.security_context(security_context);
        }
        builder
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.image = Some(image.into());
        self
    }

    pub fn image_pull_policy(&mut self, image_pull_policy: impl Into<String>) -> &mut Self {
        self.image_pull_policy = Some(image_pull_policy.into());
        self
    }

    pub fn add_env(&mut self, env: &EnvConfig) -> &mut Self {
        match EnvEntry::from(env) {
            EnvEntry::Var(env_var) => self.env.get_or_insert_with(Vec::new).push(env_var),
            EnvEntry::From(env_from) => {
                self.add_env_from(env_from);
            }
        }
        self
    }

    pub fn add_env_var(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.get_or_insert_with(Vec::new).push(EnvVar {
            name: name.into(),
            value: Some(value.into()),
            ..EnvVar::default()
        });
        self
    }

    pub fn add_env_from(&mut self, env_from: EnvFromSource) -> &mut Self {
        self.env_from.get_or_insert_with(Vec::new).push(env_from);
        self
    }

    pub fn command(&mut self, command: Vec<String>) -> &mut Self {
        self.command = Some(command);
        self
    }

    pub fn args(&mut self, args: Vec<String>) -> &mut Self {
        self.args = Some(args);
        self
    }

    pub fn add_container_port(&mut self, name: impl Into<String>, port: i32) -> &mut Self {
        self.add_container_ports([ContainerPortBuilder::new(port).name(name).build()])
    }

    pub fn add_container_ports(
        &mut self,
        container_ports: impl IntoIterator<Item = ContainerPort>,
    ) -> &mut Self {
        self.container_ports
            .get_or_insert_with(Vec::new)
            .extend(container_ports);
        self
    }

    pub fn resources(&mut self, resources: ResourceRequirements) -> &mut Self {
        self.resources = Some(resources);
        self
    }

    pub fn add_volume_mount(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> &mut Self {
        self.add_volume_mounts([VolumeMountBuilder::new(name, path).build()])
    }

    pub fn add_volume_mounts(
        &mut self,
        volume_mounts: impl IntoIterator<Item = VolumeMount>,
    ) -> &mut Self {
        self.volume_mounts
            .get_or_insert_with(Vec::new)
            .extend(volume_mounts);
        self
    }

    /// Replaces any readiness probe set before.
    pub fn readiness_probe(&mut self, probe: Probe) -> &mut Self {
        self.readiness_probe = Some(probe);
        self
    }

    /// Replaces any liveness probe set before.
    pub fn liveness_probe(&mut self, probe: Probe) -> &mut Self {
        self.liveness_probe = Some(probe);
        self
    }

    pub fn post_start(&mut self, handler: LifecycleHandler) -> &mut Self {
        self.post_start = Some(handler);
        self
    }

    pub fn security_context(&mut self, context: SecurityContext) -> &mut Self {
        self.security_context = Some(context);
        self
    }

    pub fn build(&self) -> Container {
        Container {
            args: self.args.clone(),
            command: self.command.clone(),
            env: self.env.clone(),
            env_from: self.env_from.clone(),
            image: self.image.clone(),
            image_pull_policy: self.image_pull_policy.clone(),
            lifecycle: self.post_start.clone().map(|post_start| Lifecycle {
                post_start: Some(post_start),
                ..Lifecycle::default()
            }),
            resources: self.resources.clone(),
            name: self.name.clone(),
            ports: self.container_ports.clone(),
            volume_mounts: self.volume_mounts.clone(),
            readiness_probe: self.readiness_probe.clone(),
            liveness_probe: self.liveness_probe.clone(),
            security_context: self.security_context.clone(),
            ..Container::default()
        }
    }
}

/// Builds a single container from its base configuration, then applies each env entry, each
/// mount, the port, the post-start action and each probe in the given order.
///
/// There is no conflict detection at this level: duplicate env names or mount paths are passed
/// through as-is. A container holds a single probe per kind, so the last one of each kind wins.
pub fn build_container<'a>(
    config: &ContainerConfig,
    envs: impl IntoIterator<Item = &'a EnvConfig>,
    volume_mounts: impl IntoIterator<Item = &'a VolumeMountConfig>,
    port: Option<&PortConfig>,
    post_start_action: Option<&ActionConfig>,
    liveness_probes: impl IntoIterator<Item = &'a ProbeConfig>,
    readiness_probes: impl IntoIterator<Item = &'a ProbeConfig>,
) -> Container {
    let mut builder = ContainerBuilder::from_config(config);

    for env in envs {
        builder.add_env(env);
    }
    let volume_mounts: Vec<_> = volume_mounts
        .into_iter()
        .map(VolumeMountBuilder::from_config)
        .collect();
    if !volume_mounts.is_empty() {
        builder.add_volume_mounts(volume_mounts);
    }
    if let Some(port) = port {
        builder.add_container_ports([ContainerPortBuilder::from_config(port)]);
    }
    if let Some(action) = post_start_action {
        builder.post_start(Action::from(action).into_lifecycle_handler());
    }
    for probe in liveness_probes {
        if builder.liveness_probe.is_some() {
            debug!(container = config.name.as_str(), "replacing previously set liveness probe");
        }
        builder.liveness_probe(ProbeBuilder::from_config(probe));
    }
    for probe in readiness_probes {
        if builder.readiness_probe.is_some() {
            debug!(container = config.name.as_str(), "replacing previously set readiness probe");
        }
        builder.readiness_probe(ProbeBuilder::from_config(probe));
    }

    builder.build()
}

/// A builder to build [`ContainerPort`] objects.
#[derive(Clone, Debug, Default)]
pub struct ContainerPortBuilder {
    container_port: i32,
    name: Option<String>,
    host_ip: Option<String>,
    protocol: Option<String>,
    host_port: Option<i32>,
}

impl ContainerPortBuilder {
    pub fn new(container_port: i32) -> Self {
        Self {
            container_port,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PortConfig) -> ContainerPort {
        let mut builder = Self::new(config.container_port);
        if let Some(name) = &config.name {
            builder.name(name);
        }
        if let Some(protocol) = config.protocol {
            builder.protocol(protocol.to_string());
        }
        if let Some(host_port) = config.host_port {
            builder.host_port(host_port);
        }
        if let Some(host_ip) = &config.host_ip {
            builder.host_ip(host_ip);
        }
        builder.build()
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn host_ip(&mut self, host_ip: impl Into<String>) -> &mut Self {
        self.host_ip = Some(host_ip.into());
        self
    }

    pub fn protocol(&mut self, protocol: impl Into<String>) -> &mut Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn host_port(&mut self, host_port: i32) -> &mut Self {
        self.host_port = Some(host_port);
        self
    }

    /// Port names have to be lowercase.
    pub fn build(&self) -> ContainerPort {
        ContainerPort {
            container_port: self.container_port,
            name: self.name.as_deref().map(str::to_lowercase),
            host_ip: self.host_ip.clone(),
            protocol: self.protocol.clone(),
            host_port: self.host_port,
        }
    }
}
