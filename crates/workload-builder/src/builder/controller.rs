//! Builders for the controllers that own a pod template: [`Deployment`] and
//! [`ReplicationController`].
//!
//! Both keep their selector in an `Option` until they are built, so selector mutation can tell a
//! selector that was never touched apart from an empty one.
use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment},
        core::v1::{PodTemplateSpec, ReplicationController, ReplicationControllerSpec},
    },
    apimachinery::pkg::{
        apis::meta::v1::{LabelSelector, ObjectMeta},
        util::intstr::IntOrString,
    },
};
use tracing::warn;

use crate::{
    builder::meta::ObjectMetaBuilder,
    config::{
        DeploymentConfig, DeploymentStrategyConfig, NamedConfig, ReplicationControllerConfig,
    },
    metadata::ObjectMetaExt,
    selector::SelectorExt,
};

/// A resource that runs pods from a template and finds them through its selector.
pub trait PodController: ObjectMetaExt + SelectorExt + Sized {
    type Config: NamedConfig;
    type Output;

    /// Creates the controller with its identity seeded from `config`.
    fn from_config(config: &Self::Config) -> Self;

    fn pod_template(&mut self, template: PodTemplateSpec) -> &mut Self;

    fn remove_pod_template(&mut self) -> &mut Self;

    fn template(&self) -> Option<&PodTemplateSpec>;

    fn build(&self) -> Self::Output;
}

/// Parses `"1"` as a number and anything else (e.g. `"25%"`) as a string.
fn int_or_string(value: &str) -> IntOrString {
    value
        .parse()
        .map_or_else(|_| IntOrString::String(value.to_owned()), IntOrString::Int)
}

fn seed_metadata(name: &str, namespace: Option<&String>) -> ObjectMeta {
    ObjectMetaBuilder::new()
        .name(name)
        .namespace_opt(namespace.cloned())
        .build()
}

#[derive(Clone, Debug, Default)]
pub struct DeploymentBuilder {
    metadata: ObjectMeta,
    selector: Option<LabelSelector>,
    template: Option<PodTemplateSpec>,
    replicas: Option<i32>,
    min_ready_seconds: Option<i32>,
    revision_history_limit: Option<i32>,
    paused: Option<bool>,
    strategy: Option<DeploymentStrategy>,
}

impl DeploymentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).build(),
            ..Self::default()
        }
    }

    pub fn replicas(&mut self, replicas: i32) -> &mut Self {
        self.replicas = Some(replicas);
        self
    }

    pub fn strategy(&mut self, strategy: &DeploymentStrategyConfig) -> &mut Self {
        self.strategy = Some(match strategy {
            DeploymentStrategyConfig::Recreate => DeploymentStrategy {
                type_: Some("Recreate".to_owned()),
                ..DeploymentStrategy::default()
            },
            DeploymentStrategyConfig::RollingUpdate {
                max_unavailable,
                max_surge,
            } => DeploymentStrategy {
                type_: Some("RollingUpdate".to_owned()),
                rolling_update: Some(RollingUpdateDeployment {
                    max_surge: max_surge.as_deref().map(int_or_string),
                    max_unavailable: max_unavailable.as_deref().map(int_or_string),
                }),
            },
        });
        self
    }
}

impl ObjectMetaExt for DeploymentBuilder {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn object_meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl SelectorExt for DeploymentBuilder {
    fn label_selector(&self) -> Option<&LabelSelector> {
        self.selector.as_ref()
    }

    fn label_selector_mut(&mut self) -> &mut Option<LabelSelector> {
        &mut self.selector
    }
}

impl PodController for DeploymentBuilder {
    type Config = DeploymentConfig;
    type Output = Deployment;

    fn from_config(config: &DeploymentConfig) -> Self {
        let mut builder = Self {
            metadata: seed_metadata(&config.name, config.namespace.as_ref()),
            replicas: config.replicas,
            min_ready_seconds: config.min_ready_seconds,
            revision_history_limit: config.revision_history_limit,
            paused: config.paused,
            ..Self::default()
        };
        if let Some(strategy) = &config.strategy {
            builder.strategy(strategy);
        }
        builder
    }

    fn pod_template(&mut self, template: PodTemplateSpec) -> &mut Self {
        self.template = Some(template);
        self
    }

    fn remove_pod_template(&mut self) -> &mut Self {
        self.template = None;
        self
    }

    fn template(&self) -> Option<&PodTemplateSpec> {
        self.template.as_ref()
    }

    /// A deployment always carries a selector and a template, missing ones are emitted empty.
    fn build(&self) -> Deployment {
        Deployment {
            metadata: self.metadata.clone(),
            spec: Some(DeploymentSpec {
                min_ready_seconds: self.min_ready_seconds,
                paused: self.paused,
                replicas: self.replicas,
                revision_history_limit: self.revision_history_limit,
                selector: self.selector.clone().unwrap_or_default(),
                strategy: self.strategy.clone(),
                template: self.template.clone().unwrap_or_default(),
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReplicationControllerBuilder {
    metadata: ObjectMeta,
    selector: Option<LabelSelector>,
    template: Option<PodTemplateSpec>,
    replicas: Option<i32>,
    min_ready_seconds: Option<i32>,
}

impl ReplicationControllerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).build(),
            ..Self::default()
        }
    }

    pub fn replicas(&mut self, replicas: i32) -> &mut Self {
        self.replicas = Some(replicas);
        self
    }
}

impl ObjectMetaExt for ReplicationControllerBuilder {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn object_meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl SelectorExt for ReplicationControllerBuilder {
    fn label_selector(&self) -> Option<&LabelSelector> {
        self.selector.as_ref()
    }

    fn label_selector_mut(&mut self) -> &mut Option<LabelSelector> {
        &mut self.selector
    }
}

impl PodController for ReplicationControllerBuilder {
    type Config = ReplicationControllerConfig;
    type Output = ReplicationController;

    fn from_config(config: &ReplicationControllerConfig) -> Self {
        Self {
            metadata: seed_metadata(&config.name, config.namespace.as_ref()),
            replicas: config.replicas,
            min_ready_seconds: config.min_ready_seconds,
            ..Self::default()
        }
    }

    fn pod_template(&mut self, template: PodTemplateSpec) -> &mut Self {
        self.template = Some(template);
        self
    }

    fn remove_pod_template(&mut self) -> &mut Self {
        self.template = None;
        self
    }

    fn template(&self) -> Option<&PodTemplateSpec> {
        self.template.as_ref()
    }

    /// Replication controllers only select on equality, match expressions are dropped.
    fn build(&self) -> ReplicationController {
        let selector = self.selector.as_ref().map(|selector| {
            if let Some(expressions) = selector
                .match_expressions
                .as_ref()
                .filter(|expressions| !expressions.is_empty())
            {
                warn!(
                    replication_controller = self.metadata.name.as_deref().unwrap_or_default(),
                    dropped_expressions = expressions.len(),
                    "Replication controller selectors can not hold match expressions, dropping them"
                );
            }
            selector.match_labels.clone().unwrap_or_default()
        });

        ReplicationController {
            metadata: self.metadata.clone(),
            spec: Some(ReplicationControllerSpec {
                min_ready_seconds: self.min_ready_seconds,
                replicas: self.replicas,
                selector,
                template: self.template.clone(),
            }),
            ..ReplicationController::default()
        }
    }
}
