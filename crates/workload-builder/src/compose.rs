//! Assembly entry points: containers into pods, pods into controllers.
//!
//! Pods and controllers are labelled and selected by `{app: <name>, tier: <name>}`, so a
//! controller built from a config with the same name as the pod selects that pod.
use k8s_openapi::api::core::v1::{Container, Volume};
use snafu::ResultExt;
use tracing::instrument;

pub use crate::builder::pod::container::build_container;
use crate::{
    builder::{
        controller::PodController,
        pod::{PodBuilder, volume::VolumeBuilder},
    },
    config::{AffinityConfig, ContainerDefinition, NamedConfig, PodConfig, VolumeConfig},
    diagnostics::{BuildWarning, Diagnostics, InitContainerRejectedSnafu, VolumeRejectedSnafu},
    metadata::ObjectMetaExt,
};

pub const APP_LABEL: &str = "app";
pub const TIER_LABEL: &str = "tier";

/// A built object together with the non-fatal warnings collected while building it.
#[derive(Clone, Debug)]
pub struct BuildOutcome<T> {
    pub resource: T,
    pub warnings: Vec<BuildWarning>,
}

impl<T> BuildOutcome<T> {
    pub fn into_resource(self) -> T {
        self.resource
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BuildOutcome<U> {
        BuildOutcome {
            resource: f(self.resource),
            warnings: self.warnings,
        }
    }
}

impl ContainerDefinition {
    /// See [`build_container`].
    pub fn build(&self) -> Container {
        build_container(
            &self.config,
            &self.envs,
            &self.volume_mounts,
            self.port.as_ref(),
            self.post_start_action.as_ref(),
            &self.liveness_probes,
            &self.readiness_probes,
        )
    }
}

pub fn build_volume(config: &VolumeConfig) -> Volume {
    VolumeBuilder::from_config(config)
}

fn workload_labels(name: &str) -> [(&str, &str); 2] {
    [(APP_LABEL, name), (TIER_LABEL, name)]
}

/// Builds a pod named `name`. The service account is only set when it is not empty.
///
/// Every container and init container is built from its definition with [`build_container`].
/// Volumes that collide with an already added volume and init containers whose name is already
/// taken are skipped. Each of them is reported to `diagnostics` and returned as a warning.
pub fn build_pod(
    name: &str,
    service_account: &str,
    volumes: &[Volume],
    containers: &[ContainerDefinition],
    init_containers: &[ContainerDefinition],
    affinity_rules: &[AffinityConfig],
    diagnostics: impl Diagnostics,
) -> BuildOutcome<PodBuilder> {
    let config = PodConfig {
        service_account: (!service_account.is_empty()).then(|| service_account.to_owned()),
        ..PodConfig::new(name)
    };
    build_pod_from_config(
        &config,
        volumes,
        containers,
        init_containers,
        affinity_rules,
        diagnostics,
    )
}

/// Like [`build_pod`], but seeded from a full [`PodConfig`].
#[instrument(skip_all, fields(pod = %config.name))]
pub fn build_pod_from_config(
    config: &PodConfig,
    volumes: &[Volume],
    containers: &[ContainerDefinition],
    init_containers: &[ContainerDefinition],
    affinity_rules: &[AffinityConfig],
    mut diagnostics: impl Diagnostics,
) -> BuildOutcome<PodBuilder> {
    let mut warnings = Vec::new();
    let mut report = |warning: BuildWarning| {
        diagnostics.report(&warning);
        warnings.push(warning);
    };

    let mut pod = PodBuilder::from_config(config);
    for volume in volumes {
        if let Err(warning) = pod.add_volume(volume.clone()).context(VolumeRejectedSnafu {
            pod_name: &config.name,
            volume_name: &volume.name,
        }) {
            report(warning);
        }
    }
    pod.add_labels(workload_labels(&config.name));
    for rule in affinity_rules {
        pod.add_affinity(rule);
    }
    for definition in containers {
        pod.add_container(definition.build());
    }
    for definition in init_containers {
        let container = definition.build();
        let container_name = container.name.clone();
        if let Err(warning) = pod.add_init_container(container).context(InitContainerRejectedSnafu {
            pod_name: &config.name,
            container_name,
        }) {
            report(warning);
        }
    }

    BuildOutcome {
        resource: pod,
        warnings,
    }
}

/// Builds a controller seeded from `config`, selecting `{app, tier}` of the config's name and
/// running `pod` as its template.
pub fn build_controller<C: PodController>(config: &C::Config, pod: &PodBuilder) -> C {
    let mut controller = C::from_config(config);
    controller
        .add_match_labels_selectors(workload_labels(config.name()))
        .pod_template(pod.build_template());
    controller
}

/// [`build_pod`] followed by [`build_controller`]. The pod takes the controller's name.
pub fn build_controller_from_containers<C: PodController>(
    config: &C::Config,
    service_account: &str,
    containers: &[ContainerDefinition],
    volumes: &[Volume],
    init_containers: &[ContainerDefinition],
    affinity_rules: &[AffinityConfig],
    diagnostics: impl Diagnostics,
) -> BuildOutcome<C> {
    build_pod(
        config.name(),
        service_account,
        volumes,
        containers,
        init_containers,
        affinity_rules,
        diagnostics,
    )
    .map(|pod| build_controller(config, &pod))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        builder::{
            controller::{DeploymentBuilder, ReplicationControllerBuilder},
            pod,
        },
        config::{
            ContainerConfig, DeploymentConfig, PortConfig, ReplicationControllerConfig,
            VolumeSourceConfig,
        },
        diagnostics::CollectingDiagnostics,
    };

    fn labels(name: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("app".to_owned(), name.to_owned()),
            ("tier".to_owned(), name.to_owned()),
        ])
    }

    fn definition(name: &str, image: &str) -> ContainerDefinition {
        ContainerDefinition {
            config: ContainerConfig {
                name: name.to_owned(),
                image: image.to_owned(),
                ..ContainerConfig::default()
            },
            ..ContainerDefinition::default()
        }
    }

    #[fixture]
    fn main_container() -> ContainerDefinition {
        definition("main", "nginx")
    }

    #[rstest]
    fn pod_labels_and_service_account(main_container: ContainerDefinition) {
        let mut diagnostics = CollectingDiagnostics::new();
        let outcome = build_pod(
            "webserver",
            "",
            &[],
            &[main_container],
            &[],
            &[],
            &mut diagnostics,
        );

        assert!(outcome.warnings.is_empty());
        assert!(diagnostics.is_empty());
        let pod = outcome.resource.build();
        assert_eq!(pod.metadata.labels, Some(labels("webserver")));
        let spec = pod.spec.unwrap();
        assert_eq!(spec.service_account_name, None);
        assert_eq!(spec.init_containers, None);

        let pod = build_pod("webserver", "hub-sa", &[], &[], &[], &[], &mut diagnostics)
            .into_resource()
            .build();
        assert_eq!(
            pod.spec.and_then(|spec| spec.service_account_name),
            Some("hub-sa".to_owned())
        );
    }

    #[rstest]
    fn rejected_init_containers_do_not_stop_the_build(main_container: ContainerDefinition) {
        let init = definition("init", "busybox");
        let mut diagnostics = CollectingDiagnostics::new();

        let outcome = build_pod(
            "webserver",
            "",
            &[],
            &[main_container.clone()],
            &[main_container, init.clone(), init],
            &[],
            &mut diagnostics,
        );

        let expected = vec![
            BuildWarning::InitContainerRejected {
                source: pod::Error::ContainerNameCollision {
                    container_name: "main".to_owned(),
                },
                pod_name: "webserver".to_owned(),
                container_name: "main".to_owned(),
            },
            BuildWarning::InitContainerRejected {
                source: pod::Error::ContainerNameCollision {
                    container_name: "init".to_owned(),
                },
                pod_name: "webserver".to_owned(),
                container_name: "init".to_owned(),
            },
        ];
        assert_eq!(outcome.warnings, expected);
        assert_eq!(diagnostics.into_warnings(), expected);

        let spec = outcome.resource.build().spec.unwrap();
        assert_eq!(spec.containers.len(), 1);
        assert_eq!(
            spec.init_containers
                .unwrap_or_default()
                .into_iter()
                .map(|container| container.name)
                .collect::<Vec<_>>(),
            vec!["init".to_owned()]
        );
    }

    #[test]
    fn colliding_volumes_are_reported() {
        let volumes = [
            build_volume(&VolumeConfig {
                name: "data".to_owned(),
                source: VolumeSourceConfig::default(),
            }),
            build_volume(&VolumeConfig {
                name: "data".to_owned(),
                source: VolumeSourceConfig::PersistentVolumeClaim {
                    claim_name: "data".to_owned(),
                    read_only: false,
                },
            }),
        ];

        let outcome = build_pod(
            "webserver",
            "",
            &volumes,
            &[],
            &[],
            &[],
            CollectingDiagnostics::new(),
        );

        assert!(matches!(
            outcome.warnings.as_slice(),
            [BuildWarning::VolumeRejected { volume_name, .. }] if volume_name == "data"
        ));
        let spec = outcome.resource.build().spec.unwrap();
        assert_eq!(spec.volumes.map(|volumes| volumes.len()), Some(1));
    }

    #[rstest]
    fn deployment_from_containers(main_container: ContainerDefinition) {
        let outcome = build_controller_from_containers::<DeploymentBuilder>(
            &DeploymentConfig::new("webserver"),
            "",
            &[main_container],
            &[],
            &[],
            &[],
            CollectingDiagnostics::new(),
        );

        assert!(outcome.warnings.is_empty());
        let deployment = outcome.resource.build();
        assert_eq!(deployment.metadata.name.as_deref(), Some("webserver"));
        let spec = deployment.spec.unwrap();
        assert_eq!(spec.selector.match_labels, Some(labels("webserver")));
        assert_eq!(
            spec.template.metadata.and_then(|metadata| metadata.labels),
            Some(labels("webserver"))
        );
    }

    #[rstest]
    fn controller_selector_follows_config_name(main_container: ContainerDefinition) {
        let pod = build_pod(
            "frontend",
            "",
            &[],
            &[main_container],
            &[],
            &[],
            CollectingDiagnostics::new(),
        )
        .into_resource();

        let controller = build_controller::<ReplicationControllerBuilder>(
            &ReplicationControllerConfig::new("webserver"),
            &pod,
        )
        .build();

        let spec = controller.spec.unwrap();
        assert_eq!(spec.selector, Some(labels("webserver")));
        assert_eq!(
            spec.template
                .and_then(|template| template.metadata)
                .and_then(|metadata| metadata.labels),
            Some(labels("frontend"))
        );
    }

    #[test]
    fn pod_containers_are_built_from_definitions() {
        let webserver = ContainerDefinition {
            config: ContainerConfig {
                max_mem: Some("1G".to_owned()),
                ..definition("webserver", "nginx").config
            },
            port: Some(PortConfig::new(8080)),
            ..ContainerDefinition::default()
        };
        let setup = definition("setup", "busybox");

        let outcome = build_pod(
            "webserver",
            "",
            &[],
            std::slice::from_ref(&webserver),
            std::slice::from_ref(&setup),
            &[],
            CollectingDiagnostics::new(),
        );

        assert!(outcome.warnings.is_empty());
        let spec = outcome.resource.build().spec.unwrap();
        assert_eq!(spec.containers, vec![webserver.build()]);
        assert_eq!(spec.init_containers, Some(vec![setup.build()]));
        assert_eq!(
            spec.containers[0]
                .ports
                .as_ref()
                .map(|ports| ports[0].container_port),
            Some(8080)
        );
    }

    #[test]
    fn container_definition() {
        let definition = ContainerDefinition {
            config: ContainerConfig {
                name: "webserver".to_owned(),
                image: "nginx".to_owned(),
                ..ContainerConfig::default()
            },
            port: Some(PortConfig::new(8080)),
            ..ContainerDefinition::default()
        };

        let container = definition.build();
        assert_eq!(container.name, "webserver");
        assert_eq!(container.ports.map(|ports| ports[0].container_port), Some(8080));
    }
}
