use std::collections::BTreeMap;

use indoc::indoc;
use workload_builder::{
    builder::controller::{DeploymentBuilder, PodController, ReplicationControllerBuilder},
    compose::{build_controller, build_controller_from_containers, build_pod},
    config::{
        ContainerConfig, ContainerDefinition, DeploymentConfig, PortConfig, PullPolicy,
        ReplicationControllerConfig, VolumeMountConfig,
    },
    diagnostics::{BuildWarning, CollectingDiagnostics},
    metadata::ObjectMetaExt,
    selector::SelectorExt,
};

fn webserver_container() -> ContainerDefinition {
    ContainerDefinition {
        config: ContainerConfig {
            name: "webserver".to_owned(),
            image: format!("{}/{}/{}-nginx:{}", "reg", "docker.io", "pre", "1.0"),
            pull_policy: Some(PullPolicy::Always),
            min_mem: Some("1G".to_owned()),
            max_mem: Some("1G".to_owned()),
            min_cpu: Some(String::new()),
            max_cpu: Some(String::new()),
            uid: Some(1000),
            ..ContainerConfig::default()
        },
        volume_mounts: vec![
            VolumeMountConfig::new("dir-webserver", "/opt/blackduck/hub/webserver/security"),
            VolumeMountConfig::new("certificate", "/tmp/secrets"),
        ],
        port: Some(PortConfig::new(8080)),
        ..ContainerDefinition::default()
    }
}

fn webserver_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_owned(), "webserver".to_owned()),
        ("tier".to_owned(), "webserver".to_owned()),
    ])
}

#[test]
fn replication_controller_export() {
    let mut diagnostics = CollectingDiagnostics::new();
    let outcome = build_controller_from_containers::<ReplicationControllerBuilder>(
        &ReplicationControllerConfig {
            namespace: Some("ns".to_owned()),
            replicas: Some(1),
            ..ReplicationControllerConfig::new("webserver")
        },
        "ns",
        &[webserver_container()],
        &[],
        &[],
        &[],
        &mut diagnostics,
    );
    assert!(outcome.warnings.is_empty());
    assert!(diagnostics.is_empty());

    let controller = outcome.resource.build();
    let expected: serde_yaml::Value = serde_yaml::from_str(indoc! {"
        apiVersion: v1
        kind: ReplicationController
        metadata:
          name: webserver
          namespace: ns
        spec:
          replicas: 1
          selector:
            app: webserver
            tier: webserver
          template:
            metadata:
              name: webserver
              labels:
                app: webserver
                tier: webserver
            spec:
              serviceAccountName: ns
              containers:
                - name: webserver
                  image: reg/docker.io/pre-nginx:1.0
                  imagePullPolicy: Always
                  ports:
                    - containerPort: 8080
                  resources:
                    limits:
                      memory: 1G
                    requests:
                      memory: 1G
                  securityContext:
                    runAsUser: 1000
                  volumeMounts:
                    - name: dir-webserver
                      mountPath: /opt/blackduck/hub/webserver/security
                    - name: certificate
                      mountPath: /tmp/secrets
    "})
    .unwrap();

    assert_eq!(serde_yaml::to_value(&controller).unwrap(), expected);
}

#[test]
fn deployment_selects_its_pods() {
    let pod = build_pod(
        "webserver",
        "",
        &[],
        &[webserver_container()],
        &[],
        &[],
        CollectingDiagnostics::new(),
    )
    .into_resource();
    let mut deployment = build_controller::<DeploymentBuilder>(
        &DeploymentConfig {
            replicas: Some(1),
            ..DeploymentConfig::new("webserver")
        },
        &pod,
    );
    deployment.add_annotations([("owner", "hub")]);

    assert_eq!(
        deployment
            .label_selector()
            .and_then(|selector| selector.match_labels.clone()),
        Some(webserver_labels())
    );

    let deployment = deployment.build();
    assert_eq!(
        deployment.metadata.annotations,
        Some(BTreeMap::from([("owner".to_owned(), "hub".to_owned())]))
    );
    let spec = deployment.spec.unwrap();
    assert_eq!(spec.selector.match_labels, Some(webserver_labels()));

    let template = spec.template;
    assert_eq!(
        template.metadata.and_then(|metadata| metadata.labels),
        Some(webserver_labels())
    );
    let pod_spec = template.spec.unwrap();
    assert_eq!(pod_spec.service_account_name, None);
    assert_eq!(pod_spec.init_containers, None);
    assert_eq!(
        pod_spec
            .containers
            .iter()
            .map(|container| (container.name.as_str(), container.image.as_deref()))
            .collect::<Vec<_>>(),
        vec![("webserver", Some("reg/docker.io/pre-nginx:1.0"))]
    );
}

#[test]
fn container_definition_from_yaml() {
    let definition: ContainerDefinition = serde_yaml::from_str(indoc! {"
        config:
          name: webserver
          image: reg/docker.io/pre-nginx:1.0
          pullPolicy: Always
          minMem: 1G
          maxMem: 1G
          uid: 1000
        envs:
          - nameOrPrefix: HUB_WEBSERVER_PORT
            keyOrValue: '8443'
          - nameOrPrefix: HUB_PROXY_PASSWORD
            kind: secretKey
            keyOrValue: password
            fromName: proxy-credentials
        volumeMounts:
          - name: certificate
            mountPath: /tmp/secrets
            readOnly: true
        port:
          containerPort: 8080
          protocol: TCP
        livenessProbes:
          - action:
              kind: https
              port: 8443
              path: /health-check
            initialDelaySeconds: 240
            timeoutSeconds: 10
            periodSeconds: 30
            failureThreshold: 10
    "})
    .unwrap();

    let container = definition.build();

    let env = container.env.unwrap();
    assert_eq!(env[0].value.as_deref(), Some("8443"));
    assert_eq!(
        env[1]
            .value_from
            .as_ref()
            .and_then(|source| source.secret_key_ref.as_ref())
            .map(|selector| (selector.name.as_str(), selector.key.as_str())),
        Some(("proxy-credentials", "password"))
    );
    assert_eq!(container.volume_mounts.unwrap()[0].read_only, Some(true));
    assert_eq!(container.ports.unwrap()[0].protocol.as_deref(), Some("TCP"));

    let probe = container.liveness_probe.unwrap();
    assert_eq!(probe.initial_delay_seconds, Some(240));
    assert_eq!(probe.period_seconds, Some(30));
    assert_eq!(probe.failure_threshold, Some(10));
    let http_get = probe.http_get.unwrap();
    assert_eq!(http_get.scheme.as_deref(), Some("HTTPS"));
    assert_eq!(http_get.path.as_deref(), Some("/health-check"));
}

#[test]
fn colliding_init_container_is_reported_and_skipped() {
    let mut diagnostics = CollectingDiagnostics::new();
    let outcome = build_controller_from_containers::<DeploymentBuilder>(
        &DeploymentConfig::new("webserver"),
        "",
        &[webserver_container()],
        &[],
        &[webserver_container()],
        &[],
        &mut diagnostics,
    );

    assert!(matches!(
        outcome.warnings.as_slice(),
        [BuildWarning::InitContainerRejected { container_name, .. }] if container_name == "webserver"
    ));
    assert_eq!(diagnostics.warnings(), outcome.warnings.as_slice());

    let deployment = outcome.resource;
    let pod_spec = deployment
        .template()
        .and_then(|template| template.spec.clone())
        .unwrap();
    assert_eq!(pod_spec.containers.len(), 1);
    assert_eq!(pod_spec.init_containers, None);
}
