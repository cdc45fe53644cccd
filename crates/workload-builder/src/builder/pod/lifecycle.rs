use k8s_openapi::{
    api::core::v1::{ExecAction, HTTPGetAction, HTTPHeader, LifecycleHandler, TCPSocketAction},
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::config::{ActionConfig, ActionKind};

const DEFAULT_HTTP_PORT: i32 = 80;
const DEFAULT_HTTPS_PORT: i32 = 443;

/// The handler shared by lifecycle hooks and probes.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Exec(ExecAction),
    HttpGet(HTTPGetAction),
    TcpSocket(TCPSocketAction),
}

impl From<&ActionConfig> for Action {
    fn from(config: &ActionConfig) -> Self {
        match config.kind {
            ActionKind::Command => Self::Exec(ExecAction {
                command: Some(config.command.clone()),
            }),
            ActionKind::Http => Self::HttpGet(http_get_action(config, None, DEFAULT_HTTP_PORT)),
            ActionKind::Https => Self::HttpGet(http_get_action(
                config,
                Some("HTTPS".to_owned()),
                DEFAULT_HTTPS_PORT,
            )),
            ActionKind::Tcp => Self::TcpSocket(TCPSocketAction {
                host: config.host.clone(),
                port: IntOrString::Int(config.port.unwrap_or(DEFAULT_HTTP_PORT)),
            }),
        }
    }
}

fn http_get_action(
    config: &ActionConfig,
    scheme: Option<String>,
    default_port: i32,
) -> HTTPGetAction {
    let http_headers = (!config.headers.is_empty()).then(|| {
        config
            .headers
            .iter()
            .map(|(name, value)| HTTPHeader {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    });

    HTTPGetAction {
        host: config.host.clone(),
        http_headers,
        path: config.path.clone(),
        port: IntOrString::Int(config.port.unwrap_or(default_port)),
        scheme,
    }
}

impl Action {
    pub fn into_lifecycle_handler(self) -> LifecycleHandler {
        match self {
            Self::Exec(exec) => LifecycleHandler {
                exec: Some(exec),
                ..LifecycleHandler::default()
            },
            Self::HttpGet(http_get) => LifecycleHandler {
                http_get: Some(http_get),
                ..LifecycleHandler::default()
            },
            Self::TcpSocket(tcp_socket) => LifecycleHandler {
                tcp_socket: Some(tcp_socket),
                ..LifecycleHandler::default()
            },
        }
    }
}
