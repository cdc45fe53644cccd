use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The `type` of a Secret, rendered as the token the API server expects.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Eq,
    PartialEq,
    Serialize,
)]
pub enum SecretType {
    #[default]
    Opaque,
    #[serde(rename = "kubernetes.io/service-account-token")]
    #[strum(serialize = "kubernetes.io/service-account-token")]
    ServiceAccountToken,
    #[serde(rename = "kubernetes.io/dockercfg")]
    #[strum(serialize = "kubernetes.io/dockercfg")]
    DockerCfg,
    #[serde(rename = "kubernetes.io/dockerconfigjson")]
    #[strum(serialize = "kubernetes.io/dockerconfigjson")]
    DockerConfigJson,
    #[serde(rename = "kubernetes.io/basic-auth")]
    #[strum(serialize = "kubernetes.io/basic-auth")]
    BasicAuth,
    #[serde(rename = "kubernetes.io/ssh-auth")]
    #[strum(serialize = "kubernetes.io/ssh-auth")]
    SshAuth,
    #[serde(rename = "kubernetes.io/tls")]
    #[strum(serialize = "kubernetes.io/tls")]
    Tls,
    #[serde(rename = "bootstrap.kubernetes.io/token")]
    #[strum(serialize = "bootstrap.kubernetes.io/token")]
    BootstrapToken,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretConfig {
    pub name: String,
    pub namespace: Option<String>,
    #[serde(default, rename = "type")]
    pub secret_type: SecretType,
}

impl SecretConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SecretType::Opaque, "Opaque")]
    #[case(SecretType::Tls, "kubernetes.io/tls")]
    #[case(SecretType::BootstrapToken, "bootstrap.kubernetes.io/token")]
    fn secret_type_tokens(#[case] secret_type: SecretType, #[case] token: &str) {
        assert_eq!(secret_type.to_string(), token);

        let config: SecretConfig =
            serde_yaml::from_str(&format!("name: creds\ntype: {token}")).unwrap();
        assert_eq!(config.secret_type, secret_type);
    }
}
