use k8s_openapi::api::core::v1::{
    ConfigMapEnvSource, ConfigMapKeySelector, EnvFromSource, EnvVar, EnvVarSource,
    ObjectFieldSelector, SecretEnvSource, SecretKeySelector,
};

use crate::config::{EnvConfig, EnvKind};

/// What a single [`EnvConfig`] turns into: either one variable or a whole-object import.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvEntry {
    Var(EnvVar),
    From(EnvFromSource),
}

impl From<&EnvConfig> for EnvEntry {
    fn from(config: &EnvConfig) -> Self {
        let name = config.name_or_prefix.clone();
        match config.kind {
            EnvKind::Value => Self::Var(EnvVar {
                name,
                value: Some(config.key_or_value.clone()),
                ..EnvVar::default()
            }),
            EnvKind::ConfigMapKey => Self::Var(env_var_from_config_map(
                name,
                &config.from_name,
                &config.key_or_value,
            )),
            EnvKind::SecretKey => Self::Var(env_var_from_secret(
                name,
                &config.from_name,
                &config.key_or_value,
            )),
            EnvKind::FieldPath => Self::Var(env_var_from_field_path(name, &config.key_or_value)),
            EnvKind::ConfigMap => Self::From(EnvFromSource {
                config_map_ref: Some(ConfigMapEnvSource {
                    name: config.from_name.clone(),
                    ..ConfigMapEnvSource::default()
                }),
                prefix: prefix(name),
                ..EnvFromSource::default()
            }),
            EnvKind::Secret => Self::From(EnvFromSource {
                secret_ref: Some(SecretEnvSource {
                    name: config.from_name.clone(),
                    ..SecretEnvSource::default()
                }),
                prefix: prefix(name),
                ..EnvFromSource::default()
            }),
        }
    }
}

fn prefix(name_or_prefix: String) -> Option<String> {
    (!name_or_prefix.is_empty()).then_some(name_or_prefix)
}

pub fn env_var_from_secret(
    env_var_name: impl Into<String>,
    secret_name: impl Into<String>,
    secret_key: impl Into<String>,
) -> EnvVar {
    EnvVar {
        name: env_var_name.into(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.into(),
                key: secret_key.into(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn env_var_from_config_map(
    env_var_name: impl Into<String>,
    config_map_name: impl Into<String>,
    config_map_key: impl Into<String>,
) -> EnvVar {
    EnvVar {
        name: env_var_name.into(),
        value_from: Some(EnvVarSource {
            config_map_key_ref: Some(ConfigMapKeySelector {
                name: config_map_name.into(),
                key: config_map_key.into(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Used for pushing down attributes like the Pod's namespace into the containers.
pub fn env_var_from_field_path(
    env_var_name: impl Into<String>,
    field_path: impl Into<String>,
) -> EnvVar {
    EnvVar {
        name: env_var_name.into(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: field_path.into(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
