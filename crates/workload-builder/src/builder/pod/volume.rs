use k8s_openapi::{
    api::core::v1::{
        ConfigMapVolumeSource, EmptyDirVolumeSource, HostPathVolumeSource,
        PersistentVolumeClaimVolumeSource, SecretVolumeSource, Volume, VolumeMount,
    },
    apimachinery::pkg::api::resource::Quantity,
};

use crate::config::{VolumeConfig, VolumeMountConfig, VolumeSourceConfig};

/// A builder to build [`Volume`] objects. May only contain one `volume_source`
/// at a time. E.g. a call like `with_secret` after `with_empty_dir` will overwrite the
/// `empty_dir`.
#[derive(Clone, Debug, Default)]
pub struct VolumeBuilder {
    name: String,
    volume_source: VolumeSource,
}

#[derive(Clone, Debug)]
pub enum VolumeSource {
    ConfigMap(ConfigMapVolumeSource),
    EmptyDir(EmptyDirVolumeSource),
    HostPath(HostPathVolumeSource),
    PersistentVolumeClaim(PersistentVolumeClaimVolumeSource),
    Secret(SecretVolumeSource),
}

impl Default for VolumeSource {
    fn default() -> Self {
        Self::EmptyDir(EmptyDirVolumeSource::default())
    }
}

impl VolumeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &VolumeConfig) -> Volume {
        let mut builder = Self::new(&config.name);
        match &config.source {
            VolumeSourceConfig::EmptyDir { medium, size_limit } => {
                builder.with_empty_dir(medium.clone(), size_limit.clone().map(Quantity))
            }
            VolumeSourceConfig::ConfigMap { name, default_mode } => {
                builder.with_config_map(name, *default_mode)
            }
            VolumeSourceConfig::Secret {
                secret_name,
                default_mode,
                optional,
            } => builder.with_secret(secret_name, *default_mode, *optional),
            VolumeSourceConfig::HostPath { path, type_ } => {
                builder.with_host_path(path, type_.clone())
            }
            VolumeSourceConfig::PersistentVolumeClaim {
                claim_name,
                read_only,
            } => builder.with_persistent_volume_claim(claim_name, *read_only),
        };
        builder.build()
    }

    pub fn with_config_map(
        &mut self,
        name: impl Into<String>,
        default_mode: Option<i32>,
    ) -> &mut Self {
        self.volume_source = VolumeSource::ConfigMap(ConfigMapVolumeSource {
            name: name.into(),
            default_mode,
            ..ConfigMapVolumeSource::default()
        });
        self
    }

    pub fn with_empty_dir(
        &mut self,
        medium: Option<impl Into<String>>,
        quantity: Option<Quantity>,
    ) -> &mut Self {
        self.volume_source = VolumeSource::EmptyDir(EmptyDirVolumeSource {
            medium: medium.map(Into::into),
            size_limit: quantity,
        });
        self
    }

    pub fn with_host_path(
        &mut self,
        path: impl Into<String>,
        type_: Option<impl Into<String>>,
    ) -> &mut Self {
        self.volume_source = VolumeSource::HostPath(HostPathVolumeSource {
            path: path.into(),
            type_: type_.map(Into::into),
        });
        self
    }

    pub fn with_persistent_volume_claim(
        &mut self,
        claim_name: impl Into<String>,
        read_only: bool,
    ) -> &mut Self {
        self.volume_source =
            VolumeSource::PersistentVolumeClaim(PersistentVolumeClaimVolumeSource {
                claim_name: claim_name.into(),
                read_only: Some(read_only),
            });
        self
    }

    /// `optional` is only emitted when it is set.
    pub fn with_secret(
        &mut self,
        secret_name: impl Into<String>,
        default_mode: Option<i32>,
        optional: bool,
    ) -> &mut Self {
        self.volume_source = VolumeSource::Secret(SecretVolumeSource {
            secret_name: Some(secret_name.into()),
            default_mode,
            optional: optional.then_some(true),
            ..SecretVolumeSource::default()
        });
        self
    }

    /// Consumes the Builder and returns a constructed Volume
    pub fn build(&self) -> Volume {
        let name = self.name.clone();
        match &self.volume_source {
            VolumeSource::ConfigMap(cm) => Volume {
                name,
                config_map: Some(cm.clone()),
                ..Volume::default()
            },
            VolumeSource::EmptyDir(empty_dir) => Volume {
                name,
                empty_dir: Some(empty_dir.clone()),
                ..Volume::default()
            },
            VolumeSource::HostPath(host_path) => Volume {
                name,
                host_path: Some(host_path.clone()),
                ..Volume::default()
            },
            VolumeSource::PersistentVolumeClaim(pvc) => Volume {
                name,
                persistent_volume_claim: Some(pvc.clone()),
                ..Volume::default()
            },
            VolumeSource::Secret(secret) => Volume {
                name,
                secret: Some(secret.clone()),
                ..Volume::default()
            },
        }
    }
}

/// A builder to build [`VolumeMount`] objects.
#[derive(Clone, Debug, Default)]
pub struct VolumeMountBuilder {
    mount_path: String,
    mount_propagation: Option<String>,
    name: String,
    read_only: Option<bool>,
    sub_path: Option<String>,
}

impl VolumeMountBuilder {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            mount_path: mount_path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Read-only is only emitted for read-only mounts, everything else is mounted read-write
    /// by default.
    pub fn from_config(config: &VolumeMountConfig) -> VolumeMount {
        let mut builder = Self::new(&config.name, &config.mount_path);
        if config.read_only {
            builder.read_only(true);
        }
        if let Some(sub_path) = &config.sub_path {
            builder.sub_path(sub_path);
        }
        if let Some(propagation) = config.propagation {
            builder.mount_propagation(propagation.to_string());
        }
        builder.build()
    }

    pub fn read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn mount_propagation(&mut self, mount_propagation: impl Into<String>) -> &mut Self {
        self.mount_propagation = Some(mount_propagation.into());
        self
    }

    pub fn sub_path(&mut self, sub_path: impl Into<String>) -> &mut Self {
        self.sub_path = Some(sub_path.into());
        self
    }

    pub fn build(&self) -> VolumeMount {
        VolumeMount {
            mount_path: self.mount_path.clone(),
            mount_propagation: self.mount_propagation.clone(),
            name: self.name.clone(),
            read_only: self.read_only,
            sub_path: self.sub_path.clone(),
            ..VolumeMount::default()
        }
    }
}
