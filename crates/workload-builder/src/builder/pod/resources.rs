use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::ResourceRequirements, apimachinery::pkg::api::resource::Quantity,
};

use crate::config::ContainerConfig;

pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceRequirementsType {
    Limits,
    Requests,
}

/// A builder to build [`ResourceRequirements`] objects.
///
/// Empty quantities are skipped, and limits/requests are only emitted when they contain at least
/// one entry.
#[derive(Clone, Debug, Default)]
pub struct ResourceRequirementsBuilder {
    limits: BTreeMap<String, Quantity>,
    requests: BTreeMap<String, Quantity>,
}

impl ResourceRequirementsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests from the `min_*` values and limits from the `max_*` values of `config`.
    pub fn from_container_config(config: &ContainerConfig) -> Self {
        let mut builder = Self::new();
        for (rr_type, resource, quantity) in [
            (ResourceRequirementsType::Requests, CPU, &config.min_cpu),
            (ResourceRequirementsType::Limits, CPU, &config.max_cpu),
            (ResourceRequirementsType::Requests, MEMORY, &config.min_mem),
            (ResourceRequirementsType::Limits, MEMORY, &config.max_mem),
        ] {
            if let Some(quantity) = quantity {
                builder = builder.with_resource(rr_type, resource, quantity.as_str());
            }
        }
        builder
    }

    pub fn with_cpu_request(self, request: impl Into<String>) -> Self {
        self.with_resource(ResourceRequirementsType::Requests, CPU, request)
    }

    pub fn with_cpu_limit(self, limit: impl Into<String>) -> Self {
        self.with_resource(ResourceRequirementsType::Limits, CPU, limit)
    }

    pub fn with_memory_request(self, request: impl Into<String>) -> Self {
        self.with_resource(ResourceRequirementsType::Requests, MEMORY, request)
    }

    pub fn with_memory_limit(self, limit: impl Into<String>) -> Self {
        self.with_resource(ResourceRequirementsType::Limits, MEMORY, limit)
    }

    pub fn with_resource(
        mut self,
        rr_type: ResourceRequirementsType,
        resource: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        let quantity = quantity.into();
        if quantity.is_empty() {
            return self;
        }

        let target = match rr_type {
            ResourceRequirementsType::Limits => &mut self.limits,
            ResourceRequirementsType::Requests => &mut self.requests,
        };
        target.insert(resource.into(), Quantity(quantity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty() && self.requests.is_empty()
    }

    pub fn build(self) -> ResourceRequirements {
        ResourceRequirements {
            limits: (!self.limits.is_empty()).then_some(self.limits),
            requests: (!self.requests.is_empty()).then_some(self.requests),
            ..ResourceRequirements::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_container_config_skips_empty_values() {
        let config = ContainerConfig {
            min_mem: Some("1G".to_owned()),
            max_mem: Some("1G".to_owned()),
            min_cpu: Some(String::new()),
            max_cpu: Some(String::new()),
            ..ContainerConfig::default()
        };

        let resources = ResourceRequirementsBuilder::from_container_config(&config).build();

        assert_eq!(
            resources,
            ResourceRequirements {
                limits: Some(BTreeMap::from([(
                    MEMORY.to_owned(),
                    Quantity("1G".to_owned())
                )])),
                requests: Some(BTreeMap::from([(
                    MEMORY.to_owned(),
                    Quantity("1G".to_owned())
                )])),
                ..ResourceRequirements::default()
            }
        );
    }

    #[test]
    fn empty_builder() {
        let builder = ResourceRequirementsBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build(), ResourceRequirements::default());
    }

    #[test]
    fn cpu_and_memory() {
        let resources = ResourceRequirementsBuilder::new()
            .with_cpu_request("250m")
            .with_cpu_limit("1")
            .with_memory_request("128Mi")
            .with_memory_limit("512Mi")
            .build();

        let limits = resources.limits.unwrap();
        let requests = resources.requests.unwrap();
        assert_eq!(limits.get(CPU), Some(&Quantity("1".to_owned())));
        assert_eq!(limits.get(MEMORY), Some(&Quantity("512Mi".to_owned())));
        assert_eq!(requests.get(CPU), Some(&Quantity("250m".to_owned())));
        assert_eq!(requests.get(MEMORY), Some(&Quantity("128Mi".to_owned())));
    }
}
