use k8s_openapi::api::core::v1::SecurityContext;

use crate::config::ContainerConfig;

/// A builder for [`SecurityContext`] objects (not to be confused with `PodSecurityContext`).
#[derive(Clone, Debug, Default)]
pub struct SecurityContextBuilder {
    security_context: SecurityContext,
}

impl SecurityContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns [`None`] when `config` does not set any security related field.
    pub fn from_container_config(config: &ContainerConfig) -> Option<SecurityContext> {
        let mut builder = Self::new();
        builder.security_context.run_as_user = config.uid;
        builder.security_context.run_as_group = config.gid;
        builder.security_context.privileged = config.privileged;
        builder.security_context.allow_privilege_escalation = config.allow_privilege_escalation;
        builder.security_context.read_only_root_filesystem = config.read_only_root_filesystem;

        let security_context = builder.build();
        (security_context != SecurityContext::default()).then_some(security_context)
    }

    pub fn allow_privilege_escalation(&mut self, value: bool) -> &mut Self {
        self.security_context.allow_privilege_escalation = Some(value);
        self
    }

    pub fn privileged(&mut self, value: bool) -> &mut Self {
        self.security_context.privileged = Some(value);
        self
    }

    pub fn read_only_root_filesystem(&mut self, value: bool) -> &mut Self {
        self.security_context.read_only_root_filesystem = Some(value);
        self
    }

    pub fn run_as_group(&mut self, value: i64) -> &mut Self {
        self.security_context.run_as_group = Some(value);
        self
    }

    pub fn run_as_user(&mut self, value: i64) -> &mut Self {
        self.security_context.run_as_user = Some(value);
        self
    }

    pub fn build(&self) -> SecurityContext {
        self.security_context.clone()
    }
}
