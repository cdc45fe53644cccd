//! Non-fatal problems found while assembling a workload.
//!
//! Builders never abort on these. Every warning is handed to a [`Diagnostics`] sink and also
//! returned to the caller together with the built object.
use snafu::Snafu;
use tracing::warn;

use crate::builder::pod;

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BuildWarning {
    #[snafu(display("failed to add init container {container_name:?} to pod {pod_name:?}"))]
    InitContainerRejected {
        source: pod::Error,
        pod_name: String,
        container_name: String,
    },

    #[snafu(display("failed to add volume {volume_name:?} to pod {pod_name:?}"))]
    VolumeRejected {
        source: pod::Error,
        pod_name: String,
        volume_name: String,
    },
}

/// Receives the warnings produced during a build.
pub trait Diagnostics {
    fn report(&mut self, warning: &BuildWarning);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, warning: &BuildWarning) {
        (**self).report(warning);
    }
}

/// Forwards every warning to [`tracing`] at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, warning: &BuildWarning) {
        let error: &(dyn std::error::Error + 'static) = warning;
        warn!(error, "Continuing the build without the rejected object");
    }
}

/// Keeps all warnings in memory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollectingDiagnostics {
    warnings: Vec<BuildWarning>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&mut self, warning: &BuildWarning) {
        self.warnings.push(warning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_init_container() -> BuildWarning {
        BuildWarning::InitContainerRejected {
            source: pod::Error::ContainerNameCollision {
                container_name: "init".to_owned(),
            },
            pod_name: "webserver".to_owned(),
            container_name: "init".to_owned(),
        }
    }

    fn report_to(mut diagnostics: impl Diagnostics) {
        diagnostics.report(&rejected_init_container());
    }

    #[test]
    fn collects_through_mutable_reference() {
        let mut diagnostics = CollectingDiagnostics::new();
        report_to(&mut diagnostics);
        report_to(TracingDiagnostics);

        assert_eq!(diagnostics.warnings(), &[rejected_init_container()]);
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn display() {
        let warning = rejected_init_container();

        assert_eq!(
            warning.to_string(),
            "failed to add init container \"init\" to pod \"webserver\""
        );
        assert_eq!(
            std::error::Error::source(&warning).map(ToString::to_string),
            Some("container name \"init\" is already used in the pod".to_owned())
        );
    }
}
