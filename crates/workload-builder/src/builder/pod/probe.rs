use std::time::Duration;

use k8s_openapi::api::core::v1::{ExecAction, HTTPGetAction, Probe, TCPSocketAction};

use crate::{builder::pod::lifecycle::Action, config::ProbeConfig};

const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

/// A typestate builder for [`Probe`]s: an action and a period have to be set before building.
#[derive(Debug)]
pub struct ProbeBuilder<A, Period> {
    action: A,
    period: Period,

    success_threshold: i32,
    failure_threshold: i32,
    timeout: Duration,
    initial_delay: Duration,
}

impl Default for ProbeBuilder<(), ()> {
    fn default() -> Self {
        Self {
            action: (),
            period: (),
            // The following values match the Kubernetes default
            success_threshold: 1,
            failure_threshold: 3,
            timeout: Duration::from_secs(1),
            initial_delay: Duration::from_secs(0),
        }
    }
}

impl ProbeBuilder<(), ()> {
    /// Unset timings keep the Kubernetes defaults, a missing period becomes ten seconds.
    pub fn from_config(config: &ProbeConfig) -> Probe {
        let mut builder = Self::default()
            .with_action(Action::from(&config.action))
            .with_period(
                config
                    .period_seconds
                    .map_or(DEFAULT_PERIOD, |secs| Duration::from_secs(secs.into())),
            )
            .with_initial_delay(Duration::from_secs(config.initial_delay_seconds.into()));

        if let Some(timeout) = config.timeout_seconds {
            builder = builder.with_timeout(Duration::from_secs(timeout.into()));
        }
        if let Some(success_threshold) = config.success_threshold {
            builder = builder.with_success_threshold(success_threshold);
        }
        if let Some(failure_threshold) = config.failure_threshold {
            builder = builder.with_failure_threshold(failure_threshold);
        }

        builder.build()
    }
}

impl<Period> ProbeBuilder<(), Period> {
    /// This probe action executes the specified command
    pub fn with_exec_action_helper(
        self,
        command: impl IntoIterator<Item = impl Into<String>>,
    ) -> ProbeBuilder<Action, Period> {
        self.with_action(Action::Exec(ExecAction {
            command: Some(command.into_iter().map(Into::into).collect()),
        }))
    }

    pub fn with_http_get_action(
        self,
        http_get_action: HTTPGetAction,
    ) -> ProbeBuilder<Action, Period> {
        self.with_action(Action::HttpGet(http_get_action))
    }

    pub fn with_tcp_socket_action(
        self,
        tcp_socket_action: TCPSocketAction,
    ) -> ProbeBuilder<Action, Period> {
        self.with_action(Action::TcpSocket(tcp_socket_action))
    }

    pub fn with_action(self, action: Action) -> ProbeBuilder<Action, Period> {
        let Self {
            action: (),
            period,
            success_threshold,
            failure_threshold,
            timeout,
            initial_delay,
        } = self;

        ProbeBuilder {
            action,
            period,
            success_threshold,
            failure_threshold,
            timeout,
            initial_delay,
        }
    }
}

impl ProbeBuilder<Action, ()> {
    /// The period/interval in which the probe should be executed.
    pub fn with_period(self, period: Duration) -> ProbeBuilder<Action, Duration> {
        let Self {
            action,
            period: (),
            success_threshold,
            failure_threshold,
            timeout,
            initial_delay,
        } = self;

        ProbeBuilder {
            action,
            period,
            success_threshold,
            failure_threshold,
            timeout,
            initial_delay,
        }
    }
}

impl ProbeBuilder<Action, Duration> {
    /// How often the probe must succeed before being considered successful.
    pub fn with_success_threshold(mut self, success_threshold: i32) -> Self {
        self.success_threshold = success_threshold;
        self
    }

    /// How often the probe must fail before being considered failed.
    pub fn with_failure_threshold(mut self, failure_threshold: i32) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }

    /// The duration the probe needs to fail before being considered failed.
    ///
    /// This internally calculates the needed failure threshold based on the period and passes that
    /// to [`Self::with_failure_threshold`].
    pub fn with_failure_threshold_duration(self, failure_threshold_duration: Duration) -> Self {
        let failure_threshold = failure_threshold_duration.div_duration_f32(self.period);
        // Such big numbers do not have any real world effect, `as` saturates.
        let failure_threshold = failure_threshold.ceil() as i32;
        self.with_failure_threshold(failure_threshold)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn build(self) -> Probe {
        let mut probe = Probe {
            failure_threshold: Some(self.failure_threshold),
            initial_delay_seconds: Some(saturating_secs(self.initial_delay)),
            period_seconds: Some(saturating_secs(self.period)),
            success_threshold: Some(self.success_threshold),
            timeout_seconds: Some(saturating_secs(self.timeout)),
            ..Probe::default()
        };

        match self.action {
            Action::Exec(exec_action) => probe.exec = Some(exec_action),
            Action::HttpGet(http_get_action) => probe.http_get = Some(http_get_action),
            Action::TcpSocket(tcp_socket_action) => probe.tcp_socket = Some(tcp_socket_action),
        }

        probe
    }
}

fn saturating_secs(duration: Duration) -> i32 {
    i32::try_from(duration.as_secs()).unwrap_or(i32::MAX)
}
