use k8s_openapi::api::core::v1::{
    Affinity, NodeAffinity, NodeSelector, NodeSelectorRequirement, NodeSelectorTerm, PodAffinity,
    PodAffinityTerm, PodAntiAffinity, PreferredSchedulingTerm, WeightedPodAffinityTerm,
};

use crate::{
    config::{
        AffinityConfig, ExpressionRequirementConfig, NodeAffinityConfig, PodAffinityConfig,
        SchedulingType,
    },
    selector::{build_selector_from_config, operator_token},
};

pub const TOPOLOGY_KEY_HOSTNAME: &str = "kubernetes.io/hostname";

/// Merges a single rule into `affinity`. Rules of the same kind accumulate: required node rules
/// become additional (ORed) node selector terms, everything else is appended to the matching
/// list.
pub fn add_affinity_rule(affinity: &mut Affinity, rule: &AffinityConfig) {
    match rule {
        AffinityConfig::Node(rule) => add_node_affinity(
            affinity.node_affinity.get_or_insert_with(NodeAffinity::default),
            rule,
        ),
        AffinityConfig::Pod(rule) => {
            let pod_affinity = affinity.pod_affinity.get_or_insert_with(PodAffinity::default);
            push_pod_affinity_term(
                &mut pod_affinity.required_during_scheduling_ignored_during_execution,
                &mut pod_affinity.preferred_during_scheduling_ignored_during_execution,
                rule,
            );
        }
        AffinityConfig::PodAnti(rule) => {
            let pod_anti_affinity = affinity
                .pod_anti_affinity
                .get_or_insert_with(PodAntiAffinity::default);
            push_pod_affinity_term(
                &mut pod_anti_affinity.required_during_scheduling_ignored_during_execution,
                &mut pod_anti_affinity.preferred_during_scheduling_ignored_during_execution,
                rule,
            );
        }
    }
}

fn add_node_affinity(node_affinity: &mut NodeAffinity, rule: &NodeAffinityConfig) {
    let term = NodeSelectorTerm {
        match_expressions: Some(rule.expressions.iter().map(node_requirement).collect()),
        ..NodeSelectorTerm::default()
    };

    match rule.scheduling {
        SchedulingType::Required => node_affinity
            .required_during_scheduling_ignored_during_execution
            .get_or_insert_with(NodeSelector::default)
            .node_selector_terms
            .push(term),
        SchedulingType::Preferred => node_affinity
            .preferred_during_scheduling_ignored_during_execution
            .get_or_insert_with(Vec::new)
            .push(PreferredSchedulingTerm {
                preference: term,
                weight: rule.weight,
            }),
    }
}

fn node_requirement(config: &ExpressionRequirementConfig) -> NodeSelectorRequirement {
    NodeSelectorRequirement {
        key: config.key.clone(),
        operator: operator_token(config.operator).to_owned(),
        values: (!config.values.is_empty()).then(|| config.values.clone()),
    }
}

fn push_pod_affinity_term(
    required: &mut Option<Vec<PodAffinityTerm>>,
    preferred: &mut Option<Vec<WeightedPodAffinityTerm>>,
    rule: &PodAffinityConfig,
) {
    let pod_affinity_term = pod_affinity_term(rule);
    match rule.scheduling {
        SchedulingType::Required => required
            .get_or_insert_with(Vec::new)
            .push(pod_affinity_term),
        SchedulingType::Preferred => {
            preferred
                .get_or_insert_with(Vec::new)
                .push(WeightedPodAffinityTerm {
                    pod_affinity_term,
                    weight: rule.weight,
                });
        }
    }
}

/// An empty topology key falls back to [`TOPOLOGY_KEY_HOSTNAME`].
fn pod_affinity_term(rule: &PodAffinityConfig) -> PodAffinityTerm {
    let topology_key = if rule.topology_key.is_empty() {
        TOPOLOGY_KEY_HOSTNAME.to_owned()
    } else {
        rule.topology_key.clone()
    };

    PodAffinityTerm {
        label_selector: Some(build_selector_from_config(&rule.selector)),
        namespaces: (!rule.namespaces.is_empty()).then(|| rule.namespaces.clone()),
        topology_key,
        ..PodAffinityTerm::default()
    }
}
