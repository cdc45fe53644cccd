//! Construction and mutation of [`LabelSelector`]s.
use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::PodAffinityTerm,
    apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement},
};
use snafu::Snafu;

use crate::{
    config::{ExpressionRequirementConfig, SelectorConfig, SelectorOperator},
    metadata::{merge_pairs, remove_keys},
};

type Result<T, E = SelectorError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum SelectorError {
    #[snafu(display("label selector with binary operator {operator:?} must have values"))]
    LabelSelectorBinaryOperatorWithoutValues { operator: String },

    #[snafu(display("label selector with unary operator {operator:?} must not have values"))]
    LabelSelectorUnaryOperatorWithValues { operator: String },

    #[snafu(display("labelSelector has an invalid operator {operator:?}"))]
    LabelSelectorInvalidOperator { operator: String },
}

/// Builds a selector whose match labels are `labels` verbatim and whose match expressions are the
/// ordered translation of `expressions`.
///
/// Empty inputs produce an empty selector (both clauses present but empty), never a missing one.
pub fn build_selector(
    labels: &BTreeMap<String, String>,
    expressions: &[ExpressionRequirementConfig],
) -> LabelSelector {
    LabelSelector {
        match_labels: Some(labels.clone()),
        match_expressions: Some(expressions.iter().map(build_requirement).collect()),
    }
}

/// Shorthand for [`build_selector`] from a [`SelectorConfig`].
pub fn build_selector_from_config(config: &SelectorConfig) -> LabelSelector {
    build_selector(&config.labels, &config.expressions)
}

/// Translates one expression config into a [`LabelSelectorRequirement`].
///
/// Key and values are copied as they are, except that an empty value list is left out. An unset
/// operator stays unset (an empty string) and is left for the API server to reject.
pub fn build_requirement(config: &ExpressionRequirementConfig) -> LabelSelectorRequirement {
    LabelSelectorRequirement {
        key: config.key.clone(),
        operator: operator_token(config.operator).to_owned(),
        values: (!config.values.is_empty()).then(|| config.values.clone()),
    }
}

pub(crate) fn operator_token(operator: SelectorOperator) -> &'static str {
    match operator {
        SelectorOperator::In => "In",
        SelectorOperator::NotIn => "NotIn",
        SelectorOperator::Exists => "Exists",
        SelectorOperator::DoesNotExist => "DoesNotExist",
        SelectorOperator::Unset => "",
    }
}

/// Selector mutation for resources that own an optional [`LabelSelector`].
///
/// Adding methods create the selector on first use. Removing methods never create it, so a
/// selector that was never added to stays absent.
pub trait SelectorExt {
    fn label_selector(&self) -> Option<&LabelSelector>;

    fn label_selector_mut(&mut self) -> &mut Option<LabelSelector>;

    /// Merges `labels` into the match labels. On a key collision the new value wins.
    fn add_match_labels_selectors<K, V>(
        &mut self,
        labels: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let selector = self
            .label_selector_mut()
            .get_or_insert_with(LabelSelector::default);
        merge_pairs(&mut selector.match_labels, labels);
        self
    }

    fn remove_match_labels_selectors(
        &mut self,
        keys: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> &mut Self {
        if let Some(selector) = self.label_selector_mut() {
            remove_keys(&mut selector.match_labels, keys);
        }
        self
    }

    /// Appends the requirement. Requirements are never merged, even when they share a key.
    fn add_match_expressions_selector(
        &mut self,
        requirement: &ExpressionRequirementConfig,
    ) -> &mut Self {
        self.label_selector_mut()
            .get_or_insert_with(LabelSelector::default)
            .match_expressions
            .get_or_insert_with(Vec::new)
            .push(build_requirement(requirement));
        self
    }

    /// Removes every expression equal to `requirement` on key, operator and values.
    fn remove_match_expressions_selector(
        &mut self,
        requirement: &ExpressionRequirementConfig,
    ) -> &mut Self {
        let requirement = build_requirement(requirement);
        if let Some(expressions) = self
            .label_selector_mut()
            .as_mut()
            .and_then(|selector| selector.match_expressions.as_mut())
        {
            expressions.retain(|expression| expression != &requirement);
        }
        self
    }
}

impl SelectorExt for PodAffinityTerm {
    fn label_selector(&self) -> Option<&LabelSelector> {
        self.label_selector.as_ref()
    }

    fn label_selector_mut(&mut self) -> &mut Option<LabelSelector> {
        &mut self.label_selector
    }
}

/// This trait extends the functionality of [`LabelSelector`].
pub trait LabelSelectorExt {
    /// Takes a [`LabelSelector`] and converts it to a String that can be used
    /// in Kubernetes API calls. It will return an error if the LabelSelector
    /// contains illegal things (e.g. an `Exists` operator with a value).
    fn to_query_string(&self) -> Result<String>;
}

impl LabelSelectorExt for LabelSelector {
    fn to_query_string(&self) -> Result<String> {
        let mut terms: Vec<String> = self
            .match_labels
            .iter()
            .flatten()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();

        for requirement in self.match_expressions.iter().flatten() {
            let has_values = requirement
                .values
                .as_ref()
                .is_some_and(|values| !values.is_empty());

            let term = match requirement.operator.as_str() {
                operator @ ("In" | "NotIn") => {
                    if !has_values {
                        return LabelSelectorBinaryOperatorWithoutValuesSnafu { operator }.fail();
                    }
                    format!(
                        "{} {} ({})",
                        requirement.key,
                        operator.to_ascii_lowercase(),
                        requirement.values.as_deref().unwrap_or_default().join(", ")
                    )
                }
                operator @ ("Exists" | "DoesNotExist") => {
                    if has_values {
                        return LabelSelectorUnaryOperatorWithValuesSnafu { operator }.fail();
                    }
                    if operator == "Exists" {
                        requirement.key.clone()
                    } else {
                        format!("!{}", requirement.key)
                    }
                }
                operator => return LabelSelectorInvalidOperatorSnafu { operator }.fail(),
            };
            terms.push(term);
        }

        Ok(terms.join(","))
    }
}
