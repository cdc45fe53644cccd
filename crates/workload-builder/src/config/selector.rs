use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The set operator of a single match expression.
///
/// [`SelectorOperator::Unset`] is what an expression carries when no operator was given (or an
/// unknown one was deserialized). It is not rejected here, the API server will do that.
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
    Hash,
    PartialEq,
    Serialize,
)]
pub enum SelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    #[default]
    #[serde(other, rename = "")]
    #[strum(serialize = "")]
    Unset,
}

/// One `{key, operator, values}` requirement of a label selector.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionRequirementConfig {
    pub key: String,
    #[serde(default)]
    pub operator: SelectorOperator,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ExpressionRequirementConfig {
    pub fn new(
        key: impl Into<String>,
        operator: SelectorOperator,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Equality terms plus set-based expressions, see [`crate::selector::build_selector`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub expressions: Vec<ExpressionRequirementConfig>,
}
