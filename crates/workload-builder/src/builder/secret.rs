use std::collections::BTreeMap;

use k8s_openapi::{ByteString, api::core::v1::Secret, apimachinery::pkg::apis::meta::v1::ObjectMeta};

use crate::{
    builder::meta::ObjectMetaBuilder,
    config::SecretConfig,
    metadata::{ObjectMetaExt, merge_pairs},
};

/// A builder to build [`Secret`] objects.
///
/// `data` holds raw bytes (base64 encoded on the wire) and `stringData` holds plain strings that
/// the API server merges into `data` on write. Both are merged like labels: on a key collision
/// the new value wins.
#[derive(Clone, Debug, Default)]
pub struct SecretBuilder {
    metadata: ObjectMeta,
    secret_type: Option<String>,
    data: Option<BTreeMap<String, ByteString>>,
    string_data: Option<BTreeMap<String, String>>,
}

impl SecretBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new().name(name).build(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &SecretConfig) -> Self {
        Self {
            metadata: ObjectMetaBuilder::new()
                .name(&config.name)
                .namespace_opt(config.namespace.clone())
                .build(),
            secret_type: Some(config.secret_type.to_string()),
            ..Self::default()
        }
    }

    pub fn secret_type(&mut self, secret_type: impl Into<String>) -> &mut Self {
        self.secret_type = Some(secret_type.into());
        self
    }

    pub fn add_data<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        merge_pairs(
            &mut self.data,
            data.into_iter().map(|(k, v)| (k, ByteString(v.into()))),
        );
        self
    }

    pub fn add_string_data<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        merge_pairs(&mut self.string_data, data);
        self
    }

    pub fn build(&self) -> Secret {
        Secret {
            metadata: self.metadata.clone(),
            type_: self.secret_type.clone(),
            data: self.data.clone(),
            string_data: self.string_data.clone(),
            ..Secret::default()
        }
    }
}

impl ObjectMetaExt for SecretBuilder {
    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn object_meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::SecretType;

    fn bytes(pairs: &[(&str, &str)]) -> BTreeMap<String, ByteString> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), ByteString(v.as_bytes().to_vec())))
            .collect()
    }

    fn strings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn from_config() {
        let secret = SecretBuilder::from_config(&SecretConfig {
            namespace: Some("ns".to_owned()),
            secret_type: SecretType::Tls,
            ..SecretConfig::new("name")
        })
        .build();

        assert_eq!(secret.metadata.name.as_deref(), Some("name"));
        assert_eq!(secret.metadata.namespace.as_deref(), Some("ns"));
        assert_eq!(secret.type_.as_deref(), Some("kubernetes.io/tls"));
        assert_eq!(secret.data, None);
        assert_eq!(secret.string_data, None);
    }

    #[rstest]
    #[case::no_existing(&[], &[("key1", "data")], &[("key1", "data")])]
    #[case::no_overlap(&[("key0", "old")], &[("key1", "data")], &[("key0", "old"), ("key1", "data")])]
    #[case::overlap(&[("key1", "old")], &[("key1", "data"), ("key2", "more")], &[("key1", "data"), ("key2", "more")])]
    fn add_data_and_string_data(
        #[case] existing: &[(&str, &str)],
        #[case] new: &[(&str, &str)],
        #[case] expected: &[(&str, &str)],
    ) {
        let mut builder = SecretBuilder::new("name");
        builder
            .add_data(existing.iter().copied())
            .add_string_data(existing.iter().copied());

        let secret = builder
            .add_data(new.iter().map(|(k, v)| (*k, v.as_bytes())))
            .add_string_data(new.iter().copied())
            .build();

        assert_eq!(secret.data, Some(bytes(expected)));
        assert_eq!(secret.string_data, Some(strings(expected)));
    }

    #[test]
    fn later_changes_to_the_input_do_not_leak() {
        let mut data = BTreeMap::from([("key1".to_owned(), b"data".to_vec())]);
        let mut builder = SecretBuilder::new("name");
        builder.add_data(data.clone());
        data.remove("key1");

        assert_eq!(builder.build().data, Some(bytes(&[("key1", "data")])));
    }

    #[test]
    fn metadata_mutators_apply() {
        let secret = SecretBuilder::new("name")
            .secret_type("Opaque")
            .add_labels([("app", "webserver")])
            .add_finalizers(["cleanup"])
            .build();

        assert_eq!(secret.type_.as_deref(), Some("Opaque"));
        assert_eq!(secret.metadata.labels, Some(strings(&[("app", "webserver")])));
        assert_eq!(secret.metadata.finalizers, Some(vec!["cleanup".to_owned()]));
    }
}
