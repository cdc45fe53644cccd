//! Label, annotation and finalizer mutation on anything that carries an [`ObjectMeta`].
use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{DaemonSet, Deployment, StatefulSet},
        core::v1::{ConfigMap, Namespace, Pod, ReplicationController, Secret, Service},
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};

/// This trait gives every resource with an [`ObjectMeta`] block the same label, annotation and
/// finalizer semantics.
///
/// Implementors only provide the accessors, all mutation logic lives in the provided methods.
/// None of the methods can fail.
pub trait ObjectMetaExt {
    fn object_meta(&self) -> &ObjectMeta;

    fn object_meta_mut(&mut self) -> &mut ObjectMeta;

    /// Merges `labels` into the existing labels. On a key collision the new value wins.
    fn add_labels<K, V>(&mut self, labels: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        merge_pairs(&mut self.object_meta_mut().labels, labels);
        self
    }

    /// Removes every listed label key. Keys that are not present are ignored.
    fn remove_labels(&mut self, keys: impl IntoIterator<Item = impl AsRef<str>>) -> &mut Self {
        remove_keys(&mut self.object_meta_mut().labels, keys);
        self
    }

    /// Merges `annotations` into the existing annotations. On a key collision the new value wins.
    fn add_annotations<K, V>(&mut self, annotations: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        merge_pairs(&mut self.object_meta_mut().annotations, annotations);
        self
    }

    /// Removes every listed annotation key. Keys that are not present are ignored.
    fn remove_annotations(&mut self, keys: impl IntoIterator<Item = impl AsRef<str>>) -> &mut Self {
        remove_keys(&mut self.object_meta_mut().annotations, keys);
        self
    }

    /// Appends every finalizer that is not yet present, in the given order.
    ///
    /// A finalizer that already exists keeps its position and is not appended again. This is
    /// not a plain set union: `[a]` plus `[b, a]` yields `[a, b]`.
    fn add_finalizers(
        &mut self,
        finalizers: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        let existing = self
            .object_meta_mut()
            .finalizers
            .get_or_insert_with(Vec::new);

        for finalizer in finalizers {
            let finalizer = finalizer.into();
            if !existing.contains(&finalizer) {
                existing.push(finalizer);
            }
        }
        self
    }

    /// Removes the first occurrence of `finalizer`, keeping the order of the remaining entries.
    fn remove_finalizer(&mut self, finalizer: &str) -> &mut Self {
        if let Some(finalizers) = &mut self.object_meta_mut().finalizers
            && let Some(position) = finalizers.iter().position(|f| f == finalizer)
        {
            finalizers.remove(position);
        }
        self
    }

    fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.object_meta().labels.as_ref()
    }

    fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.object_meta().annotations.as_ref()
    }

    fn finalizers(&self) -> &[String] {
        self.object_meta().finalizers.as_deref().unwrap_or_default()
    }
}

pub(crate) fn merge_pairs<K, V, T>(
    target: &mut Option<BTreeMap<String, T>>,
    pairs: impl IntoIterator<Item = (K, V)>,
) where
    K: Into<String>,
    V: Into<T>,
{
    target
        .get_or_insert_with(BTreeMap::new)
        .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
}

pub(crate) fn remove_keys(
    target: &mut Option<BTreeMap<String, String>>,
    keys: impl IntoIterator<Item = impl AsRef<str>>,
) {
    if let Some(map) = target {
        for key in keys {
            map.remove(key.as_ref());
        }
    }
}

macro_rules! impl_object_meta_ext {
    ($($resource:ty),* $(,)?) => {
        $(
            impl ObjectMetaExt for $resource {
                fn object_meta(&self) -> &ObjectMeta {
                    &self.metadata
                }

                fn object_meta_mut(&mut self) -> &mut ObjectMeta {
                    &mut self.metadata
                }
            }
        )*
    };
}

impl_object_meta_ext!(
    ConfigMap,
    DaemonSet,
    Deployment,
    Namespace,
    Pod,
    ReplicationController,
    Secret,
    Service,
    StatefulSet,
);
