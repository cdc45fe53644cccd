//! Builders for Kubernetes workload objects.
//!
//! Configuration fragments from [`config`] are turned into containers and volumes by the leaf
//! builders in [`builder::pod`], combined into pods and controllers by [`compose`], and handed
//! back to the caller as plain [`k8s_openapi`] objects. Nothing in this crate talks to a cluster.
//!
//! Metadata and selector mutation is shared through the [`metadata::ObjectMetaExt`] and
//! [`selector::SelectorExt`] traits. Non-fatal problems never abort a build; they are reported to
//! a [`diagnostics::Diagnostics`] sink and returned alongside the result.

pub mod builder;
pub mod compose;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod metadata;
pub mod selector;

// External re-exports
pub use k8s_openapi;
