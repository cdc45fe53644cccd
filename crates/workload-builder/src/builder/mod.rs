//! This module provides builders for the workload objects this crate assembles.
//!
//! They are often not _pure_ builders but contain extra logic to set fields based on others or
//! to fill in sensible defaults.

pub mod controller;
pub mod meta;
pub mod pod;
pub mod secret;
