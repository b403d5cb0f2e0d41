#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Temporal aggregation over normalized animal complaints.
//!
//! Each public function is a pure mapping from a record slice to one
//! count table; [`temporal::aggregate`] bundles them for the pipeline.
//! Counts are order-independent integer sums, so every table is
//! reproducible regardless of input ordering and no floating point is
//! involved.

pub mod temporal;

pub use temporal::aggregate;
