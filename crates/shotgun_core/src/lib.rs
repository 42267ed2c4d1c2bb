//! Shared bucket-replication domain primitives.
//!
//! This crate owns the queue message contract, the crawl partition model,
//! and the worker-pool scaling arithmetic. It intentionally excludes AWS
//! SDK and async runtime concerns, which live in `crates/shotgun_aws`.

pub mod message;
pub mod partition;
pub mod scaling;
