//! AWS-oriented adapters and workers for bucket replication fan-out.
//!
//! This crate owns runtime integration details (S3 listing, SQS dispatch,
//! ECS task launching, worker loops, and the binaries that host them)
//! around the pure domain logic in `crates/shotgun_core`. Every network
//! client is injected through an adapter trait so the worker loops run
//! against in-memory fakes in tests.

pub mod adapters;
pub mod crawler;
pub mod dispatch;
pub mod error;
pub mod handlers;
