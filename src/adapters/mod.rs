//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure (file I/O, metrics registries, simulated exchanges).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `metrics`: Prometheus quote-event counters
//! - `persistence`: JSONL trade logging and state snapshots
//! - `venue`: in-memory mock exchange for replay and backtests

pub mod metrics;
pub mod persistence;
pub mod venue;
