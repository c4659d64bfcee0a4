//! Metrics Adapters
//!
//! Prometheus-backed implementation of the `QuoteObserver` port.
//! Counters only; rendering happens on demand via text exposition.

pub mod prometheus;

pub use prometheus::PrometheusObserver;
