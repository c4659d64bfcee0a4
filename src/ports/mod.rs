//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `Venue`: Market discovery, order books, order placement
//! - `QuoteObserver`: Telemetry sink for quoting events
//! - `Repository`: State persistence (JSONL-based)

pub mod observer;
pub mod repository;
pub mod venue;
