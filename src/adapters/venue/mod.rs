//! Venue Adapters
//!
//! Implementations of the `Venue` port. Only the in-memory mock venue
//! ships today; a live exchange adapter would slot in beside it.

pub mod mock;

pub use mock::MockVenue;
