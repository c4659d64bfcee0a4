//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's core workflows. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `BinaryMmStrategy`: Two-sided quote generation with inventory skew
//! - `OrderRouter`: ID stamping, rate limiting, venue submission
//! - `RiskLimits`/`KillSwitch`: Pre-trade gates and loss latch
//! - `MarketStore`: Market registry and fill ledger
//! - `ReplayEngine`: Scenario-driven quoting loop

pub mod quoting;
pub mod replay;
pub mod risk;
pub mod router;
pub mod store;
