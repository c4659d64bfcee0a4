//! Bounded order-book history.
//!
//! Keeps the most recent snapshots for one market so drivers can mark
//! positions to the latest mid without re-fetching the venue.

use std::collections::VecDeque;

use crate::domain::types::OrderBookSnapshot;

/// Fixed-size window of recent book snapshots, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingBook {
    window: usize,
    history: VecDeque<OrderBookSnapshot>,
}

impl RollingBook {
    /// Creates a window holding up to `window` snapshots (minimum 1).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Appends a snapshot, evicting the oldest once the window is full.
    pub fn push(&mut self, snapshot: OrderBookSnapshot) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }

    /// The most recent snapshot, if any.
    pub fn last(&self) -> Option<&OrderBookSnapshot> {
        self.history.back()
    }

    /// Mid price of the most recent snapshot, if one exists and has
    /// both sides.
    pub fn last_mid(&self) -> Option<f64> {
        self.last().and_then(OrderBookSnapshot::mid)
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True when no snapshot has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
