//! Prometheus Quote Observer - Quoting Observability
//!
//! Registers Prometheus counters for every quoting event and renders
//! them in text exposition format on demand. There is no embedded HTTP
//! server; callers scrape via `export` and ship the string wherever
//! they like (logs, files, a sidecar).

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

use crate::ports::observer::{QuoteEvent, QuoteObserver};

/// Centralized Prometheus metrics for the quoting engine.
///
/// All metrics follow the naming convention `binary_mm_*`.
pub struct PrometheusObserver {
    /// Prometheus registry.
    registry: Registry,
    /// Total quotes emitted counter.
    pub quotes_emitted: IntCounter,
    /// Quotes priced off the 0.5 fallback mid.
    pub empty_book_fallbacks: IntCounter,
    /// Skew clamps that hit a probability boundary.
    pub skew_saturations: IntCounter,
    /// Quotes whose bid/ask ordering needed repair.
    pub ordering_repairs: IntCounter,
    /// Grid steps widened per repaired quote.
    pub repair_steps: Histogram,
    /// Orders dropped by the rate limiter.
    pub orders_throttled: IntCounter,
    /// Kill switch activations.
    pub kill_switch_trips: IntCounter,
}

impl PrometheusObserver {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let quotes_emitted = IntCounter::with_opts(Opts::new(
            "binary_mm_quotes_emitted_total",
            "Total two-sided quotes emitted",
        ))?;

        let empty_book_fallbacks = IntCounter::with_opts(Opts::new(
            "binary_mm_empty_book_fallbacks_total",
            "Quotes priced off the 0.5 fallback mid",
        ))?;

        let skew_saturations = IntCounter::with_opts(Opts::new(
            "binary_mm_skew_saturations_total",
            "Inventory skews clamped at a probability boundary",
        ))?;

        let ordering_repairs = IntCounter::with_opts(Opts::new(
            "binary_mm_ordering_repairs_total",
            "Quotes whose bid/ask ordering needed repair",
        ))?;

        let repair_steps = Histogram::with_opts(
            HistogramOpts::new(
                "binary_mm_repair_steps",
                "Grid steps widened per repaired quote",
            )
            .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0]),
        )?;

        let orders_throttled = IntCounter::with_opts(Opts::new(
            "binary_mm_orders_throttled_total",
            "Orders dropped by the rate limiter",
        ))?;

        let kill_switch_trips = IntCounter::with_opts(Opts::new(
            "binary_mm_kill_switch_trips_total",
            "Kill switch activations",
        ))?;

        // Register all metrics
        registry.register(Box::new(quotes_emitted.clone()))?;
        registry.register(Box::new(empty_book_fallbacks.clone()))?;
        registry.register(Box::new(skew_saturations.clone()))?;
        registry.register(Box::new(ordering_repairs.clone()))?;
        registry.register(Box::new(repair_steps.clone()))?;
        registry.register(Box::new(orders_throttled.clone()))?;
        registry.register(Box::new(kill_switch_trips.clone()))?;

        Ok(Self {
            registry,
            quotes_emitted,
            empty_book_fallbacks,
            skew_saturations,
            ordering_repairs,
            repair_steps,
            orders_throttled,
            kill_switch_trips,
        })
    }

    /// Render all registered metrics in text exposition format.
    pub fn export(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl QuoteObserver for PrometheusObserver {
    fn record(&self, event: QuoteEvent) {
        match event {
            QuoteEvent::QuoteEmitted => self.quotes_emitted.inc(),
            QuoteEvent::EmptyBookFallback => self.empty_book_fallbacks.inc(),
            QuoteEvent::SkewSaturated => self.skew_saturations.inc(),
            QuoteEvent::OrderingRepaired { steps } => {
                self.ordering_repairs.inc();
                self.repair_steps.observe(f64::from(steps));
            }
            QuoteEvent::OrderThrottled => self.orders_throttled.inc(),
            QuoteEvent::KillSwitchTripped => self.kill_switch_trips.inc(),
        }
    }
}
