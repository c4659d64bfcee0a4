//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml`. All quoting
//! parameters, risk limits, and scenario knobs are externalized here -
//! nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::pricing::{MidSource, ModelKind};

/// Top-level bot configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the bot begins operation.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Bot identity and logging.
  pub bot: BotConfig,
  /// Market definitions.
  pub markets: Vec<MarketConfig>,
  /// Quoting strategy parameters.
  pub strategy: StrategyConfig,
  /// Risk management parameters.
  pub risk: RiskConfig,
  /// Order routing and rate limiting.
  pub routing: RoutingConfig,
  /// Replay scenario parameters.
  pub replay: ReplayConfig,
  /// Metrics configuration.
  #[serde(default)]
  pub metrics: MetricsConfig,
  /// Persistence configuration.
  #[serde(default)]
  pub persistence: PersistenceConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit logs as JSON instead of human-readable lines.
  #[serde(default)]
  pub json_logs: bool,
}

/// Individual market configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  /// Market identifier.
  pub id: String,
  /// Human-readable market question.
  pub question: String,
  /// Price grid increment.
  #[serde(default = "default_tick_size")]
  pub tick_size: f64,
  /// Whether this market is actively quoted.
  #[serde(default = "default_true")]
  pub active: bool,
}

/// Quoting strategy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
  /// Total quoted spread in basis points.
  #[serde(default = "default_spread_bps")]
  pub spread_bps: u32,
  /// Inventory skew sensitivity (probability shift per unit held).
  #[serde(default = "default_inventory_alpha")]
  pub inventory_alpha: f64,
  /// Quantity on each side of the quote.
  #[serde(default = "default_qty")]
  pub default_qty: f64,
  /// LMSR liquidity parameter (b). Higher = flatter prices.
  #[serde(default = "default_liquidity_b")]
  pub liquidity_b: f64,
  /// Pricing model selection.
  #[serde(default)]
  pub model: ModelKind,
  /// Where the pre-skew mid comes from.
  #[serde(default)]
  pub mid_source: MidSource,
}

/// Risk management configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
  /// Maximum notional per order.
  pub max_order_notional: f64,
  /// Maximum absolute net YES position per market.
  pub max_position: f64,
  /// Loss at which the kill switch trips (positive number).
  pub max_loss: f64,
}

/// Order routing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
  /// Maximum orders per minute before throttling.
  #[serde(default = "default_max_orders")]
  pub max_orders_per_minute: u32,
}

/// Replay scenario configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
  /// Number of price steps to simulate.
  #[serde(default = "default_steps")]
  pub steps: usize,
  /// Maximum absolute mid move per step.
  #[serde(default = "default_step_size")]
  pub step_size: f64,
  /// Starting mid for the random walk.
  #[serde(default = "default_start_mid")]
  pub start_mid: f64,
  /// RNG seed for reproducible walks.
  #[serde(default = "default_seed")]
  pub seed: u64,
  /// Wall-clock pacing multiplier (0 = as fast as possible).
  #[serde(default)]
  pub speed: f64,
  /// Simulated interval between steps (milliseconds).
  #[serde(default = "default_step_interval")]
  pub step_interval_ms: u64,
  /// Book snapshots retained per market.
  #[serde(default = "default_book_window")]
  pub book_window: usize,
  /// Simulated venue taker fee in basis points.
  #[serde(default)]
  pub fee_bps: f64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus counters and the final export dump.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Directory for JSONL trade logs and state snapshots.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_tick_size() -> f64 {
  0.01
}

fn default_spread_bps() -> u32 {
  100
}

fn default_inventory_alpha() -> f64 {
  0.01
}

fn default_qty() -> f64 {
  10.0
}

fn default_liquidity_b() -> f64 {
  100.0
}

fn default_max_orders() -> u32 {
  50
}

fn default_steps() -> usize {
  200
}

fn default_step_size() -> f64 {
  0.01
}

fn default_start_mid() -> f64 {
  0.5
}

fn default_seed() -> u64 {
  42
}

fn default_step_interval() -> u64 {
  1_000
}

fn default_book_window() -> usize {
  64
}

fn default_data_dir() -> String {
  "data".to_string()
}
