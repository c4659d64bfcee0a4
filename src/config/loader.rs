//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config: AppConfig = toml::from_str(&content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;

  info!(
    markets = config.markets.len(),
    spread_bps = config.strategy.spread_bps,
    liquidity_b = config.strategy.liquidity_b,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive numeric values where required
/// - Valid probability and tick ranges (0..1)
/// - Sensible risk limits
/// - Non-empty market definitions
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // Market validation
  anyhow::ensure!(
    !config.markets.is_empty(),
    "At least one market must be configured"
  );

  for (i, market) in config.markets.iter().enumerate() {
    anyhow::ensure!(
      !market.id.is_empty(),
      "Market {} has an empty id",
      i
    );
    anyhow::ensure!(
      market.tick_size.is_finite()
        && market.tick_size > 0.0
        && market.tick_size < 1.0,
      "Market {} ({}) tick_size must be in (0, 1), got {}",
      i,
      market.id,
      market.tick_size
    );
  }

  // Strategy validation
  anyhow::ensure!(
    config.strategy.spread_bps > 0,
    "spread_bps must be positive, got {}",
    config.strategy.spread_bps
  );
  anyhow::ensure!(
    config.strategy.inventory_alpha.is_finite()
      && config.strategy.inventory_alpha >= 0.0,
    "inventory_alpha must be finite and non-negative, got {}",
    config.strategy.inventory_alpha
  );
  anyhow::ensure!(
    config.strategy.default_qty.is_finite() && config.strategy.default_qty > 0.0,
    "default_qty must be positive, got {}",
    config.strategy.default_qty
  );
  anyhow::ensure!(
    config.strategy.liquidity_b.is_finite() && config.strategy.liquidity_b > 0.0,
    "liquidity_b must be positive, got {}",
    config.strategy.liquidity_b
  );

  // Risk validation
  anyhow::ensure!(
    config.risk.max_order_notional > 0.0,
    "max_order_notional must be positive"
  );
  anyhow::ensure!(
    config.risk.max_position > 0.0,
    "max_position must be positive"
  );
  anyhow::ensure!(config.risk.max_loss > 0.0, "max_loss must be positive");

  // Routing validation
  anyhow::ensure!(
    config.routing.max_orders_per_minute > 0,
    "max_orders_per_minute must be positive, got {}",
    config.routing.max_orders_per_minute
  );

  // Replay validation
  anyhow::ensure!(config.replay.steps > 0, "replay steps must be positive");
  anyhow::ensure!(
    config.replay.step_size > 0.0 && config.replay.step_size < 0.5,
    "replay step_size must be in (0, 0.5), got {}",
    config.replay.step_size
  );
  anyhow::ensure!(
    config.replay.start_mid > 0.0 && config.replay.start_mid < 1.0,
    "replay start_mid must be in (0, 1), got {}",
    config.replay.start_mid
  );
  anyhow::ensure!(
    config.replay.speed >= 0.0 && config.replay.speed.is_finite(),
    "replay speed must be finite and non-negative, got {}",
    config.replay.speed
  );
  anyhow::ensure!(
    config.replay.book_window >= 1,
    "replay book_window must be at least 1"
  );
  anyhow::ensure!(
    config.replay.fee_bps >= 0.0,
    "replay fee_bps must be non-negative, got {}",
    config.replay.fee_bps
  );

  // Persistence validation
  anyhow::ensure!(
    !config.persistence.data_dir.is_empty(),
    "persistence data_dir must not be empty"
  );

  Ok(())
}
