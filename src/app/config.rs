use crate::game::constants::{
  DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_FOOD_COUNT, DEFAULT_TICK_RATE,
  MAX_BOARD_CELLS, MIN_BOARD_SIDE,
};
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub port: u16,
  pub board_width: i32,
  pub board_height: i32,
  pub tick_rate: u32,
  pub food_count: usize,
  pub seed: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      board_width: DEFAULT_BOARD_WIDTH,
      board_height: DEFAULT_BOARD_HEIGHT,
      tick_rate: DEFAULT_TICK_RATE,
      food_count: DEFAULT_FOOD_COUNT,
      seed: 0,
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Unparseable values fall back to defaults; values that cannot run a game
  /// are rejected.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
    fn parsed<T: std::str::FromStr>(
      lookup: &impl Fn(&str) -> Option<String>,
      key: &str,
      default: T,
    ) -> T {
      lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
    }

    let defaults = Self::default();
    let config = Self {
      port: parsed(&lookup, "PORT", defaults.port),
      board_width: parsed(&lookup, "BOARD_WIDTH", defaults.board_width),
      board_height: parsed(&lookup, "BOARD_HEIGHT", defaults.board_height),
      tick_rate: parsed(&lookup, "TICK_RATE", defaults.tick_rate),
      food_count: parsed(&lookup, "FOOD_COUNT", defaults.food_count),
      seed: parsed(&lookup, "GAME_SEED", rand::random()),
    };

    anyhow::ensure!(
      config.board_width >= MIN_BOARD_SIDE && config.board_height >= MIN_BOARD_SIDE,
      "board must be at least {MIN_BOARD_SIDE}x{MIN_BOARD_SIDE}, got {}x{}",
      config.board_width,
      config.board_height
    );
    let cells = i64::from(config.board_width) * i64::from(config.board_height);
    anyhow::ensure!(
      cells <= MAX_BOARD_CELLS as i64,
      "board {}x{} exceeds {MAX_BOARD_CELLS} cells",
      config.board_width,
      config.board_height
    );
    anyhow::ensure!(config.tick_rate > 0, "TICK_RATE must be positive");
    Ok(config)
  }

  pub fn tick_period(&self) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
    let values: HashMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    ServerConfig::from_lookup(|key| values.get(key).cloned())
  }

  #[test]
  fn defaults_match_the_classic_board() {
    let config = config_from(&[("GAME_SEED", "5")]).unwrap();
    assert_eq!(
      config,
      ServerConfig {
        seed: 5,
        ..ServerConfig::default()
      }
    );
    assert_eq!(config.board_width, 50);
    assert_eq!(config.board_height, 50);
    assert_eq!(config.tick_rate, 15);
  }

  #[test]
  fn reads_overrides_and_ignores_junk() {
    let config = config_from(&[
      ("PORT", "9000"),
      ("BOARD_WIDTH", " 20 "),
      ("BOARD_HEIGHT", "abc"),
      ("TICK_RATE", "10"),
      ("FOOD_COUNT", "3"),
    ])
    .unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.board_width, 20);
    assert_eq!(config.board_height, DEFAULT_BOARD_HEIGHT);
    assert_eq!(config.tick_period(), Duration::from_millis(100));
    assert_eq!(config.food_count, 3);
  }

  #[test]
  fn rejects_unplayable_settings() {
    assert!(config_from(&[("BOARD_WIDTH", "2")]).is_err());
    assert!(config_from(&[("BOARD_HEIGHT", "-4")]).is_err());
    assert!(config_from(&[("TICK_RATE", "0")]).is_err());
    assert!(config_from(&[("BOARD_WIDTH", "65536"), ("BOARD_HEIGHT", "65536")]).is_err());
    assert!(config_from(&[("BOARD_WIDTH", "2048"), ("BOARD_HEIGHT", "1024")]).is_err());
    assert!(config_from(&[("BOARD_WIDTH", "1024"), ("BOARD_HEIGHT", "1024")]).is_ok());
  }
}
