//! Service configuration.
//!
//! ```rust
//! # use rhull::config::Config;
//! let config = Config::from_json(r#"{ "default_alpha": 2.5 }"#).unwrap();
//! assert_eq!(config.default_alpha, 2.5);
//! assert_eq!(config.max_points, Config::default().max_points);
//! ```
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::concave_hull::alpha_shape::check_alpha;
use crate::{Error, HullOptions, Tolerance};

/// Knobs of [`HullService`](crate::service::HullService). Missing keys take
/// their default; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Alpha used when a concave hull request does not carry one.
  pub default_alpha: f64,
  /// Relative colinearity epsilon, `0` for exact predicates.
  pub tolerance: Tolerance,
  /// Largest accepted point count per request.
  pub max_points: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      default_alpha: 10.0,
      tolerance: Tolerance::EXACT,
      max_points: 1_000_000,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("malformed configuration: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("invalid configuration: {0}")]
  Invalid(#[from] Error),
}

impl Config {
  /// Parse and validate a JSON document.
  pub fn from_json(text: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(text)?;
    config.validate()?;
    debug!(?config, "loaded configuration");
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), Error> {
    check_alpha(self.default_alpha)?;
    self.tolerance.validate()
  }

  pub fn options(&self) -> HullOptions {
    HullOptions::new().with_tolerance(self.tolerance)
  }
}
