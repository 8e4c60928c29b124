// ⚙️ Radar Configuration - Injected tunables for all three engines
// Ring weights, rolling window, decay rate and placement paddings live here
// instead of as literals inside the engines.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// DEFAULTS
// ============================================================================

fn default_ring_ratios() -> [f64; 4] {
    [0.4, 0.3, 0.2, 0.1]
}

fn default_ring_order() -> Vec<String> {
    vec![
        "adopt".to_string(),
        "trial".to_string(),
        "assess".to_string(),
        "hold".to_string(),
    ]
}

fn default_max_age_days() -> f64 {
    30.0
}

fn default_decay_rate() -> f64 {
    0.1
}

fn default_min_opacity() -> f64 {
    0.1
}

fn default_max_opacity() -> f64 {
    1.0
}

fn default_angle_padding() -> f64 {
    std::f64::consts::PI / 24.0
}

fn default_band_inner_fraction() -> f64 {
    0.2
}

fn default_band_span_fraction() -> f64 {
    0.7
}

// ============================================================================
// CONFIG RECORD
// ============================================================================

/// Every tunable the radar core consumes, with the production values as
/// defaults. Loaded from JSON or built in code; validated before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Radial share of each ring, innermost first. Four positive numbers
    /// summing to 1, scaled by the visualization radius.
    #[serde(default = "default_ring_ratios")]
    pub ring_ratios: [f64; 4],

    /// Canonical maturity ordering of ring ids, innermost (most adopted)
    /// first. Drives the advancing/regressing comparison.
    #[serde(default = "default_ring_order")]
    pub ring_order: Vec<String>,

    /// Rolling window for movement classification, in days
    #[serde(default = "default_max_age_days")]
    pub max_age_days: f64,

    /// Exponential decay rate for freshness, per day
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,

    /// Opacity rendered for a maximally stale item
    #[serde(default = "default_min_opacity")]
    pub min_opacity: f64,

    /// Opacity rendered for a maximally fresh item
    #[serde(default = "default_max_opacity")]
    pub max_opacity: f64,

    /// Angular inset keeping placed points away from quadrant dividers,
    /// in radians
    #[serde(default = "default_angle_padding")]
    pub angle_padding: f64,

    /// Start of the usable radial window inside a ring band (fraction of
    /// band width)
    #[serde(default = "default_band_inner_fraction")]
    pub band_inner_fraction: f64,

    /// Extent of the usable radial window inside a ring band (fraction of
    /// band width)
    #[serde(default = "default_band_span_fraction")]
    pub band_span_fraction: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        RadarConfig {
            ring_ratios: default_ring_ratios(),
            ring_order: default_ring_order(),
            max_age_days: default_max_age_days(),
            decay_rate: default_decay_rate(),
            min_opacity: default_min_opacity(),
            max_opacity: default_max_opacity(),
            angle_padding: default_angle_padding(),
            band_inner_fraction: default_band_inner_fraction(),
            band_span_fraction: default_band_span_fraction(),
        }
    }
}

impl RadarConfig {
    /// Load configuration from a JSON file. Missing fields fall back to the
    /// defaults; the result is validated before being returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read radar config: {:?}", path.as_ref()))?;

        let config: RadarConfig =
            serde_json::from_str(&content).context("Failed to parse radar config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Check every tunable for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.ring_ratios.iter().any(|w| *w <= 0.0) {
            bail!("ring_ratios must all be positive, got {:?}", self.ring_ratios);
        }

        let sum: f64 = self.ring_ratios.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            bail!("ring_ratios must sum to 1, got {}", sum);
        }

        if self.ring_order.is_empty() {
            bail!("ring_order must name at least one ring");
        }

        if self.max_age_days <= 0.0 {
            bail!("max_age_days must be positive, got {}", self.max_age_days);
        }

        if self.decay_rate <= 0.0 {
            bail!("decay_rate must be positive, got {}", self.decay_rate);
        }

        if !(0.0..=1.0).contains(&self.min_opacity)
            || !(0.0..=1.0).contains(&self.max_opacity)
            || self.min_opacity > self.max_opacity
        {
            bail!(
                "opacity range must satisfy 0 <= min <= max <= 1, got [{}, {}]",
                self.min_opacity,
                self.max_opacity
            );
        }

        if self.angle_padding < 0.0 || self.angle_padding >= std::f64::consts::PI / 4.0 {
            bail!(
                "angle_padding must lie in [0, π/4), got {}",
                self.angle_padding
            );
        }

        if self.band_inner_fraction < 0.0
            || self.band_span_fraction <= 0.0
            || self.band_inner_fraction + self.band_span_fraction > 1.0
        {
            bail!(
                "band window must fit inside [0, 1], got inner {} + span {}",
                self.band_inner_fraction,
                self.band_span_fraction
            );
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RadarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ring_ratios, [0.4, 0.3, 0.2, 0.1]);
        assert_eq!(config.ring_order[0], "adopt");
        assert_eq!(config.ring_order[3], "hold");
    }

    #[test]
    fn test_partial_json_gets_defaults() {
        let config: RadarConfig = serde_json::from_str(r#"{"decay_rate": 0.2}"#).unwrap();

        assert_eq!(config.decay_rate, 0.2);
        assert_eq!(config.max_age_days, 30.0);
        assert_eq!(config.ring_ratios, [0.4, 0.3, 0.2, 0.1]);
    }

    #[test]
    fn test_bad_ratio_sum_rejected() {
        let config = RadarConfig {
            ring_ratios: [0.4, 0.3, 0.2, 0.2],
            ..RadarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let config = RadarConfig {
            ring_ratios: [0.5, 0.5, 0.2, -0.2],
            ..RadarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_opacity_range_rejected() {
        let config = RadarConfig {
            min_opacity: 0.9,
            max_opacity: 0.1,
            ..RadarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nonpositive_window_rejected() {
        let config = RadarConfig {
            max_age_days: 0.0,
            ..RadarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_band_window_overflow_rejected() {
        let config = RadarConfig {
            band_inner_fraction: 0.5,
            band_span_fraction: 0.6,
            ..RadarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join("radar_core_config_test.json");
        fs::write(&path, r#"{"max_age_days": 14, "decay_rate": 0.05}"#).unwrap();

        let config = RadarConfig::from_file(&path).unwrap();
        assert_eq!(config.max_age_days, 14.0);
        assert_eq!(config.decay_rate, 0.05);
        assert_eq!(config.min_opacity, 0.1);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_file_missing_path_errors() {
        let result = RadarConfig::from_file("/nonexistent/radar-config.json");
        assert!(result.is_err());
    }
}
