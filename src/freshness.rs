// ⏳ Freshness Model - Recency decay and opacity
// Maps the age of a blip's last update to a bounded [0, 1] decay value,
// then to the opacity the rendering layer paints its ring stroke with.

use chrono::{DateTime, Utc};

use crate::config::RadarConfig;
use crate::model::{age_days, parse_timestamp, Blip};

pub struct FreshnessModel {
    /// Exponential decay rate per day (default: 0.1 — ten-day-old changes
    /// sit near 0.63, thirty-day-old near 0.95)
    pub decay_rate: f64,

    /// Opacity of a maximally stale item (default: 0.1)
    pub min_opacity: f64,

    /// Opacity of a maximally fresh item (default: 1.0)
    pub max_opacity: f64,
}

impl FreshnessModel {
    /// Create a model with the production defaults
    pub fn new() -> Self {
        FreshnessModel {
            decay_rate: 0.1,
            min_opacity: 0.1,
            max_opacity: 1.0,
        }
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        FreshnessModel {
            decay_rate: config.decay_rate,
            min_opacity: config.min_opacity,
            max_opacity: config.max_opacity,
        }
    }

    /// Staleness of an update timestamp against an explicit clock:
    /// `clamp(1 - e^(-rate * age_days), 0, 1)`.
    ///
    /// Perceived staleness of a change drops fastest right after the change
    /// and flattens afterwards, hence exponential rather than linear decay.
    ///
    /// Policy fallbacks, not derived from the formula: an empty or
    /// unparsable timestamp reads as 0 (maximally fresh); a timestamp in
    /// the future reads as 1 (maximally stale).
    pub fn freshness_at(&self, now: DateTime<Utc>, updated: &str) -> f64 {
        let Some(timestamp) = parse_timestamp(updated) else {
            return 0.0;
        };

        let age = age_days(now, timestamp);
        if age < 0.0 {
            return 1.0;
        }

        (1.0 - (-self.decay_rate * age).exp()).clamp(0.0, 1.0)
    }

    /// Staleness against the wall clock. Tests use [`freshness_at`]
    /// directly.
    ///
    /// [`freshness_at`]: FreshnessModel::freshness_at
    pub fn freshness(&self, updated: &str) -> f64 {
        self.freshness_at(Utc::now(), updated)
    }

    /// Linear interpolation from freshness to render opacity: fresher items
    /// render more opaque.
    pub fn opacity(&self, freshness: f64) -> f64 {
        self.max_opacity - freshness * (self.max_opacity - self.min_opacity)
    }

    /// Opacity for one blip from its `updated` timestamp, against an
    /// explicit clock. A blip that was never updated renders fully opaque.
    pub fn blip_opacity_at(&self, now: DateTime<Utc>, blip: &Blip) -> f64 {
        let freshness = match &blip.updated {
            Some(updated) => self.freshness_at(now, updated),
            None => 0.0,
        };
        self.opacity(freshness)
    }

    /// Opacity for one blip against the wall clock.
    pub fn blip_opacity(&self, blip: &Blip) -> f64 {
        self.blip_opacity_at(Utc::now(), blip)
    }
}

impl Default for FreshnessModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
