// 🧭 Movement Classifier - Trajectory tags from the change log
// Derives new / moved-in / moved-out / unchanged per blip by scanning its
// append-only history inside a rolling window. Absence of a recent signal
// means stability.

use chrono::{DateTime, Utc};

use crate::config::RadarConfig;
use crate::model::{
    age_days, group_logs_by_blip, parse_timestamp, sort_logs_by_created, Blip, MovementState,
    RecordChangeLog,
};

// ============================================================================
// BATCH RESULT
// ============================================================================

/// Movement tag for one blip, produced by the batch annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlipMovement {
    pub id: String,
    pub movement: MovementState,
}

// ============================================================================
// MOVEMENT CLASSIFIER
// ============================================================================

pub struct MovementClassifier {
    /// Rolling window in days; entries older than this carry no signal
    /// (default: 30)
    pub max_age_days: f64,

    /// Canonical maturity ordering of ring ids, innermost (most adopted)
    /// first
    pub ring_order: Vec<String>,
}

impl MovementClassifier {
    /// Create a classifier with the production defaults
    pub fn new() -> Self {
        MovementClassifier {
            max_age_days: 30.0,
            ring_order: vec![
                "adopt".to_string(),
                "trial".to_string(),
                "assess".to_string(),
                "hold".to_string(),
            ],
        }
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        MovementClassifier {
            max_age_days: config.max_age_days,
            ring_order: config.ring_order.clone(),
        }
    }

    /// Position of a ring id in the canonical ordering; lower = more adopted
    fn maturity(&self, ring: &str) -> Option<usize> {
        self.ring_order.iter().position(|id| id == ring)
    }

    /// Classify one blip from its current ring and ordered history, against
    /// an explicit clock.
    ///
    /// Total over any input: entries with an unparsable `created` are
    /// treated as infinitely old and drop out of the window; a ring id
    /// missing from the canonical ordering cannot witness a transition.
    pub fn classify_at(
        &self,
        now: DateTime<Utc>,
        current_ring: &str,
        history: &[RecordChangeLog],
    ) -> MovementState {
        // Keep only entries inside the rolling window, oldest first
        let mut recent: Vec<&RecordChangeLog> = history
            .iter()
            .filter(|log| {
                parse_timestamp(&log.created)
                    .map(|created| age_days(now, created) <= self.max_age_days)
                    .unwrap_or(false)
            })
            .collect();

        if recent.is_empty() {
            return MovementState::Unchanged;
        }

        recent.sort_by(|a, b| {
            let ta = parse_timestamp(&a.created);
            let tb = parse_timestamp(&b.created);
            ta.cmp(&tb).then_with(|| a.id.cmp(&b.id))
        });

        // Most-recent-first scan for the first entry recorded in a
        // different ring than the blip sits in today
        for log in recent.iter().rev() {
            if log.ring == current_ring {
                continue;
            }

            let (Some(historical), Some(current)) =
                (self.maturity(&log.ring), self.maturity(current_ring))
            else {
                continue;
            };

            if historical > current {
                // Was further out, now further in: advancing
                return MovementState::MovedIn;
            }
            if historical < current {
                return MovementState::MovedOut;
            }
        }

        // Ring constant across the window; new only if the window reaches
        // back to the item's first-ever record
        if recent[0].is_first_record() {
            MovementState::New
        } else {
            MovementState::Unchanged
        }
    }

    /// Classify against the wall clock. Tests use [`classify_at`] directly.
    ///
    /// [`classify_at`]: MovementClassifier::classify_at
    pub fn classify(&self, current_ring: &str, history: &[RecordChangeLog]) -> MovementState {
        self.classify_at(Utc::now(), current_ring, history)
    }

    /// Annotate every blip from a flat change-log table, against an
    /// explicit clock.
    ///
    /// Logs are grouped by `blip_id` and sorted by `created`; a blip with
    /// no entries in the table falls back to its embedded history. Output
    /// order follows the input blips.
    pub fn annotate_at(
        &self,
        now: DateTime<Utc>,
        blips: &[Blip],
        logs: &[RecordChangeLog],
    ) -> Vec<BlipMovement> {
        let grouped = group_logs_by_blip(logs);

        blips
            .iter()
            .map(|blip| {
                let movement = match grouped.get(&blip.id) {
                    Some(history) => self.classify_at(now, &blip.ring, history),
                    None => {
                        let mut history = blip.history.clone();
                        sort_logs_by_created(&mut history);
                        self.classify_at(now, &blip.ring, &history)
                    }
                };

                BlipMovement {
                    id: blip.id.clone(),
                    movement,
                }
            })
            .collect()
    }

    /// Annotate against the wall clock.
    pub fn annotate(&self, blips: &[Blip], logs: &[RecordChangeLog]) -> Vec<BlipMovement> {
        self.annotate_at(Utc::now(), blips, logs)
    }
}

impl Default for MovementClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
