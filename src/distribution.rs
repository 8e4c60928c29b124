// 🎯 Position Solver - Deterministic sector placement
// Spreads each blip inside its quadrant+ring sector with a golden-ratio
// sequence plus seeded jitter, so identical inputs always land on identical
// coordinates and no two items in a sector coincide.

use sha2::{Digest, Sha256};

use crate::config::RadarConfig;
use crate::model::{group_by_sector, Blip, BlipPosition, Quadrant, Ring};

/// Fractional part of the golden ratio. Successive multiples mod 1 spread
/// indices near-uniformly over a unit interval.
const GOLDEN_RATIO_FRAC: f64 = 0.618033988749895;

// ============================================================================
// SEEDED GENERATOR
// ============================================================================

/// splitmix64 — a small deterministic generator with bit-identical output on
/// every platform. Seeded from the blip id so jitter is reproducible.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        SplitMix64 { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Next value in [0, 1), built from the top 53 bits
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Reduce a blip id to a 64-bit seed: first 8 bytes of its SHA-256 digest.
fn seed_from_id(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

// ============================================================================
// RING BANDS
// ============================================================================

/// Radial extent of one ring band, in the caller's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingBand {
    pub inner: f64,
    pub outer: f64,
}

impl RingBand {
    pub fn width(&self) -> f64 {
        self.outer - self.inner
    }
}

// ============================================================================
// POSITION SOLVER
// ============================================================================

pub struct PositionSolver {
    /// Radial share of each ring, innermost first (must sum to 1)
    pub ring_ratios: [f64; 4],

    /// Angular inset keeping points away from quadrant dividers, in radians
    /// (default: π/24, about 7.5°)
    pub angle_padding: f64,

    /// Start of the usable radial window inside a band (default: 0.2)
    pub band_inner_fraction: f64,

    /// Extent of the usable radial window inside a band (default: 0.7,
    /// so points land in the middle [0.2, 0.9] of the band)
    pub band_span_fraction: f64,
}

impl PositionSolver {
    /// Create a solver with the production defaults
    pub fn new() -> Self {
        PositionSolver {
            ring_ratios: [0.4, 0.3, 0.2, 0.1],
            angle_padding: std::f64::consts::PI / 24.0,
            band_inner_fraction: 0.2,
            band_span_fraction: 0.7,
        }
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        PositionSolver {
            ring_ratios: config.ring_ratios,
            angle_padding: config.angle_padding,
            band_inner_fraction: config.band_inner_fraction,
            band_span_fraction: config.band_span_fraction,
        }
    }

    /// Radial band of each ring for a radar of radius `center`, innermost
    /// first. Band edges are cumulative ring-weight sums scaled by the
    /// radius; the external ring renderer derives the same edges.
    pub fn ring_bands(&self, center: f64) -> [RingBand; 4] {
        let mut bands = [RingBand { inner: 0.0, outer: 0.0 }; 4];
        let mut inner = 0.0;

        for (i, ratio) in self.ring_ratios.iter().enumerate() {
            let outer = inner + center * ratio;
            bands[i] = RingBand { inner, outer };
            inner = outer;
        }

        bands
    }

    /// Assign a coordinate to every blip whose quadrant and ring both
    /// resolve against the supplied reference lists. Unresolved blips are
    /// skipped; callers fall back to a default coordinate for those.
    ///
    /// `center` is both the visualization radius and the origin offset, so
    /// the output lands in a `2*center × 2*center` canvas.
    ///
    /// Identical inputs yield bit-identical output, independent of the
    /// input order of `blips`.
    pub fn solve(
        &self,
        blips: &[Blip],
        quadrants: &[Quadrant],
        rings: &[Ring],
        center: f64,
    ) -> Vec<BlipPosition> {
        let mut positions = Vec::with_capacity(blips.len());
        let bands = self.ring_bands(center);

        for group in group_by_sector(blips, quadrants, rings) {
            let Some(band) = bands.get(group.ring.order) else {
                // Ring order outside the configured weight sequence
                continue;
            };

            let sector_start = group.quadrant.order as f64 * std::f64::consts::FRAC_PI_2;
            let effective_span = std::f64::consts::FRAC_PI_2 - 2.0 * self.angle_padding;

            // Total, stable order independent of input array order
            let mut members = group.blips;
            members.sort_by(|a, b| a.id.cmp(&b.id));

            let slot = effective_span / members.len() as f64;

            for (index, blip) in members.iter().enumerate() {
                let mut rng = SplitMix64::new(seed_from_id(&blip.id));

                // Golden-ratio spread plus a jitter bounded to half the
                // per-item slot; wrap overflow back into the padded span
                let spread = (index as f64 * GOLDEN_RATIO_FRAC).fract();
                let jitter = rng.next_unit() * 0.5 * slot;
                let offset = (spread * effective_span + jitter) % effective_span;
                let angle = sector_start + self.angle_padding + offset;

                // Radius confined to the middle window of the band
                let radial_factor =
                    self.band_inner_fraction + self.band_span_fraction * rng.next_unit();
                let radius = band.inner + band.width() * radial_factor;

                positions.push(BlipPosition {
                    id: blip.id.clone(),
                    x: center + radius * angle.cos(),
                    y: center + radius * angle.sin(),
                });
            }
        }

        positions
    }
}

impl Default for PositionSolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
