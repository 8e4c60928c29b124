// 📡 Radar Data Model - Plain records shared by every engine
// Quadrants, rings, blips and change logs arrive reconstituted from external
// storage; everything derived from them is recomputed on each call.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// REFERENCE RECORDS
// ============================================================================

/// One of the four categories partitioning the radar into angular sectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quadrant {
    pub id: String,
    pub name: String,

    /// Sector index (0..3). Fixes the angular span
    /// `[order * 90°, (order + 1) * 90°)`.
    pub order: usize,
}

/// One of the four maturity tiers partitioning the radar into concentric
/// bands, innermost = most adopted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub id: String,
    pub name: String,

    /// Band index (0..3), innermost first. Fixes the radial band via the
    /// configured ring-weight sequence scaled by the visualization radius.
    pub order: usize,

    /// Fill color name used by the rendering layer
    pub color: String,

    /// Stroke color (CSS value) used by the rendering layer
    pub stroke: String,
}

// ============================================================================
// TRACKED ITEMS
// ============================================================================

/// A tracked item with a current quadrant+ring classification and an
/// append-only change history.
///
/// Position and movement are derived values, never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blip {
    pub id: String,
    pub name: String,

    /// Id of the quadrant this item currently belongs to
    pub quadrant: String,

    /// Id of the ring this item currently sits in
    pub ring: String,

    #[serde(default)]
    pub description: String,

    /// Timestamp of the last change, as stored (RFC 3339 or date-only).
    /// Absent or unparsable values are treated as "never updated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    /// Change-log entries for this item, oldest first. May be left empty
    /// when the caller keeps logs in a flat table instead (see
    /// [`group_logs_by_blip`]).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<RecordChangeLog>,
}

/// One immutable historical entry capturing a blip's state at a point in
/// time. Entries are append-only and ordered by `created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChangeLog {
    pub id: String,

    /// Id of the blip this entry belongs to (flat-table back-reference)
    #[serde(default)]
    pub blip_id: String,

    pub name: String,

    /// Ring the item was classified into when this entry was written
    pub ring: String,

    #[serde(default)]
    pub description: String,

    /// Creation timestamp, as stored. Unparsable values are treated as
    /// infinitely old.
    #[serde(default)]
    pub created: String,

    /// Id of the entry this one superseded. Empty string means this is the
    /// item's first-ever record.
    #[serde(default)]
    pub previous_record: String,
}

impl RecordChangeLog {
    /// True when this entry is the item's first-ever record
    pub fn is_first_record(&self) -> bool {
        self.previous_record.is_empty()
    }
}

// ============================================================================
// DERIVED VALUES
// ============================================================================

/// Derived trajectory tag describing an item's recent movement across rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    /// First record appeared within the rolling window
    #[serde(rename = "new")]
    New,

    /// Advancing toward the center (gaining maturity)
    #[serde(rename = "moved-in")]
    MovedIn,

    /// Regressing outward (losing maturity)
    #[serde(rename = "moved-out")]
    MovedOut,

    /// No recent signal, or ring constant across the window
    #[serde(rename = "unchanged")]
    Unchanged,
}

impl MovementState {
    pub fn as_str(&self) -> &str {
        match self {
            MovementState::New => "new",
            MovementState::MovedIn => "moved-in",
            MovementState::MovedOut => "moved-out",
            MovementState::Unchanged => "unchanged",
        }
    }
}

/// A 2D coordinate in the caller's space, origin at the visualization center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One solved coordinate. Returned in a fresh list; input blips are never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlipPosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// The reconstituted bundle the surrounding sync layer hands over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarData {
    pub quadrants: Vec<Quadrant>,
    pub rings: Vec<Ring>,
    pub blips: Vec<Blip>,

    /// Flat change-log table, keyed back to blips via `blip_id`
    #[serde(default)]
    pub logs: Vec<RecordChangeLog>,
}

// ============================================================================
// GROUPING
// ============================================================================

/// Blips sharing one quadrant+ring sector.
#[derive(Debug)]
pub struct SectorGroup<'a> {
    pub quadrant: &'a Quadrant,
    pub ring: &'a Ring,
    pub blips: Vec<&'a Blip>,
}

/// Group blips by (quadrant, ring) against the supplied reference lists.
///
/// Iteration follows the reference lists, so the grouping is deterministic.
/// Blips referencing an unknown quadrant or ring fall into no group.
pub fn group_by_sector<'a>(
    blips: &'a [Blip],
    quadrants: &'a [Quadrant],
    rings: &'a [Ring],
) -> Vec<SectorGroup<'a>> {
    let mut groups = Vec::new();

    for quadrant in quadrants {
        for ring in rings {
            let members: Vec<&Blip> = blips
                .iter()
                .filter(|b| b.quadrant == quadrant.id && b.ring == ring.id)
                .collect();

            if !members.is_empty() {
                groups.push(SectorGroup {
                    quadrant,
                    ring,
                    blips: members,
                });
            }
        }
    }

    groups
}

/// Group a flat change-log table by blip id, each group sorted oldest first.
///
/// Each group is an owned copy so callers can hand histories around without
/// aliasing the shared table.
pub fn group_logs_by_blip(logs: &[RecordChangeLog]) -> HashMap<String, Vec<RecordChangeLog>> {
    let mut groups: HashMap<String, Vec<RecordChangeLog>> = HashMap::new();

    for log in logs {
        groups.entry(log.blip_id.clone()).or_default().push(log.clone());
    }

    for group in groups.values_mut() {
        sort_logs_by_created(group);
    }

    groups
}

/// Sort log entries by `created` ascending. Entries with an unparsable
/// timestamp sort oldest; ties break on entry id to keep the order total.
pub fn sort_logs_by_created(logs: &mut [RecordChangeLog]) {
    logs.sort_by(|a, b| {
        match (parse_timestamp(&a.created), parse_timestamp(&b.created)) {
            (Some(ta), Some(tb)) => ta.cmp(&tb).then_with(|| a.id.cmp(&b.id)),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        }
    });
}

// ============================================================================
// TIME HELPERS
// ============================================================================

/// Parse a stored timestamp leniently: RFC 3339 first, then a bare
/// `YYYY-MM-DDTHH:MM:SS`, then a date-only `YYYY-MM-DD` (midnight UTC).
/// Returns `None` for anything else — callers apply their own fallback
/// policy instead of erroring.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(t.with_timezone(&Utc));
    }

    if let Ok(t) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&t));
    }

    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| Utc.from_utc_datetime(&t));
    }

    None
}

/// Age of `then` relative to `now`, in fractional days. Negative when `then`
/// lies in the future.
pub fn age_days(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    (now - then).num_milliseconds() as f64 / 86_400_000.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn blip(id: &str, quadrant: &str, ring: &str) -> Blip {
        Blip {
            id: id.to_string(),
            name: id.to_string(),
            quadrant: quadrant.to_string(),
            ring: ring.to_string(),
            description: String::new(),
            updated: None,
            history: Vec::new(),
        }
    }

    fn log(id: &str, blip_id: &str, created: &str) -> RecordChangeLog {
        RecordChangeLog {
            id: id.to_string(),
            blip_id: blip_id.to_string(),
            name: "entry".to_string(),
            ring: "adopt".to_string(),
            description: String::new(),
            created: created.to_string(),
            previous_record: String::new(),
        }
    }

    #[test]
    fn test_movement_state_wire_strings() {
        assert_eq!(
            serde_json::to_string(&MovementState::MovedIn).unwrap(),
            "\"moved-in\""
        );
        assert_eq!(
            serde_json::from_str::<MovementState>("\"moved-out\"").unwrap(),
            MovementState::MovedOut
        );
        assert_eq!(MovementState::New.as_str(), "new");
        assert_eq!(MovementState::Unchanged.as_str(), "unchanged");
    }

    #[test]
    fn test_record_change_log_camel_case() {
        let json = r#"{
            "id": "log1",
            "blipId": "blip1",
            "name": "Test",
            "ring": "trial",
            "description": "",
            "created": "2024-05-01T00:00:00Z",
            "previousRecord": ""
        }"#;

        let entry: RecordChangeLog = serde_json::from_str(json).unwrap();
        assert_eq!(entry.blip_id, "blip1");
        assert!(entry.is_first_record());
    }

    #[test]
    fn test_radar_data_bundle_deserializes() {
        let json = r#"{
            "quadrants": [{"id": "tools", "name": "Tools", "order": 0}],
            "rings": [{"id": "adopt", "name": "Adopt", "order": 0,
                       "color": "green", "stroke": "rgba(16, 185, 129, 0.7)"}],
            "blips": [{"id": "1-tools", "name": "Terraform",
                       "quadrant": "tools", "ring": "adopt",
                       "updated": "2024-04-01T00:00:00Z"}],
            "logs": [{"id": "log1", "blipId": "1-tools", "name": "Terraform",
                      "ring": "adopt", "created": "2024-04-01T00:00:00Z",
                      "previousRecord": ""}]
        }"#;

        let data: RadarData = serde_json::from_str(json).unwrap();

        assert_eq!(data.quadrants.len(), 1);
        assert_eq!(data.rings.len(), 1);
        assert_eq!(data.blips[0].updated.as_deref(), Some("2024-04-01T00:00:00Z"));
        assert!(data.blips[0].history.is_empty());
        assert_eq!(data.logs[0].blip_id, "1-tools");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T00:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01T12:30:00+08:00").is_some());
        assert!(parse_timestamp("2024-05-01T00:00:00").is_some());
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_age_days() {
        let now = parse_timestamp("2024-05-01T00:00:00Z").unwrap();
        let then = parse_timestamp("2024-04-21T00:00:00Z").unwrap();

        assert!((age_days(now, then) - 10.0).abs() < 1e-9);
        assert!(age_days(then, now) < 0.0);
    }

    #[test]
    fn test_group_by_sector() {
        let quadrants = vec![
            Quadrant { id: "tools".into(), name: "Tools".into(), order: 0 },
            Quadrant { id: "platforms".into(), name: "Platforms".into(), order: 1 },
        ];
        let rings = vec![
            Ring { id: "adopt".into(), name: "Adopt".into(), order: 0, color: "green".into(), stroke: "s".into() },
            Ring { id: "trial".into(), name: "Trial".into(), order: 1, color: "blue".into(), stroke: "s".into() },
        ];
        let blips = vec![
            blip("a", "tools", "adopt"),
            blip("b", "tools", "adopt"),
            blip("c", "platforms", "trial"),
            blip("d", "unknown-quadrant", "adopt"),
        ];

        let groups = group_by_sector(&blips, &quadrants, &rings);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].quadrant.id, "tools");
        assert_eq!(groups[0].ring.id, "adopt");
        assert_eq!(groups[0].blips.len(), 2);
        assert_eq!(groups[1].blips.len(), 1);

        // Blip referencing an unknown quadrant falls into no group
        let grouped: usize = groups.iter().map(|g| g.blips.len()).sum();
        assert_eq!(grouped, 3);
    }

    #[test]
    fn test_group_logs_by_blip_sorts_oldest_first() {
        let logs = vec![
            log("l3", "blip1", "2024-05-03T00:00:00Z"),
            log("l1", "blip1", "2024-05-01T00:00:00Z"),
            log("l2", "blip1", "2024-05-02T00:00:00Z"),
            log("l4", "blip2", "2024-05-01T00:00:00Z"),
        ];

        let groups = group_logs_by_blip(&logs);

        let blip1 = groups.get("blip1").unwrap();
        assert_eq!(blip1.len(), 3);
        assert_eq!(blip1[0].id, "l1");
        assert_eq!(blip1[2].id, "l3");
        assert_eq!(groups.get("blip2").unwrap().len(), 1);
    }

    #[test]
    fn test_unparsable_created_sorts_oldest() {
        let mut logs = vec![
            log("l2", "b", "2024-05-01T00:00:00Z"),
            log("l1", "b", "garbage"),
        ];

        sort_logs_by_created(&mut logs);

        assert_eq!(logs[0].id, "l1");
        assert_eq!(logs[1].id, "l2");
    }
}
