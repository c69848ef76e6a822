//! Static lookup tables (gender, pool, stroke, event types, ...).
//!
//! Lookup rows never change at runtime, so they live in the binary instead
//! of the repository. `*_type_id` fields of entities reference these ids.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub id: i64,
    pub code: &'static str,
    pub label: &'static str,
}

const fn entry(id: i64, code: &'static str, label: &'static str) -> LookupEntry {
    LookupEntry { id, code, label }
}

static GENDER_TYPES: &[LookupEntry] = &[
    entry(1, "M", "Male"),
    entry(2, "F", "Female"),
    entry(3, "X", "Mixed"),
];

static POOL_TYPES: &[LookupEntry] = &[
    entry(1, "25", "25 meters"),
    entry(2, "50", "50 meters"),
];

static STROKE_TYPES: &[LookupEntry] = &[
    entry(1, "SL", "Freestyle"),
    entry(2, "DO", "Backstroke"),
    entry(3, "RA", "Breaststroke"),
    entry(4, "FA", "Butterfly"),
    entry(5, "MI", "Individual medley"),
    entry(10, "MX", "Relay medley"),
];

/// Event codes: distance followed by the stroke code; `S`/`M` prefixes mark
/// relays.
static EVENT_TYPES: &[LookupEntry] = &[
    entry(1, "50SL", "50 freestyle"),
    entry(2, "100SL", "100 freestyle"),
    entry(3, "200SL", "200 freestyle"),
    entry(4, "400SL", "400 freestyle"),
    entry(5, "800SL", "800 freestyle"),
    entry(6, "1500SL", "1500 freestyle"),
    entry(7, "50DO", "50 backstroke"),
    entry(8, "100DO", "100 backstroke"),
    entry(9, "200DO", "200 backstroke"),
    entry(10, "50RA", "50 breaststroke"),
    entry(11, "100RA", "100 breaststroke"),
    entry(12, "200RA", "200 breaststroke"),
    entry(13, "50FA", "50 butterfly"),
    entry(14, "100FA", "100 butterfly"),
    entry(15, "200FA", "200 butterfly"),
    entry(16, "100MI", "100 individual medley"),
    entry(17, "200MI", "200 individual medley"),
    entry(18, "400MI", "400 individual medley"),
    entry(19, "S4X50SL", "4x50 freestyle relay"),
    entry(20, "S4X100SL", "4x100 freestyle relay"),
    entry(21, "S4X200SL", "4x200 freestyle relay"),
    entry(22, "S4X50MI", "4x50 medley relay"),
    entry(23, "S4X100MI", "4x100 medley relay"),
    entry(24, "M4X50SL", "4x50 mixed freestyle relay"),
    entry(25, "M4X50MI", "4x50 mixed medley relay"),
];

static HEAT_TYPES: &[LookupEntry] = &[
    entry(1, "H", "Heats"),
    entry(2, "S", "Semifinals"),
    entry(3, "F", "Finals"),
];

static TIMING_TYPES: &[LookupEntry] = &[
    entry(1, "M", "Manual"),
    entry(2, "S", "Semi-automatic"),
    entry(3, "A", "Automatic"),
];

static EDITION_TYPES: &[LookupEntry] = &[
    entry(1, "O", "Ordinal"),
    entry(2, "R", "Roman"),
    entry(3, "N", "None"),
    entry(4, "A", "Yearly"),
    entry(5, "S", "Seasonal"),
];

static DAY_PART_TYPES: &[LookupEntry] = &[
    entry(1, "M", "Morning"),
    entry(2, "P", "Afternoon"),
    entry(3, "S", "Evening"),
];

static ENTRY_TIME_TYPES: &[LookupEntry] = &[
    entry(1, "M", "Manual"),
    entry(2, "P", "Personal best"),
    entry(3, "G", "Goggle cup"),
    entry(4, "A", "Prior year"),
    entry(5, "U", "Last race"),
];

static MEDAL_TYPES: &[LookupEntry] = &[
    entry(1, "G", "Gold"),
    entry(2, "S", "Silver"),
    entry(3, "B", "Bronze"),
    entry(4, "W", "Wood"),
];

static DISQUALIFICATION_CODE_TYPES: &[LookupEntry] = &[
    entry(1, "GA", "False start"),
    entry(2, "GS", "Wrong stroke"),
    entry(3, "GK", "Illegal turn"),
    entry(4, "GT", "Illegal finish"),
    entry(5, "GX", "Did not finish"),
    entry(6, "RS", "Early relay takeover"),
];

static SEASON_TYPES: &[LookupEntry] = &[
    entry(1, "MASFIN", "FIN masters"),
    entry(2, "MASCSI", "CSI masters"),
    entry(3, "MASUISP", "UISP masters"),
    entry(4, "AGHFIN", "FIN juniors"),
];

static TABLES: &[(&str, &[LookupEntry])] = &[
    ("gender_types", GENDER_TYPES),
    ("pool_types", POOL_TYPES),
    ("stroke_types", STROKE_TYPES),
    ("event_types", EVENT_TYPES),
    ("heat_types", HEAT_TYPES),
    ("timing_types", TIMING_TYPES),
    ("edition_types", EDITION_TYPES),
    ("day_part_types", DAY_PART_TYPES),
    ("entry_time_types", ENTRY_TIME_TYPES),
    ("medal_types", MEDAL_TYPES),
    ("disqualification_code_types", DISQUALIFICATION_CODE_TYPES),
    ("season_types", SEASON_TYPES),
];

/// Names of all lookup tables.
pub fn lookup_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _)| *name)
}

pub fn lookup_table(name: &str) -> Option<&'static [LookupEntry]> {
    TABLES
        .iter()
        .find(|(table, _)| *table == name)
        .map(|(_, rows)| *rows)
}

pub fn lookup_entry(table: &str, id: i64) -> Option<&'static LookupEntry> {
    lookup_table(table)?.iter().find(|row| row.id == id)
}

/// Whether an event type id names a relay event.
pub fn is_relay_event(event_type_id: i64) -> bool {
    lookup_entry("event_types", event_type_id)
        .map(|row| row.code.starts_with('S') || row.code.starts_with('M'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_has_unique_ids() {
        for name in lookup_names() {
            let rows = lookup_table(name).unwrap();
            let mut ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), rows.len(), "duplicate id in {}", name);
        }
    }

    #[test]
    fn test_lookup_entry() {
        assert_eq!(lookup_entry("pool_types", 2).unwrap().code, "50");
        assert!(lookup_entry("pool_types", 3).is_none());
        assert!(lookup_table("unknown_types").is_none());
    }

    #[test]
    fn test_relay_events() {
        assert!(is_relay_event(20));
        assert!(is_relay_event(25));
        assert!(!is_relay_event(18));
        assert!(!is_relay_event(999));
    }
}
