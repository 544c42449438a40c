// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timezone-offset capability.
//!
//! The crate owns no zone data.  The formatter asks a [`ZoneRules`]
//! implementation one pure question — the offset (and display
//! abbreviation) of a zone identifier at an instant — and [`TzDatabase`]
//! answers it from the embedded IANA tables of `chrono-tz`.  Caching and
//! ownership of zone rule tables are the implementation's concern, not
//! this crate's.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz};

/// What a zone lookup yields for one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Local-minus-UTC offset in milliseconds.
    pub offset_millis: i64,
    /// Display abbreviation at that instant (e.g. `EST`, `CEST`).
    pub abbreviation: String,
}

/// Pure zone-rule lookup: `(zone id, epoch millis) → offset`.
///
/// Returns `None` for an identifier the implementation does not know;
/// the formatter turns that into its unknown-zone error.
pub trait ZoneRules {
    fn resolve(&self, zone: &str, epoch_millis: i64) -> Option<ZoneInfo>;
}

/// The default [`ZoneRules`]: IANA identifiers resolved through
/// `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabase;

impl ZoneRules for TzDatabase {
    fn resolve(&self, zone: &str, epoch_millis: i64) -> Option<ZoneInfo> {
        let tz: Tz = zone.parse().ok()?;
        let utc = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?;
        let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
        Some(ZoneInfo {
            offset_millis: i64::from(offset.fix().local_minus_utc()) * 1_000,
            // Zones without a letter abbreviation fall back to their id.
            abbreviation: offset
                .abbreviation()
                .map(str::to_owned)
                .unwrap_or_else(|| zone.to_owned()),
        })
    }
}
