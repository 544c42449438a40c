// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Variable-Precision Temporal Values
//!
//! This crate provides a date/time value whose fields — year, month, day,
//! hour, minute, second, sub-second — are each optional but cascade
//! strictly downward, plus the disjoint `%latest` sentinel used by
//! versioned/temporal queries as an unbounded "most recent" bound.
//!
//! # Core types
//!
//! - [`VarDate`] — the immutable variable-precision value.
//! - [`Precision`] — the ordered field-level ladder (`Year` … `Subsecond`).
//! - [`DateBuilder`] — validated field-by-field construction.
//! - [`Temporal`] — a `VarDate` or the [`Latest`](Temporal::Latest) marker.
//! - [`WallClock`] — millisecond-granularity calendar projection.
//! - [`DiffUnit`] — the eight signed-difference units.
//! - [`ZoneRules`] / [`TzDatabase`] — the timezone-offset capability seam
//!   and its IANA-backed default.
//!
//! # Quick example
//!
//! ```
//! use vardate::{date_difference, DiffUnit, Temporal, VarDate};
//!
//! // Parse the canonical form at any precision.
//! let started: VarDate = "2014-12-04T15:22:23.123456789".parse()?;
//! assert_eq!(started.subsec()?, "123456789");
//!
//! // Precision-aware arithmetic with calendar clamping.
//! let leap: VarDate = "2020-02-29".parse()?;
//! assert_eq!(leap.add_years(1)?.to_string(), "2021-02-28");
//!
//! // Pattern formatting.
//! assert_eq!(started.format("yyyy-MM-dd")?, "2014-12-04");
//!
//! // Signed differences in caller-chosen units.
//! let a: VarDate = "2020-01-01".parse()?;
//! let b: VarDate = "2021-03-01".parse()?;
//! assert_eq!(date_difference(&a, &b, DiffUnit::Months)?, 14);
//!
//! // The unbounded "latest" marker is disjoint from every concrete value.
//! let latest: Temporal = "%latest".parse()?;
//! assert!(latest.is_latest());
//! # Ok::<(), vardate::TemporalError>(())
//! ```
//!
//! # Ordering
//!
//! [`VarDate`] carries a total order: comparison is lexicographic over the
//! field cascade and an absent field sorts before any present value, so
//! `"2020" < "2020-01"`.  Sub-seconds compare as digit strings, never as
//! numbers.
//!
//! # Concurrency
//!
//! Every operation is a synchronous, allocation-only computation; values
//! are immutable once returned and freely shareable across threads.

mod arith;
mod calendar;
mod diff;
mod error;
mod format;
mod parse;
mod value;
mod zone;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{days_in_month, is_leap_year};
pub use diff::{date_difference, DiffUnit};
pub use error::{Result, TemporalError};
pub use value::{
    is_latest_literal, DateBuilder, Precision, Temporal, VarDate, WallClock, LATEST_LITERAL,
};
pub use zone::{TzDatabase, ZoneInfo, ZoneRules};
