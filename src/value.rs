// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Variable-precision temporal value.
//!
//! [`VarDate`] is the core type of the crate.  It stores calendar and clock
//! fields that cascade strictly downward: a field can be present only when
//! every coarser field is present, and the set of present fields is a single
//! [`Precision`] level rather than independent flags, so states like "day
//! without month" cannot be represented.
//!
//! [`Temporal`] wraps a `VarDate` together with the disjoint [`Latest`]
//! marker used by versioned queries as an unbounded "most recent" bound.
//! Every field-level operation on the marker fails; only identity and its
//! `%latest` text form are defined.
//!
//! Values are immutable once returned: all arithmetic (see the `add_*`
//! family) produces a new value.
//!
//! [`Latest`]: Temporal::Latest

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{
    civil_from_days, days_in_month, epoch_days, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
use crate::error::{Result, TemporalError};

// ═══════════════════════════════════════════════════════════════════════════
// Precision
// ═══════════════════════════════════════════════════════════════════════════

/// The finest field level populated on a [`VarDate`].
///
/// Ordered coarse to fine, so `precision >= Precision::Day` reads as
/// "carries at least year, month and day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    /// Year only (`YYYY`).
    Year,
    /// Year and month (`YYYY-MM`).
    Month,
    /// Calendar date (`YYYY-MM-DD`).
    Day,
    /// Date and hour (`YYYY-MM-DDThh`).
    Hour,
    /// Date, hour and minute (`YYYY-MM-DDThh:mm`).
    Minute,
    /// Full wall-clock second (`YYYY-MM-DDThh:mm:ss`).
    Second,
    /// Second plus a sub-second digit string (`YYYY-MM-DDThh:mm:ss.S…`).
    Subsecond,
}

// ═══════════════════════════════════════════════════════════════════════════
// VarDate — the concrete value
// ═══════════════════════════════════════════════════════════════════════════

/// A temporal value whose fields are present exactly down to
/// [`precision`](Self::precision).
///
/// Fields finer than the precision are held at fixed rest values (zero or
/// the empty string), which keeps the derived equality and hash
/// field-by-field consistent: two values are equal iff their precision and
/// every present field — the sub-second digit string compared exactly —
/// agree.
///
/// # Examples
///
/// ```
/// use vardate::VarDate;
///
/// let v: VarDate = "2014-12-04T15:22:23.123456789".parse().unwrap();
/// assert_eq!(v.year(), 2014);
/// assert_eq!(v.second().unwrap(), 23);
/// assert_eq!(v.subsec().unwrap(), "123456789");
/// assert_eq!(v.to_string(), "2014-12-04T15:22:23.123456789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarDate {
    pub(crate) year: i64,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) subsec: String,
    pub(crate) precision: Precision,
}

impl VarDate {
    // ── constructors ──────────────────────────────────────────────────

    /// A year-only value.  Negative years are valid (proleptic calendar).
    pub fn from_year(year: i64) -> Self {
        Self {
            year,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            subsec: String::new(),
            precision: Precision::Year,
        }
    }

    /// Start a [`DateBuilder`] that accumulates validated fields.
    ///
    /// ```
    /// use vardate::VarDate;
    ///
    /// let v = VarDate::builder(2020).month(2)?.day(29)?.build();
    /// assert_eq!(v.to_string(), "2020-02-29");
    /// # Ok::<(), vardate::TemporalError>(())
    /// ```
    pub fn builder(year: i64) -> DateBuilder {
        DateBuilder {
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            subsec: None,
        }
    }

    /// Build a full-precision value (millisecond sub-seconds) from a
    /// `chrono::DateTime<Utc>`.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        Self {
            year: datetime.year() as i64,
            month: datetime.month() as u8,
            day: datetime.day() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
            subsec: format!("{:03}", datetime.timestamp_subsec_millis()),
            precision: Precision::Subsecond,
        }
    }

    /// Convert to a `chrono::DateTime<Utc>` through the calendar
    /// projection (absent fields at their floor, sub-seconds clamped to
    /// milliseconds).  Returns `None` outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.projection().epoch_millis())
    }

    // ── presence ──────────────────────────────────────────────────────

    /// The finest populated field level.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Whether the month field is present.
    #[inline]
    pub fn has_month(&self) -> bool {
        self.precision >= Precision::Month
    }

    /// Whether the day field is present.
    #[inline]
    pub fn has_day(&self) -> bool {
        self.precision >= Precision::Day
    }

    /// Whether the hour field is present.
    #[inline]
    pub fn has_hour(&self) -> bool {
        self.precision >= Precision::Hour
    }

    /// Whether the minute field is present.
    #[inline]
    pub fn has_minute(&self) -> bool {
        self.precision >= Precision::Minute
    }

    /// Whether the second field is present.
    #[inline]
    pub fn has_second(&self) -> bool {
        self.precision >= Precision::Second
    }

    /// Whether a sub-second digit string is present.
    #[inline]
    pub fn has_subsec(&self) -> bool {
        self.precision >= Precision::Subsecond
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// The year.  Always present.
    #[inline]
    pub fn year(&self) -> i64 {
        self.year
    }

    /// The month in `1..=12`, or the inapplicable-field error.
    pub fn month(&self) -> Result<u8> {
        self.field(self.month, Precision::Month, "month")
    }

    /// The day of month, or the inapplicable-field error.
    pub fn day(&self) -> Result<u8> {
        self.field(self.day, Precision::Day, "day")
    }

    /// The hour in `0..=23`, or the inapplicable-field error.
    pub fn hour(&self) -> Result<u8> {
        self.field(self.hour, Precision::Hour, "hour")
    }

    /// The minute in `0..=59`, or the inapplicable-field error.
    pub fn minute(&self) -> Result<u8> {
        self.field(self.minute, Precision::Minute, "minute")
    }

    /// The second in `0..=59`, or the inapplicable-field error.
    pub fn second(&self) -> Result<u8> {
        self.field(self.second, Precision::Second, "second")
    }

    /// The exact sub-second digit string ("5" is 0.5 s, "05" is 0.05 s;
    /// length is precision), or the inapplicable-field error.
    pub fn subsec(&self) -> Result<&str> {
        if self.has_subsec() {
            Ok(&self.subsec)
        } else {
            Err(TemporalError::MissingField("sub-seconds"))
        }
    }

    fn field(&self, value: u8, level: Precision, name: &'static str) -> Result<u8> {
        if self.precision >= level {
            Ok(value)
        } else {
            Err(TemporalError::MissingField(name))
        }
    }

    // ── projection ────────────────────────────────────────────────────

    /// Wall-clock fields for the timezone-offset handoff.
    ///
    /// Total: absent fields sit at their floor (month and day at 1, clock
    /// fields at 0) and sub-second precision is clamped to milliseconds,
    /// since downstream timezone math is defined only at millisecond
    /// granularity.
    pub fn projection(&self) -> WallClock {
        WallClock {
            year: self.year,
            month: self.month.max(1),
            day: self.day.max(1),
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            millisecond: self.subsec_millis(),
        }
    }

    /// The first three sub-second digits read positionally ("5" → 500 ms).
    fn subsec_millis(&self) -> u16 {
        let mut millis = 0u16;
        let mut place = 100u16;
        for b in self.subsec.bytes().take(3) {
            millis += (b - b'0') as u16 * place;
            place /= 10;
        }
        millis
    }

    // ── ordering helpers ──────────────────────────────────────────────

    fn month_key(&self) -> Option<u8> {
        self.has_month().then_some(self.month)
    }

    fn day_key(&self) -> Option<u8> {
        self.has_day().then_some(self.day)
    }

    fn hour_key(&self) -> Option<u8> {
        self.has_hour().then_some(self.hour)
    }

    fn minute_key(&self) -> Option<u8> {
        self.has_minute().then_some(self.minute)
    }

    fn second_key(&self) -> Option<u8> {
        self.has_second().then_some(self.second)
    }

    fn subsec_key(&self) -> Option<&str> {
        self.has_subsec().then_some(self.subsec.as_str())
    }
}

// ── total order ───────────────────────────────────────────────────────────

impl Ord for VarDate {
    /// Lexicographic over (year, month, day, hour, minute, second,
    /// sub-seconds), an absent field sorting before any present value, and
    /// sub-seconds compared as digit strings, not numbers — `"5"` is a
    /// proper prefix of `"50"` and therefore less.
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month_key().cmp(&other.month_key()))
            .then_with(|| self.day_key().cmp(&other.day_key()))
            .then_with(|| self.hour_key().cmp(&other.hour_key()))
            .then_with(|| self.minute_key().cmp(&other.minute_key()))
            .then_with(|| self.second_key().cmp(&other.second_key()))
            .then_with(|| self.subsec_key().cmp(&other.subsec_key()))
    }
}

impl PartialOrd for VarDate {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── canonical text ────────────────────────────────────────────────────────

impl fmt::Display for VarDate {
    /// The canonical form, bit-exact per cascade level:
    /// `YYYY`, `YYYY-MM`, …, `YYYY-MM-DDThh:mm:ss.S…`.  A leading `%` is
    /// accepted on input but never emitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", self.year.unsigned_abs())?;
        } else {
            write!(f, "{:04}", self.year)?;
        }
        if !self.has_month() {
            return Ok(());
        }
        write!(f, "-{:02}", self.month)?;
        if !self.has_day() {
            return Ok(());
        }
        write!(f, "-{:02}", self.day)?;
        if !self.has_hour() {
            return Ok(());
        }
        write!(f, "T{:02}", self.hour)?;
        if !self.has_minute() {
            return Ok(());
        }
        write!(f, ":{:02}", self.minute)?;
        if !self.has_second() {
            return Ok(());
        }
        write!(f, ":{:02}", self.second)?;
        if self.has_subsec() {
            write!(f, ".{}", self.subsec)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WallClock — calendar projection
// ═══════════════════════════════════════════════════════════════════════════

/// Wall-clock fields of a [`VarDate`] at millisecond granularity, the shape
/// handed to a timezone-offset capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl WallClock {
    /// Signed milliseconds since 1970-01-01T00:00:00 on the proleptic
    /// Gregorian axis.  Saturates at the `i64` range for extreme years.
    pub fn epoch_millis(&self) -> i64 {
        epoch_days(self.year, self.month, self.day)
            .saturating_mul(MILLIS_PER_DAY)
            .saturating_add(self.hour as i64 * MILLIS_PER_HOUR)
            .saturating_add(self.minute as i64 * MILLIS_PER_MINUTE)
            .saturating_add(self.second as i64 * MILLIS_PER_SECOND)
            .saturating_add(self.millisecond as i64)
    }

    /// Inverse of [`epoch_millis`](Self::epoch_millis).
    pub(crate) fn from_epoch_millis(millis: i64) -> Self {
        let days = millis.div_euclid(MILLIS_PER_DAY);
        let mut rem = millis.rem_euclid(MILLIS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let hour = (rem / MILLIS_PER_HOUR) as u8;
        rem %= MILLIS_PER_HOUR;
        let minute = (rem / MILLIS_PER_MINUTE) as u8;
        rem %= MILLIS_PER_MINUTE;
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second: (rem / MILLIS_PER_SECOND) as u8,
            millisecond: (rem % MILLIS_PER_SECOND) as u16,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DateBuilder — validated construction
// ═══════════════════════════════════════════════════════════════════════════

/// Accumulates validated fields and produces a [`VarDate`] on
/// [`build`](Self::build).
///
/// Each setter checks its own range and that the next coarser field was
/// already set, so the cascade invariant cannot be violated:
///
/// ```
/// use vardate::{TemporalError, VarDate};
///
/// // day before month
/// let err = VarDate::builder(2020).day(5).unwrap_err();
/// assert_eq!(err, TemporalError::MissingField("month"));
/// ```
#[derive(Debug, Clone)]
pub struct DateBuilder {
    year: i64,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    subsec: Option<String>,
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<u8> {
    if (min..=max).contains(&value) {
        Ok(value as u8)
    } else {
        Err(TemporalError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl DateBuilder {
    /// Set the month (`1..=12`).
    pub fn month(mut self, month: i64) -> Result<Self> {
        self.month = Some(check_range("month", month, 1, 12)?);
        Ok(self)
    }

    /// Set the day; the bound depends on the year and month already set.
    pub fn day(mut self, day: i64) -> Result<Self> {
        let month = self.month.ok_or(TemporalError::MissingField("month"))?;
        let last = days_in_month(self.year, month) as i64;
        self.day = Some(check_range("day", day, 1, last)?);
        Ok(self)
    }

    /// Set the hour (`0..=23`); requires a day.
    pub fn hour(mut self, hour: i64) -> Result<Self> {
        if self.day.is_none() {
            return Err(TemporalError::MissingField("day"));
        }
        self.hour = Some(check_range("hour", hour, 0, 23)?);
        Ok(self)
    }

    /// Set the minute (`0..=59`); requires an hour.
    pub fn minute(mut self, minute: i64) -> Result<Self> {
        if self.hour.is_none() {
            return Err(TemporalError::MissingField("hour"));
        }
        self.minute = Some(check_range("minute", minute, 0, 59)?);
        Ok(self)
    }

    /// Set the second (`0..=59`); requires a minute.
    pub fn second(mut self, second: i64) -> Result<Self> {
        if self.minute.is_none() {
            return Err(TemporalError::MissingField("minute"));
        }
        self.second = Some(check_range("second", second, 0, 59)?);
        Ok(self)
    }

    /// Set the sub-second digit string exactly as given; requires a second.
    pub fn subsec(mut self, digits: &str) -> Result<Self> {
        if self.second.is_none() {
            return Err(TemporalError::MissingField("second"));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TemporalError::BadSubsecond(digits.to_owned()));
        }
        self.subsec = Some(digits.to_owned());
        Ok(self)
    }

    /// Finalize into an immutable [`VarDate`].
    pub fn build(self) -> VarDate {
        let precision = if self.subsec.is_some() {
            Precision::Subsecond
        } else if self.second.is_some() {
            Precision::Second
        } else if self.minute.is_some() {
            Precision::Minute
        } else if self.hour.is_some() {
            Precision::Hour
        } else if self.day.is_some() {
            Precision::Day
        } else if self.month.is_some() {
            Precision::Month
        } else {
            Precision::Year
        };
        VarDate {
            year: self.year,
            month: self.month.unwrap_or(0),
            day: self.day.unwrap_or(0),
            hour: self.hour.unwrap_or(0),
            minute: self.minute.unwrap_or(0),
            second: self.second.unwrap_or(0),
            subsec: self.subsec.unwrap_or_default(),
            precision,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Temporal — value or latest marker
// ═══════════════════════════════════════════════════════════════════════════

/// The canonical text of the latest marker.
pub const LATEST_LITERAL: &str = "%latest";

/// Whether trimmed `text` is exactly the `%latest` literal, independent of
/// any constructed value.
#[inline]
pub fn is_latest_literal(text: &str) -> bool {
    text.trim() == LATEST_LITERAL
}

/// A concrete temporal value or the unbounded "latest" marker.
///
/// The marker is disjoint from every [`VarDate`]: it has no fields, its
/// equality is by variant, and every field-level operation on it fails with
/// [`TemporalError::LatestMarker`].  Callers branch with
/// [`is_latest`](Self::is_latest) instead of catching the failure.
///
/// ```
/// use vardate::Temporal;
///
/// let latest: Temporal = "%latest".parse().unwrap();
/// assert!(latest.is_latest());
/// assert_eq!(latest.to_string(), "%latest");
/// assert!(latest.year().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Temporal {
    /// A concrete value.
    Date(VarDate),
    /// The unbounded "most recent" marker.
    Latest,
}

impl Temporal {
    /// Whether this is the latest marker.
    #[inline]
    pub fn is_latest(&self) -> bool {
        matches!(self, Temporal::Latest)
    }

    /// The underlying value, or the latest-marker error.
    pub fn as_date(&self) -> Result<&VarDate> {
        match self {
            Temporal::Date(value) => Ok(value),
            Temporal::Latest => Err(TemporalError::LatestMarker),
        }
    }

    /// The year, or the latest-marker error.
    pub fn year(&self) -> Result<i64> {
        Ok(self.as_date()?.year())
    }

    /// The month, or the latest-marker / inapplicable-field error.
    pub fn month(&self) -> Result<u8> {
        self.as_date()?.month()
    }

    /// The day, or the latest-marker / inapplicable-field error.
    pub fn day(&self) -> Result<u8> {
        self.as_date()?.day()
    }

    /// The hour, or the latest-marker / inapplicable-field error.
    pub fn hour(&self) -> Result<u8> {
        self.as_date()?.hour()
    }

    /// The minute, or the latest-marker / inapplicable-field error.
    pub fn minute(&self) -> Result<u8> {
        self.as_date()?.minute()
    }

    /// The second, or the latest-marker / inapplicable-field error.
    pub fn second(&self) -> Result<u8> {
        self.as_date()?.second()
    }

    /// The sub-second digit string, or the latest-marker /
    /// inapplicable-field error.
    pub fn subsec(&self) -> Result<&str> {
        self.as_date()?.subsec()
    }

    /// The precision level, or the latest-marker error.
    pub fn precision(&self) -> Result<Precision> {
        Ok(self.as_date()?.precision())
    }
}

impl From<VarDate> for Temporal {
    #[inline]
    fn from(value: VarDate) -> Self {
        Temporal::Date(value)
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Date(value) => value.fmt(f),
            Temporal::Latest => f.write_str(LATEST_LITERAL),
        }
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for VarDate {
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for VarDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Temporal {
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Temporal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
