// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signed differences between two values in caller-chosen units.
//!
//! The total order itself lives on [`VarDate`]'s `Ord` impl; this module
//! derives signed durations from it: `date_difference(a, b, unit)` is zero
//! for equal values and otherwise the unsigned per-unit magnitude with the
//! sign of `b.cmp(&a)`, so the result is positive when `b` is
//! chronologically after `a`.

use std::fmt;
use std::str::FromStr;

use crate::calendar::{
    day_of_week, day_of_year, days_in_year, epoch_days, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
    MILLIS_PER_SECOND,
};
use crate::error::{Result, TemporalError};
use crate::value::{Temporal, VarDate};

// ═══════════════════════════════════════════════════════════════════════════
// DiffUnit
// ═══════════════════════════════════════════════════════════════════════════

/// The eight supported difference units.
///
/// Parsed from the uppercase tokens `YEARS`, `MONTHS`, `WEEKS`, `DAYS`,
/// `HOURS`, `MINUTES`, `SECONDS`, `MILLISECONDS`; anything else fails with
/// the unsupported-unit error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl DiffUnit {
    fn token(self) -> &'static str {
        match self {
            DiffUnit::Years => "YEARS",
            DiffUnit::Months => "MONTHS",
            DiffUnit::Weeks => "WEEKS",
            DiffUnit::Days => "DAYS",
            DiffUnit::Hours => "HOURS",
            DiffUnit::Minutes => "MINUTES",
            DiffUnit::Seconds => "SECONDS",
            DiffUnit::Milliseconds => "MILLISECONDS",
        }
    }
}

impl FromStr for DiffUnit {
    type Err = TemporalError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "YEARS" => Ok(DiffUnit::Years),
            "MONTHS" => Ok(DiffUnit::Months),
            "WEEKS" => Ok(DiffUnit::Weeks),
            "DAYS" => Ok(DiffUnit::Days),
            "HOURS" => Ok(DiffUnit::Hours),
            "MINUTES" => Ok(DiffUnit::Minutes),
            "SECONDS" => Ok(DiffUnit::Seconds),
            "MILLISECONDS" => Ok(DiffUnit::Milliseconds),
            other => Err(TemporalError::UnsupportedUnit(other.to_owned())),
        }
    }
}

impl fmt::Display for DiffUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Difference calculator
// ═══════════════════════════════════════════════════════════════════════════

/// Epoch-day count of a value's calendar date; requires day precision.
fn epoch_day_of(value: &VarDate) -> Result<i64> {
    let day = value.day()?;
    Ok(epoch_days(value.year(), value.month()?, day))
}

/// Year and one-based day-of-year of a value; requires day precision.
fn year_and_ordinal(value: &VarDate) -> Result<(i64, i64)> {
    let day = value.day()?;
    Ok((
        value.year(),
        day_of_year(value.year(), value.month()?, day),
    ))
}

/// Absolute calendar-day distance: whole-year lengths between the two
/// years plus the partial first/last year day-of-year deltas.  Both values
/// need day precision.
fn day_magnitude(a: &VarDate, b: &VarDate) -> Result<i64> {
    let first = year_and_ordinal(a)?;
    let second = year_and_ordinal(b)?;
    let ((year_lo, ordinal_lo), (year_hi, ordinal_hi)) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    let mut days = ordinal_hi - ordinal_lo;
    for year in year_lo..year_hi {
        days += days_in_year(year);
    }
    Ok(days)
}

/// Absolute projected-epoch-millisecond distance; total over any precision.
fn millis_magnitude(a: &VarDate, b: &VarDate) -> i64 {
    (a.projection().epoch_millis() - b.projection().epoch_millis()).abs()
}

/// Whole Sunday-aligned week boundaries crossed between the two dates.
fn week_magnitude(a: &VarDate, b: &VarDate) -> Result<i64> {
    let (first, second) = (epoch_day_of(a)?, epoch_day_of(b)?);
    let earlier = first.min(second);
    let days = (first - second).abs();
    let to_boundary = (7 - day_of_week(earlier)) % 7;
    if to_boundary > days {
        Ok(0)
    } else {
        Ok((days - to_boundary) / 7 + i64::from(to_boundary != 0))
    }
}

/// Signed difference between `a` and `b` in `unit`.
///
/// Positive when `b` is after `a` under the total order, negative the
/// other way, zero for equal values.  MONTHS requires month precision and
/// DAYS/WEEKS require day precision on both operands; the clock units work
/// on the millisecond projection and accept any precision.
///
/// ```
/// use vardate::{date_difference, DiffUnit, VarDate};
///
/// let a: VarDate = "2020-01-01".parse()?;
/// let b: VarDate = "2021-03-01".parse()?;
/// assert_eq!(date_difference(&a, &b, DiffUnit::Months)?, 14);
/// assert_eq!(date_difference(&b, &a, DiffUnit::Months)?, -14);
/// # Ok::<(), vardate::TemporalError>(())
/// ```
pub fn date_difference(a: &VarDate, b: &VarDate, unit: DiffUnit) -> Result<i64> {
    if a == b {
        return Ok(0);
    }
    let sign = if b > a { 1 } else { -1 };
    let magnitude = match unit {
        DiffUnit::Years => (a.year() - b.year()).abs(),
        DiffUnit::Months => {
            let months_a = a.year() * 12 + i64::from(a.month()?);
            let months_b = b.year() * 12 + i64::from(b.month()?);
            (months_a - months_b).abs()
        }
        DiffUnit::Weeks => week_magnitude(a, b)?,
        DiffUnit::Days => day_magnitude(a, b)?,
        DiffUnit::Hours => millis_magnitude(a, b) / MILLIS_PER_HOUR,
        DiffUnit::Minutes => millis_magnitude(a, b) / MILLIS_PER_MINUTE,
        DiffUnit::Seconds => millis_magnitude(a, b) / MILLIS_PER_SECOND,
        DiffUnit::Milliseconds => millis_magnitude(a, b),
    };
    Ok(sign * magnitude)
}

impl VarDate {
    /// [`date_difference`] with `self` as the first operand.
    pub fn difference(&self, other: &VarDate, unit: DiffUnit) -> Result<i64> {
        date_difference(self, other, unit)
    }
}

impl Temporal {
    /// [`date_difference`]; fails if either side is the latest marker.
    pub fn difference(&self, other: &Temporal, unit: DiffUnit) -> Result<i64> {
        date_difference(self.as_date()?, other.as_date()?, unit)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> VarDate {
        text.parse().expect(text)
    }

    fn diff(a: &str, b: &str, unit: &str) -> Result<i64> {
        date_difference(&date(a), &date(b), unit.parse()?)
    }

    #[test]
    fn unit_tokens() {
        assert_eq!("MONTHS".parse::<DiffUnit>().unwrap(), DiffUnit::Months);
        assert_eq!(DiffUnit::Milliseconds.to_string(), "MILLISECONDS");
        assert_eq!(
            "FORTNIGHTS".parse::<DiffUnit>().unwrap_err(),
            TemporalError::UnsupportedUnit("FORTNIGHTS".to_owned())
        );
        assert!("months".parse::<DiffUnit>().is_err());
    }

    #[test]
    fn equal_values_are_zero_in_every_unit() {
        for unit in ["YEARS", "MONTHS", "WEEKS", "DAYS", "HOURS", "MINUTES", "SECONDS", "MILLISECONDS"] {
            assert_eq!(diff("2020-06-15", "2020-06-15", unit).unwrap(), 0, "{unit}");
        }
    }

    #[test]
    fn months_match_the_worked_example() {
        assert_eq!(diff("2020-01-01", "2021-03-01", "MONTHS").unwrap(), 14);
        assert_eq!(diff("2021-03-01", "2020-01-01", "MONTHS").unwrap(), -14);
    }

    #[test]
    fn years_ignore_finer_fields() {
        assert_eq!(diff("2020-12-31", "2021-01-01", "YEARS").unwrap(), 1);
        assert_eq!(diff("2021-01-01", "2020-12-31", "YEARS").unwrap(), -1);
        // Same year, different month: zero years, but not equal values.
        assert_eq!(diff("2020-01", "2020-12", "YEARS").unwrap(), 0);
    }

    #[test]
    fn days_are_leap_aware() {
        assert_eq!(diff("2020-02-28", "2020-03-01", "DAYS").unwrap(), 2);
        assert_eq!(diff("2021-02-28", "2021-03-01", "DAYS").unwrap(), 1);
        assert_eq!(diff("2020-01-01", "2021-01-01", "DAYS").unwrap(), 366);
        assert_eq!(diff("2021-01-01", "2022-01-01", "DAYS").unwrap(), 365);
        assert_eq!(diff("2021-01-01", "1999-12-31", "DAYS").unwrap(), -7_672);
    }

    #[test]
    fn weeks_count_sunday_boundaries() {
        // 2014-12-03 is a Wednesday, 2014-12-06 a Saturday, 2014-12-07 a Sunday.
        assert_eq!(diff("2014-12-03", "2014-12-06", "WEEKS").unwrap(), 0);
        assert_eq!(diff("2014-12-03", "2014-12-07", "WEEKS").unwrap(), 1);
        assert_eq!(diff("2014-12-06", "2014-12-07", "WEEKS").unwrap(), 1);
        assert_eq!(diff("2014-12-03", "2014-12-10", "WEEKS").unwrap(), 1);
        // Exactly seven Sunday-aligned days is one whole week.
        assert_eq!(diff("2014-12-07", "2014-12-14", "WEEKS").unwrap(), 1);
        assert_eq!(diff("2014-12-07", "2014-12-13", "WEEKS").unwrap(), 0);
        assert_eq!(diff("2014-12-07", "2014-12-21", "WEEKS").unwrap(), 2);
        // Sign follows the operand order.
        assert_eq!(diff("2014-12-10", "2014-12-03", "WEEKS").unwrap(), -1);
    }

    #[test]
    fn clock_units_truncate_projected_millis() {
        assert_eq!(diff("2020-01-01T00:00", "2020-01-02T01:30", "HOURS").unwrap(), 25);
        assert_eq!(diff("2020-01-01T00:00", "2020-01-02T01:30", "MINUTES").unwrap(), 1_530);
        assert_eq!(diff("2020-01-01T00:00", "2020-01-01T00:59", "HOURS").unwrap(), 0);
        assert_eq!(
            diff("2020-01-01T00:00:00.500", "2020-01-01T00:00:01.250", "MILLISECONDS").unwrap(),
            750
        );
        assert_eq!(
            diff("2020-01-01T00:00:01.250", "2020-01-01T00:00:00.500", "SECONDS").unwrap(),
            0
        );
        // The projection floors absent fields, so coarse values still work.
        assert_eq!(diff("2020", "2021", "HOURS").unwrap(), 8_784);
    }

    #[test]
    fn month_and_day_units_require_their_fields() {
        assert_eq!(
            diff("2020", "2021-01", "MONTHS").unwrap_err(),
            TemporalError::MissingField("month")
        );
        assert_eq!(
            diff("2020-01", "2021-01", "DAYS").unwrap_err(),
            TemporalError::MissingField("day")
        );
        assert_eq!(
            diff("2020-01", "2021-01", "WEEKS").unwrap_err(),
            TemporalError::MissingField("day")
        );
    }

    #[test]
    fn sign_comes_from_the_total_order() {
        // Absence sorts first, so the year-only value is "before".
        assert_eq!(diff("2020", "2020-06", "YEARS").unwrap(), 0);
        assert!(date("2020") < date("2020-06"));
        assert_eq!(diff("2019", "2020-06", "YEARS").unwrap(), 1);
        assert_eq!(diff("2020-06", "2019", "YEARS").unwrap(), -1);
    }

    #[test]
    fn latest_marker_rejects_differences() {
        let concrete = Temporal::Date(date("2020-01-01"));
        assert_eq!(
            Temporal::Latest.difference(&concrete, DiffUnit::Days).unwrap_err(),
            TemporalError::LatestMarker
        );
        assert_eq!(
            concrete.difference(&Temporal::Latest, DiffUnit::Days).unwrap_err(),
            TemporalError::LatestMarker
        );
        assert_eq!(
            concrete
                .difference(&Temporal::Date(date("2020-01-08")), DiffUnit::Weeks)
                .unwrap(),
            1
        );
    }
}
