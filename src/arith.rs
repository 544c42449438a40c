// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Precision-aware calendar arithmetic.
//!
//! One `add_*` operation per granularity, years down to arbitrary
//! sub-second digit strings.  Subtraction is addition of a negated delta,
//! except the digit-string pair [`VarDate::add_subsec_digits`] /
//! [`VarDate::sub_subsec_digits`], which operates on decimal digit arrays
//! directly.
//!
//! Every operation requires the value to carry the finest field the unit
//! implicates, treats a zero delta as a no-op, and produces a new value —
//! the receiver is never mutated.  Overflow of a finer field carries into
//! the next coarser one through [`carry_div`]; the two documented clamps
//! (leap day under `add_years`, month length under `add_months`) are
//! defined behavior, not errors.

use crate::calendar::{
    carry_div, days_in_month, is_leap_year, HOURS_PER_DAY, MINUTES_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::error::{Result, TemporalError};
use crate::value::{Temporal, VarDate};

// ═══════════════════════════════════════════════════════════════════════════
// Digit-array helpers
// ═══════════════════════════════════════════════════════════════════════════

/// `amount` (non-negative, < 10^span) as exactly `span` decimal digits,
/// most significant first.
fn unit_digits(mut amount: i64, span: usize) -> Vec<u8> {
    let mut digits = vec![0u8; span];
    for slot in digits.iter_mut().rev() {
        *slot = (amount % 10) as u8;
        amount /= 10;
    }
    digits
}

/// Base-10 addition of `addend` onto `digits`, least significant digit
/// last.  Returns the carry out of the most significant digit.
fn digit_add(digits: &mut [u8], addend: &[u8]) -> u8 {
    let mut carry = 0u8;
    for (slot, &add) in digits.iter_mut().rev().zip(addend.iter().rev()) {
        let sum = *slot + add + carry;
        *slot = sum % 10;
        carry = sum / 10;
    }
    carry
}

/// Base-10 subtraction of `subtrahend` from `digits`.  Returns the borrow
/// out of the most significant digit.
fn digit_sub(digits: &mut [u8], subtrahend: &[u8]) -> u8 {
    let mut borrow = 0u8;
    for (slot, &sub) in digits.iter_mut().rev().zip(subtrahend.iter().rev()) {
        let take = sub + borrow;
        if *slot >= take {
            *slot -= take;
            borrow = 0;
        } else {
            *slot += 10 - take;
            borrow = 1;
        }
    }
    borrow
}

fn to_digits(subsec: &str) -> Vec<u8> {
    subsec.bytes().map(|b| b - b'0').collect()
}

fn from_digits(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(d + b'0')).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Arithmetic engine
// ═══════════════════════════════════════════════════════════════════════════

impl VarDate {
    /// Add `delta` years.  A February 29 clamps to the 28th when the
    /// target year is a common year.
    pub fn add_years(&self, delta: i64) -> Result<VarDate> {
        if delta == 0 {
            return Ok(self.clone());
        }
        let mut v = self.clone();
        v.year += delta;
        if v.has_day() && v.month == 2 && v.day == 29 && !is_leap_year(v.year) {
            v.day = 28;
        }
        Ok(v)
    }

    /// Add `delta` months, carrying whole years; the day clamps to the
    /// target month's length.
    pub fn add_months(&self, delta: i64) -> Result<VarDate> {
        if !self.has_month() {
            return Err(TemporalError::MissingPrecision {
                unit: "months",
                field: "month",
            });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let (mut years, residual) = carry_div(delta, 12);
        let mut month = self.month as i64 + residual;
        if month > 12 {
            month -= 12;
            years += 1;
        }
        let mut v = self.clone();
        v.year += years;
        v.month = month as u8;
        if v.has_day() {
            let last = days_in_month(v.year, v.month);
            if v.day > last {
                v.day = last;
            }
        }
        Ok(v)
    }

    /// Add `delta` weeks (seven-day steps).
    pub fn add_weeks(&self, delta: i64) -> Result<VarDate> {
        if !self.has_day() {
            return Err(TemporalError::MissingPrecision {
                unit: "weeks",
                field: "day",
            });
        }
        self.add_days(delta.saturating_mul(7))
    }

    /// Add `delta` days, walking month lengths forwards or borrowing them
    /// backwards until the day fits.
    pub fn add_days(&self, delta: i64) -> Result<VarDate> {
        if !self.has_day() {
            return Err(TemporalError::MissingPrecision {
                unit: "days",
                field: "day",
            });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let mut v = self.clone();
        let mut day = v.day as i64 + delta;
        while day > days_in_month(v.year, v.month) as i64 {
            day -= days_in_month(v.year, v.month) as i64;
            if v.month == 12 {
                v.month = 1;
                v.year += 1;
            } else {
                v.month += 1;
            }
        }
        while day < 1 {
            if v.month == 1 {
                v.month = 12;
                v.year -= 1;
            } else {
                v.month -= 1;
            }
            day += days_in_month(v.year, v.month) as i64;
        }
        v.day = day as u8;
        Ok(v)
    }

    /// Add `delta` hours, carrying whole days.
    pub fn add_hours(&self, delta: i64) -> Result<VarDate> {
        if !self.has_hour() {
            return Err(TemporalError::MissingPrecision {
                unit: "hours",
                field: "hour",
            });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let (days, residual) = carry_div(delta, HOURS_PER_DAY);
        let mut v = if days != 0 {
            self.add_days(days)?
        } else {
            self.clone()
        };
        let mut hour = v.hour as i64 + residual;
        if hour >= HOURS_PER_DAY {
            hour -= HOURS_PER_DAY;
            v = v.add_days(1)?;
        }
        v.hour = hour as u8;
        Ok(v)
    }

    /// Add `delta` minutes, carrying whole hours.
    pub fn add_minutes(&self, delta: i64) -> Result<VarDate> {
        if !self.has_minute() {
            return Err(TemporalError::MissingPrecision {
                unit: "minutes",
                field: "minute",
            });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let (hours, residual) = carry_div(delta, MINUTES_PER_HOUR);
        let mut v = if hours != 0 {
            self.add_hours(hours)?
        } else {
            self.clone()
        };
        let mut minute = v.minute as i64 + residual;
        if minute >= MINUTES_PER_HOUR {
            minute -= MINUTES_PER_HOUR;
            v = v.add_hours(1)?;
        }
        v.minute = minute as u8;
        Ok(v)
    }

    /// Add `delta` seconds, carrying whole minutes.
    pub fn add_seconds(&self, delta: i64) -> Result<VarDate> {
        if !self.has_second() {
            return Err(TemporalError::MissingPrecision {
                unit: "seconds",
                field: "second",
            });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let (minutes, residual) = carry_div(delta, SECONDS_PER_MINUTE);
        let mut v = if minutes != 0 {
            self.add_minutes(minutes)?
        } else {
            self.clone()
        };
        let mut second = v.second as i64 + residual;
        if second >= SECONDS_PER_MINUTE {
            second -= SECONDS_PER_MINUTE;
            v = v.add_minutes(1)?;
        }
        v.second = second as u8;
        Ok(v)
    }

    /// Add `delta` milliseconds; requires at least three stored sub-second
    /// digits.
    pub fn add_millis(&self, delta: i64) -> Result<VarDate> {
        self.add_subsec_units(delta, 3, "milliseconds", "millisecond precision")
    }

    /// Add `delta` microseconds; requires at least six stored sub-second
    /// digits.
    pub fn add_micros(&self, delta: i64) -> Result<VarDate> {
        self.add_subsec_units(delta, 6, "microseconds", "microsecond precision")
    }

    /// Add `delta` nanoseconds; requires at least nine stored sub-second
    /// digits.
    pub fn add_nanos(&self, delta: i64) -> Result<VarDate> {
        self.add_subsec_units(delta, 9, "nanoseconds", "nanosecond precision")
    }

    /// Whole seconds carry through [`VarDate::add_seconds`]; the residual
    /// is applied as digits over exactly the unit's decimal places, a
    /// final carry or borrow moving into the second field.
    fn add_subsec_units(
        &self,
        delta: i64,
        span: usize,
        unit: &'static str,
        field: &'static str,
    ) -> Result<VarDate> {
        if !self.has_subsec() || self.subsec.len() < span {
            return Err(TemporalError::MissingPrecision { unit, field });
        }
        if delta == 0 {
            return Ok(self.clone());
        }
        let cardinality = 10i64.pow(span as u32);
        let seconds = delta / cardinality;
        let residual = delta % cardinality;
        let mut v = if seconds != 0 {
            self.add_seconds(seconds)?
        } else {
            self.clone()
        };
        if residual != 0 {
            v = v.apply_residual_digits(span, residual)?;
        }
        Ok(v)
    }

    /// Add `residual` (|residual| < 10^span) onto the first `span` stored
    /// digits.
    fn apply_residual_digits(&self, span: usize, residual: i64) -> Result<VarDate> {
        let mut digits = to_digits(&self.subsec);
        let head = &mut digits[..span];
        let carried = if residual > 0 {
            i64::from(digit_add(head, &unit_digits(residual, span)))
        } else {
            -i64::from(digit_sub(head, &unit_digits(-residual, span)))
        };
        let mut v = self.clone();
        v.subsec = from_digits(&digits);
        if carried != 0 {
            v = v.add_seconds(carried)?;
        }
        Ok(v)
    }

    /// Add a positional digit string (`"05"` adds 0.05 s) to the
    /// sub-second field.
    ///
    /// Trailing zeros of `digits` are not significant; the significant
    /// length must not exceed the stored precision.  The stored digit
    /// count never changes.
    ///
    /// ```
    /// use vardate::VarDate;
    ///
    /// let v: VarDate = "2020-01-01T00:00:00.500".parse()?;
    /// assert_eq!(v.add_subsec_digits("05")?.to_string(), "2020-01-01T00:00:00.550");
    /// # Ok::<(), vardate::TemporalError>(())
    /// ```
    pub fn add_subsec_digits(&self, digits: &str) -> Result<VarDate> {
        self.subsec_digit_op(digits, true)
    }

    /// Subtract a positional digit string from the sub-second field; the
    /// counterpart of [`VarDate::add_subsec_digits`].
    pub fn sub_subsec_digits(&self, digits: &str) -> Result<VarDate> {
        self.subsec_digit_op(digits, false)
    }

    fn subsec_digit_op(&self, digits: &str, add: bool) -> Result<VarDate> {
        if !self.has_subsec() {
            return Err(TemporalError::MissingPrecision {
                unit: "sub-seconds",
                field: "sub-second digits",
            });
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TemporalError::BadSubsecond(digits.to_owned()));
        }
        let significant = digits.trim_end_matches('0');
        if significant.is_empty() {
            return Ok(self.clone());
        }
        if significant.len() > self.subsec.len() {
            return Err(TemporalError::PrecisionMismatch {
                digits: digits.to_owned(),
                significant: significant.len(),
                stored: self.subsec.len(),
            });
        }

        let operand = to_digits(significant);
        let mut stored = to_digits(&self.subsec);
        let head = &mut stored[..operand.len()];
        let carried = if add {
            i64::from(digit_add(head, &operand))
        } else {
            -i64::from(digit_sub(head, &operand))
        };
        let mut v = self.clone();
        v.subsec = from_digits(&stored);
        if carried != 0 {
            v = v.add_seconds(carried)?;
        }
        Ok(v)
    }
}

// ── latest-marker delegation ──────────────────────────────────────────────

impl Temporal {
    /// [`VarDate::add_years`]; fails on the latest marker.
    pub fn add_years(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_years(delta)?))
    }

    /// [`VarDate::add_months`]; fails on the latest marker.
    pub fn add_months(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_months(delta)?))
    }

    /// [`VarDate::add_weeks`]; fails on the latest marker.
    pub fn add_weeks(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_weeks(delta)?))
    }

    /// [`VarDate::add_days`]; fails on the latest marker.
    pub fn add_days(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_days(delta)?))
    }

    /// [`VarDate::add_hours`]; fails on the latest marker.
    pub fn add_hours(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_hours(delta)?))
    }

    /// [`VarDate::add_minutes`]; fails on the latest marker.
    pub fn add_minutes(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_minutes(delta)?))
    }

    /// [`VarDate::add_seconds`]; fails on the latest marker.
    pub fn add_seconds(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_seconds(delta)?))
    }

    /// [`VarDate::add_millis`]; fails on the latest marker.
    pub fn add_millis(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_millis(delta)?))
    }

    /// [`VarDate::add_micros`]; fails on the latest marker.
    pub fn add_micros(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_micros(delta)?))
    }

    /// [`VarDate::add_nanos`]; fails on the latest marker.
    pub fn add_nanos(&self, delta: i64) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_nanos(delta)?))
    }

    /// [`VarDate::add_subsec_digits`]; fails on the latest marker.
    pub fn add_subsec_digits(&self, digits: &str) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.add_subsec_digits(digits)?))
    }

    /// [`VarDate::sub_subsec_digits`]; fails on the latest marker.
    pub fn sub_subsec_digits(&self, digits: &str) -> Result<Temporal> {
        Ok(Temporal::Date(self.as_date()?.sub_subsec_digits(digits)?))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
