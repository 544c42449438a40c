// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Canonical-text parser.
//!
//! Consumes the grammar
//!
//! ```text
//! ["%"] year ["-" month ["-" day ["T" hour [":" minute [":" second
//!     ["." subsecond]] [offset]]]]]
//! offset := ("+" | "-") 2DIGIT 2DIGIT
//! ```
//!
//! Surrounding whitespace is trimmed and a leading `%` is ignored.  Each
//! numeric run ends at the first non-digit; the cascade of present fields is
//! exactly the set of successfully consumed segments.  A trailing offset is
//! honored only directly after minutes or seconds: the wall-clock fields are
//! assumed local to that offset and are normalized to UTC by calendar
//! arithmetic, which never touches the sub-second digits.  Anything left
//! over fails with a position-aware error carrying the offending text; a
//! failed parse never yields a partial value.

use std::str::FromStr;

use crate::error::{Result, TemporalError};
use crate::value::{is_latest_literal, Temporal, VarDate};

// ═══════════════════════════════════════════════════════════════════════════
// Cursor
// ═══════════════════════════════════════════════════════════════════════════

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Consume `byte` if it is next.
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    fn malformed(&self, expected: &'static str) -> TemporalError {
        TemporalError::Malformed {
            offset: self.pos,
            expected,
            found: self.text[self.pos..].to_owned(),
        }
    }

    /// The maximal run of ASCII digits at the cursor; empty runs fail.
    fn digits(&mut self, expected: &'static str) -> Result<&'a str> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == start {
            Err(self.malformed(expected))
        } else {
            Ok(&self.text[start..self.pos])
        }
    }

    /// A digit run parsed as a number.
    fn number(&mut self, expected: &'static str) -> Result<i64> {
        let start = self.pos;
        let digits = self.digits(expected)?;
        digits.parse().map_err(|_| TemporalError::Malformed {
            offset: start,
            expected,
            found: digits.to_owned(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Grammar
// ═══════════════════════════════════════════════════════════════════════════

fn parse_date(input: &str) -> Result<VarDate> {
    let text = input.trim();
    let mut cur = Cursor::new(text);

    cur.eat(b'%');
    let negative = cur.eat(b'-');
    let magnitude = cur.number("year digits")?;
    let year = if negative { -magnitude } else { magnitude };

    let mut builder = VarDate::builder(year);
    let mut offset_minutes = None;

    if cur.eat(b'-') {
        builder = builder.month(cur.number("month digits")?)?;
        if cur.eat(b'-') {
            builder = builder.day(cur.number("day digits")?)?;
            if cur.eat(b'T') {
                builder = builder.hour(cur.number("hour digits")?)?;
                if cur.eat(b':') {
                    builder = builder.minute(cur.number("minute digits")?)?;
                    if cur.eat(b':') {
                        builder = builder.second(cur.number("second digits")?)?;
                        if cur.eat(b'.') {
                            builder = builder.subsec(cur.digits("sub-second digits")?)?;
                        }
                    }
                    offset_minutes = parse_offset(&mut cur)?;
                }
            }
        }
    }

    if !cur.at_end() {
        return Err(cur.malformed("end of input"));
    }

    let value = builder.build();
    match offset_minutes {
        // The input was local to the offset; subtract it to reach UTC.
        Some(minutes) if minutes != 0 => value.add_minutes(-minutes),
        _ => Ok(value),
    }
}

/// `("+" | "-") 2DIGIT 2DIGIT` as signed minutes east of UTC.
fn parse_offset(cur: &mut Cursor<'_>) -> Result<Option<i64>> {
    let sign = match cur.peek() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Ok(None),
    };
    cur.pos += 1;

    let start = cur.pos;
    let digits = cur.digits("a four-digit zone offset")?;
    if digits.len() != 4 {
        return Err(TemporalError::Malformed {
            offset: start,
            expected: "a four-digit zone offset",
            found: digits.to_owned(),
        });
    }
    let hours: i64 = digits[..2].parse().unwrap_or(0);
    let minutes: i64 = digits[2..].parse().unwrap_or(0);
    if hours > 23 {
        return Err(TemporalError::OutOfRange {
            field: "zone offset hours",
            value: hours,
            min: 0,
            max: 23,
        });
    }
    if minutes > 59 {
        return Err(TemporalError::OutOfRange {
            field: "zone offset minutes",
            value: minutes,
            min: 0,
            max: 59,
        });
    }
    Ok(Some(sign * (hours * 60 + minutes)))
}

impl FromStr for VarDate {
    type Err = TemporalError;

    fn from_str(text: &str) -> Result<Self> {
        parse_date(text)
    }
}

impl FromStr for Temporal {
    type Err = TemporalError;

    /// Like [`VarDate::from_str`], additionally recognizing the `%latest`
    /// literal.
    fn from_str(text: &str) -> Result<Self> {
        if is_latest_literal(text) {
            Ok(Temporal::Latest)
        } else {
            parse_date(text).map(Temporal::Date)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
