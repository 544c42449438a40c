// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Pattern-directed formatting.
//!
//! A pattern is scanned left to right by an explicit-state tokenizer
//! (Normal / InQuote / InBracket) and interpreted against a [`VarDate`].
//! Directive characters are count-sensitive:
//!
//! | Directive | Meaning |
//! |-----------|---------|
//! | `y` | year — two-digit below a run of 3, full otherwise |
//! | `M` `d` | month, day — zero-padded to the run length |
//! | `H` `m` `s` | 24-hour clock, minute, second — zero-padded likewise |
//! | `h` `a` | 12-hour clock and AM/PM |
//! | `S` | sub-seconds — truncated to the run length below 4, full otherwise |
//! | `z` `Z` `X` | zone abbreviation, RFC-822 offset, ISO-8601 offset |
//! | `[Zone/Id]` | convert to that zone for the rest of the pattern |
//! | `"…"` | literal run, backslash-escaped |
//!
//! The literal separators `-` `/` `:` `.` space and tab pass through
//! unquoted; any other character is an unknown-directive error.  Without a
//! bracket directive the zone directives emit `GMT` / `+0000` / `Z`; at
//! most one zone may be named per pattern.  A directive whose field the
//! value does not carry fails with the inapplicable-field error.

use std::fmt;

use crate::error::{Result, TemporalError};
use crate::value::{Temporal, VarDate, WallClock};
use crate::zone::{TzDatabase, ZoneInfo, ZoneRules};

const DIRECTIVES: &str = "yMdhHamsSzZX";
const SEPARATORS: &str = "-/:. \t";

// ═══════════════════════════════════════════════════════════════════════════
// Tokenizer
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// A directive character and the length of its run.
    Field { directive: char, run: usize },
    /// Text emitted verbatim.
    Literal(String),
    /// A `[Zone/Id]` payload.
    Zone(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuote,
    InBracket,
}

fn tokenize(pattern: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut state = State::Normal;
    let mut literal = String::new();
    let mut zone = String::new();
    let mut escaped = false;
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Normal => {
                if DIRECTIVES.contains(ch) {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    let mut run = 1;
                    while chars.peek() == Some(&ch) {
                        chars.next();
                        run += 1;
                    }
                    tokens.push(Token::Field { directive: ch, run });
                } else if SEPARATORS.contains(ch) {
                    literal.push(ch);
                } else if ch == '"' {
                    state = State::InQuote;
                } else if ch == '[' {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    state = State::InBracket;
                } else {
                    return Err(TemporalError::UnknownDirective(ch));
                }
            }
            State::InQuote => {
                if escaped {
                    literal.push(ch);
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    state = State::Normal;
                } else {
                    literal.push(ch);
                }
            }
            State::InBracket => {
                if ch == ']' {
                    tokens.push(Token::Zone(std::mem::take(&mut zone)));
                    state = State::Normal;
                } else {
                    zone.push(ch);
                }
            }
        }
    }

    match state {
        State::Normal => {
            if !literal.is_empty() {
                tokens.push(Token::Literal(literal));
            }
            Ok(tokens)
        }
        State::InQuote => Err(TemporalError::Unterminated("quoted literal")),
        State::InBracket => Err(TemporalError::Unterminated("time zone directive")),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Interpreter
// ═══════════════════════════════════════════════════════════════════════════

fn write_year<W: fmt::Write>(out: &mut W, year: i64, run: usize) -> Result<()> {
    if run < 3 {
        write!(out, "{:02}", year.rem_euclid(100))?;
    } else if year < 0 {
        write!(out, "-{:0run$}", year.unsigned_abs())?;
    } else {
        write!(out, "{:0run$}", year)?;
    }
    Ok(())
}

fn write_offset<W: fmt::Write>(out: &mut W, offset_millis: i64, directive: char, run: usize) -> Result<()> {
    if directive == 'X' && offset_millis == 0 {
        out.write_char('Z')?;
        return Ok(());
    }
    let total_minutes = offset_millis / 60_000;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let hours = total_minutes.abs() / 60;
    let minutes = total_minutes.abs() % 60;
    match directive {
        'Z' => write!(out, "{sign}{hours:02}{minutes:02}")?,
        _ => match run {
            1 => write!(out, "{sign}{hours:02}")?,
            2 => write!(out, "{sign}{hours:02}{minutes:02}")?,
            _ => write!(out, "{sign}{hours:02}:{minutes:02}")?,
        },
    }
    Ok(())
}

fn emit_field<W: fmt::Write>(
    value: &VarDate,
    clock: &WallClock,
    zone: Option<&ZoneInfo>,
    directive: char,
    run: usize,
    out: &mut W,
) -> Result<()> {
    match directive {
        'y' => write_year(out, clock.year, run)?,
        'M' => {
            value.month()?;
            write!(out, "{:0run$}", clock.month)?;
        }
        'd' => {
            value.day()?;
            write!(out, "{:0run$}", clock.day)?;
        }
        'H' => {
            value.hour()?;
            write!(out, "{:0run$}", clock.hour)?;
        }
        'h' => {
            value.hour()?;
            let half = match clock.hour % 12 {
                0 => 12,
                other => other,
            };
            write!(out, "{:0run$}", half)?;
        }
        'a' => {
            value.hour()?;
            out.write_str(if clock.hour < 12 { "AM" } else { "PM" })?;
        }
        'm' => {
            value.minute()?;
            write!(out, "{:0run$}", clock.minute)?;
        }
        's' => {
            value.second()?;
            write!(out, "{:0run$}", clock.second)?;
        }
        'S' => {
            let digits = value.subsec()?;
            if run >= 4 {
                out.write_str(digits)?;
            } else {
                out.write_str(&digits[..run.min(digits.len())])?;
            }
        }
        'z' => match zone {
            Some(info) => out.write_str(&info.abbreviation)?,
            None => out.write_str("GMT")?,
        },
        'Z' | 'X' => {
            let offset = zone.map_or(0, |info| info.offset_millis);
            write_offset(out, offset, directive, run)?;
        }
        // The tokenizer only produces the directives handled above.
        _ => return Err(TemporalError::UnknownDirective(directive)),
    }
    Ok(())
}

fn format_value<W: fmt::Write>(
    value: &VarDate,
    pattern: &str,
    zones: &dyn ZoneRules,
    out: &mut W,
) -> Result<()> {
    let tokens = tokenize(pattern)?;
    let mut zone_id: Option<String> = None;
    let mut zone_info: Option<ZoneInfo> = None;
    let mut clock = value.projection();

    for token in tokens {
        match token {
            Token::Literal(text) => out.write_str(&text)?,
            Token::Zone(id) => {
                if let Some(existing) = &zone_id {
                    if *existing != id {
                        return Err(TemporalError::ZoneConflict);
                    }
                    continue;
                }
                let epoch = value.projection().epoch_millis();
                let info = zones
                    .resolve(&id, epoch)
                    .ok_or_else(|| TemporalError::UnknownZone(id.clone()))?;
                clock = WallClock::from_epoch_millis(epoch + info.offset_millis);
                zone_id = Some(id);
                zone_info = Some(info);
            }
            Token::Field { directive, run } => {
                emit_field(value, &clock, zone_info.as_ref(), directive, run, out)?
            }
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Public surface
// ═══════════════════════════════════════════════════════════════════════════

impl VarDate {
    /// Format under `pattern` with zones resolved by [`TzDatabase`].
    ///
    /// ```
    /// use vardate::VarDate;
    ///
    /// let v: VarDate = "2014-12-04T15:22:23.123456789".parse()?;
    /// assert_eq!(v.format("yyyy-MM-dd")?, "2014-12-04");
    /// assert_eq!(v.format("HH:mm:ss.SSS")?, "15:22:23.123");
    /// # Ok::<(), vardate::TemporalError>(())
    /// ```
    pub fn format(&self, pattern: &str) -> Result<String> {
        self.format_with(pattern, &TzDatabase)
    }

    /// Format under `pattern` with an explicit zone capability.
    pub fn format_with(&self, pattern: &str, zones: &dyn ZoneRules) -> Result<String> {
        let mut out = String::new();
        self.format_into_with(pattern, zones, &mut out)?;
        Ok(out)
    }

    /// Streaming variant of [`format`](Self::format): writes directly into
    /// `out` instead of building a string.
    pub fn format_into<W: fmt::Write>(&self, pattern: &str, out: &mut W) -> Result<()> {
        self.format_into_with(pattern, &TzDatabase, out)
    }

    /// Streaming variant of [`format_with`](Self::format_with).
    pub fn format_into_with<W: fmt::Write>(
        &self,
        pattern: &str,
        zones: &dyn ZoneRules,
        out: &mut W,
    ) -> Result<()> {
        format_value(self, pattern, zones, out)
    }
}

impl Temporal {
    /// [`VarDate::format`]; fails on the latest marker.
    pub fn format(&self, pattern: &str) -> Result<String> {
        self.as_date()?.format(pattern)
    }

    /// [`VarDate::format_with`]; fails on the latest marker.
    pub fn format_with(&self, pattern: &str, zones: &dyn ZoneRules) -> Result<String> {
        self.as_date()?.format_with(pattern, zones)
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

    #[test]
    fn basic_date_pattern() {
        let v = date("2014-12-04T15:22:23.123456789");
        assert_eq!(v.format("yyyy-MM-dd").unwrap(), "2014-12-04");
        assert_eq!(v.format("yyyy/MM/dd HH:mm:ss").unwrap(), "2014/12/04 15:22:23");
        assert_eq!(v.format("d").unwrap(), "4");
        assert_eq!(v.format("dd").unwrap(), "04");
        assert_eq!(v.format("M-d").unwrap(), "12-4");
    }

    #[test]
    fn year_runs() {
        let v = date("2014-06-01");
        assert_eq!(v.format("y").unwrap(), "14");
        assert_eq!(v.format("yy").unwrap(), "14");
        assert_eq!(v.format("yyy").unwrap(), "2014");
        assert_eq!(v.format("yyyy").unwrap(), "2014");
        assert_eq!(v.format("yyyyy").unwrap(), "02014");
        assert_eq!(date("0005").format("yyyy").unwrap(), "0005");
        assert_eq!(date("-0044").format("yyyy").unwrap(), "-0044");
    }

    #[test]
    fn twelve_hour_clock_and_meridiem() {
        let afternoon = date("2014-12-04T15:22");
        assert_eq!(afternoon.format("h:mm a").unwrap(), "3:22 PM");
        assert_eq!(afternoon.format("hh").unwrap(), "03");
        let midnight = date("2014-12-04T00:05");
        assert_eq!(midnight.format("h:mm a").unwrap(), "12:05 AM");
        let noon = date("2014-12-04T12:00");
        assert_eq!(noon.format("h a").unwrap(), "12 PM");
    }

    #[test]
    fn subsec_runs_truncate_or_emit_all() {
        let v = date("2020-01-01T00:00:00.500");
        assert_eq!(v.format("S").unwrap(), "5");
        assert_eq!(v.format("SS").unwrap(), "50");
        assert_eq!(v.format("SSS").unwrap(), "500");
        assert_eq!(v.format("SSSS").unwrap(), "500");

        let long = date("2014-12-04T15:22:23.123456789");
        assert_eq!(long.format("SSS").unwrap(), "123");
        assert_eq!(long.format("SSSS").unwrap(), "123456789");

        // Shorter stored strings are not padded.
        assert_eq!(date("2020-01-01T00:00:00.5").format("SSS").unwrap(), "5");
    }

    #[test]
    fn quoted_literals_and_escapes() {
        let v = date("2014-12-04");
        assert_eq!(v.format("yyyy\"y\"").unwrap(), "2014y");
        assert_eq!(v.format("\"week of \"yyyy-MM-dd").unwrap(), "week of 2014-12-04");
        assert_eq!(v.format("\"a \\\"quoted\\\" run\"").unwrap(), "a \"quoted\" run");
        assert_eq!(v.format("\"back\\\\slash\"").unwrap(), "back\\slash");
    }

    #[test]
    fn pattern_errors() {
        let v = date("2014-12-04");
        assert_eq!(
            v.format("yyyy-QQ").unwrap_err(),
            TemporalError::UnknownDirective('Q')
        );
        assert_eq!(
            v.format("\"open").unwrap_err(),
            TemporalError::Unterminated("quoted literal")
        );
        assert_eq!(
            v.format("[America/New_York").unwrap_err(),
            TemporalError::Unterminated("time zone directive")
        );
    }

    #[test]
    fn absent_fields_fail() {
        assert_eq!(
            date("2020").format("yyyy-MM").unwrap_err(),
            TemporalError::MissingField("month")
        );
        assert_eq!(
            date("2020-01-01").format("HH").unwrap_err(),
            TemporalError::MissingField("hour")
        );
        assert_eq!(
            date("2020-01-01T10:00:00").format("S").unwrap_err(),
            TemporalError::MissingField("sub-seconds")
        );
        assert_eq!(
            date("2020-01-01").format("a").unwrap_err(),
            TemporalError::MissingField("hour")
        );
    }

    #[test]
    fn zone_directives_default_to_utc_forms() {
        let v = date("2014-12-04T15:22:23");
        assert_eq!(v.format("z").unwrap(), "GMT");
        assert_eq!(v.format("Z").unwrap(), "+0000");
        assert_eq!(v.format("X").unwrap(), "Z");
        assert_eq!(v.format("HH:mm z").unwrap(), "15:22 GMT");
    }

    #[test]
    fn bracket_zone_converts_subsequent_directives() {
        let v = date("2014-12-04T15:22:23");
        // December in New York is EST, UTC−5.
        assert_eq!(
            v.format("[America/New_York]HH:mm z").unwrap(),
            "10:22 EST"
        );
        assert_eq!(v.format("[America/New_York]Z").unwrap(), "-0500");
        assert_eq!(v.format("[America/New_York]X").unwrap(), "-05");
        assert_eq!(v.format("[America/New_York]XX").unwrap(), "-0500");
        assert_eq!(v.format("[America/New_York]XXX").unwrap(), "-05:00");
    }

    #[test]
    fn zone_shift_crosses_midnight() {
        let v = date("2014-12-04T03:00:00");
        assert_eq!(
            v.format("[America/New_York]yyyy-MM-dd HH:mm").unwrap(),
            "2014-12-03 22:00"
        );
    }

    #[test]
    fn one_effective_zone_per_pattern() {
        let v = date("2014-12-04T15:22:23");
        // Repeating the same id is a no-op.
        assert_eq!(
            v.format("[America/New_York]HH[America/New_York]:mm").unwrap(),
            "10:22"
        );
        assert_eq!(
            v.format("[America/New_York]HH[Europe/Paris]mm").unwrap_err(),
            TemporalError::ZoneConflict
        );
        assert_eq!(
            v.format("[Not/AZone]HH").unwrap_err(),
            TemporalError::UnknownZone("Not/AZone".to_owned())
        );
    }

    #[test]
    fn streaming_variant_matches_string_variant() {
        let v = date("2014-12-04T15:22:23.123");
        let mut sink = String::new();
        v.format_into("yyyy-MM-dd\"T\"HH:mm:ss.SSS", &mut sink).unwrap();
        assert_eq!(sink, v.format("yyyy-MM-dd\"T\"HH:mm:ss.SSS").unwrap());
        assert_eq!(sink, "2014-12-04T15:22:23.123");
    }

    #[test]
    fn latest_marker_rejects_formatting() {
        assert_eq!(
            Temporal::Latest.format("yyyy").unwrap_err(),
            TemporalError::LatestMarker
        );
    }

    #[test]
    fn tokenizer_states() {
        assert_eq!(
            tokenize("yy-MM").unwrap(),
            vec![
                Token::Field { directive: 'y', run: 2 },
                Token::Literal("-".to_owned()),
                Token::Field { directive: 'M', run: 2 },
            ]
        );
        assert_eq!(
            tokenize("[UTC]\"at\" H").unwrap(),
            vec![
                Token::Zone("UTC".to_owned()),
                Token::Literal("at ".to_owned()),
                Token::Field { directive: 'H', run: 1 },
            ]
        );
    }
}
