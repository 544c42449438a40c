// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for temporal value operations.

use thiserror::Error;

/// All failures reported by this crate.
///
/// Every error is raised at the point of detection and carries enough
/// context (field name, offending text span, requested unit or zone) for the
/// caller to build a user-facing message.  There are no retries and no
/// partial successes: an operation either yields a valid value or one of
/// these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The parser could not consume the canonical grammar.
    #[error("malformed temporal text at offset {offset}: expected {expected}, found {found:?}")]
    Malformed {
        /// Byte offset into the (trimmed) input where consumption stopped.
        offset: usize,
        /// What the grammar required at that position.
        expected: &'static str,
        /// The offending remainder of the input (may be empty at end of text).
        found: String,
    },

    /// A field value violates its bound.
    #[error("{field} {value} out of range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A sub-second field was given something other than a digit string.
    #[error("sub-second field must be a non-empty digit string, got {0:?}")]
    BadSubsecond(String),

    /// A field-level accessor was invoked on a value that does not carry
    /// the field.
    #[error("date has no {0}")]
    MissingField(&'static str),

    /// Any field-level operation on the latest marker.
    #[error("invalid operation for latest marker")]
    LatestMarker,

    /// An arithmetic operation on a value coarser than the unit requires.
    #[error("cannot add {unit} to a value that has no {field}")]
    MissingPrecision {
        unit: &'static str,
        field: &'static str,
    },

    /// A sub-second digit-string delta with more significant digits than
    /// the value stores.
    #[error("sub-second delta {digits:?} carries {significant} significant digits but the value stores {stored}")]
    PrecisionMismatch {
        digits: String,
        significant: usize,
        stored: usize,
    },

    /// An unrecognized duration-unit token.
    #[error("unsupported duration unit {0:?}")]
    UnsupportedUnit(String),

    /// A timezone identifier the zone capability does not know.
    #[error("unknown time zone {0:?}")]
    UnknownZone(String),

    /// A character in a format pattern that is neither a directive nor a
    /// permitted literal.
    #[error("unrecognized format directive {0:?}")]
    UnknownDirective(char),

    /// A quoted literal or zone directive that never closes.
    #[error("unterminated {0} in format pattern")]
    Unterminated(&'static str),

    /// A format pattern naming two different time zones.
    #[error("format pattern selects more than one time zone")]
    ZoneConflict,

    /// The output sink rejected a write (streaming formatter only).
    #[error("error writing to the output sink")]
    Sink(#[from] std::fmt::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TemporalError>;
