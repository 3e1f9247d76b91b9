//! CF-convention time units.
//!
//! Orbit timestamps in ISS LIS files are stored as numeric offsets with a
//! `units` attribute such as `"seconds since 1993-01-01 00:00:00.000"`.
//! [`TimeUnits`] parses that attribute and decodes offsets into UTC
//! datetimes on the proleptic Gregorian calendar (leap seconds ignored).

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Errors produced while parsing a unit string or decoding an offset
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeUnitError {
    /// The unit string is not of the form `<unit> since <epoch>`
    #[error("expected '<unit> since <epoch>', got '{0}'")]
    Malformed(String),

    /// Unsupported time unit
    #[error("unsupported time unit '{0}'")]
    UnknownUnit(String),

    /// The epoch could not be parsed as a date or datetime
    #[error("invalid epoch '{0}'")]
    InvalidEpoch(String),

    /// The offset is NaN, infinite, or outside the representable range
    #[error("offset {0} cannot be represented as a datetime")]
    OutOfRange(f64),
}

/// Time unit of a CF offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// 86400 seconds
    Days,
    /// 3600 seconds
    Hours,
    /// 60 seconds
    Minutes,
    /// SI seconds
    Seconds,
    /// 1e-3 seconds
    Milliseconds,
    /// 1e-6 seconds
    Microseconds,
}

impl TimeUnit {
    fn micros(self) -> f64 {
        match self {
            TimeUnit::Days => 86_400_000_000.0,
            TimeUnit::Hours => 3_600_000_000.0,
            TimeUnit::Minutes => 60_000_000.0,
            TimeUnit::Seconds => 1_000_000.0,
            TimeUnit::Milliseconds => 1_000.0,
            TimeUnit::Microseconds => 1.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Microseconds => "microseconds",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Ok(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Ok(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(TimeUnit::Seconds),
            "milliseconds" | "millisecond" | "msecs" | "msec" | "ms" => Ok(TimeUnit::Milliseconds),
            "microseconds" | "microsecond" | "usecs" | "usec" | "us" => Ok(TimeUnit::Microseconds),
            _ => Err(TimeUnitError::UnknownUnit(s.to_string())),
        }
    }
}

const EPOCH_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A parsed `<unit> since <epoch>` declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    unit: TimeUnit,
    epoch: NaiveDateTime,
}

impl TimeUnits {
    /// Create units from their parts
    pub fn new(unit: TimeUnit, epoch: NaiveDateTime) -> Self {
        Self { unit, epoch }
    }

    /// Unit of the offsets
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Reference datetime that offset zero maps to
    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// Parse a CF unit string, e.g. `"seconds since 1993-01-01 00:00:00.000"`
    pub fn parse(units: &str) -> Result<Self, TimeUnitError> {
        let trimmed = units.trim();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let unit = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim_start();

        let epoch = rest
            .strip_prefix("since")
            .or_else(|| rest.strip_prefix("SINCE"))
            .filter(|e| e.is_empty() || e.starts_with(char::is_whitespace))
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| TimeUnitError::Malformed(trimmed.to_string()))?;

        Ok(Self {
            unit: unit.parse()?,
            epoch: parse_epoch(epoch)?,
        })
    }

    /// Decode a single offset into a datetime
    pub fn decode(&self, offset: f64) -> Result<NaiveDateTime, TimeUnitError> {
        let micros = offset * self.unit.micros();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(TimeUnitError::OutOfRange(offset));
        }

        self.epoch
            .checked_add_signed(Duration::microseconds(micros.round() as i64))
            .ok_or(TimeUnitError::OutOfRange(offset))
    }

    /// Decode a slice of offsets, failing on the first unrepresentable value
    pub fn decode_all(&self, offsets: &[f64]) -> Result<Vec<NaiveDateTime>, TimeUnitError> {
        offsets.iter().map(|&v| self.decode(v)).collect()
    }
}

impl FromStr for TimeUnits {
    type Err = TimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} since {}", self.unit.name(), self.epoch.format("%Y-%m-%d %H:%M:%S%.f"))
    }
}

fn parse_epoch(epoch: &str) -> Result<NaiveDateTime, TimeUnitError> {
    let cleaned = epoch
        .trim_end_matches("UTC")
        .trim_end_matches("utc")
        .trim_end()
        .trim_end_matches('Z')
        .trim_end_matches("+00:00")
        .trim_end();

    for format in EPOCH_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimeUnitError::InvalidEpoch(epoch.to_string()))
}
