//! Slot validation: checks an operator-entered date/time/duration/venue against a tournament.

use crate::models::Tournament;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::num::IntErrorKind;

/// Shortest allowed match, in hours.
pub const MIN_DURATION_HOURS: u8 = 1;
/// Longest allowed match, in hours.
pub const MAX_DURATION_HOURS: u8 = 10;

/// Raw slot fields as submitted by the operator. Kept verbatim so a failed
/// submission can be shown back unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotProposal {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    /// Hours, as text. JSON clients may also send a number.
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
}

impl SlotProposal {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        duration: impl Into<String>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            date: Some(date.into()),
            time: Some(time.into()),
            venue: Some(venue.into()),
            duration: Some(duration.into()),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }),
    )
}

/// A slot that passed validation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: String,
    /// Empty when the operator left it blank.
    pub venue: String,
    pub duration_hours: u8,
}

impl From<&Slot> for SlotProposal {
    fn from(slot: &Slot) -> Self {
        SlotProposal::new(
            slot.date.format("%Y-%m-%d").to_string(),
            slot.time.clone(),
            slot.duration_hours.to_string(),
            slot.venue.clone(),
        )
    }
}

/// Why a proposed slot was rejected. Checks run in declaration order; the first failure wins.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    MissingDateTime,
    MissingDuration,
    /// Date is not `YYYY-MM-DD` or duration is not an integer.
    MalformedInput,
    DurationOutOfRange(i64),
    DateOutOfTournamentBounds {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl ValidationError {
    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingDateTime => "missing_date_time",
            ValidationError::MissingDuration => "missing_duration",
            ValidationError::MalformedInput => "malformed_input",
            ValidationError::DurationOutOfRange(_) => "duration_out_of_range",
            ValidationError::DateOutOfTournamentBounds { .. } => "date_out_of_tournament_bounds",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingDateTime => write!(f, "Please enter both date and time"),
            ValidationError::MissingDuration => write!(f, "Please select a duration"),
            ValidationError::MalformedInput => write!(f, "Invalid date format or duration"),
            ValidationError::DurationOutOfRange(hours) => write!(
                f,
                "Duration must be between {} and {} hours (got {})",
                MIN_DURATION_HOURS, MAX_DURATION_HOURS, hours
            ),
            ValidationError::DateOutOfTournamentBounds { date, start, end } => write!(
                f,
                "Date {} is outside tournament dates ({} to {})",
                date, start, end
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a strict `YYYY-MM-DD` calendar date (four-digit year, two-digit month and day).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Validate `proposal` for a match of `tournament`.
///
/// Time of day is only checked for presence. Venue is free text and defaults to "".
/// Nothing is persisted; the caller applies the returned slot.
pub fn validate_slot(tournament: &Tournament, proposal: &SlotProposal) -> Result<Slot, ValidationError> {
    let (Some(date), Some(time)) = (present(&proposal.date), present(&proposal.time)) else {
        return Err(ValidationError::MissingDateTime);
    };
    let Some(duration) = present(&proposal.duration) else {
        return Err(ValidationError::MissingDuration);
    };

    let Some(date) = parse_date(date) else {
        return Err(ValidationError::MalformedInput);
    };
    // Integers too large for i64 are still integers: they saturate and fail the range check.
    let hours = match duration.trim().parse::<i64>() {
        Ok(h) => h,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => return Err(ValidationError::MalformedInput),
        },
    };

    let duration_hours = match u8::try_from(hours) {
        Ok(h) if (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&h) => h,
        _ => return Err(ValidationError::DurationOutOfRange(hours)),
    };

    if !tournament.contains_date(date) {
        return Err(ValidationError::DateOutOfTournamentBounds {
            date,
            start: tournament.start_date,
            end: tournament.end_date,
        });
    }

    Ok(Slot {
        date,
        time: time.to_string(),
        venue: proposal.venue.clone().unwrap_or_default(),
        duration_hours,
    })
}
