//! Tournament and TournamentError.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur when creating a tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A required form field (name, start date, end date) was empty.
    MissingField(&'static str),
    /// A date was not in `YYYY-MM-DD` form.
    MalformedDate(String),
    /// End date is on or before the start date.
    EndNotAfterStart,
    /// Start date is before the day of creation.
    StartInPast,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::MissingField(field) => {
                write!(f, "Please fill out all required fields ({} is missing)", field)
            }
            TournamentError::MalformedDate(value) => {
                write!(f, "Invalid date '{}', expected YYYY-MM-DD", value)
            }
            TournamentError::EndNotAfterStart => write!(f, "End date must be after the start date"),
            TournamentError::StartInPast => write!(f, "Start date cannot be earlier than today"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = u64;

/// A tournament: a named date range that matches are scheduled into.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}

impl Tournament {
    /// Whether `date` lies within the tournament, both ends inclusive.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Validated creation request, ready for the store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}
