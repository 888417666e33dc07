//! Setup: validate a tournament creation form.

use crate::logic::slots::parse_date;
use crate::models::{NewTournament, TournamentError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tournament creation form, as submitted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

/// Check the form: required fields present, dates well formed, end after start, start not before `today`.
pub fn validate_new_tournament(
    form: &TournamentForm,
    today: NaiveDate,
) -> Result<NewTournament, TournamentError> {
    let name = form.name.trim();
    let start = form.start_date.trim();
    let end = form.end_date.trim();
    if name.is_empty() {
        return Err(TournamentError::MissingField("name"));
    }
    if start.is_empty() {
        return Err(TournamentError::MissingField("start date"));
    }
    if end.is_empty() {
        return Err(TournamentError::MissingField("end date"));
    }

    let start_date = parse_date(start).ok_or_else(|| TournamentError::MalformedDate(start.to_string()))?;
    let end_date = parse_date(end).ok_or_else(|| TournamentError::MalformedDate(end.to_string()))?;

    if end_date <= start_date {
        return Err(TournamentError::EndNotAfterStart);
    }
    if start_date < today {
        return Err(TournamentError::StartInPast);
    }

    Ok(NewTournament {
        name: name.to_string(),
        start_date,
        end_date,
        description: form.description.trim().to_string(),
    })
}
