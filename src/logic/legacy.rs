//! Legacy single-tournament scheduler kept in memory.
//!
//! Every call returns a result instead of prompting; the console front end re-asks on errors.
//! Conflicts here use the loose (date, time) key.

use crate::logic::conflicts::{detect_conflicts, ConflictGroup, KeyStrategy};
use crate::logic::fixtures::{generate_matches, InvalidRosterError};
use crate::logic::slots::parse_date;
use crate::models::{GameMatch, MatchId, TournamentId};
use chrono::NaiveTime;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Tournament id given to matches of the in-memory session.
pub const LEGACY_TOURNAMENT_ID: TournamentId = 0;

/// Weather answer that cancels a match.
const CANCELLING_WEATHER: &str = "rainy";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LegacyError {
    /// No matches generated yet.
    NoMatches,
    MatchNotFound(MatchId),
    /// Date is not `YYYY-MM-DD` or time is not `HH:MM`.
    InvalidDateTime,
}

impl std::fmt::Display for LegacyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegacyError::NoMatches => write!(f, "No matches available"),
            LegacyError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            LegacyError::InvalidDateTime => write!(f, "Invalid date or time format. Please try again"),
        }
    }
}

impl std::error::Error for LegacyError {}

/// Result of a cancellation request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CancelOutcome {
    /// The weather was rainy; the match was removed.
    Cancelled(GameMatch),
    /// Any other weather; the match stays.
    Continues,
}

/// True only for "rainy", ignoring case and surrounding whitespace.
pub fn is_cancelling_weather(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(CANCELLING_WEATHER)
}

#[derive(Clone, Debug, Default)]
pub struct LegacyScheduler {
    matches: Vec<GameMatch>,
}

impl LegacyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    /// Replace the match list with a fresh round robin for `teams`.
    pub fn generate<S: AsRef<str>>(&mut self, teams: &[S]) -> Result<&[GameMatch], InvalidRosterError> {
        self.matches = generate_matches(LEGACY_TOURNAMENT_ID, teams)?;
        log::info!("Matches generated successfully ({})", self.matches.len());
        Ok(self.matches.as_slice())
    }

    /// Matches that still have no date and time, in id order.
    pub fn pending(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(|m| m.date.is_none() || m.time.is_none())
    }

    /// Set (or change) the date and time of one match. Both are trimmed, then the
    /// date must be `YYYY-MM-DD` and the time `HH:MM`.
    pub fn schedule_match(&mut self, id: MatchId, date: &str, time: &str) -> Result<&GameMatch, LegacyError> {
        if self.matches.is_empty() {
            return Err(LegacyError::NoMatches);
        }
        let date = date.trim();
        let time = time.trim();
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(LegacyError::MatchNotFound(id))?;
        let parsed_date = parse_date(date).ok_or(LegacyError::InvalidDateTime)?;
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| LegacyError::InvalidDateTime)?;

        let m = &mut self.matches[idx];
        m.date = Some(parsed_date);
        m.time = Some(time.to_string());
        log::debug!("Match {} set to {} {}", id, date, time);
        Ok(m)
    }

    /// Cancel a match if the reported weather is rainy; otherwise leave it alone.
    pub fn cancel_match(&mut self, id: MatchId, weather: &str) -> Result<CancelOutcome, LegacyError> {
        if self.matches.is_empty() {
            return Err(LegacyError::NoMatches);
        }
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(LegacyError::MatchNotFound(id))?;
        if !is_cancelling_weather(weather) {
            return Ok(CancelOutcome::Continues);
        }
        let cancelled = self.matches.remove(idx);
        log::info!("Match {} canceled due to rainy weather", id);
        Ok(CancelOutcome::Cancelled(cancelled))
    }

    /// Groups of matches sharing a date and time.
    pub fn check_conflicts(&self) -> Vec<ConflictGroup> {
        detect_conflicts(&self.matches, KeyStrategy::Loose)
    }

    /// ASCII table of the match list: id, teams, date and time.
    pub fn render_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Teams", "Date", "Time"]);
        for m in &self.matches {
            builder.push_record([
                m.id.to_string(),
                m.label(),
                m.date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "Not Scheduled".to_string()),
                m.time.clone().unwrap_or_else(|| "Not Scheduled".to_string()),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::ascii());
        table.to_string()
    }
}
