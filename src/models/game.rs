//! Match (fixture) between two teams, with its optional schedule slot.

use crate::models::tournament::TournamentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = u64;

/// Duration the store assigns to a match created without one.
pub const DEFAULT_DURATION_HOURS: u8 = 1;

/// A single match between team A and team B.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team_a: String,
    pub team_b: String,
    pub date: Option<NaiveDate>,
    /// Free-form time of day as entered by the operator (e.g. "10:00").
    pub time: Option<String>,
    pub venue: Option<String>,
    pub duration_hours: Option<u8>,
}

impl GameMatch {
    /// Create an unscheduled match: no date, time, venue or duration.
    pub fn new(
        id: MatchId,
        tournament_id: TournamentId,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tournament_id,
            team_a: team_a.into(),
            team_b: team_b.into(),
            date: None,
            time: None,
            venue: None,
            duration_hours: None,
        }
    }

    /// True when date, time, venue and duration are all set. Empty strings count as unset.
    pub fn is_fully_scheduled(&self) -> bool {
        self.date.is_some()
            && self.time.as_deref().is_some_and(|t| !t.is_empty())
            && self.venue.as_deref().is_some_and(|v| !v.is_empty())
            && self.duration_hours.is_some()
    }

    /// "A vs B" label used by listings and logs.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.team_a, self.team_b)
    }
}

/// Insert request for the match store. Duration defaults to one hour at persistence time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub team_a: String,
    pub team_b: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub duration_hours: u8,
}

impl NewMatch {
    pub fn unscheduled(
        tournament_id: TournamentId,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
    ) -> Self {
        Self {
            tournament_id,
            team_a: team_a.into(),
            team_b: team_b.into(),
            date: None,
            time: None,
            venue: None,
            duration_hours: DEFAULT_DURATION_HOURS,
        }
    }
}

impl From<&GameMatch> for NewMatch {
    fn from(m: &GameMatch) -> Self {
        Self {
            tournament_id: m.tournament_id,
            team_a: m.team_a.clone(),
            team_b: m.team_b.clone(),
            date: m.date,
            time: m.time.clone(),
            venue: m.venue.clone(),
            duration_hours: m.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS),
        }
    }
}
