//! Round-robin fixture generation: every pair of teams meets exactly once.

use crate::models::{GameMatch, MatchId, TournamentId};
use std::collections::HashSet;

/// Why a roster cannot produce fixtures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidRosterError {
    /// Fewer than two non-empty team names.
    TooFewTeams { usable: usize },
    /// The same (trimmed, case-sensitive) name appears twice.
    DuplicateTeam(String),
}

impl std::fmt::Display for InvalidRosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRosterError::TooFewTeams { usable } => {
                write!(f, "Need at least 2 teams to generate matches (got {})", usable)
            }
            InvalidRosterError::DuplicateTeam(name) => {
                write!(f, "Team '{}' is listed more than once", name)
            }
        }
    }
}

impl std::error::Error for InvalidRosterError {}

/// Generate the round-robin match list for `teams`.
///
/// 1. Trim names and drop empty entries.
/// 2. Reject rosters with fewer than 2 names or a repeated name.
/// 3. For each i, pair team i with every later team j; ids count up from 1.
///
/// Output order follows input positions (i, j), never team names. All scheduling
/// fields are left unset.
pub fn generate_matches<S: AsRef<str>>(
    tournament_id: TournamentId,
    teams: &[S],
) -> Result<Vec<GameMatch>, InvalidRosterError> {
    let teams: Vec<&str> = teams
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();

    if teams.len() < 2 {
        return Err(InvalidRosterError::TooFewTeams { usable: teams.len() });
    }

    let mut seen = HashSet::with_capacity(teams.len());
    for &team in &teams {
        if !seen.insert(team) {
            return Err(InvalidRosterError::DuplicateTeam(team.to_string()));
        }
    }

    let n = teams.len();
    let mut matches = Vec::with_capacity(n * (n - 1) / 2);
    let mut next_id: MatchId = 1;
    for (i, home) in teams.iter().enumerate() {
        for away in &teams[i + 1..] {
            matches.push(GameMatch::new(next_id, tournament_id, *home, *away));
            next_id += 1;
        }
    }

    log::debug!(
        "Generated {} matches for {} teams (tournament {})",
        matches.len(),
        n,
        tournament_id
    );
    Ok(matches)
}
