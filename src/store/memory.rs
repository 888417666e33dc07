//! In-memory match store with JSON snapshots.

use crate::models::{GameMatch, MatchId, NewMatch, NewTournament, Tournament, TournamentId};
use crate::store::{MatchStore, MatchUpdate, StoreError};
use serde::{Deserialize, Serialize};

/// Store kept in memory. Ids auto-increment from 1 and are never reused.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryStore {
    next_tournament_id: TournamentId,
    next_match_id: MatchId,
    /// Creation order.
    tournaments: Vec<Tournament>,
    /// Creation order.
    matches: Vec<GameMatch>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_tournament_id: 1,
            next_match_id: 1,
            tournaments: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Serialize the whole store for writing to disk.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Restore a store written by [`InMemoryStore::to_json`].
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let store: Self =
            serde_json::from_str(json).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        log::info!(
            "Loaded {} tournament(s) and {} match(es) from snapshot",
            store.tournaments.len(),
            store.matches.len()
        );
        Ok(store)
    }

    fn match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, StoreError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MatchNotFound(id))
    }
}

impl MatchStore for InMemoryStore {
    fn create_tournament(&mut self, tournament: NewTournament) -> Result<TournamentId, StoreError> {
        let id = self.next_tournament_id;
        self.next_tournament_id += 1;
        self.tournaments.push(Tournament {
            id,
            name: tournament.name,
            start_date: tournament.start_date,
            end_date: tournament.end_date,
            description: tournament.description,
        });
        Ok(id)
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self.tournaments.iter().find(|t| t.id == id).cloned())
    }

    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        Ok(self.tournaments.iter().rev().cloned().collect())
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), StoreError> {
        let idx = self
            .tournaments
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::TournamentNotFound(id))?;
        // Matches first, so no match is left pointing at a missing tournament.
        self.matches.retain(|m| m.tournament_id != id);
        self.tournaments.remove(idx);
        Ok(())
    }

    fn create_match(&mut self, new_match: NewMatch) -> Result<MatchId, StoreError> {
        if !self.tournaments.iter().any(|t| t.id == new_match.tournament_id) {
            return Err(StoreError::TournamentNotFound(new_match.tournament_id));
        }
        let id = self.next_match_id;
        self.next_match_id += 1;
        self.matches.push(GameMatch {
            id,
            tournament_id: new_match.tournament_id,
            team_a: new_match.team_a,
            team_b: new_match.team_b,
            date: new_match.date,
            time: new_match.time,
            venue: new_match.venue,
            duration_hours: Some(new_match.duration_hours),
        });
        Ok(id)
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        Ok(self
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError> {
        let m = self.match_mut(id)?;
        m.date = Some(update.date);
        m.time = Some(update.time);
        if let Some(venue) = update.venue {
            m.venue = Some(venue);
        }
        if let Some(hours) = update.duration_hours {
            m.duration_hours = Some(hours);
        }
        Ok(())
    }

    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::MatchNotFound(id))?;
        self.matches.remove(idx);
        Ok(())
    }
}
