//! Match store: durable record of tournaments and their matches.
//!
//! Operations take the store as an explicit handle; there is no global connection.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{GameMatch, MatchId, NewMatch, NewTournament, Tournament, TournamentId};
use chrono::NaiveDate;

/// Errors raised by a store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// Backing storage could not be read or written.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            StoreError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            StoreError::Unavailable(reason) => write!(f, "Store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// New slot values for a match. Date and time are always written; venue and
/// duration only when given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchUpdate {
    pub date: NaiveDate,
    pub time: String,
    pub venue: Option<String>,
    pub duration_hours: Option<u8>,
}

/// CRUD over tournaments and matches.
pub trait MatchStore {
    fn create_tournament(&mut self, tournament: NewTournament) -> Result<TournamentId, StoreError>;

    /// `Ok(None)` when no tournament has this id.
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    /// All tournaments, most recently created first.
    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError>;

    /// Delete a tournament and every match that belongs to it.
    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), StoreError>;

    fn create_match(&mut self, new_match: NewMatch) -> Result<MatchId, StoreError>;

    /// Matches of one tournament, in creation order.
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError>;

    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError>;

    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError>;
}
