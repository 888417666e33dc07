//! Data structures for the scheduler: tournaments, matches and roster input.

mod game;
mod roster;
mod tournament;

pub use game::{GameMatch, MatchId, NewMatch, DEFAULT_DURATION_HOURS};
pub use roster::parse_roster;
pub use tournament::{NewTournament, Tournament, TournamentError, TournamentId};
