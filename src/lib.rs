//! Tournament scheduler: library with models, business logic and the match store.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    cancel_match, create_tournament, delete_tournament, detect_conflicts, find_conflicts,
    generate_fixtures, generate_matches, is_cancelling_weather, list_matches, load_tournament,
    parse_date, schedule_matches, update_match_slot, validate_new_tournament, validate_slot,
    BatchMode, CancelOutcome, ConflictGroup, InvalidRosterError, KeyStrategy, LegacyError,
    LegacyScheduler, ResourceKey, ScheduleError, ScheduleSubmission, Slot, SlotProposal,
    TournamentForm, ValidationError, LEGACY_TOURNAMENT_ID, MAX_DURATION_HOURS, MIN_DURATION_HOURS,
};
pub use models::{
    parse_roster, GameMatch, MatchId, NewMatch, NewTournament, Tournament, TournamentError,
    TournamentId, DEFAULT_DURATION_HOURS,
};
pub use store::{InMemoryStore, MatchStore, MatchUpdate, StoreError};
