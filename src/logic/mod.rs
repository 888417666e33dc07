//! Scheduler business logic: setup, fixtures, slot validation, conflicts and the schedule service.

mod conflicts;
mod fixtures;
mod legacy;
mod schedule;
mod setup;
mod slots;

pub use conflicts::{detect_conflicts, ConflictGroup, KeyStrategy, ResourceKey};
pub use fixtures::{generate_matches, InvalidRosterError};
pub use legacy::{is_cancelling_weather, CancelOutcome, LegacyError, LegacyScheduler, LEGACY_TOURNAMENT_ID};
pub use schedule::{
    cancel_match, create_tournament, delete_tournament, find_conflicts, generate_fixtures,
    list_matches, load_tournament, schedule_matches, update_match_slot, BatchMode, ScheduleError,
    ScheduleSubmission,
};
pub use setup::{validate_new_tournament, TournamentForm};
pub use slots::{
    parse_date, validate_slot, Slot, SlotProposal, ValidationError, MAX_DURATION_HOURS,
    MIN_DURATION_HOURS,
};
