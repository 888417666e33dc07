//! Schedule service: the operations a front end calls, each against an injected store.

use crate::logic::conflicts::{detect_conflicts, ConflictGroup, KeyStrategy};
use crate::logic::fixtures::{generate_matches, InvalidRosterError};
use crate::logic::setup::{validate_new_tournament, TournamentForm};
use crate::logic::slots::{validate_slot, Slot, SlotProposal, ValidationError};
use crate::models::{GameMatch, MatchId, NewMatch, Tournament, TournamentError, TournamentId};
use crate::store::{MatchStore, MatchUpdate, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors from schedule operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    Setup(TournamentError),
    InvalidRoster(InvalidRosterError),
    /// A slot failed validation. `match_id` is set for match-specific submissions;
    /// `submitted` is echoed back for redisplay.
    Validation {
        match_id: Option<MatchId>,
        error: ValidationError,
        submitted: SlotProposal,
    },
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    StoreUnavailable(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::Setup(e) => write!(f, "{}", e),
            ScheduleError::InvalidRoster(e) => write!(f, "{}", e),
            ScheduleError::Validation {
                match_id: Some(id),
                error,
                ..
            } => write!(f, "Match {}: {}", id, error),
            ScheduleError::Validation { error, .. } => write!(f, "{}", error),
            ScheduleError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            ScheduleError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            ScheduleError::StoreUnavailable(reason) => write!(f, "Store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<StoreError> for ScheduleError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TournamentNotFound(id) => ScheduleError::TournamentNotFound(id),
            StoreError::MatchNotFound(id) => ScheduleError::MatchNotFound(id),
            StoreError::Unavailable(reason) => ScheduleError::StoreUnavailable(reason),
        }
    }
}

impl From<TournamentError> for ScheduleError {
    fn from(e: TournamentError) -> Self {
        ScheduleError::Setup(e)
    }
}

impl From<InvalidRosterError> for ScheduleError {
    fn from(e: InvalidRosterError) -> Self {
        ScheduleError::InvalidRoster(e)
    }
}

/// How a batch submission behaves when one match fails validation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Validate every match first; write nothing unless all pass. The writes themselves are
    /// not atomic: a store error partway through keeps the matches already written.
    #[default]
    Transactional,
    /// Write each match as it passes and stop at the first failure. Earlier writes stay.
    PartialApply,
}

/// Slots keyed by match id.
pub type ScheduleSubmission = BTreeMap<MatchId, SlotProposal>;

fn slot_update(slot: Slot) -> MatchUpdate {
    MatchUpdate {
        date: slot.date,
        time: slot.time,
        venue: Some(slot.venue),
        duration_hours: Some(slot.duration_hours),
    }
}

/// Validate the form and create the tournament.
pub fn create_tournament(
    store: &mut impl MatchStore,
    form: &TournamentForm,
    today: NaiveDate,
) -> Result<Tournament, ScheduleError> {
    let new_tournament = validate_new_tournament(form, today)?;
    let id = store.create_tournament(new_tournament)?;
    log::info!("Created tournament {} ({})", id, form.name.trim());
    load_tournament(&*store, id)
}

/// Fetch a tournament, treating a missing id as an error.
pub fn load_tournament(store: &impl MatchStore, id: TournamentId) -> Result<Tournament, ScheduleError> {
    store.tournament(id)?.ok_or(ScheduleError::TournamentNotFound(id))
}

pub fn delete_tournament(store: &mut impl MatchStore, id: TournamentId) -> Result<(), ScheduleError> {
    store.delete_tournament(id)?;
    log::info!("Deleted tournament {} and its matches", id);
    Ok(())
}

/// Generate round-robin fixtures for a tournament and persist them.
///
/// Any matches the tournament already had are removed first, so each pairing exists once.
/// Returns the stored matches (with store-assigned ids, duration defaulted to one hour).
pub fn generate_fixtures<S: AsRef<str>>(
    store: &mut impl MatchStore,
    tournament_id: TournamentId,
    teams: &[S],
) -> Result<Vec<GameMatch>, ScheduleError> {
    load_tournament(&*store, tournament_id)?;
    let fixtures = generate_matches(tournament_id, teams)?;

    let existing = store.matches(tournament_id)?;
    if !existing.is_empty() {
        log::info!(
            "Replacing {} existing match(es) in tournament {}",
            existing.len(),
            tournament_id
        );
        for m in &existing {
            store.delete_match(m.id)?;
        }
    }

    for fixture in &fixtures {
        store.create_match(NewMatch::from(fixture))?;
    }
    log::info!("Stored {} match(es) for tournament {}", fixtures.len(), tournament_id);
    Ok(store.matches(tournament_id)?)
}

pub fn list_matches(store: &impl MatchStore, tournament_id: TournamentId) -> Result<Vec<GameMatch>, ScheduleError> {
    load_tournament(store, tournament_id)?;
    Ok(store.matches(tournament_id)?)
}

/// Apply a slot submission covering every match of the tournament.
///
/// Matches are processed in store order; a match missing from `submission` is treated as
/// an empty proposal. The first failing match aborts the batch and is reported with its id
/// and submitted values. What happens to matches before it depends on `mode`.
///
/// All-or-nothing holds for validation only. If the store fails while writing, the error is
/// returned and updates already made stay, in either mode.
pub fn schedule_matches(
    store: &mut impl MatchStore,
    tournament_id: TournamentId,
    submission: &ScheduleSubmission,
    mode: BatchMode,
) -> Result<Vec<GameMatch>, ScheduleError> {
    let tournament = load_tournament(&*store, tournament_id)?;
    let matches = store.matches(tournament_id)?;

    let mut validated = Vec::with_capacity(matches.len());
    for m in &matches {
        let proposal = submission.get(&m.id).cloned().unwrap_or_default();
        let slot = match validate_slot(&tournament, &proposal) {
            Ok(slot) => slot,
            Err(error) => {
                log::debug!("Batch for tournament {} stopped at match {}: {}", tournament_id, m.id, error);
                return Err(ScheduleError::Validation {
                    match_id: Some(m.id),
                    error,
                    submitted: proposal,
                });
            }
        };
        match mode {
            BatchMode::PartialApply => store.update_match(m.id, slot_update(slot))?,
            BatchMode::Transactional => validated.push((m.id, slot)),
        }
    }

    for (id, slot) in validated {
        store.update_match(id, slot_update(slot))?;
    }
    log::info!("Scheduled {} match(es) in tournament {}", matches.len(), tournament_id);
    Ok(store.matches(tournament_id)?)
}

fn find_match(
    store: &impl MatchStore,
    tournament_id: TournamentId,
    match_id: MatchId,
) -> Result<GameMatch, ScheduleError> {
    store
        .matches(tournament_id)?
        .into_iter()
        .find(|m| m.id == match_id)
        .ok_or(ScheduleError::MatchNotFound(match_id))
}

/// Validate and apply a new slot for one match.
pub fn update_match_slot(
    store: &mut impl MatchStore,
    tournament_id: TournamentId,
    match_id: MatchId,
    proposal: &SlotProposal,
) -> Result<GameMatch, ScheduleError> {
    let tournament = load_tournament(&*store, tournament_id)?;
    find_match(&*store, tournament_id, match_id)?;
    let slot = validate_slot(&tournament, proposal).map_err(|error| ScheduleError::Validation {
        match_id: Some(match_id),
        error,
        submitted: proposal.clone(),
    })?;
    store.update_match(match_id, slot_update(slot))?;
    find_match(&*store, tournament_id, match_id)
}

/// Remove one match from a tournament.
pub fn cancel_match(
    store: &mut impl MatchStore,
    tournament_id: TournamentId,
    match_id: MatchId,
) -> Result<GameMatch, ScheduleError> {
    let cancelled = find_match(&*store, tournament_id, match_id)?;
    store.delete_match(match_id)?;
    log::info!("Cancelled match {} ({})", match_id, cancelled.label());
    Ok(cancelled)
}

/// Conflicts among a tournament's matches under `strategy`.
pub fn find_conflicts(
    store: &impl MatchStore,
    tournament_id: TournamentId,
    strategy: KeyStrategy,
) -> Result<Vec<ConflictGroup>, ScheduleError> {
    let matches = list_matches(store, tournament_id)?;
    Ok(detect_conflicts(&matches, strategy))
}
