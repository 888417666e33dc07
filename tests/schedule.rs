//! Integration tests for the schedule service: generation, batch scheduling, updates,
//! cancellation and conflicts against an injected store.

use chrono::NaiveDate;
use tournament_scheduler::{
    cancel_match, create_tournament, delete_tournament, find_conflicts, generate_fixtures,
    list_matches, schedule_matches, update_match_slot, BatchMode, GameMatch, InMemoryStore,
    InvalidRosterError, KeyStrategy, MatchId, MatchStore, MatchUpdate, NewMatch, NewTournament,
    ScheduleError, ScheduleSubmission, SlotProposal, StoreError, Tournament, TournamentForm,
    TournamentId, ValidationError,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Store with one June 2024 tournament and matches for Alice, Bob and Carol.
fn store_with_fixtures() -> (InMemoryStore, TournamentId, Vec<GameMatch>) {
    let mut store = InMemoryStore::new();
    let form = TournamentForm {
        name: "Summer Cup".to_string(),
        start_date: "2024-06-01".to_string(),
        end_date: "2024-06-10".to_string(),
        description: "Club league".to_string(),
    };
    let t = create_tournament(&mut store, &form, date("2024-05-01")).unwrap();
    let matches = generate_fixtures(&mut store, t.id, &["Alice", "Bob", "Carol"]).unwrap();
    (store, t.id, matches)
}

fn slot(d: &str, hours: &str, venue: &str) -> SlotProposal {
    SlotProposal::new(d, "10:00", hours, venue)
}

#[test]
fn generated_fixtures_are_stored_unscheduled_with_default_duration() {
    let (store, t, matches) = store_with_fixtures();
    assert_eq!(matches.len(), 3);
    assert_eq!(list_matches(&store, t).unwrap(), matches);
    let labels: Vec<String> = matches.iter().map(GameMatch::label).collect();
    assert_eq!(labels, vec!["Alice vs Bob", "Alice vs Carol", "Bob vs Carol"]);
    for m in &matches {
        assert_eq!(m.date, None);
        assert_eq!(m.duration_hours, Some(1));
    }
}

#[test]
fn regenerating_replaces_existing_matches() {
    let (mut store, t, first) = store_with_fixtures();
    let second = generate_fixtures(&mut store, t, &["X", "Y"]).unwrap();
    assert_eq!(second.len(), 1);
    assert!(second[0].id > first.last().unwrap().id);
    assert_eq!(list_matches(&store, t).unwrap(), second);
}

#[test]
fn bad_roster_leaves_existing_matches_alone() {
    let (mut store, t, first) = store_with_fixtures();
    assert_eq!(
        generate_fixtures(&mut store, t, &["Solo"]),
        Err(ScheduleError::InvalidRoster(InvalidRosterError::TooFewTeams { usable: 1 }))
    );
    assert_eq!(list_matches(&store, t).unwrap(), first);
}

#[test]
fn generate_for_unknown_tournament() {
    let mut store = InMemoryStore::new();
    assert_eq!(
        generate_fixtures(&mut store, 9, &["A", "B"]),
        Err(ScheduleError::TournamentNotFound(9))
    );
}

#[test]
fn valid_batch_schedules_every_match() {
    let (mut store, t, matches) = store_with_fixtures();
    let submission: ScheduleSubmission = matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, slot(&format!("2024-06-0{}", i + 2), "2", "Court A")))
        .collect();

    let scheduled = schedule_matches(&mut store, t, &submission, BatchMode::Transactional).unwrap();
    assert!(scheduled.iter().all(GameMatch::is_fully_scheduled));
    assert_eq!(scheduled[2].date, Some(date("2024-06-04")));
}

fn batch_failing_on_second(matches: &[GameMatch]) -> ScheduleSubmission {
    let mut submission = ScheduleSubmission::new();
    submission.insert(matches[0].id, slot("2024-06-02", "2", "Court A"));
    submission.insert(matches[1].id, slot("2024-06-15", "2", "Court A"));
    submission.insert(matches[2].id, slot("2024-06-03", "2", "Court A"));
    submission
}

#[test]
fn transactional_batch_writes_nothing_on_failure() {
    let (mut store, t, matches) = store_with_fixtures();
    let submission = batch_failing_on_second(&matches);

    let err = schedule_matches(&mut store, t, &submission, BatchMode::Transactional).unwrap_err();
    match err {
        ScheduleError::Validation {
            match_id,
            error,
            submitted,
        } => {
            assert_eq!(match_id, Some(matches[1].id));
            assert!(matches!(error, ValidationError::DateOutOfTournamentBounds { .. }));
            assert_eq!(submitted.date.as_deref(), Some("2024-06-15"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(list_matches(&store, t).unwrap(), matches);
}

#[test]
fn partial_apply_batch_keeps_matches_before_the_failure() {
    let (mut store, t, matches) = store_with_fixtures();
    let submission = batch_failing_on_second(&matches);

    assert!(matches!(
        schedule_matches(&mut store, t, &submission, BatchMode::PartialApply),
        Err(ScheduleError::Validation { match_id: Some(id), .. }) if id == matches[1].id
    ));
    let after = list_matches(&store, t).unwrap();
    assert_eq!(after[0].date, Some(date("2024-06-02")));
    assert!(after[0].is_fully_scheduled());
    assert_eq!(after[1].date, None);
    // Never reached.
    assert_eq!(after[2].date, None);
}

#[test]
fn missing_submission_entry_is_missing_date_time() {
    let (mut store, t, matches) = store_with_fixtures();
    let mut submission = ScheduleSubmission::new();
    submission.insert(matches[0].id, slot("2024-06-02", "2", "Court A"));

    assert!(matches!(
        schedule_matches(&mut store, t, &submission, BatchMode::default()),
        Err(ScheduleError::Validation {
            match_id: Some(id),
            error: ValidationError::MissingDateTime,
            ..
        }) if id == matches[1].id
    ));
}

#[test]
fn single_update_validates_and_applies() {
    let (mut store, t, matches) = store_with_fixtures();
    let id = matches[1].id;

    let updated = update_match_slot(&mut store, t, id, &slot("2024-06-05", "4", "Main Hall")).unwrap();
    assert_eq!(updated.date, Some(date("2024-06-05")));
    assert_eq!(updated.venue.as_deref(), Some("Main Hall"));
    assert_eq!(updated.duration_hours, Some(4));

    assert!(matches!(
        update_match_slot(&mut store, t, id, &slot("2024-06-05", "11", "Main Hall")),
        Err(ScheduleError::Validation {
            error: ValidationError::DurationOutOfRange(11),
            ..
        })
    ));
    assert_eq!(
        update_match_slot(&mut store, t, 999, &slot("2024-06-05", "4", "Main Hall")),
        Err(ScheduleError::MatchNotFound(999))
    );
}

#[test]
fn update_refuses_match_of_another_tournament() {
    let (mut store, t, matches) = store_with_fixtures();
    let other = store
        .create_tournament(NewTournament {
            name: "Other".to_string(),
            start_date: date("2024-06-01"),
            end_date: date("2024-06-10"),
            description: String::new(),
        })
        .unwrap();
    assert_ne!(other, t);
    assert_eq!(
        update_match_slot(&mut store, other, matches[0].id, &slot("2024-06-05", "4", "Hall")),
        Err(ScheduleError::MatchNotFound(matches[0].id))
    );
}

#[test]
fn cancel_removes_one_match() {
    let (mut store, t, matches) = store_with_fixtures();
    let cancelled = cancel_match(&mut store, t, matches[0].id).unwrap();
    assert_eq!(cancelled, matches[0]);
    assert_eq!(list_matches(&store, t).unwrap(), matches[1..].to_vec());
    assert_eq!(
        cancel_match(&mut store, t, matches[0].id),
        Err(ScheduleError::MatchNotFound(matches[0].id))
    );
}

#[test]
fn conflicts_after_scheduling() {
    let (mut store, t, matches) = store_with_fixtures();
    for m in &matches[..2] {
        update_match_slot(&mut store, t, m.id, &slot("2024-06-02", "2", "CourtA")).unwrap();
    }
    update_match_slot(&mut store, t, matches[2].id, &slot("2024-06-02", "3", "CourtA")).unwrap();

    let strict = find_conflicts(&store, t, KeyStrategy::Strict).unwrap();
    assert_eq!(strict.len(), 1);
    let ids: Vec<MatchId> = strict[0].matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![matches[0].id, matches[1].id]);

    let loose = find_conflicts(&store, t, KeyStrategy::Loose).unwrap();
    assert_eq!(loose[0].matches.len(), 3);
}

#[test]
fn delete_tournament_cascades() {
    let (mut store, t, _) = store_with_fixtures();
    delete_tournament(&mut store, t).unwrap();
    assert_eq!(list_matches(&store, t), Err(ScheduleError::TournamentNotFound(t)));
    assert!(store.matches(t).unwrap().is_empty());
}

/// Store whose backend is gone.
struct OfflineStore;

impl MatchStore for OfflineStore {
    fn create_tournament(&mut self, _: NewTournament) -> Result<TournamentId, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn tournament(&self, _: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn delete_tournament(&mut self, _: TournamentId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn create_match(&mut self, _: NewMatch) -> Result<MatchId, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn matches(&self, _: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn update_match(&mut self, _: MatchId, _: MatchUpdate) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
    fn delete_match(&mut self, _: MatchId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

#[test]
fn store_failures_surface_as_store_unavailable() {
    let mut store = OfflineStore;
    assert_eq!(
        generate_fixtures(&mut store, 1, &["A", "B"]),
        Err(ScheduleError::StoreUnavailable("offline".to_string()))
    );
    assert!(matches!(
        find_conflicts(&store, 1, KeyStrategy::Strict),
        Err(ScheduleError::StoreUnavailable(_))
    ));
}

/// In-memory store whose writes start failing after `updates_left` match updates.
struct FailingWrites {
    inner: InMemoryStore,
    updates_left: usize,
}

impl MatchStore for FailingWrites {
    fn create_tournament(&mut self, t: NewTournament) -> Result<TournamentId, StoreError> {
        self.inner.create_tournament(t)
    }
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        self.inner.tournament(id)
    }
    fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        self.inner.tournaments()
    }
    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), StoreError> {
        self.inner.delete_tournament(id)
    }
    fn create_match(&mut self, m: NewMatch) -> Result<MatchId, StoreError> {
        self.inner.create_match(m)
    }
    fn matches(&self, id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        self.inner.matches(id)
    }
    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<(), StoreError> {
        if self.updates_left == 0 {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.updates_left -= 1;
        self.inner.update_match(id, update)
    }
    fn delete_match(&mut self, id: MatchId) -> Result<(), StoreError> {
        self.inner.delete_match(id)
    }
}

#[test]
fn transactional_batch_keeps_earlier_writes_when_the_store_fails() {
    let (inner, t, matches) = store_with_fixtures();
    let mut store = FailingWrites { inner, updates_left: 1 };
    let submission: ScheduleSubmission = matches
        .iter()
        .map(|m| (m.id, slot("2024-06-02", "2", "Court A")))
        .collect();

    assert_eq!(
        schedule_matches(&mut store, t, &submission, BatchMode::Transactional),
        Err(ScheduleError::StoreUnavailable("disk full".to_string()))
    );
    let after = list_matches(&store, t).unwrap();
    assert!(after[0].is_fully_scheduled());
    assert!(!after[1].is_fully_scheduled());
}
