//! Integration tests for round-robin fixture generation and roster parsing.

use std::collections::HashSet;
use tournament_scheduler::{generate_matches, parse_roster, InvalidRosterError};

#[test]
fn three_teams_produce_three_matches_in_input_order() {
    let matches = generate_matches(7, &["Alice", "Bob", "Carol"]).unwrap();
    let pairs: Vec<(u64, &str, &str)> = matches
        .iter()
        .map(|m| (m.id, m.team_a.as_str(), m.team_b.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![(1, "Alice", "Bob"), (2, "Alice", "Carol"), (3, "Bob", "Carol")]
    );
    for m in &matches {
        assert_eq!(m.tournament_id, 7);
        assert_eq!(m.date, None);
        assert_eq!(m.time, None);
        assert_eq!(m.venue, None);
        assert_eq!(m.duration_hours, None);
    }
}

#[test]
fn every_unordered_pair_appears_exactly_once() {
    for n in 2..=9usize {
        let teams: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();
        let matches = generate_matches(1, &teams).unwrap();
        assert_eq!(matches.len(), n * (n - 1) / 2);

        let mut seen = HashSet::new();
        for m in &matches {
            assert_ne!(m.team_a, m.team_b);
            let mut pair = [m.team_a.clone(), m.team_b.clone()];
            pair.sort();
            assert!(seen.insert(pair), "pair repeated for n = {n}");
        }
    }
}

#[test]
fn order_follows_positions_not_names() {
    let matches = generate_matches(1, &["Zed", "Amy", "Max"]).unwrap();
    assert_eq!(matches[0].team_a, "Zed");
    assert_eq!(matches[0].team_b, "Amy");
    assert_eq!(matches[1].team_b, "Max");
    assert_eq!(matches[2].team_a, "Amy");
    let ids: Vec<u64> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn names_are_trimmed_and_blanks_dropped() {
    let matches = generate_matches(1, &["  Alice ", "", "   ", "Bob"]).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].team_a, "Alice");
    assert_eq!(matches[0].team_b, "Bob");
}

#[test]
fn fewer_than_two_usable_names_is_rejected() {
    assert_eq!(
        generate_matches(1, &["Solo", " "]),
        Err(InvalidRosterError::TooFewTeams { usable: 1 })
    );
    let empty: [&str; 0] = [];
    assert_eq!(
        generate_matches(1, &empty),
        Err(InvalidRosterError::TooFewTeams { usable: 0 })
    );
}

#[test]
fn duplicate_names_are_rejected() {
    assert_eq!(
        generate_matches(1, &["Alice", "Bob", " Alice"]),
        Err(InvalidRosterError::DuplicateTeam("Alice".to_string()))
    );
    // Case-sensitive: these are different teams.
    assert_eq!(generate_matches(1, &["alice", "Alice"]).unwrap().len(), 1);
}

#[test]
fn roster_is_split_on_commas_and_trimmed() {
    assert_eq!(
        parse_roster(" Alice, Bob ,,Carol , "),
        vec!["Alice", "Bob", "Carol"]
    );
}

#[test]
fn roster_accepts_quoted_names_and_line_breaks() {
    assert_eq!(
        parse_roster("\"Smith, Jones\",Rovers\nUnited"),
        vec!["Smith, Jones", "Rovers", "United"]
    );
}

#[test]
fn empty_roster_parses_to_nothing() {
    assert!(parse_roster("").is_empty());
    assert!(parse_roster(" , ,").is_empty());
}

#[test]
fn unbalanced_quote_falls_back_to_splitting_on_commas() {
    assert_eq!(
        parse_roster("\"Reds, Blues, Greens"),
        vec!["Reds", "Blues", "Greens"]
    );
    assert_eq!(
        parse_roster("Reds, \"Blues, Greens"),
        vec!["Reds", "Blues", "Greens"]
    );
}
