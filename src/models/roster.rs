//! Team roster input: the comma-separated list of team names an operator submits.

use csv::{ReaderBuilder, Trim};

fn clean<'a>(names: impl Iterator<Item = &'a str> + 'a) -> impl Iterator<Item = String> + 'a {
    names
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Split a roster submission into team names, keeping input order.
///
/// Names are comma separated; line breaks also separate names and double quotes allow a
/// name to contain a comma (`"Smith, Jones", Rovers`). Whitespace is trimmed and empty
/// entries are dropped. Duplicates are kept; the fixture generator reports them.
///
/// An unbalanced quote would swallow the rest of the input into one name, so such input
/// is split on every comma and line break instead, with stray quotes removed.
pub fn parse_roster(input: &str) -> Vec<String> {
    if input.matches('"').count() % 2 != 0 {
        log::warn!("Roster has an unbalanced quote, splitting on every comma");
        return clean(
            input
                .split(|c: char| c == ',' || c == '\n')
                .map(|name| name.trim().trim_matches('"')),
        )
        .collect();
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let mut teams = Vec::new();
    // Balanced quotes, flexible records and in-memory UTF-8 leave no error for the reader to report.
    for record in reader.records().flatten() {
        teams.extend(clean(record.iter()));
    }
    teams
}
