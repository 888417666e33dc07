//! Interactive console scheduler for a single in-memory tournament.
//! Run with: cargo run --bin console

use std::io::{self, BufRead, Write};
use tournament_scheduler::{parse_roster, CancelOutcome, LegacyError, LegacyScheduler, MatchId};

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn ask(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_match_id(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<MatchId>> {
    let Some(answer) = ask(input, prompt)? else {
        return Ok(None);
    };
    match answer.parse() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            println!("Invalid ID. Please enter a valid number.");
            Ok(None)
        }
    }
}

/// Ask for date and time until the scheduler accepts them. Returns false on end of input.
fn prompt_slot(input: &mut impl BufRead, scheduler: &mut LegacyScheduler, id: MatchId) -> io::Result<bool> {
    loop {
        let Some(date) = ask(input, "Enter match date (YYYY-MM-DD): ")? else {
            return Ok(false);
        };
        let Some(time) = ask(input, "Enter match time (HH:MM): ")? else {
            return Ok(false);
        };
        match scheduler.schedule_match(id, &date, &time) {
            Ok(_) => return Ok(true),
            Err(LegacyError::InvalidDateTime) => println!("{}", LegacyError::InvalidDateTime),
            Err(e) => {
                println!("{}", e);
                return Ok(true);
            }
        }
    }
}

fn generate(input: &mut impl BufRead, scheduler: &mut LegacyScheduler) -> io::Result<()> {
    let Some(answer) = ask(input, "Enter team names separated by commas: ")? else {
        return Ok(());
    };
    match scheduler.generate(&parse_roster(&answer)) {
        Ok(matches) => println!("{} matches generated successfully!", matches.len()),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

/// Ask for a slot for every match that has no date and time yet. Matches that already
/// have one are skipped; option 4 changes those.
fn schedule_all(input: &mut impl BufRead, scheduler: &mut LegacyScheduler) -> io::Result<()> {
    let pending: Vec<_> = scheduler.pending().map(|m| (m.id, m.label())).collect();
    if scheduler.matches().is_empty() {
        println!("No matches available to schedule.");
        return Ok(());
    }
    if pending.is_empty() {
        println!("Every match already has a date and time. Use option 4 to change one.");
        return Ok(());
    }
    println!("\nLet's schedule the matches. Enter the date and time for each match.");
    for (id, label) in pending {
        println!("\nMatch ID: {}, Teams: {}", id, label);
        if !prompt_slot(input, scheduler, id)? {
            return Ok(());
        }
    }
    println!("All matches have been scheduled successfully!");
    Ok(())
}

fn update(input: &mut impl BufRead, scheduler: &mut LegacyScheduler) -> io::Result<()> {
    if scheduler.matches().is_empty() {
        println!("No matches to update.");
        return Ok(());
    }
    let Some(id) = ask_match_id(input, "Enter the Match ID to update: ")? else {
        return Ok(());
    };
    let Some(current) = scheduler.matches().iter().find(|m| m.id == id) else {
        println!("{}", LegacyError::MatchNotFound(id));
        return Ok(());
    };
    println!(
        "\nCurrent details for Match ID {}: {}, Date: {}, Time: {}",
        id,
        current.label(),
        current.date.map(|d| d.to_string()).unwrap_or_else(|| "Not Scheduled".to_string()),
        current.time.as_deref().unwrap_or("Not Scheduled"),
    );
    if prompt_slot(input, scheduler, id)? {
        println!("Match updated successfully!");
    }
    Ok(())
}

fn cancel(input: &mut impl BufRead, scheduler: &mut LegacyScheduler) -> io::Result<()> {
    if scheduler.matches().is_empty() {
        println!("No matches to cancel.");
        return Ok(());
    }
    let Some(id) = ask_match_id(input, "Enter the Match ID to cancel: ")? else {
        return Ok(());
    };
    let Some(weather) = ask(input, "What is the weather like? (Sunny/Rainy/Cloudy): ")? else {
        return Ok(());
    };
    match scheduler.cancel_match(id, &weather) {
        Ok(CancelOutcome::Cancelled(m)) => println!("Match ID {} ({}) canceled due to rainy weather!", m.id, m.label()),
        Ok(CancelOutcome::Continues) => println!("The match can continue. No cancellation required."),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn check_conflicts(scheduler: &LegacyScheduler) {
    let groups = scheduler.check_conflicts();
    if groups.is_empty() {
        println!("No conflicts found. All matches are scheduled properly.");
        return;
    }
    println!("\nConflicts Found:");
    for group in groups {
        println!("\nDate: {}, Time: {}", group.key.date, group.key.time);
        for m in group.matches {
            println!("  Match ID: {}, Teams: {}", m.id, m.label());
        }
    }
}

const MENU: &str = "
1. Generate matches
2. Schedule matches
3. View matches
4. Update a match
5. Cancel a match
6. Check conflicts
7. Exit
";

fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut scheduler = LegacyScheduler::new();

    loop {
        println!("{}", MENU);
        let Some(choice) = ask(&mut input, "Choose an option: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => generate(&mut input, &mut scheduler)?,
            "2" => schedule_all(&mut input, &mut scheduler)?,
            "3" => {
                if scheduler.matches().is_empty() {
                    println!("No matches scheduled.");
                } else {
                    println!("\nMatch Schedule:\n{}", scheduler.render_table());
                }
            }
            "4" => update(&mut input, &mut scheduler)?,
            "5" => cancel(&mut input, &mut scheduler)?,
            "6" => check_conflicts(&scheduler),
            "7" => break,
            _ => println!("Invalid choice, enter a number from 1 to 7."),
        }
    }
    Ok(())
}
