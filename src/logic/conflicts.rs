//! Conflict detection: groups of matches booked onto the same resource key.

use crate::models::GameMatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which fields make two matches collide.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// (date, time, duration, venue). Only fully scheduled matches take part.
    #[default]
    Strict,
    /// (date, time). Any match with a date and time takes part.
    Loose,
}

/// The shared slot a group of matches collides on. `duration_hours` and `venue`
/// are `None` under [`KeyStrategy::Loose`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ResourceKey {
    pub date: NaiveDate,
    pub time: String,
    pub duration_hours: Option<u8>,
    pub venue: Option<String>,
}

impl KeyStrategy {
    /// Key for `m`, or `None` if the match does not have the fields this strategy needs.
    pub fn key_for(self, m: &GameMatch) -> Option<ResourceKey> {
        match self {
            KeyStrategy::Strict => {
                if !m.is_fully_scheduled() {
                    return None;
                }
                Some(ResourceKey {
                    date: m.date?,
                    time: m.time.clone()?,
                    duration_hours: m.duration_hours,
                    venue: m.venue.clone(),
                })
            }
            KeyStrategy::Loose => Some(ResourceKey {
                date: m.date?,
                time: m.time.clone()?,
                duration_hours: None,
                venue: None,
            }),
        }
    }
}

/// Two or more matches sharing one resource key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConflictGroup {
    pub key: ResourceKey,
    pub matches: Vec<GameMatch>,
}

/// Find every resource key used by more than one match.
///
/// Groups come out in the order their key is first seen in `matches`; members keep
/// input order. Matches without a key under `strategy` are ignored.
pub fn detect_conflicts(matches: &[GameMatch], strategy: KeyStrategy) -> Vec<ConflictGroup> {
    let mut index: HashMap<ResourceKey, usize> = HashMap::new();
    let mut groups: Vec<ConflictGroup> = Vec::new();

    for m in matches {
        let Some(key) = strategy.key_for(m) else {
            continue;
        };
        match index.get(&key) {
            Some(&at) => groups[at].matches.push(m.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(ConflictGroup {
                    key,
                    matches: vec![m.clone()],
                });
            }
        }
    }

    groups.retain(|g| g.matches.len() > 1);
    groups
}
