//! Roster loading.
//!
//! One character per line, seven comma-separated fields:
//! `faction,name,category,primary,secondary,trigger,output`.
//! Malformed lines are skipped rather than failing the whole roster. A name
//! listed twice keeps its first position and its last definition.

use crate::{Character, ComboError, Faction, Reaction, Result, Tier};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

const FIELDS: usize = 7;

/// Parse roster text, skipping lines with the wrong field count or an
/// unknown faction.
pub fn parse_roster(text: &str) -> Vec<Character> {
    let mut roster: Vec<Character> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != FIELDS {
            warn!(line = line_no + 1, fields = parts.len(), "skipping roster line");
            continue;
        }

        let Some(faction) = Faction::parse(parts[0]) else {
            warn!(line = line_no + 1, faction = parts[0], "unknown faction, skipping");
            continue;
        };

        let character = Character {
            name: parts[1].to_string(),
            faction,
            tier: Tier::parse(parts[2]),
            primary: parts[3].to_string(),
            secondary: parts[4].to_string(),
            reaction: Reaction::new(parts[5], parts[6]),
        };
        match seen.get(&character.name).copied() {
            Some(idx) => {
                warn!(
                    line = line_no + 1,
                    name = %character.name,
                    "duplicate name, later entry wins"
                );
                roster[idx] = character;
            }
            None => {
                seen.insert(character.name.clone(), roster.len());
                roster.push(character);
            }
        }
    }
    roster
}

/// Read and parse a roster file
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Character>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ComboError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_roster(&text))
}

/// Resolve names against the roster, keeping the requested order
pub fn select<S: AsRef<str>>(roster: &[Character], names: &[S]) -> Result<Vec<Character>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            roster
                .iter()
                .find(|c| c.name == name)
                .cloned()
                .ok_or_else(|| ComboError::UnknownCharacter(name.to_string()))
        })
        .collect()
}
