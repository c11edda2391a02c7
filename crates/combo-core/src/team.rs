use crate::{Character, ComboError, Faction, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Members per team
pub const TEAM_SIZE: usize = 4;

/// Four distinct characters, fixed once built.
///
/// Serializes as the member list; deserializing goes through [`Team::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Character>", into = "Vec<Character>")]
pub struct Team {
    members: Vec<Character>,
}

impl Team {
    /// Build a team, rejecting anything but 4 distinct names.
    pub fn new(members: Vec<Character>) -> Result<Self> {
        if members.len() != TEAM_SIZE {
            return Err(ComboError::TeamSize(members.len()));
        }
        let mut seen = HashSet::with_capacity(TEAM_SIZE);
        for member in &members {
            if !seen.insert(member.name.as_str()) {
                return Err(ComboError::DuplicateMember(member.name.clone()));
            }
        }
        Ok(Self { members })
    }

    /// Members already known to be 4 distinct pool entries
    pub(crate) fn from_distinct(members: Vec<Character>) -> Self {
        debug_assert_eq!(members.len(), TEAM_SIZE);
        Self { members }
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Sorted member names; two teams with the same key are the same team
    pub fn canonical_key(&self) -> [String; TEAM_SIZE] {
        let mut key: [String; TEAM_SIZE] = std::array::from_fn(|i| self.members[i].name.clone());
        key.sort();
        key
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }

    /// Whether some faction has at least `min` members on this team
    pub fn has_faction_core(&self, min: usize) -> bool {
        Faction::all().iter().any(|&f| {
            self.members.iter().filter(|m| m.faction == f).count() >= min
        })
    }
}

impl TryFrom<Vec<Character>> for Team {
    type Error = ComboError;

    fn try_from(members: Vec<Character>) -> Result<Self> {
        Team::new(members)
    }
}

impl From<Team> for Vec<Character> {
    fn from(team: Team) -> Self {
        team.members
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names().join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, faction: Faction) -> Character {
        Character::new(name, faction)
    }

    #[test]
    fn test_team_size_enforced() {
        let three = vec![
            member("A", Faction::Shu),
            member("B", Faction::Shu),
            member("C", Faction::Shu),
        ];
        assert!(matches!(Team::new(three), Err(ComboError::TeamSize(3))));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let dup = vec![
            member("A", Faction::Shu),
            member("B", Faction::Shu),
            member("A", Faction::Wei),
            member("C", Faction::Shu),
        ];
        match Team::new(dup) {
            Err(ComboError::DuplicateMember(name)) => assert_eq!(name, "A"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_key_ignores_order() {
        let a = Team::new(vec![
            member("D", Faction::Wu),
            member("B", Faction::Wu),
            member("A", Faction::Wu),
            member("C", Faction::Wu),
        ])
        .unwrap();
        let b = Team::new(vec![
            member("A", Faction::Wu),
            member("B", Faction::Wu),
            member("C", Faction::Wu),
            member("D", Faction::Wu),
        ])
        .unwrap();
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(b.to_string(), "A + B + C + D");
    }

    #[test]
    fn test_faction_core() {
        let team = Team::new(vec![
            member("A", Faction::Wei),
            member("B", Faction::Wei),
            member("C", Faction::Wu),
            member("D", Faction::Wei),
        ])
        .unwrap();
        assert!(team.has_faction_core(3));
        assert!(!team.has_faction_core(4));
    }

    #[test]
    fn test_deserialize_validates_members() {
        let names = |n: usize| -> serde_json::Value {
            let members: Vec<Character> = (0..n)
                .map(|i| member(&format!("M{}", i), Faction::Qun))
                .collect();
            serde_json::to_value(members).unwrap()
        };
        assert!(serde_json::from_value::<Team>(names(3)).is_err());
        assert!(serde_json::from_value::<Team>(names(9)).is_err());

        let team: Team = serde_json::from_value(names(4)).unwrap();
        assert_eq!(team.names(), vec!["M0", "M1", "M2", "M3"]);
        let back: Team = serde_json::from_value(serde_json::to_value(&team).unwrap()).unwrap();
        assert_eq!(back, team);

        let dup = serde_json::to_value(vec![
            member("A", Faction::Shu),
            member("B", Faction::Shu),
            member("A", Faction::Shu),
            member("C", Faction::Shu),
        ])
        .unwrap();
        let err = serde_json::from_value::<Team>(dup).unwrap_err();
        assert!(err.to_string().contains("'A'"));
    }
}
