//! Combo team recommender engine.
//!
//! Given a roster of characters, each with two abilities and a single
//! reaction rule, the engine enumerates candidate four-member teams, explores
//! every chain of follow-up reactions a team can produce, and ranks the teams
//! by how many chains they yield and how long those chains run.

mod character;
mod error;
mod ranker;
mod roster;
mod search;
mod team;

pub use character::{
    sort_for_display, AbilitySlot, Character, Faction, Reaction, ReactionOutput, Tier,
    END_LABEL, NO_CHANGE_LABEL,
};
pub use error::{ComboError, Result};
pub use ranker::{Leaderboards, RankConfig, Ranker, TeamGenerator, TeamResult};
pub use roster::{load_roster, parse_roster, select};
pub use search::{ChainSearch, ChainStep, SearchStats, Sequence, StepRole, MAX_REACTIONS};
pub use team::{Team, TEAM_SIZE};
