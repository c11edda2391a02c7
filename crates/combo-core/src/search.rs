//! Chain search engine.
//!
//! For one fixed team, every usable ability of every member seeds an
//! exploration. From the state an ability leaves behind, each team member
//! whose reaction rule matches can join the chain, producing a new state that
//! the remaining members may react to in turn. Every branch that gathers at
//! least one reaction is recorded as a [`Sequence`].

use crate::{AbilitySlot, Character, ComboError, Result, Team};
use serde::{Deserialize, Serialize};

/// Maximum number of reactions in one chain
pub const MAX_REACTIONS: usize = 4;

/// How a step entered the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepRole {
    /// The ability that opened the chain
    Activation(AbilitySlot),
    /// A follow-up triggered by the current state
    Reaction,
}

/// One link in a chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainStep {
    pub actor: String,
    pub role: StepRole,
    /// State the battlefield is left in after this step
    pub effect: String,
}

impl ChainStep {
    pub fn activation(actor: &Character, slot: AbilitySlot, effect: &str) -> Self {
        Self {
            actor: actor.name.clone(),
            role: StepRole::Activation(slot),
            effect: effect.to_string(),
        }
    }

    pub fn reaction(actor: &Character, effect: &str) -> Self {
        Self {
            actor: actor.name.clone(),
            role: StepRole::Reaction,
            effect: effect.to_string(),
        }
    }

    pub fn is_reaction(&self) -> bool {
        self.role == StepRole::Reaction
    }
}

impl std::fmt::Display for ChainStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.role {
            StepRole::Activation(slot) => write!(f, "{} {}({})", self.actor, slot, self.effect),
            StepRole::Reaction => write!(f, "{} reaction({})", self.actor, self.effect),
        }
    }
}

/// A recorded chain: one activation followed by 1..=4 reactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSequence")]
pub struct Sequence {
    steps: Vec<ChainStep>,
}

#[derive(Deserialize)]
struct RawSequence {
    steps: Vec<ChainStep>,
}

impl TryFrom<RawSequence> for Sequence {
    type Error = ComboError;

    fn try_from(raw: RawSequence) -> Result<Self> {
        Sequence::new(raw.steps)
    }
}

impl Sequence {
    /// Wrap steps that form a well-shaped chain.
    pub fn new(steps: Vec<ChainStep>) -> Result<Self> {
        let Some((first, rest)) = steps.split_first() else {
            return Err(ComboError::MalformedSequence);
        };
        if first.is_reaction()
            || !(1..=MAX_REACTIONS).contains(&rest.len())
            || !rest.iter().all(|s| s.is_reaction())
        {
            return Err(ComboError::MalformedSequence);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    pub fn initial(&self) -> &ChainStep {
        &self.steps[0]
    }

    pub fn reactions(&self) -> &[ChainStep] {
        &self.steps[1..]
    }

    pub fn reaction_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_reaction()).count()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " → ")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Sequence totals for one team, bucketed by reaction count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub total: usize,
    /// buckets[k - 1] = sequences with exactly k reactions
    pub buckets: [usize; MAX_REACTIONS],
}

impl SearchStats {
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let mut stats = Self {
            total: sequences.len(),
            ..Self::default()
        };
        for seq in sequences {
            let k = seq.reaction_count();
            if (1..=MAX_REACTIONS).contains(&k) {
                stats.buckets[k - 1] += 1;
            }
        }
        stats
    }

    /// Number of sequences with exactly `k` reactions (k in 1..=4)
    pub fn bucket(&self, k: usize) -> usize {
        if (1..=MAX_REACTIONS).contains(&k) {
            self.buckets[k - 1]
        } else {
            0
        }
    }
}

/// Bitmask over team member indices
type UsedSet = u8;

#[inline]
fn mark(used: UsedSet, idx: usize) -> UsedSet {
    used | (1 << idx)
}

#[inline]
fn is_used(used: UsedSet, idx: usize) -> bool {
    used & (1 << idx) != 0
}

/// Unit struct search engine, stateless, all state is per-call.
pub struct ChainSearch;

impl Default for ChainSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainSearch {
    pub fn new() -> Self {
        Self
    }

    /// Every recorded chain for the team, in traversal order: member order,
    /// then primary before secondary, then reactor order at each level.
    pub fn search(&self, team: &Team) -> Vec<Sequence> {
        let mut out = Vec::new();
        for (idx, starter) in team.members().iter().enumerate() {
            for slot in AbilitySlot::both() {
                if let Some(effect) = starter.ability(slot) {
                    self.seed(team, idx, slot, effect, &mut out);
                }
            }
        }
        out
    }

    /// Open a chain with one ability and explore the first reaction level.
    ///
    /// The starter reacting to its own ability is explored with the starter
    /// marked used. Any other first reactor starts with only itself marked,
    /// so the starter may still react later in that branch.
    // NOTE: this asymmetry drives the reported counts; confirm intended
    // behavior with the game data owners before changing it.
    fn seed(
        &self,
        team: &Team,
        starter_idx: usize,
        slot: AbilitySlot,
        effect: &str,
        out: &mut Vec<Sequence>,
    ) {
        let members = team.members();
        let starter = &members[starter_idx];
        let opening = vec![ChainStep::activation(starter, slot, effect)];

        if let Some(next) = starter.reaction.chains_from(effect) {
            let mut steps = opening.clone();
            steps.push(ChainStep::reaction(starter, next));
            self.explore(team, next, mark(0, starter_idx), steps, out);
        }

        for (idx, member) in members.iter().enumerate() {
            if idx == starter_idx {
                continue;
            }
            if let Some(next) = member.reaction.chains_from(effect) {
                let mut steps = opening.clone();
                steps.push(ChainStep::reaction(member, next));
                self.explore(team, next, mark(0, idx), steps, out);
            }
        }
    }

    /// Extend a partial chain from `state`, recording every finished branch.
    ///
    /// A branch finishes when it holds [`MAX_REACTIONS`] reactions or no
    /// unused member reacts to `state`. Finished branches without a reaction
    /// are dropped.
    pub(crate) fn explore(
        &self,
        team: &Team,
        state: &str,
        used: UsedSet,
        partial: Vec<ChainStep>,
        out: &mut Vec<Sequence>,
    ) {
        let reactions = partial.iter().filter(|s| s.is_reaction()).count();
        if reactions >= MAX_REACTIONS {
            Self::record(partial, reactions, out);
            return;
        }

        let mut triggered = false;
        for (idx, member) in team.members().iter().enumerate() {
            if is_used(used, idx) {
                continue;
            }
            if let Some(next) = member.reaction.chains_from(state) {
                triggered = true;
                let mut steps = partial.clone();
                steps.push(ChainStep::reaction(member, next));
                self.explore(team, next, mark(used, idx), steps, out);
            }
        }

        if !triggered {
            Self::record(partial, reactions, out);
        }
    }

    fn record(steps: Vec<ChainStep>, reactions: usize, out: &mut Vec<Sequence>) {
        if reactions > 0 {
            out.push(Sequence { steps });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Faction, END_LABEL, NO_CHANGE_LABEL};

    fn team(members: Vec<Character>) -> Team {
        Team::new(members).unwrap()
    }

    fn blank(name: &str) -> Character {
        Character::new(name, Faction::Shu)
    }

    fn actors(seq: &Sequence) -> Vec<&str> {
        seq.steps().iter().map(|s| s.actor.as_str()).collect()
    }

    #[test]
    fn test_worked_scenario_stops_at_terminal_reactor() {
        let t = team(vec![
            blank("A").with_primary("Stun"),
            blank("B").with_reaction("Stun", "Guard"),
            blank("C").with_reaction("Guard", "Rally"),
            blank("D").with_reaction("Rally", END_LABEL),
        ]);

        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 1);
        let seq = &seqs[0];
        assert_eq!(actors(seq), vec!["A", "B", "C"]);
        assert_eq!(seq.initial().role, StepRole::Activation(AbilitySlot::Primary));
        assert_eq!(seq.initial().effect, "Stun");
        assert_eq!(seq.steps()[1].effect, "Guard");
        assert_eq!(seq.steps()[2].effect, "Rally");
        assert_eq!(seq.reaction_count(), 2);

        let stats = SearchStats::from_sequences(&seqs);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.bucket(2), 1);
        assert_eq!(stats.bucket(3), 0);
        assert_eq!(stats.bucket(4), 0);
    }

    #[test]
    fn test_english_end_is_an_ordinary_state() {
        let t = team(vec![
            blank("A").with_primary("Stun"),
            blank("B").with_reaction("Stun", "End"),
            blank("C"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 1);
        assert_eq!(actors(&seqs[0]), vec!["A", "B"]);
        assert_eq!(seqs[0].reactions()[0].effect, "End");
    }

    #[test]
    fn test_activation_without_reaction_is_dropped() {
        let t = team(vec![
            blank("A").with_primary("Stun").with_secondary("Burn"),
            blank("B").with_reaction("Freeze", "Guard"),
            blank("C"),
            blank("D"),
        ]);
        assert!(ChainSearch::new().search(&t).is_empty());
    }

    #[test]
    fn test_blocked_reactor_never_chains() {
        let t = team(vec![
            blank("A").with_primary("Stun"),
            blank("B").with_reaction("Stun", NO_CHANGE_LABEL),
            blank("C").with_reaction("Stun", "Guard"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 1);
        assert_eq!(actors(&seqs[0]), vec!["A", "C"]);
    }

    #[test]
    fn test_self_reaction_branch_comes_first() {
        let t = team(vec![
            blank("A").with_primary("Stun").with_reaction("Stun", "Burn"),
            blank("B").with_reaction("Stun", "Guard"),
            blank("C"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 2);
        assert_eq!(actors(&seqs[0]), vec!["A", "A"]);
        assert_eq!(actors(&seqs[1]), vec!["A", "B"]);
    }

    #[test]
    fn test_starter_may_react_later_in_other_branch() {
        let t = team(vec![
            blank("A").with_primary("Stun").with_reaction("Guard", "Stun"),
            blank("B").with_reaction("Stun", "Guard"),
            blank("C"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 1);
        assert_eq!(actors(&seqs[0]), vec!["A", "B", "A"]);
        assert_eq!(seqs[0].reaction_count(), 2);
    }

    #[test]
    fn test_self_reaction_branch_excludes_starter() {
        // A reacts to its own Stun with Guard; B turns Guard back into Stun.
        // A is marked used, so the chain cannot loop back to it.
        let t = team(vec![
            blank("A").with_primary("Stun").with_reaction("Stun", "Guard"),
            blank("B").with_reaction("Guard", "Stun"),
            blank("C"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs.len(), 1);
        assert_eq!(actors(&seqs[0]), vec!["A", "A", "B"]);
    }

    #[test]
    fn test_depth_bound_and_branching() {
        let t = team(vec![
            blank("A").with_primary("X").with_reaction("X", "Y"),
            blank("B").with_reaction("Y", "X"),
            blank("C").with_reaction("X", "Y"),
            blank("D").with_reaction("Y", "X"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert!(!seqs.is_empty());
        assert!(seqs
            .iter()
            .all(|s| (1..=MAX_REACTIONS).contains(&s.reaction_count())));
        assert!(seqs.iter().any(|s| s.reaction_count() == MAX_REACTIONS));

        let stats = SearchStats::from_sequences(&seqs);
        assert_eq!(stats.buckets.iter().sum::<usize>(), stats.total);
    }

    #[test]
    fn test_explore_partial_branch_in_isolation() {
        let t = team(vec![
            blank("A"),
            blank("B").with_reaction("Guard", "Rally"),
            blank("C").with_reaction("Guard", "Rally"),
            blank("D"),
        ]);
        let engine = ChainSearch::new();
        let partial = vec![ChainStep::activation(&t.members()[0], AbilitySlot::Secondary, "Guard")];

        let mut out = Vec::new();
        engine.explore(&t, "Guard", 0, partial.clone(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(actors(&out[0]), vec!["A", "B"]);
        assert_eq!(actors(&out[1]), vec!["A", "C"]);

        // B already used in this branch
        let mut out = Vec::new();
        engine.explore(&t, "Guard", mark(0, 1), partial.clone(), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(actors(&out[0]), vec!["A", "C"]);

        // No reactor and no reaction yet: nothing recorded
        let mut out = Vec::new();
        engine.explore(&t, "Rally", 0, partial, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_search_is_deterministic() {
        let t = team(vec![
            blank("A").with_primary("X").with_secondary("Y").with_reaction("X", "Y"),
            blank("B").with_primary("Y").with_reaction("Y", "X"),
            blank("C").with_reaction("X", "Y"),
            blank("D").with_reaction("Y", "X"),
        ]);
        let engine = ChainSearch::new();
        assert_eq!(engine.search(&t), engine.search(&t));
    }

    #[test]
    fn test_sequence_display() {
        let t = team(vec![
            blank("A").with_primary("Stun"),
            blank("B").with_reaction("Stun", "Guard"),
            blank("C"),
            blank("D"),
        ]);
        let seqs = ChainSearch::new().search(&t);
        assert_eq!(seqs[0].to_string(), "A primary(Stun) → B reaction(Guard)");
    }

    #[test]
    fn test_sequence_shape_is_validated() {
        let a = blank("A");
        let b = blank("B");
        let open = ChainStep::activation(&a, AbilitySlot::Primary, "Stun");
        let react = ChainStep::reaction(&b, "Guard");

        assert!(matches!(Sequence::new(vec![]), Err(ComboError::MalformedSequence)));
        assert!(Sequence::new(vec![open.clone()]).is_err());
        assert!(Sequence::new(vec![react.clone(), react.clone()]).is_err());
        assert!(Sequence::new(vec![open.clone(), open.clone()]).is_err());
        assert!(Sequence::new(vec![open.clone(), react.clone()]).is_ok());

        let mut too_long = vec![open.clone()];
        too_long.extend(std::iter::repeat(react.clone()).take(MAX_REACTIONS + 1));
        assert!(Sequence::new(too_long).is_err());
    }

    #[test]
    fn test_sequence_deserialize_validates_steps() {
        assert!(serde_json::from_str::<Sequence>(r#"{"steps":[]}"#).is_err());

        let t = team(vec![
            blank("A").with_primary("Stun"),
            blank("B").with_reaction("Stun", "Guard"),
            blank("C"),
            blank("D"),
        ]);
        let seq = ChainSearch::new().search(&t).remove(0);
        let json = serde_json::to_string(&seq).unwrap();
        assert!(json.starts_with(r#"{"steps":"#));
        assert_eq!(serde_json::from_str::<Sequence>(&json).unwrap(), seq);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["steps"].as_array_mut().unwrap().truncate(1);
        assert!(serde_json::from_value::<Sequence>(value).is_err());
    }
}
