//! Team generation and ranking.
//!
//! Enumerates the candidate teams of a selection pool, runs the chain search
//! once per team and folds the results into two leaderboards: one ordered by
//! total chain count, one ordered by full-length (4 reaction) chains.

use crate::{
    ChainSearch, Character, ComboError, Faction, Result, SearchStats, Sequence, Team, TEAM_SIZE,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Members of one faction a same-faction team must field
const FACTION_CORE: usize = 3;

/// Configuration for a ranking run
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Length of the primary leaderboard
    pub top_n: usize,
    /// Length of the chain-depth leaderboard
    pub depth_top_n: usize,
    /// Evaluate candidate teams on the rayon pool
    pub parallel: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_n: 15,
            depth_top_n: 5,
            parallel: true,
        }
    }
}

impl RankConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_depth_top_n(mut self, depth_top_n: usize) -> Self {
        self.depth_top_n = depth_top_n;
        self
    }
}

/// One evaluated team and its chains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    /// 1-based position of the team in generation order
    pub team_no: usize,
    pub team: Team,
    pub sequences: Vec<Sequence>,
    pub stats: SearchStats,
}

impl TeamResult {
    pub fn names(&self) -> Vec<String> {
        self.team.names()
    }

    fn primary_key(&self) -> (usize, usize, usize) {
        (self.stats.total, self.stats.bucket(4), self.stats.bucket(3))
    }

    fn depth_key(&self) -> (usize, usize, usize) {
        (self.stats.bucket(4), self.stats.total, self.stats.bucket(3))
    }
}

/// Output of a ranking run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboards {
    /// Ranked by (total, 4-chains, 3-chains)
    pub top: Vec<TeamResult>,
    /// Ranked by (4-chains, total, 3-chains)
    pub deep: Vec<TeamResult>,
    /// Teams generated
    pub candidates: usize,
    /// Teams that produced at least one chain
    pub evaluated: usize,
}

impl Leaderboards {
    /// Look up a team by number on either board
    pub fn find(&self, team_no: usize) -> Option<&TeamResult> {
        self.top
            .iter()
            .chain(self.deep.iter())
            .find(|r| r.team_no == team_no)
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.deep.is_empty()
    }
}

/// Indices of the `n` best results by descending `key`; ties keep
/// generation order.
fn leaders<K: Ord>(results: &[TeamResult], n: usize, key: impl Fn(&TeamResult) -> K) -> Vec<usize> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| key(&results[b]).cmp(&key(&results[a])));
    order.truncate(n);
    order
}

/// Lexicographic k-combinations of `0..n`
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        // Rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Enumerates candidate teams from a validated selection pool.
pub struct TeamGenerator {
    pool: Vec<Character>,
    pinned: Vec<usize>,
    same_faction: bool,
}

impl TeamGenerator {
    /// Validate the pool and pinned names; nothing is searched on failure.
    pub fn new(pool: &[Character], pinned: &[String], same_faction: bool) -> Result<Self> {
        if pool.len() < TEAM_SIZE {
            return Err(ComboError::PoolTooSmall(pool.len()));
        }
        let mut names = HashSet::with_capacity(pool.len());
        for c in pool {
            if !names.insert(c.name.as_str()) {
                return Err(ComboError::DuplicateMember(c.name.clone()));
            }
        }

        if pinned.len() > TEAM_SIZE {
            return Err(ComboError::TooManyPinned(pinned.len()));
        }
        let mut pinned_idx = Vec::with_capacity(pinned.len());
        for name in pinned {
            let idx = pool
                .iter()
                .position(|c| &c.name == name)
                .ok_or_else(|| ComboError::UnknownCharacter(name.clone()))?;
            if pinned_idx.contains(&idx) {
                return Err(ComboError::DuplicatePinned(name.clone()));
            }
            pinned_idx.push(idx);
        }
        pinned_idx.sort_unstable();

        if same_faction && !Self::pool_has_core(pool) {
            return Err(ComboError::NoFactionCore);
        }

        Ok(Self {
            pool: pool.to_vec(),
            pinned: pinned_idx,
            same_faction,
        })
    }

    fn pool_has_core(pool: &[Character]) -> bool {
        Faction::all()
            .iter()
            .any(|&f| pool.iter().filter(|c| c.faction == f).count() >= FACTION_CORE)
    }

    /// Candidate teams in generation order. Members keep pool order.
    pub fn candidates(&self) -> Vec<Team> {
        let tuples = if self.same_faction && self.pinned.is_empty() {
            self.faction_core_tuples()
        } else {
            self.pinned_tuples()
        };

        tuples
            .into_iter()
            .map(|idx| self.build(&idx))
            .filter(|team| !self.same_faction || team.has_faction_core(FACTION_CORE))
            .collect()
    }

    /// Every 4-subset containing all pinned members
    fn pinned_tuples(&self) -> Vec<Vec<usize>> {
        let rest: Vec<usize> = (0..self.pool.len())
            .filter(|i| !self.pinned.contains(i))
            .collect();
        combinations(rest.len(), TEAM_SIZE - self.pinned.len())
            .into_iter()
            .map(|combo| {
                let mut idx: Vec<usize> = self.pinned.clone();
                idx.extend(combo.into_iter().map(|i| rest[i]));
                idx.sort_unstable();
                idx
            })
            .collect()
    }

    /// Three members of one faction plus any fourth, each team once
    fn faction_core_tuples(&self) -> Vec<Vec<usize>> {
        let mut seen: HashSet<[String; TEAM_SIZE]> = HashSet::new();
        let mut out = Vec::new();

        for &faction in Faction::all() {
            let members: Vec<usize> = (0..self.pool.len())
                .filter(|&i| self.pool[i].faction == faction)
                .collect();
            for core in combinations(members.len(), FACTION_CORE) {
                let core: Vec<usize> = core.into_iter().map(|i| members[i]).collect();
                for other in (0..self.pool.len()).filter(|i| !core.contains(i)) {
                    let mut idx = core.clone();
                    idx.push(other);
                    idx.sort_unstable();

                    let mut key: [String; TEAM_SIZE] =
                        std::array::from_fn(|i| self.pool[idx[i]].name.clone());
                    key.sort();
                    if seen.insert(key) {
                        out.push(idx);
                    }
                }
            }
        }

        // Same order as the unconstrained enumeration
        out.sort();
        out
    }

    fn build(&self, idx: &[usize]) -> Team {
        Team::from_distinct(idx.iter().map(|&i| self.pool[i].clone()).collect())
    }
}

/// Drives the chain search over every candidate team and ranks the results.
pub struct Ranker {
    config: RankConfig,
    engine: ChainSearch,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(RankConfig::default())
    }
}

impl Ranker {
    pub fn new(config: RankConfig) -> Self {
        Self {
            config,
            engine: ChainSearch::new(),
        }
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Rank every candidate team drawn from `pool`.
    ///
    /// `pinned` names must all be in the pool; every candidate includes them.
    /// With `same_faction`, only teams with 3 members of one faction qualify.
    #[instrument(skip_all, fields(pool = pool.len(), pinned = pinned.len(), same_faction = same_faction))]
    pub fn rank(
        &self,
        pool: &[Character],
        pinned: &[String],
        same_faction: bool,
    ) -> Result<Leaderboards> {
        let generator = TeamGenerator::new(pool, pinned, same_faction)?;
        let candidates = generator.candidates();
        let candidate_count = candidates.len();
        debug!(candidates = candidate_count, "generated candidate teams");

        let results = self.evaluate_all(candidates);
        let evaluated = results.len();

        let top: Vec<TeamResult> = leaders(&results, self.config.top_n, TeamResult::primary_key)
            .into_iter()
            .map(|i| results[i].clone())
            .collect();
        let deep: Vec<TeamResult> =
            leaders(&results, self.config.depth_top_n, TeamResult::depth_key)
                .into_iter()
                .map(|i| results[i].clone())
                .collect();

        info!(
            candidates = candidate_count,
            evaluated,
            best_total = top.first().map(|r| r.stats.total).unwrap_or(0),
            "ranking complete"
        );

        Ok(Leaderboards {
            top,
            deep,
            candidates: candidate_count,
            evaluated,
        })
    }

    /// Search each team; teams without any chain are dropped.
    fn evaluate_all(&self, candidates: Vec<Team>) -> Vec<TeamResult> {
        let evaluate = |(i, team): (usize, Team)| self.evaluate(i + 1, team);
        if self.config.parallel {
            candidates
                .into_par_iter()
                .enumerate()
                .filter_map(evaluate)
                .collect()
        } else {
            candidates
                .into_iter()
                .enumerate()
                .filter_map(evaluate)
                .collect()
        }
    }

    /// Search a single team, numbering it `team_no`.
    pub fn evaluate(&self, team_no: usize, team: Team) -> Option<TeamResult> {
        let sequences = self.engine.search(&team);
        if sequences.is_empty() {
            return None;
        }
        let stats = SearchStats::from_sequences(&sequences);
        debug!(team_no, team = %team, total = stats.total, "team evaluated");
        Some(TeamResult {
            team_no,
            team,
            sequences,
            stats,
        })
    }
}
