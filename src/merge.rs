use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

/// Which lookup produced a match. Higher priority wins on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Exact,
    Fuzzy,
    Prefix,
}

impl Strategy {
    pub fn priority(&self) -> u8 {
        match self {
            Strategy::Exact => 3,
            Strategy::Fuzzy => 2,
            Strategy::Prefix => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Prefix => "prefix",
        }
    }
}

/// A single hit from one strategy, before deduplication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub id: String,
    pub score: f32,
    pub strategy: Strategy,
}

impl MatchResult {
    pub fn priority(&self) -> u8 {
        self.strategy.priority()
    }

    /// Ordering by `(priority, score)`.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.score.total_cmp(&other.score))
    }
}

/// The surviving match for one session id.
pub type RankedResult = MatchResult;

/// Fold the three strategies' hits into one entry per id, keeping the
/// highest `(priority, score)`, ordered best first.
pub fn merge(
    exact: Vec<MatchResult>,
    fuzzy: Vec<MatchResult>,
    prefix: Vec<MatchResult>,
) -> Vec<RankedResult> {
    let mut best: HashMap<String, MatchResult> = HashMap::new();
    for result in exact.into_iter().chain(fuzzy).chain(prefix) {
        let replace = best
            .get(&result.id)
            .map_or(true, |existing| existing.rank_cmp(&result) == Ordering::Less);
        if replace {
            best.insert(result.id.clone(), result);
        }
    }

    let mut ranked: Vec<RankedResult> = best.into_values().collect();
    ranked.sort_by(|a, b| b.rank_cmp(a).then_with(|| a.id.cmp(&b.id)));
    ranked
}
