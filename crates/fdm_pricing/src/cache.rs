//! Explicit results cache for repeated pricing calls.
//!
//! The cache is keyed by value equality of (exercise signature, strike,
//! option type): pricing calls that differ only in strike or type can
//! reuse an already-solved surface, rescaled by the strike ratio. It is
//! an externally owned object passed into the engine by mutable
//! reference — deliberately **not** thread-safe; concurrent pricing
//! calls sharing one cache need external mutual exclusion or one cache
//! per call.

use crate::results::PricingResults;
use fdm_models::exercise::Exercise;
use fdm_models::instrument::VanillaOption;
use fdm_models::payoff::OptionType;
use std::collections::HashMap;

/// Value-equality cache key.
///
/// Times and strikes are stored as raw bit patterns so the key is
/// `Eq + Hash`; two keys match only when every input is bitwise
/// identical, which makes invalidation-on-mismatch automatic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    exercise_kind: u8,
    exercise_times: Vec<u64>,
    option_type: OptionType,
    strike: u64,
}

impl CacheKey {
    /// Key for a vanilla option.
    pub fn new(option: &VanillaOption) -> Self {
        let exercise_kind = match &option.exercise {
            Exercise::European { .. } => 0,
            Exercise::American { .. } => 1,
            Exercise::Bermudan { .. } => 2,
        };
        Self {
            exercise_kind,
            exercise_times: option
                .exercise
                .times()
                .iter()
                .map(|t| t.to_bits())
                .collect(),
            option_type: option.payoff.option_type(),
            strike: option.payoff.strike().to_bits(),
        }
    }
}

/// Results cache with value-equality lookup.
#[derive(Debug, Clone, Default)]
pub struct ResultsCache {
    entries: HashMap<CacheKey, PricingResults>,
}

impl ResultsCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached results for `option`, if present.
    pub fn lookup(&self, option: &VanillaOption) -> Option<PricingResults> {
        self.entries.get(&CacheKey::new(option)).copied()
    }

    /// Store results for `option`.
    pub fn insert(&mut self, option: &VanillaOption, results: PricingResults) {
        self.entries.insert(CacheKey::new(option), results);
    }

    /// Drop every entry. Call when anything outside the key (model
    /// parameters, curves, grid settings) changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
