//! Board configuration
//!
//! Everything tunable about a board lives in [`BoardConfig`]. Defaults describe
//! the classic 6x5 board with all five kinds; [`BoardConfig::from_env`] overrides
//! individual fields from `GEM_CASCADE_*` variables.

use crate::types::{
    BoardError, BusyPolicy, ConfigIssue, SwapPolicy, TileKind, DEFAULT_CLEAR_DELAY_MS,
    DEFAULT_FALL_DELAY_MS, DEFAULT_HEIGHT, DEFAULT_MATCH_REQUIREMENT, DEFAULT_MAX_CASCADE_PASSES,
    DEFAULT_MAX_QUEUED_SWAPS, DEFAULT_REFILL_DELAY_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_WIDTH,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub match_requirement: u8,
    pub kinds: Vec<TileKind>,
    pub seed: u32,
    pub swap_policy: SwapPolicy,
    pub busy_policy: BusyPolicy,
    pub max_queued_swaps: usize,
    pub enforce_adjacency: bool,
    /// Passes after which refill stops producing fresh runs
    pub max_cascade_passes: u32,
    pub settle_delay_ms: u32,
    pub clear_delay_ms: u32,
    pub fall_delay_ms: u32,
    pub refill_delay_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            match_requirement: DEFAULT_MATCH_REQUIREMENT,
            kinds: TileKind::ALL.to_vec(),
            seed: 1,
            swap_policy: SwapPolicy::default(),
            busy_policy: BusyPolicy::default(),
            max_queued_swaps: DEFAULT_MAX_QUEUED_SWAPS,
            enforce_adjacency: true,
            max_cascade_passes: DEFAULT_MAX_CASCADE_PASSES,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            clear_delay_ms: DEFAULT_CLEAR_DELAY_MS,
            fall_delay_ms: DEFAULT_FALL_DELAY_MS,
            refill_delay_ms: DEFAULT_REFILL_DELAY_MS,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Parse a comma separated kind list; unknown names are skipped
pub fn parse_kinds(list: &str) -> Vec<TileKind> {
    let mut kinds = Vec::new();
    for kind in list.split(',').filter_map(TileKind::from_str) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

impl BoardConfig {
    /// Create from environment variables, falling back to defaults for anything
    /// missing or unparsable.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `GEM_CASCADE_WIDTH` | `width` |
    /// | `GEM_CASCADE_HEIGHT` | `height` |
    /// | `GEM_CASCADE_MATCH` | `match_requirement` |
    /// | `GEM_CASCADE_KINDS` | `kinds` (comma separated) |
    /// | `GEM_CASCADE_SEED` | `seed` |
    /// | `GEM_CASCADE_SWAP_POLICY` | `swap_policy` (`revert` / `keep`) |
    /// | `GEM_CASCADE_BUSY_POLICY` | `busy_policy` (`reject` / `queue`) |
    pub fn from_env() -> Self {
        let d = Self::default();

        let kinds = std::env::var("GEM_CASCADE_KINDS")
            .ok()
            .map(|s| parse_kinds(&s))
            .filter(|k| !k.is_empty())
            .unwrap_or(d.kinds);

        Self {
            width: env_parse("GEM_CASCADE_WIDTH").unwrap_or(d.width),
            height: env_parse("GEM_CASCADE_HEIGHT").unwrap_or(d.height),
            match_requirement: env_parse("GEM_CASCADE_MATCH").unwrap_or(d.match_requirement),
            kinds,
            seed: env_parse("GEM_CASCADE_SEED").unwrap_or(d.seed),
            swap_policy: std::env::var("GEM_CASCADE_SWAP_POLICY")
                .ok()
                .and_then(|s| SwapPolicy::from_str(&s))
                .unwrap_or(d.swap_policy),
            busy_policy: std::env::var("GEM_CASCADE_BUSY_POLICY")
                .ok()
                .and_then(|s| BusyPolicy::from_str(&s))
                .unwrap_or(d.busy_policy),
            ..d
        }
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::InvalidConfig(ConfigIssue::ZeroDimension));
        }
        if self.match_requirement < 2 {
            return Err(BoardError::InvalidConfig(
                ConfigIssue::MatchRequirementTooSmall,
            ));
        }
        if self.match_requirement > self.width.max(self.height) {
            return Err(BoardError::InvalidConfig(
                ConfigIssue::MatchRequirementTooLarge,
            ));
        }
        let mut distinct = self.kinds.clone();
        distinct.sort();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(BoardError::InvalidConfig(ConfigIssue::TooFewKinds));
        }
        Ok(())
    }

    /// Kind set with duplicates removed, order preserved
    pub fn distinct_kinds(&self) -> Vec<TileKind> {
        let mut out: Vec<TileKind> = Vec::with_capacity(self.kinds.len());
        for &k in &self.kinds {
            if !out.contains(&k) {
                out.push(k);
            }
        }
        out
    }
}
