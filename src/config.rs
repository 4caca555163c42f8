use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::search::alphabeta::MAX_DEPTH;
use crate::search::eval::EvaluatorKind;
use crate::search::tt::DEFAULT_CAPACITY;

/// Engine settings. Every field has a default, so a config file only needs
/// the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Iterative deepening runs depths 1 through this value.
    pub max_depth: u32,
    /// Extra plies quiescence may add past the horizon before it stands pat.
    pub qsearch_max_depth: u32,
    pub use_cache: bool,
    /// Transposition cache size in entries.
    pub cache_capacity: usize,
    pub order_moves: bool,
    /// Play a mate-in-one as soon as one is seen at the root.
    pub mate_shortcut: bool,
    pub evaluator: EvaluatorKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            qsearch_max_depth: 8,
            use_cache: true,
            cache_capacity: DEFAULT_CAPACITY,
            order_moves: false,
            mate_shortcut: true,
            evaluator: EvaluatorKind::Classic,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parsing engine config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            bail!("max_depth must be within 1..={MAX_DEPTH}, got {}", self.max_depth);
        }
        if self.cache_capacity == 0 && self.use_cache {
            bail!("cache_capacity must be positive when use_cache is set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "max_depth": 5, "evaluator": "centralizing" }"#).unwrap();
        assert_eq!(cfg, EngineConfig { max_depth: 5, evaluator: EvaluatorKind::Centralizing, ..EngineConfig::default() });
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(EngineConfig::from_json_str(r#"{ "max_depth": 0 }"#).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_json_str(r#"{ "threads": 8 }"#).is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = EngineConfig { order_moves: true, ..EngineConfig::default() };
        let text = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), cfg);
    }
}
