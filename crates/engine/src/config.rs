//! Session configuration read from the environment.

use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;

use crate::types::{PLAYER_HP_FACTOR_MAX, PLAYER_HP_FACTOR_MIN, TICK_MS};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub seed: u32,
    pub tick_ms: u32,
    pub player_hp_min: u32,
    pub player_hp_max: u32,
    pub log_path: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_ms: TICK_MS,
            player_hp_min: PLAYER_HP_FACTOR_MIN,
            player_hp_max: PLAYER_HP_FACTOR_MAX,
            log_path: None,
        }
    }
}

impl SimConfig {
    /// Create from environment variables
    ///
    /// - `SKIRMISH_SEED`: RNG seed (default: derived from the clock)
    /// - `SKIRMISH_TICK_MS`: frame interval (default: 16)
    /// - `SKIRMISH_PLAYER_HP_MIN` / `SKIRMISH_PLAYER_HP_MAX`: player hp factor range
    /// - `SKIRMISH_LOG_PATH`: log file (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u32>().ok());

        let seed = parse("SKIRMISH_SEED").unwrap_or_else(seed_from_clock);
        let tick_ms = parse("SKIRMISH_TICK_MS").unwrap_or(defaults.tick_ms);
        let player_hp_min = parse("SKIRMISH_PLAYER_HP_MIN").unwrap_or(defaults.player_hp_min);
        let player_hp_max = parse("SKIRMISH_PLAYER_HP_MAX").unwrap_or(defaults.player_hp_max);

        let log_path = lookup("SKIRMISH_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            seed,
            tick_ms,
            player_hp_min,
            player_hp_max,
            log_path,
        }
    }

    /// Player hp factor range, repaired if the configured one is unusable.
    pub fn player_hp_range(&self) -> (u32, u32) {
        let mut lo = self.player_hp_min;
        let mut hi = self.player_hp_max;
        if lo == 0 {
            warn!("SKIRMISH_PLAYER_HP_MIN must be positive; using 1");
            lo = 1;
        }
        if hi < lo {
            warn!(
                "player hp range {}..={} is empty; using {}..={}",
                self.player_hp_min, self.player_hp_max, lo, lo
            );
            hi = lo;
        }
        (lo, hi)
    }

    /// Frame interval, never zero.
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms.max(1)
    }
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_all_keys() {
        let cfg = SimConfig::from_lookup(lookup(&[
            ("SKIRMISH_SEED", "42"),
            ("SKIRMISH_TICK_MS", "33"),
            ("SKIRMISH_PLAYER_HP_MIN", "5"),
            ("SKIRMISH_PLAYER_HP_MAX", "7"),
            ("SKIRMISH_LOG_PATH", " /tmp/skirmish.log "),
        ]));
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.tick_ms, 33);
        assert_eq!(cfg.player_hp_range(), (5, 7));
        assert_eq!(cfg.log_path.as_deref(), Some("/tmp/skirmish.log"));
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let cfg = SimConfig::from_lookup(lookup(&[
            ("SKIRMISH_SEED", "7"),
            ("SKIRMISH_TICK_MS", "fast"),
            ("SKIRMISH_LOG_PATH", "   "),
        ]));
        assert_eq!(cfg.tick_ms, TICK_MS);
        assert_eq!(cfg.player_hp_min, PLAYER_HP_FACTOR_MIN);
        assert_eq!(cfg.log_path, None);
    }

    #[test]
    fn unusable_hp_range_is_repaired() {
        let cfg = SimConfig {
            player_hp_min: 0,
            player_hp_max: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.player_hp_range(), (1, 1));

        let cfg = SimConfig {
            player_hp_min: 9,
            player_hp_max: 3,
            ..SimConfig::default()
        };
        assert_eq!(cfg.player_hp_range(), (9, 9));
    }

    #[test]
    fn zero_tick_is_clamped() {
        let cfg = SimConfig {
            tick_ms: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.tick_ms(), 1);
    }
}
