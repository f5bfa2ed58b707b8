// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PlasmaTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use rand::{rngs::StdRng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

const ENV_ENABLED: &str = "PLASMA_DETERMINISTIC";
const ENV_SEED: &str = "PLASMA_DETERMINISTIC_SEED";
const ENV_REDUCTION: &str = "PLASMA_DETERMINISTIC_REDUCTION";
const DEFAULT_SEED: u64 = 42;

/// How parameter initialisation and parallel reductions behave across runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeterminismConfig {
    /// Derive parameter streams from `base_seed` instead of OS entropy.
    pub enabled: bool,
    pub base_seed: u64,
    /// Run plane/batch reductions on a single rayon thread.
    pub fix_reduction: bool,
}

impl Default for DeterminismConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_seed: DEFAULT_SEED,
            fix_reduction: false,
        }
    }
}

// Accepts the usual spellings of a boolean switch; anything else is ignored.
fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl DeterminismConfig {
    /// Builds a configuration from a variable lookup. `PLASMA_DETERMINISTIC_REDUCTION`
    /// follows `PLASMA_DETERMINISTIC` unless set explicitly.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup(ENV_ENABLED)
            .as_deref()
            .and_then(parse_switch)
            .unwrap_or(false);
        let base_seed = lookup(ENV_SEED)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);
        let fix_reduction = lookup(ENV_REDUCTION)
            .as_deref()
            .and_then(parse_switch)
            .unwrap_or(enabled);
        Self {
            enabled,
            base_seed,
            fix_reduction,
        }
    }

    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed for the component named `label`, stable for a given base seed.
    pub fn seed_for<L: Hash>(&self, label: L) -> u64 {
        mix(self.base_seed, label)
    }

    /// Whether reductions must keep a fixed order.
    pub fn sequential_reductions(&self) -> bool {
        self.enabled && self.fix_reduction
    }
}

fn mix<L: Hash>(seed: u64, label: L) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    label.hash(&mut hasher);
    hasher.finish()
}

static CONFIG: OnceLock<DeterminismConfig> = OnceLock::new();

/// Process-wide configuration, read from the environment on first use.
pub fn config() -> &'static DeterminismConfig {
    CONFIG.get_or_init(|| install(DeterminismConfig::from_env()))
}

/// Installs `cfg` unless a configuration is already in place, and returns the
/// one that is active.
pub fn configure(cfg: DeterminismConfig) -> &'static DeterminismConfig {
    CONFIG.get_or_init(|| install(cfg))
}

fn install(cfg: DeterminismConfig) -> DeterminismConfig {
    if cfg.sequential_reductions() {
        // Must happen before rayon builds its global pool.
        std::env::set_var("RAYON_NUM_THREADS", "1");
    }
    cfg
}

/// RNG for the component named `label`: seeded from the base seed when
/// determinism is on, from OS entropy otherwise.
pub fn rng_from_label(label: &str) -> StdRng {
    let cfg = config();
    if cfg.enabled {
        StdRng::seed_from_u64(cfg.seed_for(label))
    } else {
        StdRng::from_entropy()
    }
}

/// RNG for a layer parameter. An explicit seed is mixed with `label`, so the
/// parameters of one seeded module draw from distinct streams.
pub fn rng_from_optional(seed: Option<u64>, label: &str) -> StdRng {
    match seed {
        Some(value) => StdRng::seed_from_u64(mix(value, label)),
        None => rng_from_label(label),
    }
}

pub fn lock_reduction_order() -> bool {
    config().sequential_reductions()
}
