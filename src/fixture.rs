//! Fixture mapping for the nested-init comparison.
//!
//! The fixture is a mapping of `N` string keys (`"k0".."k{N-1}"`) to empty
//! inner maps, built once per process. It is a read-only template: every
//! test case takes its own `clone()` and mutates only the copy.

use rayon::prelude::*;
use std::collections::HashMap;

pub type InnerMap = HashMap<String, String>;
pub type FixtureMap = HashMap<String, InnerMap>;

/// Outer key probed by every idiom. Falls inside the generated key range
/// whenever the fixture has at least two keys.
pub const OUTER_KEY: &str = "k1";
/// Inner key written by every idiom.
pub const INNER_KEY: &str = "k2";
/// Value written at `[OUTER_KEY][INNER_KEY]`.
pub const VALUE: &str = "v";

/// Configuration for fixture construction.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Number of outer keys (default: 1M).
    pub keys: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self { keys: 1_000_000 }
    }
}

/// Build the fixture template. Requires `keys >= 2` so that [`OUTER_KEY`]
/// lands inside the populated range.
pub fn build(config: &FixtureConfig) -> FixtureMap {
    assert!(
        config.keys >= 2,
        "fixture must span at least k0..k1, got {} keys",
        config.keys
    );
    (0..config.keys)
        .into_par_iter()
        .map(|i| (format!("k{i}"), InnerMap::new()))
        .collect()
}
