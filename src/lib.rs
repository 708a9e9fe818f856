use clap::ValueEnum;

pub mod fixture;
pub mod harness;
pub mod idioms;
pub mod report;
pub mod runner;

/// Nested-init idiom(s) to benchmark.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum IdiomSelect {
    /// Run all six idioms (the full comparison table).
    #[default]
    All,
    /// `entry(k1).or_insert(HashMap::new())` with an eagerly built default.
    EntryOrInsert,
    /// `entry(k1).or_default()` auto-init.
    EntryOrDefault,
    /// `!contains_key` guard insert, then a second lookup for the inner write.
    ContainsThenInsert,
    /// `contains_key` branch: indexed write on hit, whole-map insert on miss.
    ContainsElse,
    /// Single `get_mut`, branch on the returned `Option`.
    GetMut,
    /// Panicking lookup inside `catch_unwind`; miss handled on the unwind path.
    CatchUnwind,
}
