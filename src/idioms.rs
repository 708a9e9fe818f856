//! Candidate idioms for initializing a nested map entry.
//!
//! Each idiom conditionally initializes `d[k1]` and then writes
//! `d[k1][k2] = v`, where `d` is a map of maps. They differ in how the
//! outer-key miss is detected and in how many lookups (and key allocations)
//! the hit path pays:
//!
//! ```text
//! entry_or_insert       d.entry(k1).or_insert(InnerMap::new()), then inner write
//! entry_or_default      d.entry(k1).or_default(), then inner write
//! contains_then_insert  if !d.contains_key(k1) { insert empty }, then inner write
//! contains_else         if d.contains_key(k1) { inner write } else { insert {k2: v} }
//! get_mut               match d.get_mut(k1) { hit => inner write, miss => insert }
//! catch_unwind          panicking lookup; the miss is recovered on the unwind path
//! ```
//!
//! The `entry` idioms must hand the map an owned key, so they allocate a
//! `String` even when the outer key is already present; the `contains` and
//! `get_mut` idioms borrow for the lookup and only allocate on the miss
//! path. `catch_unwind` pays the full unwind machinery on every miss; that
//! cost is the point of including it, so it stays miss-as-unwind instead of
//! being rewritten around `Option`.

use std::panic::{self, AssertUnwindSafe};

use crate::fixture::{FixtureMap, InnerMap, OUTER_KEY};
use crate::IdiomSelect;

/// One candidate idiom, run by the benchmark runner.
pub trait InitIdiom {
    /// Label used in tables and reports.
    fn name(&self) -> &'static str;

    /// One-time setup for a condition run: a fresh working copy of the
    /// fixture template.
    fn init_once(&self, fixture: &FixtureMap) -> FixtureMap {
        fixture.clone()
    }

    /// Per-iteration setup, excluded from timing. Clears the outer key so
    /// every iteration of the absent condition starts from a miss.
    fn init_each(&self, d: &mut FixtureMap, exists: bool) {
        if !exists {
            d.remove(OUTER_KEY);
        }
    }

    /// The fragment under measurement: insert `v` at `d[k1][k2]`.
    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str);

    /// Per-case iteration override; `None` uses the configured repeat count.
    fn repeat(&self) -> Option<u64> {
        None
    }

    /// Whether the runner should silence the panic hook while this idiom
    /// executes.
    fn quiet_unwind(&self) -> bool {
        false
    }
}

/// Eagerly built default: the empty inner map is constructed on every call,
/// hit or miss.
pub struct EntryOrInsert;

impl InitIdiom for EntryOrInsert {
    fn name(&self) -> &'static str {
        "entry_or_insert"
    }

    #[allow(clippy::or_fun_call)]
    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        d.entry(k1.to_owned())
            .or_insert(InnerMap::new())
            .insert(k2.to_owned(), v.to_owned());
    }
}

/// Auto-init on miss via `or_default`.
pub struct EntryOrDefault;

impl InitIdiom for EntryOrDefault {
    fn name(&self) -> &'static str {
        "entry_or_default"
    }

    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        d.entry(k1.to_owned())
            .or_default()
            .insert(k2.to_owned(), v.to_owned());
    }
}

/// Negative membership guard, then an unconditional second lookup for the
/// inner write.
pub struct ContainsThenInsert;

impl InitIdiom for ContainsThenInsert {
    fn name(&self) -> &'static str {
        "contains_then_insert"
    }

    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        if !d.contains_key(k1) {
            d.insert(k1.to_owned(), InnerMap::new());
        }
        d.get_mut(k1)
            .expect("outer key ensured above")
            .insert(k2.to_owned(), v.to_owned());
    }
}

/// Positive membership branch: indexed write on hit, whole-entry insert on
/// miss.
pub struct ContainsElse;

impl InitIdiom for ContainsElse {
    fn name(&self) -> &'static str {
        "contains_else"
    }

    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        if d.contains_key(k1) {
            d.get_mut(k1)
                .expect("outer key present")
                .insert(k2.to_owned(), v.to_owned());
        } else {
            d.insert(
                k1.to_owned(),
                InnerMap::from([(k2.to_owned(), v.to_owned())]),
            );
        }
    }
}

/// Single lookup, branch on the returned `Option`.
pub struct GetMut;

impl InitIdiom for GetMut {
    fn name(&self) -> &'static str {
        "get_mut"
    }

    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        match d.get_mut(k1) {
            Some(inner) => {
                inner.insert(k2.to_owned(), v.to_owned());
            }
            None => {
                d.insert(
                    k1.to_owned(),
                    InnerMap::from([(k2.to_owned(), v.to_owned())]),
                );
            }
        }
    }
}

/// Miss-as-unwind: attempt the nested write through a panicking lookup and
/// recover on the unwind path.
pub struct CatchUnwind;

impl InitIdiom for CatchUnwind {
    fn name(&self) -> &'static str {
        "catch_unwind"
    }

    fn measure(&self, d: &mut FixtureMap, k1: &str, k2: &str, v: &str) {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            d.get_mut(k1)
                .expect("outer key missing")
                .insert(k2.to_owned(), v.to_owned());
        }));
        if attempt.is_err() {
            d.insert(
                k1.to_owned(),
                InnerMap::from([(k2.to_owned(), v.to_owned())]),
            );
        }
    }

    fn quiet_unwind(&self) -> bool {
        true
    }
}

/// All idioms in declaration order, optionally narrowed to a single one.
/// The first entry of the full set is the normalization baseline.
pub fn registry(select: IdiomSelect) -> Vec<Box<dyn InitIdiom>> {
    let mut idioms: Vec<Box<dyn InitIdiom>> = vec![
        Box::new(EntryOrInsert),
        Box::new(EntryOrDefault),
        Box::new(ContainsThenInsert),
        Box::new(ContainsElse),
        Box::new(GetMut),
        Box::new(CatchUnwind),
    ];
    if let Some(name) = selected_name(select) {
        idioms.retain(|idiom| idiom.name() == name);
    }
    idioms
}

fn selected_name(select: IdiomSelect) -> Option<&'static str> {
    match select {
        IdiomSelect::All => None,
        IdiomSelect::EntryOrInsert => Some("entry_or_insert"),
        IdiomSelect::EntryOrDefault => Some("entry_or_default"),
        IdiomSelect::ContainsThenInsert => Some("contains_then_insert"),
        IdiomSelect::ContainsElse => Some("contains_else"),
        IdiomSelect::GetMut => Some("get_mut"),
        IdiomSelect::CatchUnwind => Some("catch_unwind"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, FixtureConfig, INNER_KEY, VALUE};
    use crate::harness::PanicSilence;

    const TEST_KEYS: usize = 16;

    fn small_fixture() -> FixtureMap {
        fixture::build(&FixtureConfig { keys: TEST_KEYS })
    }

    fn written_inner() -> InnerMap {
        InnerMap::from([(INNER_KEY.to_owned(), VALUE.to_owned())])
    }

    /// Run an idiom the way the runner does, asserting the per-iteration
    /// setup actually establishes the condition.
    fn drive(idiom: &dyn InitIdiom, exists: bool, repeat: u64) -> FixtureMap {
        let fixture = small_fixture();
        let mut d = idiom.init_once(&fixture);
        let _quiet = idiom.quiet_unwind().then(PanicSilence::install);
        for _ in 0..repeat {
            idiom.init_each(&mut d, exists);
            if !exists {
                assert!(
                    !d.contains_key(OUTER_KEY),
                    "{}: setup must clear the outer key",
                    idiom.name()
                );
            }
            idiom.measure(&mut d, OUTER_KEY, INNER_KEY, VALUE);
        }
        d
    }

    #[test]
    fn registry_declaration_order_is_stable() {
        let names: Vec<_> = registry(IdiomSelect::All)
            .iter()
            .map(|i| i.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "entry_or_insert",
                "entry_or_default",
                "contains_then_insert",
                "contains_else",
                "get_mut",
                "catch_unwind",
            ]
        );
    }

    #[test]
    fn registry_narrows_to_one_idiom() {
        let only = registry(IdiomSelect::GetMut);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name(), "get_mut");
    }

    #[test]
    fn only_the_unwinding_idiom_asks_for_silence() {
        for idiom in registry(IdiomSelect::All) {
            assert_eq!(idiom.quiet_unwind(), idiom.name() == "catch_unwind");
        }
    }

    #[test]
    fn every_idiom_converges_with_outer_key_present() {
        for idiom in registry(IdiomSelect::All) {
            let d = drive(idiom.as_ref(), true, 3);
            assert_eq!(d.len(), TEST_KEYS, "{}: no key leak", idiom.name());
            assert_eq!(d[OUTER_KEY], written_inner(), "{}", idiom.name());
        }
    }

    #[test]
    fn every_idiom_converges_with_outer_key_absent() {
        for idiom in registry(IdiomSelect::All) {
            let d = drive(idiom.as_ref(), false, 3);
            assert_eq!(d.len(), TEST_KEYS, "{}: no key leak", idiom.name());
            assert_eq!(d[OUTER_KEY], written_inner(), "{}", idiom.name());
        }
    }

    #[test]
    fn hit_path_preserves_inner_map_identity() {
        // A pre-existing inner entry must survive the write: the inner map
        // is extended in place, not replaced.
        for idiom in registry(IdiomSelect::All) {
            let mut d = small_fixture();
            d.get_mut(OUTER_KEY)
                .unwrap()
                .insert("sentinel".to_owned(), "s".to_owned());

            idiom.measure(&mut d, OUTER_KEY, INNER_KEY, VALUE);

            let inner = &d[OUTER_KEY];
            assert_eq!(inner.len(), 2, "{}", idiom.name());
            assert_eq!(inner["sentinel"], "s", "{}", idiom.name());
            assert_eq!(inner[INNER_KEY], VALUE, "{}", idiom.name());
        }
    }

    #[test]
    fn miss_path_installs_exactly_the_written_entry() {
        for idiom in registry(IdiomSelect::All) {
            let mut d = small_fixture();
            d.remove(OUTER_KEY);
            let _quiet = idiom.quiet_unwind().then(PanicSilence::install);

            idiom.measure(&mut d, OUTER_KEY, INNER_KEY, VALUE);

            assert_eq!(d.len(), TEST_KEYS, "{}", idiom.name());
            assert_eq!(d[OUTER_KEY], written_inner(), "{}", idiom.name());
        }
    }

    #[test]
    fn init_once_leaves_the_template_untouched() {
        let fixture = small_fixture();
        let idiom = EntryOrDefault;
        let mut d = idiom.init_once(&fixture);
        idiom.measure(&mut d, OUTER_KEY, INNER_KEY, VALUE);
        assert!(fixture[OUTER_KEY].is_empty());
        assert_eq!(d[OUTER_KEY], written_inner());
    }
}
