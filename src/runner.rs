use crate::fixture::{self, FixtureMap, INNER_KEY, OUTER_KEY, VALUE};
use crate::harness::{measure_with_setup, BenchConfig, DropBin, PanicSilence};
use crate::idioms::{self, InitIdiom};
use crate::report::{rank, CaseTiming, ConditionReport};
use crate::IdiomSelect;

/// One environment condition: whether the outer key is present before each
/// measured operation.
#[derive(Clone, Copy, Debug)]
pub struct Condition {
    pub exists: bool,
}

impl Condition {
    pub fn label(&self) -> String {
        format!("exists = {}", self.exists)
    }
}

/// Both conditions, in run order.
pub const CONDITIONS: [Condition; 2] = [
    Condition { exists: false },
    Condition { exists: true },
];

/// Run every given idiom once under one condition and rank the results.
///
/// Each case gets a fresh working copy of the fixture; timing covers only
/// the measured fragment, never the per-iteration setup.
pub fn run_condition(
    cfg: &BenchConfig,
    idioms: &[Box<dyn InitIdiom>],
    fixture: &FixtureMap,
    condition: Condition,
) -> ConditionReport {
    // Retired working copies park here so none of their deallocation runs
    // between measured cases; the bin empties when this scope exits.
    let mut retired = DropBin::new();
    let mut timings = Vec::with_capacity(idioms.len());

    for idiom in idioms {
        let repeat = idiom.repeat().unwrap_or(cfg.repeat);
        let mut d = idiom.init_once(fixture);
        let _quiet = idiom.quiet_unwind().then(PanicSilence::install);

        let measured = measure_with_setup(
            repeat,
            &mut d,
            |d| idiom.init_each(d, condition.exists),
            |d| idiom.measure(d, OUTER_KEY, INNER_KEY, VALUE),
        );

        retired.defer(d);
        timings.push(CaseTiming {
            name: idiom.name().to_owned(),
            seconds: measured.seconds(),
            iters: measured.iters,
        });
    }

    rank(condition.label(), condition.exists, timings)
}

/// Run the full comparison: every selected idiom under both conditions.
pub fn run(cfg: &BenchConfig, select: IdiomSelect) -> Vec<ConditionReport> {
    let fixture = fixture::build(&fixture::FixtureConfig { keys: cfg.keys });
    let idioms = idioms::registry(select);
    CONDITIONS
        .iter()
        .map(|&condition| run_condition(cfg, &idioms, &fixture, condition))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Profile;

    fn test_config() -> BenchConfig {
        BenchConfig {
            profile: Profile::Quick,
            keys: 64,
            repeat: 3,
        }
    }

    #[test]
    fn one_result_per_condition_and_case() {
        let reports = run(&test_config(), IdiomSelect::All);
        assert_eq!(reports.len(), 2);
        assert!(!reports[0].exists);
        assert!(reports[1].exists);
        assert_eq!(reports[0].label, "exists = false");
        assert_eq!(reports[1].label, "exists = true");

        for report in &reports {
            assert_eq!(report.results.len(), 6);
            let mut names: Vec<_> = report.results.iter().map(|r| r.name.clone()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), 6, "duplicate case in {}", report.label);
        }
    }

    #[test]
    fn results_are_sorted_fastest_first() {
        for report in run(&test_config(), IdiomSelect::All) {
            for pair in report.results.windows(2) {
                assert!(pair[0].seconds <= pair[1].seconds, "{}", report.label);
            }
        }
    }

    #[test]
    fn first_declared_case_is_the_baseline() {
        for report in run(&test_config(), IdiomSelect::All) {
            let baseline = report
                .results
                .iter()
                .find(|r| r.name == "entry_or_insert")
                .expect("baseline case present");
            assert_eq!(baseline.seconds, report.baseline_seconds);
            assert_eq!(baseline.speedup_pct, 0);
        }
    }

    #[test]
    fn narrowed_run_keeps_one_case_per_condition() {
        let reports = run(&test_config(), IdiomSelect::CatchUnwind);
        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert_eq!(report.results.len(), 1);
            assert_eq!(report.results[0].name, "catch_unwind");
            assert_eq!(report.results[0].speedup_pct, 0);
            assert_eq!(report.results[0].iters, 3);
        }
    }
}
