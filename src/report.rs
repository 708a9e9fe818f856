use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub keys: usize,
    pub repeat: u64,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

/// Raw timing for one case, kept in declaration order until ranking.
#[derive(Debug, Clone)]
pub struct CaseTiming {
    pub name: String,
    pub seconds: f64,
    pub iters: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub seconds: f64,
    pub speedup_pct: i64,
    pub iters: u64,
}

/// One ranked table: results sorted ascending by elapsed seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionReport {
    pub label: String,
    pub exists: bool,
    pub baseline_seconds: f64,
    pub results: Vec<CaseResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub conditions: Vec<ConditionReport>,
}

/// Percentage saved relative to the baseline, rounded half away from zero.
pub fn speedup_pct(baseline: f64, seconds: f64) -> i64 {
    if baseline <= 0.0 {
        return 0;
    }
    (100.0 * (baseline - seconds) / baseline).round() as i64
}

/// Rank timings fastest-first. The first timing in declaration order is the
/// normalization baseline for the speedup column, whatever its rank.
pub fn rank(label: String, exists: bool, timings: Vec<CaseTiming>) -> ConditionReport {
    let baseline_seconds = timings.first().map(|t| t.seconds).unwrap_or(0.0);
    let mut results: Vec<CaseResult> = timings
        .into_iter()
        .map(|t| CaseResult {
            speedup_pct: speedup_pct(baseline_seconds, t.seconds),
            name: t.name,
            seconds: t.seconds,
            iters: t.iters,
        })
        .collect();
    results.sort_by(|a, b| a.seconds.total_cmp(&b.seconds));
    ConditionReport {
        label,
        exists,
        baseline_seconds,
        results,
    }
}

/// Render one ranked table: a separating blank line, the condition label,
/// the column header, then one row per case.
pub fn render_table(report: &ConditionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}:", report.label);
    let _ = writeln!(out, "speedup   seconds  option");
    for case in &report.results {
        let _ = writeln!(
            out,
            "{:>6}%  {:.6}  {}",
            case.speedup_pct, case.seconds, case.name
        );
    }
    out
}
