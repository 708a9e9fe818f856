use clap::{Parser, ValueEnum};
use nested_init_bench::harness::{BenchConfig, Profile};
use nested_init_bench::report::{render_table, BenchReport, RunMeta};
use nested_init_bench::{fixture, idioms, runner, IdiomSelect};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nested-init-bench")]
#[command(about = "Ranked timing comparison of nested map entry-initialization idioms")]
struct Args {
    /// Measurement scale: full is the 1M-key / 1M-iteration comparison,
    /// quick is a 10K/10K smoke run.
    #[arg(long, value_enum, default_value_t = ProfileArg::Full)]
    profile: ProfileArg,

    /// Override the fixture size (outer key count) of the chosen profile.
    #[arg(long)]
    keys: Option<usize>,

    /// Override the per-case iteration count of the chosen profile.
    #[arg(long)]
    repeat: Option<u64>,

    /// Which idiom(s) to run.
    #[arg(long, value_enum, default_value_t = IdiomSelect::All)]
    idiom: IdiomSelect,

    /// Where to write a JSON report of the run. The ranked tables always
    /// print to stdout.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

fn now_utc() -> String {
    // Unix-seconds stamp; keeps chrono out of the dependency tree.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Best-effort: read from environment set by CI/build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = BenchConfig::for_profile(args.profile.into());
    if let Some(keys) = args.keys {
        cfg.keys = keys;
    }
    if let Some(repeat) = args.repeat {
        cfg.repeat = repeat;
    }

    eprintln!("building fixture ({} outer keys)...", cfg.keys);
    let fixture = fixture::build(&fixture::FixtureConfig { keys: cfg.keys });
    let idioms = idioms::registry(args.idiom);

    let mut conditions = Vec::new();
    for condition in runner::CONDITIONS {
        eprintln!(
            "{}: running {} case(s) x {} iterations...",
            condition.label(),
            idioms.len(),
            cfg.repeat
        );
        let table = runner::run_condition(&cfg, &idioms, &fixture, condition);
        print!("{}", render_table(&table));
        conditions.push(table);
    }

    if let Some(out) = args.out {
        let report = BenchReport {
            run: RunMeta {
                schema_version: 1,
                bench_version: env!("CARGO_PKG_VERSION").to_string(),
                profile: cfg.profile.as_str().to_string(),
                keys: cfg.keys,
                repeat: cfg.repeat,
                timestamp_utc: now_utc(),
                git_sha: git_sha_short(),
            },
            conditions,
        };
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        fs::write(out, json)?;
    }

    Ok(())
}
