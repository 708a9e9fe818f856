use std::hint::black_box;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn default_keys(&self) -> usize {
        match self {
            Profile::Quick => 10_000,
            Profile::Full => 1_000_000,
        }
    }

    pub fn default_repeat(&self) -> u64 {
        match self {
            Profile::Quick => 10_000,
            Profile::Full => 1_000_000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub keys: usize,
    pub repeat: u64,
}

impl BenchConfig {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            keys: profile.default_keys(),
            repeat: profile.default_repeat(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Measured {
    pub iters: u64,
    pub total_ns: u128,
}

impl Measured {
    pub fn seconds(&self) -> f64 {
        (self.total_ns as f64) / 1e9
    }
}

/// Timed loop with an untimed per-iteration setup phase. Only the time spent
/// inside `routine` is accumulated.
pub fn measure_with_setup<T>(
    iters: u64,
    state: &mut T,
    mut setup: impl FnMut(&mut T),
    mut routine: impl FnMut(&mut T),
) -> Measured {
    let mut total = Duration::ZERO;
    for _ in 0..iters {
        setup(state);
        let start = Instant::now();
        routine(state);
        total += start.elapsed();
        black_box(&mut *state);
    }
    Measured {
        iters,
        total_ns: total.as_nanos(),
    }
}

/// Holding pen for values whose deallocation must stay out of the measured
/// region. Everything deferred is freed when the bin goes out of scope,
/// on all exit paths.
pub struct DropBin<T> {
    deferred: Vec<T>,
}

impl<T> DropBin<T> {
    pub fn new() -> Self {
        Self {
            deferred: Vec::new(),
        }
    }

    pub fn defer(&mut self, value: T) {
        self.deferred.push(value);
    }

    pub fn len(&self) -> usize {
        self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty()
    }
}

impl<T> Default for DropBin<T> {
    fn default() -> Self {
        Self::new()
    }
}

type Hook = Box<dyn Fn(&std::panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Swaps in a no-op panic hook so unwinds caught inside a measured routine do
/// not spam stderr. The previous hook is restored when the guard drops.
pub struct PanicSilence {
    prev: Option<Hook>,
}

impl PanicSilence {
    pub fn install() -> Self {
        let prev = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));
        Self { prev: Some(prev) }
    }
}

impl Drop for PanicSilence {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            // set_hook is not callable from an unwinding thread; a fatal
            // panic is aborting the run anyway.
            if !std::thread::panicking() {
                std::panic::set_hook(prev);
            }
        }
    }
}
