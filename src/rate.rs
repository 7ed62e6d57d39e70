//! Call-site rate limits for log statements.
//!
//! Each macro expansion owns its own counter. Counters never block; racing
//! threads may disagree on which of them emits, but the configured bound
//! holds.

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

lazy_static! {
    static ref PROCESS_START: Instant = Instant::now();
}

fn elapsed_ms() -> u64 {
    PROCESS_START.elapsed().as_millis() as u64
}

/// Occurrence counter for `first_n` / `every_n` limits.
#[derive(Debug, Default)]
pub struct Occurrences {
    seen: AtomicU64,
}

impl Occurrences {
    /// A counter with no recorded occurrences.
    pub const fn new() -> Self {
        Self {
            seen: AtomicU64::new(0),
        }
    }

    #[cfg(test)]
    fn with_seen(seen: u64) -> Self {
        Self {
            seen: AtomicU64::new(seen),
        }
    }

    /// True for the first `n` occurrences only.
    #[inline]
    pub fn first_n(&self, n: usize) -> bool {
        let n = n as u64;
        if self.seen.load(Ordering::Relaxed) >= n {
            return false;
        }
        self.seen.fetch_add(1, Ordering::Relaxed) < n
    }

    /// True on occurrences 1, n+1, 2n+1 and so on. `n == 0` always emits.
    #[inline]
    pub fn every_n(&self, n: usize) -> bool {
        let seen = self.seen.fetch_add(1, Ordering::Relaxed);
        n == 0 || seen % n as u64 == 0
    }
}

/// Last-emit timestamp for `every_ms` limits.
#[derive(Debug, Default)]
pub struct Interval {
    // Milliseconds since process start, plus one; zero means never emitted.
    last: AtomicU64,
}

impl Interval {
    /// An interval that has never emitted.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// True at most once per `period_ms` window.
    pub fn ready(&self, period_ms: u64) -> bool {
        self.ready_at(elapsed_ms() + 1, period_ms)
    }

    fn ready_at(&self, now: u64, period_ms: u64) -> bool {
        let last = self.last.load(Ordering::Relaxed);
        if last != 0 && now.saturating_sub(last) < period_ms {
            return false;
        }
        self.last
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}

/// Log only for the first `n` times this statement runs.
#[macro_export]
macro_rules! log_first_n {
    ($lvl:expr, $n:expr, $($arg:tt)+) => {{
        static __VIGIL_SITE: $crate::rate::Occurrences = $crate::rate::Occurrences::new();
        if __VIGIL_SITE.first_n($n) {
            $crate::__log::log!($lvl, $($arg)+);
        }
    }};
}

/// Log once every `n` times this statement runs, starting with the first.
#[macro_export]
macro_rules! log_every_n {
    ($lvl:expr, $n:expr, $($arg:tt)+) => {{
        static __VIGIL_SITE: $crate::rate::Occurrences = $crate::rate::Occurrences::new();
        if __VIGIL_SITE.every_n($n) {
            $crate::__log::log!($lvl, $($arg)+);
        }
    }};
}

/// Log at most once per `ms` milliseconds from this statement.
#[macro_export]
macro_rules! log_every_ms {
    ($lvl:expr, $ms:expr, $($arg:tt)+) => {{
        static __VIGIL_SITE: $crate::rate::Interval = $crate::rate::Interval::new();
        if __VIGIL_SITE.ready($ms) {
            $crate::__log::log!($lvl, $($arg)+);
        }
    }};
}
