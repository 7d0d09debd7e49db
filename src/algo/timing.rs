//! Stage timing for multi-step operations.
//!
//! Algorithms never read a clock on their own account. Callers that want
//! timings hand in a [`TimingHook`], and each stage is run through
//! [`TimingHook::scope`], which measures it and reports the duration.
//!
//! # Example
//!
//! ```
//! use pare::algo::timing::TimingHook;
//!
//! let hook = TimingHook::new(|stage, elapsed| {
//!     println!("{}: {:.3} ms", stage, elapsed.as_secs_f64() * 1000.0);
//! });
//!
//! let answer = hook.scope("compute", || 6 * 7);
//! assert_eq!(answer, 42);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// A callback that receives the duration of each named stage.
pub struct TimingHook {
    callback: Box<dyn Fn(&str, Duration) + Send + Sync>,
}

impl TimingHook {
    /// Create a hook with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str, Duration) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A hook that logs every stage at debug level.
    pub fn log() -> Self {
        Self::new(|stage, elapsed| {
            log::debug!("{} took {:.3} ms", stage, elapsed.as_secs_f64() * 1000.0);
        })
    }

    /// Report a measured duration.
    #[inline]
    pub fn report(&self, stage: &str, elapsed: Duration) {
        (self.callback)(stage, elapsed);
    }

    /// Run `f`, report how long it took under `stage`, and return its result.
    pub fn scope<T>(&self, stage: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.report(stage, start.elapsed());
        result
    }
}

/// Run `f` under `hook` when one is given, otherwise just run it.
pub(crate) fn timed<T>(hook: Option<&TimingHook>, stage: &str, f: impl FnOnce() -> T) -> T {
    match hook {
        Some(hook) => hook.scope(stage, f),
        None => f(),
    }
}

impl fmt::Debug for TimingHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingHook").finish_non_exhaustive()
    }
}
