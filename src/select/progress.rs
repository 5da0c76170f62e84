//! Progress reporting for selection passes.
//!
//! A selection pass runs in a fixed number of stages. Callers pass a
//! [`Progress`] to receive `(current, total, message)` updates, e.g. to drive
//! a terminal progress bar.
//!
//! # Example
//!
//! ```
//! use volsel::select::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(1, 4, "Finding loose parts");
//! ```

/// Resolution of a stage when it reports partial completion.
const STAGE_STEPS: usize = 1000;

/// A progress callback for selection passes.
///
/// `current` never exceeds `total`. A pass ends with `current == total`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap a `(current, total, message)` callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report that `stage` of `stages` is starting.
    #[inline]
    pub fn report(&self, stage: usize, stages: usize, message: &str) {
        (self.callback)(stage.min(stages), stages, message);
    }

    /// Report that `done` of `of` items of `stage` are finished.
    ///
    /// The update lands between `stage` and `stage + 1`, on a scale of
    /// `stages * 1000`. Nothing is reported when `of` or `stages` is zero.
    pub fn report_within(
        &self,
        stage: usize,
        stages: usize,
        done: usize,
        of: usize,
        message: &str,
    ) {
        if of == 0 || stages == 0 {
            return;
        }
        let fraction = done.min(of) * STAGE_STEPS / of;
        let current = (stage * STAGE_STEPS + fraction).min(stages * STAGE_STEPS);
        (self.callback)(current, stages * STAGE_STEPS, message);
    }

    /// A reporter that drops every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Progress, Arc<Mutex<Vec<(usize, usize)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |c, t, _| sink.lock().unwrap().push((c, t)));
        (progress, seen)
    }

    #[test]
    fn test_report_within_scales_into_stage() {
        let (progress, seen) = recorder();

        progress.report_within(1, 4, 5, 10, "half of stage 1");
        progress.report_within(3, 4, 3, 3, "end of last stage");
        progress.report_within(1, 4, 1, 0, "ignored");

        assert_eq!(*seen.lock().unwrap(), vec![(1500, 4000), (4000, 4000)]);
    }

    #[test]
    fn test_report_clamps_to_total() {
        let (progress, seen) = recorder();
        progress.report(7, 4, "past the end");
        assert_eq!(*seen.lock().unwrap(), vec![(4, 4)]);
    }
}
