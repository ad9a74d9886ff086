//! Progress reporting contract.

/// Receives coarse progress for one run and may ask it to stop.
///
/// A run calls `begin_task` once, `worked` after each target, and `done`
/// once on every exit path. `is_cancelled` is polled before each target.
pub trait ProgressReporter {
    fn begin_task(&mut self, total_units: u64);

    fn worked(&mut self, units: u64);

    fn is_cancelled(&self) -> bool {
        false
    }

    fn done(&mut self);
}

/// Reporter that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn begin_task(&mut self, _total_units: u64) {}

    fn worked(&mut self, _units: u64) {}

    fn done(&mut self) {}
}

/// Splits a total amount of work across a fixed number of steps.
///
/// After step `i` of `n` the cumulative amount reported is
/// `total * i / n`, so the deltas never decrease the running sum and add
/// up to exactly `total` once every step has been taken.
#[derive(Debug, Clone)]
pub struct WorkMeter {
    total: u64,
    steps: u64,
    taken: u64,
    reported: u64,
}

impl WorkMeter {
    pub fn new(total: u64, steps: usize) -> Self {
        Self {
            total,
            steps: steps as u64,
            taken: 0,
            reported: 0,
        }
    }

    /// Take one step and return the units to report for it.
    pub fn step(&mut self) -> u64 {
        if self.taken >= self.steps {
            return 0;
        }
        self.taken += 1;
        // Widened so any caller-supplied total scales without overflow
        let cumulative =
            (u128::from(self.total) * u128::from(self.taken) / u128::from(self.steps)) as u64;
        let delta = cumulative - self.reported;
        self.reported = cumulative;
        delta
    }

    /// Units reported so far.
    pub fn reported(&self) -> u64 {
        self.reported
    }
}
