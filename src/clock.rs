//! Step bookkeeping for the simulation.
//!
//! The simulation advances by whatever time step the caller hands it; it
//! never reads the wall clock to decide how far to move. [`SimulationClock`]
//! only records what happened: how many steps ran, how much simulated time
//! has passed and how long the last step took in real time.
//!
//! Rate limiting belongs to the driving loop. [`StepThrottle`] is a helper
//! for that loop and is never consulted by the simulation itself.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//!
//! let mut throttle = StepThrottle::new(60.0);
//! loop {
//!     if throttle.should_step(Instant::now()) {
//!         sim.tick();
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Step counter and timing for one simulation run.
#[derive(Clone, Debug, Default)]
pub struct SimulationClock {
    /// Steps completed since the last reseed.
    step_count: u64,
    /// Sum of every completed step's time step, in seconds.
    simulated_time: f32,
    /// Wall-clock duration of the most recent step.
    last_step_duration: Duration,
    /// Whether steps are currently ignored.
    paused: bool,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a step. Pair with [`finish_step`](Self::finish_step).
    #[inline]
    pub fn begin_step(&self) -> Instant {
        Instant::now()
    }

    /// Record a completed step of length `dt` that began at `started`.
    pub fn finish_step(&mut self, started: Instant, dt: f32) {
        self.last_step_duration = started.elapsed();
        self.step_count += 1;
        self.simulated_time += dt;
    }

    /// Steps completed since the last reset.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Simulated seconds since the last reset.
    #[inline]
    pub fn simulated_time(&self) -> f32 {
        self.simulated_time
    }

    /// Real time spent in the most recent step.
    #[inline]
    pub fn last_step_duration(&self) -> Duration {
        self.last_step_duration
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Zero the counters. The pause state is kept.
    pub fn reset(&mut self) {
        self.step_count = 0;
        self.simulated_time = 0.0;
        self.last_step_duration = Duration::ZERO;
    }
}

/// Limits how often a driving loop steps the simulation.
#[derive(Clone, Debug)]
pub struct StepThrottle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl StepThrottle {
    /// Allow at most `max_hz` steps per second.
    ///
    /// A non-positive or non-finite rate disables throttling.
    pub fn new(max_hz: f32) -> Self {
        let min_interval = if max_hz.is_finite() && max_hz > 0.0 {
            Duration::from_secs_f32(1.0 / max_hz)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last: None,
        }
    }

    #[inline]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether a step may run at `now`. Records `now` when it returns true.
    pub fn should_step(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }

    /// Forget the last step so the next check passes immediately.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
