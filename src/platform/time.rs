//! Fixed-timestep scheduling
//!
//! Elapsed wall-clock time is scaled by the logic rate and accumulated in
//! "ms-ticks": one tick costs one period (1000 at 60 ticks per 1000 ms).

use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    ticks_per_period: f64,
    period_ms: f64,
    max_ticks: u32,
    accumulator: f64,
    /// Timestamp of the previous frame; `None` right after (re)start
    last_ms: Option<f64>,
}

impl FixedTimestep {
    pub fn new(ticks_per_period: u32, period_ms: u32, max_ticks: u32) -> Self {
        let period_ms = f64::from(period_ms.max(1));
        Self {
            ticks_per_period: f64::from(ticks_per_period),
            period_ms,
            max_ticks: max_ticks.max(1),
            accumulator: period_ms / 2.0,
            last_ms: None,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.ticks_per_period,
            tuning.period_ms,
            tuning.max_ticks_per_frame,
        )
    }

    /// Reset timing state; the next frame has zero delta
    pub fn restart(&mut self) {
        self.accumulator = self.baseline();
        self.last_ms = None;
    }

    /// Number of ticks to run for a frame presented at `now_ms`
    pub fn drain(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.accumulator += delta * self.ticks_per_period;

        let mut ticks = 0;
        while self.accumulator >= self.period_ms && ticks < self.max_ticks {
            self.accumulator -= self.period_ms;
            ticks += 1;
        }

        if self.accumulator >= self.period_ms {
            let dropped = (self.accumulator / self.period_ms).floor();
            log::debug!("Frame stalled: discarding {} ticks of backlog", dropped);
            self.accumulator = self.baseline();
        }

        ticks
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    fn baseline(&self) -> f64 {
        self.period_ms / 2.0
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
