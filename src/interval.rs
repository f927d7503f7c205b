//! Fixed-rate pacer for the simulation thread

use std::time::{Duration, Instant};

/// Keeps the simulation thread on a fixed cadence. Each step waits for the
/// next deadline; a step that starts late moves the deadline up to the
/// current instant (less `max_lag`) rather than ticking in a burst.
pub struct Interval {
    deadline: Instant,
    period: Duration,
    max_lag: Duration,
}

impl Interval {
    pub fn new(period: Duration, max_lag: Duration) -> Self {
        Self {
            deadline: Instant::now(),
            period,
            max_lag,
        }
    }

    /// Pacer for `rate` steps per second with no catch-up. A rate whose
    /// period is not representable falls back to one step per second.
    pub fn per_second(rate: f64) -> Self {
        let period = Duration::try_from_secs_f64(1.0 / rate).unwrap_or_else(|_| {
            log::warn!("Unusable step rate {rate}, pacing at 1 step/sec");
            Duration::from_secs(1)
        });
        Self::new(period, Duration::ZERO)
    }

    pub fn target_interval(&self) -> Duration {
        self.period
    }

    /// Sleep until the next deadline
    pub fn step(&mut self) {
        self.deadline += self.period;
        let now = Instant::now();

        match self.deadline.checked_duration_since(now) {
            Some(wait) => std::thread::sleep(wait),
            None => {
                let late = now.saturating_duration_since(self.deadline);
                if late > self.max_lag {
                    log::trace!("Step {}us late, rescheduling", late.as_micros());
                    self.deadline = now - self.max_lag;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_paced() {
        let mut interval = Interval::new(Duration::from_millis(5), Duration::ZERO);
        let start = Instant::now();
        for _ in 0..4 {
            interval.step();
        }
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_late_step_does_not_catch_up() {
        let mut interval = Interval::new(Duration::from_millis(5), Duration::ZERO);
        std::thread::sleep(Duration::from_millis(30));

        // Schedule resets to now, so the next step still waits a full interval
        interval.step();
        let start = Instant::now();
        interval.step();
        assert!(start.elapsed() >= Duration::from_millis(4));
    }

    #[test]
    fn test_per_second() {
        let interval = Interval::per_second(60.0);
        let target = interval.target_interval().as_secs_f64();
        assert!((target - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_second_degenerate_rate() {
        for rate in [1e-30, 0.0, -5.0, f64::NAN] {
            let interval = Interval::per_second(rate);
            assert_eq!(interval.target_interval(), Duration::from_secs(1));
        }
    }
}
