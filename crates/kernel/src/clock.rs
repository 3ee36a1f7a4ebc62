use std::time::{Duration, Instant};

/// Gates work to a target rate by accumulating elapsed time.
///
/// With a rate of zero every call ticks and reports the raw elapsed time.
/// Otherwise elapsed time accumulates until it reaches one period, at which
/// point the whole accumulated sum is reported and the accumulator resets.
#[derive(Debug, Clone)]
pub struct FrameClock {
    rate: f64,
    period: Option<Duration>,
    accumulated: Duration,
    last: Option<Instant>,
    ticks: u64,
}

impl FrameClock {
    /// `rate` is in Hz; zero or negative means uncapped.
    pub fn new(rate: f64) -> Self {
        let period = (rate > 0.0).then(|| Duration::from_nanos((1e9 / rate).round() as u64));
        Self {
            rate: rate.max(0.0),
            period,
            accumulated: Duration::ZERO,
            last: None,
            ticks: 0,
        }
    }

    pub fn uncapped() -> Self {
        Self::new(0.0)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Target interval between ticks, `None` when uncapped.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Time gathered since the last tick.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Number of ticks reported so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Measures wall time since the previous call and feeds it to
    /// [`FrameClock::advance`]. The first call measures zero.
    pub fn tick(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let elapsed = self
            .last
            .replace(now)
            .map_or(Duration::ZERO, |previous| now.saturating_duration_since(previous));
        self.advance(elapsed)
    }

    /// Adds `elapsed` and returns the delta to simulate if the clock ticked.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Duration> {
        let Some(period) = self.period else {
            self.ticks += 1;
            return Some(elapsed);
        };

        self.accumulated += elapsed;
        if self.accumulated < period {
            return None;
        }

        let delta = std::mem::take(&mut self.accumulated);
        self.ticks += 1;
        tracing::trace!(rate = self.rate, delta_ms = delta.as_secs_f64() * 1000.0, "clock tick");
        Some(delta)
    }

    /// Drops accumulated time and forgets the last wall-clock sample.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn uncapped_reports_every_call() {
        let mut clock = FrameClock::uncapped();
        assert_eq!(clock.period(), None);
        assert_eq!(clock.advance(ms(3)), Some(ms(3)));
        assert_eq!(clock.advance(Duration::ZERO), Some(Duration::ZERO));
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn accumulates_until_one_period() {
        let mut clock = FrameClock::new(10.0);
        assert_eq!(clock.period(), Some(ms(100)));

        assert_eq!(clock.advance(ms(30)), None);
        assert_eq!(clock.advance(ms(30)), None);
        assert_eq!(clock.advance(ms(39)), None);
        assert_eq!(clock.accumulated(), ms(99));

        assert_eq!(clock.advance(ms(1)), Some(ms(100)));
        assert_eq!(clock.accumulated(), Duration::ZERO);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn reports_the_whole_overshoot() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(ms(90));
        assert_eq!(clock.advance(ms(45)), Some(ms(135)));
        assert_eq!(clock.advance(ms(50)), None);
    }

    #[test]
    fn negative_rate_is_uncapped() {
        let clock = FrameClock::new(-5.0);
        assert_eq!(clock.rate(), 0.0);
        assert!(clock.period().is_none());
    }

    #[test]
    fn wall_clock_first_tick_measures_zero() {
        let mut clock = FrameClock::uncapped();
        assert_eq!(clock.tick(), Some(Duration::ZERO));
        assert!(clock.tick().is_some());
    }

    #[test]
    fn reset_drops_accumulated_time() {
        let mut clock = FrameClock::new(10.0);
        clock.advance(ms(80));
        clock.reset();
        assert_eq!(clock.advance(ms(30)), None);
        assert_eq!(clock.accumulated(), ms(30));
    }
}
