//! Time measurement for per-frame maintenance work

use std::time::{Duration, Instant};

/// Simple stopwatch for measuring elapsed time
#[derive(Debug)]
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start (or resume) the stopwatch
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time, including the running segment
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Rolling min/max/mean of frame-level durations
#[derive(Debug, Clone, Default)]
pub struct FrameTimings {
    samples: u64,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
}

impl FrameTimings {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame's duration
    pub fn record(&mut self, sample: Duration) {
        self.samples += 1;
        self.total += sample;
        self.min = Some(self.min.map_or(sample, |min| min.min(sample)));
        self.max = self.max.max(sample);
    }

    /// Number of recorded frames
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Shortest recorded frame, zero when empty
    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    /// Longest recorded frame
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Mean frame duration, zero when empty
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.samples) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total / n,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.samples as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_accumulates_only_while_running() {
        let mut stopwatch = Stopwatch::new();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);

        stopwatch.start();
        assert!(stopwatch.is_running());
        stopwatch.stop();

        let stopped = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), stopped);
    }

    #[test]
    fn test_frame_timings_statistics() {
        let mut timings = FrameTimings::new();
        assert_eq!(timings.mean(), Duration::ZERO);
        assert_eq!(timings.min(), Duration::ZERO);

        timings.record(Duration::from_millis(2));
        timings.record(Duration::from_millis(4));
        timings.record(Duration::from_millis(6));

        assert_eq!(timings.samples(), 3);
        assert_eq!(timings.min(), Duration::from_millis(2));
        assert_eq!(timings.max(), Duration::from_millis(6));
        assert_eq!(timings.mean(), Duration::from_millis(4));
    }
}
