use std::time::{Duration, Instant};

/// Instrumentation of the most recent `search`.
///
/// `comparisons` counts one step per visited level, plus one for the empty
/// subtree a miss ends on, so a miss on a chain of `n` nodes reports `n + 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    comparisons: u64,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl SearchStats {
    pub(crate) fn begin(&mut self) {
        self.comparisons = 0;
        self.started = Some(Instant::now());
        self.finished = None;
    }

    #[inline]
    pub(crate) fn tick(&mut self) {
        self.comparisons += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.finished = Some(Instant::now());
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished
    }

    /// Wall-clock duration of the last search, zero if none completed.
    pub fn elapsed(&self) -> Duration {
        match (self.started, self.finished) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// [`elapsed`](Self::elapsed) in fractional milliseconds, sub-millisecond
    /// precision included.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::SearchStats;
    use std::time::Duration;

    #[test]
    fn fresh_stats_are_zero() {
        let stats = SearchStats::default();
        assert_eq!(stats.comparisons(), 0);
        assert_eq!(stats.elapsed(), Duration::ZERO);
        assert_eq!(stats.elapsed_time(), 0.0);
        assert!(stats.started_at().is_none());
    }

    #[test]
    fn begin_resets_counter() {
        let mut stats = SearchStats::default();
        stats.begin();
        stats.tick();
        stats.tick();
        stats.finish();
        assert_eq!(stats.comparisons(), 2);

        stats.begin();
        assert_eq!(stats.comparisons(), 0);
        assert!(stats.finished_at().is_none());
        assert_eq!(stats.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_spans_begin_to_finish() {
        let mut stats = SearchStats::default();
        stats.begin();
        std::thread::sleep(Duration::from_millis(2));
        stats.finish();
        assert!(stats.elapsed() >= Duration::from_millis(2));
        assert!(stats.elapsed_time() >= 2.0);
        assert!(stats.finished_at() >= stats.started_at());
    }
}
