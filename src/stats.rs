// src/stats.rs
use std::time::{Duration, Instant};

/// What a single message triggered, if anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    /// Cumulative message count, set when it hit a multiple of the report interval.
    pub count_report: Option<u64>,
    /// Messages seen in the rate window that just closed.
    pub rate_report: Option<RateReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReport {
    pub messages: u64,
    pub elapsed: Duration,
}

/// Message counters for one monitor.
///
/// Totals live for the whole process. The rate window and the session
/// counters are reset by [`ThroughputStats::begin_session`].
#[derive(Debug, Clone)]
pub struct ThroughputStats {
    report_every: u64,
    rate_interval: Duration,
    total_messages: u64,
    total_bytes: u64,
    window_messages: u64,
    window_start: Instant,
    session_messages: u64,
    session_bytes: u64,
}

impl ThroughputStats {
    /// `report_every` must be non-zero; config validation guarantees it.
    pub fn new(report_every: u64, rate_interval: Duration, now: Instant) -> Self {
        ThroughputStats {
            report_every: report_every.max(1),
            rate_interval,
            total_messages: 0,
            total_bytes: 0,
            window_messages: 0,
            window_start: now,
            session_messages: 0,
            session_bytes: 0,
        }
    }

    pub fn begin_session(&mut self, now: Instant) {
        self.window_messages = 0;
        self.window_start = now;
        self.session_messages = 0;
        self.session_bytes = 0;
    }

    /// Counts one message of `len` bytes received at `now`.
    pub fn record(&mut self, len: usize, now: Instant) -> Observation {
        self.total_messages += 1;
        self.window_messages += 1;
        self.session_messages += 1;
        self.total_bytes += len as u64;
        self.session_bytes += len as u64;

        let mut observation = Observation::default();

        if self.total_messages % self.report_every == 0 {
            observation.count_report = Some(self.total_messages);
        }

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.rate_interval {
            observation.rate_report = Some(RateReport {
                messages: self.window_messages,
                elapsed,
            });
            self.window_messages = 0;
            self.window_start = now;
        }

        observation
    }

    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn window_messages(&self) -> u64 {
        self.window_messages
    }

    pub fn window_start(&self) -> Instant {
        self.window_start
    }

    pub fn session_messages(&self) -> u64 {
        self.session_messages
    }

    pub fn session_bytes(&self) -> u64 {
        self.session_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(report_every: u64) -> (ThroughputStats, Instant) {
        let start = Instant::now();
        (
            ThroughputStats::new(report_every, Duration::from_secs(1), start),
            start,
        )
    }

    #[test]
    fn counts_every_message() {
        let (mut stats, start) = stats(100);
        for _ in 0..737 {
            stats.record(10, start);
        }
        assert_eq!(stats.total_messages(), 737);
        assert_eq!(stats.total_bytes(), 7370);
    }

    #[test]
    fn count_report_fires_once_per_interval() {
        let (mut stats, start) = stats(100);
        let reports: Vec<u64> = (0..250)
            .filter_map(|_| stats.record(1, start).count_report)
            .collect();
        assert_eq!(reports, vec![100, 200]);
    }

    #[test]
    fn large_interval_reports_only_at_boundary() {
        let (mut stats, start) = stats(10_000);
        let reports = (0..10_050)
            .filter(|_| stats.record(1, start).count_report.is_some())
            .count();
        assert_eq!(reports, 1);
    }

    #[test]
    fn rate_window_resets_after_report() {
        let (mut stats, start) = stats(100);
        for _ in 0..41 {
            assert!(stats.record(1, start).rate_report.is_none());
        }
        assert_eq!(stats.window_messages(), 41);

        let later = start + Duration::from_millis(1000);
        let report = stats.record(1, later).rate_report.unwrap();
        assert_eq!(report.messages, 42);
        assert_eq!(report.elapsed, Duration::from_secs(1));
        assert_eq!(stats.window_messages(), 0);
        assert_eq!(stats.window_start(), later);
        assert_eq!(stats.total_messages(), 42);
    }

    #[test]
    fn rate_not_reported_before_interval() {
        let (mut stats, start) = stats(100);
        let almost = start + Duration::from_millis(999);
        assert!(stats.record(1, almost).rate_report.is_none());
        assert_eq!(stats.window_messages(), 1);
    }

    #[test]
    fn new_session_keeps_totals() {
        let (mut stats, start) = stats(100);
        for _ in 0..30 {
            stats.record(5, start);
        }
        let reconnect = start + Duration::from_millis(300);
        stats.begin_session(reconnect);

        assert_eq!(stats.total_messages(), 30);
        assert_eq!(stats.total_bytes(), 150);
        assert_eq!(stats.session_messages(), 0);
        assert_eq!(stats.session_bytes(), 0);
        assert_eq!(stats.window_messages(), 0);
        assert_eq!(stats.window_start(), reconnect);
    }
}
