use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Running totals since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub cycles: usize,
    pub sent: usize,
    pub suppressed: usize,
    pub skipped: usize,
    pub send_failures: usize,
    pub unavailable: usize,
    pub ownship_missing: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Metrics)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_cycle(&self) {
        self.update(|m| m.cycles += 1);
    }

    pub fn record_sent(&self) {
        self.update(|m| m.sent += 1);
    }

    pub fn record_suppressed(&self) {
        self.update(|m| m.suppressed += 1);
    }

    pub fn record_skipped(&self) {
        self.update(|m| m.skipped += 1);
    }

    pub fn record_send_failure(&self) {
        self.update(|m| m.send_failures += 1);
    }

    pub fn record_unavailable(&self) {
        self.update(|m| m.unavailable += 1);
    }

    pub fn record_ownship_missing(&self) {
        self.update(|m| m.ownship_missing += 1);
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_cycle();
        recorder.record_sent();
        recorder.record_sent();
        recorder.record_skipped();

        let totals = recorder.snapshot();
        assert_eq!(totals.cycles, 1);
        assert_eq!(totals.sent, 2);
        assert_eq!(totals.skipped, 1);
        assert_eq!(totals.suppressed, 0);
    }
}
