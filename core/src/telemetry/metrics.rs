use std::sync::Mutex;

/// Station and line counters for one run.
pub struct RunMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub considered: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub malformed: usize,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_considered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.considered += 1;
        }
    }

    pub fn record_emitted(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.emitted += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn record_malformed(&self, lines: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.malformed += lines;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
