use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters for the operations a column set performs.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    header_sets: u64,
    permutations: u64,
    reconciliations: u64,
    adjustments_committed: u64,
    adjustments_cancelled: u64,
    width_requests: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_header_set(&mut self) {
        self.header_sets = self.header_sets.saturating_add(1);
    }

    pub fn record_permutation(&mut self) {
        self.permutations = self.permutations.saturating_add(1);
    }

    pub fn record_reconciliation(&mut self) {
        self.reconciliations = self.reconciliations.saturating_add(1);
    }

    pub fn record_adjustment(&mut self, committed: bool) {
        if committed {
            self.adjustments_committed = self.adjustments_committed.saturating_add(1);
        } else {
            self.adjustments_cancelled = self.adjustments_cancelled.saturating_add(1);
        }
    }

    pub fn record_width_request(&mut self) {
        self.width_requests = self.width_requests.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            header_sets: self.header_sets,
            permutations: self.permutations,
            reconciliations: self.reconciliations,
            adjustments_committed: self.adjustments_committed,
            adjustments_cancelled: self.adjustments_cancelled,
            width_requests: self.width_requests,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub header_sets: u64,
    pub permutations: u64,
    pub reconciliations: u64,
    pub adjustments_committed: u64,
    pub adjustments_cancelled: u64,
    pub width_requests: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("header_sets".to_string(), json!(self.header_sets));
        map.insert("permutations".to_string(), json!(self.permutations));
        map.insert("reconciliations".to_string(), json!(self.reconciliations));
        map.insert(
            "adjustments_committed".to_string(),
            json!(self.adjustments_committed),
        );
        map.insert(
            "adjustments_cancelled".to_string(),
            json!(self.adjustments_cancelled),
        );
        map.insert("width_requests".to_string(), json!(self.width_requests));
        map
    }
}
