use std::sync::{Arc, Mutex};

use crate::logging::Logger;
use crate::metrics::LayoutMetrics;

/// Configuration knobs for a [`ColumnSet`](super::ColumnSet).
#[derive(Debug, Clone)]
pub struct ColumnSetConfig {
    /// Promote one adjustable fixed column to fill trailing space when no
    /// displayed column is proportional.
    pub auto_fill_fixed_columns: bool,
    /// Right-to-left layout: auto-fill searches from the left instead.
    pub right_to_left: bool,
    /// Column count of the hosting tree. `None` accepts any header count.
    pub expected_columns: Option<usize>,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Shared counters, `None` when metrics are off.
    pub metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    /// Target field used for every emitted event.
    pub log_target: String,
}

impl Default for ColumnSetConfig {
    fn default() -> Self {
        Self {
            auto_fill_fixed_columns: false,
            right_to_left: false,
            expected_columns: None,
            logger: None,
            metrics: None,
            log_target: "column_layout::columns".to_string(),
        }
    }
}

impl ColumnSetConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
