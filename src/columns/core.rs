use serde_json::Value;

use crate::error::{LayoutError, Result};
use crate::geometry::{ColumnExtent, ColumnHit};
use crate::header::{ColumnHeader, ColumnHeaderStyles};
use crate::layout::ColumnBounds;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::permutation::{ColumnPermutation, Permutation, PermutationError};
use crate::reconcile::{
    even_percentages, permute_headers, reverse_integrate, snap_last_percentage,
    validate_percentages,
};

use super::config::ColumnSetConfig;

/// Header state of a multi-column control.
///
/// Owns the full (native order) header set, the optional permutation and the
/// solver built from the displayed subset. Edits made through the solver
/// (splitter drags, auto-sizing) leave the full set stale until the next call
/// that needs it, at which point they are folded back in.
///
/// Column arguments are native indices where the name says so and display
/// indices everywhere else.
#[derive(Debug)]
pub struct ColumnSet {
    config: ColumnSetConfig,
    full_headers: Option<Vec<ColumnHeader>>,
    bounds: ColumnBounds,
    permutation: Option<Permutation>,
    full_headers_dirty: bool,
    auto_fill_applied: bool,
    active_column: Option<usize>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::new(ColumnSetConfig::default())
    }
}

impl ColumnSet {
    pub fn new(config: ColumnSetConfig) -> Self {
        Self {
            config,
            full_headers: None,
            bounds: ColumnBounds::default(),
            permutation: None,
            full_headers_dirty: false,
            auto_fill_applied: false,
            active_column: None,
        }
    }

    pub fn config(&self) -> &ColumnSetConfig {
        &self.config
    }

    /// Solver for the displayed headers.
    pub fn bounds(&self) -> &ColumnBounds {
        &self.bounds
    }

    /// Replace the full header set. An empty set clears the headers.
    ///
    /// With `calculate_percentage` the proportional columns split the
    /// proportional area evenly; otherwise their percentages must already form
    /// a valid ascending sequence. Nothing changes when an error is returned.
    pub fn set_column_headers(
        &mut self,
        mut headers: Vec<ColumnHeader>,
        calculate_percentage: bool,
    ) -> Result<()> {
        if headers.is_empty() {
            if self.full_headers.is_some() {
                self.track_active_column(|set| {
                    set.full_headers = None;
                    set.rebuild_displayed();
                });
                self.log(LogLevel::Info, "column headers cleared", []);
            }
            return Ok(());
        }

        if let Some(expected) = self.config.expected_columns {
            if headers.len() != expected {
                return Err(self.reject(LayoutError::HeaderCountMismatch {
                    expected,
                    actual: headers.len(),
                }));
            }
        }

        if calculate_percentage {
            even_percentages(&mut headers);
        } else {
            validate_percentages(&headers).map_err(|err| self.reject(err))?;
            snap_last_percentage(&mut headers);
        }

        let column_count = headers.len();
        let proportional = headers.iter().filter(|header| !header.is_fixed()).count();
        let stale_permutation = self
            .permutation
            .as_ref()
            .is_some_and(|permutation| permutation.full_column_count() != column_count);

        self.track_active_column(|set| {
            if stale_permutation {
                set.permutation = None;
            }
            set.full_headers = Some(headers);
            set.rebuild_displayed();
        });

        if stale_permutation {
            self.log(
                LogLevel::Warn,
                "permutation dropped after column count change",
                [json_kv("columns", column_count)],
            );
        }
        self.record(LayoutMetrics::record_header_set);
        self.log(
            LogLevel::Info,
            "column headers set",
            [
                json_kv("columns", column_count),
                json_kv("proportional", proportional),
                json_kv("auto_fill", self.auto_fill_applied),
            ],
        );
        Ok(())
    }

    /// Record the column count of the hosting tree. Headers and a permutation
    /// sized for another count are discarded.
    pub fn set_expected_columns(&mut self, expected: Option<usize>) {
        self.config.expected_columns = expected;
        let Some(expected) = expected else {
            return;
        };

        let drop_permutation = self
            .permutation
            .as_ref()
            .is_some_and(|permutation| permutation.full_column_count() != expected);
        let drop_headers = self
            .full_headers
            .as_ref()
            .is_some_and(|headers| headers.len() != expected);
        if !drop_permutation && !drop_headers {
            return;
        }

        self.sync_full_headers();
        self.track_active_column(|set| {
            if drop_permutation {
                set.permutation = None;
            }
            if drop_headers {
                set.full_headers = None;
                set.full_headers_dirty = false;
            }
            set.rebuild_displayed();
        });
        self.log(
            LogLevel::Warn,
            "column state reset for new column count",
            [
                json_kv("expected", expected),
                json_kv("permutation_dropped", drop_permutation),
                json_kv("headers_dropped", drop_headers),
            ],
        );
    }

    /// Full header set in native order with any on-screen changes applied.
    pub fn column_headers(&mut self) -> &[ColumnHeader] {
        self.sync_full_headers();
        self.full_headers.as_deref().unwrap_or_default()
    }

    /// One header by native index. Returns an empty header when no headers
    /// are set or the index is out of range.
    pub fn column_header(&mut self, native: usize) -> ColumnHeader {
        self.sync_full_headers();
        self.full_headers
            .as_ref()
            .and_then(|headers| headers.get(native))
            .cloned()
            .unwrap_or_default()
    }

    /// Change the text, style and image of a native column without touching
    /// its layout.
    pub fn update_column_header_appearance(
        &mut self,
        native: usize,
        text: impl Into<String>,
        style: ColumnHeaderStyles,
        image_index: i32,
    ) -> bool {
        let display = self.display_for_native(native);
        let Some(header) = self
            .full_headers
            .as_mut()
            .and_then(|headers| headers.get_mut(native))
        else {
            return false;
        };
        let text = text.into();
        header.set_appearance(text.clone(), style, image_index);
        if let Some(display) = display {
            self.bounds
                .set_header_appearance(display, text, style, image_index);
        }
        true
    }

    /// Install or remove the display permutation. The full column count of a
    /// new permutation must match the header count.
    pub fn set_permutation(&mut self, permutation: Option<Permutation>) -> Result<()> {
        if let (Some(permutation), Some(headers)) = (&permutation, &self.full_headers) {
            if permutation.full_column_count() != headers.len() {
                let err = LayoutError::PermutationMismatch {
                    permutation: permutation.full_column_count(),
                    headers: headers.len(),
                };
                return Err(self.reject(err));
            }
        }
        self.apply_permutation(permutation);
        Ok(())
    }

    pub fn permutation(&self) -> Option<&Permutation> {
        self.permutation.as_ref()
    }

    pub fn set_auto_fill_fixed_columns(&mut self, auto_fill: bool) {
        if self.config.auto_fill_fixed_columns == auto_fill {
            return;
        }
        self.sync_full_headers();
        self.config.auto_fill_fixed_columns = auto_fill;
        self.rebuild_displayed();
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        if self.config.right_to_left == right_to_left {
            return;
        }
        self.sync_full_headers();
        self.config.right_to_left = right_to_left;
        self.rebuild_displayed();
    }

    /// Apply a header drag/drop reported as the item order before and after
    /// the drop. Returns `Ok(false)` when the order did not change or a
    /// position-locked column would have moved.
    pub fn change_column_order(&mut self, old_order: &[usize], new_order: &[usize]) -> Result<bool> {
        let Some(full_count) = self.full_headers.as_ref().map(Vec::len) else {
            return Ok(false);
        };
        let expected = self.display_column_count();
        for order in [old_order, new_order] {
            if order.len() != expected {
                let err = LayoutError::from(PermutationError::OrderLengthMismatch {
                    expected,
                    actual: order.len(),
                });
                return Err(self.reject(err));
            }
        }
        if !self.allow_column_order_change(old_order, new_order) {
            self.log(LogLevel::Debug, "column order change blocked by locked column", []);
            return Ok(false);
        }

        let mut permutation = self
            .permutation
            .clone()
            .unwrap_or_else(|| Permutation::identity(full_count, self.config.right_to_left));
        if let Err(err) = permutation.reorder_visible(old_order, new_order) {
            return Err(self.reject(err.into()));
        }
        let unchanged = self
            .permutation
            .as_ref()
            .map_or(permutation.is_identity(), |current| {
                current.display_order() == permutation.display_order()
            });
        if unchanged {
            return Ok(false);
        }

        self.apply_permutation(Some(permutation));
        Ok(true)
    }

    /// Whether a reorder keeps every position-locked displayed column in its
    /// slot.
    pub fn allow_column_order_change(&self, old_order: &[usize], new_order: &[usize]) -> bool {
        let headers = self.bounds.headers();
        new_order.iter().enumerate().all(|(slot, entry)| {
            let previous_slot = old_order.iter().position(|old| old == entry);
            match previous_slot {
                Some(previous_slot) if previous_slot != slot => {
                    let moved_locked = headers.get(previous_slot).is_some_and(is_position_locked);
                    let displaced_locked = headers.get(slot).is_some_and(is_position_locked);
                    !moved_locked && !displaced_locked
                }
                _ => true,
            }
        })
    }

    /// Whether the user may pick up the header at `display`.
    pub fn allow_header_drag(&self, display: usize) -> bool {
        self.bounds
            .headers()
            .get(display)
            .is_some_and(|header| !header.style().contains(ColumnHeaderStyles::DRAG_DISABLED))
    }

    /// Start a splitter drag on the right edge of a displayed column.
    ///
    /// Proportional drag limits are measured at `control_width`.
    pub fn begin_tracking_splitter(
        &mut self,
        control_width: i32,
        display: usize,
        column_left: i32,
        mouse_offset: i32,
    ) -> bool {
        if !self.bounds.allow_column_adjustment(display) {
            return false;
        }
        self.bounds.change_control_width(control_width);
        self.bounds
            .begin_column_adjustment(display, column_left, mouse_offset)
            .is_some()
    }

    /// Clamp a tracked mouse position; returns where the splitter is drawn.
    pub fn track_splitter(&self, mouse_x: i32) -> i32 {
        self.bounds.limit_column_adjustment(mouse_x)
    }

    /// Finish the splitter drag, committing unless `cancel` is set. Returns
    /// true when the layout changed.
    pub fn finish_splitter(&mut self, control_width: i32, mouse_x: i32, cancel: bool) -> bool {
        let Some(column) = self.bounds.adjusting_column() else {
            return false;
        };
        if cancel {
            self.bounds.cancel_column_adjustment();
            self.record(|metrics| metrics.record_adjustment(false));
            self.log(
                LogLevel::Debug,
                "column adjustment cancelled",
                [json_kv("column", column)],
            );
            return false;
        }

        let drop_position = self.bounds.limit_column_adjustment(mouse_x);
        let changed = self.bounds.end_column_adjustment(control_width, drop_position);
        if changed {
            self.full_headers_dirty = true;
            self.record(|metrics| metrics.record_adjustment(true));
            self.log(
                LogLevel::Info,
                "column adjustment committed",
                [
                    json_kv("column", column),
                    json_kv("position", drop_position),
                    json_kv("control_width", control_width),
                ],
            );
        }
        changed
    }

    /// Size a native column to fit `content_width` pixels. Hidden and locked
    /// columns are left alone.
    pub fn auto_size_column(&mut self, native: usize, content_width: i32, control_width: i32) -> bool {
        let Some(display) = self.display_for_native(native) else {
            return false;
        };
        self.record(LayoutMetrics::record_width_request);
        let changed = self
            .bounds
            .request_column_width(control_width, display, content_width);
        if changed {
            self.full_headers_dirty = true;
            self.log(
                LogLevel::Debug,
                "column auto-sized",
                [json_kv("column", native), json_kv("width", content_width)],
            );
        }
        changed
    }

    /// Set the active display column. Returns false when out of range.
    pub fn set_active_column(&mut self, display: usize) -> bool {
        if display >= self.display_column_count() {
            return false;
        }
        self.active_column = Some(display);
        true
    }

    pub fn active_column(&self) -> Option<usize> {
        self.active_column
    }

    pub fn change_control_width(&mut self, control_width: i32) -> i32 {
        self.bounds.change_control_width(control_width)
    }

    pub fn column_bounds(&mut self, control_width: i32, left: usize, right: usize) -> ColumnExtent {
        self.bounds.column_bounds(control_width, left, right)
    }

    pub fn column_hit_test(&mut self, control_width: i32, x: i32) -> Option<ColumnHit> {
        self.bounds.column_hit_test(control_width, x)
    }

    pub fn displayed_headers(&self) -> &[ColumnHeader] {
        self.bounds.headers()
    }

    pub fn display_column_count(&self) -> usize {
        self.bounds.header_count()
    }

    pub fn is_auto_fill_applied(&self) -> bool {
        self.auto_fill_applied
    }

    /// True when displayed edits have not been folded into the full set yet.
    pub fn has_pending_changes(&self) -> bool {
        self.full_headers_dirty
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log the current metrics snapshot, if both a logger and metrics are
    /// configured.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.log_target));
        }
    }

    fn apply_permutation(&mut self, permutation: Option<Permutation>) {
        self.sync_full_headers();
        let visible = permutation
            .as_ref()
            .map(ColumnPermutation::visible_column_count);
        self.track_active_column(|set| {
            set.permutation = permutation;
            set.rebuild_displayed();
        });
        self.record(LayoutMetrics::record_permutation);
        self.log(
            LogLevel::Info,
            "permutation applied",
            [
                json_kv("visible", visible),
                json_kv("auto_fill", self.auto_fill_applied),
            ],
        );
    }

    /// Run `change` and carry the active column across it by native index,
    /// falling back to a neighbour if its column is no longer displayed.
    fn track_active_column(&mut self, change: impl FnOnce(&mut Self)) {
        let previous = self
            .active_column
            .map(|display| (display, self.native_for_display(display)));
        change(self);
        self.active_column = previous.and_then(|(display, native)| {
            native
                .and_then(|native| self.display_for_native(native))
                .or_else(|| self.fallback_display(display))
        });
    }

    fn fallback_display(&self, display: usize) -> Option<usize> {
        let last = self.display_column_count().checked_sub(1)?;
        let fallback = match &self.permutation {
            Some(permutation) => permutation.fallback_display_column(display)?,
            None => display,
        };
        Some(fallback.min(last))
    }

    fn native_for_display(&self, display: usize) -> Option<usize> {
        match &self.permutation {
            Some(permutation) => permutation.native_column(display),
            None => (display < self.display_column_count()).then_some(display),
        }
    }

    fn display_for_native(&self, native: usize) -> Option<usize> {
        match &self.permutation {
            Some(permutation) => permutation.permuted_column(native),
            None => (native < self.display_column_count()).then_some(native),
        }
    }

    /// Rebuild the displayed set and its solver from the full set.
    fn rebuild_displayed(&mut self) {
        self.full_headers_dirty = false;
        let Some(full) = self.full_headers.as_deref() else {
            self.bounds = ColumnBounds::default();
            self.auto_fill_applied = false;
            return;
        };
        let permuted = permute_headers(
            full,
            self.permutation
                .as_ref()
                .map(|permutation| permutation as &dyn ColumnPermutation),
            self.config.auto_fill_fixed_columns,
            self.config.right_to_left,
        );
        self.auto_fill_applied = permuted.auto_fill_applied;
        let control_width = self.bounds.last_control_width();
        self.bounds = ColumnBounds::new(permuted.headers);
        self.bounds.change_control_width(control_width);
    }

    /// Fold displayed edits back into the full set.
    fn sync_full_headers(&mut self) {
        if !self.full_headers_dirty {
            return;
        }
        self.full_headers_dirty = false;
        let Some(full) = self.full_headers.as_mut() else {
            return;
        };
        reverse_integrate(
            self.bounds.headers(),
            self.permutation
                .as_ref()
                .map(|permutation| permutation as &dyn ColumnPermutation),
            self.auto_fill_applied,
            full,
        );
        self.record(LayoutMetrics::record_reconciliation);
        self.log(LogLevel::Debug, "displayed headers reconciled", []);
    }

    fn reject(&self, err: LayoutError) -> LayoutError {
        self.log(
            LogLevel::Warn,
            "column configuration rejected",
            [json_kv("error", err.to_string())],
        );
        err
    }

    fn record(&self, update: impl FnOnce(&mut LayoutMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

fn is_position_locked(header: &ColumnHeader) -> bool {
    header
        .style()
        .contains(ColumnHeaderStyles::COLUMN_POSITION_LOCKED)
}
