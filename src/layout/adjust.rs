//! Interactive column resizing ("splitter drag").
//!
//! A session runs `begin_column_adjustment` → any number of
//! `limit_column_adjustment` calls while tracking → `end_column_adjustment` to
//! commit or `cancel_column_adjustment` to drop it. Only one session exists
//! per solver; beginning a new one replaces the old.

use crate::geometry::round_px;
use crate::header::MIN_PIXEL_WIDTH;

use super::core::ColumnBounds;

/// Legal range for the right edge of the column being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentLimits {
    pub min_x: i32,
    pub max_x: i32,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnAdjustment {
    column: usize,
    limits: AdjustmentLimits,
    mouse_offset: i32,
}

impl ColumnBounds {
    /// Whether the splitter to the right of `column` may be dragged.
    ///
    /// When proportional columns exist the last column has nothing downstream
    /// to trade width with, so only an adjustable fixed last column may be
    /// resized.
    pub fn allow_column_adjustment(&self, column: usize) -> bool {
        let Some(header) = self.headers.get(column) else {
            return false;
        };
        !self.has_variable_bounds()
            || column + 1 < self.headers.len()
            || (header.is_fixed() && header.is_adjustable())
    }

    /// Start dragging the right edge of `column`.
    ///
    /// `column_left` is the column's left edge and `mouse_offset` the distance
    /// from the mouse to that edge, both in the coordinates later passed to
    /// [`ColumnBounds::limit_column_adjustment`].
    pub fn begin_column_adjustment(
        &mut self,
        column: usize,
        column_left: i32,
        mouse_offset: i32,
    ) -> Option<AdjustmentLimits> {
        let header = self.headers.get(column)?;

        let limits = if header.is_fixed() {
            if header.is_adjustable() {
                AdjustmentLimits {
                    min_x: column_left + MIN_PIXEL_WIDTH,
                    max_x: i32::MAX,
                }
            } else {
                let edge = column_left + header.width();
                AdjustmentLimits {
                    min_x: edge,
                    max_x: edge,
                }
            }
        } else {
            let min_width = header.width();
            self.ensure_column_widths(self.last_control_width);
            // Trailing columns can lend whatever they have above their own
            // minimum; fixed columns contribute nothing.
            let loanable: f32 = self.headers[column + 1..]
                .iter()
                .zip(&self.column_widths[column + 1..])
                .map(|(trailing, width)| width - trailing.width() as f32)
                .sum();
            let min_x = column_left + min_width;
            let max_x = column_left + round_px(self.column_widths[column] + loanable);
            AdjustmentLimits {
                min_x,
                max_x: max_x.max(min_x),
            }
        };

        self.adjustment = Some(ColumnAdjustment {
            column,
            limits,
            mouse_offset,
        });
        Some(limits)
    }

    /// Clamp a tracked mouse position to the legal right-edge range. Returns
    /// the edge position the column would be dropped at.
    pub fn limit_column_adjustment(&self, position: i32) -> i32 {
        match self.adjustment {
            Some(adjustment) => position
                .saturating_add(adjustment.mouse_offset)
                .clamp(adjustment.limits.min_x, adjustment.limits.max_x),
            None => position,
        }
    }

    /// Clamp a raw mouse position so the cursor cannot leave the drag range.
    pub fn limit_mouse_position(&self, position: i32) -> i32 {
        match self.adjustment {
            Some(adjustment) => self.limit_column_adjustment(position) - adjustment.mouse_offset,
            None => position,
        }
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjustment.is_some()
    }

    pub fn adjusting_column(&self) -> Option<usize> {
        self.adjustment.map(|adjustment| adjustment.column)
    }

    pub fn adjustment_limits(&self) -> Option<AdjustmentLimits> {
        self.adjustment.map(|adjustment| adjustment.limits)
    }

    /// Abandon the current session without touching any header.
    pub fn cancel_column_adjustment(&mut self) -> bool {
        self.adjustment.take().is_some()
    }

    /// Commit the session with the right edge dropped at `drop_position`,
    /// which must already have gone through
    /// [`ColumnBounds::limit_column_adjustment`].
    ///
    /// Fixed columns take the new width directly. A proportional column moves
    /// its cumulative percentage and every trailing proportional column gives
    /// up (or receives) share in proportion to its current share. Returns true
    /// if any header changed.
    pub fn end_column_adjustment(&mut self, control_width: i32, drop_position: i32) -> bool {
        let Some(adjustment) = self.adjustment.take() else {
            return false;
        };
        let column = adjustment.column;
        let Some(header) = self.headers.get(column) else {
            return false;
        };

        if header.is_fixed() {
            let old_width = header.width();
            let extent = self.column_bounds(control_width, column, column);
            let delta = drop_position.saturating_sub(extent.right());
            if delta == 0 || !self.resize_fixed_column(column, old_width.saturating_add(delta)) {
                return false;
            }
        } else {
            let Some(last_variable) = self.headers.iter().rposition(|header| !header.is_fixed())
            else {
                return false;
            };
            if last_variable == column {
                return false;
            }

            let (_, item_right) = self.variable_column_bounds(control_width, column, column);
            if drop_position == round_px(item_right) {
                return false;
            }

            let available =
                self.non_fixed_control_width(control_width) - self.total_fixed_width as f32;
            let change = (drop_position as f32 - item_right) / available;

            let mut previous = self.headers[column].percentage();
            let mut new_previous = previous + change;
            self.headers[column].set_percentage(new_previous);
            let base_percentage = (1.0 - previous) / (1.0 - new_previous);
            for trailing in self.headers[column + 1..]
                .iter_mut()
                .filter(|header| !header.is_fixed())
            {
                let percentage = trailing.percentage();
                new_previous += (percentage - previous) / base_percentage;
                trailing.set_percentage(new_previous);
                previous = percentage;
            }
            self.headers[last_variable].set_percentage(1.0);
        }

        self.recalculate();
        true
    }

    /// Resize a column to `requested` pixels, as used by auto-sizing.
    ///
    /// Proportional columns run a synthetic drag from their current left edge,
    /// so the request is limited by what trailing columns can lend.
    pub fn request_column_width(&mut self, control_width: i32, column: usize, requested: i32) -> bool {
        if !self.allow_column_adjustment(column) {
            return false;
        }
        let header = &self.headers[column];
        if !header.is_adjustable() {
            return false;
        }

        if header.is_fixed() {
            if !self.resize_fixed_column(column, requested.max(MIN_PIXEL_WIDTH)) {
                return false;
            }
            self.recalculate();
            return true;
        }

        let extent = self.column_bounds(control_width, column, column);
        if self.begin_column_adjustment(column, extent.left, 0).is_none() {
            return false;
        }
        let drop_position = self.limit_column_adjustment(extent.left + requested);
        self.end_column_adjustment(control_width, drop_position)
    }

    /// Give a fixed column a new width, capped so the fixed total still fits
    /// in an `i32`. Returns false if the width did not change.
    fn resize_fixed_column(&mut self, column: usize, width: i32) -> bool {
        let old_width = self.headers[column].width();
        let ceiling = i32::MAX - (self.total_fixed_width - old_width);
        self.headers[column].set_width(width.min(ceiling));
        let applied = self.headers[column].width() - old_width;
        self.total_fixed_width += applied;
        applied != 0
    }
}
