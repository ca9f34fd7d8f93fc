use std::cmp::Ordering;

use crate::geometry::{ColumnExtent, ColumnHit, round_px};
use crate::header::{ColumnHeader, ColumnHeaderStyles};

use super::adjust::ColumnAdjustment;

/// Switch point for one proportional column.
#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnBound {
    pub(super) header_index: usize,
    /// Available proportional width at or below which this column is drawn
    /// at its minimum instead of its share.
    pub(super) fixed_threshold: f32,
    /// The column's own share, as opposed to the cumulative header value.
    pub(super) incremental_percentage: f32,
}

/// Sort order for the switch points: the first entry is the first column to
/// fall back to its minimum as the control narrows.
fn by_threshold_descending(a: &ColumnBound, b: &ColumnBound) -> Ordering {
    b.fixed_threshold.total_cmp(&a.fixed_threshold)
}

/// Pixel layout solver for an ordered set of displayed column headers.
///
/// Queries take the current control width. Proportional widths are cached for
/// the last width asked about and rebuilt lazily when that width changes or
/// after [`ColumnBounds::recalculate`].
///
/// Column indices past the end are clamped to the last column rather than
/// asserted; an empty solver answers every query with a zero result.
#[derive(Debug, Clone, Default)]
pub struct ColumnBounds {
    pub(super) headers: Vec<ColumnHeader>,
    pub(super) total_fixed_width: i32,
    pub(super) variable_bounds: Vec<ColumnBound>,
    pub(super) column_widths: Vec<f32>,
    cached_width: Option<i32>,
    pub(super) last_control_width: i32,
    pub(super) adjustment: Option<ColumnAdjustment>,
}

impl ColumnBounds {
    pub fn new(headers: Vec<ColumnHeader>) -> Self {
        let total_fixed_width = headers
            .iter()
            .filter(|header| header.is_fixed())
            .map(ColumnHeader::width)
            .sum();
        let variable_count = headers.iter().filter(|header| !header.is_fixed()).count();

        let mut bounds = Self {
            column_widths: if variable_count == 0 {
                Vec::new()
            } else {
                vec![0.0; headers.len()]
            },
            variable_bounds: Vec::with_capacity(variable_count),
            headers,
            total_fixed_width,
            cached_width: None,
            last_control_width: 0,
            adjustment: None,
        };
        bounds.recalculate();
        bounds
    }

    /// Rebuild the switch thresholds from the current header values and drop
    /// the width cache.
    pub fn recalculate(&mut self) {
        self.cached_width = None;
        self.variable_bounds.clear();

        let mut previous = 0.0;
        for (index, header) in self.headers.iter().enumerate() {
            if header.is_fixed() {
                continue;
            }
            let incremental = header.percentage() - previous;
            previous = header.percentage();
            self.variable_bounds.push(ColumnBound {
                header_index: index,
                fixed_threshold: header.width() as f32 / incremental,
                incremental_percentage: incremental,
            });
        }

        self.variable_bounds.sort_by(by_threshold_descending);

        // Once the leading columns are pinned their shares no longer apply to
        // the trailing ones, so each later threshold is shifted by the minimums
        // already consumed and rescaled by the share still in play:
        //
        //   t(n) = sum(min(0..n)) + min(n) * (1 - sum(pct(0..n))) / pct(n)
        if let Some((first, rest)) = self.variable_bounds.split_first_mut() {
            let mut total_min = self.headers[first.header_index].width() as f32;
            let mut percentage_adjust = 1.0 - first.incremental_percentage;
            for bound in rest {
                let current_min = self.headers[bound.header_index].width() as f32;
                bound.fixed_threshold =
                    total_min + current_min * percentage_adjust / bound.incremental_percentage;
                percentage_adjust -= bound.incremental_percentage;
                total_min += current_min;
            }
        }
    }

    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// True when at least one displayed column is proportional, in which case
    /// the layout never leaves blank space to the right.
    pub fn has_variable_bounds(&self) -> bool {
        !self.variable_bounds.is_empty()
    }

    pub fn total_fixed_width(&self) -> i32 {
        self.total_fixed_width
    }

    /// Control width of the most recent query; drags started without an
    /// explicit width measure against it.
    pub fn last_control_width(&self) -> i32 {
        self.last_control_width
    }

    /// Switch points as `(column, threshold)` in the order columns fall back to
    /// their minimum width.
    pub fn switch_thresholds(&self) -> Vec<(usize, f32)> {
        self.variable_bounds
            .iter()
            .map(|bound| (bound.header_index, bound.fixed_threshold))
            .collect()
    }

    /// Proportional columns drawn at their minimum width for `control_width`.
    pub fn columns_at_minimum(&self, control_width: i32) -> Vec<usize> {
        let available = (control_width - self.total_fixed_width) as f32;
        self.variable_bounds
            .iter()
            .take_while(|bound| available <= bound.fixed_threshold)
            .map(|bound| bound.header_index)
            .collect()
    }

    /// Total width needed to show every column at `control_width`.
    ///
    /// Equal to the input when the columns exactly fill the control. Larger
    /// values mean a horizontal scrollbar is needed, smaller values (fixed
    /// columns only) leave a blank region on the right.
    pub fn change_control_width(&mut self, control_width: i32) -> i32 {
        if self.headers.is_empty() {
            return control_width;
        }
        self.last_control_width = control_width;
        if self.variable_bounds.is_empty() {
            return self.total_fixed_width;
        }
        round_px(self.non_fixed_control_width(control_width))
    }

    /// Left edge and width of the contiguous display columns
    /// `left_column..=right_column`.
    ///
    /// Widths are summed as fractions and only the two outer edges are
    /// rounded, so adjacent ranges always meet.
    pub fn column_bounds(
        &mut self,
        control_width: i32,
        left_column: usize,
        right_column: usize,
    ) -> ColumnExtent {
        let Some(last) = self.headers.len().checked_sub(1) else {
            return ColumnExtent::default();
        };
        let right_column = right_column.min(last);
        let left_column = left_column.min(right_column);

        if self.variable_bounds.is_empty() {
            let left: i32 = self.headers[..left_column]
                .iter()
                .map(ColumnHeader::width)
                .sum();
            let width: i32 = self.headers[left_column..=right_column]
                .iter()
                .map(ColumnHeader::width)
                .sum();
            return ColumnExtent::new(left, width);
        }

        let (float_left, float_right) =
            self.variable_column_bounds(control_width, left_column, right_column);
        let left = if left_column > 0 { round_px(float_left) } else { 0 };
        ColumnExtent::new(left, round_px(float_right) - left)
    }

    /// Map a pixel offset to the display column containing it. Offsets past
    /// the last column resolve to the last column stretched to the right edge.
    pub fn column_hit_test(&mut self, control_width: i32, x: i32) -> Option<ColumnHit> {
        let last = self.headers.len().checked_sub(1)?;

        if self.variable_bounds.is_empty() {
            let mut left = 0;
            for (column, header) in self.headers.iter().enumerate() {
                let width = header.width();
                if x < left + width {
                    return Some(ColumnHit {
                        column,
                        left,
                        width,
                    });
                }
                left += width;
            }
            let last_width = self.headers[last].width();
            let left = left - last_width;
            return Some(ColumnHit {
                column: last,
                left,
                width: (control_width - left).max(last_width),
            });
        }

        self.ensure_column_widths(control_width);
        let mut total = 0.0;
        let mut previous_total = 0.0;
        for (column, width) in self.column_widths.iter().enumerate() {
            previous_total = total;
            total += width;
            let right = round_px(total);
            if x < right {
                let left = round_px(previous_total);
                return Some(ColumnHit {
                    column,
                    left,
                    width: right - left,
                });
            }
        }

        let left = round_px(previous_total);
        let right = round_px(total).max(control_width);
        Some(ColumnHit {
            column: last,
            left,
            width: right - left,
        })
    }

    pub(crate) fn set_header_appearance(
        &mut self,
        column: usize,
        text: impl Into<String>,
        style: ColumnHeaderStyles,
        image_index: i32,
    ) {
        if let Some(header) = self.headers.get_mut(column) {
            header.set_appearance(text, style, image_index);
        }
    }

    /// Width needed once every proportional column sits at its minimum, or the
    /// control width if everything still fits.
    pub(super) fn non_fixed_control_width(&self, control_width: i32) -> f32 {
        let test_width = (control_width - self.total_fixed_width) as f32;
        match self.variable_bounds.last() {
            Some(worst) if test_width <= worst.fixed_threshold => {
                self.total_fixed_width as f32 + worst.fixed_threshold
            }
            _ => control_width as f32,
        }
    }

    pub(super) fn variable_column_bounds(
        &mut self,
        control_width: i32,
        left_column: usize,
        right_column: usize,
    ) -> (f32, f32) {
        self.ensure_column_widths(control_width);
        let left: f32 = self.column_widths[..left_column].iter().sum();
        let span: f32 = self.column_widths[left_column..=right_column].iter().sum();
        (left, left + span)
    }

    /// Refresh the cached per-column widths if they were computed for another
    /// control width or invalidated since.
    pub(super) fn ensure_column_widths(&mut self, control_width: i32) {
        self.last_control_width = control_width;
        if self.variable_bounds.is_empty() || self.cached_width == Some(control_width) {
            return;
        }

        let column_count = self.headers.len();
        self.column_widths.clear();
        self.column_widths.resize(column_count, 0.0);

        // Columns whose switch point has been reached are pinned to their
        // minimum; the share they give up is removed from the base so the
        // remaining proportional columns still fill what is left.
        let start_width = (control_width - self.total_fixed_width) as f32;
        let mut percentage_width = start_width;
        let mut base_percentage = 1.0;
        let mut pinned = vec![false; column_count];
        let mut pinned_count = 0;
        for bound in &self.variable_bounds {
            if start_width > bound.fixed_threshold {
                break;
            }
            let min_width = self.headers[bound.header_index].width() as f32;
            base_percentage -= bound.incremental_percentage;
            percentage_width -= min_width;
            self.column_widths[bound.header_index] = min_width;
            pinned[bound.header_index] = true;
            pinned_count += 1;
        }

        if pinned_count == self.variable_bounds.len() {
            for (index, header) in self.headers.iter().enumerate() {
                if header.is_fixed() {
                    self.column_widths[index] = header.width() as f32;
                }
            }
        } else {
            let mut previous = 0.0;
            for (index, header) in self.headers.iter().enumerate() {
                if pinned[index] {
                    previous = header.percentage();
                } else if header.is_fixed() {
                    self.column_widths[index] = header.width() as f32;
                } else {
                    self.column_widths[index] =
                        (header.percentage() - previous) / base_percentage * percentage_width;
                    previous = header.percentage();
                }
            }
        }

        self.cached_width = Some(control_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MIN_PIXEL_WIDTH;

    fn mixed() -> ColumnBounds {
        ColumnBounds::new(vec![
            ColumnHeader::fixed("icon", 100),
            ColumnHeader::proportional_with_min("name", 0.5, 50),
            ColumnHeader::proportional_with_min("value", 1.0, 50),
        ])
    }

    fn extents(bounds: &mut ColumnBounds, control_width: i32) -> Vec<ColumnExtent> {
        (0..bounds.header_count())
            .map(|column| bounds.column_bounds(control_width, column, column))
            .collect()
    }

    #[test]
    fn fixed_only_layout_ignores_control_width() {
        let mut bounds = ColumnBounds::new(vec![
            ColumnHeader::fixed("a", 100),
            ColumnHeader::locked("b", 50),
        ]);
        for control_width in [0, 10, 150, 1000] {
            assert_eq!(bounds.change_control_width(control_width), 150);
        }
        assert!(!bounds.has_variable_bounds());
        assert_eq!(bounds.column_bounds(500, 1, 1), ColumnExtent::new(100, 50));
        assert_eq!(bounds.column_bounds(500, 0, 1), ColumnExtent::new(0, 150));
    }

    #[test]
    fn single_proportional_column_fills_control() {
        let mut bounds = ColumnBounds::new(vec![ColumnHeader::new("only")]);
        for control_width in [MIN_PIXEL_WIDTH, 5, 100, 1234] {
            assert_eq!(bounds.change_control_width(control_width), control_width);
            assert_eq!(
                bounds.column_bounds(control_width, 0, 0),
                ColumnExtent::new(0, control_width)
            );
        }
    }

    #[test]
    fn mixed_columns_split_remaining_width() {
        let mut bounds = mixed();
        assert_eq!(bounds.change_control_width(400), 400);
        assert_eq!(
            extents(&mut bounds, 400),
            vec![
                ColumnExtent::new(0, 100),
                ColumnExtent::new(100, 150),
                ColumnExtent::new(250, 150),
            ]
        );
    }

    #[test]
    fn narrow_control_pins_columns_and_requires_scrollbar() {
        let mut bounds = mixed();
        assert_eq!(bounds.change_control_width(120), 200);
        assert_eq!(bounds.columns_at_minimum(120).len(), 2);
        assert_eq!(
            extents(&mut bounds, 120),
            vec![
                ColumnExtent::new(0, 100),
                ColumnExtent::new(100, 50),
                ColumnExtent::new(150, 50),
            ]
        );
    }

    #[test]
    fn partial_pinning_keeps_total_equal_to_control_width() {
        // "tag" has the largest min/share ratio and falls back first.
        let mut bounds = ColumnBounds::new(vec![
            ColumnHeader::proportional_with_min("tag", 0.1, 60),
            ColumnHeader::proportional_with_min("body", 1.0, 20),
        ]);
        assert_eq!(bounds.columns_at_minimum(300), vec![0]);
        assert!(bounds.columns_at_minimum(700).is_empty());

        let widths = extents(&mut bounds, 300);
        assert_eq!(widths[0], ColumnExtent::new(0, 60));
        assert_eq!(widths[1], ColumnExtent::new(60, 240));
    }

    #[test]
    fn column_totals_match_control_width_once_everything_fits() {
        let mut bounds = ColumnBounds::new(vec![
            ColumnHeader::fixed("fixed", 30),
            ColumnHeader::proportional_with_min("a", 0.2, 10),
            ColumnHeader::proportional_with_min("b", 0.7, 40),
            ColumnHeader::proportional_with_min("c", 1.0, 20),
        ]);
        let required = bounds.change_control_width(0);
        assert_eq!(required, 100);

        for control_width in required..=700 {
            let total = bounds.column_bounds(control_width, 0, 3);
            assert_eq!(total, ColumnExtent::new(0, control_width));

            let per_column = extents(&mut bounds, control_width);
            for pair in per_column.windows(2) {
                assert_eq!(pair[0].right(), pair[1].left);
            }
            assert!(per_column.iter().all(|extent| extent.width >= 0));
        }
    }

    #[test]
    fn switch_order_is_monotonic_as_width_shrinks() {
        let bounds = ColumnBounds::new(vec![
            ColumnHeader::proportional_with_min("a", 0.1, 40),
            ColumnHeader::fixed("gap", 12),
            ColumnHeader::proportional_with_min("b", 0.6, 20),
            ColumnHeader::proportional_with_min("c", 1.0, 100),
        ]);
        let mut previous: Vec<usize> = Vec::new();
        for control_width in (0..=1500).rev() {
            let pinned = bounds.columns_at_minimum(control_width);
            assert!(previous.iter().all(|column| pinned.contains(column)));
            previous = pinned;
        }
        assert_eq!(previous.len(), 3);
    }

    #[test]
    fn recalculate_is_idempotent() {
        let mut bounds = mixed();
        bounds.recalculate();
        let thresholds = bounds.switch_thresholds();
        let first = extents(&mut bounds, 333);

        bounds.recalculate();
        assert_eq!(bounds.switch_thresholds(), thresholds);
        assert_eq!(extents(&mut bounds, 333), first);
    }

    #[test]
    fn thresholds_sorted_and_last_is_total_minimum() {
        let bounds = ColumnBounds::new(vec![
            ColumnHeader::proportional_with_min("a", 0.25, 30),
            ColumnHeader::proportional_with_min("b", 0.5, 80),
            ColumnHeader::proportional_with_min("c", 1.0, 40),
        ]);
        let thresholds = bounds.switch_thresholds();
        assert_eq!(thresholds[0].0, 1);
        for pair in thresholds.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        let worst = thresholds.last().map(|(_, threshold)| *threshold);
        assert!((worst.unwrap_or_default() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn cache_follows_control_width_changes() {
        let mut bounds = mixed();
        assert_eq!(bounds.column_bounds(400, 2, 2), ColumnExtent::new(250, 150));
        assert_eq!(bounds.column_bounds(300, 2, 2), ColumnExtent::new(200, 100));
        assert_eq!(bounds.column_bounds(400, 2, 2), ColumnExtent::new(250, 150));
    }

    #[test]
    fn hit_test_matches_bounds() {
        let mut bounds = mixed();
        let hit = bounds.column_hit_test(400, 120);
        assert_eq!(
            hit,
            Some(ColumnHit {
                column: 1,
                left: 100,
                width: 150
            })
        );
        assert_eq!(bounds.column_hit_test(400, 0).map(|hit| hit.column), Some(0));
        assert_eq!(bounds.column_hit_test(400, 250).map(|hit| hit.column), Some(2));
        for x in 0..400 {
            let hit = bounds.column_hit_test(400, x).map(|hit| (hit.column, hit.extent()));
            let column = hit.map(|(column, _)| column).unwrap_or_default();
            assert_eq!(hit, Some((column, bounds.column_bounds(400, column, column))));
        }
    }

    #[test]
    fn hit_test_past_last_column_extends_to_edge() {
        let mut fixed = ColumnBounds::new(vec![
            ColumnHeader::fixed("a", 100),
            ColumnHeader::fixed("b", 50),
        ]);
        assert_eq!(
            fixed.column_hit_test(500, 400),
            Some(ColumnHit {
                column: 1,
                left: 100,
                width: 400
            })
        );
        assert_eq!(
            fixed.column_hit_test(500, 120),
            Some(ColumnHit {
                column: 1,
                left: 100,
                width: 50
            })
        );

        let mut proportional = mixed();
        assert_eq!(
            proportional.column_hit_test(400, 1000),
            Some(ColumnHit {
                column: 2,
                left: 250,
                width: 150
            })
        );
        assert_eq!(
            proportional.column_hit_test(120, 500),
            Some(ColumnHit {
                column: 2,
                left: 150,
                width: 50
            })
        );
    }

    #[test]
    fn empty_solver_is_a_safe_no_op() {
        let mut bounds = ColumnBounds::new(Vec::new());
        assert!(!bounds.has_headers());
        assert_eq!(bounds.change_control_width(300), 300);
        assert_eq!(bounds.column_bounds(300, 0, 4), ColumnExtent::default());
        assert_eq!(bounds.column_hit_test(300, 10), None);
        assert!(bounds.columns_at_minimum(300).is_empty());
    }

    #[test]
    fn out_of_range_columns_are_clamped() {
        let mut bounds = mixed();
        assert_eq!(bounds.column_bounds(400, 7, 9), ColumnExtent::new(250, 150));
        assert_eq!(bounds.column_bounds(400, 1, 9), ColumnExtent::new(100, 300));
    }
}
