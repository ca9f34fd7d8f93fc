use thiserror::Error;

/// Errors raised while building or editing a [`Permutation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("column {column} is outside the {full_count} native columns")]
    ColumnOutOfRange { column: usize, full_count: usize },
    #[error("column {column} appears more than once")]
    DuplicateColumn { column: usize },
    #[error("order lists {actual} entries but {expected} columns are displayed")]
    OrderLengthMismatch { expected: usize, actual: usize },
    #[error("entry {entry} of the new order does not appear in the old order")]
    UnknownOrderEntry { entry: usize },
}

/// Mapping between native column indices and the displayed subset.
///
/// Hidden native columns have no display position. The left-blank preference
/// decides which neighbour slides into the space left by a hidden column.
pub trait ColumnPermutation {
    /// Display position of a native column, `None` when hidden.
    fn permuted_column(&self, native: usize) -> Option<usize>;
    /// Native column shown at a display position.
    fn native_column(&self, display: usize) -> Option<usize>;
    fn visible_column_count(&self) -> usize;
    fn full_column_count(&self) -> usize;
    fn prefer_left_blanks(&self) -> bool;

    /// Display column to use when the column previously shown at `display`
    /// is gone. Steps left when left blanks are preferred, then clamps to the
    /// visible range.
    fn fallback_display_column(&self, display: usize) -> Option<usize> {
        let last = self.visible_column_count().checked_sub(1)?;
        let preferred = if self.prefer_left_blanks() && display > 0 {
            display - 1
        } else {
            display
        };
        Some(preferred.min(last))
    }
}

/// Owned display order over a fixed number of native columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    display_to_native: Vec<usize>,
    native_to_display: Vec<Option<usize>>,
    prefer_left_blanks: bool,
}

impl Permutation {
    /// Every native column visible in native order.
    pub fn identity(count: usize, prefer_left_blanks: bool) -> Self {
        Self {
            display_to_native: (0..count).collect(),
            native_to_display: (0..count).map(Some).collect(),
            prefer_left_blanks,
        }
    }

    /// Build from the native columns to show, listed in display order.
    /// Columns not listed are hidden.
    pub fn from_order(
        full_count: usize,
        visible_order: impl IntoIterator<Item = usize>,
        prefer_left_blanks: bool,
    ) -> Result<Self, PermutationError> {
        let mut native_to_display = vec![None; full_count];
        let mut display_to_native = Vec::new();
        for native in visible_order {
            let slot = native_to_display
                .get_mut(native)
                .ok_or(PermutationError::ColumnOutOfRange {
                    column: native,
                    full_count,
                })?;
            if slot.is_some() {
                return Err(PermutationError::DuplicateColumn { column: native });
            }
            *slot = Some(display_to_native.len());
            display_to_native.push(native);
        }
        Ok(Self {
            display_to_native,
            native_to_display,
            prefer_left_blanks,
        })
    }

    /// Native columns in display order.
    pub fn display_order(&self) -> &[usize] {
        &self.display_to_native
    }

    /// True when every column is shown in native order.
    pub fn is_identity(&self) -> bool {
        self.display_to_native.len() == self.native_to_display.len()
            && self
                .display_to_native
                .iter()
                .enumerate()
                .all(|(display, native)| display == *native)
    }

    pub fn set_prefer_left_blanks(&mut self, prefer_left_blanks: bool) {
        self.prefer_left_blanks = prefer_left_blanks;
    }

    /// Apply a header drag/drop. Both slices list the same items: `old_order`
    /// as they were laid out before the drop and `new_order` after. Display
    /// slot `j` ends up showing whatever was at the slot where `old_order`
    /// holds `new_order[j]`.
    pub fn reorder_visible(
        &mut self,
        old_order: &[usize],
        new_order: &[usize],
    ) -> Result<(), PermutationError> {
        let expected = self.display_to_native.len();
        for order in [old_order, new_order] {
            if order.len() != expected {
                return Err(PermutationError::OrderLengthMismatch {
                    expected,
                    actual: order.len(),
                });
            }
        }

        let mut taken = vec![false; expected];
        let mut reordered = Vec::with_capacity(expected);
        for &entry in new_order {
            let previous_slot = old_order
                .iter()
                .position(|&old| old == entry)
                .ok_or(PermutationError::UnknownOrderEntry { entry })?;
            if std::mem::replace(&mut taken[previous_slot], true) {
                return Err(PermutationError::DuplicateColumn { column: entry });
            }
            reordered.push(self.display_to_native[previous_slot]);
        }

        self.display_to_native = reordered;
        self.rebuild_reverse();
        Ok(())
    }

    /// Hide a native column. Returns false if it was not displayed.
    pub fn hide(&mut self, native: usize) -> bool {
        let Some(display) = self.permuted_column(native) else {
            return false;
        };
        self.display_to_native.remove(display);
        self.rebuild_reverse();
        true
    }

    /// Show a hidden native column at `display_position` (clamped to the end).
    /// Returns false if the column was already displayed.
    pub fn show(&mut self, native: usize, display_position: usize) -> Result<bool, PermutationError> {
        let full_count = self.native_to_display.len();
        if native >= full_count {
            return Err(PermutationError::ColumnOutOfRange {
                column: native,
                full_count,
            });
        }
        if self.native_to_display[native].is_some() {
            return Ok(false);
        }
        let position = display_position.min(self.display_to_native.len());
        self.display_to_native.insert(position, native);
        self.rebuild_reverse();
        Ok(true)
    }

    fn rebuild_reverse(&mut self) {
        self.native_to_display.fill(None);
        for (display, &native) in self.display_to_native.iter().enumerate() {
            self.native_to_display[native] = Some(display);
        }
    }
}

impl ColumnPermutation for Permutation {
    fn permuted_column(&self, native: usize) -> Option<usize> {
        self.native_to_display.get(native).copied().flatten()
    }

    fn native_column(&self, display: usize) -> Option<usize> {
        self.display_to_native.get(display).copied()
    }

    fn visible_column_count(&self) -> usize {
        self.display_to_native.len()
    }

    fn full_column_count(&self) -> usize {
        self.native_to_display.len()
    }

    fn prefer_left_blanks(&self) -> bool {
        self.prefer_left_blanks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_each_column_to_itself() {
        let permutation = Permutation::identity(3, false);
        assert!(permutation.is_identity());
        assert_eq!(permutation.visible_column_count(), 3);
        for column in 0..3 {
            assert_eq!(permutation.permuted_column(column), Some(column));
            assert_eq!(permutation.native_column(column), Some(column));
        }
        assert_eq!(permutation.permuted_column(3), None);
        assert_eq!(permutation.native_column(3), None);
    }

    #[test]
    fn subset_order_hides_unlisted_columns() {
        let permutation = Permutation::from_order(4, [3, 0], true).expect("valid order");
        assert!(!permutation.is_identity());
        assert_eq!(permutation.full_column_count(), 4);
        assert_eq!(permutation.visible_column_count(), 2);
        assert_eq!(permutation.permuted_column(3), Some(0));
        assert_eq!(permutation.permuted_column(0), Some(1));
        assert_eq!(permutation.permuted_column(1), None);
        assert!(permutation.prefer_left_blanks());
    }

    #[test]
    fn invalid_orders_are_rejected() {
        assert_eq!(
            Permutation::from_order(2, [0, 2], false),
            Err(PermutationError::ColumnOutOfRange {
                column: 2,
                full_count: 2
            })
        );
        assert_eq!(
            Permutation::from_order(3, [1, 1], false),
            Err(PermutationError::DuplicateColumn { column: 1 })
        );
    }

    #[test]
    fn reorder_moves_dropped_column() {
        let mut permutation = Permutation::from_order(4, [0, 1, 3], false).expect("valid order");
        // Drag the first displayed item to the end.
        permutation
            .reorder_visible(&[0, 1, 2], &[1, 2, 0])
            .expect("reorder");
        assert_eq!(permutation.display_order(), &[1, 3, 0]);
        assert_eq!(permutation.permuted_column(0), Some(2));
        assert_eq!(permutation.permuted_column(2), None);
    }

    #[test]
    fn reorder_uses_item_identity_not_position() {
        let mut permutation = Permutation::identity(3, false);
        permutation
            .reorder_visible(&[7, 8, 9], &[9, 7, 8])
            .expect("reorder");
        assert_eq!(permutation.display_order(), &[2, 0, 1]);
    }

    #[test]
    fn reorder_validates_input() {
        let mut permutation = Permutation::identity(3, false);
        assert_eq!(
            permutation.reorder_visible(&[0, 1], &[1, 0]),
            Err(PermutationError::OrderLengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            permutation.reorder_visible(&[0, 1, 2], &[0, 1, 5]),
            Err(PermutationError::UnknownOrderEntry { entry: 5 })
        );
        assert_eq!(
            permutation.reorder_visible(&[0, 1, 2], &[0, 1, 1]),
            Err(PermutationError::DuplicateColumn { column: 1 })
        );
        assert!(permutation.is_identity());
    }

    #[test]
    fn hide_and_show_round_trip() {
        let mut permutation = Permutation::identity(3, false);
        assert!(permutation.hide(1));
        assert!(!permutation.hide(1));
        assert_eq!(permutation.display_order(), &[0, 2]);
        assert_eq!(permutation.permuted_column(2), Some(1));

        assert_eq!(permutation.show(1, 1), Ok(true));
        assert!(permutation.is_identity());
        assert_eq!(permutation.show(1, 0), Ok(false));
        assert_eq!(permutation.show(0, 99), Ok(false));
        assert!(permutation.show(5, 0).is_err());
    }

    #[test]
    fn show_clamps_position_to_end() {
        let mut permutation = Permutation::from_order(3, [2], false).expect("valid order");
        assert_eq!(permutation.show(0, 10), Ok(true));
        assert_eq!(permutation.display_order(), &[2, 0]);
    }

    #[test]
    fn fallback_prefers_left_neighbour_when_requested() {
        let right = Permutation::from_order(4, [0, 1, 3], false).expect("valid order");
        assert_eq!(right.fallback_display_column(2), Some(2));
        assert_eq!(right.fallback_display_column(5), Some(2));

        let left = Permutation::from_order(4, [0, 1, 3], true).expect("valid order");
        assert_eq!(left.fallback_display_column(2), Some(1));
        assert_eq!(left.fallback_display_column(0), Some(0));

        let empty = Permutation::from_order(2, [], false).expect("valid order");
        assert_eq!(empty.fallback_display_column(0), None);
    }
}
