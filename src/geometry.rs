/// Horizontal pixel span covered by one or more adjacent columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnExtent {
    pub left: i32,
    pub width: i32,
}

impl ColumnExtent {
    pub const fn new(left: i32, width: i32) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }
}

/// Result of mapping a pixel offset back to the displayed column under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHit {
    pub column: usize,
    pub left: i32,
    pub width: i32,
}

impl ColumnHit {
    pub fn extent(&self) -> ColumnExtent {
        ColumnExtent::new(self.left, self.width)
    }
}

/// Round a fractional pixel position the way every bounds query does, so
/// adjacent columns always share an edge.
pub(crate) fn round_px(value: f32) -> i32 {
    (value + 0.5) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_right_edge() {
        assert_eq!(ColumnExtent::new(10, 25).right(), 35);
    }

    #[test]
    fn rounding_is_half_up_for_positive_positions() {
        assert_eq!(round_px(149.5), 150);
        assert_eq!(round_px(149.49), 149);
        assert_eq!(round_px(0.0), 0);
    }
}
