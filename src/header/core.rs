use bitflags::bitflags;

/// Smallest width any column can take, just enough for a splitter bar.
pub const MIN_PIXEL_WIDTH: i32 = 4;

/// Tolerance used when comparing percentages that went through chained
/// incremental/cumulative conversions.
pub const PERCENTAGE_EPSILON: f32 = 1e-5;

bitflags! {
    /// Presentation flags carried through the layout engine untouched, except
    /// for the drag and position locks consulted on reorder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ColumnHeaderStyles: u32 {
        const ALIGN_CENTER = 0x1;
        const ALIGN_RIGHT = 0x2;
        const IMAGE_ON_RIGHT = 0x4;
        const DISPLAY_UP_ARROW = 0x8;
        const DISPLAY_DOWN_ARROW = 0x10;
        /// The header cannot be picked up and dragged.
        const DRAG_DISABLED = 0x20;
        /// The header cannot change position, neither by being dragged nor by
        /// other headers being dropped around it.
        const COLUMN_POSITION_LOCKED = 0x40;
        const OWNER_DRAW = 0x80;
        const OWNER_DRAW_OVERLAY = 0x100;
    }
}

/// Layout description of a single column.
///
/// A header is either fixed (`percentage == 0`), in which case `width` is its
/// pixel width, or proportional, in which case `percentage` is the cumulative
/// fraction of the proportional area at which the column *ends* and `width`
/// is its minimum. The sign of the stored width records adjustability:
/// negative widths are locked against user resizing.
///
/// Headers are transient layout values and deliberately do not implement
/// equality.
#[derive(Debug, Clone, Default)]
pub struct ColumnHeader {
    text: String,
    percentage: f32,
    width: i32,
    style: ColumnHeaderStyles,
    image_index: Option<u32>,
}

impl ColumnHeader {
    /// Proportional header that ends at 1.0 with the minimum pixel width.
    pub fn new(text: impl Into<String>) -> Self {
        Self::proportional(text, 1.0)
    }

    pub fn proportional(text: impl Into<String>, percentage: f32) -> Self {
        Self::proportional_with_min(text, percentage, MIN_PIXEL_WIDTH)
    }

    pub fn proportional_with_min(text: impl Into<String>, percentage: f32, min_width: i32) -> Self {
        Self {
            text: text.into(),
            percentage,
            width: min_width.max(MIN_PIXEL_WIDTH),
            style: ColumnHeaderStyles::empty(),
            image_index: None,
        }
    }

    /// Fixed-width header the user may resize.
    pub fn fixed(text: impl Into<String>, width: i32) -> Self {
        Self {
            text: text.into(),
            percentage: 0.0,
            width: width.max(MIN_PIXEL_WIDTH),
            style: ColumnHeaderStyles::empty(),
            image_index: None,
        }
    }

    /// Fixed-width header locked against resizing.
    pub fn locked(text: impl Into<String>, width: i32) -> Self {
        let mut header = Self::fixed(text, width);
        header.width = -header.width;
        header
    }

    pub fn with_style(mut self, style: ColumnHeaderStyles) -> Self {
        self.style = style;
        self
    }

    /// Attach an image; negative indices mean no image.
    pub fn with_image(mut self, image_index: i32) -> Self {
        self.image_index = normalize_image(image_index);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cumulative ending percentage, 0 for fixed columns.
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// Fixed width or minimum width in pixels.
    pub fn width(&self) -> i32 {
        self.width.abs()
    }

    pub fn style(&self) -> ColumnHeaderStyles {
        self.style
    }

    pub fn image_index(&self) -> Option<u32> {
        self.image_index
    }

    pub fn is_fixed(&self) -> bool {
        self.percentage == 0.0
    }

    pub fn is_adjustable(&self) -> bool {
        self.width > 0
    }

    /// True only for a default-constructed header.
    pub fn is_empty(&self) -> bool {
        self.percentage == 0.0 && self.width == 0
    }

    pub(crate) fn set_percentage(&mut self, percentage: f32) {
        self.percentage = percentage;
    }

    /// Adjustability cannot change through this call: the stored sign is kept
    /// and the magnitude is floored to [`MIN_PIXEL_WIDTH`].
    pub(crate) fn set_width(&mut self, width: i32) {
        let width = width.abs().max(MIN_PIXEL_WIDTH);
        self.width = if self.width < 0 { -width } else { width };
    }

    pub(crate) fn set_appearance(
        &mut self,
        text: impl Into<String>,
        style: ColumnHeaderStyles,
        image_index: i32,
    ) {
        self.text = text.into();
        self.style = style;
        self.image_index = normalize_image(image_index);
    }
}

fn normalize_image(image_index: i32) -> Option<u32> {
    u32::try_from(image_index).ok()
}
