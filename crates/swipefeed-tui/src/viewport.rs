//! Terminal rows to the logical pixel space the scroll controller works in

/// Rows reserved after the last item for the pagination footer
pub const FOOTER_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Logical pixels per terminal row
    pub row_height_px: f64,
    /// Rows occupied by one feed item
    pub item_rows: u16,
}

impl Geometry {
    pub fn new(row_height_px: f64, item_rows: u16) -> Self {
        Self {
            row_height_px: if row_height_px > 0.0 { row_height_px } else { 1.0 },
            item_rows: item_rows.max(1),
        }
    }

    #[inline]
    pub fn rows_to_px(&self, rows: f64) -> f64 {
        rows * self.row_height_px
    }

    /// Whole rows covered by `px`
    #[inline]
    pub fn px_to_rows(&self, px: f64) -> u16 {
        (px.max(0.0) / self.row_height_px).floor().min(u16::MAX as f64) as u16
    }

    /// Rows needed to show `px` at all (partial rows round up)
    #[inline]
    pub fn px_to_rows_ceil(&self, px: f64) -> u16 {
        (px.max(0.0) / self.row_height_px).ceil().min(u16::MAX as f64) as u16
    }

    /// Top edge of the bottom sentinel, directly after the last item
    pub fn sentinel_top_px(&self, item_count: usize) -> f64 {
        self.rows_to_px((item_count * self.item_rows as usize) as f64)
    }

    pub fn content_height_px(&self, item_count: usize) -> f64 {
        self.sentinel_top_px(item_count) + self.rows_to_px(FOOTER_ROWS as f64)
    }

    pub fn max_offset_px(&self, item_count: usize, viewport_rows: u16) -> f64 {
        (self.content_height_px(item_count) - self.rows_to_px(viewport_rows as f64)).max(0.0)
    }
}
