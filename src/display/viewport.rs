use std::ops::Range;

/// Smallest terminal that still shows a readable playfield.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 15;

/// Maps the fixed logical playfield onto the terminal's cell grid.
///
/// Rebuilt from `terminal::size()` every frame; the logical field never
/// changes size, only the scale does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub field_w: i32,
    pub field_h: i32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, field_w: i32, field_h: i32) -> Self {
        Viewport {
            cols,
            rows,
            field_w: field_w.max(1),
            field_h: field_h.max(1),
        }
    }

    pub fn is_too_small(&self) -> bool {
        self.cols < MIN_COLS || self.rows < MIN_ROWS
    }

    // Multiply before dividing so whole-cell boundaries land exactly.
    fn scale_x(&self, x: f64) -> f64 {
        x * self.cols as f64 / self.field_w as f64
    }

    fn scale_y(&self, y: f64) -> f64 {
        y * self.rows as f64 / self.field_h as f64
    }

    /// Column containing logical `x` (may lie off screen).
    pub fn col(&self, x: f64) -> i32 {
        self.scale_x(x).floor() as i32
    }

    /// Row containing logical `y` (may lie off screen).
    pub fn row(&self, y: f64) -> i32 {
        self.scale_y(y).floor() as i32
    }

    /// On-screen cell containing a logical point.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let (col, row) = (self.col(x), self.row(y));
        if (0..self.cols as i32).contains(&col) && (0..self.rows as i32).contains(&row) {
            Some((col as u16, row as u16))
        } else {
            None
        }
    }

    /// Column and row ranges covered by a logical rectangle, clipped to the
    /// screen.  Any rectangle that is at least partly visible covers one cell.
    pub fn cell_span(&self, x: f64, y: f64, w: f64, h: f64) -> Option<(Range<u16>, Range<u16>)> {
        let cols = clip_span(self.col(x), self.scale_x(x + w).ceil() as i32, self.cols)?;
        let rows = clip_span(self.row(y), self.scale_y(y + h).ceil() as i32, self.rows)?;
        Some((cols, rows))
    }

    /// Cells whose centres fall inside the disc inscribed in the
    /// `size`×`size` square at `(x, y)`.
    pub fn disc_cells(&self, x: f64, y: f64, size: f64) -> Vec<(u16, u16)> {
        let Some((cols, rows)) = self.cell_span(x, y, size, size) else {
            return Vec::new();
        };
        let radius = size / 2.0;
        let (cx, cy) = (x + radius, y + radius);

        let mut cells = Vec::new();
        for row in rows {
            let py = (row as f64 + 0.5) * self.field_h as f64 / self.rows as f64;
            for col in cols.clone() {
                let px = (col as f64 + 0.5) * self.field_w as f64 / self.cols as f64;
                if (px - cx).powi(2) + (py - cy).powi(2) <= radius * radius {
                    cells.push((col, row));
                }
            }
        }
        cells
    }

    /// Screen columns holding a vertical grid line.
    pub fn grid_columns(&self, spacing: i32) -> Vec<u16> {
        grid_lines(self.field_w, spacing, |v| self.col(v))
            .filter_map(|c| u16::try_from(c).ok().filter(|&c| c < self.cols))
            .collect()
    }

    /// Screen rows holding a horizontal grid line.
    pub fn grid_rows(&self, spacing: i32) -> Vec<u16> {
        grid_lines(self.field_h, spacing, |v| self.row(v))
            .filter_map(|r| u16::try_from(r).ok().filter(|&r| r < self.rows))
            .collect()
    }
}

fn grid_lines<'a>(
    extent: i32,
    spacing: i32,
    project: impl Fn(f64) -> i32 + 'a,
) -> impl Iterator<Item = i32> + 'a {
    (0..extent)
        .step_by(spacing.max(1) as usize)
        .map(move |v| project(v as f64))
}

fn clip_span(start: i32, end: i32, limit: u16) -> Option<Range<u16>> {
    let end = end.max(start + 1);
    let start = start.max(0);
    let end = end.min(limit as i32);
    if start >= end {
        None
    } else {
        Some(start as u16..end as u16)
    }
}

