//! Constraint-based grid layout and gap filling.
//!
//! Widgets request cell ranges on an implicit grid; the engine sizes the
//! grid to the maximum requested extent, marks every covered cell, and
//! tiles the remaining gaps with 1x1 filler slots so the output is always
//! a complete tiling. Overlapping requests are a reported anomaly, not an
//! error: the later request wins each contested cell and the collision is
//! logged and surfaced in [`GridLayout::overlaps`].
//!
//! Layout is a pure function of its input and runs once per layout change,
//! not per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskviz::grid::{layout, PlacementRequest, Slot};
//!
//! let placed = layout(&[
//!     PlacementRequest::new("cpu", 1, 1, 2, 1),
//!     PlacementRequest::new("clock", 1, 2, 1, 1),
//! ]);
//! assert_eq!(placed.grid_cols, 2);
//! assert_eq!(placed.grid_rows, 2);
//! for slot in &placed.slots {
//!     match slot {
//!         Slot::Widget(request) => draw_widget(request),
//!         Slot::Filler { col, row } => draw_border(*col, *row),
//!     }
//! }
//! ```

/// A widget's requested grid region: 1-based anchor plus span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Identifier of the widget this region belongs to.
    pub id: String,
    /// 1-based column of the anchor (top-left) cell.
    pub col: u32,
    /// 1-based row of the anchor (top-left) cell.
    pub row: u32,
    /// Number of columns covered.
    pub col_span: u32,
    /// Number of rows covered.
    pub row_span: u32,
}

impl PlacementRequest {
    /// Create a placement request.
    ///
    /// Zero coordinates and spans are clamped up to 1 rather than
    /// rejected, matching the documented malformed-input policy.
    #[must_use]
    pub fn new(id: impl Into<String>, col: u32, row: u32, col_span: u32, row_span: u32) -> Self {
        Self {
            id: id.into(),
            col: col.max(1),
            row: row.max(1),
            col_span: col_span.max(1),
            row_span: row_span.max(1),
        }
    }

    /// Rightmost 1-based column this request covers.
    #[must_use]
    pub fn col_end(&self) -> u32 {
        self.col + self.col_span - 1
    }

    /// Bottom 1-based row this request covers.
    #[must_use]
    pub fn row_end(&self) -> u32 {
        self.row + self.row_span - 1
    }
}

/// Final occupant of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    /// Covered by the identified widget's region.
    Widget(String),
    /// Synthesized 1x1 filler over an otherwise empty cell.
    Filler,
}

/// One entry in the layout's render sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A caller placement, emitted once at its anchor cell.
    Widget(PlacementRequest),
    /// A synthesized 1x1 filler at the given 1-based cell.
    Filler { col: u32, row: u32 },
}

/// A reported placement collision at one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// 1-based column of the contested cell.
    pub col: u32,
    /// 1-based row of the contested cell.
    pub row: u32,
}

/// Result of laying out a set of placement requests.
///
/// `cells` is row-major with every cell occupied; `slots` lists anchors
/// and fillers in row-major order, each placement exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Occupancy per cell, indexed `[row][col]`, 0-based.
    pub cells: Vec<Vec<Occupant>>,
    /// Total columns, the maximum requested column extent.
    pub grid_cols: u32,
    /// Total rows, the maximum requested row extent.
    pub grid_rows: u32,
    /// Render sequence: anchors and fillers in row-major order.
    pub slots: Vec<Slot>,
    /// Collisions encountered while placing, in placement order.
    pub overlaps: Vec<Overlap>,
}

impl GridLayout {
    /// Occupant of a 1-based cell, if it is inside the grid.
    #[must_use]
    pub fn occupant(&self, col: u32, row: u32) -> Option<&Occupant> {
        let r = usize::try_from(row.checked_sub(1)?).ok()?;
        let c = usize::try_from(col.checked_sub(1)?).ok()?;
        self.cells.get(r)?.get(c)
    }

    /// Number of filler slots in the render sequence.
    #[must_use]
    pub fn filler_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Filler { .. })).count()
    }
}

/// Working state of one cell during placement.
enum CellState {
    Empty,
    Covered(usize),
    Anchor(usize),
}

/// Lay out placement requests into a fully tiled grid.
///
/// Grid dimensions are the maximum extent over all requests; an empty
/// request set yields an empty zero-by-zero layout. Each request marks
/// every cell it covers, warning when a cell is already taken (the later
/// request wins the cell). A request whose anchor cell was taken by a
/// later request disappears from the render sequence entirely, which is
/// part of the reported-anomaly contract rather than an error.
#[must_use]
pub fn layout(requests: &[PlacementRequest]) -> GridLayout {
    let grid_cols = requests.iter().map(PlacementRequest::col_end).max().unwrap_or(0);
    let grid_rows = requests.iter().map(PlacementRequest::row_end).max().unwrap_or(0);

    let cols = grid_cols as usize;
    let rows = grid_rows as usize;
    let mut grid: Vec<Vec<CellState>> = (0..rows)
        .map(|_| (0..cols).map(|_| CellState::Empty).collect())
        .collect();
    let mut overlaps = Vec::new();

    for (index, request) in requests.iter().enumerate() {
        for r in request.row - 1..request.row_end() {
            for c in request.col - 1..request.col_end() {
                let cell = &mut grid[r as usize][c as usize];
                if !matches!(cell, CellState::Empty) {
                    log::warn!("Overlapping widgets at row {}, col {}", r + 1, c + 1);
                    overlaps.push(Overlap { col: c + 1, row: r + 1 });
                }
                *cell = CellState::Covered(index);
            }
        }
        grid[(request.row - 1) as usize][(request.col - 1) as usize] = CellState::Anchor(index);
    }

    let mut slots = Vec::new();
    let mut cells = Vec::with_capacity(rows);
    for (r, grid_row) in grid.iter().enumerate() {
        let mut cell_row = Vec::with_capacity(cols);
        for (c, state) in grid_row.iter().enumerate() {
            let col = (c + 1) as u32;
            let row = (r + 1) as u32;
            match state {
                CellState::Empty => {
                    slots.push(Slot::Filler { col, row });
                    cell_row.push(Occupant::Filler);
                }
                CellState::Anchor(i) => {
                    slots.push(Slot::Widget(requests[*i].clone()));
                    cell_row.push(Occupant::Widget(requests[*i].id.clone()));
                }
                CellState::Covered(i) => {
                    cell_row.push(Occupant::Widget(requests[*i].id.clone()));
                }
            }
        }
        cells.push(cell_row);
    }

    GridLayout { cells, grid_cols, grid_rows, slots, overlaps }
}
