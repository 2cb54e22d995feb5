//! Cell occupancy of a world.
use crate::{AgentId, BlockId};
use itertools::Itertools;
use ndarray::Array2;
use std::fmt;

/// A cell of the grid, `(x, y)` with `y = 0` on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Column.
    pub x: usize,

    /// Row.
    pub y: usize,
}

impl Location {
    /// Constructs a location.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The cell directly below, `None` on the floor.
    pub fn below(&self) -> Option<Location> {
        self.y.checked_sub(1).map(|y| Location::new(self.x, y))
    }

    /// The cell directly above.
    pub fn above(&self) -> Location {
        Location::new(self.x, self.y + 1)
    }
}

/// Content of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Block(BlockId),
    Agent(AgentId),
}

impl Cell {
    /// Numeric encoding used in observations: `0` for empty cells, the id otherwise.
    pub fn value(&self) -> f32 {
        match self {
            Cell::Empty => 0.0,
            Cell::Block(id) | Cell::Agent(id) => *id as f32,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

/// A `width x height` grid of cells indexed by `[[x, y]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Constructs an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((width, height), Cell::Empty),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.nrows()
    }

    pub fn height(&self) -> usize {
        self.cells.ncols()
    }

    /// Returns the content of a cell. Panics if `loc` is outside the grid.
    pub fn get(&self, loc: Location) -> Cell {
        self.cells[[loc.x, loc.y]]
    }

    pub(crate) fn set(&mut self, loc: Location, cell: Cell) {
        self.cells[[loc.x, loc.y]] = cell;
    }

    pub(crate) fn clear(&mut self, loc: Location) {
        self.set(loc, Cell::Empty);
    }

    /// Numeric projection of shape `(width, height)`.
    pub fn to_array(&self) -> Array2<f32> {
        self.cells.map(Cell::value)
    }

    /// Numeric projection with the cell at `masked` reported as empty.
    pub fn to_array_masked(&self, masked: Option<Location>) -> Array2<f32> {
        let mut array = self.to_array();
        if let Some(loc) = masked {
            array[[loc.x, loc.y]] = 0.0;
        }
        array
    }
}

/// Draws the grid with the ceiling on top: `.` for empty cells, `@` for the
/// agent, and block ids otherwise.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..self.height()).rev().map(|y| {
            (0..self.width())
                .map(|x| match self.cells[[x, y]] {
                    Cell::Empty => format!("{:>3}", "."),
                    Cell::Agent(_) => format!("{:>3}", "@"),
                    Cell::Block(id) => format!("{:>3}", id),
                })
                .join("")
        });
        write!(f, "{}", rows.format("\n"))
    }
}
