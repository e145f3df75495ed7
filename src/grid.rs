use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::Coord;
use crate::ErrorKind;

/// The 8 offsets of the Moore neighbourhood.
const DIRECTIONS: [(Coord, Coord); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid dimensions {width}x{height}: both must be positive and fit in memory")]
    InvalidDimensions { width: i64, height: i64 },
}

impl GridError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
        }
    }
}

/// A buffer of `len` copies of `value`, or `None` if it can't be allocated.
fn buffer<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, value);

    Some(buf)
}

/// A fixed-size Game of Life field with hard edges.
///
/// Cells are stored row-major in flat buffers, a cell `(x, y)` living at `x + width * y`. Anything
/// outside `0..width` by `0..height` is dead and can't be written to.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,

    /// Current generation. `true` if the cell is alive.
    cells: Vec<bool>,

    /// Next generation, written by [`Grid::step`] and then swapped with `cells`.
    next: Vec<bool>,

    /// Live neighbour count of every cell, recomputed each step.
    neighbours: Vec<u8>,

    generation: u64,
}

impl Grid {
    /// Create an empty grid of `width` by `height` cells.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        };

        if width == 0 || height == 0 {
            return Err(invalid);
        }

        let Some(len) = (width as usize).checked_mul(height as usize) else {
            return Err(invalid);
        };

        let (Some(cells), Some(next), Some(neighbours)) =
            (buffer(len, false), buffer(len, false), buffer(len, 0))
        else {
            return Err(invalid);
        };

        Ok(Self {
            width,
            height,
            cells,
            next,
            neighbours,
            generation: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of generations computed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Buffer index of `(x, y)`, or `None` if it lies outside the grid.
    fn index(&self, x: Coord, y: Coord) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as Coord || y >= self.height as Coord {
            return None;
        }

        Some(x as usize + self.width as usize * y as usize)
    }

    /// Set the cell at `(x, y)`. Returns `false`, leaving the grid untouched, if `(x, y)` is out
    /// of bounds.
    pub fn set_cell(&mut self, x: Coord, y: Coord, alive: bool) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };

        self.cells[i] = alive;

        true
    }

    /// Read the cell at `(x, y)`. Out of bounds cells are always dead.
    pub fn get_cell(&self, x: Coord, y: Coord) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Alias of [`Grid::get_cell`] for renderers.
    pub fn is_alive(&self, x: Coord, y: Coord) -> bool {
        self.get_cell(x, y)
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.generation = 0;
    }

    fn count_neighbours(&self, x: Coord, y: Coord) -> u8 {
        DIRECTIONS
            .iter()
            .filter(|&&(dx, dy)| self.get_cell(x + dx, y + dy))
            .count() as u8
    }

    /// Advance the grid by one generation.
    ///
    /// The whole next generation is computed from the current one before anything is replaced, so
    /// no cell ever sees an already updated neighbour.
    pub fn step(&mut self) {
        let (w, h) = (self.width as Coord, self.height as Coord);

        for y in 0..h {
            for x in 0..w {
                let i = (x + w * y) as usize;
                self.neighbours[i] = self.count_neighbours(x, y);
            }
        }

        for ((next, &alive), &n) in self.next.iter_mut().zip(&self.cells).zip(&self.neighbours) {
            *next = matches!((alive, n), (true, 2 | 3) | (false, 3));
        }

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;

        trace!(generation = self.generation, "Stepped grid");
    }
}

/// Dimensions and live cells are compared; scratch buffers and the generation counter are not.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}

/// Renders the grid one row per line, `O` for live cells and `.` for dead ones.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(|&c| if c { 'O' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}
