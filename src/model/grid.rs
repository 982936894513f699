//! Column-major cell storage shared by the frame and modifier layers.

use std::ops::{Index, IndexMut};

/// A `columns × rows` grid stored column by column (`x * rows + y`), the same
/// order the map file lists its cells in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    columns: usize,
    rows: usize,
    cells: Vec<T>,
}

/// Number of cells along an axis whose coordinates run `0..=extent`.
/// Anything below zero collapses to an empty axis.
pub fn span(extent: i32) -> usize {
    usize::try_from(i64::from(extent) + 1).unwrap_or(0)
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![T::default(); columns * rows],
        }
    }

    /// Grid covering `0..=width` × `0..=height`.
    pub fn spanning(width: i32, height: i32) -> Self {
        Self::new(span(width), span(height))
    }
}

impl<T> Grid<T> {
    /// Wraps column-major cells. Returns `None` if the length doesn't match.
    pub fn from_cells(columns: usize, rows: usize, cells: Vec<T>) -> Option<Self> {
        (columns.checked_mul(rows)? == cells.len()).then_some(Self {
            columns,
            rows,
            cells,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.columns && y < self.rows).then_some(x * self.rows + y)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Cells in file order, with their `(x, y)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let rows = self.rows.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / rows, i % rows), cell))
    }

    /// One column, top to bottom.
    pub fn column(&self, x: usize) -> &[T] {
        &self.cells[x * self.rows..(x + 1) * self.rows]
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        match self.index_of(x, y) {
            Some(i) => &self.cells[i],
            None => panic!(
                "cell ({x}, {y}) outside {}x{} grid",
                self.columns, self.rows
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        match self.index_of(x, y) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "cell ({x}, {y}) outside {}x{} grid",
                self.columns, self.rows
            ),
        }
    }
}
