//! Zero out tile frames that a client doesn't need.
//!
//! A cell keeps its frame when it carries a modifier, and so does the one
//! neighbour its modification frame points at: decorations are drawn over
//! that pair, so clearing either would show through before the server
//! rebuilds the map.

use crate::model::MapDocument;

/// Neighbour a modification frame points at, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Compass {
    #[default]
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Compass {
    /// Frames wrap every eight steps.
    pub fn from_frame(frame: u8) -> Self {
        match frame % 8 {
            0 => Self::North,
            1 => Self::NorthEast,
            2 => Self::East,
            3 => Self::SouthEast,
            4 => Self::South,
            5 => Self::SouthWest,
            6 => Self::West,
            _ => Self::NorthWest,
        }
    }

    /// `(dx, dy)` with `y` growing southwards.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

/// Cells whose frame survives, laid out like the frame grid.
struct ExceptionGrid {
    rows: usize,
    keep: Vec<bool>,
}

impl ExceptionGrid {
    fn new(columns: usize, rows: usize) -> Self {
        Self {
            rows,
            keep: vec![false; columns * rows],
        }
    }

    fn mark(&mut self, x: usize, y: usize) {
        self.keep[x * self.rows + y] = true;
    }

    /// Mark the cell `(dx, dy)` away from `(x, y)`.
    ///
    /// The step goes through the flat column-major index without clamping:
    /// stepping off the top or bottom of a column lands on the far end of
    /// the neighbouring column. Only indices outside the whole grid are
    /// dropped.
    fn mark_offset(&mut self, x: usize, y: usize, (dx, dy): (i64, i64)) {
        let index = (x as i64 + dx) * self.rows as i64 + (y as i64 + dy);
        if let Some(cell) = usize::try_from(index).ok().and_then(|i| self.keep.get_mut(i)) {
            *cell = true;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripReport {
    /// Frames set to zero by this pass, including ones that already were.
    pub cleared: usize,
    /// Frames left alone.
    pub kept: usize,
}

/// Clear every tile frame that isn't needed to anchor a modifier.
///
/// Only `tile_frame` changes. Running it again is a no-op, since the
/// exceptions come from the modifier layer which this never touches.
pub fn strip_tiles(doc: &mut MapDocument) -> StripReport {
    let frames = &mut doc.tile_frame;
    let mut exceptions = ExceptionGrid::new(frames.columns(), frames.rows());

    if doc.use_modifiers {
        if let Some(modifiers) = &doc.modifiers {
            for ((x, y), modifier) in modifiers.iter().filter(|(_, m)| !m.is_none()) {
                exceptions.mark(x, y);
                let direction = Compass::from_frame(modifier.modification_frame());
                exceptions.mark_offset(x, y, direction.offset());
            }
        }
    }

    let mut report = StripReport::default();
    for (frame, keep) in frames.cells_mut().iter_mut().zip(&exceptions.keep) {
        if *keep {
            report.kept += 1;
        } else {
            *frame = 0;
            report.cleared += 1;
        }
    }
    report
}
