//! Fixed-size cell grid
//!
//! Cells live in one flat array indexed by `x + y * width`. Row 0 is the top
//! of the grid, so "bottom" is `y + 1`. Neighbors are derived from the index,
//! never stored.

use std::fmt;

use bevy::prelude::*;

use crate::error::{FlowError, FlowResult};
use crate::math::{Coord, Real};

use super::cell::{Cell, CellType};

/// The four flow directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    /// Priority used by the flow engine: gravity first, then sideways, then
    /// pressure pushing upward.
    pub const FLOW_ORDER: [Direction; 4] = [
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
        Direction::Top,
    ];

    #[inline(always)]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Top => IVec2::new(0, -1),
            Direction::Bottom => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    #[inline(always)]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What to put on the outer ring of cells at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Solid walls around the grid, the usual sandbox setup
    #[default]
    Solid,
    /// Every cell starts fluid-capable; liquid simply stops at the edges
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    border: BorderPolicy,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u32, height: u32, border: BorderPolicy) -> FlowResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(FlowError::InvalidDimensions { width, height });
        }

        let len = width as usize * height as usize;
        let mut grid = Self {
            width,
            height,
            border,
            cells: vec![Cell::empty(); len],
        };

        if border == BorderPolicy::Solid {
            for index in 0..len {
                if grid.is_border(grid.coord_of(index)) {
                    grid.cells[index].set_type(CellType::Solid);
                }
            }
        }

        Ok(grid)
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    pub fn border(&self) -> BorderPolicy {
        self.border
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    /// True for cells on the outer ring.
    #[inline]
    pub fn is_border(&self, coord: Coord) -> bool {
        self.contains(coord)
            && (coord.x == 0
                || coord.y == 0
                || coord.x as u32 == self.width - 1
                || coord.y as u32 == self.height - 1)
    }

    /// Flat index of `coord`, or a coordinate error.
    #[inline]
    pub fn index_of(&self, coord: Coord) -> FlowResult<usize> {
        if self.contains(coord) {
            Ok(coord.x as usize + coord.y as usize * self.width as usize)
        } else {
            Err(FlowError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline(always)]
    pub fn coord_of(&self, index: usize) -> Coord {
        let width = self.width as usize;
        IVec2::new((index % width) as i32, (index / width) as i32)
    }

    /// Index of the neighbor of `index` in `direction`, `None` at the edge.
    #[inline]
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let width = self.width as usize;
        let x = index % width;
        let y = index / width;
        match direction {
            Direction::Top => (y > 0).then(|| index - width),
            Direction::Bottom => (y + 1 < self.height as usize).then(|| index + width),
            Direction::Left => (x > 0).then(|| index - 1),
            Direction::Right => (x + 1 < width).then(|| index + 1),
        }
    }

    /// Existing neighbors of `index` with their direction.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| Some((direction, self.neighbor(index, direction)?)))
    }

    /// Read-only cell query.
    pub fn cell(&self, coord: Coord) -> FlowResult<&Cell> {
        let index = self.index_of(coord)?;
        Ok(&self.cells[index])
    }

    #[inline(always)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    #[inline(always)]
    pub(crate) fn cell_at_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Add liquid at `coord`; wakes that cell only. Solid cells refuse it.
    pub fn add_liquid(&mut self, coord: Coord, amount: Real) -> FlowResult<()> {
        let index = self.index_of(coord)?;
        if self.cells[index].is_solid() {
            return Err(FlowError::SolidTarget {
                x: coord.x,
                y: coord.y,
            });
        }
        self.cells[index].add_liquid(amount);
        Ok(())
    }

    /// Change the type at `coord`. Wakes the cell and its direct neighbors,
    /// since flow into and out of it has to be re-evaluated. Returns the
    /// liquid removed by a solid conversion.
    pub fn set_cell_type(&mut self, coord: Coord, cell_type: CellType) -> FlowResult<Real> {
        let index = self.index_of(coord)?;
        let removed = self.cells[index].set_type(cell_type);
        self.cells[index].wake();
        self.wake_neighbors(index);
        Ok(removed)
    }

    /// Wake exactly the up-to-four direct neighbors of `index`.
    pub fn wake_neighbors(&mut self, index: usize) {
        for direction in Direction::ALL {
            if let Some(neighbor) = self.neighbor(index, direction) {
                self.cells[neighbor].wake();
            }
        }
    }

    pub fn total_liquid(&self) -> Real {
        self.cells.iter().map(Cell::liquid).sum()
    }

    pub fn awake_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_awake()).count()
    }
}

/// ASCII dump: `X` solid, `~` holding liquid, `.` empty.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for cell in row {
                let glyph = if cell.is_solid() {
                    'X'
                } else if cell.liquid() > 0.0 {
                    '~'
                } else {
                    '.'
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
