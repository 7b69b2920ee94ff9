//! Painting tool used by input layers
//!
//! Turns "paint at (x, y)" into calls on the simulation's mutation API.

use bevy::prelude::*;

use crate::core::{BorderPolicy, CellType, LiquidState};
use crate::error::FlowResult;
use crate::math::{Coord, Real};

pub const MIN_BRUSH_AMOUNT: Real = 0.1;
pub const MAX_BRUSH_AMOUNT: Real = 10.0;
pub const DEFAULT_BRUSH_AMOUNT: Real = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    #[default]
    Liquid,
    Solid,
    Erase,
}

impl BrushMode {
    pub fn label(self) -> &'static str {
        match self {
            BrushMode::Liquid => "liquid",
            BrushMode::Solid => "solid",
            BrushMode::Erase => "erase",
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Brush {
    pub mode: BrushMode,
    amount: Real,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            mode: BrushMode::default(),
            amount: DEFAULT_BRUSH_AMOUNT,
        }
    }
}

impl Brush {
    /// Liquid poured per application.
    pub fn amount(&self) -> Real {
        self.amount
    }

    pub fn set_amount(&mut self, amount: Real) {
        self.amount = amount.clamp(MIN_BRUSH_AMOUNT, MAX_BRUSH_AMOUNT);
    }

    pub fn adjust_amount(&mut self, delta: Real) {
        self.set_amount(self.amount + delta);
    }

    /// Cycle liquid -> solid -> erase -> liquid.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            BrushMode::Liquid => BrushMode::Solid,
            BrushMode::Solid => BrushMode::Erase,
            BrushMode::Erase => BrushMode::Liquid,
        };
    }

    pub fn apply(&self, state: &mut LiquidState, coord: Coord) -> FlowResult<()> {
        match self.mode {
            // Dragging across a wall just skips it.
            BrushMode::Liquid if state.cell(coord)?.is_solid() => Ok(()),
            BrushMode::Liquid => state.add_liquid(coord, self.amount),
            BrushMode::Solid => state.set_cell_type(coord, CellType::Solid),
            BrushMode::Erase => {
                let grid = state.grid();
                // Keep the containing walls intact.
                if grid.border() == BorderPolicy::Solid && grid.is_border(coord) {
                    return Ok(());
                }
                state.clear_cell(coord)
            }
        }
    }
}
