use bevy::log::{debug, info};
use bevy::prelude::*;

use crate::config::FlowParams;
use crate::error::{FlowError, FlowResult};
use crate::math::{Coord, Real};
use crate::solver::{FlowEngine, StepStats};

use super::cell::{Cell, CellType};
use super::grid::{BorderPolicy, Grid};

/// Aggregate simulation state: the grid, the engine that steps it, and the
/// parameters it runs with. Renderers read through `&self`; input goes
/// through the checked mutation methods, so nothing can touch cells mid-step.
#[derive(Resource, Debug, Clone)]
pub struct LiquidState {
    grid: Grid,
    engine: FlowEngine,
    params: FlowParams,
    total_liquid: Real,
    last_stats: StepStats,
    steps: u64,
}

impl LiquidState {
    pub fn new(
        width: u32,
        height: u32,
        border: BorderPolicy,
        params: FlowParams,
    ) -> FlowResult<Self> {
        params.validate()?;
        let grid = Grid::new(width, height, border)?;
        info!("liquid grid {}x{} initialized ({:?} border)", width, height, border);

        Ok(Self {
            engine: FlowEngine::new(grid.len()),
            grid,
            params,
            total_liquid: 0.0,
            last_stats: StepStats::default(),
            steps: 0,
        })
    }

    pub fn with_defaults(width: u32, height: u32, border: BorderPolicy) -> FlowResult<Self> {
        Self::new(width, height, border, FlowParams::default())
    }

    /// Advance one tick.
    pub fn step(&mut self) -> StepStats {
        let stats = self.engine.step(&mut self.grid, &self.params);
        self.total_liquid = self.engine.total_liquid();
        self.last_stats = stats;
        self.steps += 1;
        stats
    }

    /// Pour `amount` into the cell at `coord`. Negative amounts remove liquid
    /// and are clamped at the next commit. Non-finite amounts and solid
    /// targets are rejected.
    pub fn add_liquid(&mut self, coord: Coord, amount: Real) -> FlowResult<()> {
        if !amount.is_finite() {
            return Err(FlowError::NonFiniteAmount(amount));
        }
        self.grid.add_liquid(coord, amount)?;
        self.total_liquid += amount;
        Ok(())
    }

    pub fn set_cell_type(&mut self, coord: Coord, cell_type: CellType) -> FlowResult<()> {
        let removed = self.grid.set_cell_type(coord, cell_type)?;
        self.total_liquid -= removed;
        Ok(())
    }

    /// Eraser: make the cell fluid-capable and empty.
    pub fn clear_cell(&mut self, coord: Coord) -> FlowResult<()> {
        self.set_cell_type(coord, CellType::FluidCapable)?;
        let index = self.grid.index_of(coord)?;
        self.total_liquid -= self.grid.cell_at_mut(index).clear_liquid();
        Ok(())
    }

    pub fn cell(&self, coord: Coord) -> FlowResult<&Cell> {
        self.grid.cell(coord)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Total liquid on the grid, kept current between steps.
    pub fn total_fluid_quantity(&self) -> Real {
        self.total_liquid
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    /// Swap in new tunables; the old ones stay if validation fails.
    pub fn set_params(&mut self, params: FlowParams) -> FlowResult<()> {
        params.validate()?;
        debug!("liquid params updated: {:?}", params);
        self.params = params;
        Ok(())
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn awake_cell_count(&self) -> usize {
        self.grid.awake_count()
    }
}

pub fn step_liquid(mut state: ResMut<LiquidState>) {
    state.step();
}

pub fn log_liquid_diagnostics(state: Res<LiquidState>, mut frame: Local<u32>) {
    const SAMPLE_PERIOD: u32 = 60;

    if *frame % SAMPLE_PERIOD == 0 {
        let stats = state.last_stats();
        debug!(
            "[step {:06}] total={:.3} awake={} processed={} sleeping={} moved={:.3} dust={:.5}",
            state.step_count(),
            state.total_fluid_quantity(),
            state.awake_cell_count(),
            stats.processed,
            stats.sleeping,
            stats.transferred,
            stats.dust,
        );
    }

    *frame = frame.wrapping_add(1);
}
