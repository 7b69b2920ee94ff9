//! Per-step flow computation
//!
//! A step runs in two phases. The scan reads the pre-step grid and stages
//! every transfer in a private delta buffer; only the commit pass writes
//! liquid back. A cell drained early in the scan therefore still looks full
//! to cells examined later in the same step.

use bevy::log::trace;

use crate::config::FlowParams;
use crate::core::{Direction, Grid};
use crate::math::Real;

use super::equilibrium::vertical_equilibrium;

/// What a single step did, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Cells whose outflow was evaluated
    pub processed: usize,
    /// Cells with liquid that were skipped because they are asleep
    pub sleeping: usize,
    /// Liquid moved between cells
    pub transferred: Real,
    /// Liquid removed for falling below `min_liquid`
    pub dust: Real,
}

#[derive(Debug, Clone, Default)]
pub struct FlowEngine {
    deltas: Vec<Real>,
    total_liquid: Real,
}

impl FlowEngine {
    pub fn new(cell_count: usize) -> Self {
        Self {
            deltas: vec![0.0; cell_count],
            total_liquid: 0.0,
        }
    }

    /// Total liquid as of the last commit.
    pub fn total_liquid(&self) -> Real {
        self.total_liquid
    }

    /// Advance `grid` by one tick.
    pub fn step(&mut self, grid: &mut Grid, params: &FlowParams) -> StepStats {
        self.reset_deltas(grid.len());

        let mut stats = StepStats::default();
        for index in 0..grid.len() {
            self.compute_cell(grid, params, index, &mut stats);
        }
        self.commit(grid, params, &mut stats);

        trace!(
            "liquid step: processed={} sleeping={} transferred={:.4} dust={:.6} total={:.4}",
            stats.processed,
            stats.sleeping,
            stats.transferred,
            stats.dust,
            self.total_liquid
        );
        stats
    }

    fn reset_deltas(&mut self, len: usize) {
        if self.deltas.len() == len {
            self.deltas.fill(0.0);
        } else {
            self.deltas.clear();
            self.deltas.resize(len, 0.0);
        }
    }

    fn compute_cell(
        &mut self,
        grid: &mut Grid,
        params: &FlowParams,
        index: usize,
        stats: &mut StepStats,
    ) {
        let cell = grid.cells()[index];

        if cell.is_solid() {
            stats.dust += grid.cell_at_mut(index).clear_liquid();
            return;
        }
        let liquid = cell.liquid();
        if liquid < params.min_liquid || liquid == 0.0 {
            return;
        }
        if cell.is_asleep() {
            stats.sleeping += 1;
            return;
        }
        stats.processed += 1;

        let initial = liquid;
        let mut remaining = liquid;

        for direction in Direction::FLOW_ORDER {
            let Some(target) = grid.neighbor(index, direction) else {
                continue;
            };
            let neighbor = grid.cells()[target];
            if !neighbor.is_fluid_capable() {
                continue;
            }
            let neighbor_liquid = neighbor.liquid();

            let raw = match direction {
                Direction::Bottom => {
                    vertical_equilibrium(remaining, neighbor_liquid, params) - neighbor_liquid
                }
                Direction::Left | Direction::Right => {
                    (remaining - neighbor_liquid) / params.lateral_damping
                }
                Direction::Top => {
                    remaining - vertical_equilibrium(remaining, neighbor_liquid, params)
                }
            };
            let flow = params.limit_flow(raw, remaining);

            if flow != 0.0 {
                remaining -= flow;
                self.deltas[index] -= flow;
                self.deltas[target] += flow;
                grid.cell_at_mut(target).wake();
                stats.transferred += flow;
            }

            if remaining < params.min_liquid {
                // Emptied: drop the residue and stop, no further directions.
                self.deltas[index] -= remaining;
                stats.dust += remaining;
                return;
            }
        }

        if (initial - remaining).abs() >= params.clumping_epsilon {
            // Still moving, neighbors must look again. The cell's own quiet
            // count is left alone; only incoming flow or input wakes it.
            grid.wake_neighbors(index);
        } else {
            grid.cell_at_mut(index).tick_cooling(params.settle_threshold);
        }
    }

    fn commit(&mut self, grid: &mut Grid, params: &FlowParams, stats: &mut StepStats) {
        let mut total = 0.0;
        for (cell, &delta) in grid.cells_mut().iter_mut().zip(&self.deltas) {
            cell.apply_delta(delta);
            if cell.is_solid() {
                stats.dust += cell.clear_liquid();
            } else if cell.liquid() < params.min_liquid {
                stats.dust += cell.clear_liquid();
                cell.wake();
            }
            total += cell.liquid();
        }
        self.total_liquid = total;
    }
}
