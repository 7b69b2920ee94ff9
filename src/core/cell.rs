//! A single grid slot: what it is, how much liquid it holds, and whether the
//! flow engine still needs to look at it.

use crate::math::Real;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    #[default]
    FluidCapable,
    Solid,
}

/// Sleep state used to skip settled cells.
///
/// `Cooling(n)` counts consecutive quiet steps; the counter only exists while
/// cooling, so waking always starts the count from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettleStatus {
    #[default]
    Awake,
    Cooling(u32),
    Asleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    cell_type: CellType,
    liquid: Real,
    status: SettleStatus,
}

impl Cell {
    #[inline(always)]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn solid() -> Self {
        Self {
            cell_type: CellType::Solid,
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    #[inline(always)]
    pub fn liquid(&self) -> Real {
        self.liquid
    }

    #[inline(always)]
    pub fn settle_status(&self) -> SettleStatus {
        self.status
    }

    #[inline(always)]
    pub fn is_solid(&self) -> bool {
        self.cell_type == CellType::Solid
    }

    #[inline(always)]
    pub fn is_fluid_capable(&self) -> bool {
        self.cell_type == CellType::FluidCapable
    }

    #[inline(always)]
    pub fn is_asleep(&self) -> bool {
        self.status == SettleStatus::Asleep
    }

    #[inline(always)]
    pub fn is_awake(&self) -> bool {
        !self.is_asleep()
    }

    /// Add (or, for negative amounts, remove) liquid. No clamping happens
    /// here; the next commit clears anything below the dust cutoff.
    pub fn add_liquid(&mut self, amount: Real) {
        self.liquid += amount;
        self.wake();
    }

    /// Change the type. Turning a cell solid drops its liquid, which is
    /// returned so the caller can keep totals in sync.
    pub fn set_type(&mut self, cell_type: CellType) -> Real {
        self.cell_type = cell_type;
        if cell_type == CellType::Solid {
            self.clear_liquid()
        } else {
            0.0
        }
    }

    /// Drop all liquid, returning what was removed.
    #[inline]
    pub fn clear_liquid(&mut self) -> Real {
        std::mem::take(&mut self.liquid)
    }

    #[inline(always)]
    pub(crate) fn apply_delta(&mut self, delta: Real) {
        self.liquid += delta;
    }

    /// Post: `Awake`, cooling counter discarded.
    #[inline(always)]
    pub fn wake(&mut self) {
        self.status = SettleStatus::Awake;
    }

    /// Record one quiet step.
    ///
    /// Pre: cell is not asleep (asleep cells are never evaluated).
    /// Post: `Cooling(n)` with `n` quiet steps so far, or `Asleep` once `n`
    /// reaches `settle_threshold`.
    pub fn tick_cooling(&mut self, settle_threshold: u32) {
        let quiet_steps = match self.status {
            SettleStatus::Awake => 1,
            SettleStatus::Cooling(count) => count.saturating_add(1),
            SettleStatus::Asleep => return,
        };
        if quiet_steps >= settle_threshold {
            self.sleep();
        } else {
            self.status = SettleStatus::Cooling(quiet_steps);
        }
    }

    /// Only the engine's settle decision puts a cell to sleep.
    #[inline(always)]
    pub(crate) fn sleep(&mut self) {
        self.status = SettleStatus::Asleep;
    }
}
