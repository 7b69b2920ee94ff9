//! End-to-end scenarios for the liquid automaton, driven through the public
//! `LiquidState` API only.

use cellflow::math::approx_eq;
use cellflow::{BorderPolicy, CellType, FlowParams, LiquidState, Real, SettleStatus, coord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn deep_params() -> FlowParams {
    FlowParams {
        max_liquid: 2.0,
        min_liquid: 0.005,
        min_flow_threshold: 0.005,
        max_compression: 0.25,
        max_flow_per_step: 9.0,
        flow_speed: 1.0,
        ..FlowParams::default()
    }
}

/// Seeded sandbox: solid border, a few random walls, random puddles.
fn random_scene(seed: u64, width: u32, height: u32) -> LiquidState {
    let mut state = LiquidState::with_defaults(width, height, BorderPolicy::Solid).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..(width * height / 8) {
        let position = coord(
            rng.random_range(1..width as i32 - 1),
            rng.random_range(1..height as i32 - 1),
        );
        if rng.random_bool(0.3) {
            state.set_cell_type(position, CellType::Solid).unwrap();
        } else if !state.cell(position).unwrap().is_solid() {
            state
                .add_liquid(position, rng.random_range(0.1..3.0))
                .unwrap();
        }
    }
    state
}

#[test]
fn worked_scenario_matches_hand_computation() {
    // C at the top of a 3x2 open grid: bottom, left, right exist, top does not.
    let mut state = LiquidState::new(3, 2, BorderPolicy::Open, deep_params()).unwrap();
    state.add_liquid(coord(1, 0), 5.0).unwrap();

    state.step();

    assert_eq!(state.cell(coord(1, 1)).unwrap().liquid(), 2.625);
    assert_eq!(state.cell(coord(0, 0)).unwrap().liquid(), 0.59375);
    assert_eq!(state.cell(coord(2, 0)).unwrap().liquid(), 0.4453125);
    assert_eq!(state.cell(coord(1, 0)).unwrap().liquid(), 1.3359375);
    assert_eq!(state.total_fluid_quantity(), 5.0);

    // C moved a lot, so it stays awake and its neighbors were woken.
    assert_eq!(
        state.cell(coord(1, 0)).unwrap().settle_status(),
        SettleStatus::Awake
    );
    for neighbor in [coord(0, 0), coord(2, 0), coord(1, 1)] {
        assert!(state.cell(neighbor).unwrap().is_awake());
    }
}

#[test]
fn identical_scenes_evolve_identically() {
    let mut a = random_scene(42, 24, 16);
    let mut b = random_scene(42, 24, 16);

    for _ in 0..200 {
        a.step();
        b.step();
    }

    for (left, right) in a.grid().cells().iter().zip(b.grid().cells()) {
        assert_eq!(left.cell_type(), right.cell_type());
        assert_eq!(left.liquid().to_bits(), right.liquid().to_bits());
        assert_eq!(left.settle_status(), right.settle_status());
    }
    assert_eq!(
        a.total_fluid_quantity().to_bits(),
        b.total_fluid_quantity().to_bits()
    );
}

#[test]
fn isolated_cell_falls_asleep_after_threshold() {
    let params = FlowParams::default().with_settle_threshold(4);
    let mut state = LiquidState::new(3, 3, BorderPolicy::Solid, params).unwrap();
    state.add_liquid(coord(1, 1), 1.0).unwrap();

    for step in 1..4 {
        state.step();
        assert_eq!(
            state.cell(coord(1, 1)).unwrap().settle_status(),
            SettleStatus::Cooling(step)
        );
    }
    state.step();
    assert!(state.cell(coord(1, 1)).unwrap().is_asleep());

    // Asleep cells are skipped but keep their liquid.
    let stats = state.step();
    assert_eq!(stats.sleeping, 1);
    assert_eq!(stats.processed, 0);
    assert_eq!(state.cell(coord(1, 1)).unwrap().liquid(), 1.0);

    state.add_liquid(coord(1, 1), 0.5).unwrap();
    assert!(state.cell(coord(1, 1)).unwrap().is_awake());
}

#[test]
fn a_settled_pool_goes_to_sleep() {
    let mut state = LiquidState::with_defaults(12, 8, BorderPolicy::Solid).unwrap();
    for x in 1..11 {
        state.add_liquid(coord(x, 6), 0.5).unwrap();
    }

    for _ in 0..100 {
        state.step();
    }

    let awake_with_liquid = state
        .grid()
        .cells()
        .iter()
        .filter(|cell| cell.liquid() > 0.0 && cell.is_awake())
        .count();
    assert_eq!(awake_with_liquid, 0);
    assert!(state.total_fluid_quantity() > 0.0);
}

#[test]
fn disturbance_wakes_at_most_one_hop() {
    let params = FlowParams::default().with_settle_threshold(1);
    let mut state = LiquidState::new(9, 9, BorderPolicy::Solid, params).unwrap();
    // A full, walled-in floor row settles immediately.
    for x in 1..8 {
        state.add_liquid(coord(x, 7), 1.0).unwrap();
    }
    for _ in 0..50 {
        state.step();
    }
    let asleep_before: Vec<bool> = state.grid().cells().iter().map(|c| c.is_asleep()).collect();
    assert!(asleep_before.iter().any(|&asleep| asleep));

    state.set_cell_type(coord(4, 7), CellType::Solid).unwrap();

    let grid = state.grid();
    for (index, cell) in grid.cells().iter().enumerate() {
        let offset = grid.coord_of(index) - coord(4, 7);
        let hops = offset.x.abs() + offset.y.abs();
        if hops >= 2 {
            assert_eq!(
                cell.is_asleep(),
                asleep_before[index],
                "cell {} changed state",
                grid.coord_of(index)
            );
        } else {
            assert!(cell.is_awake());
        }
    }
}

#[test]
fn edges_without_walls_never_leak_or_panic() {
    let mut state = LiquidState::with_defaults(5, 4, BorderPolicy::Open).unwrap();
    for x in 0..5 {
        state.add_liquid(coord(x, 0), 2.0).unwrap();
        state.add_liquid(coord(x, 3), 2.0).unwrap();
    }
    for y in 0..4 {
        state.add_liquid(coord(0, y), 1.0).unwrap();
        state.add_liquid(coord(4, y), 1.0).unwrap();
    }
    let initial = state.total_fluid_quantity();

    let mut dust = 0.0;
    for _ in 0..300 {
        dust += state.step().dust;
        for cell in state.grid().cells() {
            assert!(cell.liquid() >= 0.0);
        }
    }

    assert!(approx_eq(state.total_fluid_quantity() + dust, initial, 1.0e-3));
}

#[test]
fn liquid_pools_at_the_bottom() {
    let mut state = LiquidState::with_defaults(7, 8, BorderPolicy::Solid).unwrap();
    state.add_liquid(coord(3, 1), 3.0).unwrap();

    for _ in 0..500 {
        state.step();
    }

    let grid = state.grid();
    let row_total = |y: i32| -> Real {
        (0..7)
            .map(|x| grid.cell(coord(x, y)).unwrap().liquid())
            .sum()
    };
    // Three units over a five-wide floor: the bottom row holds the bulk.
    assert!(row_total(6) > 2.0, "floor row holds {}", row_total(6));
    assert!(row_total(1) < 0.05);
}

#[test]
fn solid_cells_stay_dry() {
    let mut state = random_scene(7, 20, 20);
    for _ in 0..100 {
        state.step();
        for cell in state.grid().cells() {
            if cell.cell_type() == CellType::Solid {
                assert_eq!(cell.liquid(), 0.0);
            }
        }
    }
}

#[test]
fn coordinate_errors_are_reported() {
    let mut state = LiquidState::with_defaults(4, 4, BorderPolicy::Solid).unwrap();
    assert!(state.add_liquid(coord(4, 4), 1.0).unwrap_err().is_coordinate());
    assert!(
        state
            .set_cell_type(coord(-1, 0), CellType::Solid)
            .unwrap_err()
            .is_coordinate()
    );
    assert!(state.cell(coord(0, 10)).unwrap_err().is_coordinate());
}
