use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::prelude::*;
use cellflow::{BorderPolicy, FlowParams, LiquidPlugin, LiquidState, coord};

const GRID_SIZE: u32 = 128;
const MEASURED_STEPS: usize = 100;

// Memory tracking allocator
struct TrackingAllocator;

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ret = unsafe { System.alloc(layout) };
        if !ret.is_null() {
            ALLOCATED.fetch_add(layout.size(), Ordering::SeqCst);
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        ret
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        ALLOCATED.fetch_sub(layout.size(), Ordering::SeqCst);
    }
}

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn get_memory_usage() -> usize {
    ALLOCATED.load(Ordering::SeqCst)
}

fn get_allocation_count() -> usize {
    ALLOCATIONS.load(Ordering::SeqCst)
}

fn pour_initial_block(state: &mut LiquidState) {
    for x in 1..GRID_SIZE as i32 - 1 {
        for y in 1..GRID_SIZE as i32 / 2 {
            if let Err(err) = state.add_liquid(coord(x, y), 1.0) {
                println!("pour failed: {err}");
            }
        }
    }
}

fn memory_benchmark_system(mut state: ResMut<LiquidState>, mut frame_count: Local<u32>) {
    *frame_count += 1;

    if *frame_count == 1 {
        pour_initial_block(&mut state);
        println!("Initial memory usage: {} KB", get_memory_usage() / 1024);
    } else if *frame_count == 10 {
        // Steps run directly here so scheduler allocations stay out of the count.
        let memory_before = get_memory_usage();
        let allocations_before = get_allocation_count();
        for _ in 0..MEASURED_STEPS {
            state.step();
        }
        let allocations = get_allocation_count() - allocations_before;
        let memory_after = get_memory_usage();

        println!("Memory after warmup: {} KB", memory_before / 1024);
        println!("Memory after {MEASURED_STEPS} steps: {} KB", memory_after / 1024);
        println!(
            "Awake cells: {}/{}",
            state.awake_cell_count(),
            state.grid().len()
        );
        println!(
            "Estimated cell storage: {} KB",
            (state.grid().len() * std::mem::size_of::<cellflow::Cell>()) / 1024
        );
        println!("Allocations during stepping: {allocations}");
        assert_eq!(allocations, 0, "stepping must not allocate");

        std::process::exit(0);
    }
}

fn main() {
    let initial_baseline = get_memory_usage();
    println!("Baseline memory: {} KB", initial_baseline / 1024);

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(LiquidPlugin {
            width: GRID_SIZE,
            height: GRID_SIZE,
            border: BorderPolicy::Solid,
            params: FlowParams::default(),
            tick_hz: 60.0,
        })
        .add_systems(Update, memory_benchmark_system)
        .run();
}
