use bevy::math::IVec2;

pub type Real = f32;

/// Cell coordinates. Signed so that out-of-range queries (e.g. `x - 1` at the
/// left edge) are representable and rejected instead of wrapping.
pub type Coord = IVec2;

#[inline(always)]
pub fn coord(x: i32, y: i32) -> Coord {
    IVec2::new(x, y)
}

#[inline(always)]
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}

/// Relative comparison used by diagnostics and tests; liquid totals drift by
/// float rounding only.
#[inline]
pub fn approx_eq(a: Real, b: Real, tolerance: Real) -> bool {
    (a - b).abs() <= tolerance * (1.0 + a.abs().max(b.abs()))
}
