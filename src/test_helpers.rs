use crate::geom::IPoint;
use crate::mode::{DeviceCaps, MappingMode};
use crate::state::MappingState;

/// 254 mm across 1000 pixels on both axes: one pixel per 0.254 mm.
pub const CAPS_254: DeviceCaps = DeviceCaps::new(254, 254, 1000, 1000);

/// 250 mm across 1000 pixels on both axes.
pub const SQUARE_CAPS: DeviceCaps = DeviceCaps::new(250, 250, 1000, 1000);

/// Fresh state switched to anisotropic mode; extents are still unit.
pub fn anisotropic_state() -> MappingState {
    let mut st = MappingState::new();
    st.set_mode(MappingMode::Anisotropic.raw(), &CAPS_254);
    st
}

/// Square grid of points covering `lo..=hi` on both axes with the given step.
pub fn point_grid(lo: i32, hi: i32, step: usize) -> Vec<IPoint> {
    assert!(lo <= hi && step > 0, "bad grid bounds");
    let mut out = Vec::new();
    for y in (lo..=hi).step_by(step) {
        for x in (lo..=hi).step_by(step) {
            out.push(IPoint::new(x, y));
        }
    }
    out
}
