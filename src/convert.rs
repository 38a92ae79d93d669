//! Batch point conversion between logical and device space.
//!
//! On the `Ratio` path each axis is `(p - from_org) * to_ext / from_ext + to_org`,
//! multiplied in 64-bit and truncated toward zero. The `Affine` path applies the
//! cached matrix and rounds half up. Neither direction is an exact inverse of the
//! other: a logical->device->logical round trip may drift by one unit per axis.

use crate::error::{MapError, MapResult};
use crate::geom::{Ext, IPoint, saturate_i32};
use crate::state::{ConversionPath, MappingState};
use tracing::trace;

/// `truncate((v - from_org) * to_ext / from_ext) + to_org`, saturated to `i32`.
#[inline]
fn ratio_axis(v: i32, from_org: i32, from_ext: i32, to_ext: i32, to_org: i32) -> i32 {
    let scaled = (v as i64 - from_org as i64) * to_ext as i64 / from_ext as i64;
    saturate_i32(scaled + to_org as i64)
}

fn ratio_map(points: &mut [IPoint], from_org: IPoint, from_ext: Ext, to_ext: Ext, to_org: IPoint) {
    for p in points.iter_mut() {
        p.x = ratio_axis(p.x, from_org.x, from_ext.cx, to_ext.cx, to_org.x);
        p.y = ratio_axis(p.y, from_org.y, from_ext.cy, to_ext.cy, to_org.y);
    }
}

/// Converts logical points to device points in place.
pub fn lp_to_dp(state: &MappingState, points: &mut [IPoint]) {
    if points.is_empty() {
        return;
    }
    let xforms = state.xforms();
    trace!(n = points.len(), path = ?xforms.path, "lp_to_dp");
    match xforms.path {
        ConversionPath::Ratio => ratio_map(
            points,
            state.window_org(),
            state.window_ext(),
            state.viewport_ext(),
            state.viewport_org(),
        ),
        ConversionPath::Affine => {
            for p in points.iter_mut() {
                *p = xforms.forward.transform_ipoint(*p);
            }
        }
    }
}

/// Converts device points to logical points in place.
///
/// Fails with `NotInvertible`, leaving `points` untouched, when the composed
/// transform has no inverse. That check runs first, so an empty batch fails too.
pub fn dp_to_lp(state: &MappingState, points: &mut [IPoint]) -> MapResult<()> {
    let xforms = state.xforms();
    if !xforms.inverse_valid {
        return Err(MapError::NotInvertible);
    }
    if points.is_empty() {
        return Ok(());
    }
    trace!(n = points.len(), path = ?xforms.path, "dp_to_lp");
    match xforms.path {
        ConversionPath::Ratio => ratio_map(
            points,
            state.viewport_org(),
            state.viewport_ext(),
            state.window_ext(),
            state.window_org(),
        ),
        ConversionPath::Affine => {
            for p in points.iter_mut() {
                *p = xforms.inverse.transform_ipoint(*p);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::MappingMode;
    use crate::test_helpers::{CAPS_254, anisotropic_state, point_grid};
    use crate::xform::{GraphicsMode, XForm};

    #[test]
    fn unit_mapping_is_identity() {
        let st = MappingState::new();
        let original = point_grid(-1000, 1000, 97);
        let mut pts = original.clone();
        lp_to_dp(&st, &mut pts);
        assert_eq!(pts, original);
        dp_to_lp(&st, &mut pts).unwrap();
        assert_eq!(pts, original);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let st = MappingState::new();
        let mut pts: Vec<IPoint> = Vec::new();
        lp_to_dp(&st, &mut pts);
        dp_to_lp(&st, &mut pts).unwrap();
        assert!(pts.is_empty());
    }

    #[test]
    fn ratio_path_truncates_toward_zero() {
        let mut st = anisotropic_state();
        st.set_window_ext(3, 3, &CAPS_254).unwrap();
        st.set_viewport_ext(2, -2, &CAPS_254).unwrap();
        st.set_viewport_org(100, 100);

        let mut pts = vec![IPoint::new(2, 2), IPoint::new(-2, -2), IPoint::new(3, 3)];
        lp_to_dp(&st, &mut pts);
        // 2*2/3 = 1.33 -> 1, -2*2/3 -> -1, 2*-2/3 -> -1
        assert_eq!(pts, vec![IPoint::new(101, 99), IPoint::new(99, 101), IPoint::new(102, 98)]);
    }

    #[test]
    fn lometric_flips_y_around_viewport_origin() {
        let mut st = MappingState::new();
        st.set_mode(MappingMode::LoMetric.raw(), &CAPS_254);
        st.set_viewport_org(0, 500);
        // 254 logical (0.1 mm) units map onto 100 device pixels.
        let mut pts = vec![IPoint::new(254, 254), IPoint::new(0, 0)];
        lp_to_dp(&st, &mut pts);
        assert_eq!(pts, vec![IPoint::new(100, 400), IPoint::new(0, 500)]);
    }

    #[test]
    fn extended_precision_avoids_overflow() {
        let mut st = anisotropic_state();
        st.set_window_ext(1, 1, &CAPS_254).unwrap();
        st.set_viewport_ext(1_000_000, 1_000_000, &CAPS_254).unwrap();
        st.set_window_org(0, 0);
        let mut pts = vec![IPoint::new(3000, -3000)];
        lp_to_dp(&st, &mut pts);
        assert_eq!(pts, vec![IPoint::new(i32::MAX, i32::MIN)]);

        st.set_window_ext(1_000_000, 1_000_000, &CAPS_254).unwrap();
        st.set_viewport_ext(3, 3, &CAPS_254).unwrap();
        let mut pts = vec![IPoint::new(2_000_000_000, -2_000_000_000)];
        lp_to_dp(&st, &mut pts);
        assert_eq!(pts, vec![IPoint::new(6000, -6000)]);
    }

    #[test]
    fn round_trip_drifts_at_most_one_unit() {
        let window_exts = [(1, 1), (3, -7), (10, 10), (-25, 4)];
        let viewport_scales = [1, 2, 3, 17];
        let origins = [(0, 0), (13, -7), (-500, 250)];
        let grid = point_grid(-300, 300, 37);

        for (wx, wy) in window_exts {
            for k in viewport_scales {
                for (ox, oy) in origins {
                    let mut st = anisotropic_state();
                    st.set_window_ext(wx, wy, &CAPS_254).unwrap();
                    // Device resolution at least as fine as logical resolution on each axis.
                    st.set_viewport_ext(wx * k, -wy * (k + 1), &CAPS_254).unwrap();
                    st.set_window_org(ox, oy);
                    st.set_viewport_org(oy, ox);

                    let mut pts = grid.clone();
                    lp_to_dp(&st, &mut pts);
                    dp_to_lp(&st, &mut pts).unwrap();
                    for (a, b) in grid.iter().zip(&pts) {
                        assert!(
                            (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1,
                            "{a:?} -> {b:?} with ext {wx}x{wy} k={k}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_with_fractional_ratio_drifts_by_one() {
        // (window, viewport) per axis; none of the ratios is a whole number.
        let axis_pairs = [(5, 7), (3, 4), (7, -9), (-4, 5)];
        let grid = point_grid(-300, 300, 7);
        let mut worst = 0;

        for (wx, vx) in axis_pairs {
            for (wy, vy) in axis_pairs {
                let mut st = anisotropic_state();
                st.set_window_ext(wx, wy, &CAPS_254).unwrap();
                st.set_viewport_ext(vx, vy, &CAPS_254).unwrap();
                st.set_window_org(3, -11);
                st.set_viewport_org(-7, 2);

                let mut pts = grid.clone();
                lp_to_dp(&st, &mut pts);
                dp_to_lp(&st, &mut pts).unwrap();
                for (a, b) in grid.iter().zip(&pts) {
                    let drift = (a.x - b.x).abs().max((a.y - b.y).abs());
                    assert!(drift <= 1, "{a:?} -> {b:?} with window {wx}x{wy} viewport {vx}x{vy}");
                    worst = worst.max(drift);
                }
            }
        }
        assert_eq!(worst, 1, "truncation should lose a unit somewhere");
    }

    #[test]
    fn affine_path_rotates_and_rounds() {
        let mut st = MappingState::new();
        st.set_graphics_mode(GraphicsMode::Advanced).unwrap();
        // Quarter turn: (x, y) -> (-y, x)
        st.set_world_transform(&XForm::new(0.0, 1.0, -1.0, 0.0, 0.5, 0.0)).unwrap();

        let mut pts = vec![IPoint::new(3, 4), IPoint::new(-1, 0)];
        lp_to_dp(&st, &mut pts);
        // -4 + 0.5 = -3.5 -> floor(-3.0) = -3
        assert_eq!(pts, vec![IPoint::new(-3, 3), IPoint::new(1, -1)]);

        dp_to_lp(&st, &mut pts).unwrap();
        assert_eq!(pts, vec![IPoint::new(3, 4), IPoint::new(-1, 0)]);
    }

    #[test]
    fn affine_round_trip_stays_within_one_unit() {
        let mut st = anisotropic_state();
        st.set_window_ext(5, 5, &CAPS_254).unwrap();
        st.set_viewport_ext(7, -9, &CAPS_254).unwrap();
        st.set_viewport_org(40, 40);
        st.set_graphics_mode(GraphicsMode::Advanced).unwrap();
        st.set_world_transform(&XForm::new(1.0, 0.25, 0.5, 1.0, -3.0, 2.0)).unwrap();

        let grid = point_grid(-200, 200, 23);
        let mut pts = grid.clone();
        lp_to_dp(&st, &mut pts);
        dp_to_lp(&st, &mut pts).unwrap();
        for (a, b) in grid.iter().zip(&pts) {
            assert!((a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1, "{a:?} -> {b:?}");
        }
    }
}
