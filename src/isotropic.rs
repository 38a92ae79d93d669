//! Viewport correction for isotropic mapping.
//!
//! `xdim` and `ydim` are the physical size of one logical unit along each axis
//! (millimetres per logical unit, signed). The axis with the larger magnitude has
//! its viewport extent shrunk by `|smaller / larger|`, so both axes end up with
//! the same physical scale. The other axis is left alone; extents only shrink.

use crate::geom::Ext;
use crate::mode::DeviceCaps;
use tracing::{trace, warn};

/// Returns the corrected viewport extent for `window` / `viewport` on a device
/// described by `caps`.
pub fn fix_isotropic(window: Ext, viewport: Ext, caps: &DeviceCaps) -> Ext {
    if caps.is_degenerate() {
        warn!(?caps, "skipping isotropic correction on degenerate device caps");
        return viewport;
    }

    let xdim = viewport.cx as f64 * caps.horz_size_mm as f64
        / (caps.horz_res as f64 * window.cx as f64);
    let ydim = viewport.cy as f64 * caps.vert_size_mm as f64
        / (caps.vert_res as f64 * window.cy as f64);

    let mut out = viewport;
    if xdim.abs() > ydim.abs() {
        out.cx = shrink(viewport.cx, (ydim / xdim).abs());
    } else if ydim.abs() > xdim.abs() {
        out.cy = shrink(viewport.cy, (xdim / ydim).abs());
    }

    trace!(xdim, ydim, before = ?viewport, after = ?out, "isotropic correction");
    out
}

// `ratio` is in (0, 1]; the product truncates toward zero and keeps the sign.
fn shrink(ext: i32, ratio: f64) -> i32 {
    let v = (ext as f64 * ratio) as i32;
    if v == 0 { ext.signum() } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Square pixels: 1 mm per 4 pixels on both axes.
    const SQUARE: DeviceCaps = DeviceCaps::new(250, 250, 1000, 1000);

    #[test]
    fn wider_viewport_shrinks_horizontally() {
        let vp = fix_isotropic(Ext::new(100, 100), Ext::new(400, -200), &SQUARE);
        assert_eq!(vp, Ext::new(200, -200));
    }

    #[test]
    fn taller_viewport_shrinks_vertically_and_keeps_sign() {
        let vp = fix_isotropic(Ext::new(100, 100), Ext::new(300, -600), &SQUARE);
        assert_eq!(vp, Ext::new(300, -300));
    }

    #[test]
    fn equal_scales_are_untouched() {
        let vp = fix_isotropic(Ext::new(10, -10), Ext::new(50, -50), &SQUARE);
        assert_eq!(vp, Ext::new(50, -50));
    }

    #[test]
    fn non_square_pixels_are_accounted_for() {
        // Horizontal pixels are twice as wide as vertical ones.
        let caps = DeviceCaps::new(200, 100, 100, 100);
        let vp = fix_isotropic(Ext::new(1, 1), Ext::new(100, 100), &caps);
        assert_eq!(vp, Ext::new(50, 100));
    }

    #[test]
    fn extreme_ratio_floors_at_unit_magnitude() {
        let vp = fix_isotropic(Ext::new(1, 1_000_000), Ext::new(-1000, 1), &SQUARE);
        assert_eq!(vp, Ext::new(-1, 1));
    }

    #[test]
    fn never_grows_either_axis() {
        let windows = [(1, 1), (3, -7), (-1000, 20), (640, 480)];
        let viewports = [(1, 1), (-5, 9), (1920, -1080), (7, 7000)];
        let caps = [SQUARE, DeviceCaps::new(320, 240, 1024, 768), DeviceCaps::new(1, 2, 3, 4)];
        for w in windows {
            for v in viewports {
                for c in &caps {
                    let out = fix_isotropic(Ext::from(w), Ext::from(v), c);
                    assert!(out.cx.abs() <= v.0.abs() && out.cy.abs() <= v.1.abs());
                    assert!(out.is_nonzero());
                    assert_eq!(out.cx.signum(), v.0.signum());
                    assert_eq!(out.cy.signum(), v.1.signum());
                }
            }
        }
    }

    #[test]
    fn degenerate_caps_leave_viewport_alone() {
        let caps = DeviceCaps::new(0, 100, 100, 100);
        let vp = fix_isotropic(Ext::new(1, 1), Ext::new(5, 9), &caps);
        assert_eq!(vp, Ext::new(5, 9));
    }
}
