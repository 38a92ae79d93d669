use crate::geom::IPoint;
use serde::{Deserialize, Serialize};

/// 2D affine transform with the row-vector layout:
///
/// - `x' = x*m11 + y*m21 + dx`
/// - `y' = x*m12 + y*m22 + dy`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XForm {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl XForm {
    pub const fn identity() -> Self {
        Self {
            m11: 1.0,
            m12: 0.0,
            m21: 0.0,
            m22: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            dx,
            dy,
        }
    }

    /// Axis-aligned scale followed by a translation.
    pub const fn scale_translate(sx: f64, sy: f64, dx: f64, dy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, dx, dy)
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Returns a transform that applies `self` first, then `next`.
    pub fn then(&self, next: &XForm) -> XForm {
        XForm {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    /// Returns `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<XForm> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(XForm {
            m11: self.m22 * inv,
            m12: -self.m12 * inv,
            m21: -self.m21 * inv,
            m22: self.m11 * inv,
            dx: (self.m21 * self.dy - self.m22 * self.dx) * inv,
            dy: (self.m12 * self.dx - self.m11 * self.dy) * inv,
        })
    }

    #[inline]
    pub fn transform_point2(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.m11 + y * self.m21 + self.dx,
            x * self.m12 + y * self.m22 + self.dy,
        )
    }

    /// Applies the transform to an integer point, rounding half up (`floor(v + 0.5)`).
    #[inline]
    pub fn transform_ipoint(&self, p: IPoint) -> IPoint {
        let (x, y) = self.transform_point2(p.x as f64, p.y as f64);
        // `as` saturates out-of-range floats and maps NaN to 0.
        IPoint::new((x + 0.5).floor() as i32, (y + 0.5).floor() as i32)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// No rotation or shear: only per-axis scale and translation remain.
    pub fn is_axis_aligned(&self) -> bool {
        self.m12 == 0.0 && self.m21 == 0.0
    }
}

impl Default for XForm {
    fn default() -> Self {
        Self::identity()
    }
}

/// Whether a world transform participates in the logical-to-device mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsMode {
    /// World transform is pinned to identity.
    #[default]
    Compatible,
    /// World transform may be set to any invertible matrix.
    Advanced,
}

/// How `modify_world_transform` combines a matrix with the current world transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldModify {
    /// Reset to identity; the supplied matrix is ignored.
    Identity,
    /// Supplied matrix applies before the current one.
    LeftMultiply,
    /// Supplied matrix applies after the current one.
    RightMultiply,
}
