use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! transparent_newtype_copy {
    ($name:ident($inner:ty)) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);
    };
}

// Opaque key into a `SurfaceStore`. Handles are never reused while the store lives.
transparent_newtype_copy!(SurfaceHandle(u32));

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Integer 2D point, used for origins and for the point batches being converted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise add. Wraps like the 32-bit arithmetic it models, which keeps
    /// repeated offsets associative.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

impl From<(i32, i32)> for IPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Signed window or viewport extent. A negative component flips that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ext {
    pub cx: i32,
    pub cy: i32,
}

impl Ext {
    pub const UNIT: Ext = Ext { cx: 1, cy: 1 };

    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// True when neither axis is zero.
    #[inline]
    pub fn is_nonzero(&self) -> bool {
        self.cx != 0 && self.cy != 0
    }
}

impl Default for Ext {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<(i32, i32)> for Ext {
    fn from((cx, cy): (i32, i32)) -> Self {
        Self { cx, cy }
    }
}

/// Narrows an `i64` intermediate back into `i32`, saturating at the bounds.
#[inline]
pub(crate) fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
