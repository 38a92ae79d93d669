//! Mapping-mode presets and their resolution into window/viewport extents.
//!
//! Every preset except `Anisotropic` derives both extents from the surface's
//! device capabilities. Window extents carry the physical size expressed in the
//! preset's logical unit; viewport extents carry the matching pixel count. The
//! vertical viewport extent is negative for the physical presets so that logical
//! Y grows upward while device Y grows downward.

use crate::geom::{Ext, saturate_i32};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    /// One logical unit per device pixel, Y down.
    #[default]
    Text,
    /// 0.1 mm, Y up.
    LoMetric,
    /// 0.01 mm, Y up.
    HiMetric,
    /// 0.01 inch, Y up.
    LoEnglish,
    /// 0.001 inch, Y up.
    HiEnglish,
    /// 1/1440 inch, Y up.
    Twips,
    /// Caller-chosen extents, corrected to equal physical scale on both axes.
    Isotropic,
    /// Caller-chosen extents, no correction.
    Anisotropic,
}

impl MappingMode {
    pub const ALL: [MappingMode; 8] = [
        MappingMode::Text,
        MappingMode::LoMetric,
        MappingMode::HiMetric,
        MappingMode::LoEnglish,
        MappingMode::HiEnglish,
        MappingMode::Twips,
        MappingMode::Isotropic,
        MappingMode::Anisotropic,
    ];

    /// Maps the conventional `MM_*` numbering (1..=8) onto a mode.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(MappingMode::Text),
            2 => Some(MappingMode::LoMetric),
            3 => Some(MappingMode::HiMetric),
            4 => Some(MappingMode::LoEnglish),
            5 => Some(MappingMode::HiEnglish),
            6 => Some(MappingMode::Twips),
            7 => Some(MappingMode::Isotropic),
            8 => Some(MappingMode::Anisotropic),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            MappingMode::Text => 1,
            MappingMode::LoMetric => 2,
            MappingMode::HiMetric => 3,
            MappingMode::LoEnglish => 4,
            MappingMode::HiEnglish => 5,
            MappingMode::Twips => 6,
            MappingMode::Isotropic => 7,
            MappingMode::Anisotropic => 8,
        }
    }

    /// Whether extent and scale setters may change extents in this mode.
    pub fn has_adjustable_extents(self) -> bool {
        matches!(self, MappingMode::Isotropic | MappingMode::Anisotropic)
    }
}

/// Point-in-time snapshot of the device capabilities the presets depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCaps {
    /// Physical width in millimetres.
    pub horz_size_mm: i32,
    /// Physical height in millimetres.
    pub vert_size_mm: i32,
    /// Width in pixels.
    pub horz_res: i32,
    /// Height in pixels.
    pub vert_res: i32,
}

impl DeviceCaps {
    pub const fn new(horz_size_mm: i32, vert_size_mm: i32, horz_res: i32, vert_res: i32) -> Self {
        Self {
            horz_size_mm,
            vert_size_mm,
            horz_res,
            vert_res,
        }
    }

    /// A size or resolution that is not positive makes the physical ratios meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.horz_size_mm <= 0 || self.vert_size_mm <= 0 || self.horz_res <= 0 || self.vert_res <= 0
    }
}

/// Window and viewport extents produced by resolving a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetExtents {
    pub window: Ext,
    pub viewport: Ext,
}

/// Resolves `mode` against `caps`.
///
/// Returns `None` for `Anisotropic`, whose extents are left as they are.
/// `Isotropic` starts from the `LoMetric` extents.
pub fn resolve_preset(mode: MappingMode, caps: &DeviceCaps) -> Option<PresetExtents> {
    let hs = caps.horz_size_mm as i64;
    let vs = caps.vert_size_mm as i64;
    let hr = caps.horz_res as i64;
    let vr = caps.vert_res as i64;

    // Viewport for the metric family: pixels per 0.1 mm scale, Y flipped.
    let metric_vport = (hr / 10, vr / -10);
    // Viewport for the inch family: 254/1000 converts to hundredths of an inch.
    let english_vport = (254 * hr / 1000, -254 * vr / 1000);

    let (window, viewport) = match mode {
        MappingMode::Text => ((1, 1), (1, 1)),
        MappingMode::LoMetric | MappingMode::Isotropic => ((hs, vs), metric_vport),
        MappingMode::HiMetric => ((hs * 10, vs * 10), metric_vport),
        MappingMode::LoEnglish => ((hs, vs), english_vport),
        MappingMode::HiEnglish => ((hs * 10, vs * 10), english_vport),
        MappingMode::Twips => ((144 * hs / 10, 144 * vs / 10), english_vport),
        MappingMode::Anisotropic => return None,
    };

    Some(PresetExtents {
        window: Ext::new(nonzero_axis(window.0, 1), nonzero_axis(window.1, 1)),
        viewport: Ext::new(
            nonzero_axis(viewport.0, 1),
            nonzero_axis(viewport.1, if mode == MappingMode::Text { 1 } else { -1 }),
        ),
    })
}

// Tiny or missing device caps can truncate an extent to zero; fall back to a
// unit extent with the preset's intended sign.
fn nonzero_axis(v: i64, sign: i32) -> i32 {
    let v = saturate_i32(v);
    if v == 0 {
        warn!(sign, "preset resolved to a zero extent, clamping to unit");
        sign
    } else {
        v
    }
}
