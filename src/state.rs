//! Per-surface mapping state and its cached transforms.
//!
//! Fields are private; every mutation goes through a setter that finishes with
//! `update_xforms`, so `xforms()` never describes an older configuration.

use crate::error::{Change, MapError, MapResult};
use crate::geom::{Ext, IPoint, saturate_i32};
use crate::isotropic::fix_isotropic;
use crate::mode::{DeviceCaps, MappingMode, resolve_preset};
use crate::xform::{GraphicsMode, WorldModify, XForm};
use serde::Serialize;
use tracing::{debug, warn};

/// Which conversion arithmetic the cached transforms allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionPath {
    /// Pure window/viewport mapping: exact integer multiply-then-divide.
    Ratio,
    /// A world transform is composed in: real-valued matrix with rounding.
    Affine,
}

/// Forward (logical to device) and inverse (device to logical) matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformCache {
    pub forward: XForm,
    pub inverse: XForm,
    /// False when `forward` is singular; `inverse` is then identity and unusable.
    pub inverse_valid: bool,
    pub path: ConversionPath,
}

impl TransformCache {
    fn compute(world: &XForm, window_org: IPoint, window_ext: Ext, viewport_org: IPoint, viewport_ext: Ext) -> Self {
        let sx = viewport_ext.cx as f64 / window_ext.cx as f64;
        let sy = viewport_ext.cy as f64 / window_ext.cy as f64;
        let page = XForm::scale_translate(
            sx,
            sy,
            viewport_org.x as f64 - sx * window_org.x as f64,
            viewport_org.y as f64 - sy * window_org.y as f64,
        );

        let forward = world.then(&page);
        let inverse = forward.inverse();
        let path = if world.is_identity() && forward.is_axis_aligned() {
            ConversionPath::Ratio
        } else {
            ConversionPath::Affine
        };

        Self {
            forward,
            inverse: inverse.unwrap_or_default(),
            inverse_valid: inverse.is_some(),
            path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtKind {
    Window,
    Viewport,
}

impl ExtKind {
    fn name(self) -> &'static str {
        match self {
            ExtKind::Window => "window",
            ExtKind::Viewport => "viewport",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingState {
    mode: MappingMode,
    graphics_mode: GraphicsMode,
    window_org: IPoint,
    window_ext: Ext,
    viewport_org: IPoint,
    viewport_ext: Ext,
    world: XForm,
    xforms: TransformCache,
}

impl Default for MappingState {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingState {
    /// Text mode, unit extents, zero origins, identity world transform.
    pub fn new() -> Self {
        let world = XForm::identity();
        Self {
            mode: MappingMode::Text,
            graphics_mode: GraphicsMode::Compatible,
            window_org: IPoint::default(),
            window_ext: Ext::UNIT,
            viewport_org: IPoint::default(),
            viewport_ext: Ext::UNIT,
            world,
            xforms: TransformCache::compute(&world, IPoint::default(), Ext::UNIT, IPoint::default(), Ext::UNIT),
        }
    }

    // Accessors
    // -----------------------------------------------------------------------------

    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    pub fn graphics_mode(&self) -> GraphicsMode {
        self.graphics_mode
    }

    pub fn window_org(&self) -> IPoint {
        self.window_org
    }

    pub fn window_ext(&self) -> Ext {
        self.window_ext
    }

    pub fn viewport_org(&self) -> IPoint {
        self.viewport_org
    }

    pub fn viewport_ext(&self) -> Ext {
        self.viewport_ext
    }

    pub fn world_transform(&self) -> XForm {
        self.world
    }

    pub fn xforms(&self) -> &TransformCache {
        &self.xforms
    }

    fn update_xforms(&mut self) {
        self.xforms = TransformCache::compute(
            &self.world,
            self.window_org,
            self.window_ext,
            self.viewport_org,
            self.viewport_ext,
        );
    }

    fn ext_mut(&mut self, kind: ExtKind) -> &mut Ext {
        match kind {
            ExtKind::Window => &mut self.window_ext,
            ExtKind::Viewport => &mut self.viewport_ext,
        }
    }

    // Mapping mode
    // -----------------------------------------------------------------------------

    /// Selects a mapping mode by its `MM_*` number and returns the previous mode.
    ///
    /// Unrecognized numbers change nothing. Recognized presets re-derive both
    /// extents from `caps`; `Anisotropic` keeps the current extents.
    pub fn set_mode(&mut self, raw: i32, caps: &DeviceCaps) -> MappingMode {
        let prev = self.mode;
        let Some(mode) = MappingMode::from_raw(raw) else {
            warn!(raw, "ignoring unrecognized mapping mode");
            return prev;
        };

        if let Some(preset) = resolve_preset(mode, caps) {
            self.window_ext = preset.window;
            self.viewport_ext = preset.viewport;
        }
        self.mode = mode;
        self.update_xforms();

        debug!(?prev, ?mode, window_ext = ?self.window_ext, viewport_ext = ?self.viewport_ext, "mapping mode set");
        prev
    }

    // Extents
    // -----------------------------------------------------------------------------

    pub fn set_window_ext(&mut self, cx: i32, cy: i32, caps: &DeviceCaps) -> MapResult<Change<Ext>> {
        self.set_ext(ExtKind::Window, Ext::new(cx, cy), caps)
    }

    pub fn set_viewport_ext(&mut self, cx: i32, cy: i32, caps: &DeviceCaps) -> MapResult<Change<Ext>> {
        self.set_ext(ExtKind::Viewport, Ext::new(cx, cy), caps)
    }

    fn set_ext(&mut self, kind: ExtKind, ext: Ext, caps: &DeviceCaps) -> MapResult<Change<Ext>> {
        // Fixed presets ignore the call before any argument is looked at.
        let prev = *self.ext_mut(kind);
        if !self.mode.has_adjustable_extents() {
            return Ok(Change::Unchanged(prev));
        }

        if !ext.is_nonzero() {
            warn!(kind = kind.name(), ?ext, "rejecting zero extent");
            return Err(MapError::InvalidArgument(format!(
                "{} extent must be nonzero on both axes, got {}x{}",
                kind.name(),
                ext.cx,
                ext.cy
            )));
        }

        *self.ext_mut(kind) = ext;
        self.after_extent_change(caps);
        debug!(kind = kind.name(), ?prev, ?ext, viewport_ext = ?self.viewport_ext, "extent set");
        Ok(Change::Applied(prev))
    }

    pub fn scale_window_ext(
        &mut self,
        x_num: i32,
        x_denom: i32,
        y_num: i32,
        y_denom: i32,
        caps: &DeviceCaps,
    ) -> MapResult<Change<Ext>> {
        self.scale_ext(ExtKind::Window, (x_num, x_denom), (y_num, y_denom), caps)
    }

    pub fn scale_viewport_ext(
        &mut self,
        x_num: i32,
        x_denom: i32,
        y_num: i32,
        y_denom: i32,
        caps: &DeviceCaps,
    ) -> MapResult<Change<Ext>> {
        self.scale_ext(ExtKind::Viewport, (x_num, x_denom), (y_num, y_denom), caps)
    }

    fn scale_ext(
        &mut self,
        kind: ExtKind,
        x: (i32, i32),
        y: (i32, i32),
        caps: &DeviceCaps,
    ) -> MapResult<Change<Ext>> {
        let prev = *self.ext_mut(kind);
        if !self.mode.has_adjustable_extents() {
            return Ok(Change::Unchanged(prev));
        }

        if x.0 == 0 || x.1 == 0 || y.0 == 0 || y.1 == 0 {
            warn!(kind = kind.name(), ?x, ?y, "rejecting zero scale factor");
            return Err(MapError::InvalidArgument(format!(
                "{} scale factors must be nonzero, got {}/{} and {}/{}",
                kind.name(),
                x.0,
                x.1,
                y.0,
                y.1
            )));
        }

        let scaled = Ext::new(scale_axis(prev.cx, x), scale_axis(prev.cy, y));
        *self.ext_mut(kind) = scaled;
        self.after_extent_change(caps);
        debug!(kind = kind.name(), ?prev, ?scaled, "extent scaled");
        Ok(Change::Applied(prev))
    }

    fn after_extent_change(&mut self, caps: &DeviceCaps) {
        if self.mode == MappingMode::Isotropic {
            self.viewport_ext = fix_isotropic(self.window_ext, self.viewport_ext, caps);
        }
        self.update_xforms();
    }

    // Origins
    // -----------------------------------------------------------------------------

    pub fn set_window_org(&mut self, x: i32, y: i32) -> IPoint {
        let prev = std::mem::replace(&mut self.window_org, IPoint::new(x, y));
        self.update_xforms();
        prev
    }

    pub fn set_viewport_org(&mut self, x: i32, y: i32) -> IPoint {
        let prev = std::mem::replace(&mut self.viewport_org, IPoint::new(x, y));
        self.update_xforms();
        prev
    }

    pub fn offset_window_org(&mut self, dx: i32, dy: i32) -> IPoint {
        let prev = self.window_org;
        self.window_org = prev.offset(dx, dy);
        self.update_xforms();
        prev
    }

    pub fn offset_viewport_org(&mut self, dx: i32, dy: i32) -> IPoint {
        let prev = self.viewport_org;
        self.viewport_org = prev.offset(dx, dy);
        self.update_xforms();
        prev
    }

    // World transform
    // -----------------------------------------------------------------------------

    /// Switching back to `Compatible` is only allowed once the world transform is identity.
    pub fn set_graphics_mode(&mut self, mode: GraphicsMode) -> MapResult<GraphicsMode> {
        let prev = self.graphics_mode;
        if mode == GraphicsMode::Compatible && !self.world.is_identity() {
            return Err(MapError::InvalidArgument(
                "reset the world transform before returning to compatible mode".to_string(),
            ));
        }
        self.graphics_mode = mode;
        Ok(prev)
    }

    pub fn set_world_transform(&mut self, xform: &XForm) -> MapResult<()> {
        self.require_advanced()?;
        self.replace_world(*xform)
    }

    pub fn modify_world_transform(&mut self, xform: &XForm, how: WorldModify) -> MapResult<()> {
        self.require_advanced()?;
        let world = match how {
            WorldModify::Identity => XForm::identity(),
            WorldModify::LeftMultiply => xform.then(&self.world),
            WorldModify::RightMultiply => self.world.then(xform),
        };
        self.replace_world(world)
    }

    fn require_advanced(&self) -> MapResult<()> {
        if self.graphics_mode != GraphicsMode::Advanced {
            return Err(MapError::InvalidArgument(
                "world transform requires advanced graphics mode".to_string(),
            ));
        }
        Ok(())
    }

    fn replace_world(&mut self, world: XForm) -> MapResult<()> {
        if world.inverse().is_none() {
            return Err(MapError::InvalidArgument(format!("world transform is singular: {world:?}")));
        }
        self.world = world;
        self.update_xforms();
        debug!(?world, path = ?self.xforms.path, "world transform set");
        Ok(())
    }
}

/// `truncate(ext * num / denom)` in 64-bit. A zero result becomes a unit extent
/// carrying the sign of the requested ratio applied to `ext`.
fn scale_axis(ext: i32, (num, denom): (i32, i32)) -> i32 {
    let v = saturate_i32(ext as i64 * num as i64 / denom as i64);
    if v == 0 {
        ext.signum() * num.signum() * denom.signum()
    } else {
        v
    }
}
