//! Handle-keyed store of surfaces and the public mapping API.
//!
//! Each surface owns one `MappingState`, a snapshot of its device caps, and an
//! optional driver. Every operation resolves the handle under the table's read
//! lock, releases it, then holds the surface's own mutex for the duration of the
//! call. Operations on different surfaces never contend on the same mutex.

use crate::convert;
use crate::driver::MappingDriver;
use crate::error::{Change, MapError, MapResult};
use crate::geom::{Ext, IPoint, SurfaceHandle};
use crate::mode::{DeviceCaps, MappingMode};
use crate::state::MappingState;
use crate::xform::{GraphicsMode, WorldModify, XForm};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

pub struct Surface {
    caps: DeviceCaps,
    state: MappingState,
    driver: Option<Box<dyn MappingDriver>>,
}

impl Surface {
    fn new(caps: DeviceCaps, driver: Option<Box<dyn MappingDriver>>) -> Self {
        Self {
            caps,
            state: MappingState::new(),
            driver,
        }
    }
}

pub struct SurfaceStore {
    surfaces: RwLock<HashMap<SurfaceHandle, Arc<Mutex<Surface>>>>,
    next_handle: AtomicU32,
}

impl Default for SurfaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceStore {
    pub fn new() -> Self {
        Self {
            surfaces: RwLock::new(HashMap::new()),
            next_handle: AtomicU32::new(1),
        }
    }

    // Lifecycle
    // -----------------------------------------------------------------------------

    pub fn create_surface(&self, caps: DeviceCaps) -> SurfaceHandle {
        self.insert(Surface::new(caps, None))
    }

    pub fn create_surface_with_driver(&self, caps: DeviceCaps, driver: Box<dyn MappingDriver>) -> SurfaceHandle {
        self.insert(Surface::new(caps, Some(driver)))
    }

    fn insert(&self, surface: Surface) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let has_driver = surface.driver.is_some();
        self.surfaces.write().insert(handle, Arc::new(Mutex::new(surface)));
        info!(%handle, has_driver, "surface created");
        handle
    }

    pub fn destroy_surface(&self, handle: SurfaceHandle) -> MapResult<()> {
        match self.surfaces.write().remove(&handle) {
            Some(_) => {
                info!(%handle, "surface destroyed");
                Ok(())
            }
            None => Err(MapError::InvalidSurface(handle)),
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with the surface locked. The lock is released when `f` returns.
    fn with_surface<R>(&self, handle: SurfaceHandle, f: impl FnOnce(&mut Surface) -> R) -> MapResult<R> {
        let surface = self
            .surfaces
            .read()
            .get(&handle)
            .cloned()
            .ok_or(MapError::InvalidSurface(handle))?;
        let mut guard = surface.lock();
        Ok(f(&mut *guard))
    }

    /// Offers the call to the surface's driver first; falls back to `generic`.
    fn dispatch<T>(
        &self,
        handle: SurfaceHandle,
        op: &'static str,
        hook: impl FnOnce(&mut dyn MappingDriver) -> Option<bool>,
        generic: impl FnOnce(&mut MappingState, &DeviceCaps) -> MapResult<Change<T>>,
    ) -> MapResult<Change<T>> {
        self.with_surface(handle, |s| {
            if let Some(driver) = s.driver.as_deref_mut() {
                if let Some(accepted) = hook(driver) {
                    debug!(%handle, op, accepted, "forwarded to driver");
                    return if accepted {
                        Ok(Change::Delegated)
                    } else {
                        Err(MapError::DriverRejected(op))
                    };
                }
            }
            generic(&mut s.state, &s.caps)
        })?
    }

    // Device caps
    // -----------------------------------------------------------------------------

    pub fn device_caps(&self, handle: SurfaceHandle) -> MapResult<DeviceCaps> {
        self.with_surface(handle, |s| s.caps)
    }

    /// Replaces the caps snapshot and returns the old one. Extents already resolved
    /// from the old caps stay as they are until the next mode change.
    pub fn set_device_caps(&self, handle: SurfaceHandle, caps: DeviceCaps) -> MapResult<DeviceCaps> {
        self.with_surface(handle, |s| std::mem::replace(&mut s.caps, caps))
    }

    // Mapping mode
    // -----------------------------------------------------------------------------

    /// Sets the mapping mode by `MM_*` number and returns the previous mode.
    /// Unrecognized numbers leave the surface untouched.
    pub fn set_map_mode(&self, handle: SurfaceHandle, mode: i32) -> MapResult<MappingMode> {
        self.with_surface(handle, |s| {
            if let Some(driver) = s.driver.as_deref_mut() {
                if let Some(prev) = driver.set_map_mode(mode) {
                    debug!(%handle, mode, "set_map_mode forwarded to driver");
                    return prev;
                }
            }
            s.state.set_mode(mode, &s.caps)
        })
    }

    pub fn set_mapping_mode(&self, handle: SurfaceHandle, mode: MappingMode) -> MapResult<MappingMode> {
        self.set_map_mode(handle, mode.raw())
    }

    pub fn map_mode(&self, handle: SurfaceHandle) -> MapResult<MappingMode> {
        self.with_surface(handle, |s| s.state.mode())
    }

    // Extents
    // -----------------------------------------------------------------------------

    pub fn set_window_ext(&self, handle: SurfaceHandle, cx: i32, cy: i32) -> MapResult<Change<Ext>> {
        self.dispatch(
            handle,
            "set_window_ext",
            |d| d.set_window_ext(cx, cy),
            |st, caps| st.set_window_ext(cx, cy, caps),
        )
    }

    pub fn set_viewport_ext(&self, handle: SurfaceHandle, cx: i32, cy: i32) -> MapResult<Change<Ext>> {
        self.dispatch(
            handle,
            "set_viewport_ext",
            |d| d.set_viewport_ext(cx, cy),
            |st, caps| st.set_viewport_ext(cx, cy, caps),
        )
    }

    pub fn scale_window_ext(
        &self,
        handle: SurfaceHandle,
        x_num: i32,
        x_denom: i32,
        y_num: i32,
        y_denom: i32,
    ) -> MapResult<Change<Ext>> {
        self.dispatch(
            handle,
            "scale_window_ext",
            |d| d.scale_window_ext(x_num, x_denom, y_num, y_denom),
            |st, caps| st.scale_window_ext(x_num, x_denom, y_num, y_denom, caps),
        )
    }

    pub fn scale_viewport_ext(
        &self,
        handle: SurfaceHandle,
        x_num: i32,
        x_denom: i32,
        y_num: i32,
        y_denom: i32,
    ) -> MapResult<Change<Ext>> {
        self.dispatch(
            handle,
            "scale_viewport_ext",
            |d| d.scale_viewport_ext(x_num, x_denom, y_num, y_denom),
            |st, caps| st.scale_viewport_ext(x_num, x_denom, y_num, y_denom, caps),
        )
    }

    pub fn window_ext(&self, handle: SurfaceHandle) -> MapResult<Ext> {
        self.with_surface(handle, |s| s.state.window_ext())
    }

    pub fn viewport_ext(&self, handle: SurfaceHandle) -> MapResult<Ext> {
        self.with_surface(handle, |s| s.state.viewport_ext())
    }

    // Origins
    // -----------------------------------------------------------------------------

    pub fn set_window_org(&self, handle: SurfaceHandle, x: i32, y: i32) -> MapResult<Change<IPoint>> {
        self.dispatch(
            handle,
            "set_window_org",
            |d| d.set_window_org(x, y),
            |st, _| Ok(Change::Applied(st.set_window_org(x, y))),
        )
    }

    pub fn set_viewport_org(&self, handle: SurfaceHandle, x: i32, y: i32) -> MapResult<Change<IPoint>> {
        self.dispatch(
            handle,
            "set_viewport_org",
            |d| d.set_viewport_org(x, y),
            |st, _| Ok(Change::Applied(st.set_viewport_org(x, y))),
        )
    }

    pub fn offset_window_org(&self, handle: SurfaceHandle, dx: i32, dy: i32) -> MapResult<Change<IPoint>> {
        self.dispatch(
            handle,
            "offset_window_org",
            |d| d.offset_window_org(dx, dy),
            |st, _| Ok(Change::Applied(st.offset_window_org(dx, dy))),
        )
    }

    pub fn offset_viewport_org(&self, handle: SurfaceHandle, dx: i32, dy: i32) -> MapResult<Change<IPoint>> {
        self.dispatch(
            handle,
            "offset_viewport_org",
            |d| d.offset_viewport_org(dx, dy),
            |st, _| Ok(Change::Applied(st.offset_viewport_org(dx, dy))),
        )
    }

    pub fn window_org(&self, handle: SurfaceHandle) -> MapResult<IPoint> {
        self.with_surface(handle, |s| s.state.window_org())
    }

    pub fn viewport_org(&self, handle: SurfaceHandle) -> MapResult<IPoint> {
        self.with_surface(handle, |s| s.state.viewport_org())
    }

    // World transform
    // -----------------------------------------------------------------------------

    pub fn set_graphics_mode(&self, handle: SurfaceHandle, mode: GraphicsMode) -> MapResult<GraphicsMode> {
        self.with_surface(handle, |s| s.state.set_graphics_mode(mode))?
    }

    pub fn set_world_transform(&self, handle: SurfaceHandle, xform: &XForm) -> MapResult<()> {
        self.with_surface(handle, |s| s.state.set_world_transform(xform))?
    }

    pub fn modify_world_transform(&self, handle: SurfaceHandle, xform: &XForm, how: WorldModify) -> MapResult<()> {
        self.with_surface(handle, |s| s.state.modify_world_transform(xform, how))?
    }

    pub fn world_transform(&self, handle: SurfaceHandle) -> MapResult<XForm> {
        self.with_surface(handle, |s| s.state.world_transform())
    }

    /// Copy of the full mapping state, including the cached matrices.
    pub fn snapshot(&self, handle: SurfaceHandle) -> MapResult<MappingState> {
        self.with_surface(handle, |s| s.state.clone())
    }

    // Conversion
    // -----------------------------------------------------------------------------

    pub fn lp_to_dp(&self, handle: SurfaceHandle, points: &mut [IPoint]) -> MapResult<()> {
        self.with_surface(handle, |s| convert::lp_to_dp(&s.state, points))
    }

    pub fn dp_to_lp(&self, handle: SurfaceHandle, points: &mut [IPoint]) -> MapResult<()> {
        self.with_surface(handle, |s| convert::dp_to_lp(&s.state, points))?
    }
}
