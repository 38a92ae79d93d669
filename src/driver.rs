//! Optional per-surface driver hooks.
//!
//! A driver can take over any of the mapping setters for the surface it is
//! attached to. Each hook returns `None` when the driver does not implement it,
//! in which case the generic state machine runs. `Some(..)` means the call was
//! forwarded and the generic state is not touched for that invocation.

use crate::mode::MappingMode;

pub trait MappingDriver: Send {
    /// Returns the previous mode, as the driver tracks it.
    fn set_map_mode(&mut self, _mode: i32) -> Option<MappingMode> {
        None
    }

    fn set_window_ext(&mut self, _cx: i32, _cy: i32) -> Option<bool> {
        None
    }

    fn set_viewport_ext(&mut self, _cx: i32, _cy: i32) -> Option<bool> {
        None
    }

    fn set_window_org(&mut self, _x: i32, _y: i32) -> Option<bool> {
        None
    }

    fn set_viewport_org(&mut self, _x: i32, _y: i32) -> Option<bool> {
        None
    }

    fn offset_window_org(&mut self, _dx: i32, _dy: i32) -> Option<bool> {
        None
    }

    fn offset_viewport_org(&mut self, _dx: i32, _dy: i32) -> Option<bool> {
        None
    }

    fn scale_window_ext(&mut self, _x_num: i32, _x_denom: i32, _y_num: i32, _y_denom: i32) -> Option<bool> {
        None
    }

    fn scale_viewport_ext(&mut self, _x_num: i32, _x_denom: i32, _y_num: i32, _y_denom: i32) -> Option<bool> {
        None
    }
}
