use crate::error::MapResult;
use crate::geom::{Ext, IPoint, SurfaceHandle};
use crate::mode::{DeviceCaps, MappingMode};
use crate::surface::SurfaceStore;
use serde::Deserialize;
use tracing::{debug, warn};

/// JSON description of a surface: its device caps plus an optional initial mapping.
///
/// Extents are only honoured for the adjustable modes, exactly as if the
/// corresponding setters had been called after the mode was selected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurfaceDesc {
    pub device_caps: DeviceCaps,
    #[serde(default)]
    pub map_mode: Option<MappingMode>,
    #[serde(default)]
    pub window_ext: Option<Ext>,
    #[serde(default)]
    pub viewport_ext: Option<Ext>,
    #[serde(default)]
    pub window_org: Option<IPoint>,
    #[serde(default)]
    pub viewport_org: Option<IPoint>,
}

pub fn parse_surface_json(json_text: &str) -> Result<SurfaceDesc, serde_json::Error> {
    serde_json::from_str(json_text)
}

impl SurfaceStore {
    /// Creates a surface from `desc`, applying the mapping through the regular setters.
    ///
    /// On a setter error the half-built surface is destroyed before returning.
    pub fn create_from_desc(&self, desc: &SurfaceDesc) -> MapResult<SurfaceHandle> {
        let handle = self.create_surface(desc.device_caps);
        if let Err(e) = self.apply_desc(handle, desc) {
            if let Err(cleanup) = self.destroy_surface(handle) {
                warn!(%handle, %cleanup, "could not drop half-built surface");
            }
            return Err(e);
        }
        debug!(%handle, ?desc, "surface created from description");
        Ok(handle)
    }

    fn apply_desc(&self, handle: SurfaceHandle, desc: &SurfaceDesc) -> MapResult<()> {
        if let Some(mode) = desc.map_mode {
            self.set_mapping_mode(handle, mode)?;
        }
        // Window first: in isotropic mode the viewport is corrected against it.
        if let Some(ext) = desc.window_ext {
            self.set_window_ext(handle, ext.cx, ext.cy)?;
        }
        if let Some(ext) = desc.viewport_ext {
            self.set_viewport_ext(handle, ext.cx, ext.cy)?;
        }
        if let Some(org) = desc.window_org {
            self.set_window_org(handle, org.x, org.y)?;
        }
        if let Some(org) = desc.viewport_org {
            self.set_viewport_org(handle, org.x, org.y)?;
        }
        Ok(())
    }

    /// Parses `json_text` and creates the described surface.
    pub fn create_from_json(&self, json_text: &str) -> MapResult<SurfaceHandle> {
        let desc = parse_surface_json(json_text)?;
        self.create_from_desc(&desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;

    #[test]
    fn surface_desc_deserializes_sample_json() {
        let sample = r#"
        {
            "device_caps": {
                "horz_size_mm": 320,
                "vert_size_mm": 240,
                "horz_res": 1024,
                "vert_res": 768
            },
            "map_mode": "anisotropic",
            "window_ext": { "cx": 1000, "cy": 1000 },
            "viewport_ext": { "cx": 1024, "cy": -768 },
            "viewport_org": { "x": 0, "y": 768 },
            "comment": "unknown keys are ignored"
        }
        "#;

        let desc = parse_surface_json(sample).expect("sample json should deserialize");
        assert_eq!(desc.device_caps, DeviceCaps::new(320, 240, 1024, 768));
        assert_eq!(desc.map_mode, Some(MappingMode::Anisotropic));
        assert_eq!(desc.viewport_ext, Some(Ext::new(1024, -768)));
        assert!(desc.window_org.is_none());

        let store = SurfaceStore::new();
        let h = store.create_from_desc(&desc).expect("desc applies");
        assert_eq!(store.window_ext(h).unwrap(), Ext::new(1000, 1000));
        assert_eq!(store.viewport_org(h).unwrap(), IPoint::new(0, 768));
    }

    #[test]
    fn caps_only_desc_starts_in_text_mode() {
        let store = SurfaceStore::new();
        let h = store
            .create_from_json(r#"{ "device_caps": { "horz_size_mm": 1, "vert_size_mm": 1, "horz_res": 1, "vert_res": 1 } }"#)
            .expect("minimal json applies");
        assert_eq!(store.map_mode(h).unwrap(), MappingMode::Text);
    }

    #[test]
    fn zero_extent_in_desc_is_rejected_and_surface_dropped() {
        let store = SurfaceStore::new();
        let res = store.create_from_json(
            r#"{
                "device_caps": { "horz_size_mm": 10, "vert_size_mm": 10, "horz_res": 100, "vert_res": 100 },
                "map_mode": "isotropic",
                "window_ext": { "cx": 0, "cy": 5 }
            }"#,
        );
        assert!(matches!(res, Err(MapError::InvalidArgument(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let store = SurfaceStore::new();
        let res = store.create_from_json(r#"{ "map_mode": "sideways" }"#);
        assert!(matches!(res, Err(MapError::Config(_))));
    }
}
