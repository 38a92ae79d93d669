// Library crate root.
//
// The engine is usable directly through `MappingState` for single-owner callers,
// or through `SurfaceStore` when surfaces are addressed by handle and shared
// across threads. src/main.rs is a small demo on top of the store.

pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod geom;
pub mod isotropic;
pub mod mode;
pub mod state;
pub mod surface;
pub mod xform;

pub use config::{SurfaceDesc, parse_surface_json};
pub use driver::MappingDriver;
pub use error::{Change, MapError, MapResult};
pub use geom::{Ext, IPoint, SurfaceHandle};
pub use mode::{DeviceCaps, MappingMode};
pub use state::{ConversionPath, MappingState, TransformCache};
pub use surface::SurfaceStore;
pub use xform::{GraphicsMode, WorldModify, XForm};

#[cfg(test)]
pub mod test_helpers;
