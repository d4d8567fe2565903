//! Column ray caster over a 2D tile grid.
//!
//! Per frame: snapshot the [`ViewerState`], cast one ray per frame column
//! through the [`TileMap`] with [`RayCaster`], then turn each [`RayHit`] into
//! a vertical strip with [`Projector`]. [`Scene`] owns all of it.

pub mod camera;
pub mod caster;
pub mod color;
pub mod config;
pub mod framebuffer;
pub mod geometry;
pub mod input;
pub mod minimap;
pub mod projector;
pub mod renderer;
pub mod scaler;
pub mod texture;
pub mod world;

pub use camera::ViewerState;
pub use caster::{RayCaster, RayHit, WallColoring, column_offset_deg};
pub use color::Palette;
pub use config::RenderConfig;
pub use framebuffer::{FrameError, PixelBuffer};
pub use projector::{Projector, ShadingPolicy};
pub use renderer::Scene;
pub use world::{MapError, MapGeometry, TileCategory, TileMap};
