//! Fixed-step ray marching through the tile grid, one ray per screen column.

use glam::Vec2;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::camera::ViewerState;
use crate::color::Palette;
use crate::config::MIN_MARCH_STEP;
use crate::geometry::{distance, heading};
use crate::texture::Texture;
use crate::world::{MapGeometry, TileCategory, TileMap};

/// Result of casting one column. Cleared at the start of every frame.
///
/// `distance` is meaningless unless `was_hit` is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayHit {
    pub distance: f32,
    pub was_hit: bool,
    pub color: u32,
}

/// How a hit is colored.
#[derive(Debug, Clone)]
pub enum WallColoring {
    /// One color per tile category.
    Flat(Palette),
    /// Fetch the texel under the hit position in map pixel space.
    Textured(Texture),
}

impl WallColoring {
    /// Textured when a texture is available, otherwise flat.
    pub fn from_texture(texture: Option<Texture>, palette: Palette) -> Self {
        match texture {
            Some(t) => Self::Textured(t),
            None => Self::Flat(palette),
        }
    }

    #[inline]
    fn color(&self, tile: Option<TileCategory>, at: Vec2) -> u32 {
        match (self, tile) {
            (Self::Flat(palette), Some(t)) => palette.color(t),
            (Self::Flat(palette), None) => palette.boundary(),
            (Self::Textured(tex), _) => tex.sample(at.x as i32, at.y as i32),
        }
    }
}

/// One march sample along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySample {
    pub pos: Vec2,
    /// `None` when the sample left the grid.
    pub tile: Option<TileCategory>,
}

impl RaySample {
    #[inline]
    pub fn blocks(&self) -> bool {
        self.tile.is_none_or(TileCategory::is_wall)
    }
}

/// Iterator over the sample points of a single ray, from the origin out to
/// (but excluding) the maximum length.
pub struct Ray<'a> {
    map: &'a TileMap,
    geo: &'a MapGeometry,
    origin: Vec2,
    dir: Vec2,
    step: f32,
    samples: u64,
    i: u64,
}

impl Iterator for Ray<'_> {
    type Item = RaySample;

    fn next(&mut self) -> Option<RaySample> {
        if self.i >= self.samples {
            return None;
        }
        // Multiply rather than accumulate so samples don't drift
        let travelled = self.i as f32 * self.step;
        self.i += 1;
        let pos = self.origin + self.dir * travelled;
        Some(RaySample {
            pos,
            tile: self.map.lookup(self.geo.pixel_to_tile(pos)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RayCaster {
    /// March step in pixels. Hit distance resolution equals this step.
    pub step: f32,
    /// Maximum ray length in pixels.
    pub ray_length: f32,
    pub fisheye_correction: bool,
    pub coloring: WallColoring,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            step: 2.0,
            ray_length: 300.0,
            fisheye_correction: true,
            coloring: WallColoring::Flat(Palette::default()),
        }
    }
}

/// Angular offset in degrees of `column` from the facing direction. Spans
/// `[-fov/2, fov/2)` left to right.
#[inline]
pub fn column_offset_deg(fov_deg: f32, column: usize, column_count: usize) -> f32 {
    if column_count == 0 {
        return 0.0;
    }
    -fov_deg * 0.5 + (column as f32 / column_count as f32) * fov_deg
}

impl RayCaster {
    /// Sample points of the ray leaving `viewer` at `offset_deg` from its facing.
    pub fn ray<'a>(
        &self,
        viewer: &ViewerState,
        map: &'a TileMap,
        geo: &'a MapGeometry,
        offset_deg: f32,
    ) -> Ray<'a> {
        let step = self.step.max(MIN_MARCH_STEP);
        // Samples at k * step for every k with k * step < ray_length
        let samples = (self.ray_length.max(0.0) / step).ceil() as u64;
        Ray {
            map,
            geo,
            origin: viewer.pos,
            dir: heading(viewer.facing_deg + offset_deg),
            step,
            samples,
            i: 0,
        }
    }

    /// Cast the ray for one screen column. The march stops at the first wall
    /// sample, or at a sample outside the grid, which counts as a wall.
    pub fn cast_column(
        &self,
        viewer: &ViewerState,
        map: &TileMap,
        geo: &MapGeometry,
        column: usize,
        column_count: usize,
    ) -> RayHit {
        let offset = column_offset_deg(viewer.fov_deg, column, column_count);
        let mut hit = RayHit::default();

        if let Some(sample) = self.ray(viewer, map, geo, offset).find(RaySample::blocks) {
            let raw = distance(viewer.pos, sample.pos);
            hit.distance = if self.fisheye_correction {
                raw * offset.to_radians().cos()
            } else {
                raw
            };
            hit.color = self.coloring.color(sample.tile, sample.pos);
            hit.was_hit = true;
        }
        hit
    }

    /// Clear `hits` and cast one column per slot. Columns only read shared
    /// state, so they run in parallel.
    pub fn cast_frame(
        &self,
        viewer: &ViewerState,
        map: &TileMap,
        geo: &MapGeometry,
        hits: &mut [RayHit],
    ) {
        let count = hits.len();
        hits.par_iter_mut().enumerate().for_each(|(column, slot)| {
            *slot = self.cast_column(viewer, map, geo, column, count);
        });
    }
}
