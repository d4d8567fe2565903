//! Top-down overlay: tile fill, viewer marker and ray traces.

use crate::camera::ViewerState;
use crate::caster::{RayCaster, RaySample, column_offset_deg};
use crate::color::{Palette, pack_rgb};
use crate::framebuffer::PixelBuffer;
use crate::world::{MapGeometry, TileMap};

const VIEWER_COLOR: u32 = pack_rgb(0, 0, 0);
const RAY_COLOR: u32 = pack_rgb(255, 255, 255);
const VIEWER_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimap {
    /// Overlay pixels per map pixel.
    pub scale: f32,
    /// Rays traced for the overlay, spread across the field of view.
    pub rays: usize,
}

impl Default for Minimap {
    fn default() -> Self {
        Self {
            scale: 0.25,
            rays: 16,
        }
    }
}

impl Minimap {
    #[inline]
    fn to_overlay(&self, v: f32) -> usize {
        (v * self.scale).max(0.0) as usize
    }

    pub fn draw(
        &self,
        fb: &mut PixelBuffer,
        map: &TileMap,
        geo: &MapGeometry,
        palette: &Palette,
        viewer: &ViewerState,
        caster: &RayCaster,
    ) {
        let tw = self.to_overlay(geo.tile_size[0] as f32).max(1);
        let th = self.to_overlay(geo.tile_size[1] as f32).max(1);
        for (tile, category) in map.iter() {
            fb.fill_rect(
                (tile.x as usize).saturating_mul(tw),
                (tile.y as usize).saturating_mul(th),
                tw,
                th,
                palette.color(category),
            );
        }

        for i in 0..self.rays {
            let offset = column_offset_deg(viewer.fov_deg, i, self.rays);
            for sample in caster
                .ray(viewer, map, geo, offset)
                .take_while(|s: &RaySample| !s.blocks())
            {
                let _ = fb.set_pixel(
                    self.to_overlay(sample.pos.x),
                    self.to_overlay(sample.pos.y),
                    RAY_COLOR,
                );
            }
        }

        let half = VIEWER_SIZE / 2;
        fb.fill_rect(
            self.to_overlay(viewer.pos.x).saturating_sub(half),
            self.to_overlay(viewer.pos.y).saturating_sub(half),
            VIEWER_SIZE,
            VIEWER_SIZE,
            VIEWER_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileCategory;
    use glam::{IVec2, Vec2};

    #[test]
    fn draws_tiles_rays_and_viewer() {
        let map = TileMap::bordered(4, 4, TileCategory::WallA).unwrap();
        let geo = MapGeometry::new([80, 80], [4, 4]).unwrap();
        let palette = Palette::default();
        let viewer = ViewerState {
            pos: geo.tile_center(IVec2::new(1, 1)),
            facing_deg: 0.0,
            fov_deg: 0.0,
            ..ViewerState::default()
        };
        let minimap = Minimap {
            scale: 0.5,
            rays: 1,
        };
        let mut fb = PixelBuffer::new(64, 64);
        minimap.draw(&mut fb, &map, &geo, &palette, &viewer, &RayCaster::default());

        let wall = palette.color(TileCategory::WallA);
        let floor = palette.color(TileCategory::Empty);
        assert_eq!(fb.get_pixel(0, 0), Ok(wall));
        assert_eq!(fb.get_pixel(39, 39), Ok(wall));
        assert_eq!(fb.get_pixel(20, 25), Ok(floor));
        // Outside the 40x40 overlay nothing is drawn.
        assert_eq!(fb.get_pixel(50, 50), Ok(0));

        // Viewer at (30, 30) map pixels -> (15, 15) overlay.
        assert_eq!(fb.get_pixel(15, 15), Ok(VIEWER_COLOR));
        // Ray heads along +x until the wall at x = 60 (30 in overlay).
        let ray_px = Vec2::new(50.0, 30.0) * minimap.scale;
        assert_eq!(fb.get_pixel(ray_px.x as usize, ray_px.y as usize), Ok(RAY_COLOR));
        assert_eq!(fb.get_pixel(31, 15), Ok(wall));
    }

    #[test]
    fn oversized_scale_clips_instead_of_overflowing() {
        let map = TileMap::bordered(4, 4, TileCategory::WallA).unwrap();
        let geo = MapGeometry::new([80, 80], [4, 4]).unwrap();
        let palette = Palette::default();
        let viewer = ViewerState {
            pos: geo.tile_center(IVec2::new(1, 1)),
            ..ViewerState::default()
        };
        let minimap = Minimap {
            scale: 1e30,
            rays: 2,
        };
        let mut fb = PixelBuffer::new(8, 8);
        minimap.draw(&mut fb, &map, &geo, &palette, &viewer, &RayCaster::default());
        // Tile (0, 0) covers the whole buffer; everything else starts off-screen.
        assert!(fb.pixels().iter().all(|&c| c == palette.color(TileCategory::WallA)));
    }
}
