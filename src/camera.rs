use glam::Vec2;

use crate::geometry::{heading, wrap_degrees};
use crate::world::{MapGeometry, TileMap};

/// Viewer position and orientation. Position is in map pixel space; angles
/// are degrees, 0° along +x and increasing clockwise on screen.
///
/// The caster reads a `Copy` snapshot once per frame, so input handling can
/// never be observed half-applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    pub pos: Vec2,
    pub facing_deg: f32,
    pub fov_deg: f32,
    pub speed: f32, // pixels per second
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            pos: Vec2::new(96.0, 72.0),
            facing_deg: 0.0,
            fov_deg: 60.0,
            speed: 96.0,
        }
    }
}

impl ViewerState {
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading(self.facing_deg)
    }

    /// Perpendicular to `forward`, pointing to the viewer's right.
    #[inline]
    pub fn right(&self) -> Vec2 {
        heading(self.facing_deg + 90.0)
    }

    pub fn rotate(&mut self, delta_deg: f32) {
        self.facing_deg = wrap_degrees(self.facing_deg + delta_deg);
    }

    /// Displacement for `fwd` and `strafe` in `[-1, 1]` over `dt_s` seconds,
    /// normalized so diagonal motion is not faster.
    pub fn step_delta(&self, fwd: f32, strafe: f32, dt_s: f32) -> Vec2 {
        let dir = self.forward() * fwd + self.right() * strafe;
        crate::geometry::normalize(dir) * self.speed * dt_s
    }

    /// Move by `delta`, resolving each axis separately so the viewer slides
    /// along walls instead of stopping dead.
    pub fn translate(&mut self, delta: Vec2, map: &TileMap, geo: &MapGeometry) {
        let walkable = |p: Vec2| {
            map.lookup(geo.pixel_to_tile(p))
                .is_some_and(|t| !t.is_wall())
        };
        let try_x = Vec2::new(self.pos.x + delta.x, self.pos.y);
        if walkable(try_x) {
            self.pos = try_x;
        }
        let try_y = Vec2::new(self.pos.x, self.pos.y + delta.y);
        if walkable(try_y) {
            self.pos = try_y;
        }
    }
}
