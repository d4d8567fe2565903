use serde::{Deserialize, Serialize};

use crate::caster::RayHit;
use crate::color::shade;
use crate::framebuffer::PixelBuffer;

/// Per-pixel shading applied along a wall strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadingPolicy {
    /// The sampled color, unchanged.
    #[default]
    Flat,
    /// Brightest on the horizon line, fading toward the strip ends.
    MidlineFade,
}

/// Lowest intensity `MidlineFade` reaches at the top and bottom of the view.
const FADE_FLOOR: f32 = 0.25;

/// Vertical extent of a wall strip, rows `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strip {
    pub line_size: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Converts hit records into shaded vertical strips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Distance at which a wall shrinks to nothing; the caster's ray length.
    pub ray_length: f32,
    pub shading: ShadingPolicy,
}

impl Projector {
    pub fn new(ray_length: f32, shading: ShadingPolicy) -> Self {
        Self {
            ray_length,
            shading,
        }
    }

    /// Inverse-distance strip: closer walls give a taller strip centred on
    /// the horizon.
    pub fn strip(&self, distance: f32, viewport_height: usize) -> Strip {
        let line_size = if self.ray_length > 0.0 {
            (1.0 - distance / self.ray_length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let half = viewport_height as f32 * 0.5;
        Strip {
            line_size,
            top: half - line_size * half,
            bottom: half + line_size * half,
        }
    }

    #[inline]
    fn intensity(&self, y: usize, half: f32) -> f32 {
        match self.shading {
            ShadingPolicy::Flat => 1.0,
            ShadingPolicy::MidlineFade => {
                if half <= 0.0 {
                    return 1.0;
                }
                let off = ((y as f32 + 0.5) - half).abs() / half;
                (1.0 - off).max(FADE_FLOOR)
            }
        }
    }

    /// Write one strip per hit column into `fb`. Columns without a hit are
    /// left untouched so the background shows through. Hits beyond the
    /// frame width are ignored.
    pub fn project(&self, hits: &[RayHit], fb: &mut PixelBuffer) {
        let height = fb.height();
        let half = height as f32 * 0.5;

        for (x, hit) in hits.iter().enumerate().take(fb.width()) {
            if !hit.was_hit {
                continue;
            }
            let strip = self.strip(hit.distance, height);
            let y0 = strip.top.round().max(0.0) as usize;
            let y1 = (strip.bottom.round().max(0.0) as usize).min(height);
            let color = hit.color;
            match self.shading {
                ShadingPolicy::Flat => fb.fill_column(x, y0, y1, |_| color),
                ShadingPolicy::MidlineFade => {
                    fb.fill_column(x, y0, y1, |y| shade(color, self.intensity(y, half)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: usize = 480;

    fn hit(distance: f32, color: u32) -> RayHit {
        RayHit {
            distance,
            was_hit: true,
            color,
        }
    }

    fn column(fb: &PixelBuffer, x: usize) -> Vec<u32> {
        (0..fb.height()).map(|y| fb.get_pixel(x, y).unwrap()).collect()
    }

    #[test]
    fn zero_distance_fills_full_height() {
        let p = Projector::new(300.0, ShadingPolicy::Flat);
        let s = p.strip(0.0, H);
        assert_eq!(s.line_size, 1.0);
        assert_eq!(s.top, 0.0);
        assert_eq!(s.bottom, H as f32);

        let mut fb = PixelBuffer::new(1, H);
        p.project(&[hit(0.0, 7)], &mut fb);
        assert!(column(&fb, 0).iter().all(|&c| c == 7));
    }

    #[test]
    fn strip_shrinks_with_distance() {
        let p = Projector::new(300.0, ShadingPolicy::Flat);
        let near = p.strip(30.0, H);
        let far = p.strip(240.0, H);
        assert!(near.bottom - near.top > far.bottom - far.top);
        let gone = p.strip(500.0, H);
        assert_eq!(gone.line_size, 0.0);
        assert_eq!(gone.top, gone.bottom);
    }

    #[test]
    fn half_distance_covers_middle_half() {
        let p = Projector::new(300.0, ShadingPolicy::Flat);
        let mut fb = PixelBuffer::new(1, 8);
        p.project(&[hit(150.0, 3)], &mut fb);
        assert_eq!(column(&fb, 0), vec![0, 0, 3, 3, 3, 3, 0, 0]);
    }

    #[test]
    fn miss_writes_nothing() {
        let p = Projector::new(300.0, ShadingPolicy::MidlineFade);
        let mut fb = PixelBuffer::new(3, 10);
        fb.fill(42);
        let hits = [RayHit::default(), hit(0.0, 5), RayHit::default()];
        p.project(&hits, &mut fb);
        assert!(column(&fb, 0).iter().all(|&c| c == 42));
        assert!(column(&fb, 2).iter().all(|&c| c == 42));
        assert!(column(&fb, 1).iter().all(|&c| c != 42));
    }

    #[test]
    fn extra_hits_beyond_width_are_ignored() {
        let p = Projector::new(300.0, ShadingPolicy::Flat);
        let mut fb = PixelBuffer::new(1, 4);
        p.project(&[hit(0.0, 1), hit(0.0, 2)], &mut fb);
        assert_eq!(column(&fb, 0), vec![1; 4]);
    }

    #[test]
    fn midline_fade_brightest_at_centre() {
        let p = Projector::new(300.0, ShadingPolicy::MidlineFade);
        let mut fb = PixelBuffer::new(1, 100);
        let white = crate::color::pack_rgb(255, 255, 255);
        p.project(&[hit(0.0, white)], &mut fb);

        let red = |c: u32| crate::color::unpack(c).0;
        let col = column(&fb, 0);
        assert!(red(col[50]) > red(col[75]));
        assert!(red(col[75]) > red(col[99]));
        // Ends are clamped to the fade floor, never black.
        assert!(red(col[0]) >= (255.0 * FADE_FLOOR) as u8 - 1);
    }
}
