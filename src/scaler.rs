use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::color::{pack_argb, unpack};
use crate::framebuffer::PixelBuffer;

/// Precomputed mapping from window pixels to frame neighbors + weights,
/// rebuilt whenever either side changes size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scaler {
    dst_w: usize,
    dst_h: usize,
    x0: Vec<usize>,
    x1: Vec<usize>,
    wx: Vec<u16>,
    y0: Vec<usize>,
    y1: Vec<usize>,
    wy: Vec<u16>,
}

/// Source neighbor pair and 8.8 fixed-point weight for each destination index.
fn axis_lut(dst: usize, src: usize) -> (Vec<usize>, Vec<usize>, Vec<u16>) {
    let last = src.saturating_sub(1);
    let ratio = src as f32 / dst.max(1) as f32;
    let mut lo = Vec::with_capacity(dst);
    let mut hi = Vec::with_capacity(dst);
    let mut w = Vec::with_capacity(dst);
    for d in 0..dst {
        let f = d as f32 * ratio;
        let a = (f.floor() as usize).min(last);
        lo.push(a);
        hi.push((a + 1).min(last));
        w.push(((f - a as f32).clamp(0.0, 1.0) * 256.0).round() as u16);
    }
    (lo, hi, w)
}

impl Scaler {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        let (x0, x1, wx) = axis_lut(dst_w, src_w);
        let (y0, y1, wy) = axis_lut(dst_h, src_h);
        tracing::debug!(dst_w, dst_h, src_w, src_h, "rebuilt scale table");
        Self {
            dst_w,
            dst_h,
            x0,
            x1,
            wx,
            y0,
            y1,
            wy,
        }
    }

    #[inline]
    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.dst_w == dst_w && self.dst_h == dst_h
    }

    /// Bilinear stretch of `src` into `dst` (`dst_w * dst_h` pixels).
    /// Rows are processed in parallel for cache friendly writes.
    pub fn stretch(&self, dst: &mut [u32], src: &PixelBuffer) {
        let sw = src.width();
        let px = src.pixels();
        if px.is_empty() || self.dst_w == 0 {
            return;
        }
        dst.par_chunks_mut(self.dst_w)
            .take(self.dst_h)
            .enumerate()
            .for_each(|(y, dst_row)| {
                let row0 = self.y0[y] * sw;
                let row1 = self.y1[y] * sw;
                let wy = self.wy[y] as u32;

                for (x, out) in dst_row.iter_mut().enumerate() {
                    let (x0, x1) = (self.x0[x], self.x1[x]);
                    let wx = self.wx[x] as u32;
                    let top = lerp_color(px[row0 + x0], px[row0 + x1], wx);
                    let bot = lerp_color(px[row1 + x0], px[row1 + x1], wx);
                    *out = lerp_color(top, bot, wy);
                }
            });
    }
}

/// Per-channel blend of two packed colors, `w256` in `[0, 256]` toward `b`.
/// Alpha blends like the color channels.
#[inline]
fn lerp_color(a: u32, b: u32, w256: u32) -> u32 {
    let (ar, ag, ab, aa) = unpack(a);
    let (br, bg, bb, ba) = unpack(b);
    let mix = |x: u8, y: u8| ((x as u32 * (256 - w256) + y as u32 * w256) >> 8) as u8;
    pack_argb(mix(ar, br), mix(ag, bg), mix(ab, bb), mix(aa, ba))
}
