use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("pixel ({x}, {y}) outside {width}x{height} frame")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Row-major buffer of packed colors, the target the projector writes into.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Result<usize, FrameError> {
        if x < self.width && y < self.height {
            Ok(x + y * self.width)
        } else {
            Err(FrameError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, c: u32) -> Result<(), FrameError> {
        let i = self.index(x, y)?;
        self.pixels[i] = c;
        Ok(())
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<u32, FrameError> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn fill(&mut self, c: u32) {
        self.pixels.fill(c);
    }

    /// Fill rows `y0..y1`, clamped to the frame.
    pub fn fill_rows(&mut self, y0: usize, y1: usize, c: u32) {
        let y1 = y1.min(self.height);
        if y0 >= y1 {
            return;
        }
        self.pixels[y0 * self.width..y1 * self.width].fill(c);
    }

    /// Fill rows `y0..y1` of column `x`, clamped to the frame. `shade` maps
    /// the row index to the final color.
    pub fn fill_column(
        &mut self,
        x: usize,
        y0: usize,
        y1: usize,
        mut shade: impl FnMut(usize) -> u32,
    ) {
        if x >= self.width {
            return;
        }
        let y1 = y1.min(self.height);
        let mut idx = y0 * self.width + x;
        for y in y0..y1 {
            self.pixels[idx] = shade(y);
            idx += self.width;
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, c: u32) {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        for row in y.min(y1)..y1 {
            let start = row * self.width;
            self.pixels[start + x.min(x1)..start + x1].fill(c);
        }
    }

    /// Sky over the top half, ground over the bottom.
    pub fn clear_background(&mut self) {
        let mid = self.height / 2;
        self.fill_rows(0, mid, color::SKY);
        self.fill_rows(mid, self.height, color::GROUND);
    }

    /// Resize, discarding contents. No-op when the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_in_bounds() {
        let mut fb = PixelBuffer::new(4, 3);
        fb.set_pixel(3, 2, 7).unwrap();
        assert_eq!(fb.get_pixel(3, 2), Ok(7));
        assert_eq!(fb.pixels()[3 + 2 * 4], 7);
    }

    #[test]
    fn out_of_bounds_is_error() {
        let mut fb = PixelBuffer::new(4, 3);
        assert_eq!(
            fb.set_pixel(4, 0, 1),
            Err(FrameError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            })
        );
        assert!(fb.get_pixel(0, 3).is_err());
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn fill_column_clamps() {
        let mut fb = PixelBuffer::new(3, 4);
        fb.fill_column(1, 2, 10, |_| 5);
        let col: Vec<u32> = (0..4).map(|y| fb.get_pixel(1, y).unwrap()).collect();
        assert_eq!(col, vec![0, 0, 5, 5]);
        fb.fill_column(3, 0, 4, |_| 9);
        assert!(fb.pixels().iter().all(|&p| p != 9));
    }

    #[test]
    fn background_split() {
        let mut fb = PixelBuffer::new(2, 4);
        fb.clear_background();
        assert_eq!(fb.get_pixel(0, 1), Ok(color::SKY));
        assert_eq!(fb.get_pixel(1, 2), Ok(color::GROUND));
    }

    #[test]
    fn fill_rect_clips() {
        let mut fb = PixelBuffer::new(4, 4);
        fb.fill_rect(2, 2, 5, 5, 1);
        assert_eq!(fb.pixels().iter().filter(|&&p| p == 1).count(), 4);
        fb.fill_rect(9, 9, 2, 2, 3);
        assert!(!fb.pixels().contains(&3));
        fb.fill_rect(usize::MAX, 1, usize::MAX, 1, 4);
        fb.fill_rect(1, usize::MAX - 1, 2, 5, 4);
        assert!(!fb.pixels().contains(&4));
    }
}
