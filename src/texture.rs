use std::path::Path;

use crate::color::pack_argb;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("texture has zero size")]
    Empty,
}

/// Decoded texture, stored as packed colors in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
}

impl Texture {
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        let texels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                pack_argb(r, g, b, a)
            })
            .collect();
        let tex = Self::from_texels(w as usize, h as usize, texels)?;
        tracing::info!(path = %path.display(), width = w, height = h, "loaded texture");
        Ok(tex)
    }

    pub fn from_texels(width: usize, height: usize, texels: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || texels.len() != width * height {
            return Err(TextureError::Empty);
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Fetch the texel at a pixel coordinate, wrapping on both axes.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> u32 {
        let tx = x.rem_euclid(self.width as i32) as usize;
        let ty = y.rem_euclid(self.height as i32) as usize;
        self.texels[tx + ty * self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        Texture::from_texels(2, 2, vec![1, 2, 3, 4]).unwrap()
    }

    #[test]
    fn sample_wraps() {
        let t = checker();
        assert_eq!(t.sample(0, 0), 1);
        assert_eq!(t.sample(1, 1), 4);
        assert_eq!(t.sample(2, 1), 3);
        assert_eq!(t.sample(-1, 0), 2);
        assert_eq!(t.sample(5, -3), 4);
    }

    #[test]
    fn rejects_mismatched_size() {
        assert!(matches!(
            Texture::from_texels(2, 2, vec![0; 3]),
            Err(TextureError::Empty)
        ));
        assert!(Texture::from_texels(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        let missing = std::env::temp_dir().join("tile-raycaster-no-such-texture.png");
        assert!(Texture::load(&missing).is_err());
    }

    #[test]
    fn load_png() {
        let path = std::env::temp_dir().join("tile-raycaster-texture-test.png");
        let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        img.save(&path).unwrap();

        let tex = Texture::load(&path).unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(tex.sample(2, 1), pack_argb(20, 20, 7, 255));
        let _ = std::fs::remove_file(&path);
    }
}
