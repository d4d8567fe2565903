//! Packed 32-bit colors and the tile palette.
//!
//! Layout is `A<<24 | R<<16 | G<<8 | B`. softbuffer ignores the top byte, so
//! alpha only matters for shading math done before presentation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::TileCategory;

#[inline]
pub const fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    pack_argb(r, g, b, 255)
}

/// Returns `(r, g, b, a)`.
#[inline]
pub const fn unpack(c: u32) -> (u8, u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8)
}

/// Scale RGB by `intensity` in `[0, 1]` and store it as alpha, i.e. the
/// color composited over black.
#[inline]
pub fn shade(c: u32, intensity: f32) -> u32 {
    let k = (intensity.clamp(0.0, 1.0) * 256.0) as u32;
    let (r, g, b, _) = unpack(c);
    let scale = |v: u8| ((v as u32 * k) >> 8).min(255) as u8;
    pack_argb(scale(r), scale(g), scale(b), (k.min(255)) as u8)
}

pub const SKY: u32 = pack_rgb(30, 30, 70);
pub const GROUND: u32 = pack_rgb(40, 40, 40);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub tile: TileCategory,
    pub rgb: [u8; 3],
}

/// Table from tile category to display color. Categories without an entry
/// fall back to `missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<TileCategory, u32>,
    missing: u32,
}

impl Palette {
    pub fn new(missing: u32) -> Self {
        Self {
            colors: BTreeMap::new(),
            missing,
        }
    }

    pub fn with(mut self, tile: TileCategory, color: u32) -> Self {
        self.insert(tile, color);
        self
    }

    pub fn insert(&mut self, tile: TileCategory, color: u32) {
        self.colors.insert(tile, color);
    }

    #[inline]
    pub fn color(&self, tile: TileCategory) -> u32 {
        self.colors.get(&tile).copied().unwrap_or(self.missing)
    }

    /// Color used for rays that leave the grid without meeting a wall tile.
    #[inline]
    pub fn boundary(&self) -> u32 {
        self.missing
    }

    pub fn from_entries(entries: &[PaletteEntry]) -> Self {
        entries.iter().fold(Self::default(), |p, e| {
            p.with(e.tile, pack_rgb(e.rgb[0], e.rgb[1], e.rgb[2]))
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(pack_rgb(200, 200, 200))
            .with(TileCategory::Empty, pack_rgb(128, 128, 128))
            .with(TileCategory::WallA, pack_rgb(128, 0, 0))
            .with(TileCategory::WallB, pack_rgb(180, 180, 250))
            .with(TileCategory::WallC, pack_rgb(180, 250, 180))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_layout() {
        assert_eq!(pack_argb(0x11, 0x22, 0x33, 0x44), 0x4411_2233);
        assert_eq!(unpack(0x4411_2233), (0x11, 0x22, 0x33, 0x44));
        assert_eq!(pack_rgb(0, 0, 0), 0xFF00_0000);
    }

    #[test]
    fn shade_extremes() {
        let c = pack_rgb(200, 100, 50);
        assert_eq!(shade(c, 1.0), pack_argb(200, 100, 50, 255));
        assert_eq!(shade(c, 0.0), 0);
        let (r, g, b, a) = unpack(shade(c, 0.5));
        assert_eq!((r, g, b, a), (100, 50, 25, 128));
    }

    #[test]
    fn palette_lookup_and_override() {
        let p = Palette::default();
        assert_eq!(p.color(TileCategory::WallA), pack_rgb(128, 0, 0));
        let p = p.with(TileCategory::WallA, pack_rgb(1, 2, 3));
        assert_eq!(p.color(TileCategory::WallA), pack_rgb(1, 2, 3));

        let sparse = Palette::new(pack_rgb(9, 9, 9));
        assert_eq!(sparse.color(TileCategory::WallC), pack_rgb(9, 9, 9));
    }

    #[test]
    fn palette_from_entries_keeps_defaults() {
        let p = Palette::from_entries(&[PaletteEntry {
            tile: TileCategory::WallB,
            rgb: [10, 20, 30],
        }]);
        assert_eq!(p.color(TileCategory::WallB), pack_rgb(10, 20, 30));
        assert_eq!(p.color(TileCategory::WallA), pack_rgb(128, 0, 0));
    }
}
