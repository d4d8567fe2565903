use std::fmt;
use std::path::Path;
use std::str::FromStr;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Material of one map cell. Rays pass through `Empty` and stop on any wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    Empty,
    WallA,
    WallB,
    WallC,
}

impl TileCategory {
    pub const ALL: [TileCategory; 4] = [Self::Empty, Self::WallA, Self::WallB, Self::WallC];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::WallA),
            2 => Some(Self::WallB),
            3 => Some(Self::WallC),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WallA => 1,
            Self::WallB => 2,
            Self::WallC => 3,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self != Self::Empty
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: invalid tile code {token:?}")]
    BadTile {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("map pixel footprint {pixels:?} is smaller than its {tiles:?} tile grid")]
    Footprint { pixels: [u32; 2], tiles: [u32; 2] },
}

/// Pixel footprint of the map and the size of one tile in pixel space.
///
/// Tile size is `pixels / tiles` per axis with integer truncation, so
/// tiles need not be square (640x480 over 10x10 gives 64x48 tiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGeometry {
    pub pixels: [u32; 2],
    pub tiles: [u32; 2],
    pub tile_size: [u32; 2],
}

impl MapGeometry {
    pub fn new(pixels: [u32; 2], tiles: [u32; 2]) -> Result<Self, MapError> {
        if tiles[0] == 0 || tiles[1] == 0 || pixels[0] < tiles[0] || pixels[1] < tiles[1] {
            return Err(MapError::Footprint { pixels, tiles });
        }
        Ok(Self {
            pixels,
            tiles,
            tile_size: [pixels[0] / tiles[0], pixels[1] / tiles[1]],
        })
    }

    /// Tile index containing a pixel-space position. Negative positions map
    /// to negative indices so callers can reject them.
    #[inline]
    pub fn pixel_to_tile(&self, pos: Vec2) -> IVec2 {
        IVec2::new(
            (pos.x / self.tile_size[0] as f32).floor() as i32,
            (pos.y / self.tile_size[1] as f32).floor() as i32,
        )
    }

    /// Top-left pixel of a tile.
    #[inline]
    pub fn tile_to_pixel(&self, tile: IVec2) -> Vec2 {
        Vec2::new(
            (tile.x * self.tile_size[0] as i32) as f32,
            (tile.y * self.tile_size[1] as i32) as f32,
        )
    }

    #[inline]
    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        self.tile_to_pixel(tile)
            + Vec2::new(self.tile_size[0] as f32, self.tile_size[1] as f32) * 0.5
    }
}

/// Static row-major grid of tile categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<TileCategory>,
}

impl TileMap {
    pub fn from_rows(rows: Vec<Vec<TileCategory>>) -> Result<Self, MapError> {
        let width = rows.first().map(Vec::len).ok_or(MapError::Empty)?;
        if width == 0 {
            return Err(MapError::Empty);
        }
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            tiles.extend(cells);
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Build a map from a flat table of tile codes, as stored at compile time.
    pub fn from_codes(width: usize, codes: &[u8]) -> Result<Self, MapError> {
        if width == 0 || codes.is_empty() {
            return Err(MapError::Empty);
        }
        let rows = codes
            .chunks(width)
            .enumerate()
            .map(|(row, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(col, &c)| {
                        TileCategory::from_code(c).ok_or_else(|| MapError::BadTile {
                            row,
                            col,
                            token: c.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Open interior surrounded by a solid ring of `wall`.
    pub fn bordered(width: usize, height: usize, wall: TileCategory) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        let mut tiles = vec![TileCategory::Empty; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    tiles[x + y * width] = wall;
                }
            }
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        let map: Self = text.parse()?;
        tracing::info!(path = %path.display(), width = map.width, height = map.height, "loaded map");
        Ok(map)
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
    pub fn dims(&self) -> [u32; 2] {
        [self.width as u32, self.height as u32]
    }

    /// Bounds-checked lookup. `None` for any index outside the grid.
    #[inline]
    pub fn lookup(&self, tile: IVec2) -> Option<TileCategory> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as usize, tile.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles[x + y * self.width])
    }

    /// Sets a tile, returning false when the index is outside the grid.
    pub fn set(&mut self, tile: IVec2, category: TileCategory) -> bool {
        if self.lookup(tile).is_none() {
            return false;
        }
        let idx = tile.x as usize + tile.y as usize * self.width;
        self.tiles[idx] = category;
        true
    }

    /// Row-major iteration over `(tile index, category)`.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, TileCategory)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &t)| {
            let x = (i % self.width) as i32;
            let y = (i / self.width) as i32;
            (IVec2::new(x, y), t)
        })
    }
}

impl Default for TileMap {
    fn default() -> Self {
        #[rustfmt::skip]
        const CODES: [u8; 100] = [
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 2, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 2, 0, 3, 0, 1,
            1, 0, 0, 0, 0, 0, 0, 3, 0, 1,
            1, 0, 2, 2, 0, 0, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 0, 3, 0, 0, 1,
            1, 0, 0, 3, 0, 0, 0, 0, 0, 1,
            1, 0, 0, 0, 0, 0, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
        ];
        match Self::from_codes(10, &CODES) {
            Ok(map) => map,
            Err(_) => Self {
                width: 10,
                height: 10,
                tiles: vec![TileCategory::WallA; 100],
            },
        }
    }
}

impl FromStr for TileMap {
    type Err = MapError;

    /// Rows of tile codes separated by whitespace or commas. Blank lines and
    /// `#` comments are skipped.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let row = rows.len();
            let cells = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tok| !tok.is_empty())
                .enumerate()
                .map(|(col, tok)| {
                    tok.parse::<u8>()
                        .ok()
                        .and_then(TileCategory::from_code)
                        .ok_or_else(|| MapError::BadTile {
                            row,
                            col,
                            token: tok.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::from_rows(rows)
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for row in self.tiles.chunks(self.width) {
            let line: Vec<String> = row.iter().map(|t| t.code().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
