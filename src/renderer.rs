use crate::camera::ViewerState;
use crate::caster::{RayCaster, RayHit, WallColoring};
use crate::color::Palette;
use crate::config::RenderConfig;
use crate::framebuffer::PixelBuffer;
use crate::minimap::Minimap;
use crate::projector::Projector;
use crate::texture::Texture;
use crate::world::{MapError, MapGeometry, TileMap};

/// Everything one frame reads, owned by the frame loop.
#[derive(Debug, Clone)]
pub struct Scene {
    pub map: TileMap,
    pub geo: MapGeometry,
    pub viewer: ViewerState,
    pub caster: RayCaster,
    pub projector: Projector,
    pub palette: Palette,
    pub minimap: Option<Minimap>,
    hits: Vec<RayHit>,
}

impl Scene {
    pub fn new(
        map: TileMap,
        geo: MapGeometry,
        viewer: ViewerState,
        caster: RayCaster,
        projector: Projector,
    ) -> Self {
        let palette = match &caster.coloring {
            WallColoring::Flat(p) => p.clone(),
            WallColoring::Textured(_) => Palette::default(),
        };
        Self {
            map,
            geo,
            viewer,
            caster,
            projector,
            palette,
            minimap: None,
            hits: Vec::new(),
        }
    }

    /// Build a scene from config. The map comes from `config.map` when set,
    /// the built-in level otherwise. A texture that fails to load falls back
    /// to flat colors.
    pub fn from_config(config: &RenderConfig) -> Result<Self, MapError> {
        let map = match &config.map {
            Some(path) => TileMap::load(path)?,
            None => TileMap::default(),
        };
        let geo = MapGeometry::new(config.map_pixels, map.dims())?;
        let palette = config.palette();

        let texture = config.texture.as_deref().and_then(|path| match Texture::load(path) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "texture unavailable, using flat colors");
                None
            }
        });

        let caster = RayCaster {
            step: config.march_step,
            ray_length: config.ray_length,
            fisheye_correction: config.fisheye_correction,
            coloring: WallColoring::from_texture(texture, palette.clone()),
        };
        let projector = Projector::new(config.ray_length, config.shading);

        let mut scene = Self::new(map, geo, config.viewer.viewer(), caster, projector);
        scene.palette = palette;
        scene.minimap = config.minimap.visible.then_some(Minimap {
            scale: config.minimap.scale,
            rays: config.minimap.rays,
        });
        tracing::info!(
            tiles = ?scene.map.dims(),
            tile_size = ?scene.geo.tile_size,
            textured = matches!(scene.caster.coloring, WallColoring::Textured(_)),
            shading = ?config.shading,
            "scene ready"
        );
        Ok(scene)
    }

    /// Hit records from the last rendered frame.
    #[inline]
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// Background, then one cast per frame column, then projection, then the
    /// optional overlay.
    pub fn render_frame(&mut self, fb: &mut PixelBuffer) {
        fb.clear_background();

        // Snapshot so the whole frame sees one viewer state.
        let viewer = self.viewer;
        self.hits.clear();
        self.hits.resize(fb.width(), RayHit::default());
        self.caster
            .cast_frame(&viewer, &self.map, &self.geo, &mut self.hits);
        self.projector.project(&self.hits, fb);

        if let Some(minimap) = &self.minimap {
            minimap.draw(fb, &self.map, &self.geo, &self.palette, &viewer, &self.caster);
        }

        tracing::trace!(
            columns = self.hits.len(),
            hits = self.hits.iter().filter(|h| h.was_hit).count(),
            "frame rendered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::projector::ShadingPolicy;

    #[test]
    fn default_config_builds_scene() {
        let scene = Scene::from_config(&RenderConfig::default()).unwrap();
        assert_eq!(scene.map, TileMap::default());
        assert_eq!(scene.geo.tile_size, [64, 48]);
        assert!(scene.minimap.is_none());
        assert!(matches!(scene.caster.coloring, WallColoring::Flat(_)));
    }

    #[test]
    fn missing_texture_falls_back_to_flat() {
        let config = RenderConfig {
            texture: Some(std::env::temp_dir().join("tile-raycaster-absent.png")),
            ..RenderConfig::default()
        };
        let scene = Scene::from_config(&config).unwrap();
        assert!(matches!(scene.caster.coloring, WallColoring::Flat(_)));
    }

    #[test]
    fn missing_map_is_error() {
        let config = RenderConfig {
            map: Some(std::env::temp_dir().join("tile-raycaster-absent.map")),
            ..RenderConfig::default()
        };
        assert!(matches!(Scene::from_config(&config), Err(MapError::Io(_))));
    }

    #[test]
    fn frame_resizes_hits_to_width() {
        let mut scene = Scene::from_config(&RenderConfig::default()).unwrap();
        let mut fb = PixelBuffer::new(32, 24);
        scene.render_frame(&mut fb);
        assert_eq!(scene.hits().len(), 32);
        fb.resize(16, 24);
        scene.render_frame(&mut fb);
        assert_eq!(scene.hits().len(), 16);
    }

    #[test]
    fn misses_leave_background() {
        let mut config = RenderConfig::default();
        config.ray_length = 4.0;
        config.shading = ShadingPolicy::MidlineFade;
        let mut scene = Scene::from_config(&config).unwrap();
        let mut fb = PixelBuffer::new(8, 6);
        scene.render_frame(&mut fb);
        assert!(scene.hits().iter().all(|h| !h.was_hit));
        assert_eq!(fb.get_pixel(3, 0), Ok(color::SKY));
        assert_eq!(fb.get_pixel(3, 5), Ok(color::GROUND));
    }
}
