use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use tile_raycaster::input::{HeldCommands, ViewerCommand, command_for};
use tile_raycaster::projector::ShadingPolicy;
use tile_raycaster::scaler::Scaler;
use tile_raycaster::{PixelBuffer, RenderConfig, Scene};

#[derive(Parser)]
#[command(name = "tile-raycaster", about = "First-person ray caster over a tile map")]
struct Cli {
    /// JSON render config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map file: rows of tile codes (0 empty, 1-3 walls)
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Wall texture image
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Disable fisheye correction
    #[arg(long)]
    no_fisheye: bool,

    #[arg(long, value_enum)]
    shading: Option<Shading>,

    /// Show the top-down overlay
    #[arg(long)]
    minimap: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Shading {
    Flat,
    MidlineFade,
}

impl Cli {
    fn render_config(&self) -> anyhow::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(map) = &self.map {
            config.map = Some(map.clone());
        }
        if let Some(texture) = &self.texture {
            config.texture = Some(texture.clone());
        }
        if let Some(fov) = self.fov {
            config.viewer.fov_deg = fov;
        }
        if self.no_fisheye {
            config.fisheye_correction = false;
        }
        if let Some(shading) = self.shading {
            config.shading = match shading {
                Shading::Flat => ShadingPolicy::Flat,
                Shading::MidlineFade => ShadingPolicy::MidlineFade,
            };
        }
        if self.minimap {
            config.minimap.visible = true;
        }
        config.validate()?;
        Ok(config)
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    scene: Scene,
    window_size: [u32; 2],
    turn_speed: f32,

    // FPS log
    frame_counter: u32,
    last_fps_log: Instant,

    // Internal frame, stretched to the window
    frame: PixelBuffer,
    scaler: Scaler,

    held: HeldCommands,
    last_tick: Instant,
}

impl App {
    fn new(config: &RenderConfig) -> anyhow::Result<Self> {
        let scene = Scene::from_config(config).context("building scene")?;
        let [fw, fh] = config.frame_size;
        Ok(Self {
            window: None,
            surface: None,
            scene,
            window_size: config.window_size,
            turn_speed: config.viewer.turn_speed,
            frame_counter: 0,
            last_fps_log: Instant::now(),
            frame: PixelBuffer::new(fw as usize, fh as usize),
            scaler: Scaler::default(),
            held: HeldCommands::default(),
            last_tick: Instant::now(),
        })
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let [w, h] = self.window_size;
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(LogicalSize::new(w as f64, h as f64));

        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn tick(&mut self) {
        // Cap dt so a stalled frame doesn't teleport the viewer
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;

        let scene = &mut self.scene;
        self.held.apply(
            &mut scene.viewer,
            self.turn_speed,
            dt.as_secs_f32(),
            &scene.map,
            &scene.geo,
        );
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(|e| anyhow::anyhow!("surface resize: {e}"))?;

        let (dw, dh) = (dw.get() as usize, dh.get() as usize);
        if !self.scaler.matches(dw, dh) {
            self.scaler = Scaler::new(dw, dh, self.frame.width(), self.frame.height());
        }

        self.scene.render_frame(&mut self.frame);

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("surface buffer: {e}"))?;
        self.scaler.stretch(&mut buf, &self.frame);
        buf.present()
            .map_err(|e| anyhow::anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let elapsed = self.last_fps_log.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let v = &self.scene.viewer;
            tracing::debug!(
                fps = self.frame_counter as f32 / elapsed,
                x = v.pos.x,
                y = v.pos.y,
                facing = v.facing_deg,
                "frame stats"
            );
            self.frame_counter = 0;
            self.last_fps_log = Instant::now();
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            tracing::error!(error = %e, "failed to open window");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let Some(cmd) = command_for(code) else {
                    return;
                };
                if cmd == ViewerCommand::Quit {
                    tracing::info!("quit requested");
                    event_loop.exit();
                    return;
                }
                match state {
                    ElementState::Pressed => self.held.press(cmd),
                    ElementState::Released => self.held.release(cmd),
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    tracing::error!(error = %e, "render failed");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(size) => {
                tracing::debug!(width = size.width, height = size.height, "window resized");
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.render_config()?;
    let mut app = App::new(&config)?;

    let event_loop = EventLoop::new()?;
    // Redraws are requested continuously, so Wait still renders every frame
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;
    Ok(())
}
