use std::cell::RefCell;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use monitor_reveal::config::SceneConfig;
use monitor_reveal::projection::SurfaceSize;
use monitor_reveal::render::ImageTexture;
use monitor_reveal::scheduler::MonitorScene;
use monitor_reveal::scroll::{
    ListenerId, NullHook, ProgressUpdate, ScrollDispatcher, ScrollInput,
};

/// Desktop preview for the scroll-driven monitor scene. The mouse wheel
/// stands in for page scroll.
#[derive(Parser, Debug)]
#[command(name = "monitor-reveal")]
struct Args {
    /// Optional YAML tuning file; defaults apply when omitted.
    config: Option<PathBuf>,

    /// Image to show on the monitor screen instead of the mock desktop.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Start with the texture playing (continuous redraw).
    #[arg(long)]
    play: bool,
}

/// Wheel travel per scroll line, logical pixels.
const LINE_HEIGHT: f32 = 48.0;

struct DemoApp {
    scene: MonitorScene,
    dispatcher: ScrollDispatcher,
    subscription: Option<ListenerId>,
    latest: Rc<RefCell<Option<ProgressUpdate>>>,
    window: Option<Rc<Window>>,
    // Kept alive for the surface's display connection.
    _context: Option<softbuffer::Context<Rc<Window>>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    scroll_y: f32,
    hovering: bool,
    playing: bool,
}

impl DemoApp {
    fn new(cfg: SceneConfig, texture: Option<Box<ImageTexture>>, play: bool) -> Self {
        let mut scene = MonitorScene::new(cfg.clone());
        if let Some(texture) = texture {
            scene.set_texture(texture);
        }
        let dispatcher = ScrollDispatcher::new(cfg.scroll.clone(), Box::new(NullHook));
        Self {
            scene,
            dispatcher,
            subscription: None,
            latest: Rc::new(RefCell::new(None)),
            window: None,
            _context: None,
            surface: None,
            scroll_y: 0.0,
            hovering: false,
            playing: play,
        }
    }

    fn surface_size(&self) -> Option<SurfaceSize> {
        let window = self.window.as_ref()?;
        let size = window.inner_size();
        Some(SurfaceSize::new(
            size.width,
            size.height,
            window.scale_factor() as f32,
        ))
    }

    fn scroll_input(&self) -> Option<ScrollInput> {
        let size = self.surface_size()?;
        Some(ScrollInput {
            scroll_y: self.scroll_y,
            viewport_width: size.logical_width(),
            viewport_height: size.logical_height(),
        })
    }

    fn resize_surface(&mut self) {
        let Some(size) = self.surface_size() else {
            return;
        };
        if let Some(surface) = &mut self.surface {
            let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
            else {
                return;
            };
            if let Err(err) = surface.resize(w, h) {
                error!(%err, "failed to resize presentation surface");
                return;
            }
        }
        self.scene.resize(size);
    }

    fn redraw(&mut self) {
        self.dispatcher.run_frame();
        if let Some(update) = self.latest.borrow_mut().take() {
            self.scene.set_progress(update.progress);
            debug!(
                progress = update.progress,
                companion_scale = update.companion.scale,
                companion_translate_y = update.companion.translate_y,
                "scroll update"
            );
        }

        self.scene.frame();
        self.present();

        if self.scene.wants_frame() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn present(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        let Some(pixmap) = self.scene.pixels() else {
            return;
        };
        let mut buffer = match surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(err) => {
                error!(%err, "failed to borrow presentation buffer");
                return;
            }
        };
        if buffer.len() != (pixmap.width() * pixmap.height()) as usize {
            return;
        }
        for (dst, src) in buffer.iter_mut().zip(pixmap.data().chunks_exact(4)) {
            *dst = ((src[0] as u32) << 16) | ((src[1] as u32) << 8) | src[2] as u32;
        }
        if let Err(err) = buffer.present() {
            error!(%err, "failed to present frame");
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("monitor-reveal")
            .with_inner_size(LogicalSize::new(1000.0, 640.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(err) => {
                error!(%err, "failed to create window");
                event_loop.exit();
                return;
            }
        };

        let context = match softbuffer::Context::new(window.clone()) {
            Ok(context) => context,
            Err(err) => {
                error!(%err, "failed to create presentation context");
                event_loop.exit();
                return;
            }
        };
        let surface = match softbuffer::Surface::new(&context, window.clone()) {
            Ok(surface) => surface,
            Err(err) => {
                error!(%err, "failed to create presentation surface");
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self._context = Some(context);
        self.surface = Some(surface);

        let sink = self.latest.clone();
        self.subscription = Some(
            self.dispatcher
                .subscribe(Box::new(move |update| *sink.borrow_mut() = Some(*update))),
        );

        if let Some(size) = self.surface_size() {
            if let Err(err) = self.scene.attach(size) {
                error!(%err, "failed to attach scene");
                event_loop.exit();
                return;
            }
            self.scene.set_playing(self.playing);
        }
        self.resize_surface();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(id) = self.subscription.take() {
                    self.dispatcher.unsubscribe(id);
                }
                self.scene.teardown();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_surface();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.scroll_y = (self.scroll_y - delta_y).max(0.0);
                if let Some(input) = self.scroll_input() {
                    if self.dispatcher.on_input(input) {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else { return };
                let logical = position.to_logical::<f64>(window.scale_factor());
                self.scene.pointer_moved(logical.x as f32, logical.y as f32);
                let hovering = self.scene.hovering_screen();
                if hovering != self.hovering {
                    self.hovering = hovering;
                    debug!(hovering, "screen hover changed");
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.scene.pointer_left();
                self.hovering = false;
            }
            WindowEvent::Occluded(occluded) => {
                self.scene.set_visible(!occluded);
                if !occluded {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Space)
                {
                    self.playing = !self.playing;
                    info!(playing = self.playing, "toggled texture playback");
                    self.scene.set_playing(self.playing);
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.scene.wants_frame() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => SceneConfig::from_yaml_file(path)?.validated()?,
        None => SceneConfig::default(),
    };

    let texture = match &args.texture {
        Some(path) => {
            let texture = ImageTexture::from_path(path)
                .with_context(|| format!("failed to load texture {}", path.display()))?;
            info!(path = %path.display(), "loaded screen texture");
            Some(Box::new(texture))
        }
        None => {
            if args.play {
                warn!("--play has no effect without --texture");
            }
            None
        }
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = DemoApp::new(cfg, texture, args.play);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;
    Ok(())
}
