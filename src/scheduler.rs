//! Frame scheduling and scene lifecycle.
//!
//! [`FramePump`] is the one-in-flight frame latch shared by the scroll
//! dispatcher and the scene. [`MonitorScene`] owns the drawing surface and
//! decides when a frame is worth painting: on demand after state changes, or
//! continuously while a playing texture is visible.

use anyhow::{Result, ensure};
use tiny_skia::Pixmap;
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::geometry::{QuadCache, ScreenQuad};
use crate::projection::SurfaceSize;
use crate::render::{self, TextureSource};
use crate::scroll::{CompanionTransform, ScrollDriver, ScrollInput};

/// Collapses any number of frame requests into a single pending frame.
#[derive(Debug, Default)]
pub struct FramePump {
    pending: bool,
}

impl FramePump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame. Returns true when the caller must schedule one;
    /// false means a frame is already on the way.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending flag at the top of a frame. Returns whether a
    /// frame was actually due.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Owns the pixmap, the current pose and the optional texture source, and
/// schedules redraws for its host.
///
/// Hosts call the setters as their events arrive, then call
/// [`frame`](Self::frame) once per display tick; it returns whether anything
/// was painted. [`wants_frame`](Self::wants_frame) tells the host whether to
/// keep its redraw loop hot.
pub struct MonitorScene {
    cfg: SceneConfig,
    driver: ScrollDriver,
    size: Option<SurfaceSize>,
    pixmap: Option<Pixmap>,
    progress: f32,
    companion: CompanionTransform,
    pointer: Option<(f32, f32)>,
    quad_cache: QuadCache,
    texture: Option<Box<dyn TextureSource>>,
    playing: bool,
    visible: bool,
    pump: FramePump,
    torn_down: bool,
    frames_drawn: u64,
}

impl MonitorScene {
    pub fn new(cfg: SceneConfig) -> Self {
        let driver = ScrollDriver::new(cfg.scroll.clone());
        let start = driver.update(ScrollInput {
            scroll_y: 0.0,
            viewport_width: f32::MAX,
            viewport_height: 1.0,
        });
        Self {
            cfg,
            driver,
            size: None,
            pixmap: None,
            progress: start.progress,
            companion: start.companion,
            pointer: None,
            quad_cache: QuadCache::default(),
            texture: None,
            playing: false,
            // Hosts without visibility signals never call set_visible and
            // keep animating, which degrades safely.
            visible: true,
            pump: FramePump::new(),
            torn_down: false,
            frames_drawn: 0,
        }
    }

    /// Bind the scene to a surface and paint the first frame synchronously,
    /// so the host never presents an unpainted surface.
    pub fn attach(&mut self, size: SurfaceSize) -> Result<()> {
        ensure!(!self.torn_down, "scene already torn down");
        info!(
            width = size.width,
            height = size.height,
            dpr = size.device_pixel_ratio,
            "attaching scene surface"
        );
        self.apply_size(size);
        self.render_now();
        Ok(())
    }

    /// Adopt a new surface size. Degenerate sizes drop the pixmap and turn
    /// rendering into a no-op until a real size arrives.
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.torn_down {
            return;
        }
        debug!(width = size.width, height = size.height, "resizing scene");
        self.apply_size(size);
        self.pump.request();
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        self.quad_cache.invalidate();
        self.pixmap = if size.is_empty() {
            None
        } else {
            Pixmap::new(size.width, size.height)
        };
        self.size = Some(size);
    }

    /// Feed a scroll sample. Recomputes the pose and schedules a frame when
    /// one is not already pending.
    pub fn set_scroll(&mut self, input: ScrollInput) {
        if self.torn_down {
            return;
        }
        let update = self.driver.update(input);
        self.progress = update.progress;
        self.companion = update.companion;
        self.pump.request();
    }

    /// Set the pose directly, bypassing the scroll mapping. Used by hosts
    /// that animate progress themselves.
    pub fn set_progress(&mut self, progress: f32) {
        if self.torn_down {
            return;
        }
        self.progress = progress.clamp(0.0, 1.0);
        self.pump.request();
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn companion(&self) -> CompanionTransform {
        self.companion
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Whether the pointer currently sits over the projected screen area.
    pub fn hovering_screen(&mut self) -> bool {
        let Some((x, y)) = self.pointer else {
            return false;
        };
        let Some(size) = self.size else {
            return false;
        };
        if size.is_empty() {
            return false;
        }
        self.quad_cache
            .get(&size, self.progress, &self.cfg.projection)
            .contains(x, y)
    }

    /// Projected screen corners at the current pose, for hosts that overlay
    /// content on the screen area.
    pub fn screen_quad(&mut self) -> Option<ScreenQuad> {
        let size = self.size?;
        if size.is_empty() {
            return None;
        }
        Some(
            self.quad_cache
                .get(&size, self.progress, &self.cfg.projection),
        )
    }

    pub fn set_texture(&mut self, texture: Box<dyn TextureSource>) {
        if self.torn_down {
            return;
        }
        self.texture = Some(texture);
        self.pump.request();
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.torn_down || self.playing == playing {
            return;
        }
        self.playing = playing;
        if !playing {
            if let Some(texture) = &mut self.texture {
                texture.pause();
            }
        }
        self.pump.request();
    }

    /// Visibility gate for the continuous loop. An occluded scene stops
    /// burning frames; becoming visible again repaints immediately.
    pub fn set_visible(&mut self, visible: bool) {
        if self.torn_down || self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.pump.request();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while the scene should repaint every display tick: a playing
    /// texture on a visible surface.
    pub fn continuous_active(&self) -> bool {
        !self.torn_down && self.playing && self.visible && self.texture.is_some()
    }

    /// Whether the host should schedule another redraw.
    pub fn wants_frame(&self) -> bool {
        !self.torn_down && (self.pump.is_pending() || self.continuous_active())
    }

    /// Run one display tick. Paints when a frame is pending or the
    /// continuous loop is active; returns whether a paint happened.
    pub fn frame(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let due = self.pump.begin_frame() || self.continuous_active();
        if !due {
            return false;
        }
        self.render_now();
        true
    }

    fn render_now(&mut self) {
        let Some(size) = self.size else {
            return;
        };
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        render::draw_scene(
            pixmap,
            &size,
            self.progress,
            self.texture.as_deref(),
            &self.cfg,
        );
        self.frames_drawn += 1;
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Painted pixels for the host to present. `None` before [`attach`] or
    /// while the surface size is degenerate.
    pub fn pixels(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Release the surface and the texture. Pending work is cancelled and
    /// all further calls become no-ops; a torn-down scene cannot re-attach.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!(frames = self.frames_drawn, "tearing down scene");
        self.pump.cancel();
        if let Some(texture) = &mut self.texture {
            texture.pause();
        }
        self.texture = None;
        self.pixmap = None;
        self.size = None;
        self.quad_cache.invalidate();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ImageTexture;
    use tiny_skia::Pixmap;

    fn scene() -> MonitorScene {
        let mut scene = MonitorScene::new(SceneConfig::default());
        scene
            .attach(SurfaceSize::new(400, 300, 1.0))
            .expect("attach");
        scene
    }

    fn sample(scroll_y: f32) -> ScrollInput {
        ScrollInput {
            scroll_y,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }

    fn test_texture() -> Box<ImageTexture> {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba(0.2, 0.4, 0.6, 1.0).unwrap());
        Box::new(ImageTexture::from_pixmap(pixmap))
    }

    #[test]
    fn pump_coalesces_requests() {
        let mut pump = FramePump::new();
        assert!(pump.request());
        assert!(!pump.request());
        assert!(pump.begin_frame());
        assert!(!pump.begin_frame());
        assert!(pump.request());
        pump.cancel();
        assert!(!pump.begin_frame());
    }

    #[test]
    fn attach_paints_synchronously() {
        let scene = scene();
        assert_eq!(scene.frames_drawn(), 1);
        assert!(scene.pixels().is_some());
    }

    #[test]
    fn scroll_samples_coalesce_into_one_paint() {
        let mut scene = scene();
        scene.set_scroll(sample(10.0));
        scene.set_scroll(sample(20.0));
        scene.set_scroll(sample(260.0));
        assert!(scene.wants_frame());

        assert!(scene.frame());
        assert_eq!(scene.frames_drawn(), 2);
        assert!((scene.progress() - 0.5).abs() < 1e-5);

        // Nothing new arrived, so the next tick is idle.
        assert!(!scene.frame());
        assert_eq!(scene.frames_drawn(), 2);
    }

    #[test]
    fn playing_texture_keeps_the_loop_hot() {
        let mut scene = scene();
        scene.set_texture(test_texture());
        scene.set_playing(true);
        assert!(scene.continuous_active());

        assert!(scene.frame());
        assert!(scene.frame());
        assert!(scene.wants_frame());

        scene.set_playing(false);
        assert!(!scene.continuous_active());
        // One more paint for the pause itself, then idle.
        assert!(scene.frame());
        assert!(!scene.frame());
    }

    #[test]
    fn occlusion_stops_the_continuous_loop() {
        let mut scene = scene();
        scene.set_texture(test_texture());
        scene.set_playing(true);
        scene.frame();

        scene.set_visible(false);
        assert!(!scene.continuous_active());
        assert!(!scene.wants_frame());
        assert!(!scene.frame());

        scene.set_visible(true);
        assert!(scene.wants_frame());
        assert!(scene.frame());
    }

    #[test]
    fn hover_tracks_the_projected_screen() {
        let mut scene = scene();
        scene.set_progress(1.0);
        scene.frame();

        let quad = scene.screen_quad().expect("quad");
        let (cx, cy) = quad.centroid();
        scene.pointer_moved(cx, cy);
        assert!(scene.hovering_screen());

        scene.pointer_moved(-500.0, -500.0);
        assert!(!scene.hovering_screen());

        scene.pointer_left();
        assert!(!scene.hovering_screen());
    }

    #[test]
    fn zero_sized_surface_renders_nothing_without_panicking() {
        let mut scene = MonitorScene::new(SceneConfig::default());
        scene
            .attach(SurfaceSize::new(0, 0, 1.0))
            .expect("attach with empty size");
        assert_eq!(scene.frames_drawn(), 0);
        assert!(scene.pixels().is_none());
        assert!(scene.screen_quad().is_none());

        scene.resize(SurfaceSize::new(200, 100, 1.0));
        assert!(scene.frame());
        assert!(scene.pixels().is_some());
    }

    #[test]
    fn teardown_is_terminal() {
        let mut scene = scene();
        scene.set_texture(test_texture());
        scene.teardown();

        assert!(scene.is_torn_down());
        assert!(scene.pixels().is_none());
        assert!(!scene.wants_frame());
        assert!(!scene.frame());

        scene.set_scroll(sample(100.0));
        assert!(!scene.frame());
        assert!(scene.attach(SurfaceSize::new(100, 100, 1.0)).is_err());
    }
}
