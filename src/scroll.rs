//! Scroll-to-progress mapping and the listener dispatcher.
//!
//! The driver is a pure function of the latest scroll sample. The dispatcher
//! wraps it with a listener registry and a single in-flight frame so any
//! number of scroll samples between frames collapse into one recompute.

use tracing::debug;

use crate::config::ScrollTuning;
use crate::scheduler::FramePump;

/// One scroll sample in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollInput {
    pub scroll_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

/// Transform for the element that rises and grows alongside the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompanionTransform {
    pub scale: f32,
    pub translate_y: f32,
}

/// Output of one driver tick.
///
/// `progress` is the raw clamped scroll fraction and drives the monitor pose;
/// `eased` applies the ease-out curve and drives the companion transform, so
/// the companion settles faster than the monitor straightens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub progress: f32,
    pub eased: f32,
    pub companion: CompanionTransform,
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Maps scroll samples to [`ProgressUpdate`]s.
#[derive(Debug, Clone)]
pub struct ScrollDriver {
    tuning: ScrollTuning,
}

impl ScrollDriver {
    pub fn new(tuning: ScrollTuning) -> Self {
        Self { tuning }
    }

    pub fn update(&self, input: ScrollInput) -> ProgressUpdate {
        let t = &self.tuning;

        // Narrow viewports skip the reveal and show the final pose.
        let progress = if input.viewport_width <= t.narrow_viewport_max {
            1.0
        } else {
            let max_scroll = (input.viewport_height * t.max_scroll_factor).max(1.0);
            (input.scroll_y / max_scroll).clamp(0.0, 1.0)
        };

        let eased = ease_out_cubic(progress);
        ProgressUpdate {
            progress,
            eased,
            companion: CompanionTransform {
                scale: t.scale_start + (t.scale_end - t.scale_start) * eased,
                translate_y: t.translate_y_start * (1.0 - eased),
            },
        }
    }
}

/// Side effects tied to whether anyone is listening. The demo host wires this
/// to its event-source subscriptions; tests observe the transitions directly.
pub trait ListenerHook {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Hook that does nothing, for hosts that poll unconditionally.
#[derive(Debug, Default)]
pub struct NullHook;

impl ListenerHook for NullHook {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

pub type Listener = Box<dyn FnMut(&ProgressUpdate)>;

/// Handle returned by [`ScrollDispatcher::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

/// Fan-out registry with frame coalescing.
///
/// Scroll samples arrive via [`on_input`](Self::on_input); listeners fire
/// once per [`run_frame`](Self::run_frame) with the latest sample, however
/// many arrived in between. The hook starts on the first subscriber and
/// stops when the last one leaves.
pub struct ScrollDispatcher {
    driver: ScrollDriver,
    hook: Box<dyn ListenerHook>,
    listeners: Vec<Option<Listener>>,
    live: usize,
    pump: FramePump,
    last_input: Option<ScrollInput>,
}

impl ScrollDispatcher {
    pub fn new(tuning: ScrollTuning, hook: Box<dyn ListenerHook>) -> Self {
        Self {
            driver: ScrollDriver::new(tuning),
            hook,
            listeners: Vec::new(),
            live: 0,
            pump: FramePump::new(),
            last_input: None,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.live
    }

    /// Register a listener. Fires it immediately with the latest known input
    /// so late subscribers render the current pose instead of a stale one.
    pub fn subscribe(&mut self, mut listener: Listener) -> ListenerId {
        if self.live == 0 {
            debug!("first scroll listener, starting hook");
            self.hook.start();
        }
        if let Some(input) = self.last_input {
            listener(&self.driver.update(input));
        }
        self.live += 1;
        let id = self.listeners.len();
        self.listeners.push(Some(listener));
        ListenerId(id)
    }

    /// Remove a listener. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        let Some(slot) = self.listeners.get_mut(id.0) else {
            return;
        };
        if slot.take().is_none() {
            return;
        }
        self.live -= 1;
        if self.live == 0 {
            debug!("last scroll listener left, stopping hook");
            self.hook.stop();
            self.pump.cancel();
        }
    }

    /// Record a scroll sample. Returns true when the caller should schedule
    /// a frame; repeat samples before that frame runs return false.
    pub fn on_input(&mut self, input: ScrollInput) -> bool {
        self.last_input = Some(input);
        if self.live == 0 {
            return false;
        }
        self.pump.request()
    }

    /// Run the pending frame: recompute from the latest sample and fan out.
    /// No-op when no frame is pending or no sample has arrived.
    pub fn run_frame(&mut self) {
        if !self.pump.begin_frame() {
            return;
        }
        let Some(input) = self.last_input else {
            return;
        };
        let update = self.driver.update(input);
        for listener in self.listeners.iter_mut().flatten() {
            listener(&update);
        }
    }
}
