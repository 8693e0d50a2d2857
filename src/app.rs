//! The frame loop.
//!
//! [`App`] owns all mutable demo state (paint buffer, pointer tracker,
//! last sensor frame, display toggles) and drives one strictly sequential
//! iteration per frame:
//!
//! ```text
//! events → sensor poll → pointer tracker → projector → draw → swap
//! ```

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    paint::PaintBuffer,
    renderer::{InputEvent, RenderError, Renderer, Scene, SceneFlags},
    tracking::{FrameSource, Pointer, PointerTracker, TrackingFrame},
    world::{Projector, SceneCamera},
};

/// How often the average frame time is reported.
const TIMING_WINDOW: Duration = Duration::from_secs(3);

pub struct App {
    buffer: PaintBuffer,
    tracker: PointerTracker,
    projector: Projector,
    last_frame: TrackingFrame,
    bones: Vec<(Vec3, Vec3)>,
    flags: SceneFlags,
    started: Instant,
    events: Vec<InputEvent>,
    poll_failing: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut flags = SceneFlags::default();
        flags.set(SceneFlags::BONES, !config.hide_bones);
        Self {
            buffer: PaintBuffer::new(config.buffer_width, config.buffer_height),
            tracker: PointerTracker::new(),
            projector: Projector::new(config.plane()),
            last_frame: TrackingFrame::default(),
            bones: Vec::new(),
            flags,
            started: Instant::now(),
            events: Vec::new(),
            poll_failing: false,
        }
    }

    #[inline]
    pub fn buffer(&self) -> &PaintBuffer {
        &self.buffer
    }

    #[inline]
    pub fn pointer(&self) -> Option<&Pointer> {
        self.tracker.pointer()
    }

    #[inline]
    pub fn flags(&self) -> SceneFlags {
        self.flags
    }

    /// Last frame seen while the sensor was connected.
    #[inline]
    pub fn last_frame(&self) -> &TrackingFrame {
        &self.last_frame
    }

    /// React to one input event. `Break` means quit.
    pub fn handle_event(&mut self, event: &InputEvent) -> ControlFlow<()> {
        match *event {
            InputEvent::Quit => return ControlFlow::Break(()),
            InputEvent::ToggleRotate => self.flags.toggle(SceneFlags::ROTATE),
            InputEvent::Clear => {
                debug!("canvas cleared");
                self.buffer.clear();
            }
            InputEvent::Resize { width, height } => {
                debug!(width, height, "viewport resized");
            }
            InputEvent::Aim { .. } => {}
        }
        ControlFlow::Continue(())
    }

    /// Pull the newest sensor frame and update the pointer.
    ///
    /// While disconnected the pointer and the remembered frame are left
    /// exactly as they were. Poll failures are logged once per run of
    /// consecutive failures.
    pub fn track<S: FrameSource + ?Sized>(&mut self, source: &mut S) {
        match source.poll() {
            Err(e) if !self.poll_failing => {
                warn!(error = %e, "sensor poll failed");
                self.poll_failing = true;
            }
            Ok(()) if self.poll_failing => {
                info!("sensor poll recovered");
                self.poll_failing = false;
            }
            _ => {}
        }
        let connected = source.is_connected();
        self.tracker.update(connected, source.current_frame());

        if connected {
            self.last_frame.clone_from(source.current_frame());
            self.bones.clear();
            self.bones.extend(self.last_frame.bone_segments());
        }
    }

    /// Stamp the cell under the pointer, if any.
    pub fn paint(&mut self) -> Option<(i32, i32)> {
        self.projector.apply(self.tracker.pointer(), &mut self.buffer)
    }

    pub fn scene(&self) -> Scene<'_> {
        let spin = if self.flags.contains(SceneFlags::ROTATE) {
            SceneCamera::spin_at(self.started.elapsed())
        } else {
            0.0
        };
        Scene {
            buffer: &self.buffer,
            plane: self.projector.plane(),
            pointer: self.tracker.pointer(),
            bones: &self.bones,
            spin,
            flags: self.flags,
        }
    }

    /// One full iteration of the frame loop.
    pub fn step<S, R>(&mut self, source: &mut S, renderer: &mut R) -> Result<ControlFlow<()>, RenderError>
    where
        S: FrameSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        renderer.poll_events(&mut events);

        let mut flow = ControlFlow::Continue(());
        for ev in &events {
            source.feed_input(ev);
            if self.handle_event(ev).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        self.events = events;
        if flow.is_break() {
            return Ok(flow);
        }

        self.track(source);
        self.paint();

        renderer.draw_scene(&self.scene());
        renderer.swap()?;
        Ok(flow)
    }

    /// Run until the renderer reports a quit.
    pub fn run<S, R>(&mut self, source: &mut S, renderer: &mut R) -> Result<(), RenderError>
    where
        S: FrameSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut acc_time = Duration::ZERO;
        let mut acc_frames = 0u32;
        let mut last_print = Instant::now();

        loop {
            let t0 = Instant::now();
            if self.step(source, renderer)?.is_break() {
                return Ok(());
            }
            acc_time += t0.elapsed();
            acc_frames += 1;

            if last_print.elapsed() >= TIMING_WINDOW {
                let avg_ms = acc_time.as_secs_f64() * 1000.0 / f64::from(acc_frames);
                debug!("avg frame: {:.2} ms ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
                acc_time = Duration::ZERO;
                acc_frames = 0;
                last_print = Instant::now();
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
