//! Rendering abstraction layer.
//!
//! *The core never touches the window.* Each frame it describes the scene
//! as a [`Scene`] and hands it to a type implementing [`Renderer`], which
//! also turns window input into [`InputEvent`]s.
//!
//! * [`Software`] rasterises a [`Scene`] into a CPU frame-buffer.
//! * [`WindowRenderer`] owns a minifb window, a [`Software`] back-end and
//!   the [`SceneCamera`](crate::world::SceneCamera).
//!
//! The scene is tiny and drawn back-to-front in a fixed order (axes,
//! canvas, cursor, finger bones), so no depth buffer is needed.

use bitflags::bitflags;
use glam::Vec3;

use crate::paint::PaintBuffer;
use crate::tracking::Pointer;
use crate::world::PaintPlane;

mod software;
mod window;

pub use software::Software;
pub use window::WindowRenderer;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Pixel = u32;

bitflags! {
    /// What to draw, plus display-only modes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SceneFlags: u8 {
        const AXES   = 1 << 0;
        const CANVAS = 1 << 1;
        const CURSOR = 1 << 2;
        const BONES  = 1 << 3;
        /// Spin the whole scene around Y over time.
        const ROTATE = 1 << 4;
    }
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self::AXES | Self::CANVAS | Self::CURSOR | Self::BONES
    }
}

/// Everything needed to draw one frame. Borrowed from the app each frame.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub buffer: &'a PaintBuffer,
    pub plane: &'a PaintPlane,
    pub pointer: Option<&'a Pointer>,
    /// Finger bones, world units.
    pub bones: &'a [(Vec3, Vec3)],
    /// Rotation around world Y, radians.
    pub spin: f32,
    pub flags: SceneFlags,
}

/// Window input, already translated to what the app cares about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    Resize { width: usize, height: usize },
    ToggleRotate,
    Clear,
    /// World-space ray under the mouse cursor (zero direction when the
    /// cursor is outside the window).
    Aim {
        origin: Vec3,
        direction: Vec3,
        held: bool,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not open window: {0}")]
    Window(String),

    #[error("could not present frame: {0}")]
    Present(String),
}

/// Display + input collaborator driven once per frame by the app loop.
pub trait Renderer {
    /// Append all input that arrived since the last call.
    fn poll_events(&mut self, events: &mut Vec<InputEvent>);

    /// Rasterise `scene` into the back buffer.
    fn draw_scene(&mut self, scene: &Scene<'_>);

    /// Present the back buffer. Paces the loop.
    fn swap(&mut self) -> Result<(), RenderError>;
}
