//! Finger painting on a virtual canvas.
//!
//! A hand-tracking sensor reports finger bones every frame. One fingertip is
//! kept as the pointer, its ray is cast onto a fixed plane in the scene, and
//! the buffer cell it hits turns red. The buffer is shown as a textured quad
//! in a small software-rendered 3D scene.

pub mod app;
pub mod config;
pub mod paint;
pub mod renderer;
pub mod tracking;
pub mod world;
