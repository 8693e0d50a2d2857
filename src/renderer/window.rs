use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::{
    renderer::{InputEvent, RenderError, Renderer, Scene, Software},
    world::SceneCamera,
};
use glam::Vec3;

/// minifb window + [`Software`] back-end.
///
/// The frame-buffer always matches the window's client size, so resizing
/// changes the aspect ratio instead of stretching the picture.
pub struct WindowRenderer {
    window: Window,
    software: Software,
    camera: SceneCamera,
}

impl WindowRenderer {
    pub fn new(
        title: &str,
        width: usize,
        height: usize,
        plane_height: f32,
        target_fps: usize,
    ) -> Result<Self, RenderError> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| RenderError::Window(e.to_string()))?;
        window.set_target_fps(target_fps);

        Ok(Self {
            window,
            software: Software::default(),
            camera: SceneCamera::new(width, height, plane_height),
        })
    }
}

impl Renderer for WindowRenderer {
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) {
        let win = &self.window;

        if !win.is_open() || win.is_key_down(Key::Escape) {
            events.push(InputEvent::Quit);
            return;
        }
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            events.push(InputEvent::ToggleRotate);
        }
        if win.is_key_pressed(Key::C, KeyRepeat::No) {
            events.push(InputEvent::Clear);
        }

        let (w, h) = win.get_size();
        if (w, h) != self.camera.viewport() && w > 0 && h > 0 {
            self.camera.resize(w, h);
            events.push(InputEvent::Resize {
                width: w,
                height: h,
            });
        }

        let held = win.get_mouse_down(MouseButton::Left);
        let aim = match win.get_mouse_pos(MouseMode::Discard) {
            Some((mx, my)) => {
                let (origin, direction) = self.camera.pixel_ray(mx, my);
                InputEvent::Aim {
                    origin,
                    direction,
                    held,
                }
            }
            None => InputEvent::Aim {
                origin: self.camera.eye(),
                direction: Vec3::ZERO,
                held: false,
            },
        };
        events.push(aim);
    }

    fn draw_scene(&mut self, scene: &Scene<'_>) {
        self.camera.set_spin(scene.spin);
        let (w, h) = self.camera.viewport();
        self.software.begin_frame(w, h);
        self.software.draw_scene(&self.camera, scene);
    }

    fn swap(&mut self) -> Result<(), RenderError> {
        let window = &mut self.window;
        self.software
            .end_frame(|fb, w, h| window.update_with_buffer(fb, w, h))
            .map_err(|e| RenderError::Present(e.to_string()))
    }
}
