//! ---------------------------------------------------------------------------
//! CPU scene renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Lines are clipped against the near plane in clip space, then against
//!   the viewport, then walked with Bresenham.
//! * The canvas is drawn by casting one ray per pixel at the paint plane and
//!   sampling the nearest buffer cell, so it is perspective-correct for free.
//! ---------------------------------------------------------------------------

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles, vec2, vec3};

use crate::{
    paint::PaintBuffer,
    renderer::{Pixel, Scene, SceneFlags},
    world::{PaintPlane, SceneCamera},
};

const CLEAR: Pixel = 0x00_000000;
const RED: Pixel = 0x00_FF0000;
const GREEN: Pixel = 0x00_00FF00;
const BLUE: Pixel = 0x00_0000FF;
const WHITE: Pixel = 0x00_FFFFFF;

/// Length of the cursor's direction whisker, world units.
const CURSOR_RAY: f32 = 3.0;
/// Half-size of the cursor cross, world units.
const CURSOR_CROSS: f32 = 0.1;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Software {
    /// (Re)allocate for the requested resolution and clear to black.
    pub fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, CLEAR);
        }
        self.scratch.fill(CLEAR);
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.scratch
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Draw the whole scene in fixed order: axes, canvas, cursor, bones.
    pub fn draw_scene(&mut self, cam: &SceneCamera, scene: &Scene<'_>) {
        let flags = scene.flags;

        if flags.contains(SceneFlags::AXES) {
            self.draw_line(cam, Vec3::ZERO, Vec3::X, RED);
            self.draw_line(cam, Vec3::ZERO, Vec3::Y, GREEN);
            self.draw_line(cam, Vec3::ZERO, Vec3::Z, BLUE);
        }

        if flags.contains(SceneFlags::CANVAS) {
            self.draw_canvas(cam, scene.plane, scene.buffer);
        }

        if let (true, Some(p)) = (flags.contains(SceneFlags::CURSOR), scene.pointer) {
            let at = p.position;
            self.draw_line(cam, at, at + p.direction * CURSOR_RAY, WHITE);
            let (dx, dy) = (vec3(CURSOR_CROSS, CURSOR_CROSS, 0.0), vec3(CURSOR_CROSS, -CURSOR_CROSS, 0.0));
            self.draw_line(cam, at - dx, at + dx, WHITE);
            self.draw_line(cam, at - dy, at + dy, WHITE);
        }

        if flags.contains(SceneFlags::BONES) {
            for &(a, b) in scene.bones {
                self.draw_line(cam, a, b, RED);
            }
        }
    }

    /// Hand the finished frame to `submit(pixels, w, h)`.
    pub fn end_frame<F, R>(&self, submit: F) -> R
    where
        F: FnOnce(&[Pixel], usize, usize) -> R,
    {
        submit(&self.scratch, self.width, self.height)
    }

    /*──────────────────────── lines ─────────────────────────────────*/

    /// World-space line segment.
    pub fn draw_line(&mut self, cam: &SceneCamera, a: Vec3, b: Vec3, colour: Pixel) {
        let vp = cam.view_proj();
        let Some((ca, cb)) = clip_near(vp * a.extend(1.0), vp * b.extend(1.0), cam.near()) else {
            return;
        };
        let sa = cam.ndc_to_screen(ca.xy() / ca.w);
        let sb = cam.ndc_to_screen(cb.xy() / cb.w);

        let max = vec2(self.width as f32 - 1.0, self.height as f32 - 1.0);
        if let Some((sa, sb)) = clip_rect(sa, sb, max) {
            self.bresenham(
                sa.x as i32,
                sa.y as i32,
                sb.x as i32,
                sb.y as i32,
                colour,
            );
        }
    }

    /// Integer Bresenham line-drawing algorithm.
    fn bresenham(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Pixel) {
        let (w, h) = (self.width as i32, self.height as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if (0..w).contains(&x0) && (0..h).contains(&y0) {
                self.scratch[y0 as usize * self.width + x0 as usize] = colour;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if x0 == x1 {
                    break;
                }
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                if y0 == y1 {
                    break;
                }
                err += dx;
                y0 += sy;
            }
        }
    }

    /*──────────────────────── canvas ────────────────────────────────*/

    /// Texture the paint plane with `buffer`, nearest-cell sampling.
    pub fn draw_canvas(&mut self, cam: &SceneCamera, plane: &PaintPlane, buffer: &PaintBuffer) {
        let (x0, y0, x1, y1) = match self.screen_bounds(cam, plane) {
            Some(b) => b,
            None => return,
        };

        let rays = PixelRays::new(cam, self.width, self.height);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dir = rays.dir(x as f32 + 0.5, y as f32 + 0.5);
                let cell = plane
                    .intersect(rays.eye, dir)
                    .and_then(|hit| plane.cell_at(hit))
                    .and_then(|(cx, cy)| buffer.get(cx, cy));
                if let Some(c) = cell {
                    self.scratch[y * self.width + x] = c.to_u32();
                }
            }
        }
    }

    /// Pixel bounding box of the plane. Falls back to the whole viewport
    /// when a corner is behind the near plane.
    fn screen_bounds(&self, cam: &SceneCamera, plane: &PaintPlane) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let full = (0, 0, self.width - 1, self.height - 1);

        let mut lo = Vec2::splat(f32::INFINITY);
        let mut hi = Vec2::splat(f32::NEG_INFINITY);
        for corner in plane.corners() {
            match cam.to_screen(corner) {
                Some(s) => {
                    lo = lo.min(s);
                    hi = hi.max(s);
                }
                None => return Some(full),
            }
        }

        let max = vec2(self.width as f32 - 1.0, self.height as f32 - 1.0);
        if hi.x < 0.0 || hi.y < 0.0 || lo.x > max.x || lo.y > max.y {
            return None;
        }
        let lo = lo.floor().clamp(Vec2::ZERO, max);
        let hi = hi.ceil().clamp(Vec2::ZERO, max);
        Some((lo.x as usize, lo.y as usize, hi.x as usize, hi.y as usize))
    }
}

/// Per-frame inverse projection for the canvas ray cast.
struct PixelRays {
    inv: Mat4,
    eye: Vec3,
    scale: Vec2,
}

impl PixelRays {
    fn new(cam: &SceneCamera, w: usize, h: usize) -> Self {
        Self {
            inv: cam.view_proj().inverse(),
            eye: cam.eye(),
            scale: vec2(2.0 / w as f32, 2.0 / h as f32),
        }
    }

    #[inline]
    fn dir(&self, px: f32, py: f32) -> Vec3 {
        let ndc = vec3(px * self.scale.x - 1.0, 1.0 - py * self.scale.y, -1.0);
        self.inv.project_point3(ndc) - self.eye
    }
}

/// Clip a clip-space segment to `w >= near`. `None` if fully behind.
fn clip_near(mut a: Vec4, mut b: Vec4, near: f32) -> Option<(Vec4, Vec4)> {
    if a.w < near && b.w < near {
        return None;
    }
    if a.w < near {
        a = a.lerp(b, (near - a.w) / (b.w - a.w));
    } else if b.w < near {
        b = b.lerp(a, (near - b.w) / (a.w - b.w));
    }
    Some((a, b))
}

/// Liang–Barsky clip of a screen segment to `[0, max]`.
fn clip_rect(a: Vec2, b: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

/*──────────────────────────────── Tests ───────────────────────────────*/
