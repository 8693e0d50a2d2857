use std::time::Duration;

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles, vec2, vec3};

/// Half-width of the frustum at the near plane.
const HALF_WIDTH_AT_NEAR: f32 = 0.8;
const NEAR: f32 = 1.0;
const FAR: f32 = 100.0;
/// How far the scene origin sits in front of the eye.
const VIEW_DISTANCE: f32 = 20.0;

/// Fixed viewer looking down -Z at the paint plane.
///
/// * Symmetric frustum, 0.8 wide at the near plane, height follows the
///   window's aspect ratio.
/// * The scene is lowered by half the plane height and pushed 20 units
///   away, then spun around world Y by `spin`.
#[derive(Clone, Copy, Debug)]
pub struct SceneCamera {
    width: usize,
    height: usize,
    offset: Vec3,
    spin: f32, // radians around +Y
}

impl SceneCamera {
    /// Camera for a `width × height` viewport framing a plane `plane_height`
    /// units tall.
    pub fn new(width: usize, height: usize, plane_height: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            offset: vec3(0.0, -plane_height * 0.5, -VIEW_DISTANCE),
            spin: 0.0,
        }
    }

    #[inline]
    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Follow a window resize. Zero sizes (minimised) are clamped to 1.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    #[inline]
    pub fn set_spin(&mut self, radians: f32) {
        self.spin = radians;
    }

    /// Spin angle for the rotate mode: one degree every 20 ms.
    pub fn spin_at(elapsed: Duration) -> f32 {
        (elapsed.as_secs_f32() * 1000.0 / 20.0).to_radians()
    }

    /*──────────────────────── matrices ──────────────────────────────*/

    pub fn projection(&self) -> Mat4 {
        let aspect = self.width as f32 / self.height as f32;
        let half_height = HALF_WIDTH_AT_NEAR / aspect;
        Mat4::perspective_rh_gl(2.0 * (half_height / NEAR).atan(), aspect, NEAR, FAR)
    }

    /// World → eye.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(self.offset) * Mat4::from_rotation_y(self.spin)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        self.view().inverse().transform_point3(Vec3::ZERO)
    }

    /*──────────────────────── screen mapping ────────────────────────*/

    /// NDC (-1..1, +Y up) → pixel coordinates (+Y down).
    #[inline]
    pub fn ndc_to_screen(&self, ndc: Vec2) -> Vec2 {
        vec2(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }

    /// Project a world point to pixels; `None` if it is behind the near plane.
    pub fn to_screen(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * p.extend(1.0);
        (clip.w >= NEAR).then(|| self.ndc_to_screen(clip.xy() / clip.w))
    }

    /// World-space ray from the eye through the centre of pixel `(px, py)`.
    pub fn pixel_ray(&self, px: f32, py: f32) -> (Vec3, Vec3) {
        let ndc = vec2(
            2.0 * px / self.width as f32 - 1.0,
            1.0 - 2.0 * py / self.height as f32,
        );
        let inv = self.view_proj().inverse();
        let on_near = inv.project_point3(ndc.extend(-1.0));
        let eye = self.eye();
        (eye, (on_near - eye).normalize_or_zero())
    }

    /// Near-plane distance, as seen by clip-space `w`.
    #[inline(always)]
    pub fn near(self) -> f32 {
        NEAR
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn cam() -> SceneCamera {
        SceneCamera::new(1280, 720, 9.0)
    }

    #[test]
    fn plane_centre_is_screen_centre() {
        let s = cam().to_screen(vec3(0.0, 4.5, -10.0)).unwrap();
        assert!((s - vec2(640.0, 360.0)).length() < 1e-2);
    }

    #[test]
    fn frustum_edge_matches_half_width() {
        // eye-space x = 0.8·w at depth w lands on the right edge
        let c = cam();
        let s = c.to_screen(vec3(0.8 * 30.0, 4.5, -10.0)).unwrap();
        assert!((s.x - 1280.0).abs() < 0.5, "{s}");
    }

    #[test]
    fn eye_sits_in_front_of_plane() {
        assert!((cam().eye() - vec3(0.0, 4.5, 20.0)).length() < 1e-4);
    }

    #[test]
    fn behind_eye_is_rejected() {
        assert!(cam().to_screen(vec3(0.0, 4.5, 25.0)).is_none());
    }

    #[test]
    fn centre_pixel_ray_looks_forward() {
        let (o, d) = cam().pixel_ray(640.0, 360.0);
        assert!((o - vec3(0.0, 4.5, 20.0)).length() < 1e-4);
        assert!((d - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn pixel_ray_round_trips_through_to_screen() {
        let c = cam();
        let target = vec3(3.0, 1.0, -10.0);
        let s = c.to_screen(target).unwrap();
        let (o, d) = c.pixel_ray(s.x, s.y);
        let t = (target.z - o.z) / d.z;
        assert!((o + d * t - target).length() < 1e-2);
    }

    #[test]
    fn spin_moves_plane_sideways() {
        let mut c = cam();
        c.set_spin(FRAC_PI_2);
        let s = c.to_screen(vec3(0.0, 4.5, -10.0)).unwrap();
        assert!(s.x < 640.0 - 100.0, "{s}");
    }

    #[test]
    fn spin_rate_is_one_degree_per_20ms() {
        let a = SceneCamera::spin_at(Duration::from_millis(1800));
        assert!((a - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn resize_clamps_to_one_pixel() {
        let mut c = cam();
        c.resize(0, 0);
        assert_eq!(c.viewport(), (1, 1));
    }
}
