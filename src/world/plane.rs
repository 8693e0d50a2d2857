use glam::{Vec2, Vec3, Vec3Swizzles, vec2};

/// The rectangle the paint buffer is shown on.
///
/// * Lies in the plane `z = depth`, facing +Z.
/// * Centered on x = 0, bottom edge on y = 0:
///   x ∈ [-width/2, width/2], y ∈ [0, height].
/// * `columns × rows` is the resolution of the buffer mapped onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintPlane {
    pub depth: f32,
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
}

impl PaintPlane {
    /// World position of buffer cell (0, 0)'s outer corner.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        vec2(-self.width * 0.5, 0.0)
    }

    /// Buffer cells per world unit along X and Y.
    #[inline]
    pub fn cells_per_unit(&self) -> Vec2 {
        vec2(
            self.columns as f32 / self.width,
            self.rows as f32 / self.height,
        )
    }

    /// Corners counter-clockwise from bottom-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let (l, r) = (-self.width * 0.5, self.width * 0.5);
        let (b, t) = (0.0, self.height);
        [
            Vec3::new(l, b, self.depth),
            Vec3::new(r, b, self.depth),
            Vec3::new(r, t, self.depth),
            Vec3::new(l, t, self.depth),
        ]
    }

    /// Forward hit of the ray `origin + dir·t` with the plane, `t > 0`.
    ///
    /// A ray parallel to the plane (`dir.z == 0`) gives a non-finite `t` and
    /// counts as a miss, the same as a hit behind the origin.
    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<Vec3> {
        let t = (self.depth - origin.z) / dir.z;
        (t.is_finite() && t > 0.0).then(|| origin + dir * t)
    }

    /// Fractional buffer coordinates of a point on the plane.
    #[inline]
    pub fn to_buffer(&self, p: Vec3) -> Vec2 {
        (p.xy() - self.origin()) * self.cells_per_unit()
    }

    /// Buffer cell under a point on the plane, if it lies on the canvas.
    ///
    /// Coordinates are floored, so anything left of / below the edge maps to
    /// a negative cell and is rejected.
    pub fn cell_at(&self, p: Vec3) -> Option<(i32, i32)> {
        let tc = self.to_buffer(p).floor();
        let inside = tc.x >= 0.0
            && tc.y >= 0.0
            && tc.x < self.columns as f32
            && tc.y < self.rows as f32;
        inside.then(|| (tc.x as i32, tc.y as i32))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn reference_plane() -> PaintPlane {
        PaintPlane {
            depth: -10.0,
            width: 16.0,
            height: 9.0,
            columns: 640,
            rows: 360,
        }
    }

    #[test]
    fn straight_ahead_hits_bottom_center() {
        let plane = reference_plane();
        let hit = plane.intersect(Vec3::ZERO, Vec3::NEG_Z).unwrap();
        assert!((hit - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-6);
        assert_eq!(plane.cell_at(hit), Some((320, 0)));
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = reference_plane();
        assert_eq!(plane.intersect(Vec3::ZERO, Vec3::X), None);
        // origin already on the plane: 0/0
        assert_eq!(plane.intersect(Vec3::new(0.0, 0.0, -10.0), Vec3::X), None);
    }

    #[test]
    fn backward_and_touching_rays_miss() {
        let plane = reference_plane();
        assert_eq!(plane.intersect(Vec3::ZERO, Vec3::Z), None);
        assert_eq!(plane.intersect(Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z), None);
        assert_eq!(plane.intersect(Vec3::new(0.0, 0.0, -12.0), Vec3::NEG_Z), None);
    }

    #[test]
    fn cell_mapping_covers_corners() {
        let plane = reference_plane();
        assert_eq!(plane.cell_at(Vec3::new(-8.0, 0.0, -10.0)), Some((0, 0)));
        assert_eq!(plane.cell_at(Vec3::new(7.99, 8.99, -10.0)), Some((639, 359)));
        assert_eq!(plane.cell_at(Vec3::new(8.0, 1.0, -10.0)), None);
        assert_eq!(plane.cell_at(Vec3::new(0.0, 9.0, -10.0)), None);
    }

    #[test]
    fn slightly_outside_is_rejected_not_truncated() {
        let plane = reference_plane();
        // 0.01 world units = 0.4 cells left of the edge; truncation would give 0
        assert_eq!(plane.cell_at(Vec3::new(-8.01, 1.0, -10.0)), None);
        assert_eq!(plane.cell_at(Vec3::new(0.0, -0.01, -10.0)), None);
    }

    #[test]
    fn far_away_hits_do_not_overflow() {
        let plane = reference_plane();
        assert_eq!(plane.cell_at(Vec3::new(1e30, 0.0, -10.0)), None);
        assert_eq!(plane.cell_at(Vec3::new(f32::NAN, 0.0, -10.0)), None);
    }

    #[test]
    fn corners_span_the_plane() {
        let plane = reference_plane();
        let [bl, br, tr, tl] = plane.corners();
        assert_eq!(bl, Vec3::new(-8.0, 0.0, -10.0));
        assert_eq!(br, Vec3::new(8.0, 0.0, -10.0));
        assert_eq!(tr, Vec3::new(8.0, 9.0, -10.0));
        assert_eq!(tl, Vec3::new(-8.0, 9.0, -10.0));
    }
}
