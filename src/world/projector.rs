use crate::paint::{MARK, PaintBuffer, Rgb};
use crate::tracking::Pointer;

use super::PaintPlane;

/// Casts the pointer ray onto the paint plane and stamps the cell it hits.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    plane: PaintPlane,
    mark: Rgb,
}

impl Projector {
    pub fn new(plane: PaintPlane) -> Self {
        Self { plane, mark: MARK }
    }

    #[inline]
    pub fn plane(&self) -> &PaintPlane {
        &self.plane
    }

    /// Buffer cell the pointer is aiming at, if any.
    pub fn project(&self, pointer: &Pointer) -> Option<(i32, i32)> {
        let hit = self.plane.intersect(pointer.position, pointer.direction)?;
        self.plane.cell_at(hit)
    }

    /// One frame of painting: at most one cell write.
    pub fn apply(&self, pointer: Option<&Pointer>, buffer: &mut PaintBuffer) -> Option<(i32, i32)> {
        let (x, y) = self.project(pointer?)?;
        buffer.paint(x, y, self.mark).then_some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::BACKGROUND;
    use crate::world::plane::tests::reference_plane;
    use glam::Vec3;

    fn pointer(position: Vec3, direction: Vec3) -> Pointer {
        Pointer {
            id: 1,
            position,
            direction,
        }
    }

    fn changed_cells(a: &PaintBuffer, b: &PaintBuffer) -> usize {
        a.cells().iter().zip(b.cells()).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn straight_ahead_paints_one_red_cell() {
        let proj = Projector::new(reference_plane());
        let mut buf = PaintBuffer::new(640, 360);
        let before = buf.clone();

        let hit = proj.apply(Some(&pointer(Vec3::ZERO, Vec3::NEG_Z)), &mut buf);

        assert_eq!(hit, Some((320, 0)));
        assert_eq!(buf[(320, 0)], MARK);
        assert_eq!(changed_cells(&before, &buf), 1);
    }

    #[test]
    fn no_pointer_no_write() {
        let proj = Projector::new(reference_plane());
        let mut buf = PaintBuffer::new(640, 360);
        assert_eq!(proj.apply(None, &mut buf), None);
        assert!(buf.cells().iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn parallel_direction_no_write() {
        let proj = Projector::new(reference_plane());
        let mut buf = PaintBuffer::new(640, 360);
        let p = pointer(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(proj.apply(Some(&p), &mut buf), None);
        assert!(buf.cells().iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn pointing_away_no_write() {
        let proj = Projector::new(reference_plane());
        let mut buf = PaintBuffer::new(640, 360);
        let p = pointer(Vec3::new(0.0, 1.0, 0.0), Vec3::Z);
        assert_eq!(proj.apply(Some(&p), &mut buf), None);
        assert!(buf.cells().iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn off_canvas_hit_no_write() {
        let proj = Projector::new(reference_plane());
        let mut buf = PaintBuffer::new(640, 360);
        // hits x = 20 at the plane, far right of the 16-unit canvas
        let p = pointer(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(proj.apply(Some(&p), &mut buf), None);
        assert!(buf.cells().iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn slanted_ray_lands_on_expected_cell() {
        let proj = Projector::new(reference_plane());
        // from (1, 2, 0) along (0.125, 0.25, -1): t = 10 → hit (2.25, 4.5, -10)
        let p = pointer(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.125, 0.25, -1.0));
        assert_eq!(proj.project(&p), Some((410, 180)));
    }
}
