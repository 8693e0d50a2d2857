//! Sensor stand-in: one index finger that follows the mouse cursor.
//!
//! The window reports the world-space ray under the cursor
//! ([`InputEvent::Aim`]). While the left button is held, this source lays a
//! straight index finger along that ray, a fixed distance in front of the
//! eye, so the fingertip ray hits the canvas exactly under the cursor.

use glam::Vec3;
use smallvec::smallvec;

use super::{Bone, Finger, FingerId, FingerKind, FrameSource, Hand, SENSOR_TO_WORLD, TrackingFrame};
use crate::renderer::InputEvent;

const HAND_ID: i32 = 1;
const FINGER_ID: FingerId = 11;

/// Eye → distal joint distance, world units.
const REACH: f32 = 12.0;
/// Length of one phalanx, world units.
const PHALANX: f32 = 0.25;

#[derive(Debug, Default)]
pub struct MouseHand {
    aim: Option<(Vec3, Vec3)>,
    held: bool,
    frame: TrackingFrame,
}

impl MouseHand {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_finger(origin: Vec3, dir: Vec3) -> Finger {
        let distal = origin + dir * REACH;
        // joints 0..=4 from knuckle to tip; joint 3 is the distal bone's base
        let joint = |k: usize| (distal + dir * PHALANX * (k as f32 - 3.0)) / SENSOR_TO_WORLD;
        Finger {
            id: FINGER_ID,
            kind: FingerKind::Index,
            valid: true,
            bones: [0, 1, 2, 3].map(|k| Bone::from_joints(joint(k), joint(k + 1))),
        }
    }
}

impl FrameSource for MouseHand {
    fn feed_input(&mut self, event: &InputEvent) {
        if let InputEvent::Aim {
            origin,
            direction,
            held,
        } = *event
        {
            let dir = direction.normalize_or_zero();
            self.aim = (dir != Vec3::ZERO).then_some((origin, dir));
            self.held = held;
        }
    }

    fn poll(&mut self) -> Result<(), super::SourceError> {
        self.frame.id += 1;
        self.frame.hands.clear();
        if let (true, Some((origin, dir))) = (self.held, self.aim) {
            self.frame.hands = smallvec![Hand {
                id: HAND_ID,
                fingers: smallvec![Self::index_finger(origin, dir)],
            }];
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn current_frame(&self) -> &TrackingFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::PointerTracker;

    fn aim(origin: Vec3, direction: Vec3, held: bool) -> InputEvent {
        InputEvent::Aim {
            origin,
            direction,
            held,
        }
    }

    #[test]
    fn no_hand_until_button_held() {
        let mut src = MouseHand::new();
        src.feed_input(&aim(Vec3::ZERO, Vec3::NEG_Z, false));
        src.poll().unwrap();
        assert!(src.current_frame().hands.is_empty());

        src.feed_input(&aim(Vec3::ZERO, Vec3::NEG_Z, true));
        src.poll().unwrap();
        assert_eq!(src.current_frame().hands.len(), 1);

        src.feed_input(&aim(Vec3::ZERO, Vec3::NEG_Z, false));
        src.poll().unwrap();
        assert!(src.current_frame().hands.is_empty());
    }

    #[test]
    fn pointer_lies_on_the_cursor_ray() {
        let origin = Vec3::new(0.0, 4.5, 20.0);
        let dir = Vec3::new(0.1, -0.2, -1.0).normalize();

        let mut src = MouseHand::new();
        src.feed_input(&aim(origin, dir * 3.0, true));
        src.poll().unwrap();

        let mut tracker = PointerTracker::new();
        let p = *tracker.update(src.is_connected(), src.current_frame()).unwrap();

        assert_eq!(p.id, FINGER_ID);
        assert!((p.direction - dir).length() < 1e-4);
        assert!((p.position - (origin + dir * REACH)).length() < 1e-3);
    }

    #[test]
    fn finger_id_is_stable_across_frames() {
        let mut src = MouseHand::new();
        src.feed_input(&aim(Vec3::ZERO, Vec3::NEG_Z, true));
        src.poll().unwrap();
        let first = src.current_frame().finger(FINGER_ID).map(|f| f.id);
        src.feed_input(&aim(Vec3::ZERO, Vec3::new(0.2, 0.0, -1.0), true));
        src.poll().unwrap();
        assert_eq!(src.current_frame().finger(FINGER_ID).map(|f| f.id), first);
        assert_eq!(src.current_frame().id, 2);
    }
}
