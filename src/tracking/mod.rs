//! Hand-tracking input.
//!
//! The sensor is an external collaborator seen only through [`FrameSource`].
//! Each frame it hands out a [`TrackingFrame`]: hands, their fingers, and
//! four bone segments per finger, all in **sensor units (mm)**.
//!
//! * [`PointerTracker`] turns the stream of frames into a single
//!   [`Pointer`] in world units.
//! * [`MouseHand`] fakes one index finger from the mouse cursor.
//! * [`ScriptedSource`] replays a fixed list of frames.
//! * `LeapSource` (feature `leapmotion`) reads a real Ultraleap device.

use glam::Vec3;
use smallvec::SmallVec;

mod mouse;
mod pointer;
mod scripted;

#[cfg(feature = "leapmotion")]
mod leapc;

pub use mouse::MouseHand;
pub use pointer::{Pointer, PointerTracker};
pub use scripted::ScriptedSource;

#[cfg(feature = "leapmotion")]
pub use leapc::LeapSource;

use crate::renderer::InputEvent;

/// Sensor millimetres → scene units.
pub const SENSOR_TO_WORLD: f32 = 1.0 / 100.0;

/// Stable per-session finger identifier assigned by the sensor.
pub type FingerId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerKind {
    pub const ALL: [FingerKind; 5] = [
        FingerKind::Thumb,
        FingerKind::Index,
        FingerKind::Middle,
        FingerKind::Ring,
        FingerKind::Pinky,
    ];
}

/// Bone segments from the palm outwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoneKind {
    Metacarpal = 0,
    Proximal = 1,
    Intermediate = 2,
    Distal = 3,
}

/// One bone segment.
///
/// `direction` follows the sensor convention: a unit vector pointing from
/// `next_joint` (towards the tip) back to `prev_joint` (towards the palm).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bone {
    pub prev_joint: Vec3,
    pub next_joint: Vec3,
    pub direction: Vec3,
}

impl Bone {
    /// Build a bone from its joints, deriving the direction.
    pub fn from_joints(prev_joint: Vec3, next_joint: Vec3) -> Self {
        Self {
            prev_joint,
            next_joint,
            direction: (prev_joint - next_joint).normalize_or_zero(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Finger {
    pub id: FingerId,
    pub kind: FingerKind,
    pub valid: bool,
    pub bones: [Bone; 4],
}

impl Finger {
    #[inline]
    pub fn bone(&self, kind: BoneKind) -> &Bone {
        &self.bones[kind as usize]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub id: i32,
    pub fingers: SmallVec<[Finger; 5]>,
}

impl Hand {
    /// The finger of the given kind, if the sensor reported one.
    pub fn finger(&self, kind: FingerKind) -> Option<&Finger> {
        self.fingers.iter().find(|f| f.kind == kind)
    }
}

/// Everything the sensor reported for one instant.
///
/// `hands` keeps the order the source reported them in; the pointer
/// selection rule depends on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingFrame {
    pub id: u64,
    pub hands: SmallVec<[Hand; 2]>,
}

impl TrackingFrame {
    /// Look a finger up by id across all hands.
    pub fn finger(&self, id: FingerId) -> Option<&Finger> {
        self.fingers().find(|f| f.id == id)
    }

    pub fn fingers(&self) -> impl Iterator<Item = &Finger> {
        self.hands.iter().flat_map(|h| h.fingers.iter())
    }

    /// Every bone of every finger as a world-space segment.
    pub fn bone_segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.fingers().flat_map(|f| {
            f.bones
                .iter()
                .map(|b| (b.prev_joint * SENSOR_TO_WORLD, b.next_joint * SENSOR_TO_WORLD))
        })
    }
}

/// Things that can go wrong while talking to a sensor.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The vendor library could not be found or lacks a required symbol.
    #[error("sensor library unavailable: {0}")]
    Library(String),

    /// A vendor call returned a failure code.
    #[error("sensor call `{call}` failed: {code}")]
    Call { call: &'static str, code: &'static str },
}

/// Narrow view of a hand-tracking sensor.
pub trait FrameSource {
    /// Drain whatever the device produced since the last call.
    fn poll(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    /// Window/input events, for sources that are driven by them.
    fn feed_input(&mut self, _event: &InputEvent) {}

    fn is_connected(&self) -> bool;

    /// Most recent frame. Only meaningful while connected.
    fn current_frame(&self) -> &TrackingFrame;
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use smallvec::smallvec;

    /// Straight finger along -Z starting at `base` (mm), joints 20 mm apart.
    pub(crate) fn finger(id: FingerId, kind: FingerKind, valid: bool, base: Vec3) -> Finger {
        let joint = |i: usize| base + Vec3::new(0.0, 0.0, -20.0 * i as f32);
        Finger {
            id,
            kind,
            valid,
            bones: [0, 1, 2, 3].map(|i| Bone::from_joints(joint(i), joint(i + 1))),
        }
    }

    pub(crate) fn hand(id: i32, fingers: Vec<Finger>) -> Hand {
        Hand {
            id,
            fingers: fingers.into_iter().collect(),
        }
    }

    /// Hand with a single index finger.
    pub(crate) fn index_hand(hand_id: i32, finger_id: FingerId, base: Vec3) -> Hand {
        hand(hand_id, vec![finger(finger_id, FingerKind::Index, true, base)])
    }

    pub(crate) fn frame(id: u64, hands: Vec<Hand>) -> TrackingFrame {
        TrackingFrame {
            id,
            hands: hands.into_iter().collect(),
        }
    }

    #[test]
    fn bone_direction_points_back_to_palm() {
        let b = Bone::from_joints(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((b.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn finger_lookup_spans_hands() {
        let f = frame(
            1,
            vec![
                index_hand(1, 11, Vec3::ZERO),
                index_hand(2, 21, Vec3::new(50.0, 0.0, 0.0)),
            ],
        );
        assert_eq!(f.finger(21).map(|f| f.id), Some(21));
        assert!(f.finger(99).is_none());
        assert_eq!(f.fingers().count(), 2);
    }

    #[test]
    fn bone_segments_are_scaled_to_world() {
        let f = TrackingFrame {
            id: 0,
            hands: smallvec![index_hand(1, 11, Vec3::new(100.0, 200.0, 0.0))],
        };
        let segs: Vec<_> = f.bone_segments().collect();
        assert_eq!(segs.len(), 4);
        assert!((segs[0].0 - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
        assert!((segs[3].1 - Vec3::new(1.0, 2.0, -0.8)).length() < 1e-6);
    }

    #[test]
    fn hand_finds_finger_by_kind() {
        let h = hand(
            3,
            vec![
                finger(30, FingerKind::Thumb, true, Vec3::ZERO),
                finger(31, FingerKind::Index, false, Vec3::ZERO),
            ],
        );
        assert_eq!(h.finger(FingerKind::Index).map(|f| f.id), Some(31));
        assert!(h.finger(FingerKind::Pinky).is_none());
    }
}
