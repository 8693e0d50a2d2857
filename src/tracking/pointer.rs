use glam::Vec3;
use tracing::{debug, info};

use super::{BoneKind, Finger, FingerId, FingerKind, SENSOR_TO_WORLD, TrackingFrame};

/// The fingertip currently driving the paint interaction, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub id: FingerId,
    /// Proximal joint of the distal bone.
    pub position: Vec3,
    /// Away from the fingertip, into the scene.
    pub direction: Vec3,
}

impl Pointer {
    fn from_finger(finger: &Finger) -> Self {
        let distal = finger.bone(BoneKind::Distal);
        Self {
            id: finger.id,
            position: distal.prev_joint * SENSOR_TO_WORLD,
            direction: -distal.direction,
        }
    }
}

/// Keeps one finger bound as the pointer for as long as it stays valid.
///
/// State is `Unbound` (`pointer() == None`) or `Bound(id)`:
///
/// * **Bound** – if `id` is still present and valid, refresh position and
///   direction from it. Otherwise drop it and fall through to selection in
///   the same frame.
/// * **Unbound** – walk the hands in the order the frame lists them and take
///   each valid index finger; the *last* one seen wins.
/// * **Disconnected** – nothing changes, the pointer stays where it was.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pointer: Option<Pointer>,
    last_connected: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pointer(&self) -> Option<&Pointer> {
        self.pointer.as_ref()
    }

    /// Advance by one sensor frame.
    pub fn update(&mut self, connected: bool, frame: &TrackingFrame) -> Option<&Pointer> {
        if connected != self.last_connected {
            if connected {
                info!("sensor connected");
            } else {
                info!("sensor disconnected");
            }
            self.last_connected = connected;
        }
        if !connected {
            return self.pointer.as_ref();
        }

        let kept = self
            .pointer
            .and_then(|p| frame.finger(p.id))
            .filter(|f| f.valid);

        let finger = match kept {
            Some(f) => Some(f),
            None => {
                if let Some(lost) = self.pointer.take() {
                    debug!(id = lost.id, "pointer finger lost");
                }
                let picked = Self::select(frame);
                if let Some(f) = picked {
                    debug!(id = f.id, frame = frame.id, "pointer bound");
                }
                picked
            }
        };

        self.pointer = finger.map(Pointer::from_finger);
        self.pointer.as_ref()
    }

    // Last valid index finger in hand order. With several hands in view the
    // later hand always takes over a fresh binding.
    fn select(frame: &TrackingFrame) -> Option<&Finger> {
        frame
            .hands
            .iter()
            .filter_map(|h| h.finger(FingerKind::Index))
            .filter(|f| f.valid)
            .next_back()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
