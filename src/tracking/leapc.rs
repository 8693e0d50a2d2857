//! Ultraleap / Leap Motion source over the dynamically loaded LeapC API.
//!
//! LeapC is message based: every [`poll`](FrameSource::poll) drains the
//! connection queue without blocking, keeps the service/device state up to
//! date and copies the newest tracking event into a [`TrackingFrame`].

use glam::Vec3;
use leapc_dyn_sys::*;
use smallvec::SmallVec;
use tracing::debug;

use super::{Bone, Finger, FingerKind, FrameSource, Hand, SourceError, TrackingFrame};

const LEAP_LIBRARY_NAME: &str = "LeapC";
const LEAP_LIBRARY_PATH: &str = "C:/Program Files/Ultraleap/LeapSDK/lib/x64";

/// Upper bound on messages handled per poll so a flood can't stall a frame.
const MAX_MESSAGES_PER_POLL: usize = 64;

pub struct LeapSource {
    lib: LeapC,
    connection: LEAP_CONNECTION,
    service_up: bool,
    device_up: bool,
    frame: TrackingFrame,
}

impl LeapSource {
    /// Load LeapC and open a connection to the tracking service.
    pub fn open() -> Result<Self, SourceError> {
        let lib = unsafe { LeapC::new(LEAP_LIBRARY_NAME) }
            .or_else(|_| unsafe { LeapC::new(LEAP_LIBRARY_PATH) })
            .map_err(|e| SourceError::Library(e.to_string()))?;

        // bindgen's call wrappers panic on a missing symbol; check up front
        for (name, missing) in [
            ("LeapCreateConnection", lib.LeapCreateConnection.is_err()),
            ("LeapOpenConnection", lib.LeapOpenConnection.is_err()),
            ("LeapPollConnection", lib.LeapPollConnection.is_err()),
            ("LeapCloseConnection", lib.LeapCloseConnection.is_err()),
            ("LeapDestroyConnection", lib.LeapDestroyConnection.is_err()),
        ] {
            if missing {
                return Err(SourceError::Library(format!("missing symbol {name}")));
            }
        }

        let mut connection: LEAP_CONNECTION = std::ptr::null_mut();
        let res = unsafe { lib.LeapCreateConnection(std::ptr::null(), &mut connection) };
        check("LeapCreateConnection", res)?;

        let res = unsafe { lib.LeapOpenConnection(connection) };
        if let Err(e) = check("LeapOpenConnection", res) {
            unsafe { lib.LeapDestroyConnection(connection) };
            return Err(e);
        }

        Ok(Self {
            lib,
            connection,
            service_up: false,
            device_up: false,
            frame: TrackingFrame::default(),
        })
    }

    fn handle(&mut self, msg: &LEAP_CONNECTION_MESSAGE) {
        match msg.type_ {
            _eLeapEventType_eLeapEventType_Connection => self.service_up = true,
            _eLeapEventType_eLeapEventType_ConnectionLost => {
                self.service_up = false;
                self.device_up = false;
            }
            _eLeapEventType_eLeapEventType_Device => self.device_up = true,
            _eLeapEventType_eLeapEventType_DeviceLost => self.device_up = false,
            _eLeapEventType_eLeapEventType_Tracking => {
                // the event pointer is only valid until the next poll
                if let Some(ev) = unsafe { msg.__bindgen_anon_1.tracking_event.as_ref() } {
                    self.frame = convert_tracking_event(ev);
                }
            }
            other => debug!(event = other, "ignored LeapC event"),
        }
    }
}

impl FrameSource for LeapSource {
    fn poll(&mut self) -> Result<(), SourceError> {
        for _ in 0..MAX_MESSAGES_PER_POLL {
            let mut msg: LEAP_CONNECTION_MESSAGE = unsafe { std::mem::zeroed() };
            let res = unsafe { self.lib.LeapPollConnection(self.connection, 0, &mut msg) };
            if res == _eLeapRS_eLeapRS_Timeout {
                break;
            }
            check("LeapPollConnection", res)?;
            self.handle(&msg);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.service_up && self.device_up
    }

    fn current_frame(&self) -> &TrackingFrame {
        &self.frame
    }
}

impl Drop for LeapSource {
    fn drop(&mut self) {
        unsafe {
            self.lib.LeapCloseConnection(self.connection);
            self.lib.LeapDestroyConnection(self.connection);
        }
    }
}

fn convert_tracking_event(ev: &LEAP_TRACKING_EVENT) -> TrackingFrame {
    let hands: &[LEAP_HAND] = if ev.pHands.is_null() || ev.nHands == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ev.pHands, ev.nHands as usize) }
    };

    TrackingFrame {
        id: ev.tracking_frame_id as u64,
        hands: hands.iter().map(convert_hand).collect(),
    }
}

fn convert_hand(hand: &LEAP_HAND) -> Hand {
    let digits = unsafe { &hand.__bindgen_anon_1.digits };
    let fingers: SmallVec<[Finger; 5]> = FingerKind::ALL
        .iter()
        .zip(digits.iter())
        .map(|(&kind, digit)| {
            let bones = unsafe { &digit.__bindgen_anon_1.bones };
            Finger {
                id: digit.finger_id,
                kind,
                valid: true,
                bones: [0, 1, 2, 3].map(|i| {
                    Bone::from_joints(vector(&bones[i].prev_joint), vector(&bones[i].next_joint))
                }),
            }
        })
        .collect();

    Hand {
        id: hand.id as i32,
        fingers,
    }
}

fn vector(v: &LEAP_VECTOR) -> Vec3 {
    Vec3::from_array(unsafe { v.__bindgen_anon_1.v })
}

fn check(call: &'static str, res: eLeapRS) -> Result<(), SourceError> {
    let code = match res {
        _eLeapRS_eLeapRS_Success => return Ok(()),
        _eLeapRS_eLeapRS_UnknownError => "eLeapRS_UnknownError",
        _eLeapRS_eLeapRS_InvalidArgument => "eLeapRS_InvalidArgument",
        _eLeapRS_eLeapRS_InsufficientResources => "eLeapRS_InsufficientResources",
        _eLeapRS_eLeapRS_InsufficientBuffer => "eLeapRS_InsufficientBuffer",
        _eLeapRS_eLeapRS_Timeout => "eLeapRS_Timeout",
        _eLeapRS_eLeapRS_NotConnected => "eLeapRS_NotConnected",
        _eLeapRS_eLeapRS_HandshakeIncomplete => "eLeapRS_HandshakeIncomplete",
        _eLeapRS_eLeapRS_BufferSizeOverflow => "eLeapRS_BufferSizeOverflow",
        _eLeapRS_eLeapRS_ProtocolError => "eLeapRS_ProtocolError",
        _eLeapRS_eLeapRS_InvalidClientID => "eLeapRS_InvalidClientID",
        _eLeapRS_eLeapRS_UnexpectedClosed => "eLeapRS_UnexpectedClosed",
        _eLeapRS_eLeapRS_UnknownImageFrameRequest => "eLeapRS_UnknownImageFrameRequest",
        _eLeapRS_eLeapRS_UnknownTrackingFrameID => "eLeapRS_UnknownTrackingFrameID",
        _eLeapRS_eLeapRS_RoutineIsNotSeer => "eLeapRS_RoutineIsNotSeer",
        _eLeapRS_eLeapRS_TimestampTooEarly => "eLeapRS_TimestampTooEarly",
        _eLeapRS_eLeapRS_ConcurrentPoll => "eLeapRS_ConcurrentPoll",
        _eLeapRS_eLeapRS_NotAvailable => "eLeapRS_NotAvailable",
        _eLeapRS_eLeapRS_NotStreaming => "eLeapRS_NotStreaming",
        _eLeapRS_eLeapRS_CannotOpenDevice => "eLeapRS_CannotOpenDevice",
        _ => "unknown eLeapRS",
    };
    Err(SourceError::Call { call, code })
}
