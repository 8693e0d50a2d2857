use std::collections::VecDeque;

use super::{FrameSource, SourceError, TrackingFrame};

/// Replays a fixed sequence of `(connected, frame)` steps, one per
/// [`poll`](FrameSource::poll).
///
/// After the script runs out the last step repeats forever.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pending: VecDeque<(bool, TrackingFrame)>,
    connected: bool,
    current: TrackingFrame,
}

impl ScriptedSource {
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = (bool, TrackingFrame)>,
    {
        Self {
            pending: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ScriptedSource {
    fn poll(&mut self) -> Result<(), SourceError> {
        if let Some((connected, frame)) = self.pending.pop_front() {
            self.connected = connected;
            self.current = frame;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn current_frame(&self) -> &TrackingFrame {
        &self.current
    }
}
