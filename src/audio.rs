//! Sound for a terminal: the bell. Bursts queue a ring which is written out
//! with the next frame, so any number of bursts in one frame ring once.
//! A terminal that refuses the write costs a warning in the log and nothing
//! else.

use crate::sim::{EventSink, SimEvent};
use std::io::Write;

const BEL: &[u8] = b"\x07";

#[derive(Debug, Default)]
pub struct Bell {
    muted: bool,
    pending: bool,
}

impl Bell {
    pub fn new(muted: bool) -> Self {
        Self { muted, pending: false }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.pending = false;
        }
        self.muted
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Rings if a burst happened since the last flush.
    pub fn flush<W: Write>(&mut self, out: &mut W) {
        if !std::mem::take(&mut self.pending) {
            return;
        }
        if let Err(e) = out.write_all(BEL) {
            log::warn!("bell write failed: {e}");
        }
    }
}

impl EventSink for Bell {
    fn notify(&mut self, event: SimEvent) {
        if self.muted {
            return;
        }
        if let SimEvent::Explosion { .. } = event {
            self.pending = true;
        }
    }
}
