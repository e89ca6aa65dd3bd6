use crate::{frame::NoteEvent, StatusKind, CHANNEL_MASK};

const STATUS_FLAG: u8 = 0x80;
const MESSAGE_TYPE_MASK: u8 = 0xF0;
const SYSTEM_MESSAGE: u8 = 0xF0;
const SYSTEM_COMMON_LAST: u8 = 0xF7;

/// Incremental parser for the receiving end of the serial line.
///
/// Bytes are fed one at a time. Note on and note off messages are reported
/// once both data bytes have arrived, everything else is discarded. Running
/// status is honoured, so after a note message any further pair of data bytes
/// produces another event of the same kind on the same channel.
#[derive(Debug, Default, Clone)]
pub struct FrameDecoder {
    running: Option<(StatusKind, u8)>,
    data: [u8; 2],
    data_len: usize,
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            running: None,
            data: [0; 2],
            data_len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Option<NoteEvent> {
        if byte & STATUS_FLAG != 0 {
            self.push_status(byte);
            return None;
        }

        let Some((kind, channel)) = self.running else {
            // Stray data byte or SysEx payload
            return None;
        };

        self.data[self.data_len] = byte;
        self.data_len += 1;

        if self.data_len < self.data.len() {
            return None;
        }

        // Running status survives a complete note message
        self.data_len = 0;

        let [note, velocity] = self.data;
        let kind = match kind {
            StatusKind::On if velocity == 0 => StatusKind::Off,
            kind => kind,
        };

        Some(NoteEvent {
            kind,
            channel,
            note,
            velocity,
        })
    }

    /// Feeds a whole buffer, calling `on_event` for every completed event
    pub fn push_all(&mut self, bytes: &[u8], mut on_event: impl FnMut(NoteEvent)) {
        for &byte in bytes {
            if let Some(event) = self.push(byte) {
                on_event(event);
            }
        }
    }

    fn push_status(&mut self, byte: u8) {
        let kind = match byte & MESSAGE_TYPE_MASK {
            crate::NOTE_OFF => Some(StatusKind::Off),
            crate::NOTE_ON => Some(StatusKind::On),
            SYSTEM_MESSAGE if byte > SYSTEM_COMMON_LAST => {
                // Real-time messages may be interleaved anywhere
                return;
            }
            // SysEx and system common messages carry no notes
            _ => None,
        };

        self.running = kind.map(|kind| (kind, byte & CHANNEL_MASK));
        self.data_len = 0;
    }
}
