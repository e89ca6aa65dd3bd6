use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{
    note::Note, ALL_NOTES_OFF_CONTROLLER, CHANNEL_COUNT, CHANNEL_MASK, CONTROL_CHANGE, DATA_MASK, NOTE_OFF,
    NOTE_ON,
};

/// The three bytes of a single command on the wire
pub type Frame = [u8; 3];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    On,
    Off,
}

impl StatusKind {
    /// Upper nibble of the status byte
    pub const fn status(self) -> u8 {
        match self {
            StatusKind::On => NOTE_ON,
            StatusKind::Off => NOTE_OFF,
        }
    }
}

/// A note event as it travels over the serial line
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub kind: StatusKind,
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
}

impl NoteEvent {
    /// Packs the event into a frame. Out of range fields are masked down to
    /// their bit width, never rejected.
    pub const fn to_frame(self) -> Frame {
        [
            self.kind.status() | (self.channel & CHANNEL_MASK),
            self.note & DATA_MASK,
            self.velocity & DATA_MASK,
        ]
    }
}

impl Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            StatusKind::On => "on",
            StatusKind::Off => "off",
        };

        write!(
            f,
            "note {} {} ({}) velocity {} channel {}",
            kind,
            Note::new(self.note),
            self.note,
            self.velocity,
            self.channel
        )
    }
}

/// Encodes a note command with every field given explicitly
pub const fn encode(kind: StatusKind, note: u8, velocity: u8, channel: u8) -> Frame {
    NoteEvent {
        kind,
        channel,
        note,
        velocity,
    }
    .to_frame()
}

/// Builds note frames for a fixed velocity and channel
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Encoder {
    /// Velocity used for both note on and note off
    pub velocity: u8,

    /// Channel (0-15) the frames are addressed to
    pub channel: u8,
}

impl Encoder {
    pub const DEFAULT_VELOCITY: u8 = 100;
    pub const DEFAULT_CHANNEL: u8 = 0;

    pub const fn new(velocity: u8, channel: u8) -> Self {
        Self { velocity, channel }
    }

    pub const fn event(&self, kind: StatusKind, note: u8) -> NoteEvent {
        NoteEvent {
            kind,
            channel: self.channel,
            note,
            velocity: self.velocity,
        }
    }

    pub const fn encode(&self, kind: StatusKind, note: u8) -> Frame {
        self.event(kind, note).to_frame()
    }

    pub const fn note_on(&self, note: u8) -> Frame {
        self.encode(StatusKind::On, note)
    }

    pub const fn note_off(&self, note: u8) -> Frame {
        self.encode(StatusKind::Off, note)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VELOCITY, Self::DEFAULT_CHANNEL)
    }
}

/// "All Notes Off" controller message for one channel
pub const fn all_notes_off(channel: u8) -> Frame {
    [
        CONTROL_CHANGE | (channel & CHANNEL_MASK),
        ALL_NOTES_OFF_CONTROLLER,
        0,
    ]
}

/// "All Notes Off" for every channel, lowest channel first
pub fn all_notes_off_all() -> impl Iterator<Item = Frame> {
    (0..CHANNEL_COUNT).map(all_notes_off)
}
