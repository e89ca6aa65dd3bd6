#![no_std]

#[cfg(test)]
extern crate std;

pub mod decode;
pub mod frame;
pub mod note;

pub use decode::FrameDecoder;
pub use frame::{all_notes_off, all_notes_off_all, encode, Encoder, Frame, NoteEvent, StatusKind};
pub use note::Note;

/// Number of addressable channels on the wire
pub const CHANNEL_COUNT: u8 = 16;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const CONTROL_CHANGE: u8 = 0xB0;

/// Controller number of the "All Notes Off" channel mode message
pub const ALL_NOTES_OFF_CONTROLLER: u8 = 123;

pub const CHANNEL_MASK: u8 = 0x0F;
pub const DATA_MASK: u8 = 0x7F;
