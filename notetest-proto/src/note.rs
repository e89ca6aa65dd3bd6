use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::DATA_MASK;

/// A note number as understood by the receiving hardware (0-127)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note(u8);

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal tempered ratios of each semitone above A
const SEMITONE_RATIOS: [f32; 12] = [
    1.0,
    1.059_463_1,
    1.122_462,
    1.189_207_1,
    1.259_921,
    1.334_839_9,
    1.414_213_6,
    1.498_307,
    1.587_401,
    1.681_792_9,
    1.781_797_4,
    1.887_748_6,
];

impl Note {
    pub const COUNT: u8 = 128;
    pub const TUNING_HZ: f32 = 440.0;
    pub const TUNING_NOTE: u8 = 69;

    /// Wraps the number into range the same way the encoder does
    pub const fn new(number: u8) -> Self {
        Self(number & DATA_MASK)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Frequency in hertz, tuned to A4 = 440 Hz
    pub fn frequency(self) -> f32 {
        let offset = self.0 as i32 - Self::TUNING_NOTE as i32;
        let octave = offset.div_euclid(12);
        let base = Self::TUNING_HZ * SEMITONE_RATIOS[offset.rem_euclid(12) as usize];

        if octave >= 0 {
            base * (1u32 << octave) as f32
        } else {
            base / (1u32 << -octave) as f32
        }
    }

    pub const fn is_white_key(self) -> bool {
        let n = self.0 % 12;

        if n > 4 {
            n % 2 == 1
        } else {
            n % 2 == 0
        }
    }

    pub const fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    pub const fn name(self) -> &'static str {
        NAMES[(self.0 % 12) as usize]
    }
}

impl From<u8> for Note {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Note> for u8 {
    fn from(value: Note) -> Self {
        value.0
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}
