use std::{fmt, io::Write};

use anyhow::Result;
use log::{debug, warn};

use notetest_proto::{Encoder, Note};

use crate::{
    console::{Console, Input},
    io::Connection,
};

pub const PROMPT: &str = "Enter note number: ";
pub const INVALID_INPUT: &str = "Invalid input";
pub const NOTE_OFF_NONE: &str = "Note off (none)";

/// An integer typed by the operator, of any width.
///
/// Keeps its decimal form for the console and its low byte (two's complement
/// for negative numbers) for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteNumber {
    decimal: String,
    wire: u8,
}

impl NoteNumber {
    /// Low byte of the number; the encoder masks it the rest of the way
    pub fn wire(&self) -> u8 {
        self.wire
    }
}

impl From<u8> for NoteNumber {
    fn from(value: u8) -> Self {
        Self {
            decimal: value.to_string(),
            wire: value,
        }
    }
}

impl fmt::Display for NoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decimal)
    }
}

/// Parses a decimal integer with an optional sign, surrounding whitespace and
/// single `_` separators between digits. There is no upper bound on the width.
pub fn parse_note(line: &str) -> Option<NoteNumber> {
    let line = line.trim();

    let (negative, digits) = match line.as_bytes().first()? {
        b'-' => (true, &line[1..]),
        b'+' => (false, &line[1..]),
        _ => (false, line),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }

    let mut decimal = String::with_capacity(digits.len() + 1);
    let mut low_byte = 0u32;

    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(10)?;
        low_byte = (low_byte * 10 + digit) % 256;

        // Leading zeros are dropped
        if digit != 0 || !decimal.is_empty() {
            decimal.push(c);
        }
    }

    if decimal.is_empty() {
        decimal.push('0');
    } else if negative {
        decimal.insert(0, '-');
    }

    let wire = if negative {
        (256 - low_byte) % 256
    } else {
        low_byte
    };

    Some(NoteNumber {
        decimal,
        wire: wire as u8,
    })
}

/// Owns the connection and the one note that may be sounding on it.
///
/// Dropping the driver with a note still on sends a last note off before
/// the connection closes.
pub struct NoteDriver<P: Write> {
    connection: Connection<P>,
    encoder: Encoder,
    sounding: Option<NoteNumber>,
}

impl<P: Write> NoteDriver<P> {
    pub fn new(connection: Connection<P>, encoder: Encoder) -> Self {
        Self {
            connection,
            encoder,
            sounding: None,
        }
    }

    /// The note as the operator typed it, before masking
    pub fn sounding(&self) -> Option<&NoteNumber> {
        self.sounding.as_ref()
    }

    /// Turns off the sounding note, if any, and starts `note`
    pub fn play(&mut self, note: NoteNumber) -> Result<()> {
        self.release()?;

        self.connection.send(self.encoder.note_on(note.wire()))?;

        let pitch = Note::new(note.wire());
        debug!(
            "playing {} as {} ({:.2} Hz, {} key)",
            note,
            pitch,
            pitch.frequency(),
            if pitch.is_white_key() { "white" } else { "black" }
        );

        self.sounding = Some(note);

        Ok(())
    }

    /// Turns off the sounding note and returns it
    pub fn release(&mut self) -> Result<Option<NoteNumber>> {
        let Some(note) = self.sounding.take() else {
            return Ok(None);
        };

        self.connection.send(self.encoder.note_off(note.wire()))?;

        Ok(Some(note))
    }
}

impl<P: Write> Drop for NoteDriver<P> {
    fn drop(&mut self) {
        let Some(note) = self.sounding.take() else {
            return;
        };

        match self.connection.send(self.encoder.note_off(note.wire())) {
            Ok(()) => warn!("note {} was still sounding, sent note off", note),
            Err(err) => warn!("could not silence note {}: {:#}", note, err),
        }
    }
}

/// Prompts for notes until the operator interrupts, keeping at most one note
/// sounding.
pub fn run<P: Write, C: Console>(driver: &mut NoteDriver<P>, console: &mut C) -> Result<()> {
    loop {
        match console.read_line(PROMPT)? {
            Input::Line(line) => match parse_note(&line) {
                Some(note) => driver.play(note)?,
                None => {
                    debug!("rejected input {:?}", line);
                    console.write_line(INVALID_INPUT)?;
                }
            },
            Input::Interrupt => {
                match driver.sounding() {
                    Some(note) => console.write_line(&format!("Note off {}", note))?,
                    None => console.write_line(NOTE_OFF_NONE)?,
                }

                driver.release()?;

                return Ok(());
            }
        }
    }
}
