//! N-SPC driver constants

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

// These values MUST match the N-SPC driver.

#![allow(clippy::assertions_on_constants)]

pub const N_VOICES: usize = 8;

pub const BYTES_PER_INSTRUMENT: usize = 6;
pub const BYTES_PER_SAMPLE_DIRECTORY_ENTRY: usize = 4;
pub const MAX_SAMPLE_DIRECTORY_ENTRIES: usize = 256;

/// First instrument slot used by the optimised driver.
/// Extracted instruments are renumbered starting at this slot.
pub const FIRST_INSTRUMENT_SLOT: u8 = 0x16;

/// The echo volume of the optimised driver is mixed against this main volume.
pub const ECHO_REFERENCE_VOLUME: u8 = 0x60;

/// A sample directory entry with both pointers set to this value marks the end of the table.
pub const SAMPLE_DIRECTORY_SENTINEL: u16 = 0xffff;

pub mod dsp_registers {
    pub const MVOLL: u8 = 0x0c;
    pub const MVOLR: u8 = 0x1c;
    pub const DIR: u8 = 0x5d;
}

pub mod opcodes {
    pub const END: u8 = 0x00;

    // 0x01 - 0x7f are note length opcodes

    pub const FIRST_NOTE: u8 = 0x80;
    pub const TIE: u8 = 0xc8;
    pub const REST: u8 = 0xc9;
    pub const FIRST_PERCUSSION_NOTE: u8 = 0xca;
    pub const FIRST_COMMAND: u8 = 0xe0;

    pub const SET_INSTRUMENT: u8 = 0xe0;
    pub const PAN: u8 = 0xe1;
    pub const DYNAMIC_PAN: u8 = 0xe2;
    pub const MUSIC_VOLUME: u8 = 0xe5;
    pub const DYNAMIC_MUSIC_VOLUME: u8 = 0xe6;
    pub const VOLUME: u8 = 0xed;
    pub const DYNAMIC_VOLUME: u8 = 0xee;
    pub const CALL_SUBSECTION: u8 = 0xef;
    pub const ECHO: u8 = 0xf5;
    pub const DYNAMIC_ECHO: u8 = 0xf8;
    pub const PITCH_SLIDE: u8 = 0xf9;
    pub const PERCUSSION_BASE: u8 = 0xfa;
}

pub mod tracker_commands {
    /// Tracker commands below this value are jumps
    pub const FIRST_PATTERN_ADDR: u16 = 0x100;

    /// Jumps with a command >= this value end the tracker
    pub const STOP_DECODING_JUMP: u16 = 0x81;

    /// Jumps with a command >= this value loop forever
    pub const UNCONDITIONAL_JUMP: u16 = 0x82;
}

/// Argument byte counts of the standard commands (`0xe0..=0xfa`)
#[rustfmt::skip]
const COMMAND_LENGTHS: [u8; 27] = [
    1, // e0 instrument
    1, // e1 pan
    2, // e2 ticks, pan
    3, // e3 delay, rate, extent
    0, // e4
    1, // e5 music volume
    2, // e6 ticks, music volume
    1, // e7 tempo
    2, // e8 ticks, tempo
    1, // e9 semitones
    1, // ea semitones
    3, // eb delay, rate, extent
    0, // ec
    1, // ed volume
    2, // ee ticks, volume
    3, // ef pointer, repetitions
    1, // f0 ticks
    3, // f1 delay, ticks, semitones
    3, // f2 delay, ticks, semitones
    0, // f3
    1, // f4 subtranspose
    3, // f5 voices, left, right
    0, // f6
    3, // f7 delay, feedback, filter
    3, // f8 ticks, left, right
    3, // f9 delay, ticks, semitones
    1, // fa instrument
];

const COMMAND_NAMES: [&str; 27] = [
    "!instr",
    "!pan",
    "!dynamicPan",
    "!vibrato",
    "!endVibrato",
    "!musicVolume",
    "!dynamicMusicVolume",
    "!tempo",
    "!dynamicTempo",
    "!musicTranspose",
    "!transpose",
    "!tremolo",
    "!endTremolo",
    "!volume",
    "!dynamicVolume",
    "!loop",
    "!dynamicVibrato",
    "!slideOut",
    "!slideIn",
    "!endSlide",
    "!subtranspose",
    "!echo",
    "!endEcho",
    "!echoParameters",
    "!dynamicEcho",
    "!pitchSlide",
    "!percBase",
];

const _: () = assert!(
    opcodes::FIRST_COMMAND as usize + COMMAND_LENGTHS.len() - 1 == opcodes::PERCUSSION_BASE as usize
);
const _: () = assert!(
    opcodes::FIRST_COMMAND as usize + COMMAND_NAMES.len() - 1 == opcodes::PERCUSSION_BASE as usize
);

pub fn default_command_length(opcode: u8) -> Option<u8> {
    let i = opcode.checked_sub(opcodes::FIRST_COMMAND)?;
    COMMAND_LENGTHS.get(usize::from(i)).copied()
}

pub fn default_command_name(opcode: u8) -> Option<&'static str> {
    let i = opcode.checked_sub(opcodes::FIRST_COMMAND)?;
    COMMAND_NAMES.get(usize::from(i)).copied()
}

/// Iterates over the opcodes with a default command name
pub fn default_command_opcodes() -> impl Iterator<Item = u8> {
    opcodes::FIRST_COMMAND..=opcodes::PERCUSSION_BASE
}

/// Note ring-length table of the unmodified driver
pub const STANDARD_RING_LENGTH_TABLE: [u8; 8] = [0x33, 0x66, 0x80, 0x99, 0xb3, 0xcc, 0xe6, 0xff];

/// Note volume table of the unmodified driver
pub const STANDARD_VOLUME_TABLE: [u8; 16] = [
    0x19, 0x33, 0x4c, 0x66, 0x72, 0x7f, 0x8c, 0x99, 0xa5, 0xb2, 0xbf, 0xcc, 0xd8, 0xe5, 0xf2, 0xfc,
];
