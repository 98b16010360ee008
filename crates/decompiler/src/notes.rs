//! Note names

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::opcodes;

pub const SEMITONES_PER_OCTAVE: u8 = 12;

/// Octave of note index 0
pub const FIRST_OCTAVE: u8 = 2;

/// Number of note opcodes
pub const N_NOTES: u8 = opcodes::TIE - opcodes::FIRST_NOTE;

const KEYS: [&str; SEMITONES_PER_OCTAVE as usize] =
    ["c", "cs", "d", "ds", "e", "f", "fs", "g", "gs", "a", "as", "b"];

/// Returns the asar define for a note index (`0` is `!c2`)
pub fn note_define(note_index: u8) -> String {
    let key = KEYS[usize::from(note_index % SEMITONES_PER_OCTAVE)];
    let octave = note_index / SEMITONES_PER_OCTAVE + FIRST_OCTAVE;

    format!("!{key}{octave}")
}
