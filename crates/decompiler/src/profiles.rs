//! Per-game driver variations

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{default_command_length, default_command_name};
use crate::errors::{DeserializeError, ProfileError};
use crate::signature::{
    alternate_tracker_pointers_signature, instrument_table_signature,
    note_length_table_signature, tracker_pointers_signature, AddressSignature,
    NoteLengthTableSignature,
};

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

pub const BUILTIN_GAMES: [&str; 4] = ["common", "f_zero", "super_mario_all_stars", "hal"];

/// A command opcode, written as a hex string in profile files (`"FB"` or `"$FB"`)
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String")]
pub struct Opcode(pub u8);

impl TryFrom<String> for Opcode {
    type Error = ProfileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s
            .strip_prefix('$')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(&s);

        match u8::from_str_radix(hex, 16) {
            Ok(o) => Ok(Opcode(o)),
            Err(_) => Err(ProfileError::InvalidOpcode(s)),
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:02X}", self.0)
    }
}

/// Which sample directory fields decide if two slots hold the same sample
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SampleIdentity {
    #[default]
    StartAndLoop,
    StartOnly,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameProfile {
    pub name: String,

    /// Zero-page addresses holding the playing song index, tried in order
    pub track_index_offsets: Vec<u16>,

    pub instrument_table_signatures: Vec<AddressSignature>,
    pub tracker_pointer_signatures: Vec<AddressSignature>,
    pub note_length_table_signatures: Vec<NoteLengthTableSignature>,

    /// Argument count overrides
    pub command_lengths: BTreeMap<Opcode, u8>,
    pub command_names: BTreeMap<Opcode, String>,

    /// Pan arguments count from the other side of the stereo field
    pub mirror_panning: bool,

    pub sample_identity: SampleIdentity,
}

impl Default for GameProfile {
    fn default() -> Self {
        Self {
            name: "common".to_owned(),
            track_index_offsets: vec![0xf4, 0x00, 0x04],
            instrument_table_signatures: vec![instrument_table_signature()],
            tracker_pointer_signatures: vec![tracker_pointers_signature()],
            note_length_table_signatures: vec![note_length_table_signature()],
            command_lengths: BTreeMap::new(),
            command_names: BTreeMap::new(),
            mirror_panning: false,
            sample_identity: SampleIdentity::StartAndLoop,
        }
    }
}

impl GameProfile {
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        let common = Self::default();

        match name {
            "common" => Ok(common),
            "f_zero" => Ok(Self {
                name: name.to_owned(),
                track_index_offsets: vec![0x04],
                ..common
            }),
            "super_mario_all_stars" => Ok(Self {
                name: name.to_owned(),
                track_index_offsets: vec![0xf6, 0x02, 0x06],
                tracker_pointer_signatures: vec![
                    alternate_tracker_pointers_signature(),
                    tracker_pointers_signature(),
                ],
                ..common
            }),
            "hal" => Ok(Self {
                name: name.to_owned(),
                mirror_panning: true,
                ..common
            }),
            _ => Err(ProfileError::UnknownGame(name.to_owned())),
        }
    }

    /// Number of argument bytes after `opcode`, `None` if the command is unknown
    pub fn command_length(&self, opcode: u8) -> Option<u8> {
        match self.command_lengths.get(&Opcode(opcode)) {
            Some(l) => Some(*l),
            None => default_command_length(opcode),
        }
    }

    pub fn command_name(&self, opcode: u8) -> Option<&str> {
        match self.command_names.get(&Opcode(opcode)) {
            Some(n) => Some(n.as_str()),
            None => default_command_name(opcode),
        }
    }

    /// All named commands, in opcode order
    pub fn command_defines(&self) -> BTreeMap<u8, &str> {
        let mut out: BTreeMap<u8, &str> = crate::driver_constants::default_command_opcodes()
            .filter_map(|o| default_command_name(o).map(|n| (o, n)))
            .collect();

        for (o, n) in &self.command_names {
            out.insert(o.0, n.as_str());
        }
        out
    }
}

pub fn load_profile_file(path: &Path) -> Result<GameProfile, DeserializeError> {
    let file_name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(DeserializeError::OpenError(file_name, e)),
    };
    let reader = BufReader::new(file);

    match serde_json::from_reader(reader) {
        Ok(p) => Ok(p),
        Err(e) => Err(DeserializeError::SerdeError(file_name, e)),
    }
}
