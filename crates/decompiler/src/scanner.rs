//! Driver table address scanner

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{STANDARD_RING_LENGTH_TABLE, STANDARD_VOLUME_TABLE};
use crate::errors::{ConvertError, MemoryError};
use crate::memory::MemoryImage;
use crate::profiles::GameProfile;
use crate::signature::AddressSignature;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NoteLengthTableAddresses {
    pub ring_lengths: u16,
    pub volumes: u16,
}

impl NoteLengthTableAddresses {
    /// The volume table directly follows the ring-length table in most games
    pub fn contiguous(ring_lengths: u16) -> Self {
        Self {
            ring_lengths,
            volumes: ring_lengths.wrapping_add(STANDARD_RING_LENGTH_TABLE.len() as u16),
        }
    }
}

/// The note ring-length and note volume tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteParameterTables {
    pub ring_lengths: [u8; 8],
    pub volumes: [u8; 16],
}

impl NoteParameterTables {
    pub const STANDARD: Self = Self {
        ring_lengths: STANDARD_RING_LENGTH_TABLE,
        volumes: STANDARD_VOLUME_TABLE,
    };

    pub fn read(
        image: &MemoryImage,
        addresses: NoteLengthTableAddresses,
    ) -> Result<Self, MemoryError> {
        let mut out = Self::STANDARD;

        out.ring_lengths
            .copy_from_slice(image.slice(addresses.ring_lengths.into(), 8)?);
        out.volumes
            .copy_from_slice(image.slice(addresses.volumes.into(), 16)?);

        Ok(out)
    }

    pub fn is_standard(&self) -> bool {
        *self == Self::STANDARD
    }
}

pub struct Scanner<'a> {
    image: &'a MemoryImage,
    profile: &'a GameProfile,
}

impl<'a> Scanner<'a> {
    pub fn new(image: &'a MemoryImage, profile: &'a GameProfile) -> Self {
        Self { image, profile }
    }

    fn first_match(&self, signatures: &[AddressSignature]) -> Option<u16> {
        signatures.iter().find_map(|s| {
            let (addr, matched) = self.image.scan(&s.signature)?;
            let out = s.address.read(matched)?;

            tracing::debug!("signature {} matched at ${:04X}", s.signature, addr);
            Some(out)
        })
    }

    pub fn instrument_table(&self) -> Option<u16> {
        let a = self.first_match(&self.profile.instrument_table_signatures);
        if let Some(a) = a {
            tracing::debug!("instrument table at ${a:04X}");
        }
        a
    }

    pub fn tracker_pointers(&self) -> Option<u16> {
        let a = self.first_match(&self.profile.tracker_pointer_signatures);
        if let Some(a) = a {
            tracing::debug!("tracker pointers at ${a:04X}");
        }
        a
    }

    pub fn note_length_table(&self) -> Option<NoteLengthTableAddresses> {
        self.profile
            .note_length_table_signatures
            .iter()
            .find_map(|s| {
                let (_, matched) = self.image.scan(&s.signature)?;
                let out = NoteLengthTableAddresses {
                    ring_lengths: s.ring_length_table.read(matched)?,
                    volumes: s.volume_table.read(matched)?,
                };
                tracing::debug!(
                    "note ring-length table at ${:04X}, note volume table at ${:04X}",
                    out.ring_lengths,
                    out.volumes
                );
                Some(out)
            })
    }

    /// Returns the first non-zero byte at the profile's track index offsets (masked to 7 bits).
    ///
    /// Returns 0 if all of the offsets are 0.
    pub fn track_index(&self) -> Result<u8, MemoryError> {
        for &offset in &self.profile.track_index_offsets {
            let i = self.image.u8_at(offset.into())?;
            if i != 0 {
                return Ok(i & 0x7f);
            }
        }
        Ok(0)
    }
}

/// Reads the tracker address of song `track_index` (1 is the first song)
pub fn song_address(
    image: &MemoryImage,
    tracker_pointers: u16,
    track_index: u8,
) -> Result<u16, ConvertError> {
    if track_index == 0 {
        return Err(ConvertError::NoTrackIndex);
    }

    let addr = usize::from(tracker_pointers) + usize::from(track_index) * 2 - 2;
    Ok(image.u16_at(addr)?)
}
