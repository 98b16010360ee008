//! A BRR data format library

// SPDX-FileCopyrightText: © 2023 Marcus Rowe <undisbeliever@gmail.com>
// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]

mod parse_brr_data;

pub use parse_brr_data::{brr_data_length, ParseError};

pub const BYTES_PER_BRR_BLOCK: usize = 9;

pub const BRR_HEADER_END_FLAG: u8 = 0x01;
pub const BRR_HEADER_LOOP_FLAG: u8 = 0x02;

/// A BRR sample as it is stored in Audio-RAM.
///
/// The loop offset is kept even when the loop flag is clear, the driver's sample directory
/// always contains a loop pointer.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct BrrSample {
    /// Byte distance from the start of the sample to the loop point.
    /// Negative if the loop pointer is before the sample.
    loop_offset: i32,

    /// Loop flag of the last block
    looping: bool,

    /// BRR data
    brr_data: Vec<u8>,
}

impl BrrSample {
    pub fn new(brr_data: Vec<u8>, loop_offset: i32) -> Result<Self, ParseError> {
        let length = brr_data_length(&brr_data)?;
        if length != brr_data.len() {
            return Err(ParseError::SampleEndsEarly);
        }

        let last_block_header = brr_data[length - BYTES_PER_BRR_BLOCK];

        Ok(Self {
            loop_offset,
            looping: last_block_header & BRR_HEADER_LOOP_FLAG != 0,
            brr_data,
        })
    }

    /// Reads a sample starting at the beginning of `data`.
    ///
    /// `data` can continue past the end of the sample.
    pub fn read_from(data: &[u8], loop_offset: i32) -> Result<Self, ParseError> {
        let length = brr_data_length(data)?;
        Self::new(data[..length].to_vec(), loop_offset)
    }

    pub fn loop_offset(&self) -> i32 {
        self.loop_offset
    }
    pub fn is_looping(&self) -> bool {
        self.looping
    }
    pub fn brr_data(&self) -> &[u8] {
        &self.brr_data
    }
}
