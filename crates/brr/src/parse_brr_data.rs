//! BRR block scanning

// SPDX-FileCopyrightText: © 2023 Marcus Rowe <undisbeliever@gmail.com>
// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use ::std::fmt::Display;

use crate::{BRR_HEADER_END_FLAG, BYTES_PER_BRR_BLOCK};

#[derive(Debug)]
pub enum ParseError {
    Empty,
    EndFlagNotFound,
    IncompleteBlock(usize),
    SampleEndsEarly,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "BRR data is empty"),
            ParseError::EndFlagNotFound => write!(f, "End flag not found"),
            ParseError::IncompleteBlock(size) => {
                write!(f, "BRR data ends with an incomplete block ({size} bytes)")
            }
            ParseError::SampleEndsEarly => write!(f, "Sample ends too early"),
        }
    }
}

/// Returns the number of bytes from the start of `data` up to and including the first BRR
/// block with the end flag set.
pub fn brr_data_length(data: &[u8]) -> Result<usize, ParseError> {
    if data.is_empty() {
        return Err(ParseError::Empty);
    }

    for (i, block) in data.chunks(BYTES_PER_BRR_BLOCK).enumerate() {
        if block.len() != BYTES_PER_BRR_BLOCK {
            return Err(ParseError::IncompleteBlock(block.len()));
        }
        if block[0] & BRR_HEADER_END_FLAG != 0 {
            return Ok((i + 1) * BYTES_PER_BRR_BLOCK);
        }
    }

    Err(ParseError::EndFlagNotFound)
}
