//! Instrument table extraction

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::BYTES_PER_INSTRUMENT;
use crate::errors::MemoryError;
use crate::memory::MemoryImage;

use std::collections::BTreeSet;

/// An instrument table entry.
///
/// `data[0]` is the sample directory index, followed by ADSR1, ADSR2, GAIN and the
/// 16 bit pitch multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub index: u8,
    pub data: [u8; BYTES_PER_INSTRUMENT],
}

impl Instrument {
    pub fn sample(&self) -> u8 {
        self.data[0]
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstrumentTable {
    instruments: Vec<Instrument>,
}

impl InstrumentTable {
    /// Reads the used instruments, in ascending index order
    pub fn extract(
        image: &MemoryImage,
        table_addr: u16,
        used: impl IntoIterator<Item = u8>,
    ) -> Result<Self, MemoryError> {
        let used: BTreeSet<u8> = used.into_iter().collect();

        let instruments = used
            .into_iter()
            .map(|index| {
                let addr = usize::from(table_addr) + usize::from(index) * BYTES_PER_INSTRUMENT;
                let mut data = [0; BYTES_PER_INSTRUMENT];
                data.copy_from_slice(image.slice(addr, BYTES_PER_INSTRUMENT)?);

                Ok(Instrument { index, data })
            })
            .collect::<Result<_, MemoryError>>()?;

        Ok(Self { instruments })
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
