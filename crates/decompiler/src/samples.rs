//! Sample directory and BRR sample extraction

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{
    dsp_registers, BYTES_PER_SAMPLE_DIRECTORY_ENTRY, MAX_SAMPLE_DIRECTORY_ENTRIES,
    SAMPLE_DIRECTORY_SENTINEL,
};
use crate::errors::{MemoryError, SampleError};
use crate::memory::{MemoryImage, AUDIO_RAM_SIZE};
use crate::profiles::SampleIdentity;

use brr::BrrSample;

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SampleDescriptor {
    pub start: u16,
    pub loop_point: u16,
}

impl SampleDescriptor {
    fn read(image: &MemoryImage, addr: usize) -> Result<Self, MemoryError> {
        Ok(Self {
            start: image.u16_at(addr)?,
            loop_point: image.u16_at(addr + 2)?,
        })
    }

    pub fn is_sentinel(&self) -> bool {
        self.start == SAMPLE_DIRECTORY_SENTINEL && self.loop_point == SAMPLE_DIRECTORY_SENTINEL
    }

    /// Loop point relative to the start of the sample
    pub fn loop_offset(&self) -> i32 {
        i32::from(self.loop_point) - i32::from(self.start)
    }

    fn identity(&self, identity: SampleIdentity) -> (u16, Option<u16>) {
        match identity {
            SampleIdentity::StartAndLoop => (self.start, Some(self.loop_point)),
            SampleIdentity::StartOnly => (self.start, None),
        }
    }
}

/// A sample table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSlot {
    pub index: u8,
    pub label: String,
    pub descriptor: SampleDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub label: String,
    pub start: u16,
    pub brr: BrrSample,
}

#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    slots: Vec<SampleSlot>,
    samples: Vec<Sample>,
}

/// Returns the address of the sample directory (the S-DSP `DIR` register × 0x100)
pub fn sample_directory_addr(image: &MemoryImage) -> Result<u16, MemoryError> {
    Ok(u16::from(image.dsp_register(dsp_registers::DIR)?) << 8)
}

/// Number of directory entries that fit in Audio-RAM
fn n_directory_entries(directory: u16) -> usize {
    let remaining = (AUDIO_RAM_SIZE - usize::from(directory)) / BYTES_PER_SAMPLE_DIRECTORY_ENTRY;
    remaining.min(MAX_SAMPLE_DIRECTORY_ENTRIES)
}

/// Assigns a label to every distinct sample in the directory.
///
/// The first slot of a sample is named `SampleXX`, every later slot with the same sample
/// appends `_XX` to the label.
fn label_samples(
    image: &MemoryImage,
    directory: u16,
    identity: SampleIdentity,
) -> Result<HashMap<(u16, Option<u16>), String>, MemoryError> {
    let mut labels: HashMap<(u16, Option<u16>), String> = HashMap::new();

    for i in 0..n_directory_entries(directory) {
        let addr = usize::from(directory) + i * BYTES_PER_SAMPLE_DIRECTORY_ENTRY;
        let d = SampleDescriptor::read(image, addr)?;

        labels
            .entry(d.identity(identity))
            .and_modify(|l| l.push_str(&format!("_{i:02X}")))
            .or_insert_with(|| format!("Sample{i:02X}"));
    }

    Ok(labels)
}

fn read_sample(
    image: &MemoryImage,
    slot: u8,
    label: &str,
    d: &SampleDescriptor,
) -> Result<Sample, SampleError> {
    let data = &image.audio_ram()[usize::from(d.start)..];

    match BrrSample::read_from(data, d.loop_offset()) {
        Ok(brr) => {
            tracing::debug!(
                "{label} at ${:04X}: {} bytes, looping: {}, loop offset: {}",
                d.start,
                brr.brr_data().len(),
                brr.is_looping(),
                brr.loop_offset()
            );
            Ok(Sample {
                label: label.to_owned(),
                start: d.start,
                brr,
            })
        }
        Err(brr::ParseError::EndFlagNotFound)
        | Err(brr::ParseError::IncompleteBlock(_))
        | Err(brr::ParseError::Empty) => Err(SampleError::UnterminatedSample {
            slot,
            start: d.start,
        }),
        Err(error) => Err(SampleError::InvalidBrrData {
            slot,
            start: d.start,
            error,
        }),
    }
}

impl SampleTable {
    /// Extracts the sample directory at `directory`.
    ///
    /// If `used` is `None`, every slot is extracted up to the first `$FFFF,$FFFF` entry.
    /// Otherwise only the slots in `used` are extracted.
    pub fn extract(
        image: &MemoryImage,
        directory: u16,
        used: Option<&BTreeSet<u8>>,
        identity: SampleIdentity,
    ) -> Result<Self, SampleError> {
        let labels = label_samples(image, directory, identity)?;

        let mut slots = Vec::new();
        let mut samples: Vec<Sample> = Vec::new();

        for i in 0..n_directory_entries(directory) {
            // n_directory_entries() is <= 256
            let index = i as u8;

            if let Some(used) = used {
                if !used.contains(&index) {
                    continue;
                }
            }

            let addr = usize::from(directory) + i * BYTES_PER_SAMPLE_DIRECTORY_ENTRY;
            let descriptor = SampleDescriptor::read(image, addr)?;

            if used.is_none() && descriptor.is_sentinel() {
                break;
            }

            let label = &labels[&descriptor.identity(identity)];

            if !samples.iter().any(|s| &s.label == label) {
                samples.push(read_sample(image, index, label, &descriptor)?);
            }

            slots.push(SampleSlot {
                index,
                label: label.clone(),
                descriptor,
            });
        }

        tracing::debug!(
            "{} sample table slots, {} distinct samples",
            slots.len(),
            samples.len()
        );

        Ok(Self { slots, samples })
    }

    pub fn slots(&self) -> &[SampleSlot] {
        &self.slots
    }

    /// Distinct samples, in the order they first appear in the table
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
