//! Source code exporters

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

mod asar;
pub use self::asar::AsarExporter;

use crate::convert::{ConvertSettings, DecompiledSong};
use crate::profiles::GameProfile;
use crate::samples::{Sample, SampleTable};

extern crate relative_path;
use relative_path::{RelativePath, RelativePathBuf};

use sha2::{Digest, Sha256};

pub const SAMPLE_FILE_EXTENSION: &str = "brr";

/// How the sample data is stored
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SampleOutput {
    /// `incbin` files named after the sample label
    #[default]
    IncbinLabel,
    /// `incbin` files named after the SHA-256 hash of the sample data
    IncbinHash,
    /// `db` statements
    Inline,
}

/// A BRR file to be written alongside the asm file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSample {
    pub file_name: String,
    pub data: Vec<u8>,
}

pub fn sample_hash_name(brr_data: &[u8]) -> String {
    let hash = Sha256::digest(brr_data);
    let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();

    format!("Sample_{hex}")
}

/// Returns the file name of a sample (without a directory)
pub fn sample_file_name(sample: &Sample, by_hash: bool) -> String {
    let name = if by_hash {
        sample_hash_name(sample.brr.brr_data())
    } else {
        sample.label.clone()
    };
    format!("{name}.{SAMPLE_FILE_EXTENSION}")
}

pub fn sample_include_path(
    directory: &RelativePath,
    sample: &Sample,
    by_hash: bool,
) -> RelativePathBuf {
    directory.join(sample_file_name(sample, by_hash))
}

/// Returns the distinct samples in `samples`, in table order
pub fn exported_samples(samples: &SampleTable, by_hash: bool) -> Vec<ExportedSample> {
    let mut out: Vec<ExportedSample> = Vec::with_capacity(samples.samples().len());

    for s in samples.samples() {
        let file_name = sample_file_name(s, by_hash);

        // Two labels can hash to the same file
        if !out.iter().any(|o| o.file_name == file_name) {
            out.push(ExportedSample {
                file_name,
                data: s.brr.brr_data().to_vec(),
            });
        }
    }
    out
}

pub trait Exporter {
    fn generate_defines_file(profile: &GameProfile) -> Result<String, std::fmt::Error>;

    fn generate_asm_file(
        song: &DecompiledSong,
        settings: &ConvertSettings,
        profile: &GameProfile,
    ) -> Result<String, std::fmt::Error>;
}
