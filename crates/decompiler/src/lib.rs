//! N-SPC SPC file decompiler

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]

pub mod convert;
pub mod driver_constants;
pub mod errors;
pub mod export;
pub mod instruments;
pub mod memory;
pub mod normalize;
pub mod notes;
pub mod profiles;
pub mod samples;
pub mod scanner;
pub mod signature;
pub mod time;
pub mod track;
pub mod tracker;

pub use convert::{
    convert_spc, decompile_song, export_all_samples, AddressOverrides, ConvertSettings,
    ConvertedSong, DecompiledSong,
};
pub use export::{AsarExporter, ExportedSample, Exporter, SampleOutput};
pub use memory::{load_spc_file, MemoryImage};
pub use profiles::{load_profile_file, GameProfile, BUILTIN_GAMES};
