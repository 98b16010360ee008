//! SPC to asm conversion pipeline

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::ECHO_REFERENCE_VOLUME;
use crate::errors::{ConvertError, TableKind};
use crate::export::{exported_samples, AsarExporter, ExportedSample, Exporter, SampleOutput};
use crate::instruments::InstrumentTable;
use crate::memory::MemoryImage;
use crate::normalize::{amplify, normalize_echo_volume, MainVolume};
use crate::profiles::GameProfile;
use crate::samples::{sample_directory_addr, SampleTable};
use crate::scanner::{song_address, NoteLengthTableAddresses, NoteParameterTables, Scanner};
use crate::tracker::{Tracker, UsedInstruments};

use relative_path::RelativePathBuf;

/// User supplied addresses, these skip the signature scans
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AddressOverrides {
    pub instrument_table: Option<u16>,
    pub tracker_pointers: Option<u16>,
    /// Address of the ring-length table, the volume table follows it
    pub note_length_table: Option<u16>,
    pub track_index: Option<u8>,
    /// Address of the song's tracker (skips the tracker pointers and track index)
    pub song: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub addresses: AddressOverrides,

    /// `incsrc` path of the defines file
    pub defines_path: String,

    /// Directory of the `incbin` sample files, relative to the asm file
    pub sample_directory: RelativePathBuf,
    pub sample_output: SampleOutput,

    pub amplify: f64,

    /// Echo volume is normalised to this main volume (`None` disables normalisation)
    pub echo_reference: Option<u8>,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            addresses: AddressOverrides::default(),
            defines_path: "defines.asm".to_owned(),
            sample_directory: RelativePathBuf::new(),
            sample_output: SampleOutput::IncbinLabel,
            amplify: 1.0,
            echo_reference: Some(ECHO_REFERENCE_VOLUME),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecompiledSong {
    pub tracker: Tracker,
    pub perc_base: u8,
    pub used_instruments: UsedInstruments,
    pub instruments: InstrumentTable,
    pub samples: SampleTable,
    pub note_parameters: NoteParameterTables,
}

pub struct ConvertedSong {
    pub asm: String,
    /// Empty if the sample data is inline
    pub samples: Vec<ExportedSample>,
}

fn required<T>(addr: Option<T>, table: TableKind) -> Result<T, ConvertError> {
    match addr {
        Some(a) => Ok(a),
        None => Err(ConvertError::AddressNotFound(table)),
    }
}

fn song_tracker_address(
    image: &MemoryImage,
    overrides: &AddressOverrides,
    scanner: &Scanner,
) -> Result<u16, ConvertError> {
    if let Some(a) = overrides.song {
        return Ok(a);
    }

    let tracker_pointers = required(
        overrides.tracker_pointers.or_else(|| scanner.tracker_pointers()),
        TableKind::TrackerPointers,
    )?;
    let track_index = match overrides.track_index {
        Some(i) => i,
        None => scanner.track_index()?,
    };

    let addr = song_address(image, tracker_pointers, track_index)?;
    tracing::debug!("song {track_index} tracker at ${addr:04X}");

    Ok(addr)
}

/// Decodes and normalises the playing (or selected) song
pub fn decompile_song(
    image: &mut MemoryImage,
    settings: &ConvertSettings,
    profile: &GameProfile,
) -> Result<DecompiledSong, ConvertError> {
    let overrides = &settings.addresses;

    let (instrument_table, note_length_table, song_addr) = {
        let scanner = Scanner::new(image, profile);

        let instrument_table = required(
            overrides.instrument_table.or_else(|| scanner.instrument_table()),
            TableKind::InstrumentTable,
        )?;
        let note_length_table = required(
            match overrides.note_length_table {
                Some(a) => Some(NoteLengthTableAddresses::contiguous(a)),
                None => scanner.note_length_table(),
            },
            TableKind::NoteLengthTable,
        )?;
        let song_addr = song_tracker_address(image, overrides, &scanner)?;

        (instrument_table, note_length_table, song_addr)
    };

    let mut tracker = Tracker::decode(image, song_addr, profile)?;

    amplify(&mut tracker, settings.amplify)?;

    if let Some(reference) = settings.echo_reference {
        let main_volume = MainVolume::read(image)?;
        normalize_echo_volume(&mut tracker, main_volume, reference);
    }

    let perc_base = tracker.perc_base();
    let used_instruments = tracker.used_instruments(perc_base);
    let used = used_instruments.all();

    let instruments = InstrumentTable::extract(image, instrument_table, used.iter().copied())?;

    // The optimised driver stores instrument n's sample in sample slot n
    let samples = SampleTable::extract(
        image,
        sample_directory_addr(image)?,
        Some(&used),
        profile.sample_identity,
    )?;

    let note_parameters = NoteParameterTables::read(image, note_length_table)?;

    Ok(DecompiledSong {
        tracker,
        perc_base,
        used_instruments,
        instruments,
        samples,
        note_parameters,
    })
}

pub fn convert_spc(
    image: &mut MemoryImage,
    settings: &ConvertSettings,
    profile: &GameProfile,
) -> Result<ConvertedSong, ConvertError> {
    let song = decompile_song(image, settings, profile)?;

    let asm = AsarExporter::generate_asm_file(&song, settings, profile)?;

    let samples = match settings.sample_output {
        SampleOutput::IncbinLabel => exported_samples(&song.samples, false),
        SampleOutput::IncbinHash => exported_samples(&song.samples, true),
        SampleOutput::Inline => Vec::new(),
    };

    Ok(ConvertedSong { asm, samples })
}

/// Exports every sample in the sample directory, up to the first unused entry
pub fn export_all_samples(
    image: &MemoryImage,
    profile: &GameProfile,
) -> Result<Vec<ExportedSample>, ConvertError> {
    let samples = SampleTable::extract(
        image,
        sample_directory_addr(image)?,
        None,
        profile.sample_identity,
    )?;

    Ok(exported_samples(&samples, false))
}
