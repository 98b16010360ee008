//! nspc2asm binary

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use clap::{Args, Parser, Subcommand};
use decompiler::errors::ConvertError;
use decompiler::{
    AddressOverrides, AsarExporter, ConvertSettings, ExportedSample, Exporter, GameProfile,
    MemoryImage, SampleOutput, BUILTIN_GAMES,
};
use rayon::prelude::*;
use walkdir::WalkDir;

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

macro_rules! error {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit(1);
    }};
}

#[derive(Parser)]
#[command(author, version)]
#[command(about = "Converts N-SPC SPC files to asar source code")]
#[command(arg_required_else_help = true)]
struct ArgParser {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the playing song of an SPC file
    Asm(AsmArgs),

    /// Convert every SPC file in a directory
    Bulk(BulkArgs),

    /// Export every BRR sample of an SPC file
    Samples(SamplesArgs),

    /// Write the command and note defines file
    Defines(DefinesArgs),
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let hex = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);

    u16::from_str_radix(hex, 16).map_err(|e| format!("invalid hex address: {e}"))
}

fn parse_hex_u8(s: &str) -> Result<u8, String> {
    match parse_hex_u16(s)? {
        v @ 0..=0xff => Ok(v as u8),
        _ => Err("value must be <= $FF".to_owned()),
    }
}

// Game Profile
// ============

#[derive(Args)]
struct ProfileArgs {
    #[arg(
        long,
        default_value = "common",
        value_parser = clap::builder::PossibleValuesParser::new(BUILTIN_GAMES),
        help = "game to autodetect the driver tables"
    )]
    game: String,

    #[arg(
        long,
        value_name = "JSON_FILE",
        conflicts_with = "game",
        help = "game profile json file"
    )]
    profile: Option<PathBuf>,
}

fn load_profile(args: &ProfileArgs) -> GameProfile {
    match &args.profile {
        Some(path) => match decompiler::load_profile_file(path) {
            Ok(p) => p,
            Err(e) => error!("{}", e),
        },
        None => match GameProfile::builtin(&args.game) {
            Ok(p) => p,
            Err(e) => error!("{}", e),
        },
    }
}

// Output settings
// ===============

#[derive(Args)]
struct OutputArgs {
    #[arg(
        long,
        value_name = "PATH",
        default_value = "defines.asm",
        help = "defines file path (relative to the asm file)"
    )]
    defines: String,

    #[arg(long, help = "write the samples next to the asm file")]
    export_samples: bool,

    #[arg(long, default_value_t = 1.0, help = "amplify volume by a multiplier")]
    amplify: f64,
}

impl OutputArgs {
    fn settings(&self, addresses: AddressOverrides) -> ConvertSettings {
        ConvertSettings {
            addresses,
            defines_path: self.defines.clone(),
            sample_output: if self.export_samples {
                SampleOutput::IncbinHash
            } else {
                SampleOutput::Inline
            },
            amplify: self.amplify,
            ..Default::default()
        }
    }
}

enum FileError {
    Read(PathBuf, io::Error),
    Write(PathBuf, io::Error),
    Convert(ConvertError),
}

impl Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(p, e) => write!(f, "cannot read {}: {}", p.display(), e),
            Self::Write(p, e) => write!(f, "cannot write {}: {}", p.display(), e),
            Self::Convert(e) => e.fmt(f),
        }
    }
}

impl From<ConvertError> for FileError {
    fn from(e: ConvertError) -> Self {
        Self::Convert(e)
    }
}

fn load_image(path: &Path) -> Result<MemoryImage, FileError> {
    decompiler::load_spc_file(path).map_err(|e| FileError::Read(path.to_owned(), e))
}

fn write_file(path: &Path, data: impl AsRef<[u8]>) -> Result<(), FileError> {
    fs::write(path, data).map_err(|e| FileError::Write(path.to_owned(), e))
}

fn write_samples(dir: &Path, samples: &[ExportedSample]) -> Result<(), FileError> {
    for s in samples {
        write_file(&dir.join(&s.file_name), &s.data)?;
    }
    Ok(())
}

fn convert_file(
    spc_path: &Path,
    asm_path: &Path,
    settings: &ConvertSettings,
    profile: &GameProfile,
) -> Result<(), FileError> {
    let mut image = load_image(spc_path)?;

    let song = decompiler::convert_spc(&mut image, settings, profile)?;

    write_file(asm_path, &song.asm)?;

    let dir = asm_path.parent().unwrap_or(Path::new(""));
    write_samples(dir, &song.samples)?;

    tracing::info!(
        "{} -> {} ({} samples)",
        spc_path.display(),
        asm_path.display(),
        song.samples.len()
    );

    Ok(())
}

// Single file
// ===========

#[derive(Args)]
struct AsmArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(long, value_name = "HEX", value_parser = parse_hex_u16, help = "instrument table address")]
    p_instr_table: Option<u16>,

    #[arg(long, value_name = "HEX", value_parser = parse_hex_u16, help = "tracker pointers address")]
    p_track_pointers: Option<u16>,

    #[arg(long, value_name = "HEX", value_parser = parse_hex_u16, help = "note length table address")]
    p_note_length_table: Option<u16>,

    #[arg(long, value_name = "HEX", value_parser = parse_hex_u8, help = "song index")]
    i_track: Option<u8>,

    #[arg(long, value_name = "HEX", value_parser = parse_hex_u16, help = "song tracker address")]
    p_track: Option<u16>,

    #[command(flatten)]
    output: OutputArgs,

    #[arg(value_name = "SPC", help = "input SPC file")]
    spc: PathBuf,

    #[arg(value_name = "ASM", help = "output asm file")]
    asm: PathBuf,
}

fn convert_single_file(args: AsmArgs) {
    let profile = load_profile(&args.profile);

    let addresses = AddressOverrides {
        instrument_table: args.p_instr_table,
        tracker_pointers: args.p_track_pointers,
        note_length_table: args.p_note_length_table,
        track_index: args.i_track,
        song: args.p_track,
    };
    let settings = args.output.settings(addresses);

    if let Err(e) = convert_file(&args.spc, &args.asm, &settings, &profile) {
        error!("Unable to convert {}: {}", args.spc.display(), e);
    }
}

// Bulk
// ====

#[derive(Args)]
struct BulkArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[arg(value_name = "SPC_DIR", help = "directory of SPC files")]
    spc_dir: PathBuf,

    #[arg(value_name = "ASM_DIR", help = "output directory")]
    asm_dir: PathBuf,
}

fn spc_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("spc"))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

fn convert_directory(args: BulkArgs) {
    let profile = load_profile(&args.profile);
    let settings = args.output.settings(AddressOverrides::default());

    if let Err(e) = fs::create_dir_all(&args.asm_dir) {
        error!("Cannot create {}: {}", args.asm_dir.display(), e);
    }

    let files = spc_files(&args.spc_dir);

    let results: Vec<(&PathBuf, Result<(), FileError>)> = files
        .par_iter()
        .map(|spc| {
            let asm = args.asm_dir.join(spc.with_extension("asm").file_name().unwrap_or_default());
            (spc, convert_file(spc, &asm, &settings, &profile))
        })
        .collect();

    let mut n_failed = 0;
    for (spc, r) in &results {
        if let Err(e) = r {
            let name = spc.file_name().unwrap_or_default().to_string_lossy();
            eprintln!("Unable to convert {}: {}", name, e);
            n_failed += 1;
        }
    }

    tracing::info!(
        "converted {} of {} SPC files",
        results.len() - n_failed,
        results.len()
    );
}

// Samples
// =======

#[derive(Args)]
struct SamplesArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(value_name = "SPC", help = "input SPC file")]
    spc: PathBuf,

    #[arg(value_name = "DIR", help = "output directory")]
    dir: PathBuf,
}

fn export_samples(args: SamplesArgs) {
    let profile = load_profile(&args.profile);

    let image = match load_image(&args.spc) {
        Ok(i) => i,
        Err(e) => error!("{}", e),
    };

    let samples = match decompiler::export_all_samples(&image, &profile) {
        Ok(s) => s,
        Err(e) => error!("Unable to export samples from {}: {}", args.spc.display(), e),
    };

    if let Err(e) = fs::create_dir_all(&args.dir) {
        error!("Cannot create {}: {}", args.dir.display(), e);
    }
    if let Err(e) = write_samples(&args.dir, &samples) {
        error!("{}", e);
    }

    tracing::info!("exported {} samples", samples.len());
}

// Defines
// =======

#[derive(Args)]
struct DefinesArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(value_name = "OUTPUT", help = "output defines file")]
    output: PathBuf,
}

fn write_defines(args: DefinesArgs) {
    let profile = load_profile(&args.profile);

    let text = match AsarExporter::generate_defines_file(&profile) {
        Ok(t) => t,
        Err(e) => error!("Cannot generate defines file: {}", e),
    };

    if let Err(e) = write_file(&args.output, text) {
        error!("{}", e);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = ArgParser::parse();

    match args.command {
        Command::Asm(c) => convert_single_file(c),
        Command::Bulk(c) => convert_directory(c),
        Command::Samples(c) => export_samples(c),
        Command::Defines(c) => write_defines(c),
    }
}
