//! asar asm file generator

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use super::{sample_include_path, Exporter, SampleOutput};

use crate::convert::{ConvertSettings, DecompiledSong};
use crate::driver_constants::{opcodes, tracker_commands, FIRST_INSTRUMENT_SLOT};
use crate::notes::{note_define, N_NOTES};
use crate::profiles::GameProfile;
use crate::samples::SampleTable;
use crate::track::{Command, Track};
use crate::tracker::{Tracker, TrackerCommand};

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

const INLINE_BYTES_PER_LINE: usize = 16;

const FALLBACK_LOOP_NAME: &str = "!loop";

pub struct AsarExporter;

/// Values needed to write the instrument arguments of a track
struct TrackContext<'a> {
    profile: &'a GameProfile,
    perc_base: u8,
    first_percussion: Option<u8>,
}

impl TrackContext<'_> {
    fn percussion_instrument(&self, offset: u8) -> u8 {
        offset.wrapping_add(self.perc_base)
    }
}

fn write_hex_bytes(out: &mut String, data: &[u8]) -> std::fmt::Result {
    for (i, b) in data.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, "${b:02X}")?;
    }
    Ok(())
}

#[rustfmt::skip::macros(writeln)]
fn write_instruments(out: &mut String, song: &DecompiledSong) -> std::fmt::Result {
    let used = song.used_instruments.all();

    for (instrument, slot) in used.iter().zip(FIRST_INSTRUMENT_SLOT..) {
        writeln!(out, "!instr{instrument:02X} = ${slot:02X}")?;
    }
    writeln!(out)?;

    writeln!(out, "spcblock 6*${FIRST_INSTRUMENT_SLOT:02X}+!p_instrumentTable nspc ; instruments")?;
    for inst in song.instruments.instruments() {
        if !used.contains(&inst.sample()) {
            tracing::warn!(
                "instrument ${:02X} uses sample ${:02X}, which has no instrument define",
                inst.index,
                inst.sample()
            );
        }
        write!(out, "  db !instr{:02X},", inst.sample())?;
        write_hex_bytes(out, &inst.data[1..])?;
        writeln!(out)?;
    }
    writeln!(out, "endspcblock")?;
    writeln!(out)?;

    Ok(())
}

#[rustfmt::skip::macros(writeln)]
fn write_sample_table(out: &mut String, samples: &SampleTable) -> std::fmt::Result {
    writeln!(out, "spcblock 4*${FIRST_INSTRUMENT_SLOT:02X}+!p_sampleTable nspc ; sample table")?;
    for s in samples.slots() {
        writeln!(out, "  dw {0},{0}+{1}", s.label, s.descriptor.loop_offset())?;
    }
    writeln!(out, "endspcblock")?;
    writeln!(out)?;

    Ok(())
}

#[rustfmt::skip::macros(writeln)]
fn write_note_length_table(out: &mut String, song: &DecompiledSong) -> std::fmt::Result {
    let t = &song.note_parameters;
    if t.is_standard() {
        return Ok(());
    }

    writeln!(out, "spcblock !p_noteLengthTable nspc ; note length table")?;
    out.push_str("  db ");
    write_hex_bytes(out, &t.ring_lengths)?;
    out.push_str("\n  db ");
    write_hex_bytes(out, &t.volumes)?;
    writeln!(out)?;
    writeln!(out, "endspcblock")?;
    writeln!(out)?;

    Ok(())
}

fn write_sample_data(
    out: &mut String,
    samples: &SampleTable,
    settings: &ConvertSettings,
) -> std::fmt::Result {
    for s in samples.samples() {
        match settings.sample_output {
            SampleOutput::IncbinLabel | SampleOutput::IncbinHash => {
                let by_hash = settings.sample_output == SampleOutput::IncbinHash;
                let path = sample_include_path(&settings.sample_directory, s, by_hash);

                writeln!(out, "  {}: incbin \"{}\"", s.label, path)?;
            }
            SampleOutput::Inline => {
                writeln!(out, "  {}:", s.label)?;
                for row in s.brr.brr_data().chunks(INLINE_BYTES_PER_LINE) {
                    out.push_str("  db ");
                    write_hex_bytes(out, row)?;
                    writeln!(out)?;
                }
            }
        }
    }
    writeln!(out)
}

/// Returns the anonymous label of each jump target.
///
/// Every target gets a different number of dashes so a jump can never resolve to a
/// closer target.
fn jump_target_labels(tracker: &Tracker) -> BTreeMap<usize, String> {
    tracker
        .jump_targets()
        .into_iter()
        .enumerate()
        .map(|(i, target)| (target, "-".repeat(i + 1)))
        .collect()
}

fn write_tracker(out: &mut String, tracker: &Tracker) -> std::fmt::Result {
    let labels = jump_target_labels(tracker);

    writeln!(out, "{}:", tracker.label)?;

    for (i, c) in tracker.commands.iter().enumerate() {
        if let Some(l) = labels.get(&i) {
            writeln!(out, "{l}")?;
        }
        match c {
            TrackerCommand::PlayPattern(p) => {
                writeln!(out, "  dw {}", tracker.patterns[*p].label)?;
            }
            TrackerCommand::Jump { command, target } => {
                let l = labels.get(target).map_or("-", String::as_str);
                writeln!(out, "  dw ${command:04X},{l}")?;
            }
        }
    }

    let loops = matches!(
        tracker.commands.last(),
        Some(TrackerCommand::Jump { command, .. })
            if u16::from(*command) >= tracker_commands::UNCONDITIONAL_JUMP
    );
    if !loops {
        writeln!(out, "  dw $0000")?;
    }

    Ok(())
}

fn write_pattern_rows(out: &mut String, tracker: &Tracker) -> std::fmt::Result {
    for p in &tracker.patterns {
        write!(out, "{}: dw ", p.label)?;
        for (i, t) in p.tracks.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match t {
                Some(t) => out.push_str(&t.label),
                None => out.push('0'),
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_arguments(out: &mut String, args: &[u8]) -> std::fmt::Result {
    for a in args {
        write!(out, ",{a}")?;
    }
    Ok(())
}

fn write_extended_command(
    out: &mut String,
    opcode: u8,
    arguments: &[u8],
    ctx: &TrackContext,
) -> std::fmt::Result {
    let name = ctx.profile.command_name(opcode);

    match (opcode, arguments) {
        (opcodes::SET_INSTRUMENT, [i, rest @ ..]) => {
            let instrument = match *i {
                i if i >= opcodes::FIRST_PERCUSSION_NOTE => {
                    ctx.percussion_instrument(i - opcodes::FIRST_PERCUSSION_NOTE)
                }
                i => i,
            };
            write!(out, "  {},!instr{instrument:02X}", name.unwrap_or("db $E0"))?;
            write_arguments(out, rest)?;
        }
        (opcodes::PERCUSSION_BASE, [_, rest @ ..]) => match ctx.first_percussion {
            Some(first) => {
                write!(out, "  {},!instr{first:02X}", name.unwrap_or("db $FA"))?;
                write_arguments(out, rest)?;
            }
            // The percussion base is meaningless without percussion instruments
            None => return Ok(()),
        },
        _ => {
            match name {
                Some(n) => write!(out, "  {n}")?,
                None => write!(out, "  db ${opcode:02X}")?,
            }
            write_arguments(out, arguments)?;
        }
    }
    writeln!(out)
}

fn write_track(out: &mut String, track: &Track, end: bool, ctx: &TrackContext) -> std::fmt::Result {
    writeln!(out, "{}", track.label)?;

    for c in &track.commands {
        match c {
            Command::NoteLength { length, parameters } => {
                write!(out, "  db {length}")?;
                if let Some(p) = parameters {
                    write!(out, ",${p:02X}")?;
                }
                writeln!(out)?;
            }
            Command::Note(n) => writeln!(out, "  {}", note_define(*n))?,
            Command::Tie => writeln!(out, "  !tie")?,
            Command::Rest => writeln!(out, "  !rest")?,
            Command::PercussionNote(p) => match ctx.first_percussion {
                Some(first) => writeln!(
                    out,
                    "  %percNote(!instr{:02X}-!instr{first:02X})",
                    ctx.percussion_instrument(*p)
                )?,
                None => writeln!(out, "  %percNote(${p:02X})")?,
            },
            Command::CallSubsection {
                subsection,
                repetitions,
            } => {
                let name = ctx
                    .profile
                    .command_name(opcodes::CALL_SUBSECTION)
                    .unwrap_or(FALLBACK_LOOP_NAME);
                writeln!(out, "  {name} : dw {} : db {repetitions}", subsection.label)?;
            }
            Command::Extended { opcode, arguments } => {
                write_extended_command(out, *opcode, arguments, ctx)?;
            }
        }
    }

    if end {
        writeln!(out, "  !end")?;
    }
    Ok(())
}

fn write_tracks(out: &mut String, song: &DecompiledSong, ctx: &TrackContext) -> std::fmt::Result {
    let tracker = &song.tracker;

    // Only the first voice of a pattern needs a terminator, the other voices are cut
    // at the first voice's length.
    let first_voices: HashSet<&str> = tracker
        .patterns
        .iter()
        .filter_map(|p| p.first_voice())
        .map(|t| t.label.as_str())
        .collect();

    let mut written: HashSet<&str> = HashSet::new();

    for t in tracker.patterns.iter().flat_map(|p| p.voices()) {
        if written.insert(t.label.as_str()) {
            write_track(out, t, first_voices.contains(t.label.as_str()), ctx)?;
            writeln!(out)?;
        }
    }

    for s in tracker.subsections() {
        write_track(out, s, true, ctx)?;
        writeln!(out)?;
    }

    Ok(())
}

#[rustfmt::skip::macros(writeln)]
impl Exporter for AsarExporter {
    fn generate_defines_file(profile: &GameProfile) -> Result<String, std::fmt::Error> {
        let mut out = String::with_capacity(4096);

        for n in 0..N_NOTES {
            writeln!(out, "{} = \"db ${:02X}\"", note_define(n), opcodes::FIRST_NOTE + n)?;
        }
        writeln!(out)?;

        writeln!(out, "!end = \"db 0\"")?;
        writeln!(out, "!tie = \"db ${:02X}\"", opcodes::TIE)?;
        writeln!(out, "!rest = \"db ${:02X}\"", opcodes::REST)?;
        writeln!(out)?;

        writeln!(out, "macro percNote(instr)")?;
        writeln!(out, "  db <instr>+${:02X}", opcodes::FIRST_PERCUSSION_NOTE)?;
        writeln!(out, "endmacro")?;
        writeln!(out)?;

        for (opcode, name) in profile.command_defines() {
            writeln!(out, "{name} = \"db ${opcode:02X}\"")?;
        }
        writeln!(out)?;

        Ok(out)
    }

    fn generate_asm_file(
        song: &DecompiledSong,
        settings: &ConvertSettings,
        profile: &GameProfile,
    ) -> Result<String, std::fmt::Error> {
        let tracker = &song.tracker;

        let ctx = TrackContext {
            profile,
            perc_base: song.perc_base,
            first_percussion: song.used_instruments.first_percussion(),
        };

        let mut out = String::with_capacity(16 * 1024);

        writeln!(out, "asar 1.91")?;
        writeln!(out, "norom : org 0")?;
        writeln!(out, "incsrc \"{}\"", settings.defines_path)?;
        writeln!(out)?;

        write_instruments(&mut out, song)?;
        write_sample_table(&mut out, &song.samples)?;
        write_note_length_table(&mut out, song)?;

        writeln!(out, "spcblock $B210-($6E00-!p_sampleData) nspc ; sample data")?;
        write_sample_data(&mut out, &song.samples, settings)?;

        writeln!(out, "dw 0,0,0,0 ; padding for shared trackers")?;
        writeln!(out, "Trackers:")?;
        writeln!(out, "  dw {}", tracker.label)?;
        writeln!(out)?;

        write_tracker(&mut out, tracker)?;
        writeln!(out)?;

        write_pattern_rows(&mut out, tracker)?;
        writeln!(out)?;

        write_tracks(&mut out, song, &ctx)?;

        // Remove the blank line after the last track
        if out.ends_with("\n\n") {
            out.pop();
        }

        writeln!(out, "endspcblock")?;
        writeln!(out)?;
        writeln!(out, "spcblock !p_extra nspc")?;
        writeln!(out, "  dw Trackers-8 : db 0")?;
        writeln!(out, "endspcblock execute !p_spcEngine")?;

        Ok(out)
    }
}
