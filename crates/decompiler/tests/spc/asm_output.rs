// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::*;

use decompiler::errors::{ConvertError, TableKind};
use decompiler::profiles::Opcode;
use decompiler::{convert_spc, AsarExporter, ConvertedSong, Exporter};

fn convert(b: &SpcBuilder, settings: &ConvertSettings) -> ConvertedSong {
    convert_spc(&mut b.build(), settings, &common()).unwrap()
}

#[test]
fn single_note_song() {
    let mut b = SpcBuilder::new();
    b.words(0x2000, &[0x0200, 0x0000])
        .words(0x0200, &[0x0300, 0, 0, 0, 0, 0, 0, 0])
        .bytes(0x0300, &[0x20, 0x80, 0x00]);

    let song = convert(&b, &settings(0x2000));

    assert!(song.samples.is_empty());
    assert_eq!(
        song.asm,
        r#"asar 1.91
norom : org 0
incsrc "defines.asm"


spcblock 6*$16+!p_instrumentTable nspc ; instruments
endspcblock

spcblock 4*$16+!p_sampleTable nspc ; sample table
endspcblock

spcblock $B210-($6E00-!p_sampleData) nspc ; sample data

dw 0,0,0,0 ; padding for shared trackers
Trackers:
  dw Tracker2000

Tracker2000:
  dw .pattern0
  dw $0000

.pattern0: dw .pattern0_0, 0, 0, 0, 0, 0, 0, 0

.pattern0_0
  db 32
  !c2
  !end
endspcblock

spcblock !p_extra nspc
  dw Trackers-8 : db 0
endspcblock execute !p_spcEngine
"#
    );
}

#[test]
fn instruments_and_percussion() {
    let mut b = SpcBuilder::new();
    for i in [0x05, 0x20, 0x21, 0x22] {
        b.instrument_and_sample(i);
    }
    let addr = one_voice_song(
        &mut b,
        &[
            0xfa, 0x20, 0xe0, 0x05, 0x10, 0x80, 0xe0, 0xcb, 0x81, 0xca, 0xcc, 0x00,
        ],
    );

    let song = convert(&b, &settings(addr));
    let asm = &song.asm;

    assert_contains_lines(
        asm,
        &[
            "!instr05 = $16",
            "!instr20 = $17",
            "!instr21 = $18",
            "!instr22 = $19",
        ],
    );
    assert_contains_lines(
        asm,
        &[
            "spcblock 6*$16+!p_instrumentTable nspc ; instruments",
            "  db !instr05,$FF,$E0,$B8,$04,$00",
            "  db !instr20,$FF,$E0,$B8,$04,$00",
            "  db !instr21,$FF,$E0,$B8,$04,$00",
            "  db !instr22,$FF,$E0,$B8,$04,$00",
            "endspcblock",
        ],
    );
    assert_contains_lines(
        asm,
        &[
            "spcblock 4*$16+!p_sampleTable nspc ; sample table",
            "  dw Sample05,Sample05+0",
            "  dw Sample20,Sample20+0",
            "  dw Sample21,Sample21+0",
            "  dw Sample22,Sample22+0",
            "endspcblock",
        ],
    );
    assert_contains_lines(
        asm,
        &[
            "spcblock $B210-($6E00-!p_sampleData) nspc ; sample data",
            "  Sample05: incbin \"Sample05.brr\"",
            "  Sample20: incbin \"Sample20.brr\"",
        ],
    );
    assert_contains_lines(
        asm,
        &[
            ".pattern0_0",
            "  !percBase,!instr20",
            "  !instr,!instr05",
            "  db 16",
            "  !c2",
            "  !instr,!instr21",
            "  !cs2",
            "  %percNote(!instr20-!instr20)",
            "  %percNote(!instr22-!instr20)",
            "  !end",
        ],
    );

    // Standard note length table
    assert!(!asm.contains("!p_noteLengthTable"));

    let files: Vec<&str> = song.samples.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(
        files,
        ["Sample05.brr", "Sample20.brr", "Sample21.brr", "Sample22.brr"]
    );
}

#[test]
fn percussion_base_without_percussion() {
    let mut b = SpcBuilder::new();
    b.instrument_and_sample(0x01);
    let addr = one_voice_song(&mut b, &[0xfa, 0x10, 0xe0, 0x01, 0x10, 0x80, 0x00]);

    let asm = convert(&b, &settings(addr)).asm;

    assert!(!asm.contains("!percBase"));
    assert_contains_lines(&asm, &[".pattern0_0", "  !instr,!instr01", "  db 16"]);
}

#[test]
fn commands_and_subsections() {
    let mut b = SpcBuilder::new();
    b.bytes(0x3000, &[0x0c, 0x81, 0xf9, 0x00, 0x04, 0x85, 0x00]);
    let addr = one_voice_song(
        &mut b,
        &[
            0x18, 0x42, 0xe1, 0x0a, 0xef, 0x00, 0x30, 0x03, 0xc8, 0xc9, 0xef, 0x00, 0x30, 0x01,
            0x00,
        ],
    );

    let asm = convert(&b, &settings(addr)).asm;

    assert_contains_lines(
        &asm,
        &[
            ".pattern0_0",
            "  db 24,$42",
            "  !pan,10",
            "  !loop : dw .sub3000 : db 3",
            "  !tie",
            "  !rest",
            "  !loop : dw .sub3000 : db 1",
            "  !end",
            "",
            ".sub3000",
            "  db 12",
            "  !cs2",
            "  !pitchSlide,0,4,133",
            "  !end",
            "endspcblock",
        ],
    );

    // Each subsection is written once
    assert_eq!(asm_lines(&asm).iter().filter(|l| **l == ".sub3000").count(), 1);
}

#[test]
fn unnamed_command() {
    let mut b = SpcBuilder::new();
    let addr = one_voice_song(&mut b, &[0x10, 0xfb, 0x05, 0x80, 0x00]);

    let profile = GameProfile {
        command_lengths: [(Opcode(0xfb), 1)].into(),
        ..GameProfile::default()
    };
    let asm = convert_spc(&mut b.build(), &settings(addr), &profile)
        .unwrap()
        .asm;

    assert_contains_lines(&asm, &["  db 16", "  db $FB,5", "  !c2"]);
}

#[test]
fn tracker_loop() {
    let mut b = SpcBuilder::new();
    b.words(0x2000, &[0x0300, 0x0310, 0x0082, 0x2002])
        .words(0x0300, &[0x0400, 0, 0, 0, 0, 0, 0, 0])
        .words(0x0310, &[0x0410, 0, 0, 0, 0, 0, 0, 0])
        .bytes(0x0400, &[0x10, 0x80, 0x00])
        .bytes(0x0410, &[0x10, 0x81, 0x00]);

    let asm = convert(&b, &settings(0x2000)).asm;

    assert_contains_lines(
        &asm,
        &[
            "Tracker2000:",
            "  dw .pattern0",
            "-",
            "  dw .pattern1",
            "  dw $0082,-",
            "",
            ".pattern0: dw .pattern0_0, 0, 0, 0, 0, 0, 0, 0",
            ".pattern1: dw .pattern1_0, 0, 0, 0, 0, 0, 0, 0",
            "",
        ],
    );
    assert!(!asm.contains("dw $0000"));
}

#[test]
fn shared_voice_is_written_once() {
    let mut b = SpcBuilder::new();
    b.words(0x2000, &[0x0300, 0x0310, 0])
        .words(0x0300, &[0x0400, 0x0410, 0, 0, 0, 0, 0, 0])
        .words(0x0310, &[0x0430, 0x0410, 0, 0, 0, 0, 0, 0])
        .bytes(0x0400, &[0x20, 0x80, 0x00])
        .bytes(0x0410, &[0x20, 0x84, 0x00])
        .bytes(0x0430, &[0x20, 0x87, 0x00]);

    let asm = convert(&b, &settings(0x2000)).asm;

    assert_contains_lines(
        &asm,
        &[".pattern1: dw .pattern1_0, .pattern0_1, 0, 0, 0, 0, 0, 0"],
    );
    assert_eq!(
        asm_lines(&asm)
            .iter()
            .filter(|l| **l == ".pattern0_1")
            .count(),
        1
    );

    // Only the first voice of a pattern needs a terminator
    assert_contains_lines(&asm, &[".pattern0_1", "  db 32", "  !e2", ""]);
    assert_contains_lines(&asm, &[".pattern1_0", "  db 32", "  !g2", "  !end"]);
}

#[test]
fn custom_note_length_table() {
    let mut b = SpcBuilder::new();
    b.bytes(NOTE_LENGTH_TABLE, &[0x32, 0x65, 0x7f, 0x98, 0xb2, 0xcb, 0xe5, 0xfc]);
    let addr = one_voice_song(&mut b, &[0x10, 0x80, 0x00]);

    let asm = convert(&b, &settings(addr)).asm;

    assert_contains_lines(
        &asm,
        &[
            "spcblock !p_noteLengthTable nspc ; note length table",
            "  db $32,$65,$7F,$98,$B2,$CB,$E5,$FC",
            "  db $19,$33,$4C,$66,$72,$7F,$8C,$99,$A5,$B2,$BF,$CC,$D8,$E5,$F2,$FC",
            "endspcblock",
            "",
            "spcblock $B210-($6E00-!p_sampleData) nspc ; sample data",
        ],
    );
}

#[test]
fn inline_and_hashed_samples() {
    let mut b = SpcBuilder::new();
    b.instrument_and_sample(0x03);
    let addr = one_voice_song(&mut b, &[0xe0, 0x03, 0x10, 0x80, 0x00]);

    let inline = ConvertSettings {
        sample_output: SampleOutput::Inline,
        ..settings(addr)
    };
    let song = convert(&b, &inline);
    assert!(song.samples.is_empty());
    assert_contains_lines(
        &song.asm,
        &["  Sample03:", "  db $B3,$12,$34,$56,$78,$9A,$BC,$DE,$F0", ""],
    );

    let hashed = ConvertSettings {
        sample_output: SampleOutput::IncbinHash,
        sample_directory: "samples".into(),
        ..settings(addr)
    };
    let song = convert(&b, &hashed);
    assert_eq!(song.samples.len(), 1);

    let file_name = &song.samples[0].file_name;
    assert!(file_name.starts_with("Sample_"));
    assert_eq!(song.samples[0].data, LOOPING_BRR_BLOCK);
    assert!(song
        .asm
        .contains(&format!("  Sample03: incbin \"samples/{file_name}\"")));
}

#[test]
fn missing_addresses() {
    let mut b = SpcBuilder::new();
    let addr = one_voice_song(&mut b, &[0x10, 0x80, 0x00]);

    let mut s = settings(addr);
    s.addresses.instrument_table = None;

    let r = convert_spc(&mut b.build(), &s, &common());
    assert!(matches!(
        r,
        Err(ConvertError::AddressNotFound(TableKind::InstrumentTable))
    ));
}

#[test]
fn defines_file() {
    let profile = GameProfile {
        command_names: [(Opcode(0xfb), "!customFb".to_owned())].into(),
        ..GameProfile::default()
    };
    let defines = AsarExporter::generate_defines_file(&profile).unwrap();

    let lines = asm_lines(&defines);
    assert_eq!(lines[0], "!c2 = \"db $80\"");
    assert_eq!(lines[71], "!b7 = \"db $C7\"");

    assert_contains_lines(
        &defines,
        &[
            "!end = \"db 0\"",
            "!tie = \"db $C8\"",
            "!rest = \"db $C9\"",
            "",
            "macro percNote(instr)",
            "  db <instr>+$CA",
            "endmacro",
        ],
    );
    assert_contains_lines(
        &defines,
        &[
            "!instr = \"db $E0\"",
            "!pan = \"db $E1\"",
        ],
    );
    assert_contains_lines(
        &defines,
        &[
            "!percBase = \"db $FA\"",
            "!customFb = \"db $FB\"",
        ],
    );
}
