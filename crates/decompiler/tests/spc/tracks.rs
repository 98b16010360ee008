// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::*;

use decompiler::errors::DecodeError;
use decompiler::profiles::{GameProfile, Opcode};
use decompiler::time::TickCounter;
use decompiler::track::Command;

fn note_length(length: u8) -> Command {
    Command::NoteLength {
        length,
        parameters: None,
    }
}

#[test]
fn duration_is_the_sum_of_note_lengths() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x20, 0x80, 0xc8, 0x10, 0x7f, 0xc9, 0xca, 0x00])
        .build();

    let t = decode_voice(&mut image, 0x1000);

    assert_eq!(
        t.commands,
        [
            note_length(0x20),
            Command::Note(0),
            Command::Tie,
            Command::NoteLength {
                length: 0x10,
                parameters: Some(0x7f)
            },
            Command::Rest,
            Command::PercussionNote(0),
        ]
    );
    assert_eq!(t.duration, TickCounter::new(0x20 + 0x20 + 0x10 + 0x10));
    assert_eq!(t.note_length, 0x10);
    assert!(!t.is_subsection);
}

#[test]
fn zero_parameter_byte_is_read() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x10, 0x00, 0x80, 0x00])
        .build();

    let t = decode_voice(&mut image, 0x1000);

    assert_eq!(
        t.commands,
        [
            Command::NoteLength {
                length: 0x10,
                parameters: Some(0)
            },
            Command::Note(0),
        ]
    );
}

#[test]
fn subsection_repetitions() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x18, 0xef, 0x00, 0x11, 0x03, 0x80, 0x00])
        .bytes(0x1100, &[0x80, 0x0c, 0x81, 0x00])
        .build();

    let t = decode_voice(&mut image, 0x1000);

    let sub = t.subsections().next().unwrap();
    assert_eq!(sub.label, ".sub1100");
    assert!(sub.is_subsection);
    assert_eq!(sub.duration, TickCounter::new(0x18 + 0x0c));
    assert_eq!(sub.note_length, 0x0c);

    // The subsection's note length carries over to the calling track
    assert_eq!(t.duration, TickCounter::new(3 * (0x18 + 0x0c) + 0x0c));
    assert_eq!(t.note_length, 0x0c);
}

#[test]
fn subsection_with_zero_repetitions() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x18, 0xef, 0x00, 0x11, 0x00, 0x80, 0x00])
        .bytes(0x1100, &[0x0c, 0x81, 0x00])
        .build();

    let t = decode_voice(&mut image, 0x1000);

    assert!(matches!(
        t.commands[1],
        Command::CallSubsection { repetitions: 0, .. }
    ));
    assert_eq!(t.duration, TickCounter::new(0x18));
    assert_eq!(t.note_length, 0x18);
}

#[test]
fn nested_subsection() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x18, 0xef, 0x00, 0x11, 0x01, 0x00])
        .bytes(0x1100, &[0x80, 0xef, 0x00, 0x12, 0x01, 0x00])
        .build();

    let r = Track::decode_voice(&mut image, 0x1000, "voice".to_owned(), None, &common());

    assert!(matches!(
        r,
        Err(DecodeError::NestedSubsection { addr: 0x1101 })
    ));
}

#[test]
fn unknown_command() {
    let mut image = SpcBuilder::new()
        .bytes(0x1000, &[0x10, 0x80, 0xfb, 0x05, 0x00])
        .build();

    let r = Track::decode_voice(&mut image, 0x1000, "voice".to_owned(), None, &common());
    assert!(matches!(
        r,
        Err(DecodeError::UnknownCommand {
            opcode: 0xfb,
            addr: 0x1002
        })
    ));

    let profile = GameProfile {
        command_lengths: [(Opcode(0xfb), 1)].into(),
        ..GameProfile::default()
    };
    let t = Track::decode_voice(&mut image, 0x1000, "voice".to_owned(), None, &profile).unwrap();
    assert_eq!(
        t.commands.last(),
        Some(&Command::Extended {
            opcode: 0xfb,
            arguments: vec![0x05]
        })
    );
}

#[test]
fn ceiling_absorbs_trailing_pitch_slides() {
    let mut image = SpcBuilder::new()
        .bytes(
            0x1000,
            &[
                0x08, 0x80, 0x80, 0x80, 0x80, 0xf9, 1, 2, 3, 0xf9, 4, 5, 6, 0x80, 0x00,
            ],
        )
        .build();

    let t = Track::decode_voice(
        &mut image,
        0x1000,
        "voice".to_owned(),
        Some(TickCounter::new(0x20)),
        &common(),
    )
    .unwrap();

    assert_eq!(t.duration, TickCounter::new(0x20));
    assert_eq!(t.commands.len(), 7);
    assert_eq!(
        t.commands[6],
        Command::Extended {
            opcode: 0xf9,
            arguments: vec![4, 5, 6]
        }
    );
}

#[test]
fn mirrored_panning() {
    let mut b = SpcBuilder::new();
    b.bytes(0x1000, &[0xe1, 0x05, 0xe2, 0x10, 0x03, 0x00]);

    let mut image = b.build();
    let t = decode_voice(&mut image, 0x1000);
    assert_eq!(
        t.commands[0],
        Command::Extended {
            opcode: 0xe1,
            arguments: vec![0x05]
        }
    );

    let hal = GameProfile::builtin("hal").unwrap();
    let t = Track::decode_voice(&mut image, 0x1000, "voice".to_owned(), None, &hal).unwrap();
    assert_eq!(
        t.commands,
        [
            Command::Extended {
                opcode: 0xe1,
                arguments: vec![15]
            },
            Command::Extended {
                opcode: 0xe2,
                arguments: vec![0x10, 17]
            },
        ]
    );
}

#[test]
fn long_repeated_subsections() {
    const SUBSECTION: u16 = 0x1000;
    const VOICE: u16 = 0xf100;
    const N_TIES: u16 = 0xf000 - (SUBSECTION + 1);

    let mut b = SpcBuilder::new();

    let mut sub = vec![0x7f];
    sub.resize(usize::from(N_TIES) + 1, 0xc8);
    sub.push(0x00);
    b.bytes(SUBSECTION, &sub);

    let call = [0xef, 0x00, 0x10, 0xff];
    let mut voice = call.repeat(3);
    voice.push(0x00);
    b.bytes(VOICE, &voice);

    let t = decode_voice(&mut b.build(), VOICE);

    let sub_duration = 0x7f * u64::from(N_TIES);
    assert_eq!(
        t.subsections().next().unwrap().duration,
        TickCounter::new(sub_duration)
    );

    // Longer than u32::MAX ticks
    assert_eq!(t.duration, TickCounter::new(3 * 255 * sub_duration));
}
