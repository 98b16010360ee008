// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::*;

use decompiler::errors::NormalizeError;
use decompiler::normalize::{amplify, normalize_echo_volume, MainVolume};
use decompiler::track::Command;

fn one_voice_tracker(b: &mut SpcBuilder, track: &[u8]) -> Tracker {
    let addr = one_voice_song(b, track);
    decode_tracker(&mut b.build(), addr)
}

fn extended_commands(t: &Tracker) -> Vec<(u8, Vec<u8>)> {
    let mut out = Vec::new();
    t.visit_commands(&mut |c| {
        if let Command::Extended { opcode, arguments } = c {
            out.push((*opcode, arguments.clone()));
        }
    });
    out
}

#[test]
fn amplify_voice_volume() {
    let mut t = one_voice_tracker(
        &mut SpcBuilder::new(),
        &[0xe5, 0xc8, 0xed, 0x80, 0xee, 0x10, 0xc8, 0x10, 0x80, 0x00],
    );

    amplify(&mut t, 1.25).unwrap();

    assert_eq!(
        extended_commands(&t),
        [
            (0xe5, vec![0xc8]),
            (0xed, vec![160]),
            (0xee, vec![0x10, 250]),
        ]
    );
}

#[test]
fn amplify_overflow_leaves_the_tracker_unmodified() {
    let mut t = one_voice_tracker(
        &mut SpcBuilder::new(),
        &[0xed, 0x80, 0xee, 0x10, 0xc8, 0x10, 0x80, 0x00],
    );

    let r = amplify(&mut t, 1.3);
    assert!(matches!(
        r,
        Err(NormalizeError::VolumeOverflow {
            opcode: 0xee,
            value: 0xc8,
            ..
        })
    ));

    assert_eq!(
        extended_commands(&t),
        [(0xed, vec![0x80]), (0xee, vec![0x10, 0xc8])]
    );
}

#[test]
fn amplify_to_the_maximum_volume() {
    let mut t = one_voice_tracker(&mut SpcBuilder::new(), &[0xed, 0xcc, 0x10, 0x80, 0x00]);
    amplify(&mut t, 1.25).unwrap();
    assert_eq!(extended_commands(&t), [(0xed, vec![0xff])]);

    let mut t = one_voice_tracker(&mut SpcBuilder::new(), &[0xed, 0xcd, 0x10, 0x80, 0x00]);
    assert!(matches!(
        amplify(&mut t, 1.25),
        Err(NormalizeError::VolumeOverflow { value: 0xcd, .. })
    ));
    assert_eq!(extended_commands(&t), [(0xed, vec![0xcd])]);
}

#[test]
fn amplify_below_one_scales_music_volume() {
    let mut t = one_voice_tracker(
        &mut SpcBuilder::new(),
        &[0xe5, 0xc8, 0xe6, 0x10, 0x64, 0xed, 0x80, 0x10, 0x80, 0x00],
    );

    amplify(&mut t, 0.5).unwrap();

    assert_eq!(
        extended_commands(&t),
        [
            (0xe5, vec![100]),
            (0xe6, vec![0x10, 50]),
            (0xed, vec![0x80]),
        ]
    );
}

#[test]
fn amplify_subsections() {
    let mut b = SpcBuilder::new();
    b.bytes(0x3000, &[0xed, 0x40, 0x10, 0x80, 0x00]);
    let mut t = one_voice_tracker(&mut b, &[0xef, 0x00, 0x30, 0x02, 0x00]);

    amplify(&mut t, 2.0).unwrap();

    assert_eq!(extended_commands(&t), [(0xed, vec![0x80])]);
}

#[test]
fn amplify_by_zero_mutes_music_volume() {
    let mut t = one_voice_tracker(
        &mut SpcBuilder::new(),
        &[0xe5, 0xc8, 0xe6, 0x10, 0x64, 0xed, 0x80, 0x10, 0x80, 0x00],
    );

    amplify(&mut t, 0.0).unwrap();

    assert_eq!(
        extended_commands(&t),
        [(0xe5, vec![0]), (0xe6, vec![0x10, 0]), (0xed, vec![0x80])]
    );
}

#[test]
fn invalid_amplify_factor() {
    let mut t = one_voice_tracker(
        &mut SpcBuilder::new(),
        &[0xe5, 0xc8, 0x10, 0x80, 0x00],
    );

    for f in [-1.0, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            amplify(&mut t, f),
            Err(NormalizeError::InvalidAmplifyFactor(_))
        ));
    }
    assert_eq!(extended_commands(&t), [(0xe5, vec![0xc8])]);
}

#[test]
fn echo_volume() {
    let mut b = SpcBuilder::new();
    b.dsp(dsp_registers::MVOLL, 0x30).dsp(dsp_registers::MVOLR, 0x40);

    let addr = one_voice_song(&mut b, &[0xf5, 0x0f, 0x30, 0xf0, 0x10, 0x80, 0x00]);
    let mut image = b.build();
    let mut t = decode_tracker(&mut image, addr);

    let main_volume = MainVolume::read(&image).unwrap();
    assert_eq!(
        main_volume,
        MainVolume {
            left: 0x30,
            right: 0x40
        }
    );

    normalize_echo_volume(&mut t, main_volume, 0x60);

    assert_eq!(
        extended_commands(&t),
        [(0xf5, vec![0x0f, 0x60, (-24i8) as u8])]
    );
}
