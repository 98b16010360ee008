// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::*;

use decompiler::export_all_samples;
use decompiler::instruments::InstrumentTable;
use decompiler::profiles::SampleIdentity;
use decompiler::samples::{sample_directory_addr, SampleTable};

const SAMPLE_A: u16 = 0x4000;
const SAMPLE_B: u16 = 0x4100;

fn directory_image(entries: &[(u16, u16)]) -> MemoryImage {
    let mut b = SpcBuilder::new();
    b.bytes(SAMPLE_A, &LOOPING_BRR_BLOCK);
    b.bytes(SAMPLE_B, &[0x01, 0, 0, 0, 0, 0, 0, 0, 0]);

    for (i, (start, loop_point)) in entries.iter().enumerate() {
        b.sample(i as u8, *start, *loop_point);
    }
    b.build()
}

#[test]
fn shared_samples_have_one_label() {
    let image = directory_image(&[
        (SAMPLE_A, SAMPLE_A),
        (SAMPLE_B, SAMPLE_B),
        (SAMPLE_A, SAMPLE_A),
        (SAMPLE_A, SAMPLE_A),
        (0xffff, 0xffff),
    ]);

    assert_eq!(sample_directory_addr(&image).unwrap(), SAMPLE_DIRECTORY);

    let t = SampleTable::extract(
        &image,
        SAMPLE_DIRECTORY,
        None,
        SampleIdentity::StartAndLoop,
    )
    .unwrap();

    let labels: Vec<&str> = t.slots().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Sample00_02_03", "Sample01", "Sample00_02_03", "Sample00_02_03"]
    );

    assert_eq!(t.samples().len(), 2);
    assert_eq!(t.samples()[0].start, SAMPLE_A);
    assert!(t.samples()[0].brr.is_looping());
    assert!(!t.samples()[1].brr.is_looping());
}

#[test]
fn leading_sentinels() {
    let image = directory_image(&[(0xffff, 0xffff), (0xffff, 0xffff), (SAMPLE_A, SAMPLE_A)]);

    let t = SampleTable::extract(
        &image,
        SAMPLE_DIRECTORY,
        None,
        SampleIdentity::StartAndLoop,
    )
    .unwrap();
    assert!(t.slots().is_empty());
    assert!(t.samples().is_empty());

    assert!(export_all_samples(&image, &common()).unwrap().is_empty());
}

#[test]
fn export_all_samples_by_label() {
    let image = directory_image(&[
        (SAMPLE_A, SAMPLE_A),
        (SAMPLE_B, SAMPLE_B),
        (SAMPLE_A, SAMPLE_A),
        (0xffff, 0xffff),
    ]);

    let samples = export_all_samples(&image, &common()).unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].file_name, "Sample00_02.brr");
    assert_eq!(samples[0].data, LOOPING_BRR_BLOCK);
    assert_eq!(samples[1].file_name, "Sample01.brr");
}

#[test]
fn instruments_are_in_ascending_order() {
    let mut b = SpcBuilder::new();
    b.instrument(0x02).instrument(0x10).instrument(0x07);
    let image = b.build();

    let t = InstrumentTable::extract(&image, INSTRUMENT_TABLE, [0x10, 0x02, 0x07]).unwrap();

    let indexes: Vec<u8> = t.instruments().iter().map(|i| i.index).collect();
    assert_eq!(indexes, [0x02, 0x07, 0x10]);
    assert_eq!(t.instruments()[1].data, [0x07, 0xff, 0xe0, 0xb8, 0x04, 0x00]);
    assert_eq!(t.instruments()[1].sample(), 0x07);
}
