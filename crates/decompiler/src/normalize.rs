//! Volume and panning normalisation

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{dsp_registers, opcodes};
use crate::errors::{MemoryError, NormalizeError};
use crate::memory::MemoryImage;
use crate::track::Command;
use crate::tracker::Tracker;

const MAX_PAN: u8 = 20;
const PAN_MASK: u8 = 0x1f;

/// Mirrors a pan bias around the centre, keeping the phase inversion flags
pub fn mirror_panning_bias(bias: u8) -> u8 {
    MAX_PAN.saturating_sub(bias & PAN_MASK) | (bias & !PAN_MASK)
}

/// Returns the index of the volume argument that `amplify()` scales
fn amplified_argument(opcode: u8, factor: f64) -> Option<usize> {
    if factor > 1.0 {
        match opcode {
            opcodes::VOLUME => Some(0),
            opcodes::DYNAMIC_VOLUME => Some(1),
            _ => None,
        }
    } else {
        match opcode {
            opcodes::MUSIC_VOLUME => Some(0),
            opcodes::DYNAMIC_MUSIC_VOLUME => Some(1),
            _ => None,
        }
    }
}

/// Scales the song volume by `factor`.
///
/// Factors above 1 scale the voice volume commands, factors in `0.0..1.0` scale the music
/// volume commands.  The tracker is unmodified if any volume overflows.
pub fn amplify(tracker: &mut Tracker, factor: f64) -> Result<(), NormalizeError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(NormalizeError::InvalidAmplifyFactor(factor));
    }
    if factor == 1.0 {
        return Ok(());
    }

    let mut error = None;
    tracker.visit_commands(&mut |c| {
        if let Command::Extended { opcode, arguments } = c {
            if let Some(&value) = amplified_argument(*opcode, factor).and_then(|i| arguments.get(i))
            {
                let scaled = (f64::from(value) * factor).round();
                if scaled > f64::from(u8::MAX) && error.is_none() {
                    error = Some(NormalizeError::VolumeOverflow {
                        opcode: *opcode,
                        value,
                        scaled,
                    });
                }
            }
        }
    });
    if let Some(e) = error {
        return Err(e);
    }

    tracker.visit_commands_mut(&mut |c| {
        if let Command::Extended { opcode, arguments } = c {
            if let Some(v) = amplified_argument(*opcode, factor).and_then(|i| arguments.get_mut(i))
            {
                *v = (f64::from(*v) * factor).round() as u8;
            }
        }
    });

    Ok(())
}

/// S-DSP main volume
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MainVolume {
    pub left: i8,
    pub right: i8,
}

impl MainVolume {
    pub fn read(image: &MemoryImage) -> Result<Self, MemoryError> {
        Ok(Self {
            left: image.dsp_register(dsp_registers::MVOLL)? as i8,
            right: image.dsp_register(dsp_registers::MVOLR)? as i8,
        })
    }
}

fn rescale_echo(value: &mut u8, main: i8, reference: u8) {
    if main != 0 {
        let v = f64::from(*value as i8) * f64::from(reference) / f64::from(main);
        *value = v.round().clamp(f64::from(i8::MIN), f64::from(i8::MAX)) as i8 as u8;
    }
}

/// Rescales the echo volume commands so the song sounds the same at the `reference` main volume
pub fn normalize_echo_volume(tracker: &mut Tracker, main_volume: MainVolume, reference: u8) {
    if main_volume.left == 0 || main_volume.right == 0 {
        tracing::debug!(
            "main volume {},{} is zero, echo volume is only partially normalised",
            main_volume.left,
            main_volume.right
        );
    }

    tracker.visit_commands_mut(&mut |c| {
        if let Command::Extended { opcode, arguments } = c {
            if matches!(*opcode, opcodes::ECHO | opcodes::DYNAMIC_ECHO) {
                if let [_, left, right, ..] = arguments.as_mut_slice() {
                    rescale_echo(left, main_volume.left, reference);
                    rescale_echo(right, main_volume.right, reference);
                }
            }
        }
    });
}
