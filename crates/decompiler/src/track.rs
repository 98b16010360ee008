//! Voice track and subsection decoder

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::opcodes;
use crate::errors::DecodeError;
use crate::memory::MemoryImage;
use crate::normalize::mirror_panning_bias;
use crate::profiles::GameProfile;
use crate::time::TickCounter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `parameters` is the optional ring-length/volume byte
    NoteLength {
        length: u8,
        parameters: Option<u8>,
    },
    /// Note index, `0` is `c2`
    Note(u8),
    Tie,
    Rest,
    /// Instrument offset from the percussion base
    PercussionNote(u8),
    CallSubsection {
        subsection: Box<Track>,
        repetitions: u8,
    },
    Extended {
        opcode: u8,
        arguments: Vec<u8>,
    },
}

impl Command {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::NoteLength { length, .. } => *length,
            Self::Note(n) => opcodes::FIRST_NOTE + n,
            Self::Tie => opcodes::TIE,
            Self::Rest => opcodes::REST,
            Self::PercussionNote(p) => opcodes::FIRST_PERCUSSION_NOTE + p,
            Self::CallSubsection { .. } => opcodes::CALL_SUBSECTION,
            Self::Extended { opcode, .. } => *opcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub label: String,
    pub commands: Vec<Command>,

    /// Sum of the note lengths of every note, tie, rest and repeated subsection
    pub duration: TickCounter,

    /// Active note length at the end of the track
    pub note_length: u8,

    pub is_subsection: bool,
}

/// Decoder state for a single track
struct TrackDecoder<'a> {
    profile: &'a GameProfile,
    ceiling: Option<TickCounter>,
    track: Track,
}

impl TrackDecoder<'_> {
    fn ceiling_reached(&self) -> bool {
        match self.ceiling {
            Some(c) => self.track.duration >= c,
            None => false,
        }
    }

    fn read_extended_command(
        &self,
        image: &mut MemoryImage,
        opcode: u8,
        addr: usize,
    ) -> Result<Command, DecodeError> {
        let length = match self.profile.command_length(opcode) {
            Some(l) => l,
            None => return Err(DecodeError::UnknownCommand { opcode, addr }),
        };
        let mut arguments = image.read(length.into())?.to_vec();

        if self.profile.mirror_panning {
            let pan_arg = match opcode {
                opcodes::PAN => arguments.get_mut(0),
                opcodes::DYNAMIC_PAN => arguments.get_mut(1),
                _ => None,
            };
            if let Some(p) = pan_arg {
                *p = mirror_panning_bias(*p);
            }
        }

        Ok(Command::Extended { opcode, arguments })
    }

    fn push_note(&mut self, c: Command) {
        self.track.duration += self.track.note_length.into();
        self.track.commands.push(c);
    }

    /// Pitch slides after the last note of a voice are part of the note
    fn absorb_pitch_slides(&mut self, image: &mut MemoryImage) -> Result<(), DecodeError> {
        while matches!(image.peek_u8(), Ok(opcodes::PITCH_SLIDE)) {
            let addr = image.tell();
            image.read_u8()?;
            let c = self.read_extended_command(image, opcodes::PITCH_SLIDE, addr)?;
            self.track.commands.push(c);
        }
        Ok(())
    }

    fn decode(mut self, image: &mut MemoryImage) -> Result<Track, DecodeError> {
        loop {
            let addr = image.tell();
            let opcode = image.read_u8()?;

            match opcode {
                opcodes::END => break,

                0x01..=0x7f => {
                    self.track.note_length = opcode;

                    let parameters = match image.peek_u8()? {
                        p @ 0..=0x7f => {
                            image.read_u8()?;
                            Some(p)
                        }
                        _ => None,
                    };
                    self.track.commands.push(Command::NoteLength {
                        length: opcode,
                        parameters,
                    });
                }

                opcodes::FIRST_NOTE..=0xdf => {
                    let c = match opcode {
                        opcodes::TIE => Command::Tie,
                        opcodes::REST => Command::Rest,
                        o if o < opcodes::TIE => Command::Note(o - opcodes::FIRST_NOTE),
                        o => Command::PercussionNote(o - opcodes::FIRST_PERCUSSION_NOTE),
                    };
                    self.push_note(c);

                    if self.ceiling_reached() {
                        self.absorb_pitch_slides(image)?;
                        break;
                    }
                }

                opcodes::CALL_SUBSECTION => {
                    if self.track.is_subsection {
                        return Err(DecodeError::NestedSubsection { addr });
                    }

                    let target = image.read_u16()?;
                    let repetitions = image.read_u8()?;

                    let subsection = Track::decode_subsection(
                        image,
                        target,
                        self.track.note_length,
                        self.profile,
                    )?;

                    if repetitions > 0 {
                        self.track.note_length = subsection.note_length;
                        self.track.duration += subsection.duration * u32::from(repetitions);
                    }

                    self.track.commands.push(Command::CallSubsection {
                        subsection: Box::new(subsection),
                        repetitions,
                    });

                    if self.ceiling_reached() {
                        break;
                    }
                }

                _ => {
                    let c = self.read_extended_command(image, opcode, addr)?;
                    self.track.commands.push(c);
                }
            }
        }

        Ok(self.track)
    }
}

impl Track {
    fn new(label: String, note_length: u8, is_subsection: bool) -> Self {
        Self {
            label,
            commands: Vec::new(),
            duration: TickCounter::default(),
            note_length,
            is_subsection,
        }
    }

    fn decode(
        image: &mut MemoryImage,
        addr: u16,
        track: Track,
        ceiling: Option<TickCounter>,
        profile: &GameProfile,
    ) -> Result<Track, DecodeError> {
        image.preserve_cursor(|image| {
            image.seek(addr.into());

            TrackDecoder {
                profile,
                ceiling,
                track,
            }
            .decode(image)
        })
    }

    /// Decodes a voice track.
    ///
    /// If `ceiling` is set, decoding stops once the duration reaches `ceiling`.
    pub fn decode_voice(
        image: &mut MemoryImage,
        addr: u16,
        label: String,
        ceiling: Option<TickCounter>,
        profile: &GameProfile,
    ) -> Result<Track, DecodeError> {
        Self::decode(image, addr, Track::new(label, 0, false), ceiling, profile)
    }

    fn decode_subsection(
        image: &mut MemoryImage,
        addr: u16,
        note_length: u8,
        profile: &GameProfile,
    ) -> Result<Track, DecodeError> {
        let label = format!(".sub{addr:04X}");
        Self::decode(image, addr, Track::new(label, note_length, true), None, profile)
    }

    /// Structural equality, ignoring the label
    pub fn has_same_commands(&self, other: &Track) -> bool {
        self.commands == other.commands
    }

    /// Subsections called by this track, in call order (may contain duplicates)
    pub fn subsections(&self) -> impl Iterator<Item = &Track> {
        self.commands.iter().filter_map(|c| match c {
            Command::CallSubsection { subsection, .. } => Some(subsection.as_ref()),
            _ => None,
        })
    }

    /// Calls `f` on every command of this track and the subsections it calls
    pub fn visit_commands(&self, f: &mut impl FnMut(&Command)) {
        for c in &self.commands {
            f(c);
            if let Command::CallSubsection { subsection, .. } = c {
                subsection.visit_commands(f);
            }
        }
    }

    pub fn visit_commands_mut(&mut self, f: &mut impl FnMut(&mut Command)) {
        for c in &mut self.commands {
            f(c);
            if let Command::CallSubsection { subsection, .. } = c {
                subsection.visit_commands_mut(f);
            }
        }
    }
}
