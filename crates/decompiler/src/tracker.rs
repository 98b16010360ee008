//! Tracker and pattern decoder

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{opcodes, tracker_commands, N_VOICES};
use crate::errors::DecodeError;
use crate::memory::{MemoryImage, AUDIO_RAM_SIZE};
use crate::profiles::GameProfile;
use crate::time::TickCounter;
use crate::track::{Command, Track};

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub label: String,
    pub tracks: [Option<Track>; N_VOICES],
}

impl Pattern {
    /// Decodes the 8 voice pointers at `addr`.
    ///
    /// The first voice sets the length of the pattern, the other voices are cut at that length.
    pub fn decode(
        image: &mut MemoryImage,
        addr: u16,
        label: String,
        profile: &GameProfile,
    ) -> Result<Pattern, DecodeError> {
        let mut pointers = [0u16; N_VOICES];
        for (i, p) in pointers.iter_mut().enumerate() {
            *p = image.u16_at(usize::from(addr) + i * 2)?;
        }

        let mut tracks: [Option<Track>; N_VOICES] = Default::default();
        let mut ceiling: Option<TickCounter> = None;

        for (i, (&ptr, slot)) in pointers.iter().zip(tracks.iter_mut()).enumerate() {
            if ptr != 0 {
                let t = Track::decode_voice(image, ptr, format!("{label}_{i}"), ceiling, profile)?;
                if ceiling.is_none() {
                    ceiling = Some(t.duration);
                }
                *slot = Some(t);
            }
        }

        tracing::debug!("decoded {label} at ${addr:04X}");

        Ok(Pattern { label, tracks })
    }

    pub fn voices(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().flatten()
    }

    /// The voice that sets the length of the pattern
    pub fn first_voice(&self) -> Option<&Track> {
        self.voices().next()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    PlayPattern(usize),
    /// `target` is an index into the tracker commands
    Jump { command: u8, target: usize },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsedInstruments {
    pub melodic: BTreeSet<u8>,
    pub percussion: BTreeSet<u8>,
}

impl UsedInstruments {
    pub fn all(&self) -> BTreeSet<u8> {
        self.melodic.union(&self.percussion).copied().collect()
    }

    pub fn first_percussion(&self) -> Option<u8> {
        self.percussion.first().copied()
    }
}

#[derive(Debug, Clone)]
pub struct Tracker {
    pub label: String,
    pub commands: Vec<TrackerCommand>,
    pub patterns: Vec<Pattern>,
    pattern_addrs: HashMap<u16, usize>,
}

fn dedupe_voices(pattern: &mut Pattern, earlier: &[Pattern]) {
    for slot in pattern.tracks.iter_mut() {
        if let Some(track) = slot {
            let existing = earlier
                .iter()
                .flat_map(|p| p.voices())
                .find(|t| t.has_same_commands(track));

            if let Some(e) = existing {
                *track = e.clone();
            }
        }
    }
}

impl Tracker {
    pub fn decode(
        image: &mut MemoryImage,
        addr: u16,
        profile: &GameProfile,
    ) -> Result<Tracker, DecodeError> {
        image.preserve_cursor(|image| {
            image.seek(addr.into());

            let mut tracker = Tracker {
                label: format!("Tracker{addr:04X}"),
                commands: Vec::new(),
                patterns: Vec::new(),
                pattern_addrs: HashMap::new(),
            };

            // position => command index
            let mut visited: HashMap<usize, usize> = HashMap::new();

            loop {
                let pos = image.tell();
                if visited.contains_key(&pos) || pos + 2 > AUDIO_RAM_SIZE {
                    break;
                }
                visited.insert(pos, tracker.commands.len());

                let value = image.read_u16()?;

                if value == 0 {
                    break;
                } else if value < tracker_commands::FIRST_PATTERN_ADDR {
                    let target = image.read_u16()?;
                    let target_index = match visited.get(&usize::from(target)) {
                        Some(i) => *i,
                        None => {
                            return Err(DecodeError::UnresolvedTrackerJump { addr: pos, target })
                        }
                    };

                    tracker.commands.push(TrackerCommand::Jump {
                        command: value as u8,
                        target: target_index,
                    });

                    if value >= tracker_commands::STOP_DECODING_JUMP {
                        break;
                    }
                } else {
                    let index = match tracker.pattern_addrs.get(&value) {
                        Some(i) => *i,
                        None => tracker.add_pattern(image, value, profile)?,
                    };
                    tracker.commands.push(TrackerCommand::PlayPattern(index));
                }
            }

            Ok(tracker)
        })
    }

    fn add_pattern(
        &mut self,
        image: &mut MemoryImage,
        addr: u16,
        profile: &GameProfile,
    ) -> Result<usize, DecodeError> {
        let index = self.patterns.len();

        let mut pattern = Pattern::decode(image, addr, format!(".pattern{index}"), profile)?;
        dedupe_voices(&mut pattern, &self.patterns);

        self.patterns.push(pattern);
        self.pattern_addrs.insert(addr, index);

        Ok(index)
    }

    /// Indexes of the commands that are the target of a jump
    pub fn jump_targets(&self) -> BTreeSet<usize> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                TrackerCommand::Jump { target, .. } => Some(*target),
                TrackerCommand::PlayPattern(_) => None,
            })
            .collect()
    }

    /// Distinct subsections, in the order they are first called
    pub fn subsections(&self) -> Vec<&Track> {
        let mut out: Vec<&Track> = Vec::new();

        for t in self.patterns.iter().flat_map(|p| p.voices()) {
            for s in t.subsections() {
                if !out.iter().any(|o| o.label == s.label) {
                    out.push(s);
                }
            }
        }
        out
    }

    /// Every voice track followed by every distinct subsection
    pub fn tracks_and_subsections(&self) -> Vec<&Track> {
        let mut out: Vec<&Track> = self.patterns.iter().flat_map(|p| p.voices()).collect();
        out.extend(self.subsections());
        out
    }

    /// Argument of the last percussion base command (0 if there is none)
    pub fn perc_base(&self) -> u8 {
        let mut perc_base = 0;

        for t in self.tracks_and_subsections() {
            for c in &t.commands {
                if let Command::Extended { opcode, arguments } = c {
                    if *opcode == opcodes::PERCUSSION_BASE {
                        if let Some(a) = arguments.first() {
                            perc_base = *a;
                        }
                    }
                }
            }
        }
        perc_base
    }

    pub fn used_instruments(&self, perc_base: u8) -> UsedInstruments {
        let mut out = UsedInstruments::default();

        let perc_instrument = |offset: u8| offset.wrapping_add(perc_base);

        for t in self.tracks_and_subsections() {
            for c in &t.commands {
                match c {
                    Command::Extended { opcode, arguments } if *opcode == opcodes::SET_INSTRUMENT => {
                        if let Some(&i) = arguments.first() {
                            if i >= opcodes::FIRST_PERCUSSION_NOTE {
                                out.melodic
                                    .insert(perc_instrument(i - opcodes::FIRST_PERCUSSION_NOTE));
                            } else {
                                out.melodic.insert(i);
                            }
                        }
                    }
                    Command::PercussionNote(p) => {
                        out.percussion.insert(perc_instrument(*p));
                    }
                    _ => (),
                }
            }
        }
        out
    }

    /// Calls `f` on every command of every voice track and subsection call
    pub fn visit_commands(&self, f: &mut impl FnMut(&Command)) {
        for t in self.patterns.iter().flat_map(|p| p.voices()) {
            t.visit_commands(f);
        }
    }

    pub fn visit_commands_mut(&mut self, f: &mut impl FnMut(&mut Command)) {
        for t in self.patterns.iter_mut().flat_map(|p| p.tracks.iter_mut().flatten()) {
            t.visit_commands_mut(f);
        }
    }
}
