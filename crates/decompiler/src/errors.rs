//! A single location for all of the errors in the decompiler

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use std::fmt::Display;
use std::io;

#[derive(Debug)]
pub enum MemoryError {
    ImageTooSmall(usize),
    OutOfBounds { addr: usize, size: usize },
    InvalidIntSize(usize),
}

#[derive(Debug)]
pub enum SignatureParseError {
    Empty,
    InvalidToken(String),
}

#[derive(Debug)]
pub enum DeserializeError {
    OpenError(String, io::Error),
    SerdeError(String, serde_json::error::Error),
}

#[derive(Debug)]
pub enum ProfileError {
    UnknownGame(String),
    InvalidOpcode(String),
}

#[derive(Debug)]
pub enum SampleError {
    MemoryError(MemoryError),
    UnterminatedSample {
        slot: u8,
        start: u16,
    },
    InvalidBrrData {
        slot: u8,
        start: u16,
        error: brr::ParseError,
    },
}

#[derive(Debug)]
pub enum DecodeError {
    MemoryError(MemoryError),

    NestedSubsection { addr: usize },
    UnknownCommand { opcode: u8, addr: usize },

    UnresolvedTrackerJump { addr: usize, target: u16 },
}

#[derive(Debug)]
pub enum NormalizeError {
    InvalidAmplifyFactor(f64),
    VolumeOverflow { opcode: u8, value: u8, scaled: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableKind {
    InstrumentTable,
    TrackerPointers,
    NoteLengthTable,
}

#[derive(Debug)]
pub enum ConvertError {
    MemoryError(MemoryError),
    AddressNotFound(TableKind),
    NoTrackIndex,
    DecodeError(DecodeError),
    SampleError(SampleError),
    NormalizeError(NormalizeError),
    FormatError(std::fmt::Error),
}

// From Traits
// ===========

impl From<MemoryError> for SampleError {
    fn from(e: MemoryError) -> Self {
        Self::MemoryError(e)
    }
}

impl From<MemoryError> for DecodeError {
    fn from(e: MemoryError) -> Self {
        Self::MemoryError(e)
    }
}

impl From<MemoryError> for ConvertError {
    fn from(e: MemoryError) -> Self {
        Self::MemoryError(e)
    }
}

impl From<DecodeError> for ConvertError {
    fn from(e: DecodeError) -> Self {
        Self::DecodeError(e)
    }
}

impl From<SampleError> for ConvertError {
    fn from(e: SampleError) -> Self {
        Self::SampleError(e)
    }
}

impl From<NormalizeError> for ConvertError {
    fn from(e: NormalizeError) -> Self {
        Self::NormalizeError(e)
    }
}

impl From<std::fmt::Error> for ConvertError {
    fn from(e: std::fmt::Error) -> Self {
        Self::FormatError(e)
    }
}

// Display
// =======

impl Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageTooSmall(size) => {
                write!(f, "memory image is too small ({size} bytes)")
            }
            Self::OutOfBounds { addr, size } => {
                write!(f, "cannot read {size} bytes at ${addr:04X}")
            }
            Self::InvalidIntSize(size) => write!(f, "cannot read a {size} byte integer"),
        }
    }
}

impl Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "signature is empty"),
            Self::InvalidToken(t) => write!(f, "invalid signature token: {t}"),
        }
    }
}

impl Display for DeserializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenError(filename, e) => write!(f, "Unable to open {}: {}", filename, e),
            Self::SerdeError(filename, e) => write!(f, "Unable to read {}: {}", filename, e),
        }
    }
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownGame(name) => write!(f, "unknown game profile: {name}"),
            Self::InvalidOpcode(s) => write!(f, "invalid opcode: {s}"),
        }
    }
}

impl Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryError(e) => e.fmt(f),
            Self::UnterminatedSample { slot, start } => {
                write!(f, "sample ${slot:02X} at ${start:04X} has no end block")
            }
            Self::InvalidBrrData { slot, start, error } => {
                write!(f, "sample ${slot:02X} at ${start:04X}: {error}")
            }
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryError(e) => e.fmt(f),
            Self::NestedSubsection { addr } => {
                write!(f, "subsections cannot be nested (${addr:04X})")
            }
            Self::UnknownCommand { opcode, addr } => {
                write!(f, "unknown command ${opcode:02X} at ${addr:04X}")
            }
            Self::UnresolvedTrackerJump { addr, target } => {
                write!(
                    f,
                    "tracker jump at ${addr:04X} to ${target:04X} does not target a previous command"
                )
            }
        }
    }
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmplifyFactor(factor) => write!(f, "invalid amplify factor: {factor}"),
            Self::VolumeOverflow {
                opcode,
                value,
                scaled,
            } => write!(
                f,
                "volume overflow in command ${opcode:02X}: {value} amplified to {scaled}"
            ),
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InstrumentTable => write!(f, "instrument table"),
            Self::TrackerPointers => write!(f, "tracker pointers"),
            Self::NoteLengthTable => write!(f, "note length table"),
        }
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryError(e) => e.fmt(f),
            Self::AddressNotFound(table) => write!(f, "cannot find {table} address"),
            Self::NoTrackIndex => write!(f, "no track index"),
            Self::DecodeError(e) => e.fmt(f),
            Self::SampleError(e) => e.fmt(f),
            Self::NormalizeError(e) => e.fmt(f),
            Self::FormatError(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for MemoryError {}
impl std::error::Error for DecodeError {}
impl std::error::Error for ConvertError {}
