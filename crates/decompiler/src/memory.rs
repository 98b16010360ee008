//! SPC memory image

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::errors::MemoryError;
use crate::signature::ByteSignature;

use std::fs;
use std::path::Path;

/// Size of the .spc file header.
/// Logical address 0 is at this offset in the file.
pub const HEADER_SIZE: usize = 0x100;

pub const AUDIO_RAM_SIZE: usize = 0x10000;

/// Logical address of the S-DSP register block (stored after Audio-RAM in a .spc file)
pub const DSP_REGISTERS_ADDR: usize = AUDIO_RAM_SIZE;
pub const N_DSP_REGISTERS: usize = 0x80;

pub const SPC_FILE_MAGIC: &[u8] = b"SNES-SPC700 Sound File Data";

/// Signature scans skip the zero page and the stack page.
pub const SCAN_START: usize = 0x100;

/// An SPC snapshot with a read cursor.
///
/// All addresses are logical addresses (the file offset minus `HEADER_SIZE`).
pub struct MemoryImage {
    data: Box<[u8]>,
    cursor: usize,
}

impl MemoryImage {
    pub fn new(data: Vec<u8>) -> Result<Self, MemoryError> {
        if data.len() < HEADER_SIZE + AUDIO_RAM_SIZE {
            return Err(MemoryError::ImageTooSmall(data.len()));
        }

        Ok(Self {
            data: data.into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Creates an image from a raw Audio-RAM dump and S-DSP registers (no .spc header).
    pub fn from_audio_ram(
        audio_ram: &[u8],
        dsp_registers: &[u8; N_DSP_REGISTERS],
    ) -> Result<Self, MemoryError> {
        if audio_ram.len() != AUDIO_RAM_SIZE {
            return Err(MemoryError::ImageTooSmall(audio_ram.len()));
        }

        let mut data = Vec::with_capacity(HEADER_SIZE + AUDIO_RAM_SIZE + N_DSP_REGISTERS);
        data.resize(HEADER_SIZE, 0);
        data.extend_from_slice(audio_ram);
        data.extend_from_slice(dsp_registers);

        Self::new(data)
    }

    pub fn has_spc_header(&self) -> bool {
        self.data.starts_with(SPC_FILE_MAGIC)
    }

    /// Number of bytes addressable from logical address 0
    pub fn logical_size(&self) -> usize {
        self.data.len() - HEADER_SIZE
    }

    pub fn audio_ram(&self) -> &[u8] {
        &self.data[HEADER_SIZE..HEADER_SIZE + AUDIO_RAM_SIZE]
    }

    pub fn tell(&self) -> usize {
        self.cursor
    }

    pub fn seek(&mut self, addr: usize) {
        self.cursor = addr;
    }

    pub fn slice(&self, addr: usize, size: usize) -> Result<&[u8], MemoryError> {
        let start = HEADER_SIZE + addr;
        match self.data.get(start..start + size) {
            Some(s) => Ok(s),
            None => Err(MemoryError::OutOfBounds { addr, size }),
        }
    }

    pub fn u8_at(&self, addr: usize) -> Result<u8, MemoryError> {
        Ok(self.slice(addr, 1)?[0])
    }

    pub fn u16_at(&self, addr: usize) -> Result<u16, MemoryError> {
        let s = self.slice(addr, 2)?;
        Ok(u16::from_le_bytes([s[0], s[1]]))
    }

    pub fn dsp_register(&self, register: u8) -> Result<u8, MemoryError> {
        self.u8_at(DSP_REGISTERS_ADDR + usize::from(register))
    }

    pub fn read(&mut self, size: usize) -> Result<&[u8], MemoryError> {
        let addr = self.cursor;
        let start = HEADER_SIZE + addr;

        match self.data.get(start..start + size) {
            Some(s) => {
                self.cursor += size;
                Ok(s)
            }
            None => Err(MemoryError::OutOfBounds { addr, size }),
        }
    }

    /// Reads a little endian unsigned integer of `size` bytes.
    pub fn read_int(&mut self, size: usize) -> Result<u32, MemoryError> {
        if !(1..=4).contains(&size) {
            return Err(MemoryError::InvalidIntSize(size));
        }

        let bytes = self.read(size)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0, |acc, &b| (acc << 8) | u32::from(b)))
    }

    pub fn read_u8(&mut self) -> Result<u8, MemoryError> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, MemoryError> {
        let b = self.read(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn peek_u8(&self) -> Result<u8, MemoryError> {
        self.u8_at(self.cursor)
    }

    /// Calls `f` and restores the cursor afterwards, even if `f` failed.
    pub fn preserve_cursor<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.cursor;
        let out = f(self);
        self.cursor = saved;
        out
    }

    /// Returns the first Audio-RAM byte run that matches `signature`.
    ///
    /// Candidate addresses are `SCAN_START..=AUDIO_RAM_SIZE - signature.len()`.
    /// The returned slice includes the bytes under the wildcards.
    pub fn scan(&self, signature: &ByteSignature) -> Option<(usize, &[u8])> {
        let len = signature.len();
        if len == 0 || len > AUDIO_RAM_SIZE - SCAN_START {
            return None;
        }

        self.audio_ram()[SCAN_START..]
            .windows(len)
            .position(|w| signature.matches(w))
            .map(|i| {
                let addr = SCAN_START + i;
                (addr, &self.audio_ram()[addr..addr + len])
            })
    }
}

pub fn load_spc_file(path: &Path) -> Result<MemoryImage, std::io::Error> {
    let data = fs::read(path)?;

    let image = MemoryImage::new(data)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    if !image.has_spc_header() {
        tracing::warn!("{} does not have an SPC file header", path.display());
    }

    Ok(image)
}
