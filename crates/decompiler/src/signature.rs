//! Byte signatures used to find driver tables

// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

use crate::errors::SignatureParseError;

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignatureToken {
    Byte(u8),
    Wildcard,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct ByteSignature(Vec<SignatureToken>);

/// Builds a `ByteSignature` from hex literals, `_` is a wildcard.
#[macro_export]
macro_rules! byte_signature {
    (@token _) => {
        $crate::signature::SignatureToken::Wildcard
    };
    (@token $b:literal) => {
        $crate::signature::SignatureToken::Byte($b)
    };
    ($($t:tt)+) => {
        $crate::signature::ByteSignature::from_tokens(vec![$($crate::byte_signature!(@token $t)),+])
    };
}

impl ByteSignature {
    pub fn from_tokens(tokens: Vec<SignatureToken>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[SignatureToken] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `bytes` must be the same length as the signature
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() == self.0.len()
            && self.0.iter().zip(bytes).all(|(t, &b)| match t {
                SignatureToken::Byte(v) => *v == b,
                SignatureToken::Wildcard => true,
            })
    }
}

impl FromStr for ByteSignature {
    type Err = SignatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split_ascii_whitespace()
            .map(|t| match t {
                "??" => Ok(SignatureToken::Wildcard),
                t if t.len() == 2 => match u8::from_str_radix(t, 16) {
                    Ok(b) => Ok(SignatureToken::Byte(b)),
                    Err(_) => Err(SignatureParseError::InvalidToken(t.to_owned())),
                },
                t => Err(SignatureParseError::InvalidToken(t.to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if tokens.is_empty() {
            return Err(SignatureParseError::Empty);
        }

        Ok(Self(tokens))
    }
}

impl TryFrom<String> for ByteSignature {
    type Error = SignatureParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for ByteSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match t {
                SignatureToken::Byte(b) => write!(f, "{b:02X}")?,
                SignatureToken::Wildcard => write!(f, "??")?,
            }
        }
        Ok(())
    }
}

/// The location of a 16 bit address inside a signature match
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressField {
    pub low_byte: usize,
    pub high_byte: usize,
    #[serde(default)]
    pub adjust: i32,
}

impl AddressField {
    pub const fn new(low_byte: usize, high_byte: usize, adjust: i32) -> Self {
        Self {
            low_byte,
            high_byte,
            adjust,
        }
    }

    pub fn read(&self, matched: &[u8]) -> Option<u16> {
        let lo = *matched.get(self.low_byte)?;
        let hi = *matched.get(self.high_byte)?;
        let addr = u16::from_le_bytes([lo, hi]);

        Some(addr.wrapping_add_signed((self.adjust & 0xffff) as i16))
    }
}

/// A signature that points to a single table
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AddressSignature {
    pub signature: ByteSignature,
    #[serde(flatten)]
    pub address: AddressField,
}

/// A signature that points to the note ring-length and note volume tables
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NoteLengthTableSignature {
    pub signature: ByteSignature,
    pub ring_length_table: AddressField,
    pub volume_table: AddressField,
}

// Standard signatures
// ===================

/// `mov y,#$06 : mul ya : movw pp,ya : clrc : adc pp,#lo : adc pp+1,#hi`
///
/// `pp` is usually `$14`, but not always
/// (KiKi KaiKai: Nazo no Kuro Mantle/Pocky and Rocky uses `$1C`).
pub fn instrument_table_signature() -> AddressSignature {
    AddressSignature {
        signature: byte_signature!(0x8D 0x06 0xCF 0xDA _ 0x60 0x98 _ _ 0x98 _ _),
        address: AddressField::new(7, 10, 0),
    }
}

/// `mov $04,a : asl a : mov x,a : mov a,pppp-1+x : mov y,a : mov a,pppp-2+x : movw $40,ya : mov $0C,#$02`
///
/// `pppp` is the tracker pointer table.  Some games move the `$04`, `$40` and `$0C` variables.
pub fn tracker_pointers_signature() -> AddressSignature {
    AddressSignature {
        signature: byte_signature!(0xC4 _ 0x1C 0x5D 0xF5 _ _ 0xFD 0xF5 _ _ 0xDA _ 0x8F 0x02 _),
        address: AddressField::new(5, 6, 1),
    }
}

/// `mov $04,a : asl a : mov y,a : mov a,pppp-1+y : push a : mov a,pppp-2+y : pop y : movw $40,ya`
///
/// Y-indexed variant of `tracker_pointers_signature()`.
pub fn alternate_tracker_pointers_signature() -> AddressSignature {
    AddressSignature {
        signature: byte_signature!(0xC4 _ 0x1C 0xFD 0xF6 _ _ 0x2D 0xF6 _ _ 0xEE 0xDA _),
        address: AddressField::new(5, 6, 1),
    }
}

/// `xcn a : and a,#$07 : mov y,a : mov a,rrrr+y : mov ssss+x,a : mov a,$pp : and a,#$0F : mov y,a : mov a,vvvv+y`
///
/// `rrrr` is the ring-length table and `vvvv` is the volume table.
pub fn note_length_table_signature() -> NoteLengthTableSignature {
    NoteLengthTableSignature {
        signature: byte_signature!(
            0x9F 0x28 0x07 0xFD 0xF6 _ _ 0xD5 _ _ 0xE4 _ 0x28 0x0F 0xFD 0xF6 _ _
        ),
        ring_length_table: AddressField::new(5, 6, 0),
        volume_table: AddressField::new(16, 17, 0),
    }
}
