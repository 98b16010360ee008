//! Track durations

// SPDX-FileCopyrightText: © 2023 Marcus Rowe <undisbeliever@gmail.com>
// SPDX-FileCopyrightText: © 2026 nspc2asm contributors
//
// SPDX-License-Identifier: MIT

// TickCounter can only be incremented.
// u64: a voice can repeat an Audio-RAM sized subsection 255 times per call.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Default)]
pub struct TickCounter {
    value: u64,
}

impl TickCounter {
    pub const fn new(value: u64) -> TickCounter {
        Self { value }
    }
}

impl std::ops::Add for TickCounter {
    type Output = Self;

    fn add(self, b: Self) -> Self {
        TickCounter {
            value: self.value + b.value,
        }
    }
}

impl std::ops::AddAssign for TickCounter {
    fn add_assign(&mut self, b: Self) {
        self.value += b.value;
    }
}

impl std::ops::Mul<u32> for TickCounter {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        TickCounter {
            value: self.value * u64::from(rhs),
        }
    }
}

impl From<u8> for TickCounter {
    fn from(value: u8) -> Self {
        Self::new(value.into())
    }
}
