/*
    fluxcodec
    https://github.com/dbalsom/fluxcodec

    Copyright 2024-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/detector/apple.rs

    Apple GCR prologue detector (6&2 and 5&3 variants).
*/

//! Apple tracks frame bytes on the high bit: the drive shifts cells until the
//! accumulator's MSB is set, at which point it holds a complete "disk byte".
//! The detector reproduces that framing, then walks the prologue FSM over the
//! framed bytes.

use crate::{
    codec::gcr_apple::AppleGcrVariant,
    detector::{SyncDetector, SyncEvent},
    types::{AddressMarkType, EncodingMode},
    SYNC_HUNT_TIMEOUT_BYTES,
};

pub const APPLE_PROLOGUE_1: u8 = 0xD5;
pub const APPLE_PROLOGUE_2: u8 = 0xAA;
/// Third prologue byte of an address field, DOS 3.3 (6&2).
pub const APPLE6_ADDRESS_3: u8 = 0x96;
/// Third prologue byte of an address field, DOS 3.2 (5&3).
pub const APPLE5_ADDRESS_3: u8 = 0xB5;
/// Third prologue byte of a data field, both variants.
pub const APPLE_DATA_3: u8 = 0xAD;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum PrologueState {
    #[default]
    Idle,
    Sync1,
    Sync2,
}

#[derive(Clone, Debug)]
pub struct AppleSyncDetector {
    variant: AppleGcrVariant,
    state: PrologueState,
    shift_reg: u8,
    nibble_ct: usize,
}

impl AppleSyncDetector {
    pub fn new(variant: AppleGcrVariant) -> Self {
        AppleSyncDetector {
            variant,
            state: PrologueState::Idle,
            shift_reg: 0,
            nibble_ct: 0,
        }
    }

    fn address_3(&self) -> u8 {
        match self.variant {
            AppleGcrVariant::Gcr62 => APPLE6_ADDRESS_3,
            AppleGcrVariant::Gcr53 => APPLE5_ADDRESS_3,
        }
    }

    /// Advance the prologue FSM by one framed disk byte.
    fn on_nibble(&mut self, nibble: u8) -> Option<SyncEvent> {
        self.nibble_ct += 1;
        if self.state != PrologueState::Idle && self.nibble_ct > SYNC_HUNT_TIMEOUT_BYTES {
            log::trace!("apple {:?}: prologue hunt timeout", self.variant);
            self.state = PrologueState::Idle;
        }

        match (self.state, nibble) {
            (_, APPLE_PROLOGUE_1) => {
                self.state = PrologueState::Sync1;
                self.nibble_ct = 0;
                None
            }
            (PrologueState::Sync1, APPLE_PROLOGUE_2) => {
                self.state = PrologueState::Sync2;
                None
            }
            (PrologueState::Sync2, byte) if byte == self.address_3() => {
                self.state = PrologueState::Idle;
                Some(SyncEvent::new(self.mode(), Some(AddressMarkType::Id)))
            }
            (PrologueState::Sync2, APPLE_DATA_3) => {
                self.state = PrologueState::Idle;
                Some(SyncEvent::new(self.mode(), Some(AddressMarkType::Data)))
            }
            _ => {
                self.state = PrologueState::Idle;
                None
            }
        }
    }
}

impl SyncDetector for AppleSyncDetector {
    fn mode(&self) -> EncodingMode {
        self.variant.mode()
    }

    fn reset(&mut self) {
        self.state = PrologueState::Idle;
        self.shift_reg = 0;
        self.nibble_ct = 0;
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        self.shift_reg = (self.shift_reg << 1) | cell as u8;
        if self.shift_reg & 0x80 == 0 {
            return None;
        }
        let nibble = self.shift_reg;
        self.shift_reg = 0;
        self.on_nibble(nibble)
    }
}
