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

    src/codec/gcr_apple.rs

    Apple 6&2 and 5&3 GCR table codecs.
*/

//! The Apple tables map fixed-size groups to 8-bit "disk bytes". Every disk
//! byte has the high bit set and at most one pair of adjacent zeros, which is
//! what lets the drive's byte framing self-align on the high bit.
//!
//! At the codec's byte interface a data byte is split into a high group and a
//! low remainder group (6+2 or 5+3), each emitted as one disk byte. Full
//! sector-level prenibblizing is a sector-layer concern and lives outside
//! this crate.

use crate::codec::{push_bits, DecodedByte, SchemeCodec};
use crate::types::EncodingMode;
use bit_vec::BitVec;

pub const APPLE_GROUP_LEN: usize = 8;
pub const APPLE_BYTE_LEN: usize = 16;

/// Sentinel for disk bytes outside a table's image set.
pub const INVALID_NIB_BYTE: u8 = 0xFF;

/// The Apple 6-to-8 bit "disk bytes" table (DOS 3.3 and later).
pub const DISK_BYTES_62: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6,
    0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3,
    0xB4, 0xB5, 0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC,
    0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3,
    0xD6, 0xD7, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE,
    0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC,
    0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6,
    0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
];

/// The Apple 5-to-8 bit "disk bytes" table (DOS 3.2).
pub const DISK_BYTES_53: [u8; 32] = [
    0xAB, 0xAD, 0xAE, 0xAF, 0xB5, 0xB6, 0xB7, 0xBA,
    0xBB, 0xBD, 0xBE, 0xBF, 0xD6, 0xD7, 0xDA, 0xDB,
    0xDD, 0xDE, 0xDF, 0xEA, 0xEB, 0xED, 0xEE, 0xEF,
    0xF5, 0xF6, 0xF7, 0xFA, 0xFB, 0xFD, 0xFE, 0xFF,
];

const fn invert_62() -> [u8; 256] {
    let mut inverse = [INVALID_NIB_BYTE; 256];
    let mut i = 0;
    while i < 64 {
        inverse[DISK_BYTES_62[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

const fn invert_53() -> [u8; 256] {
    let mut inverse = [INVALID_NIB_BYTE; 256];
    let mut i = 0;
    while i < 32 {
        inverse[DISK_BYTES_53[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

pub(crate) const DISK_BYTES_62_INV: [u8; 256] = invert_62();
pub(crate) const DISK_BYTES_53_INV: [u8; 256] = invert_53();

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AppleGcrVariant {
    /// 6-bit groups, DOS 3.3 style.
    Gcr62,
    /// 5-bit groups, DOS 3.2 style.
    Gcr53,
}

impl AppleGcrVariant {
    pub fn mode(self) -> EncodingMode {
        match self {
            AppleGcrVariant::Gcr62 => EncodingMode::GcrApple6,
            AppleGcrVariant::Gcr53 => EncodingMode::GcrApple5,
        }
    }

    /// Encode a group into its disk byte.
    pub fn encode_group(self, group: u8) -> u8 {
        match self {
            AppleGcrVariant::Gcr62 => DISK_BYTES_62[(group & 0x3F) as usize],
            AppleGcrVariant::Gcr53 => DISK_BYTES_53[(group & 0x1F) as usize],
        }
    }

    /// Decode a disk byte. Disk bytes outside the image set return `None`.
    pub fn decode_group(self, nibble: u8) -> Option<u8> {
        let group = match self {
            AppleGcrVariant::Gcr62 => DISK_BYTES_62_INV[nibble as usize],
            AppleGcrVariant::Gcr53 => DISK_BYTES_53_INV[nibble as usize],
        };
        match group {
            INVALID_NIB_BYTE => None,
            group => Some(group),
        }
    }

    /// Split a data byte into (high group, remainder group).
    fn split(self, byte: u8) -> (u8, u8) {
        match self {
            AppleGcrVariant::Gcr62 => (byte >> 2, byte & 0x03),
            AppleGcrVariant::Gcr53 => (byte >> 3, byte & 0x07),
        }
    }

    fn join(self, hi: u8, lo: u8) -> u8 {
        match self {
            AppleGcrVariant::Gcr62 => hi << 2 | (lo & 0x03),
            AppleGcrVariant::Gcr53 => hi << 3 | (lo & 0x07),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppleGcrCodec {
    variant: AppleGcrVariant,
    shift_reg: u16,
    cell_ct: usize,
}

impl AppleGcrCodec {
    pub fn new(variant: AppleGcrVariant) -> Self {
        AppleGcrCodec {
            variant,
            shift_reg: 0,
            cell_ct: 0,
        }
    }

    pub fn variant(&self) -> AppleGcrVariant {
        self.variant
    }
}

impl SchemeCodec for AppleGcrCodec {
    fn reset(&mut self) {
        self.shift_reg = 0;
        self.cell_ct = 0;
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        let (hi, lo) = self.variant.split(byte);
        push_bits(sink, self.variant.encode_group(hi) as u16, APPLE_GROUP_LEN);
        push_bits(sink, self.variant.encode_group(lo) as u16, APPLE_GROUP_LEN);
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.cell_ct += 1;
        if self.cell_ct < APPLE_BYTE_LEN {
            return None;
        }
        self.cell_ct = 0;

        let hi = self.variant.decode_group((self.shift_reg >> 8) as u8);
        let lo = self.variant.decode_group(self.shift_reg as u8);
        Some(match (hi, lo) {
            (Some(hi), Some(lo)) => DecodedByte::ok(self.variant.join(hi, lo)),
            _ => {
                log::trace!("apple gcr: disk byte outside image set: {:04X}", self.shift_reg);
                DecodedByte::invalid()
            }
        })
    }

    fn align(&mut self) {
        self.cell_ct = 0;
    }
}
