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

    src/codec/gcr_cbm.rs

    Commodore 4-to-5 bit GCR table codec.
*/

use crate::codec::{push_bits, DecodedByte, SchemeCodec};
use bit_vec::BitVec;

pub const CBM_GROUP_LEN: usize = 5;
pub const CBM_BYTE_LEN: usize = 10;

/// Sentinel for codewords outside the table's image set.
pub const INVALID_GCR: u8 = 0xFF;

/// The Commodore 4-to-5 bit GCR code. No codeword contains more than two
/// consecutive zeros or starts/ends with more than one, so concatenated
/// codewords never exceed a run of two.
pub const CBM_GCR_ENCODE: [u8; 16] = [
    0b01010, // 0000
    0b01011, // 0001
    0b10010, // 0010
    0b10011, // 0011
    0b01110, // 0100
    0b01111, // 0101
    0b10110, // 0110
    0b10111, // 0111
    0b01001, // 1000
    0b11001, // 1001
    0b11010, // 1010
    0b11011, // 1011
    0b01101, // 1100
    0b11101, // 1101
    0b11110, // 1110
    0b10101, // 1111
];

const fn invert_cbm(table: [u8; 16]) -> [u8; 32] {
    let mut inverse = [INVALID_GCR; 32];
    let mut i = 0;
    while i < 16 {
        inverse[table[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

pub(crate) const CBM_GCR_DECODE: [u8; 32] = invert_cbm(CBM_GCR_ENCODE);

/// Encode a nibble into its 5-bit codeword.
pub fn cbm_encode_group(nibble: u8) -> u8 {
    CBM_GCR_ENCODE[(nibble & 0x0F) as usize]
}

/// Decode a 5-bit codeword. Codewords outside the image set return `None`.
pub fn cbm_decode_group(code: u8) -> Option<u8> {
    match CBM_GCR_DECODE[(code & 0x1F) as usize] {
        INVALID_GCR => None,
        nibble => Some(nibble),
    }
}

/// CBM GCR codec. A byte is split into two nibbles, high nibble first, each
/// encoded independently and concatenated into a 10-cell group.
#[derive(Clone, Debug, Default)]
pub struct CbmGcrCodec {
    shift_reg: u16,
    cell_ct: usize,
}

impl CbmGcrCodec {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchemeCodec for CbmGcrCodec {
    fn reset(&mut self) {
        self.shift_reg = 0;
        self.cell_ct = 0;
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        push_bits(sink, cbm_encode_group(byte >> 4) as u16, CBM_GROUP_LEN);
        push_bits(sink, cbm_encode_group(byte & 0x0F) as u16, CBM_GROUP_LEN);
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.cell_ct += 1;
        if self.cell_ct < CBM_BYTE_LEN {
            return None;
        }
        self.cell_ct = 0;

        let hi = cbm_decode_group((self.shift_reg >> 5) as u8);
        let lo = cbm_decode_group(self.shift_reg as u8);
        Some(match (hi, lo) {
            (Some(hi), Some(lo)) => DecodedByte::ok(hi << 4 | lo),
            _ => {
                log::trace!("cbm gcr: codeword outside image set: {:010b}", self.shift_reg & 0x3FF);
                DecodedByte::invalid()
            }
        })
    }

    fn align(&mut self) {
        self.cell_ct = 0;
    }
}
