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

    src/codec/mfm.rs

    MFM (double density) bit-pair codec.
*/

use crate::codec::{push_word16, DecodedByte, SchemeCodec};
use bit_vec::BitVec;

pub const MFM_BYTE_LEN: usize = 16;

/// The A1 sync word: 0xA1 with the clock between source bits 4 and 5
/// deliberately omitted. A legal MFM encoder can never produce it.
pub const MFM_SYNC_A1: u16 = 0x4489;
/// The C2 sync word: 0xC2 with a deliberately omitted clock.
pub const MFM_SYNC_C2: u16 = 0x5224;

/// Extract the data bits (odd cells) of a 16-cell word.
pub fn data_bits(word: u16) -> u8 {
    let mut value: u8 = 0;
    for k in 0..8 {
        value = (value << 1) | ((word >> (14 - k * 2)) & 1) as u8;
    }
    value
}

/// MFM codec. The clock cell is set only when both neighboring data bits are
/// 0, so the previous data bit must be carried across byte boundaries.
#[derive(Clone, Debug, Default)]
pub struct MfmCodec {
    prev_data: bool,
    shift_reg: u16,
    cell_ct: usize,
}

impl MfmCodec {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchemeCodec for MfmCodec {
    fn reset(&mut self) {
        self.prev_data = false;
        self.shift_reg = 0;
        self.cell_ct = 0;
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 != 0;
            if bit {
                // 1 is encoded as 01
                sink.push(false);
                sink.push(true);
            }
            else {
                // 0 is encoded as 10 if the previous bit was 0, otherwise 00
                sink.push(!self.prev_data);
                sink.push(false);
            }
            self.prev_data = bit;
        }
    }

    fn encode_mark(&mut self, byte: u8, sink: &mut BitVec) {
        match byte {
            0xA1 => {
                push_word16(sink, MFM_SYNC_A1);
                self.prev_data = true;
            }
            0xC2 => {
                push_word16(sink, MFM_SYNC_C2);
                self.prev_data = false;
            }
            _ => self.encode_byte(byte, sink),
        }
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.cell_ct += 1;
        if self.cell_ct < MFM_BYTE_LEN {
            return None;
        }
        self.cell_ct = 0;
        let word = self.shift_reg;

        // The two sync words are deliberate constraint violations and must be
        // recognized, not flagged.
        if word == MFM_SYNC_A1 || word == MFM_SYNC_C2 {
            return Some(DecodedByte::ok(data_bits(word)));
        }

        // A set clock cell requires both neighboring data bits clear, so a
        // "11" cell pair is always a violation.
        let mut error = false;
        for k in 0..8 {
            let pair = (word >> (14 - k * 2)) & 0b11;
            if pair == 0b11 {
                error = true;
            }
        }

        let value = data_bits(word);
        Some(if error {
            DecodedByte::bad(value)
        }
        else {
            DecodedByte::ok(value)
        })
    }

    fn align(&mut self) {
        self.cell_ct = 0;
    }
}
