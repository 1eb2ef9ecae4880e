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

    src/codec/fm.rs

    FM (single density) bit-pair codec.
*/

use crate::codec::{push_word16, DecodedByte, SchemeCodec};
use bit_vec::BitVec;

pub const FM_BYTE_LEN: usize = 16;

/// Standard data clocking: every cell carries a clock pulse.
pub const FM_DATA_CLOCK: u8 = 0xFF;
/// Missing-clock pattern used by IBM 3740 / Tandy address marks.
pub const FM_MARKER_CLOCK: u8 = 0xC7;

/// Interleave a data byte with a clock byte into a 16-cell FM word,
/// clock cell first.
pub fn encode_fm_word(data: u8, clock: u8) -> u16 {
    let mut word: u16 = 0;
    for i in (0..8).rev() {
        word = (word << 1) | ((clock >> i) & 1) as u16;
        word = (word << 1) | ((data >> i) & 1) as u16;
    }
    word
}

/// Split a 16-cell FM word back into a data byte. Any clock position observed
/// as 0 is a decode error.
pub fn decode_fm_word(word: u16) -> DecodedByte {
    let mut value: u8 = 0;
    let mut error = false;
    for k in 0..8 {
        let clock = (word >> (15 - k * 2)) & 1;
        let data = (word >> (14 - k * 2)) & 1;
        if clock == 0 {
            error = true;
        }
        value = (value << 1) | data as u8;
    }
    if error {
        DecodedByte::bad(value)
    }
    else {
        DecodedByte::ok(value)
    }
}

/// FM codec. FM is stateless across byte boundaries: the clock cell is
/// always 1, the data cell is the source bit.
#[derive(Clone, Debug, Default)]
pub struct FmCodec {
    shift_reg: u16,
    cell_ct: usize,
}

impl FmCodec {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchemeCodec for FmCodec {
    fn reset(&mut self) {
        self.shift_reg = 0;
        self.cell_ct = 0;
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        push_word16(sink, encode_fm_word(byte, FM_DATA_CLOCK));
    }

    fn encode_mark(&mut self, byte: u8, sink: &mut BitVec) {
        push_word16(sink, encode_fm_word(byte, FM_MARKER_CLOCK));
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.cell_ct += 1;
        if self.cell_ct < FM_BYTE_LEN {
            return None;
        }
        self.cell_ct = 0;
        Some(decode_fm_word(self.shift_reg))
    }

    fn align(&mut self) {
        self.cell_ct = 0;
    }
}
