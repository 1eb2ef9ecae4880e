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

    src/codec/m2fm.rs

    M2FM (Intel MDS / HP) bit-pair codec.
*/

//! M2FM differs from MFM in one rule: a clock pulse is written only when the
//! previous cell carried no clock pulse either. A run of zero data bits thus
//! produces alternating clocks instead of MFM's solid clocks.

use crate::codec::{mfm::data_bits, push_word16, DecodedByte, SchemeCodec};
use bit_vec::BitVec;

pub const M2FM_BYTE_LEN: usize = 16;

/// The M2FM sync word, a deliberate clocking violation.
pub const M2FM_SYNC: u16 = 0xF77A;
/// The data byte carried by the sync word's data cells.
pub const M2FM_SYNC_DATA: u8 = 0xFC;

#[derive(Clone, Debug, Default)]
pub struct M2fmCodec {
    prev_data: bool,
    prev_clock: bool,
    shift_reg: u16,
    cell_ct: usize,
}

impl M2fmCodec {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchemeCodec for M2fmCodec {
    fn reset(&mut self) {
        self.prev_data = false;
        self.prev_clock = false;
        self.shift_reg = 0;
        self.cell_ct = 0;
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 != 0;
            let clock = !self.prev_clock && !self.prev_data && !bit;
            sink.push(clock);
            sink.push(bit);
            self.prev_clock = clock;
            self.prev_data = bit;
        }
    }

    fn encode_mark(&mut self, byte: u8, sink: &mut BitVec) {
        if byte == M2FM_SYNC_DATA {
            push_word16(sink, M2FM_SYNC);
            // The sync word ends in cells (1,0): clock set, data clear.
            self.prev_clock = true;
            self.prev_data = false;
        }
        else {
            self.encode_byte(byte, sink);
        }
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.cell_ct += 1;
        if self.cell_ct < M2FM_BYTE_LEN {
            return None;
        }
        self.cell_ct = 0;
        let word = self.shift_reg;

        if word == M2FM_SYNC {
            return Some(DecodedByte::ok(M2FM_SYNC_DATA));
        }

        // As in MFM, a clock pulse next to a set data bit is impossible.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_bytes;

    #[test]
    fn zero_run_alternates_clocks() {
        let mut codec = M2fmCodec::new();
        let cells = encode_bytes(&mut codec, &[0x00]);
        // Clocks at even cells: 1,0,1,0... - the previous clock suppresses.
        let clocks: Vec<bool> = (0..8).map(|k| cells[k * 2]).collect();
        assert_eq!(clocks, vec![true, false, true, false, true, false, true, false]);
    }

    #[test]
    fn sync_word_is_not_a_legal_encoding() {
        // Encoding the sync word's own data byte normally must not produce
        // the sync word.
        let mut codec = M2fmCodec::new();
        let cells = encode_bytes(&mut codec, &[M2FM_SYNC_DATA]);
        let word = cells.iter().fold(0u16, |acc, b| (acc << 1) | b as u16);
        assert_ne!(word, M2FM_SYNC);
        assert_eq!(data_bits(word), M2FM_SYNC_DATA);
    }
}
