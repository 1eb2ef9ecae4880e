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

    src/codec/rll27.rs

    RLL(2,7) variable-length codec (ST-506 RLL hard drives).
*/

//! The Franaszek (2,7) code maps a complete prefix partition of the input
//! stream - {10, 11, 000, 010, 011, 0010, 0011} - onto codewords of twice the
//! length. Every codeword ends in at least two zeros and begins with at most
//! four, so any concatenation keeps between 2 and 7 zeros between consecutive
//! ones without context-dependent alternates.
//!
//! The decoder is symbol-aligned from sync: it attempts the 4-cell table,
//! then the 6-cell table, then the 8-cell table; a miss at 8 cells flags a
//! decode error and re-enters the hunt state. Independently of table
//! lookups, a run-length monitor validates the (2,7) bound on every cell.

use crate::codec::{push_bits, DecodedByte, SchemeCodec};
use bit_vec::BitVec;

/// Minimum zeros between consecutive ones.
pub const RLL_MIN_RUN: u8 = 2;
/// Maximum zeros between consecutive ones.
pub const RLL_MAX_RUN: u8 = 7;

#[derive(Copy, Clone, Debug)]
pub struct RllCodeword {
    pub data: u8,
    pub data_len: u8,
    pub code: u8,
    pub code_len: u8,
}

/// The complete (2,7) codebook. The two 4-bit input groups resolve the `001`
/// prefix, which has no legal 6-cell codeword.
pub const RLL_CODEBOOK: [RllCodeword; 7] = [
    RllCodeword { data: 0b10, data_len: 2, code: 0b0100, code_len: 4 },
    RllCodeword { data: 0b11, data_len: 2, code: 0b1000, code_len: 4 },
    RllCodeword { data: 0b000, data_len: 3, code: 0b000100, code_len: 6 },
    RllCodeword { data: 0b010, data_len: 3, code: 0b100100, code_len: 6 },
    RllCodeword { data: 0b011, data_len: 3, code: 0b001000, code_len: 6 },
    RllCodeword { data: 0b0010, data_len: 4, code: 0b00100100, code_len: 8 },
    RllCodeword { data: 0b0011, data_len: 4, code: 0b00001000, code_len: 8 },
];

fn lookup_code(code: u16, code_len: u8) -> Option<&'static RllCodeword> {
    RLL_CODEBOOK
        .iter()
        .find(|entry| entry.code_len == code_len && entry.code as u16 == code)
}

#[derive(Clone, Debug, Default)]
pub struct Rll27Codec {
    // Encode side: input bits awaiting a complete group, oldest in the MSBs.
    pending: u8,
    pending_ct: u8,

    // Decode side.
    symbol: u16,
    symbol_ct: u8,
    out_bits: u16,
    out_ct: u8,
    zero_run: u8,
    seen_one: bool,
}

impl Rll27Codec {
    pub fn new() -> Self {
        Default::default()
    }

    /// Consume as many complete input groups as the pending buffer holds.
    fn drain_pending(&mut self, sink: &mut BitVec) {
        loop {
            let ct = self.pending_ct;
            let take = if ct >= 2 && self.pending_bit(0) {
                // Leading 1: a 2-bit group
                2
            }
            else if ct >= 3 && !self.pending_bit(0) && self.pending_head(3) != 0b001 {
                3
            }
            else if ct >= 4 && self.pending_head(3) == 0b001 {
                4
            }
            else {
                break;
            };

            let group = self.pending_head(take);
            let entry = RLL_CODEBOOK
                .iter()
                .find(|e| e.data_len == take && e.data == group)
                .unwrap_or_else(|| panic!("incomplete (2,7) codebook for group {:0b}", group));
            push_bits(sink, entry.code as u16, entry.code_len as usize);

            self.pending_ct -= take;
            self.pending &= (1 << self.pending_ct) - 1;
        }
    }

    /// The oldest pending bit, offset by `idx`.
    fn pending_bit(&self, idx: u8) -> bool {
        (self.pending >> (self.pending_ct - 1 - idx)) & 1 != 0
    }

    /// The oldest `len` pending bits as a value.
    fn pending_head(&self, len: u8) -> u8 {
        self.pending >> (self.pending_ct - len)
    }

    /// Validate the (2,7) run bound for one incoming cell. Returns false on a
    /// violation.
    fn check_run(&mut self, cell: bool) -> bool {
        if cell {
            let short = self.seen_one && self.zero_run < RLL_MIN_RUN;
            self.seen_one = true;
            self.zero_run = 0;
            !short
        }
        else {
            self.zero_run = self.zero_run.saturating_add(1);
            // Flag exactly once as the run goes out of bounds.
            !(self.seen_one && self.zero_run == RLL_MAX_RUN + 1)
        }
    }

    /// Append decoded data bits; returns a byte when eight have accumulated.
    fn push_data_bits(&mut self, group: u8, len: u8) -> Option<DecodedByte> {
        self.out_bits = (self.out_bits << len) | group as u16;
        self.out_ct += len;
        if self.out_ct < 8 {
            return None;
        }
        self.out_ct -= 8;
        let value = (self.out_bits >> self.out_ct) as u8;
        self.out_bits &= (1 << self.out_ct) - 1;
        Some(DecodedByte::ok(value))
    }

    /// Discard the partial symbol and return to the hunt state.
    fn rehunt(&mut self) {
        self.symbol = 0;
        self.symbol_ct = 0;
        self.out_bits = 0;
        self.out_ct = 0;
    }
}

impl SchemeCodec for Rll27Codec {
    fn reset(&mut self) {
        *self = Rll27Codec::new();
    }

    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        for i in (0..8).rev() {
            self.pending = (self.pending << 1) | ((byte >> i) & 1);
            self.pending_ct += 1;
            self.drain_pending(sink);
        }
    }

    fn flush(&mut self, sink: &mut BitVec) {
        // Zero-pad the tail until it completes a group. At most two pad bits
        // are ever needed.
        while self.pending_ct > 0 {
            self.pending <<= 1;
            self.pending_ct += 1;
            self.drain_pending(sink);
        }
    }

    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        if !self.check_run(cell) {
            log::trace!("rll27: (2,7) run bound violated, re-hunting");
            self.rehunt();
            return Some(DecodedByte::invalid());
        }

        self.symbol = (self.symbol << 1) | cell as u16;
        self.symbol_ct += 1;

        for code_len in [4u8, 6, 8] {
            if self.symbol_ct == code_len {
                if let Some(entry) = lookup_code(self.symbol, code_len) {
                    self.symbol = 0;
                    self.symbol_ct = 0;
                    return self.push_data_bits(entry.data, entry.data_len);
                }
                if code_len == 8 {
                    // Miss in every table: unrecognized pattern
                    log::trace!("rll27: unrecognized codeword {:08b}, re-hunting", self.symbol);
                    self.rehunt();
                    return Some(DecodedByte::invalid());
                }
            }
        }
        None
    }

    fn align(&mut self) {
        self.symbol = 0;
        self.symbol_ct = 0;
        self.out_bits = 0;
        self.out_ct = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_cells, encode_bytes};

    #[test]
    fn codebook_is_a_complete_prefix_partition() {
        // Every binary string must start with exactly one input group.
        for prefix in 0..16u8 {
            let mut matches = 0;
            for entry in &RLL_CODEBOOK {
                // Does this 4-bit prefix begin with the entry's data group?
                if prefix >> (4 - entry.data_len) == entry.data {
                    matches += 1;
                }
            }
            assert_eq!(matches, 1, "prefix {:04b} matched {} groups", prefix, matches);
        }
    }

    #[test]
    fn codewords_satisfy_run_bounds_at_joins() {
        // Exhaustively check every codeword pair.
        for a in &RLL_CODEBOOK {
            for b in &RLL_CODEBOOK {
                let bits: Vec<bool> = (0..a.code_len)
                    .rev()
                    .map(|i| (a.code >> i) & 1 != 0)
                    .chain((0..b.code_len).rev().map(|i| (b.code >> i) & 1 != 0))
                    .collect();

                let mut zero_run = 0;
                let mut seen_one = false;
                for bit in bits {
                    if bit {
                        if seen_one {
                            assert!(zero_run >= RLL_MIN_RUN as usize);
                        }
                        assert!(zero_run <= RLL_MAX_RUN as usize);
                        seen_one = true;
                        zero_run = 0;
                    }
                    else {
                        zero_run += 1;
                    }
                }
                assert!(zero_run <= RLL_MAX_RUN as usize);
            }
        }
    }

    #[test]
    fn no_codeword_shadows_a_shorter_one() {
        // The greedy 4/6/8 decode cascade requires that no longer codeword
        // begin with a complete shorter codeword.
        for long in RLL_CODEBOOK.iter().filter(|e| e.code_len > 4) {
            for short in RLL_CODEBOOK.iter().filter(|e| e.code_len < long.code_len) {
                let prefix = long.code >> (long.code_len - short.code_len);
                assert_ne!(prefix, short.code, "{:0b} shadows {:0b}", long.code, short.code);
            }
        }
    }

    #[test]
    fn single_zero_gap_is_a_decode_error() {
        let mut codec = Rll27Codec::new();
        let mut cells = BitVec::new();
        push_bits(&mut cells, 0b101, 3);
        let bytes = decode_cells(&mut codec, &cells);
        assert!(bytes.iter().any(|b| b.error));
    }

    #[test]
    fn flush_completes_trailing_groups() {
        // 0x40 = 0100 0000: groups 010, 000, leaving "00" pending, which
        // flush pads to 000.
        let mut codec = Rll27Codec::new();
        let cells = encode_bytes(&mut codec, &[0x40]);
        // 3 six-cell codewords
        assert_eq!(cells.len(), 18);
    }
}
