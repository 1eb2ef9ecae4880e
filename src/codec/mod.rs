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
*/

//! Per-scheme codecs. Each codec turns bytes into serialized cell streams
//! and consumes cell streams back into bytes, one step per sample.

pub mod fm;
pub mod gcr_apple;
pub mod gcr_cbm;
pub mod m2fm;
pub mod mfm;
pub mod rll27;

use bit_vec::BitVec;
use dyn_clone::{clone_trait_object, DynClone};

/// A fully decoded data unit. This is the sole output of a decoder: per-symbol
/// problems are reported in the `error` flag, never as a fatal condition.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodedByte {
    pub value: u8,
    pub valid: bool,
    pub error: bool,
}

impl DecodedByte {
    pub fn ok(value: u8) -> Self {
        DecodedByte {
            value,
            valid: true,
            error: false,
        }
    }

    pub fn bad(value: u8) -> Self {
        DecodedByte {
            value,
            valid: true,
            error: true,
        }
    }

    /// A symbol that could not be decoded at all; the value is meaningless.
    pub fn invalid() -> Self {
        DecodedByte {
            value: 0,
            valid: false,
            error: true,
        }
    }
}

/// A `SchemeCodec` is a streaming encoder/decoder for one encoding scheme.
///
/// A decoder emits exactly one [DecodedByte] per complete consumption of its
/// scheme's symbol width; partial symbols never emit output. Byte-boundary
/// context (e.g. the previous data bit in MFM) is explicit codec state and is
/// cleared only by `reset()`.
pub trait SchemeCodec: DynClone + Send + Sync {
    /// Clear all symbol phase and byte-boundary context.
    fn reset(&mut self);
    /// Encode one byte, appending its cells to `sink`.
    fn encode_byte(&mut self, byte: u8, sink: &mut BitVec);
    /// Encode one byte with the scheme's address-mark clocking. Schemes
    /// without special marks encode normally.
    fn encode_mark(&mut self, byte: u8, sink: &mut BitVec) {
        self.encode_byte(byte, sink);
    }
    /// Consume one cell. Returns a [DecodedByte] when a full symbol has been
    /// consumed.
    fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte>;
    /// Flush any pending encode state. Only variable-length codecs have any.
    fn flush(&mut self, _sink: &mut BitVec) {}
    /// Re-align the decode phase to a symbol boundary. Called when a sync
    /// pattern has just ended, so that the next cell starts a fresh symbol.
    fn align(&mut self);
}

clone_trait_object!(SchemeCodec);

/// Push the bits of a 16-bit cell word into a sink, MSB first.
pub(crate) fn push_word16(sink: &mut BitVec, word: u16) {
    for i in (0..16).rev() {
        sink.push((word >> i) & 1 != 0);
    }
}

/// Push the low `len` bits of a value into a sink, MSB first.
pub(crate) fn push_bits(sink: &mut BitVec, value: u16, len: usize) {
    for i in (0..len).rev() {
        sink.push((value >> i) & 1 != 0);
    }
}

/// Encode a full buffer through a codec, flushing any pending state.
pub fn encode_bytes(codec: &mut dyn SchemeCodec, data: &[u8]) -> BitVec {
    let mut cells = BitVec::new();
    for &byte in data {
        codec.encode_byte(byte, &mut cells);
    }
    codec.flush(&mut cells);
    cells
}

/// Run a cell stream through a codec, collecting every emitted byte.
pub fn decode_cells(codec: &mut dyn SchemeCodec, cells: &BitVec) -> Vec<DecodedByte> {
    let mut bytes = Vec::new();
    for cell in cells.iter() {
        if let Some(byte) = codec.decode_cell(cell) {
            bytes.push(byte);
        }
    }
    bytes
}
