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

    tests/common/mod.rs

    Common support routines for tests.
*/
#![allow(dead_code)]

use bit_vec::BitVec;
use fluxcodec::prelude::*;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encode a buffer through a fresh instance of the given codec.
pub fn encode_with(codec: &mut dyn SchemeCodec, data: &[u8]) -> BitVec {
    let mut cells = BitVec::new();
    for &byte in data {
        codec.encode_byte(byte, &mut cells);
    }
    codec.flush(&mut cells);
    cells
}

/// Run a cell stream through a codec, collecting every emitted byte.
pub fn decode_with(codec: &mut dyn SchemeCodec, cells: &BitVec) -> Vec<DecodedByte> {
    let mut bytes = Vec::new();
    for cell in cells.iter() {
        if let Some(byte) = codec.decode_cell(cell) {
            bytes.push(byte);
        }
    }
    bytes
}

/// Feed a cell stream through a channel, collecting every tick.
pub fn run_channel(channel: &mut DecodeChannel, cells: &BitVec) -> Vec<ChannelTick> {
    cells.iter().map(|cell| channel.step(cell)).collect()
}

/// Push the raw bits of a byte into a cell stream, MSB first.
pub fn push_raw_byte(cells: &mut BitVec, byte: u8) {
    for i in (0..8).rev() {
        cells.push((byte >> i) & 1 != 0);
    }
}
