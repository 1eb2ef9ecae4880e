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

    src/mux.rs

    The encoding multiplexer.
*/

//! Pure routing: the multiplexer owns one codec per encoding mode and
//! forwards the uniform byte/cell interface to whichever codec is selected.
//! Unselected codecs are never stepped. It has no state of its own beyond
//! the mode selector.

use crate::{
    codec::{
        fm::FmCodec,
        gcr_apple::{AppleGcrCodec, AppleGcrVariant},
        gcr_cbm::CbmGcrCodec,
        m2fm::M2fmCodec,
        mfm::MfmCodec,
        DecodedByte,
        SchemeCodec,
    },
    types::EncodingMode,
};
use bit_vec::BitVec;

#[derive(Clone)]
pub struct EncodingMultiplexer {
    codecs: Vec<(EncodingMode, Box<dyn SchemeCodec>)>,
    mode: EncodingMode,
}

impl EncodingMultiplexer {
    pub fn new(mode: EncodingMode) -> Self {
        let codecs: Vec<(EncodingMode, Box<dyn SchemeCodec>)> = vec![
            (EncodingMode::Mfm, Box::new(MfmCodec::new())),
            (EncodingMode::Fm, Box::new(FmCodec::new())),
            // The Tandy variant differs only in sync conventions; the cell
            // codec is plain FM.
            (EncodingMode::TandyFm, Box::new(FmCodec::new())),
            (EncodingMode::GcrCbm, Box::new(CbmGcrCodec::new())),
            (
                EncodingMode::GcrApple6,
                Box::new(AppleGcrCodec::new(AppleGcrVariant::Gcr62)),
            ),
            (
                EncodingMode::GcrApple5,
                Box::new(AppleGcrCodec::new(AppleGcrVariant::Gcr53)),
            ),
            (EncodingMode::M2fm, Box::new(M2fmCodec::new())),
        ];
        EncodingMultiplexer { codecs, mode }
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    /// Return a bool indicating whether the mode has a bit-level codec.
    /// `EsdiNrz` does not; it is byte-clocked on dedicated lines.
    pub fn has_codec(&self, mode: EncodingMode) -> bool {
        self.codecs.iter().any(|(m, _)| *m == mode)
    }

    /// Select a mode. The newly selected codec is reset; switching away and
    /// back does not preserve symbol phase.
    pub fn select(&mut self, mode: EncodingMode) {
        if self.mode == mode {
            return;
        }
        log::debug!("mux: selecting {}", mode);
        self.mode = mode;
        if let Some(codec) = self.selected_mut() {
            codec.reset();
        }
    }

    fn selected_mut(&mut self) -> Option<&mut Box<dyn SchemeCodec>> {
        let mode = self.mode;
        self.codecs.iter_mut().find(|(m, _)| *m == mode).map(|(_, c)| c)
    }

    /// Encode one byte through the selected codec.
    pub fn encode_byte(&mut self, byte: u8, sink: &mut BitVec) {
        if let Some(codec) = self.selected_mut() {
            codec.encode_byte(byte, sink);
        }
    }

    /// Encode one byte with address-mark clocking through the selected codec.
    pub fn encode_mark(&mut self, byte: u8, sink: &mut BitVec) {
        if let Some(codec) = self.selected_mut() {
            codec.encode_mark(byte, sink);
        }
    }

    /// Flush any pending encode state in the selected codec.
    pub fn flush(&mut self, sink: &mut BitVec) {
        if let Some(codec) = self.selected_mut() {
            codec.flush(sink);
        }
    }

    /// Route one cell to the selected codec's decoder.
    pub fn decode_cell(&mut self, cell: bool) -> Option<DecodedByte> {
        self.selected_mut().and_then(|codec| codec.decode_cell(cell))
    }

    /// Re-align the selected codec to a symbol boundary.
    pub fn align(&mut self) {
        if let Some(codec) = self.selected_mut() {
            codec.align();
        }
    }

    /// Reset every codec and the selector's symbol state.
    pub fn reset(&mut self) {
        for (_, codec) in self.codecs.iter_mut() {
            codec.reset();
        }
    }
}
