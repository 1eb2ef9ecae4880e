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

    src/detector/fm.rs

    FM address-mark detectors: plain IBM 3740 style and the Tandy
    gap-run-qualified variant.
*/

use crate::{
    codec::fm::FM_BYTE_LEN,
    detector::{SyncDetector, SyncEvent},
    types::{AddressMarkType, EncodingMode},
};

pub const FM_IDAM_BYTE: u8 = 0xFE;
pub const FM_DAM_BYTE: u8 = 0xFB;
pub const FM_DDAM_BYTE: u8 = 0xF8;

// The 0xC7-clocked mark words.
pub const FM_IDAM_WORD: u16 = 0xF57E;
pub const FM_DAM_WORD: u16 = 0xF56F;
pub const FM_DDAM_WORD: u16 = 0xF56A;

/// A run of FM-encoded zero bytes produces alternating cells; 32 cells of
/// them qualify a Tandy gap/sync run. This is the same constant the MFM sync
/// scan uses, as both encodings idle on the 10 cell pattern.
pub const FM_SYNC_RUN: u32 = 0xAAAA_AAAA;

/// Cells the Tandy detector stays armed after the gap run breaks.
pub const TANDY_AM_WINDOW: usize = 4 * FM_BYTE_LEN;

fn classify_word(word: u16) -> Option<AddressMarkType> {
    match word {
        FM_IDAM_WORD => Some(AddressMarkType::Id),
        FM_DAM_WORD => Some(AddressMarkType::Data),
        FM_DDAM_WORD => Some(AddressMarkType::DeletedData),
        _ => None,
    }
}

/// Single-shot equality matcher for the 0xC7-clocked FM address marks.
///
/// The FM IAM word (0xFC under clock 0xD7) is deliberately not matched here:
/// its cell pattern is identical to the M2FM sync word 0xF77A, and the M2FM
/// detector owns that pattern at higher priority.
#[derive(Clone, Debug, Default)]
pub struct FmSyncDetector {
    shift_reg: u16,
    shift_ct: u32,
}

impl FmSyncDetector {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SyncDetector for FmSyncDetector {
    fn mode(&self) -> EncodingMode {
        EncodingMode::Fm
    }

    fn reset(&mut self) {
        self.shift_reg = 0;
        self.shift_ct = 0;
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.shift_ct = self.shift_ct.saturating_add(1);
        if self.shift_ct < FM_BYTE_LEN as u32 {
            return None;
        }
        classify_word(self.shift_reg).map(|mark| SyncEvent::new(EncodingMode::Fm, Some(mark)))
    }
}

/// Tandy variant: an address mark only counts when it follows a gap/sync run,
/// which makes the match distinctive enough to outrank plain FM and MFM in
/// arbitration.
#[derive(Clone, Debug, Default)]
pub struct TandyFmSyncDetector {
    shift_reg: u32,
    shift_ct: u32,
    armed: bool,
    window_ct: usize,
}

impl TandyFmSyncDetector {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SyncDetector for TandyFmSyncDetector {
    fn mode(&self) -> EncodingMode {
        EncodingMode::TandyFm
    }

    fn reset(&mut self) {
        self.shift_reg = 0;
        self.shift_ct = 0;
        self.armed = false;
        self.window_ct = 0;
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        self.shift_reg = (self.shift_reg << 1) | cell as u32;
        self.shift_ct = self.shift_ct.saturating_add(1);

        if self.shift_ct >= 32 && self.shift_reg == FM_SYNC_RUN {
            // In (or re-entering) the gap run; hold the window open.
            self.armed = true;
            self.window_ct = 0;
            return None;
        }

        if !self.armed {
            return None;
        }

        self.window_ct += 1;
        if let Some(mark) = classify_word(self.shift_reg as u16) {
            self.armed = false;
            return Some(SyncEvent::new(EncodingMode::TandyFm, Some(mark)));
        }
        if self.window_ct > TANDY_AM_WINDOW {
            log::trace!("tandy fm: no address mark within window, disarming");
            self.armed = false;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{
        encode_bytes,
        fm::{encode_fm_word, FmCodec, FM_MARKER_CLOCK},
        SchemeCodec,
    };
    use bit_vec::BitVec;

    fn feed<D: SyncDetector>(detector: &mut D, cells: &BitVec) -> Vec<SyncEvent> {
        cells.iter().filter_map(|c| detector.step(c)).collect()
    }

    #[test]
    fn mark_words_match_interleave() {
        assert_eq!(encode_fm_word(FM_IDAM_BYTE, FM_MARKER_CLOCK), FM_IDAM_WORD);
        assert_eq!(encode_fm_word(FM_DAM_BYTE, FM_MARKER_CLOCK), FM_DAM_WORD);
        assert_eq!(encode_fm_word(FM_DDAM_BYTE, FM_MARKER_CLOCK), FM_DDAM_WORD);
    }

    #[test]
    fn plain_fm_detects_bare_idam() {
        let mut codec = FmCodec::new();
        let mut cells = encode_bytes(&mut codec, &[0x12, 0x34]);
        codec.encode_mark(FM_IDAM_BYTE, &mut cells);
        let mut detector = FmSyncDetector::new();
        let events = feed(&mut detector, &cells);
        assert_eq!(events, vec![SyncEvent::new(EncodingMode::Fm, Some(AddressMarkType::Id))]);
    }

    #[test]
    fn tandy_requires_gap_run() {
        let mut codec = FmCodec::new();

        // Without the run: no Tandy event
        let mut bare = encode_bytes(&mut codec, &[0x12, 0x34]);
        codec.encode_mark(FM_DAM_BYTE, &mut bare);
        let mut detector = TandyFmSyncDetector::new();
        assert!(feed(&mut detector, &bare).is_empty());

        // With six zero bytes of sync first: event
        let mut cells = encode_bytes(&mut codec, &[0x00; 6]);
        codec.encode_mark(FM_DAM_BYTE, &mut cells);
        let mut detector = TandyFmSyncDetector::new();
        let events = feed(&mut detector, &cells);
        assert_eq!(
            events,
            vec![SyncEvent::new(EncodingMode::TandyFm, Some(AddressMarkType::Data))]
        );
    }
}
