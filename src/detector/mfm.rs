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

    src/detector/mfm.rs

    MFM sync/address-mark detector.
*/

use crate::{
    detector::{SyncDetector, SyncEvent},
    types::{AddressMarkType, EncodingMode},
};

// Pre-encoded 64-cell markers: three sync bytes followed by the mark byte.
pub const IAM_MARKER: u64 = 0x5224_5224_5224_5552;
pub const IDAM_MARKER: u64 = 0x4489_4489_4489_5554;
pub const DAM_MARKER: u64 = 0x4489_4489_4489_5545;
pub const DDAM_MARKER: u64 = 0x4489_4489_4489_554A;

pub const MFM_MARKER_LEN: usize = 64;

/// Single-shot equality matcher over a 64-cell shift register.
#[derive(Clone, Debug, Default)]
pub struct MfmSyncDetector {
    shift_reg: u64,
    shift_ct: u32,
}

impl MfmSyncDetector {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SyncDetector for MfmSyncDetector {
    fn mode(&self) -> EncodingMode {
        EncodingMode::Mfm
    }

    fn reset(&mut self) {
        self.shift_reg = 0;
        self.shift_ct = 0;
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        self.shift_reg = (self.shift_reg << 1) | cell as u64;
        self.shift_ct = self.shift_ct.saturating_add(1);
        if self.shift_ct < MFM_MARKER_LEN as u32 {
            return None;
        }

        let mark = match self.shift_reg {
            IDAM_MARKER => Some(AddressMarkType::Id),
            DAM_MARKER => Some(AddressMarkType::Data),
            DDAM_MARKER => Some(AddressMarkType::DeletedData),
            IAM_MARKER => None,
            _ => return None,
        };
        log::trace!("mfm: marker {:016X}", self.shift_reg);
        Some(SyncEvent::new(EncodingMode::Mfm, mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_bytes, mfm::MfmCodec, SchemeCodec};
    use bit_vec::BitVec;

    fn feed(detector: &mut MfmSyncDetector, cells: &BitVec) -> Vec<SyncEvent> {
        cells.iter().filter_map(|cell| detector.step(cell)).collect()
    }

    #[test]
    fn idam_sequence_is_detected() {
        let mut codec = MfmCodec::new();
        let mut cells = encode_bytes(&mut codec, &[0x00; 12]);
        for _ in 0..3 {
            codec.encode_mark(0xA1, &mut cells);
        }
        codec.encode_byte(0xFE, &mut cells);

        let mut detector = MfmSyncDetector::new();
        let events = feed(&mut detector, &cells);
        assert_eq!(events, vec![SyncEvent::new(EncodingMode::Mfm, Some(AddressMarkType::Id))]);
    }

    #[test]
    fn plain_data_does_not_trigger() {
        let mut codec = MfmCodec::new();
        let cells = encode_bytes(&mut codec, &[0xA1, 0xA1, 0xA1, 0xFE]);
        let mut detector = MfmSyncDetector::new();
        assert!(feed(&mut detector, &cells).is_empty());
    }
}
