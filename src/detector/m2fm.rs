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

    src/detector/m2fm.rs

    M2FM sync/address-mark detector.
*/

use crate::{
    codec::{
        m2fm::{M2FM_BYTE_LEN, M2FM_SYNC},
        mfm::data_bits,
    },
    detector::{SyncDetector, SyncEvent},
    types::{AddressMarkType, EncodingMode},
};

// Intel MDS mark bytes, following the sync word.
pub const M2FM_IDAM: u8 = 0x0E;
pub const M2FM_DAM: u8 = 0x0B;
pub const M2FM_DDAM: u8 = 0x08;

/// Matches the 0xF77A sync word, then classifies the following word's data
/// bits as the mark byte. The classification window is one word; the event is
/// emitted either way so a sync without a recognized mark still counts for
/// detection.
#[derive(Clone, Debug, Default)]
pub struct M2fmSyncDetector {
    shift_reg: u16,
    shift_ct: u32,
    classifying: bool,
    cell_ct: usize,
}

impl M2fmSyncDetector {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SyncDetector for M2fmSyncDetector {
    fn mode(&self) -> EncodingMode {
        EncodingMode::M2fm
    }

    fn reset(&mut self) {
        self.shift_reg = 0;
        self.shift_ct = 0;
        self.classifying = false;
        self.cell_ct = 0;
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        self.shift_reg = (self.shift_reg << 1) | cell as u16;
        self.shift_ct = self.shift_ct.saturating_add(1);

        if self.classifying {
            self.cell_ct += 1;
            if self.cell_ct < M2FM_BYTE_LEN {
                return None;
            }
            self.classifying = false;
            let mark = match data_bits(self.shift_reg) {
                M2FM_IDAM => Some(AddressMarkType::Id),
                M2FM_DAM => Some(AddressMarkType::Data),
                M2FM_DDAM => Some(AddressMarkType::DeletedData),
                other => {
                    log::trace!("m2fm: unclassified mark byte {:02X}", other);
                    None
                }
            };
            return Some(SyncEvent::new(EncodingMode::M2fm, mark));
        }

        if self.shift_ct >= M2FM_BYTE_LEN as u32 && self.shift_reg == M2FM_SYNC {
            self.classifying = true;
            self.cell_ct = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_bytes, m2fm::M2fmCodec, SchemeCodec};

    #[test]
    fn sync_then_idam_classifies() {
        let mut codec = M2fmCodec::new();
        let mut cells = encode_bytes(&mut codec, &[0x00; 6]);
        codec.encode_mark(crate::codec::m2fm::M2FM_SYNC_DATA, &mut cells);
        codec.encode_byte(M2FM_IDAM, &mut cells);

        let mut detector = M2fmSyncDetector::new();
        let events: Vec<SyncEvent> = cells.iter().filter_map(|c| detector.step(c)).collect();
        assert_eq!(events, vec![SyncEvent::new(EncodingMode::M2fm, Some(AddressMarkType::Id))]);
    }
}
