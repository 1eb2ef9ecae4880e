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

    src/detector/cbm.rs

    Commodore GCR sync detector.
*/

use crate::{
    codec::gcr_cbm::{cbm_decode_group, CBM_BYTE_LEN},
    detector::{SyncDetector, SyncEvent},
    types::{AddressMarkType, EncodingMode},
    SYNC_HUNT_TIMEOUT_BYTES,
};

/// Commodore sync is a run of set cells; ten suffice to be unambiguous, the
/// 1541 writes forty.
pub const CBM_SYNC_RUN: usize = 10;

/// GCR block type bytes following the sync run.
pub const CBM_HEADER_BLOCK_ID: u8 = 0x08;
pub const CBM_DATA_BLOCK_ID: u8 = 0x07;

/// Counts consecutive set cells; after the run ends, GCR-decodes the first
/// 10-cell group and classifies the block type. Only a recognized block type
/// emits an event - an unrecognized group returns the detector to Idle so
/// that long gap runs in other encodings cannot masquerade as CBM sync.
#[derive(Clone, Debug, Default)]
pub struct CbmSyncDetector {
    one_run: usize,
    synced: bool,
    in_block: bool,
    block_reg: u16,
    block_ct: usize,
    hunt_cells: usize,
}

impl CbmSyncDetector {
    pub fn new() -> Self {
        Default::default()
    }

    fn to_idle(&mut self) {
        self.one_run = 0;
        self.synced = false;
        self.in_block = false;
        self.block_reg = 0;
        self.block_ct = 0;
        self.hunt_cells = 0;
    }
}

impl SyncDetector for CbmSyncDetector {
    fn mode(&self) -> EncodingMode {
        EncodingMode::GcrCbm
    }

    fn reset(&mut self) {
        self.to_idle();
    }

    fn step(&mut self, cell: bool) -> Option<SyncEvent> {
        if !self.synced {
            self.one_run = if cell { self.one_run + 1 } else { 0 };
            if self.one_run >= CBM_SYNC_RUN {
                self.synced = true;
                self.hunt_cells = 0;
            }
            return None;
        }

        if !self.in_block {
            if cell {
                // The sync run continues until the first clear cell. An
                // endless run is garbage (a stuck separator); give up after
                // the hunt window.
                self.hunt_cells += 1;
                if self.hunt_cells > SYNC_HUNT_TIMEOUT_BYTES * CBM_BYTE_LEN {
                    log::trace!("cbm: sync hunt timeout, returning to idle");
                    self.to_idle();
                }
                return None;
            }
            self.in_block = true;
            self.block_reg = 0;
            self.block_ct = 0;
            // fall through; this cell is the first cell of the block id
        }

        self.block_reg = (self.block_reg << 1) | cell as u16;
        self.block_ct += 1;
        if self.block_ct < CBM_BYTE_LEN {
            return None;
        }

        let hi = cbm_decode_group((self.block_reg >> 5) as u8);
        let lo = cbm_decode_group(self.block_reg as u8);
        let block_id = match (hi, lo) {
            (Some(hi), Some(lo)) => hi << 4 | lo,
            _ => {
                self.to_idle();
                return None;
            }
        };
        let mark = match block_id {
            CBM_HEADER_BLOCK_ID => AddressMarkType::Id,
            CBM_DATA_BLOCK_ID => AddressMarkType::Data,
            other => {
                log::trace!("cbm: unrecognized block id {:02X} after sync", other);
                self.to_idle();
                return None;
            }
        };
        self.to_idle();
        Some(SyncEvent::new(EncodingMode::GcrCbm, Some(mark)))
    }
}
