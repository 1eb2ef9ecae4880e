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

//! Per-scheme sync/address-mark detectors. Every detector is a pure pattern
//! matcher over the incoming cell stream and runs unconditionally, every
//! sample, independent of which codec the multiplexer has selected - the
//! auto-detector needs simultaneous visibility into all candidates.

pub mod apple;
pub mod cbm;
pub mod fm;
pub mod m2fm;
pub mod mfm;

use crate::{
    codec::gcr_apple::AppleGcrVariant,
    types::{AddressMarkType, EncodingMode},
};
use dyn_clone::{clone_trait_object, DynClone};

/// Emitted by a detector when its scheme's sync pattern completes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SyncEvent {
    pub mode: EncodingMode,
    /// Address-mark classification, when the pattern identifies the field
    /// type. At most one classification per sample.
    pub mark: Option<AddressMarkType>,
}

impl SyncEvent {
    pub fn new(mode: EncodingMode, mark: Option<AddressMarkType>) -> Self {
        SyncEvent { mode, mark }
    }
}

pub trait SyncDetector: DynClone + Send + Sync {
    /// The mode this detector hunts for.
    fn mode(&self) -> EncodingMode;
    /// Return the detector to Idle.
    fn reset(&mut self);
    /// Advance one cell. Returns at most one event per cell.
    fn step(&mut self, cell: bool) -> Option<SyncEvent>;
}

clone_trait_object!(SyncDetector);

/// Build the full always-on detector bank, in arbitration priority order.
pub fn detector_bank() -> Vec<Box<dyn SyncDetector>> {
    vec![
        Box::new(apple::AppleSyncDetector::new(AppleGcrVariant::Gcr62)),
        Box::new(apple::AppleSyncDetector::new(AppleGcrVariant::Gcr53)),
        Box::new(cbm::CbmSyncDetector::new()),
        Box::new(m2fm::M2fmSyncDetector::new()),
        Box::new(fm::TandyFmSyncDetector::new()),
        Box::new(mfm::MfmSyncDetector::new()),
        Box::new(fm::FmSyncDetector::new()),
    ]
}
