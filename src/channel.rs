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

    src/channel.rs

    The decode channel: detectors, auto-detector and multiplexer advanced as
    one synchronous dataflow graph.
*/

//! One `step()` call per `bit_valid` sample. All detectors run every tick
//! regardless of the selected mode - the auto-detector requires simultaneous
//! visibility into all candidates. Only the multiplexer's selection and the
//! auto-detector's lock state are shared per tick; no component mutates
//! another's state directly.

use crate::{
    autodetect::AutoDetector,
    codec::DecodedByte,
    detector::{detector_bank, SyncDetector, SyncEvent},
    mux::EncodingMultiplexer,
    types::{AddressMark, ChannelStatus, EncodingMode},
};
use bit_vec::BitVec;

/// Channel configuration, passed at construction. Replaces the global I/O
/// base registers of the original controller: all state is per-channel.
#[derive(Copy, Clone, Debug)]
pub struct ChannelConfig {
    pub initial_mode: EncodingMode,
    pub auto_detect: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            initial_mode: EncodingMode::Mfm,
            auto_detect: true,
        }
    }
}

/// The result of advancing the channel by one sample.
#[derive(Clone, Debug, Default)]
pub struct ChannelTick {
    pub status: ChannelStatus,
    /// Decoded byte, at most one per tick.
    pub rx: Option<DecodedByte>,
    /// Classified address mark, at most one per tick.
    pub am: Option<AddressMark>,
    /// Set when the auto-detector switched the selected mode this tick.
    pub mode_changed: Option<EncodingMode>,
}

#[derive(Clone)]
pub struct DecodeChannel {
    config: ChannelConfig,
    detectors: Vec<Box<dyn SyncDetector>>,
    autodetect: AutoDetector,
    mux: EncodingMultiplexer,
}

impl DecodeChannel {
    pub fn new(config: ChannelConfig) -> Self {
        DecodeChannel {
            config,
            detectors: detector_bank(),
            autodetect: AutoDetector::with_candidate(config.initial_mode),
            mux: EncodingMultiplexer::new(config.initial_mode),
        }
    }

    pub fn mode(&self) -> EncodingMode {
        self.mux.mode()
    }

    pub fn detection_state(&self) -> &crate::autodetect::DetectionState {
        self.autodetect.state()
    }

    /// Manually select an encoding mode. Meaningful when auto-detection is
    /// disabled; with auto-detection enabled the detector may override it on
    /// the next sync edge.
    pub fn select_mode(&mut self, mode: EncodingMode) {
        self.mux.select(mode);
    }

    /// Reset all detectors, the detection state and the codec bank, returning
    /// to the configured initial mode.
    pub fn reset(&mut self) {
        for detector in self.detectors.iter_mut() {
            detector.reset();
        }
        self.autodetect = AutoDetector::with_candidate(self.config.initial_mode);
        self.mux.reset();
        self.mux.select(self.config.initial_mode);
    }

    /// Advance the channel by one sample.
    pub fn step(&mut self, cell: bool) -> ChannelTick {
        let mut tick = ChannelTick::default();

        // Decode first: a mode switch or re-alignment triggered by this
        // sample applies from the next sample on.
        if let Some(byte) = self.mux.decode_cell(cell) {
            tick.status |= ChannelStatus::RX_VALID;
            if byte.error {
                tick.status |= ChannelStatus::RX_ERROR;
            }
            tick.rx = Some(byte);
        }

        // All detectors run unconditionally, every tick.
        let mut events: Vec<SyncEvent> = Vec::new();
        for detector in self.detectors.iter_mut() {
            if let Some(event) = detector.step(cell) {
                events.push(event);
            }
        }

        if let Some(resolved) = AutoDetector::resolve(&events) {
            tick.status |= ChannelStatus::SYNC_DETECTED;
            if let Some(mark) = resolved.mark {
                tick.status |= ChannelStatus::AM_DETECTED;
                tick.am = Some(AddressMark {
                    mark,
                    mode: resolved.mode,
                });
            }

            if self.config.auto_detect {
                if let Some(new_mode) = self.autodetect.observe(resolved.mode) {
                    self.mux.select(new_mode);
                    tick.mode_changed = Some(new_mode);
                }
            }

            // A sync pattern that just completed for the selected scheme
            // re-aligns the codec: the next cell starts a fresh symbol.
            if resolved.mode == self.mux.mode() {
                self.mux.align();
            }
        }

        if self.autodetect.is_locked() {
            tick.status |= ChannelStatus::LOCKED;
        }
        tick
    }

    /// Encode a buffer through the selected codec (tx path).
    pub fn encode_bytes(&mut self, data: &[u8]) -> BitVec {
        let mut cells = BitVec::new();
        for &byte in data {
            self.mux.encode_byte(byte, &mut cells);
        }
        self.mux.flush(&mut cells);
        cells
    }

    /// Encode a single byte with address-mark clocking (tx path).
    pub fn encode_mark(&mut self, byte: u8) -> BitVec {
        let mut cells = BitVec::new();
        self.mux.encode_mark(byte, &mut cells);
        cells
    }
}

impl Default for DecodeChannel {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}
