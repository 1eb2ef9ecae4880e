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

    src/autodetect.rs

    Encoding auto-detection with lock/unlock hysteresis.
*/

//! The auto-detector consumes resolved sync edges and decides which encoding
//! the channel should follow. While searching it switches candidates
//! immediately; once locked it demands a long run of consecutive
//! disagreements before switching. The asymmetry is what protects against
//! noise-induced mode flapping, and the thresholds are part of the design,
//! not tunables.

use crate::{detector::SyncEvent, types::EncodingMode};

/// Consecutive same-mode matches required to lock.
pub const DETECT_LOCK_COUNT: u8 = 3;
/// Consecutive different-mode matches required to unlock and switch.
pub const DETECT_UNLOCK_COUNT: u8 = 10;
/// The match counter saturates here.
pub const MATCH_COUNT_CAP: u8 = 15;
/// The mismatch counter saturates at the u8 limit, as in the original
/// 8-bit counter register.
pub const MISMATCH_COUNT_CAP: u8 = 255;

/// Per-channel detection state. Created at channel initialization, reset on
/// explicit reset, persists across revolutions until re-initialized.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DetectionState {
    pub candidate: EncodingMode,
    pub match_count: u8,
    pub mismatch_count: u8,
    pub locked: bool,
}

impl Default for DetectionState {
    fn default() -> Self {
        DetectionState {
            candidate: EncodingMode::default(),
            match_count: 0,
            mismatch_count: 0,
            locked: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AutoDetector {
    state: DetectionState,
}

impl AutoDetector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Start searching from a given candidate, so that the first sync edge
    /// counts as a match when it agrees with a configured initial mode.
    pub fn with_candidate(mode: EncodingMode) -> Self {
        AutoDetector {
            state: DetectionState {
                candidate: mode,
                ..Default::default()
            },
        }
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    pub fn mode(&self) -> EncodingMode {
        self.state.candidate
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    pub fn reset(&mut self) {
        self.state = Default::default();
    }

    /// Resolve simultaneous sync events by static priority: the most
    /// distinctive pattern wins.
    pub fn resolve(events: &[SyncEvent]) -> Option<SyncEvent> {
        events.iter().max_by_key(|e| e.mode.priority()).copied()
    }

    /// Feed one resolved sync edge. Returns the new candidate when the
    /// selection changes.
    pub fn observe(&mut self, mode: EncodingMode) -> Option<EncodingMode> {
        if !mode.is_auto_detectable() {
            return None;
        }

        if mode == self.state.candidate {
            self.state.match_count = (self.state.match_count + 1).min(MATCH_COUNT_CAP);
            // A match breaks any run of consecutive mismatches.
            self.state.mismatch_count = 0;
            if !self.state.locked && self.state.match_count >= DETECT_LOCK_COUNT {
                log::debug!("autodetect: locked to {}", mode);
                self.state.locked = true;
            }
            None
        }
        else if !self.state.locked {
            // Searching: switch immediately, no lock yet.
            log::trace!("autodetect: candidate {} -> {}", self.state.candidate, mode);
            self.state.candidate = mode;
            self.state.match_count = 1;
            self.state.mismatch_count = 0;
            Some(mode)
        }
        else {
            self.state.mismatch_count = self.state.mismatch_count.saturating_add(1);
            if self.state.mismatch_count >= DETECT_UNLOCK_COUNT {
                log::debug!("autodetect: unlocking {} -> {}", self.state.candidate, mode);
                self.state.candidate = mode;
                self.state.match_count = 1;
                self.state.mismatch_count = 0;
                self.state.locked = false;
                Some(mode)
            }
            else {
                None
            }
        }
    }
}
