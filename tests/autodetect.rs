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

    tests/autodetect.rs

    End-to-end auto-detection over synthesized tracks.
*/

mod common;

use common::{init, push_raw_byte, run_channel};
use bit_vec::BitVec;
use fluxcodec::{
    codec::{mfm::MfmCodec, SchemeCodec},
    prelude::*,
};

/// An MFM sector lead-in: sync run, three A1 marks and an IDAM.
fn mfm_idam_cells(codec: &mut MfmCodec) -> BitVec {
    let mut cells = BitVec::new();
    for _ in 0..12 {
        codec.encode_byte(0x00, &mut cells);
    }
    for _ in 0..3 {
        codec.encode_mark(0xA1, &mut cells);
    }
    codec.encode_byte(0xFE, &mut cells);
    cells
}

/// An Apple 6&2 address prologue with self-sync bytes.
fn apple_prologue_cells() -> BitVec {
    let mut cells = BitVec::new();
    for byte in [0xFF, 0xFF, 0xFF, 0xD5, 0xAA, 0x96] {
        push_raw_byte(&mut cells, byte);
    }
    cells
}

#[test]
fn channel_locks_to_mfm_after_three_marks() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::Fm,
        auto_detect: true,
    });

    let mut codec = MfmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..3 {
        cells.extend(mfm_idam_cells(&mut codec).iter());
    }

    let ticks = run_channel(&mut channel, &cells);
    let syncs: Vec<&ChannelTick> = ticks
        .iter()
        .filter(|t| t.status.contains(ChannelStatus::SYNC_DETECTED))
        .collect();
    assert_eq!(syncs.len(), 3);

    assert!(channel.detection_state().locked);
    assert_eq!(channel.mode(), EncodingMode::Mfm);
    assert!(ticks.last().unwrap().status.contains(ChannelStatus::LOCKED));
}

#[test]
fn two_marks_do_not_lock() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::Fm,
        auto_detect: true,
    });

    let mut codec = MfmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..2 {
        cells.extend(mfm_idam_cells(&mut codec).iter());
    }
    run_channel(&mut channel, &cells);

    assert!(!channel.detection_state().locked);
    // Unlocked, so the candidate switched immediately on the first mark.
    assert_eq!(channel.mode(), EncodingMode::Mfm);
}

#[test]
fn locked_channel_resists_brief_disturbance() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig::default());

    let mut codec = MfmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..3 {
        cells.extend(mfm_idam_cells(&mut codec).iter());
    }
    run_channel(&mut channel, &cells);
    assert!(channel.detection_state().locked);
    assert_eq!(channel.mode(), EncodingMode::Mfm);

    // Nine Apple prologues: mismatches, but below the unlock threshold.
    let mut disturbance = BitVec::new();
    for _ in 0..9 {
        disturbance.extend(apple_prologue_cells().iter());
    }
    run_channel(&mut channel, &disturbance);
    assert!(channel.detection_state().locked);
    assert_eq!(channel.mode(), EncodingMode::Mfm);
    assert_eq!(channel.detection_state().mismatch_count, 9);
}

#[test]
fn ten_mismatches_switch_modes() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig::default());

    let mut codec = MfmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..3 {
        cells.extend(mfm_idam_cells(&mut codec).iter());
    }
    run_channel(&mut channel, &cells);
    assert!(channel.detection_state().locked);

    let mut disturbance = BitVec::new();
    for _ in 0..10 {
        disturbance.extend(apple_prologue_cells().iter());
    }
    let ticks = run_channel(&mut channel, &disturbance);

    assert!(!channel.detection_state().locked);
    assert_eq!(channel.mode(), EncodingMode::GcrApple6);
    assert!(ticks.iter().any(|t| t.mode_changed == Some(EncodingMode::GcrApple6)));
}

#[test]
fn address_marks_are_reported() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig::default());
    let mut codec = MfmCodec::new();
    let cells = mfm_idam_cells(&mut codec);
    let ticks = run_channel(&mut channel, &cells);

    let marks: Vec<AddressMark> = ticks.iter().filter_map(|t| t.am).collect();
    assert_eq!(
        marks,
        vec![AddressMark {
            mark: AddressMarkType::Id,
            mode: EncodingMode::Mfm,
        }]
    );
}

#[test]
fn manual_mode_ignores_detection() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::GcrCbm,
        auto_detect: false,
    });

    let mut codec = MfmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..5 {
        cells.extend(mfm_idam_cells(&mut codec).iter());
    }
    let ticks = run_channel(&mut channel, &cells);

    // Sync events are still observed and reported, but the mux does not move.
    assert!(ticks.iter().any(|t| t.status.contains(ChannelStatus::SYNC_DETECTED)));
    assert_eq!(channel.mode(), EncodingMode::GcrCbm);
    assert!(!channel.detection_state().locked);
}
