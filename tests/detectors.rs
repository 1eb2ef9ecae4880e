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

    tests/detectors.rs

    Detector behavior through the full channel: parallel visibility,
    classification and decode alignment.
*/

mod common;

use common::{init, push_raw_byte, run_channel};
use bit_vec::BitVec;
use fluxcodec::{
    codec::{gcr_cbm::CbmGcrCodec, m2fm::M2fmCodec, SchemeCodec},
    prelude::*,
};

#[test]
fn cbm_track_detects_and_decodes() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::GcrCbm,
        auto_detect: true,
    });

    let mut codec = CbmGcrCodec::new();
    let mut cells = BitVec::new();
    // Header: sync run, block id 0x08, then header payload bytes.
    for _ in 0..20 {
        cells.push(true);
    }
    codec.encode_byte(0x08, &mut cells);
    for byte in [0x10, 0x02, 0x11, 0x30] {
        codec.encode_byte(byte, &mut cells);
    }

    let ticks = run_channel(&mut channel, &cells);
    let marks: Vec<AddressMark> = ticks.iter().filter_map(|t| t.am).collect();
    assert_eq!(
        marks,
        vec![AddressMark {
            mark: AddressMarkType::Id,
            mode: EncodingMode::GcrCbm,
        }]
    );

    // The sync event re-aligned the codec, so the payload decodes cleanly.
    let bytes: Vec<u8> = ticks
        .iter()
        .filter_map(|t| t.rx)
        .filter(|b| !b.error)
        .map(|b| b.value)
        .collect();
    assert!(bytes.ends_with(&[0x10, 0x02, 0x11, 0x30]));
}

#[test]
fn m2fm_sync_classifies_data_mark() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::M2fm,
        auto_detect: true,
    });

    let mut codec = M2fmCodec::new();
    let mut cells = BitVec::new();
    for _ in 0..6 {
        codec.encode_byte(0x00, &mut cells);
    }
    codec.encode_mark(0xFC, &mut cells);
    codec.encode_byte(0x0B, &mut cells);

    let ticks = run_channel(&mut channel, &cells);
    let marks: Vec<AddressMark> = ticks.iter().filter_map(|t| t.am).collect();
    assert_eq!(
        marks,
        vec![AddressMark {
            mark: AddressMarkType::Data,
            mode: EncodingMode::M2fm,
        }]
    );
}

#[test]
fn deselected_detectors_stay_live() {
    init();
    // Channel manually parked on FM, but an Apple prologue must still be
    // observed and reported - detection never depends on the selected mode.
    let mut channel = DecodeChannel::new(ChannelConfig {
        initial_mode: EncodingMode::Fm,
        auto_detect: false,
    });

    let mut cells = BitVec::new();
    for byte in [0xFF, 0xFF, 0xD5, 0xAA, 0xAD] {
        push_raw_byte(&mut cells, byte);
    }
    let ticks = run_channel(&mut channel, &cells);
    let marks: Vec<AddressMark> = ticks.iter().filter_map(|t| t.am).collect();
    assert_eq!(
        marks,
        vec![AddressMark {
            mark: AddressMarkType::Data,
            mode: EncodingMode::GcrApple6,
        }]
    );
    assert_eq!(channel.mode(), EncodingMode::Fm);
}

#[test]
fn apple_variants_resolve_by_priority() {
    init();
    // The data prologue D5 AA AD matches both Apple detectors on the same
    // sample; arbitration must pick 6&2.
    let mut channel = DecodeChannel::new(ChannelConfig::default());
    let mut cells = BitVec::new();
    for byte in [0xD5, 0xAA, 0xAD] {
        push_raw_byte(&mut cells, byte);
    }
    let ticks = run_channel(&mut channel, &cells);
    let marks: Vec<AddressMark> = ticks.iter().filter_map(|t| t.am).collect();
    assert_eq!(
        marks,
        vec![AddressMark {
            mark: AddressMarkType::Data,
            mode: EncodingMode::GcrApple6,
        }]
    );
}

#[test]
fn channel_reset_restores_initial_state() {
    init();
    let mut channel = DecodeChannel::new(ChannelConfig::default());
    let mut cells = BitVec::new();
    for byte in [0xD5, 0xAA, 0x96, 0xD5, 0xAA, 0x96, 0xD5, 0xAA, 0x96] {
        push_raw_byte(&mut cells, byte);
    }
    run_channel(&mut channel, &cells);
    assert!(channel.detection_state().locked);
    assert_eq!(channel.mode(), EncodingMode::GcrApple6);

    channel.reset();
    assert!(!channel.detection_state().locked);
    assert_eq!(channel.detection_state().match_count, 0);
    assert_eq!(channel.mode(), EncodingMode::Mfm);
}
