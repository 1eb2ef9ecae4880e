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

//! fluxcodec decodes and re-encodes the bitstream encodings used by vintage
//! magnetic media, and identifies which encoding is present from the raw bit
//! stream alone.
//!
//! The crate sits between a clock/data separator (which produces discretized
//! bit cells) and a sector-level controller (which consumes bytes and
//! address-mark events). Every component is a synchronous dataflow object
//! advanced one step per incoming sample; there are no threads and no
//! blocking operations.

pub mod autodetect;
pub mod channel;
pub mod codec;
pub mod crc;
pub mod detector;
pub mod esdi;
pub mod mux;
pub mod types;

use thiserror::Error;

pub const DEFAULT_SECTOR_SIZE: usize = 512;
pub const MAXIMUM_SECTOR_SIZE: usize = 8192;

/// Number of decoded bytes a hunting detector may consume before giving up
/// and returning to Idle. Bounded hunts are the only cancellation mechanism
/// in the core; there is no external cancel signal.
pub const SYNC_HUNT_TIMEOUT_BYTES: usize = 50;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid parameters were specified to a library function")]
    ParameterError,
    #[error("The selected encoding mode has no bit-level codec")]
    UnsupportedMode,
}

pub mod prelude {
    pub use crate::{
        autodetect::{AutoDetector, DetectionState},
        channel::{ChannelConfig, ChannelTick, DecodeChannel},
        codec::{DecodedByte, SchemeCodec},
        detector::{SyncDetector, SyncEvent},
        esdi::{EsdiConfig, EsdiEvent, EsdiFieldFsm, EsdiFieldState, EsdiIdField, HddEncoding},
        mux::EncodingMultiplexer,
        types::{AddressMark, AddressMarkType, ChannelStatus, EncodingMode},
        CodecError,
    };
}

pub use crate::{
    channel::{ChannelConfig, DecodeChannel},
    codec::DecodedByte,
    types::{AddressMark, AddressMarkType, EncodingMode},
};
