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

//! The ESDI field-level protocol. Unlike the floppy encodings, ESDI carries
//! NRZ data with a separate clock line, so there is nothing to recover at
//! the bit level: the state machine is byte-clocked and sequences
//! Preamble, Sync, ID, ID-CRC, Data, Data-CRC and Gap fields, checking each
//! field's CRC residue as the transmitted check bytes pass through the
//! accumulator.

mod fields;
mod fsm;

pub use fields::EsdiIdField;
pub use fsm::{encode_data_field, encode_id_field, EsdiEvent, EsdiFieldFsm, EsdiFieldState};

use std::fmt::{self, Display, Formatter};

use crate::DEFAULT_SECTOR_SIZE;

/// The ESDI sync byte following the preamble run.
pub const ESDI_SYNC_BYTE: u8 = 0x0A;

/// Data encodings used on the hard disk interfaces. MFM and RLL(2,7) drives
/// are bit-level encodings sharing the floppy codecs; ESDI drives present
/// decoded NRZ bytes directly.
#[derive(Copy, Clone, Debug, Eq, PartialEq, strum::EnumIter)]
pub enum HddEncoding {
    Mfm,
    Rll27,
    EsdiNrz,
}

impl Display for HddEncoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            HddEncoding::Mfm => write!(f, "MFM"),
            HddEncoding::Rll27 => write!(f, "RLL (2,7)"),
            HddEncoding::EsdiNrz => write!(f, "ESDI NRZ"),
        }
    }
}

impl HddEncoding {
    /// Return the bit-level codec behind this interface encoding, if any.
    pub fn bit_codec(&self) -> Option<Box<dyn crate::codec::SchemeCodec>> {
        match self {
            HddEncoding::Mfm => Some(Box::new(crate::codec::mfm::MfmCodec::new())),
            HddEncoding::Rll27 => Some(Box::new(crate::codec::rll27::Rll27Codec::new())),
            HddEncoding::EsdiNrz => None,
        }
    }
}

/// ESDI channel configuration, passed at construction.
#[derive(Copy, Clone, Debug)]
pub struct EsdiConfig {
    /// Length of the zero-byte preamble run preceding each field.
    pub preamble_len: usize,
    /// Payload bytes per data field.
    pub sector_size: usize,
    /// Gap bytes between fields.
    pub gap_len: usize,
}

impl Default for EsdiConfig {
    fn default() -> Self {
        EsdiConfig {
            preamble_len: 12,
            sector_size: DEFAULT_SECTOR_SIZE,
            gap_len: 16,
        }
    }
}
