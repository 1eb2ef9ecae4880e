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

    src/crc.rs

    CRC-16-CCITT and CRC-32 accumulators used by the field-level protocols.
*/

//! Both accumulators are MSB-first datapaths. A receiver clocks the
//! transmitted CRC bytes through the same accumulator it used for the data;
//! an intact field leaves a fixed residue in the register. The residue
//! constants below are the only valid residues for this bit ordering - the
//! reflected-datapath constant `0xDEBB20E3` is not reachable here.

pub const CRC16_POLY: u16 = 0x1021;
pub const CRC16_INIT: u16 = 0xFFFF;
/// Register value after an error-free ID field, transmitted CRC included.
pub const CRC16_RESIDUE: u16 = 0x0000;

pub const CRC32_POLY: u32 = 0x04C1_1DB7;
pub const CRC32_INIT: u32 = 0xFFFF_FFFF;
/// Register value after an error-free data field, transmitted CRC included.
pub const CRC32_RESIDUE: u32 = 0xC704_DD7B;

/// Calculate a CRC-16-CCITT (IBM 3740 convention) over a byte slice,
/// optionally continuing from a previous value.
pub fn crc_ibm_3740(data: &[u8], start: Option<u16>) -> u16 {
    let mut crc = start.unwrap_or(CRC16_INIT);
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            }
            else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Streaming CRC-16-CCITT accumulator.
#[derive(Copy, Clone, Debug)]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Self { crc: CRC16_INIT }
    }

    pub fn update_byte(&mut self, byte: u8) {
        self.crc = crc_ibm_3740(&[byte], Some(self.crc));
    }

    pub fn update(&mut self, data: &[u8]) {
        self.crc = crc_ibm_3740(data, Some(self.crc));
    }

    /// The value to transmit, high byte first.
    pub fn value(&self) -> u16 {
        self.crc
    }

    /// Check the receiver-side residue after the transmitted CRC bytes have
    /// been clocked through.
    pub fn residue_ok(&self) -> bool {
        self.crc == CRC16_RESIDUE
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Streaming CRC-32 accumulator (MSB-first 0x04C11DB7 datapath).
#[derive(Copy, Clone, Debug)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self { crc: CRC32_INIT }
    }

    pub fn update_byte(&mut self, byte: u8) {
        self.crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            if self.crc & 0x8000_0000 != 0 {
                self.crc = (self.crc << 1) ^ CRC32_POLY;
            }
            else {
                self.crc <<= 1;
            }
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// The value to transmit, complemented, high byte first.
    pub fn finalize(&self) -> u32 {
        !self.crc
    }

    /// Check the receiver-side residue after the transmitted (complemented)
    /// CRC bytes have been clocked through.
    pub fn residue_ok(&self) -> bool {
        self.crc == CRC32_RESIDUE
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
