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

    src/esdi/fields.rs

    The ESDI sector ID record.
*/

use binrw::{binrw, BinRead, BinWrite};
use std::fmt::{self, Display, Formatter};
use std::io::Cursor;

/// The 6-byte ESDI sector ID record, big-endian on the wire. Only the low
/// four bits of `head` are significant.
#[binrw]
#[brw(big)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EsdiIdField {
    pub cylinder: u16,
    pub head: u8,
    pub sector: u8,
    pub flags: u8,
    pub reserved: u8,
}

impl EsdiIdField {
    pub const SIZE: usize = 6;

    pub fn new(cylinder: u16, head: u8, sector: u8, flags: u8) -> Self {
        EsdiIdField {
            cylinder,
            head: head & 0x0F,
            sector,
            flags,
            reserved: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; EsdiIdField::SIZE] {
        let mut cursor = Cursor::new(Vec::with_capacity(Self::SIZE));
        // A fixed 6-byte record written to a Vec cannot fail.
        self.write(&mut cursor).expect("ID record serialization");
        let mut buf = [0u8; Self::SIZE];
        buf.copy_from_slice(cursor.get_ref());
        buf
    }

    pub fn from_bytes(buf: &[u8; EsdiIdField::SIZE]) -> Self {
        let mut cursor = Cursor::new(&buf[..]);
        EsdiIdField::read(&mut cursor).expect("ID record deserialization")
    }
}

impl Display for EsdiIdField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "[C: {} H: {} S: {} F: {:02X}]",
            self.cylinder, self.head, self.sector, self.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip() {
        let id = EsdiIdField::new(0x0321, 0x05, 0x11, 0x80);
        let bytes = id.to_bytes();
        assert_eq!(bytes, [0x03, 0x21, 0x05, 0x11, 0x80, 0x00]);
        assert_eq!(EsdiIdField::from_bytes(&bytes), id);
    }

    #[test]
    fn head_is_masked_to_four_bits() {
        let id = EsdiIdField::new(0, 0xFF, 0, 0);
        assert_eq!(id.head, 0x0F);
    }
}
