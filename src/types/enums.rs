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

    src/types/enums.rs

    Defines common enumerations.
*/

use std::fmt::{self, Display, Formatter};

/// `EncodingMode` enumerates the bitstream encodings the multiplexer can
/// route. Exactly one mode is active at a time.
///
/// `EsdiNrz` is a field-level protocol on dedicated clock/data lines rather
/// than a self-clocking bit encoding; it has no bit-level codec and never
/// participates in auto-detection.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, strum::EnumIter)]
pub enum EncodingMode {
    #[default]
    Mfm,
    Fm,
    GcrCbm,
    GcrApple6,
    GcrApple5,
    M2fm,
    TandyFm,
    EsdiNrz,
}

impl EncodingMode {
    /// Return the arbitration priority of the mode. Higher values win when
    /// several detectors assert a sync match on the same sample; the most
    /// distinctive pattern is the most trustworthy.
    pub fn priority(self) -> usize {
        use EncodingMode::*;
        match self {
            GcrApple6 => 7,
            GcrApple5 => 6,
            GcrCbm => 5,
            M2fm => 4,
            TandyFm => 3,
            Mfm => 2,
            Fm => 1,
            EsdiNrz => 0,
        }
    }

    /// Return the number of encoded cells consumed per decoded byte, or
    /// `None` for modes without a bit-level codec.
    pub fn cells_per_byte(self) -> Option<usize> {
        use EncodingMode::*;
        match self {
            Mfm | Fm | M2fm | TandyFm => Some(16),
            GcrCbm => Some(10),
            // Two 8-cell disk bytes per data byte.
            GcrApple6 | GcrApple5 => Some(16),
            EsdiNrz => None,
        }
    }

    /// Return a bool indicating whether the auto-detector may select this
    /// mode.
    pub fn is_auto_detectable(self) -> bool {
        !matches!(self, EncodingMode::EsdiNrz)
    }
}

impl Display for EncodingMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            EncodingMode::Mfm => write!(f, "MFM"),
            EncodingMode::Fm => write!(f, "FM"),
            EncodingMode::GcrCbm => write!(f, "GCR (CBM)"),
            EncodingMode::GcrApple6 => write!(f, "GCR (Apple 6&2)"),
            EncodingMode::GcrApple5 => write!(f, "GCR (Apple 5&3)"),
            EncodingMode::M2fm => write!(f, "M2FM"),
            EncodingMode::TandyFm => write!(f, "FM (Tandy)"),
            EncodingMode::EsdiNrz => write!(f, "ESDI NRZ"),
        }
    }
}

/// Classification of a detected address mark. The classes are mutually
/// exclusive; a detector asserts at most one per sample.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AddressMarkType {
    Id,
    Data,
    DeletedData,
}

impl Display for AddressMarkType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AddressMarkType::Id => write!(f, "IDAM"),
            AddressMarkType::Data => write!(f, "DAM"),
            AddressMarkType::DeletedData => write!(f, "DDAM"),
        }
    }
}

/// A classified address mark: what kind of field follows, and which scheme's
/// detector produced the classification.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AddressMark {
    pub mark: AddressMarkType,
    pub mode: EncodingMode,
}

impl Display for AddressMark {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.mark, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn mode_priorities_are_unique() {
        let mut priorities: Vec<usize> = EncodingMode::iter().map(|m| m.priority()).collect();
        priorities.sort();
        priorities.dedup();
        assert_eq!(priorities.len(), EncodingMode::iter().count());
    }

    #[test]
    fn esdi_is_not_auto_detectable() {
        assert!(!EncodingMode::EsdiNrz.is_auto_detectable());
        assert!(EncodingMode::iter().filter(|m| m.is_auto_detectable()).count() == 7);
    }
}
