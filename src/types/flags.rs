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

    src/types/flags.rs

    Defines common bitflags.
*/

use bitflags::bitflags;

bitflags! {
    /// Per-tick status flags reported by a decode channel.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[rustfmt::skip]
    pub struct ChannelStatus: u32 {
        #[doc = "A sync pattern was observed this tick"]
        const SYNC_DETECTED = 0b0000_0000_0000_0001;
        #[doc = "An address mark was classified this tick"]
        const AM_DETECTED   = 0b0000_0000_0000_0010;
        #[doc = "The selected codec emitted a decoded byte this tick"]
        const RX_VALID      = 0b0000_0000_0000_0100;
        #[doc = "The decoded byte carries a cell-constraint or table-lookup error"]
        const RX_ERROR      = 0b0000_0000_0000_1000;
        #[doc = "The auto-detector is locked to its candidate mode"]
        const LOCKED        = 0b0000_0000_0001_0000;
    }
}
