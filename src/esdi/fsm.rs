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

    src/esdi/fsm.rs

    The ESDI field state machine and field builders.
*/

use crate::{
    crc::{Crc16, Crc32},
    esdi::{EsdiConfig, EsdiIdField, ESDI_SYNC_BYTE},
    CodecError,
};

/// Field sequencing states. One linear pass per sector slot:
/// the sector mark arms the ID field, a valid ID leads through a gap into the
/// data field.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum EsdiFieldState {
    #[default]
    Idle,
    Preamble,
    Sync,
    Id,
    IdCrc,
    Data,
    DataCrc,
    Gap,
}

/// Which field the FSM is currently hunting or reading.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum FieldKind {
    Id,
    Data,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EsdiEvent {
    /// An ID field completed. On a CRC error the field is discarded and the
    /// FSM returns to Idle to re-hunt; never fatal.
    IdComplete { id: EsdiIdField, crc_ok: bool },
    /// A data field completed, CRC residue checked.
    DataComplete { data: Vec<u8>, crc_ok: bool },
    /// An index pulse arrived mid-field; the field was abandoned
    /// (partial-revolution abort).
    FieldAborted,
}

#[derive(Clone, Debug)]
pub struct EsdiFieldFsm {
    config: EsdiConfig,
    state: EsdiFieldState,
    field: FieldKind,
    buf: Vec<u8>,
    byte_ct: usize,
    crc16: Crc16,
    crc32: Crc32,
}

impl EsdiFieldFsm {
    pub fn new(config: EsdiConfig) -> Self {
        EsdiFieldFsm {
            config,
            state: EsdiFieldState::Idle,
            field: FieldKind::Id,
            buf: Vec::new(),
            byte_ct: 0,
            crc16: Crc16::new(),
            crc32: Crc32::new(),
        }
    }

    pub fn state(&self) -> EsdiFieldState {
        self.state
    }

    pub fn config(&self) -> &EsdiConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.to_idle();
    }

    fn to_idle(&mut self) {
        self.state = EsdiFieldState::Idle;
        self.field = FieldKind::Id;
        self.buf.clear();
        self.byte_ct = 0;
    }

    fn enter(&mut self, state: EsdiFieldState) {
        self.state = state;
        self.byte_ct = 0;
    }

    /// Sector/address mark pulse: arms an ID field hunt. Any in-flight field
    /// is abandoned.
    pub fn sector_mark(&mut self) {
        self.field = FieldKind::Id;
        self.buf.clear();
        self.enter(EsdiFieldState::Preamble);
    }

    /// Index pulse. A pulse mid-field aborts the field and returns to Idle.
    pub fn index_pulse(&mut self) -> Option<EsdiEvent> {
        if self.state == EsdiFieldState::Idle {
            return None;
        }
        log::debug!("esdi: index pulse mid-field in {:?}, aborting", self.state);
        self.to_idle();
        Some(EsdiEvent::FieldAborted)
    }

    /// Advance the FSM by one byte from the NRZ interface.
    pub fn step_byte(&mut self, byte: u8) -> Option<EsdiEvent> {
        match self.state {
            EsdiFieldState::Idle => None,
            EsdiFieldState::Preamble => {
                if byte == 0x00 {
                    self.byte_ct += 1;
                    if self.byte_ct >= self.config.preamble_len {
                        self.enter(EsdiFieldState::Sync);
                    }
                }
                else {
                    log::trace!("esdi: non-zero byte {:02X} in preamble, re-hunting", byte);
                    self.to_idle();
                }
                None
            }
            EsdiFieldState::Sync => {
                if byte == ESDI_SYNC_BYTE {
                    // The CRC accumulates from the sync byte inclusive.
                    match self.field {
                        FieldKind::Id => {
                            self.crc16 = Crc16::new();
                            self.crc16.update_byte(byte);
                            self.enter(EsdiFieldState::Id);
                        }
                        FieldKind::Data => {
                            self.crc32 = Crc32::new();
                            self.crc32.update_byte(byte);
                            self.enter(EsdiFieldState::Data);
                        }
                    }
                    self.buf.clear();
                }
                else if byte == 0x00 {
                    // Preamble may run long; keep waiting within the window.
                    self.byte_ct += 1;
                    if self.byte_ct > self.config.preamble_len * 2 {
                        log::trace!("esdi: sync byte timeout, re-hunting");
                        self.to_idle();
                    }
                }
                else {
                    log::trace!("esdi: unexpected byte {:02X} while hunting sync", byte);
                    self.to_idle();
                }
                None
            }
            EsdiFieldState::Id => {
                self.buf.push(byte);
                self.crc16.update_byte(byte);
                if self.buf.len() == EsdiIdField::SIZE {
                    self.enter(EsdiFieldState::IdCrc);
                }
                None
            }
            EsdiFieldState::IdCrc => {
                self.crc16.update_byte(byte);
                self.byte_ct += 1;
                if self.byte_ct < 2 {
                    return None;
                }

                let mut id_bytes = [0u8; EsdiIdField::SIZE];
                id_bytes.copy_from_slice(&self.buf);
                let id = EsdiIdField::from_bytes(&id_bytes);
                let crc_ok = self.crc16.residue_ok();
                if crc_ok {
                    // ID accepted; the data field follows after the gap.
                    self.field = FieldKind::Data;
                    self.enter(EsdiFieldState::Gap);
                }
                else {
                    log::debug!("esdi: ID CRC error for {}, re-hunting", id);
                    self.to_idle();
                }
                Some(EsdiEvent::IdComplete { id, crc_ok })
            }
            EsdiFieldState::Data => {
                self.buf.push(byte);
                self.crc32.update_byte(byte);
                if self.buf.len() == self.config.sector_size {
                    self.enter(EsdiFieldState::DataCrc);
                }
                None
            }
            EsdiFieldState::DataCrc => {
                self.crc32.update_byte(byte);
                self.byte_ct += 1;
                if self.byte_ct < 4 {
                    return None;
                }

                let crc_ok = self.crc32.residue_ok();
                if !crc_ok {
                    log::debug!("esdi: data CRC error, field discarded");
                }
                let data = std::mem::take(&mut self.buf);
                self.field = FieldKind::Id;
                self.enter(EsdiFieldState::Gap);
                Some(EsdiEvent::DataComplete { data, crc_ok })
            }
            EsdiFieldState::Gap => {
                self.byte_ct += 1;
                if self.byte_ct >= self.config.gap_len {
                    match self.field {
                        // Gap after a valid ID: hunt the data field preamble.
                        FieldKind::Data => self.enter(EsdiFieldState::Preamble),
                        // Gap after the data field: the slot is done.
                        FieldKind::Id => self.to_idle(),
                    }
                }
                None
            }
        }
    }
}

/// Encode a complete ID field run: preamble, sync, ID record and CRC-16.
pub fn encode_id_field(id: &EsdiIdField, config: &EsdiConfig) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(config.preamble_len + 1 + EsdiIdField::SIZE + 2);
    bytes.extend(std::iter::repeat(0x00).take(config.preamble_len));

    let crc_start = bytes.len();
    bytes.push(ESDI_SYNC_BYTE);
    bytes.extend_from_slice(&id.to_bytes());

    let mut crc = Crc16::new();
    crc.update(&bytes[crc_start..]);
    bytes.extend_from_slice(&crc.value().to_be_bytes());
    bytes
}

/// Encode a complete data field run: preamble, sync, payload and CRC-32
/// (complemented on the wire).
pub fn encode_data_field(data: &[u8], config: &EsdiConfig) -> Result<Vec<u8>, CodecError> {
    if data.len() != config.sector_size {
        log::error!(
            "encode_data_field(): payload is {} bytes, sector size is {}",
            data.len(),
            config.sector_size
        );
        return Err(CodecError::ParameterError);
    }

    let mut bytes = Vec::with_capacity(config.preamble_len + 1 + data.len() + 4);
    bytes.extend(std::iter::repeat(0x00).take(config.preamble_len));

    let crc_start = bytes.len();
    bytes.push(ESDI_SYNC_BYTE);
    bytes.extend_from_slice(data);

    let mut crc = Crc32::new();
    crc.update(&bytes[crc_start..]);
    bytes.extend_from_slice(&crc.finalize().to_be_bytes());
    Ok(bytes)
}
