//! Antenna and receiver descriptor messages (1007, 1008, 1033).

use core::fmt;

use crate::bits::BitReader;
use crate::constants::RTCM_MAX_STRING_LEN;
use crate::error::DecodeError;

/// A length-prefixed ASCII descriptor field, at most 31 bytes per the
/// standard.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorString {
    len: u8,
    bytes: [u8; RTCM_MAX_STRING_LEN],
}

impl DescriptorString {
    /// Reads a counter byte and that many characters. A counter above the
    /// standard's 31-byte ceiling rejects the whole message.
    fn read(
        reader: &mut BitReader<'_>,
        msg: &'static str,
        field: &'static str,
    ) -> Result<Self, DecodeError> {
        let len = reader.unsigned(8) as u8;
        if usize::from(len) > RTCM_MAX_STRING_LEN {
            return Err(DecodeError::InvalidField { msg, field });
        }
        let mut bytes = [0u8; RTCM_MAX_STRING_LEN];
        for byte in bytes.iter_mut().take(usize::from(len)) {
            *byte = reader.unsigned(8) as u8;
        }
        Ok(Self { len, bytes })
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// The descriptor as text. Fields are ASCII per the standard; anything
    /// else renders as an empty string.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

impl fmt::Debug for DescriptorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Message type 1007: antenna descriptor.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Msg1007 {
    pub stn_id: u16,
    /// IGS-style antenna model name.
    pub ant_descriptor: DescriptorString,
    /// Antenna setup id (DF031).
    pub ant_setup_id: u8,
}

fn decode_1007_base(reader: &mut BitReader<'_>, msg: &'static str) -> Result<Msg1007, DecodeError> {
    let stn_id = reader.unsigned(12) as u16;
    let ant_descriptor = DescriptorString::read(reader, msg, "ant_descriptor")?;
    let ant_setup_id = reader.unsigned(8) as u8;
    Ok(Msg1007 {
        stn_id,
        ant_descriptor,
        ant_setup_id,
    })
}

impl Msg1007 {
    /// Decodes message type 1007 (antenna descriptor).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1007 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1007",
                msg_num,
            });
        }
        decode_1007_base(&mut reader, "1007")
    }
}

/// Message type 1008: antenna descriptor and serial number.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Msg1008 {
    pub base: Msg1007,
    pub ant_serial_num: DescriptorString,
}

impl Msg1008 {
    /// Decodes message type 1008 (antenna descriptor and serial number).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1008 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1008",
                msg_num,
            });
        }
        let base = decode_1007_base(&mut reader, "1008")?;
        let ant_serial_num = DescriptorString::read(&mut reader, "1008", "ant_serial_num")?;
        Ok(Msg1008 {
            base,
            ant_serial_num,
        })
    }
}

/// Message type 1033: receiver and antenna descriptors.
///
/// Encoders may legitimately send any of the five strings empty, so every
/// field of the freshly constructed record starts zeroed and absent strings
/// simply stay that way.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Msg1033 {
    pub stn_id: u16,
    pub ant_descriptor: DescriptorString,
    pub ant_setup_id: u8,
    pub ant_serial_num: DescriptorString,
    pub rcv_descriptor: DescriptorString,
    pub rcv_fw_version: DescriptorString,
    pub rcv_serial_num: DescriptorString,
}

impl Msg1033 {
    /// Decodes message type 1033 (receiver and antenna descriptors).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1033 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1033",
                msg_num,
            });
        }

        let stn_id = reader.unsigned(12) as u16;
        let ant_descriptor = DescriptorString::read(&mut reader, "1033", "ant_descriptor")?;
        let ant_setup_id = reader.unsigned(8) as u8;
        let ant_serial_num = DescriptorString::read(&mut reader, "1033", "ant_serial_num")?;
        let rcv_descriptor = DescriptorString::read(&mut reader, "1033", "rcv_descriptor")?;
        let rcv_fw_version = DescriptorString::read(&mut reader, "1033", "rcv_fw_version")?;
        let rcv_serial_num = DescriptorString::read(&mut reader, "1033", "rcv_serial_num")?;
        Ok(Msg1033 {
            stn_id,
            ant_descriptor,
            ant_setup_id,
            ant_serial_num,
            rcv_descriptor,
            rcv_fw_version,
            rcv_serial_num,
        })
    }
}
