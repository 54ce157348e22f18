//! Message type 4062: Swift Navigation proprietary envelope.

use core::fmt;

use crate::bits::BitReader;
use crate::constants::RTCM_MAX_PAYLOAD_BYTES;
use crate::error::DecodeError;

/// Message type 4062: an opaque, length-prefixed payload wrapped in the
/// RTCM framing. The inner `msg_type`/`sender_id` identify the payload to
/// the consuming system; this crate does not interpret it.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy)]
pub struct MsgSwiftProprietary {
    pub msg_type: u16,
    pub sender_id: u16,
    pub len: u8,
    pub data: [u8; RTCM_MAX_PAYLOAD_BYTES],
}

impl Default for MsgSwiftProprietary {
    fn default() -> Self {
        Self {
            msg_type: 0,
            sender_id: 0,
            len: 0,
            data: [0; RTCM_MAX_PAYLOAD_BYTES],
        }
    }
}

impl MsgSwiftProprietary {
    /// Decodes message type 4062 (Swift proprietary).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 4062 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "4062",
                msg_num,
            });
        }

        // Reserved for future use; a nonzero value means a format revision
        // this decoder does not understand.
        let reserved_bits = reader.unsigned(4) as u8;
        if reserved_bits != 0 {
            return Err(DecodeError::InvalidField {
                msg: "4062",
                field: "reserved",
            });
        }

        let mut msg = MsgSwiftProprietary {
            msg_type: reader.unsigned(16) as u16,
            sender_id: reader.unsigned(16) as u16,
            len: reader.unsigned(8) as u8,
            ..Default::default()
        };
        for byte in msg.data.iter_mut().take(usize::from(msg.len)) {
            *byte = reader.unsigned(8) as u8;
        }
        Ok(msg)
    }

    /// The opaque payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..usize::from(self.len)]
    }
}

impl fmt::Debug for MsgSwiftProprietary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgSwiftProprietary")
            .field("msg_type", &self.msg_type)
            .field("sender_id", &self.sender_id)
            .field("len", &self.len)
            .field("data", &self.payload())
            .finish()
    }
}

impl PartialEq for MsgSwiftProprietary {
    fn eq(&self, other: &Self) -> bool {
        self.msg_type == other.msg_type
            && self.sender_id == other.sender_id
            && self.payload() == other.payload()
    }
}
