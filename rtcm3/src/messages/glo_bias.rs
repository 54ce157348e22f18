//! Message type 1230: GLONASS code-phase biases.

use crate::bits::BitReader;
use crate::error::DecodeError;

/// Scale of the signed 16-bit bias fields, metres.
const BIAS_SCALE_M: f64 = 0.02;

/// Message type 1230: per-signal GLONASS code-phase biases.
///
/// Each of the four biases is present on the wire only when its bit is set
/// in `fdma_signal_mask` (MSB first: L1 C/A, L1 P, L2 C/A, L2 P). Absent
/// biases decode as 0.0.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Msg1230 {
    pub stn_id: u16,
    /// Set when the station aligns its code and phase observables.
    pub bias_indicator: bool,
    /// Which of the four bias fields were transmitted (DF422).
    pub fdma_signal_mask: u8,
    /// L1 C/A code-phase bias, metres.
    pub l1_ca_cpb_meter: f64,
    /// L1 P code-phase bias, metres.
    pub l1_p_cpb_meter: f64,
    /// L2 C/A code-phase bias, metres.
    pub l2_ca_cpb_meter: f64,
    /// L2 P code-phase bias, metres.
    pub l2_p_cpb_meter: f64,
}

impl Msg1230 {
    /// Decodes message type 1230 (GLONASS code-phase biases).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1230 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1230",
                msg_num,
            });
        }

        let mut msg = Msg1230 {
            stn_id: reader.unsigned(12) as u16,
            bias_indicator: reader.bit(),
            ..Default::default()
        };
        // 3 reserved bits, skipped without validation
        reader.skip(3);
        msg.fdma_signal_mask = reader.unsigned(4) as u8;
        if msg.fdma_signal_mask & 0x08 != 0 {
            msg.l1_ca_cpb_meter = reader.signed(16) as f64 * BIAS_SCALE_M;
        }
        if msg.fdma_signal_mask & 0x04 != 0 {
            msg.l1_p_cpb_meter = reader.signed(16) as f64 * BIAS_SCALE_M;
        }
        if msg.fdma_signal_mask & 0x02 != 0 {
            msg.l2_ca_cpb_meter = reader.signed(16) as f64 * BIAS_SCALE_M;
        }
        if msg.fdma_signal_mask & 0x01 != 0 {
            msg.l2_p_cpb_meter = reader.signed(16) as f64 * BIAS_SCALE_M;
        }
        Ok(msg)
    }
}
