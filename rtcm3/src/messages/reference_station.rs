//! Stationary reference station ARP messages (1005, 1006).

use crate::bits::BitReader;
use crate::error::DecodeError;

/// Message type 1005: reference station antenna reference point.
///
/// The three ECEF coordinates arrive as signed 38-bit integers with 0.1 mm
/// resolution and are delivered here in metres.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Msg1005 {
    /// Reference station id (DF003).
    pub stn_id: u16,
    /// ITRF realization year (DF021).
    pub itrf: u8,
    /// Station transmits GPS observables.
    pub gps_ind: bool,
    /// Station transmits GLONASS observables.
    pub glo_ind: bool,
    /// Station transmits Galileo observables.
    pub gal_ind: bool,
    /// Reference (physical) station indicator.
    pub ref_stn_ind: bool,
    /// ARP ECEF X, metres.
    pub arp_x: f64,
    /// ARP ECEF Y, metres.
    pub arp_y: f64,
    /// ARP ECEF Z, metres.
    pub arp_z: f64,
    /// Single receiver oscillator indicator.
    pub osc_ind: bool,
    /// Quarter cycle indicator (DF364).
    pub quart_cycle_ind: u8,
}

fn decode_1005_base(reader: &mut BitReader<'_>) -> Msg1005 {
    let mut msg = Msg1005 {
        stn_id: reader.unsigned(12) as u16,
        itrf: reader.unsigned(6) as u8,
        gps_ind: reader.bit(),
        glo_ind: reader.bit(),
        gal_ind: reader.bit(),
        ref_stn_ind: reader.bit(),
        ..Default::default()
    };
    msg.arp_x = reader.signed(38) as f64 / 10000.0;
    msg.osc_ind = reader.bit();
    // Reserved bit (DF001)
    reader.skip(1);
    msg.arp_y = reader.signed(38) as f64 / 10000.0;
    msg.quart_cycle_ind = reader.unsigned(2) as u8;
    msg.arp_z = reader.signed(38) as f64 / 10000.0;
    msg
}

impl Msg1005 {
    /// Decodes message type 1005 (stationary RTK reference station ARP).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1005 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1005",
                msg_num,
            });
        }
        Ok(decode_1005_base(&mut reader))
    }
}

/// Message type 1006: the 1005 record plus the antenna height above the
/// surveyed marker.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Msg1006 {
    pub base: Msg1005,
    /// Antenna height above the marker, metres (DF028).
    pub ant_height: f64,
}

impl Msg1006 {
    /// Decodes message type 1006 (reference station ARP with antenna height).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1006 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1006",
                msg_num,
            });
        }
        let base = decode_1005_base(&mut reader);
        let ant_height = reader.unsigned(16) as f64 / 10000.0;
        Ok(Msg1006 { base, ant_height })
    }
}
