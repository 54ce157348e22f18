#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

//! Decoder for RTCM 10403.3 version-3 messages.
//!
//! GNSS reference stations broadcast their observables and metadata as
//! bit-packed RTCM data blocks. This crate turns one framed payload (the
//! data portion of a frame, preamble, length and CRC already stripped by
//! the transport layer) into a typed record:
//!
//! - legacy RTK observables 1001-1004 (GPS) and 1010/1012 (GLONASS), with
//!   pseudorange and carrier phase reconstructed into metres and cycles,
//! - station metadata 1005/1006 (ARP coordinates), 1007/1008/1033
//!   (antenna and receiver descriptors), 1029 (text), 1230 (GLONASS
//!   code-phase biases),
//! - the Multiple Signal Messages MSM4-MSM7 for every constellation,
//! - the Swift Navigation proprietary wrapper 4062.
//!
//! Framing, CRC-24Q verification, stream resynchronisation and ephemeris
//! messages are out of scope; see the transport layer that feeds this
//! crate.
//!
//! Decoding is allocation-free: records hold fixed-size arrays and every
//! call is a pure function of the input buffer.
//!
//! # Example
//!
//! ```rust,ignore
//! use rtcm3::RtcmMessage;
//!
//! match RtcmMessage::decode(payload)? {
//!     RtcmMessage::Msg1004(obs) => {
//!         for sat in obs.satellites() {
//!             println!("sv {}: {} m", sat.sv_id, sat.obs[0].pseudorange_m);
//!         }
//!     },
//!     RtcmMessage::Unknown { msg_num } => println!("skipping {msg_num}"),
//!     _ => {},
//! }
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;
extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    constellation::{Constellation, MsmType},
    error::{DateTimeError, DecodeError},
    messages::{
        DescriptorString, FreqData, Msg1005, Msg1006, Msg1007, Msg1008, Msg1029, Msg1033, Msg1230,
        MsgSwiftProprietary, MsmHeader, MsmMessage, MsmSatelliteData, MsmSignalData, ObsFlags,
        ObsHeader, ObsMessage, SatData,
    },
};

mod constellation;
mod error;
mod messages;

pub mod bits;
pub mod constants;
pub mod lock_time;

/// A decoded RTCM v3 message of any supported type.
///
/// Produced by [`RtcmMessage::decode`], which inspects the leading 12-bit
/// message number. Message numbers the crate does not handle come back as
/// [`RtcmMessage::Unknown`] so that callers can skip them without treating
/// the frame as corrupt.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum RtcmMessage {
    Msg1001(ObsMessage),
    Msg1002(ObsMessage),
    Msg1003(ObsMessage),
    Msg1004(ObsMessage),
    Msg1005(Msg1005),
    Msg1006(Msg1006),
    Msg1007(Msg1007),
    Msg1008(Msg1008),
    Msg1010(ObsMessage),
    Msg1012(ObsMessage),
    Msg1029(Msg1029),
    Msg1033(Msg1033),
    Msg1230(Msg1230),
    /// MSM4-MSM7 for any constellation; the flavour is recoverable from
    /// `msg.header.msm_type()`.
    Msm(MsmMessage),
    /// Swift Navigation proprietary wrapper (4062).
    SwiftProprietary(MsgSwiftProprietary),
    /// A structurally intact message this crate has no decoder for.
    Unknown { msg_num: u16 },
}

impl RtcmMessage {
    /// Reads the 12-bit message number and runs the matching decoder.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let msg_num = bits::get_unsigned(buf, 0, 12) as u16;
        match msg_num {
            1001 => ObsMessage::decode_1001(buf).map(RtcmMessage::Msg1001),
            1002 => ObsMessage::decode_1002(buf).map(RtcmMessage::Msg1002),
            1003 => ObsMessage::decode_1003(buf).map(RtcmMessage::Msg1003),
            1004 => ObsMessage::decode_1004(buf).map(RtcmMessage::Msg1004),
            1005 => Msg1005::decode(buf).map(RtcmMessage::Msg1005),
            1006 => Msg1006::decode(buf).map(RtcmMessage::Msg1006),
            1007 => Msg1007::decode(buf).map(RtcmMessage::Msg1007),
            1008 => Msg1008::decode(buf).map(RtcmMessage::Msg1008),
            1010 => ObsMessage::decode_1010(buf).map(RtcmMessage::Msg1010),
            1012 => ObsMessage::decode_1012(buf).map(RtcmMessage::Msg1012),
            1029 => Msg1029::decode(buf).map(RtcmMessage::Msg1029),
            1033 => Msg1033::decode(buf).map(RtcmMessage::Msg1033),
            1230 => Msg1230::decode(buf).map(RtcmMessage::Msg1230),
            4062 => MsgSwiftProprietary::decode(buf).map(RtcmMessage::SwiftProprietary),
            _ => match MsmType::from_msg_num(msg_num) {
                Some(MsmType::Msm4) => MsmMessage::decode_msm4(buf).map(RtcmMessage::Msm),
                Some(MsmType::Msm5) => MsmMessage::decode_msm5(buf).map(RtcmMessage::Msm),
                Some(MsmType::Msm6) => MsmMessage::decode_msm6(buf).map(RtcmMessage::Msm),
                Some(MsmType::Msm7) => MsmMessage::decode_msm7(buf).map(RtcmMessage::Msm),
                None => Ok(RtcmMessage::Unknown { msg_num }),
            },
        }
    }

    /// The wire message number this record was decoded from.
    pub fn msg_num(&self) -> u16 {
        match self {
            RtcmMessage::Msg1001(_) => 1001,
            RtcmMessage::Msg1002(_) => 1002,
            RtcmMessage::Msg1003(_) => 1003,
            RtcmMessage::Msg1004(_) => 1004,
            RtcmMessage::Msg1005(_) => 1005,
            RtcmMessage::Msg1006(_) => 1006,
            RtcmMessage::Msg1007(_) => 1007,
            RtcmMessage::Msg1008(_) => 1008,
            RtcmMessage::Msg1010(_) => 1010,
            RtcmMessage::Msg1012(_) => 1012,
            RtcmMessage::Msg1029(_) => 1029,
            RtcmMessage::Msg1033(_) => 1033,
            RtcmMessage::Msg1230(_) => 1230,
            RtcmMessage::Msm(msg) => msg.header.msg_num,
            RtcmMessage::SwiftProprietary(_) => 4062,
            RtcmMessage::Unknown { msg_num } => *msg_num,
        }
    }
}
