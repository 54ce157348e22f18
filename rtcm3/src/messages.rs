//! Typed records for the decoded message set.
//!
//! Every record is plain data: fixed-size arrays, no borrowing from the
//! input buffer, freshly constructed on each decode call.

use bitflags::bitflags;

use crate::constants::{NUM_FREQS, RTCM_MAX_SATS};

pub mod antenna;
pub mod glo_bias;
pub mod msm;
pub mod observations;
pub mod reference_station;
pub mod swift;
pub mod text;

pub use antenna::{DescriptorString, Msg1007, Msg1008, Msg1033};
pub use glo_bias::Msg1230;
pub use msm::{MsmHeader, MsmMessage, MsmSatelliteData, MsmSignalData};
pub use reference_station::{Msg1005, Msg1006};
pub use swift::MsgSwiftProprietary;
pub use text::Msg1029;

bitflags! {
    /// Per-field validity of a single frequency observation.
    ///
    /// RTCM encodes "not measured" as sentinel bit patterns rather than
    /// omitting fields, so a successfully decoded record can still carry
    /// invalid observables. Downstream code must consult the flag before
    /// using the matching value.
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObsFlags: u8 {
        /// Pseudorange is usable.
        const VALID_PR = 0x01;
        /// Carrier phase is usable.
        const VALID_CP = 0x02;
        /// Lock time is usable.
        const VALID_LOCK = 0x04;
        /// Carrier-to-noise ratio is usable.
        const VALID_CNR = 0x08;
        /// Phase range rate (Doppler) is usable.
        const VALID_DOP = 0x10;
    }
}

/// Common header of the legacy observation messages (1001-1004, 1010, 1012).
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObsHeader {
    /// Message number as found on the wire.
    pub msg_num: u16,
    /// Reference station id (DF003).
    pub stn_id: u16,
    /// Epoch time in ms: time of week, or time of day for GLONASS.
    pub tow_ms: u32,
    /// Synchronous GNSS flag; set when more observables of the same epoch
    /// follow in another message.
    pub sync: bool,
    /// Number of satellite blocks in the message.
    pub n_sat: u8,
    /// Divergence-free smoothing indicator.
    pub div_free: bool,
    /// Smoothing interval (DF008).
    pub smooth: u8,
}

/// One band of observables for one satellite.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FreqData {
    /// Code indicator: 1 bit on L1, 2 bits on L2.
    pub code: u8,
    /// Full pseudorange in metres, ambiguity already applied.
    pub pseudorange_m: f64,
    /// Carrier phase in cycles of the band's carrier.
    pub carrier_phase_cycles: f64,
    /// Carrier-to-noise ratio in dB-Hz, 0.25 dB-Hz resolution.
    pub cnr_db_hz: f64,
    /// Continuous lock time in seconds, expanded from the 7-bit indicator.
    pub lock_time_s: f64,
    pub flags: ObsFlags,
}

/// Per-satellite block of a legacy observation message.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SatData {
    /// Satellite id within the constellation (DF009/DF038).
    pub sv_id: u8,
    /// GLONASS frequency channel number as transmitted, offset by +7.
    /// Only meaningful for 1010/1012.
    pub fcn: u8,
    /// L1 and L2 observables.
    pub obs: [FreqData; NUM_FREQS],
}

/// A decoded legacy RTK observation message (1001-1004, 1010, 1012).
///
/// `header.msg_num` records which of the six wire formats produced it.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObsMessage {
    pub header: ObsHeader,
    pub sats: [SatData; RTCM_MAX_SATS],
}

impl Default for ObsMessage {
    fn default() -> Self {
        Self {
            header: ObsHeader::default(),
            sats: [SatData::default(); RTCM_MAX_SATS],
        }
    }
}

impl ObsMessage {
    /// The satellite blocks actually present in the message.
    pub fn satellites(&self) -> &[SatData] {
        let n = usize::from(self.header.n_sat).min(RTCM_MAX_SATS);
        &self.sats[..n]
    }
}
