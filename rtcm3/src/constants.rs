//! Scale factors, sentinels and size limits from RTCM 10403.3.

/// Speed of light, m/s.
pub const GPS_C: f64 = 299_792_458.0;

/// Unit of the GPS pseudorange ambiguity, one light-millisecond in metres.
pub const PRUNIT_GPS: f64 = 299_792.458;
/// Unit of the GLONASS pseudorange ambiguity (two light-milliseconds).
pub const PRUNIT_GLO: f64 = 599_584.916;

/// GPS L1 carrier frequency, Hz.
pub const GPS_L1_HZ: f64 = 1.57542e9;
/// GPS L2 carrier frequency, Hz.
pub const GPS_L2_HZ: f64 = 1.2276e9;
/// GLONASS L1 centre frequency, Hz.
pub const GLO_L1_HZ: f64 = 1.602e9;
/// GLONASS L2 centre frequency, Hz.
pub const GLO_L2_HZ: f64 = 1.246e9;
/// GLONASS L1 FDMA channel spacing, Hz.
pub const GLO_L1_DELTA_HZ: f64 = 0.5625e6;
/// GLONASS L2 FDMA channel spacing, Hz.
pub const GLO_L2_DELTA_HZ: f64 = 0.4375e6;

/// Maximum time of week, ms (GPS, Galileo, Beidou, QZSS, SBAS, NavIC).
pub const RTCM_MAX_TOW_MS: u32 = 7 * 24 * 3600 * 1000 - 1;
/// Maximum GLONASS epoch time (time of day), ms.
pub const RTCM_GLO_MAX_TOW_MS: u32 = 24 * 3600 * 1000 + 999;

/// Offset of Beidou system time from GPS time, s.
pub const BDS_SECOND_TO_GPS_SECOND: u32 = 14;

/// Frequencies per satellite in the legacy observation messages.
pub const NUM_FREQS: usize = 2;
/// L1 slot index within [`crate::SatData::obs`].
pub const L1_FREQ: usize = 0;
/// L2 slot index within [`crate::SatData::obs`].
pub const L2_FREQ: usize = 1;

/// Satellite capacity of a legacy observation record (5-bit count field).
pub const RTCM_MAX_SATS: usize = 32;

/// Longest descriptor string the standard allows, bytes.
pub const RTCM_MAX_STRING_LEN: usize = 31;

/// Capacity of the 1029 UTF-8 payload and the 4062 opaque payload.
pub const RTCM_MAX_PAYLOAD_BYTES: usize = 255;

/// Invalid encoding of the legacy L1 pseudorange (DF011/DF041, read unsigned).
pub const PR_L1_INVALID: u32 = 0x80000;
/// Invalid encoding of the legacy L2-L1 pseudorange difference (DF017).
pub const PR_L2_INVALID: i32 = -8192;
/// Invalid encoding of the legacy phaserange - pseudorange field (DF012/DF018).
pub const CP_INVALID: i32 = -524288;

/// Offset applied to the GLONASS frequency channel number on the wire.
pub const MT1012_GLO_FCN_OFFSET: u8 = 7;
/// Largest wire FCN for which the channel frequency is defined.
pub const MT1012_GLO_MAX_FCN: u8 = 20;

/// Width of the MSM satellite mask, bits.
pub const MSM_SATELLITE_MASK_SIZE: usize = 64;
/// Width of the MSM signal mask, bits.
pub const MSM_SIGNAL_MASK_SIZE: usize = 32;
/// Upper bound on `num_sats * num_sigs`; larger cell masks are rejected.
pub const MSM_MAX_CELLS: usize = 64;

/// Invalid encoding of the MSM rough range integer milliseconds (DF397).
pub const MSM_ROUGH_RANGE_INVALID: u8 = 255;
/// Invalid encoding of the MSM rough phase range rate (DF399).
pub const MSM_ROUGH_RATE_INVALID: i16 = -8192;
/// Invalid encoding of the MSM fine pseudorange (DF400).
pub const MSM_PR_INVALID: i16 = -(1 << 14);
/// Invalid encoding of the extended MSM fine pseudorange (DF405).
pub const MSM_PR_EXT_INVALID: i32 = -(1 << 19);
/// Invalid encoding of the MSM fine phase range (DF401).
pub const MSM_CP_INVALID: i32 = -(1 << 21);
/// Invalid encoding of the extended MSM fine phase range (DF406).
pub const MSM_CP_EXT_INVALID: i32 = -(1 << 23);
/// Invalid encoding of the MSM fine phase range rate (DF404).
pub const MSM_DOP_INVALID: i16 = -(1 << 14);
/// Marker for a GLONASS satellite whose FCN was not delivered in the message.
pub const MSM_GLO_FCN_UNKNOWN: u8 = 255;

/// 2^-4, scale of the extended MSM CNR (DF408).
pub const C_1_2P4: f64 = 0.0625;
/// 2^-24 ms, scale of the MSM fine pseudorange (DF400).
pub const C_1_2P24: f64 = 5.960464477539063e-8;
/// 2^-29 ms, scale of the MSM fine phase range (DF401) and extended fine
/// pseudorange (DF405).
pub const C_1_2P29: f64 = 1.862645149230957e-9;
/// 2^-31 ms, scale of the extended MSM fine phase range (DF406).
pub const C_1_2P31: f64 = 4.656612873077393e-10;
/// 2^30, modulus of the 30-bit epoch time field.
pub const C_2P30: u32 = 1 << 30;
