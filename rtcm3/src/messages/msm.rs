//! Multiple Signal Messages (MSM4-MSM7).
//!
//! MSM encodes a sparse satellite x signal matrix: a 64-bit satellite mask,
//! a 32-bit signal mask, and a cell mask with one bit per (satellite,
//! signal) pair select which observables are on the wire. Each observable
//! is split into a rough per-satellite part and a fine per-cell part; this
//! module reads both blocks and sums them back into full pseudoranges,
//! phase ranges and range rates.
//!
//! MSM4/5 use the standard field widths, MSM6/7 the extended ones, and
//! MSM5/7 additionally carry phase range rates.

use crate::bits::BitReader;
use crate::constants::{
    BDS_SECOND_TO_GPS_SECOND, C_1_2P24, C_1_2P29, C_1_2P31, C_1_2P4, C_2P30, MSM_CP_EXT_INVALID,
    MSM_CP_INVALID, MSM_DOP_INVALID, MSM_GLO_FCN_UNKNOWN, MSM_MAX_CELLS, MSM_PR_EXT_INVALID,
    MSM_PR_INVALID, MSM_ROUGH_RANGE_INVALID, MSM_ROUGH_RATE_INVALID, MSM_SATELLITE_MASK_SIZE,
    MSM_SIGNAL_MASK_SIZE, RTCM_MAX_TOW_MS,
};
use crate::constellation::{Constellation, MsmType};
use crate::error::DecodeError;
use crate::messages::ObsFlags;

/// Common MSM header (DF002..DF420 plus the three masks).
///
/// Masks are stored with wire slot `i` in bit `i`: bit 0 of
/// `satellite_mask` is satellite id 1, bit 0 of `signal_mask` the first
/// signal slot, and bit `sat * num_sigs + sig` of `cell_mask` the cell in
/// row-major (satellite, signal) order.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MsmHeader {
    /// Message number as found on the wire.
    pub msg_num: u16,
    /// Reference station id (DF003).
    pub stn_id: u16,
    /// Epoch time in ms: time of week, or time of day for GLONASS.
    /// Underflowed Beidou epochs are unwrapped to the end of the week.
    pub tow_ms: u32,
    /// Set when more MSM messages of the same epoch follow.
    pub multiple: bool,
    /// Issue of data station.
    pub iods: u8,
    /// Reserved field (DF001), carried through undecoded.
    pub reserved: u8,
    /// Clock steering indicator.
    pub steering: u8,
    /// External clock indicator.
    pub ext_clock: u8,
    /// Divergence-free smoothing indicator.
    pub div_free: bool,
    /// Smoothing interval.
    pub smooth: u8,
    pub satellite_mask: u64,
    pub signal_mask: u32,
    pub cell_mask: u64,
}

impl MsmHeader {
    /// Number of satellite blocks in the message.
    pub fn num_sats(&self) -> u8 {
        self.satellite_mask.count_ones() as u8
    }

    /// Number of signal slots per satellite.
    pub fn num_sigs(&self) -> u8 {
        self.signal_mask.count_ones() as u8
    }

    /// Number of cells actually present on the wire.
    pub fn num_cells(&self) -> u8 {
        self.cell_mask.count_ones() as u8
    }

    /// Whether satellite slot `i` (0-based, satellite id `i + 1`) is in the
    /// message.
    pub fn sat_present(&self, i: usize) -> bool {
        i < MSM_SATELLITE_MASK_SIZE && self.satellite_mask & (1 << i) != 0
    }

    /// Whether signal slot `i` (0-based) is in the message.
    pub fn sig_present(&self, i: usize) -> bool {
        i < MSM_SIGNAL_MASK_SIZE && self.signal_mask & (1 << i) != 0
    }

    /// Whether cell `i` in row-major (satellite, signal) order is present.
    pub fn cell_present(&self, i: usize) -> bool {
        i < MSM_MAX_CELLS && self.cell_mask & (1 << i) != 0
    }

    /// Constellation this message number belongs to.
    pub fn constellation(&self) -> Option<Constellation> {
        Constellation::from_msm_msg_num(self.msg_num)
    }

    /// MSM flavour of this message number.
    pub fn msm_type(&self) -> Option<MsmType> {
        MsmType::from_msg_num(self.msg_num)
    }
}

/// Per-satellite rough observables.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MsmSatelliteData {
    /// Rough range in ms: integer part plus 1/1024 ms refinement. Carries
    /// the raw 255 sentinel when the integer part was invalid; validity
    /// reaches downstream through the cell flags.
    pub rough_range_ms: f64,
    /// Rough range rate in m/s (MSM5/7), zero otherwise.
    pub rough_range_rate_m_s: f64,
    /// The satellite info nibble (MSM5/7). GLONASS delivers its frequency
    /// channel number here, offset by +7; [`MSM_GLO_FCN_UNKNOWN`] marks a
    /// GLONASS satellite whose FCN was not in the message (MSM4/6).
    pub glo_fcn: u8,
}

/// One decoded cell: the full observables for one (satellite, signal) pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MsmSignalData {
    /// Full pseudorange in light-milliseconds (rough + fine).
    pub pseudorange_ms: f64,
    /// Full phase range in light-milliseconds (rough + fine).
    pub carrier_phase_ms: f64,
    /// Continuous lock time in seconds.
    pub lock_time_s: f64,
    /// Half-cycle ambiguity indicator.
    pub hca_indicator: bool,
    /// Carrier-to-noise ratio in dB-Hz.
    pub cnr_db_hz: f64,
    /// Full phase range rate in m/s (MSM5/7 only).
    pub range_rate_m_s: f64,
    pub flags: ObsFlags,
}

/// A decoded MSM4-MSM7 message.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MsmMessage {
    pub header: MsmHeader,
    /// Satellite blocks, mask order; `satellites()` trims to the real count.
    pub sats: [MsmSatelliteData; MSM_SATELLITE_MASK_SIZE],
    /// Present cells, row-major mask order; `signals()` trims.
    pub signals: [MsmSignalData; MSM_MAX_CELLS],
}

impl Default for MsmMessage {
    fn default() -> Self {
        Self {
            header: MsmHeader::default(),
            sats: [MsmSatelliteData::default(); MSM_SATELLITE_MASK_SIZE],
            signals: [MsmSignalData::default(); MSM_MAX_CELLS],
        }
    }
}

impl MsmMessage {
    /// The satellite blocks present in the message, in satellite-mask order.
    pub fn satellites(&self) -> &[MsmSatelliteData] {
        &self.sats[..usize::from(self.header.num_sats())]
    }

    /// The decoded cells, in row-major cell-mask order.
    pub fn signals(&self) -> &[MsmSignalData] {
        &self.signals[..usize::from(self.header.num_cells())]
    }

    /// Decodes an MSM4 message (any constellation).
    pub fn decode_msm4(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_msm_internal(buf, MsmType::Msm4)
    }

    /// Decodes an MSM5 message (any constellation).
    pub fn decode_msm5(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_msm_internal(buf, MsmType::Msm5)
    }

    /// Decodes an MSM6 message (any constellation).
    pub fn decode_msm6(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_msm_internal(buf, MsmType::Msm6)
    }

    /// Decodes an MSM7 message (any constellation).
    pub fn decode_msm7(buf: &[u8]) -> Result<Self, DecodeError> {
        decode_msm_internal(buf, MsmType::Msm7)
    }
}

/// Unwraps an underflowed 30-bit Beidou epoch into a wrapped time of week.
///
/// Some encoders (Septentrio at least) ship BDS epochs that went negative
/// across the 14 s BDS-to-GPS offset; those show up as huge unsigned values
/// near 2^30.
fn normalize_bds2_tow(tow_ms: u32) -> u32 {
    if tow_ms >= C_2P30 - BDS_SECOND_TO_GPS_SECOND * 1000 {
        let negative_tow_ms = C_2P30 - tow_ms;
        RTCM_MAX_TOW_MS + 1 - negative_tow_ms
    } else {
        tow_ms
    }
}

fn read_msm_header(
    reader: &mut BitReader<'_>,
    cons: Constellation,
    name: &'static str,
) -> Result<MsmHeader, DecodeError> {
    let msg_num = reader.unsigned(12) as u16;
    let stn_id = reader.unsigned(12) as u16;
    let tow_ms = match cons {
        Constellation::Glo => {
            // skip the day of week, it is handled downstream
            reader.skip(3);
            // for GLONASS the epoch time is the time of day in ms
            reader.unsigned(27) as u32
        },
        Constellation::Bds => normalize_bds2_tow(reader.unsigned(30) as u32),
        _ => reader.unsigned(30) as u32,
    };

    let mut header = MsmHeader {
        msg_num,
        stn_id,
        tow_ms,
        multiple: reader.bit(),
        iods: reader.unsigned(3) as u8,
        reserved: reader.unsigned(7) as u8,
        steering: reader.unsigned(2) as u8,
        ext_clock: reader.unsigned(2) as u8,
        div_free: reader.bit(),
        smooth: reader.unsigned(3) as u8,
        ..Default::default()
    };

    if header.tow_ms > cons.max_tow_ms() {
        return Err(DecodeError::InvalidField {
            msg: name,
            field: "tow_ms",
        });
    }

    for i in 0..MSM_SATELLITE_MASK_SIZE {
        if reader.bit() {
            header.satellite_mask |= 1 << i;
        }
    }
    for i in 0..MSM_SIGNAL_MASK_SIZE {
        if reader.bit() {
            header.signal_mask |= 1 << i;
        }
    }

    let cell_mask_size = usize::from(header.num_sats()) * usize::from(header.num_sigs());
    if cell_mask_size > MSM_MAX_CELLS {
        // Too large cell mask, most probably an upstream framing error
        return Err(DecodeError::InvalidField {
            msg: name,
            field: "cell_mask",
        });
    }
    for i in 0..cell_mask_size {
        if reader.bit() {
            header.cell_mask |= 1 << i;
        }
    }

    Ok(header)
}

struct SatBlock {
    rough_range_ms: [f64; MSM_SATELLITE_MASK_SIZE],
    rough_range_valid: [bool; MSM_SATELLITE_MASK_SIZE],
    sat_info: [u8; MSM_SATELLITE_MASK_SIZE],
    sat_info_valid: [bool; MSM_SATELLITE_MASK_SIZE],
    rough_rate_m_s: [f64; MSM_SATELLITE_MASK_SIZE],
    rough_rate_valid: [bool; MSM_SATELLITE_MASK_SIZE],
}

/// Reads the per-satellite block: each data field repeats across all
/// satellites before the next field starts.
fn decode_msm_sat_data(reader: &mut BitReader<'_>, num_sats: usize, msm_type: MsmType) -> SatBlock {
    let mut block = SatBlock {
        rough_range_ms: [0.0; MSM_SATELLITE_MASK_SIZE],
        rough_range_valid: [false; MSM_SATELLITE_MASK_SIZE],
        sat_info: [0; MSM_SATELLITE_MASK_SIZE],
        sat_info_valid: [false; MSM_SATELLITE_MASK_SIZE],
        rough_rate_m_s: [0.0; MSM_SATELLITE_MASK_SIZE],
        rough_rate_valid: [false; MSM_SATELLITE_MASK_SIZE],
    };

    // number of integer milliseconds, DF397
    for i in 0..num_sats {
        let range_ms = reader.unsigned(8) as u8;
        block.rough_range_ms[i] = f64::from(range_ms);
        block.rough_range_valid[i] = range_ms != MSM_ROUGH_RANGE_INVALID;
    }

    // satellite info; only GLONASS assigns it a meaning (FCN delivery)
    if msm_type.has_rates() {
        for i in 0..num_sats {
            block.sat_info[i] = reader.unsigned(4) as u8;
            block.sat_info_valid[i] = true;
        }
    }

    // rough range modulo 1 ms, DF398
    for i in 0..num_sats {
        let rough_pr = reader.unsigned(10);
        if block.rough_range_valid[i] {
            block.rough_range_ms[i] += rough_pr as f64 / 1024.0;
        }
    }

    // rough range rate, m/s, DF399
    if msm_type.has_rates() {
        for i in 0..num_sats {
            let rate = reader.signed(14) as i16;
            block.rough_rate_m_s[i] = f64::from(rate);
            block.rough_rate_valid[i] = rate != MSM_ROUGH_RATE_INVALID;
        }
    }

    block
}

struct SignalBlock {
    fine_pr_ms: [f64; MSM_MAX_CELLS],
    fine_cp_ms: [f64; MSM_MAX_CELLS],
    lock_time_s: [f64; MSM_MAX_CELLS],
    hca_indicator: [bool; MSM_MAX_CELLS],
    cnr_db_hz: [f64; MSM_MAX_CELLS],
    fine_rate_m_s: [f64; MSM_MAX_CELLS],
    flags: [ObsFlags; MSM_MAX_CELLS],
}

/// Reads the per-cell block, again field by field across all cells.
fn decode_msm_signal_data(
    reader: &mut BitReader<'_>,
    num_cells: usize,
    msm_type: MsmType,
) -> SignalBlock {
    let mut block = SignalBlock {
        fine_pr_ms: [0.0; MSM_MAX_CELLS],
        fine_cp_ms: [0.0; MSM_MAX_CELLS],
        lock_time_s: [0.0; MSM_MAX_CELLS],
        hca_indicator: [false; MSM_MAX_CELLS],
        cnr_db_hz: [0.0; MSM_MAX_CELLS],
        fine_rate_m_s: [0.0; MSM_MAX_CELLS],
        flags: [ObsFlags::empty(); MSM_MAX_CELLS],
    };

    if msm_type.extended() {
        // DF405 fine pseudorange
        for i in 0..num_cells {
            let decoded = reader.signed(20) as i32;
            block.flags[i].set(ObsFlags::VALID_PR, decoded != MSM_PR_EXT_INVALID);
            block.fine_pr_ms[i] = f64::from(decoded) * C_1_2P29;
        }
        // DF406 fine phase range
        for i in 0..num_cells {
            let decoded = reader.signed(24) as i32;
            block.flags[i].set(ObsFlags::VALID_CP, decoded != MSM_CP_EXT_INVALID);
            block.fine_cp_ms[i] = f64::from(decoded) * C_1_2P31;
        }
        // DF407 extended lock time indicator
        for i in 0..num_cells {
            let lock_ind = reader.unsigned(10) as u16;
            block.lock_time_s[i] =
                f64::from(crate::lock_time::from_msm_lock_ind_ext(lock_ind)) / 1000.0;
            block.flags[i].set(ObsFlags::VALID_LOCK, true);
        }
    } else {
        // DF400 fine pseudorange
        for i in 0..num_cells {
            let decoded = reader.signed(15) as i16;
            block.flags[i].set(ObsFlags::VALID_PR, decoded != MSM_PR_INVALID);
            block.fine_pr_ms[i] = f64::from(decoded) * C_1_2P24;
        }
        // DF401 fine phase range
        for i in 0..num_cells {
            let decoded = reader.signed(22) as i32;
            block.flags[i].set(ObsFlags::VALID_CP, decoded != MSM_CP_INVALID);
            block.fine_cp_ms[i] = f64::from(decoded) * C_1_2P29;
        }
        // DF402 lock time indicator
        for i in 0..num_cells {
            let lock_ind = reader.unsigned(4) as u8;
            block.lock_time_s[i] = crate::lock_time::decode_msm_lock_time(lock_ind);
            block.flags[i].set(ObsFlags::VALID_LOCK, true);
        }
    }

    // DF420 half-cycle ambiguity indicators
    for hca in block.hca_indicator.iter_mut().take(num_cells) {
        *hca = reader.bit();
    }

    if msm_type.extended() {
        // DF408 CNR, 2^-4 dB-Hz
        for i in 0..num_cells {
            let decoded = reader.unsigned(10) as u32;
            block.flags[i].set(ObsFlags::VALID_CNR, decoded != 0);
            block.cnr_db_hz[i] = f64::from(decoded) * C_1_2P4;
        }
    } else {
        // DF403 CNR, 1 dB-Hz
        for i in 0..num_cells {
            let decoded = reader.unsigned(6) as u32;
            block.flags[i].set(ObsFlags::VALID_CNR, decoded != 0);
            block.cnr_db_hz[i] = f64::from(decoded);
        }
    }

    if msm_type.has_rates() {
        // DF404 fine phase range rate
        for i in 0..num_cells {
            let decoded = reader.signed(15) as i16;
            block.fine_rate_m_s[i] = f64::from(decoded) * 0.0001;
            block.flags[i].set(ObsFlags::VALID_DOP, decoded != MSM_DOP_INVALID);
        }
    }

    block
}

fn decode_msm_internal(buf: &[u8], msm_type: MsmType) -> Result<MsmMessage, DecodeError> {
    let msg_num = crate::bits::get_unsigned(buf, 0, 12) as u16;

    if MsmType::from_msg_num(msg_num) != Some(msm_type) {
        // Wrong flavour, MSM1-3, or a decade outside the MSM block
        return Err(DecodeError::MessageTypeMismatch {
            decoder: msm_type.name(),
            msg_num,
        });
    }
    let Some(cons) = Constellation::from_msm_msg_num(msg_num) else {
        return Err(DecodeError::MessageTypeMismatch {
            decoder: msm_type.name(),
            msg_num,
        });
    };

    let mut reader = BitReader::new(buf);
    let header = read_msm_header(&mut reader, cons, msm_type.name())?;

    let num_sats = usize::from(header.num_sats());
    let num_sigs = usize::from(header.num_sigs());
    let num_cells = usize::from(header.num_cells());

    let sat_block = decode_msm_sat_data(&mut reader, num_sats, msm_type);
    let sig_block = decode_msm_signal_data(&mut reader, num_cells, msm_type);

    let mut msg = MsmMessage {
        header,
        ..Default::default()
    };

    let mut cell = 0;
    for sat in 0..num_sats {
        msg.sats[sat].rough_range_ms = sat_block.rough_range_ms[sat];
        msg.sats[sat].rough_range_rate_m_s = sat_block.rough_rate_m_s[sat];
        msg.sats[sat].glo_fcn = if cons == Constellation::Glo && !sat_block.sat_info_valid[sat] {
            MSM_GLO_FCN_UNKNOWN
        } else {
            sat_block.sat_info[sat]
        };

        for sig in 0..num_sigs {
            if !header.cell_present(sat * num_sigs + sig) {
                continue;
            }
            let mut flags = sig_block.flags[cell];
            let signal = &mut msg.signals[cell];

            if sat_block.rough_range_valid[sat] && flags.contains(ObsFlags::VALID_PR) {
                signal.pseudorange_ms = sat_block.rough_range_ms[sat] + sig_block.fine_pr_ms[cell];
            } else {
                signal.pseudorange_ms = 0.0;
                flags.remove(ObsFlags::VALID_PR);
            }
            if sat_block.rough_range_valid[sat] && flags.contains(ObsFlags::VALID_CP) {
                signal.carrier_phase_ms =
                    sat_block.rough_range_ms[sat] + sig_block.fine_cp_ms[cell];
            } else {
                signal.carrier_phase_ms = 0.0;
                flags.remove(ObsFlags::VALID_CP);
            }
            signal.lock_time_s = sig_block.lock_time_s[cell];
            signal.hca_indicator = sig_block.hca_indicator[cell];
            signal.cnr_db_hz = if flags.contains(ObsFlags::VALID_CNR) {
                sig_block.cnr_db_hz[cell]
            } else {
                0.0
            };
            if sat_block.rough_rate_valid[sat] && flags.contains(ObsFlags::VALID_DOP) {
                signal.range_rate_m_s =
                    sat_block.rough_rate_m_s[sat] + sig_block.fine_rate_m_s[cell];
            } else {
                signal.range_rate_m_s = 0.0;
                flags.remove(ObsFlags::VALID_DOP);
            }
            signal.flags = flags;
            cell += 1;
        }
    }

    Ok(msg)
}
