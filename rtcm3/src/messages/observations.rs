//! Legacy RTK observable messages: 1001-1004 (GPS) and 1010/1012 (GLONASS).
//!
//! All six share one structure: a common header, then per-satellite blocks
//! whose exact field set depends on the message number (extended variants
//! add the pseudorange ambiguity and CNR, dual-frequency variants append an
//! L2 block). Pseudorange and carrier phase are reconstructed here so that
//! the output records carry metres and cycles, not wire quanta.

use crate::bits::BitReader;
use crate::constants::{
    CP_INVALID, GLO_L1_DELTA_HZ, GLO_L1_HZ, GLO_L2_DELTA_HZ, GLO_L2_HZ, GPS_C, GPS_L1_HZ,
    GPS_L2_HZ, L1_FREQ, L2_FREQ, MT1012_GLO_FCN_OFFSET, MT1012_GLO_MAX_FCN, PRUNIT_GLO,
    PRUNIT_GPS, PR_L1_INVALID, PR_L2_INVALID, RTCM_GLO_MAX_TOW_MS, RTCM_MAX_TOW_MS,
};
use crate::error::DecodeError;
use crate::lock_time::from_lock_ind;
use crate::messages::{FreqData, ObsFlags, ObsHeader, ObsMessage};

fn read_header(reader: &mut BitReader<'_>, tow_bits: u8) -> ObsHeader {
    ObsHeader {
        msg_num: reader.unsigned(12) as u16,
        stn_id: reader.unsigned(12) as u16,
        tow_ms: reader.unsigned(tow_bits) as u32,
        sync: reader.bit(),
        n_sat: reader.unsigned(5) as u8,
        div_free: reader.bit(),
        smooth: reader.unsigned(3) as u8,
    }
}

/// Code indicator, pseudorange, phaserange difference and lock time shared
/// by every GPS L1 block.
fn decode_basic_gps_l1(reader: &mut BitReader<'_>, freq: &mut FreqData) -> (u32, i32) {
    freq.code = reader.unsigned(1) as u8;
    let pr = reader.unsigned(24) as u32;
    let phr_pr_diff = reader.signed(20) as i32;
    freq.lock_time_s = f64::from(from_lock_ind(reader.unsigned(7) as u8));
    (pr, phr_pr_diff)
}

/// GLONASS L1 block; additionally delivers the satellite's FCN.
fn decode_basic_glo_l1(reader: &mut BitReader<'_>, freq: &mut FreqData) -> (u32, i32, u8) {
    freq.code = reader.unsigned(1) as u8;
    let fcn = reader.unsigned(5) as u8;
    let pr = reader.unsigned(25) as u32;
    let phr_pr_diff = reader.signed(20) as i32;
    freq.lock_time_s = f64::from(from_lock_ind(reader.unsigned(7) as u8));
    (pr, phr_pr_diff, fcn)
}

/// L2 block: the pseudorange field is a signed difference against L1.
fn decode_basic_l2(reader: &mut BitReader<'_>, freq: &mut FreqData) -> (i32, i32) {
    freq.code = reader.unsigned(2) as u8;
    let pr_diff = reader.signed(14) as i32;
    let phr_pr_diff = reader.signed(20) as i32;
    freq.lock_time_s = f64::from(from_lock_ind(reader.unsigned(7) as u8));
    (pr_diff, phr_pr_diff)
}

fn construct_l1_code(freq: &mut FreqData, pr: u32, amb_correction: f64) -> bool {
    freq.pseudorange_m = 0.02 * f64::from(pr) + amb_correction;
    pr != PR_L1_INVALID
}

fn construct_l1_phase(freq: &mut FreqData, phr_pr_diff: i32, freq_hz: f64) -> bool {
    freq.carrier_phase_cycles =
        (freq.pseudorange_m + 0.0005 * f64::from(phr_pr_diff)) / (GPS_C / freq_hz);
    phr_pr_diff != CP_INVALID
}

fn construct_l2_code(l2: &mut FreqData, l1: &FreqData, pr_diff: i32) -> bool {
    l2.pseudorange_m = 0.02 * f64::from(pr_diff) + l1.pseudorange_m;
    pr_diff != PR_L2_INVALID
}

fn construct_l2_phase(l2: &mut FreqData, l1: &FreqData, phr_pr_diff: i32, freq_hz: f64) -> bool {
    l2.carrier_phase_cycles =
        (l1.pseudorange_m + 0.0005 * f64::from(phr_pr_diff)) / (GPS_C / freq_hz);
    phr_pr_diff != CP_INVALID
}

/// Reads an 8-bit CNR field; zero encodes "not measured".
fn read_cnr(reader: &mut BitReader<'_>, freq: &mut FreqData) -> bool {
    let cnr = reader.unsigned(8) as u8;
    if cnr == 0 {
        return false;
    }
    freq.cnr_db_hz = 0.25 * f64::from(cnr);
    true
}

/// GLONASS channel number relative to the centre frequency.
fn glo_channel(fcn: u8) -> f64 {
    f64::from(i16::from(fcn) - i16::from(MT1012_GLO_FCN_OFFSET))
}

fn check_gps_preamble(
    header: &ObsHeader,
    decoder: &'static str,
    expected: u16,
) -> Result<(), DecodeError> {
    if header.msg_num != expected {
        return Err(DecodeError::MessageTypeMismatch {
            decoder,
            msg_num: header.msg_num,
        });
    }
    if header.tow_ms > RTCM_MAX_TOW_MS {
        return Err(DecodeError::InvalidField {
            msg: decoder,
            field: "tow_ms",
        });
    }
    Ok(())
}

fn check_glo_preamble(
    header: &ObsHeader,
    decoder: &'static str,
    expected: u16,
) -> Result<(), DecodeError> {
    if header.msg_num != expected {
        return Err(DecodeError::MessageTypeMismatch {
            decoder,
            msg_num: header.msg_num,
        });
    }
    if header.tow_ms > RTCM_GLO_MAX_TOW_MS {
        return Err(DecodeError::InvalidField {
            msg: decoder,
            field: "tow_ms",
        });
    }
    Ok(())
}

impl ObsMessage {
    /// Decodes message type 1001 (L1-only GPS RTK observables).
    pub fn decode_1001(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 30),
            ..Default::default()
        };
        check_gps_preamble(&msg.header, "1001", 1001)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff) = decode_basic_gps_l1(&mut reader, l1);

            let valid_pr = construct_l1_code(l1, pr, 0.0);
            let valid_cp = construct_l1_phase(l1, phr_pr_diff, GPS_L1_HZ);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }

    /// Decodes message type 1002 (extended L1-only GPS RTK observables).
    pub fn decode_1002(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 30),
            ..Default::default()
        };
        check_gps_preamble(&msg.header, "1002", 1002)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff) = decode_basic_gps_l1(&mut reader, l1);
            let amb = reader.unsigned(8) as u8;

            let valid_cnr = read_cnr(&mut reader, l1);
            let valid_pr = construct_l1_code(l1, pr, f64::from(amb) * PRUNIT_GPS);
            let valid_cp = construct_l1_phase(l1, phr_pr_diff, GPS_L1_HZ);
            l1.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }

    /// Decodes message type 1003 (L1/L2 GPS RTK observables).
    pub fn decode_1003(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 30),
            ..Default::default()
        };
        check_gps_preamble(&msg.header, "1003", 1003)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff) = decode_basic_gps_l1(&mut reader, l1);

            let valid_pr = construct_l1_code(l1, pr, 0.0);
            let valid_cp = construct_l1_phase(l1, phr_pr_diff, GPS_L1_HZ);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);

            let l1_data = sat.obs[L1_FREQ];
            let l2 = &mut sat.obs[L2_FREQ];
            let (pr_diff, phr_pr_diff) = decode_basic_l2(&mut reader, l2);

            let valid_pr = construct_l2_code(l2, &l1_data, pr_diff);
            let valid_cp = construct_l2_phase(l2, &l1_data, phr_pr_diff, GPS_L2_HZ);
            l2.flags.set(ObsFlags::VALID_PR, valid_pr);
            l2.flags.set(ObsFlags::VALID_CP, valid_cp);
            l2.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }

    /// Decodes message type 1004 (extended L1/L2 GPS RTK observables).
    pub fn decode_1004(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 30),
            ..Default::default()
        };
        check_gps_preamble(&msg.header, "1004", 1004)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff) = decode_basic_gps_l1(&mut reader, l1);
            let amb = reader.unsigned(8) as u8;

            let valid_cnr = read_cnr(&mut reader, l1);
            let valid_pr = construct_l1_code(l1, pr, f64::from(amb) * PRUNIT_GPS);
            let valid_cp = construct_l1_phase(l1, phr_pr_diff, GPS_L1_HZ);
            l1.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);

            let l1_data = sat.obs[L1_FREQ];
            let l2 = &mut sat.obs[L2_FREQ];
            let (pr_diff, phr_pr_diff) = decode_basic_l2(&mut reader, l2);

            let valid_cnr = read_cnr(&mut reader, l2);
            let valid_pr = construct_l2_code(l2, &l1_data, pr_diff);
            let valid_cp = construct_l2_phase(l2, &l1_data, phr_pr_diff, GPS_L2_HZ);
            l2.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l2.flags.set(ObsFlags::VALID_PR, valid_pr);
            l2.flags.set(ObsFlags::VALID_CP, valid_cp);
            l2.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }

    /// Decodes message type 1010 (extended L1-only GLONASS RTK observables).
    pub fn decode_1010(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 27),
            ..Default::default()
        };
        check_glo_preamble(&msg.header, "1010", 1010)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff, fcn) = decode_basic_glo_l1(&mut reader, l1);
            sat.fcn = fcn;
            let amb = reader.unsigned(7) as u8;

            let valid_cnr = read_cnr(&mut reader, l1);
            let valid_pr = construct_l1_code(l1, pr, f64::from(amb) * PRUNIT_GLO);
            let valid_cp = fcn <= MT1012_GLO_MAX_FCN
                && construct_l1_phase(
                    l1,
                    phr_pr_diff,
                    GLO_L1_HZ + glo_channel(fcn) * GLO_L1_DELTA_HZ,
                );
            l1.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }

    /// Decodes message type 1012 (extended L1/L2 GLONASS RTK observables).
    pub fn decode_1012(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let mut msg = ObsMessage {
            header: read_header(&mut reader, 27),
            ..Default::default()
        };
        check_glo_preamble(&msg.header, "1012", 1012)?;

        for sat in msg.sats.iter_mut().take(usize::from(msg.header.n_sat)) {
            sat.sv_id = reader.unsigned(6) as u8;

            let l1 = &mut sat.obs[L1_FREQ];
            let (pr, phr_pr_diff, fcn) = decode_basic_glo_l1(&mut reader, l1);
            sat.fcn = fcn;
            let amb = reader.unsigned(7) as u8;

            let valid_cnr = read_cnr(&mut reader, l1);
            let valid_pr = construct_l1_code(l1, pr, f64::from(amb) * PRUNIT_GLO);
            let valid_cp = fcn <= MT1012_GLO_MAX_FCN
                && construct_l1_phase(
                    l1,
                    phr_pr_diff,
                    GLO_L1_HZ + glo_channel(fcn) * GLO_L1_DELTA_HZ,
                );
            l1.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l1.flags.set(ObsFlags::VALID_PR, valid_pr);
            l1.flags.set(ObsFlags::VALID_CP, valid_cp);
            l1.flags.set(ObsFlags::VALID_LOCK, valid_cp);

            let l1_data = sat.obs[L1_FREQ];
            let l2 = &mut sat.obs[L2_FREQ];
            let (pr_diff, phr_pr_diff) = decode_basic_l2(&mut reader, l2);

            let valid_cnr = read_cnr(&mut reader, l2);
            let valid_pr = construct_l2_code(l2, &l1_data, pr_diff);
            let valid_cp = fcn <= MT1012_GLO_MAX_FCN
                && construct_l2_phase(
                    l2,
                    &l1_data,
                    phr_pr_diff,
                    GLO_L2_HZ + glo_channel(fcn) * GLO_L2_DELTA_HZ,
                );
            l2.flags.set(ObsFlags::VALID_CNR, valid_cnr);
            l2.flags.set(ObsFlags::VALID_PR, valid_pr);
            l2.flags.set(ObsFlags::VALID_CP, valid_cp);
            l2.flags.set(ObsFlags::VALID_LOCK, valid_cp);
        }

        Ok(msg)
    }
}
