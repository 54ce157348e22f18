//! Decoding tests for the MSM4-MSM7 family.

mod common;

use common::BitWriter;
use rtcm3::constants::{C_1_2P24, C_1_2P29, C_1_2P31, MSM_GLO_FCN_UNKNOWN, RTCM_MAX_TOW_MS};
use rtcm3::{Constellation, DecodeError, MsmMessage, MsmType, ObsFlags, RtcmMessage};

/// Header fields between the epoch time and the masks.
fn put_msm_fixed(w: &mut BitWriter) {
    w.put_bit(false); // multiple
    w.put(0, 3); // iods
    w.put(0, 7); // reserved
    w.put(0, 2); // steering
    w.put(0, 2); // ext_clock
    w.put_bit(false); // div_free
    w.put(0, 3); // smooth
}

/// Writes `size` mask bits, setting the slots listed in `slots`.
fn put_mask(w: &mut BitWriter, slots: &[usize], size: usize) {
    for i in 0..size {
        w.put_bit(slots.contains(&i));
    }
}

#[test]
fn msm4_gps_sparse_cells() {
    let mut w = BitWriter::new();
    w.put(1074, 12);
    w.put(500, 12);
    w.put(123_456_000, 30);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[2, 7], 64); // satellites 3 and 8
    put_mask(&mut w, &[1, 5, 9], 32); // three signal slots
    // cells, row-major over 2 sats x 3 sigs
    put_mask(&mut w, &[0, 2, 4], 6);

    // satellite block: rough ranges then 1/1024 refinements
    w.put(70, 8);
    w.put(255, 8); // invalid
    w.put(512, 10);
    w.put(0, 10);

    // signal block, 3 cells
    w.put_signed(1000, 15);
    w.put_signed(-800, 15);
    w.put_signed(40, 15);
    w.put_signed(2000, 22);
    w.put_signed(-(1 << 21), 22); // phase sentinel on cell 1
    w.put_signed(60, 22);
    w.put(5, 4);
    w.put(0, 4);
    w.put(15, 4);
    w.put_bit(true);
    w.put_bit(false);
    w.put_bit(false);
    w.put(40, 6);
    w.put(0, 6); // cnr absent on cell 1
    w.put(63, 6);
    let buf = w.into_bytes();

    let msg = MsmMessage::decode_msm4(&buf).unwrap();
    assert_eq!(msg.header.msg_num, 1074);
    assert_eq!(msg.header.stn_id, 500);
    assert_eq!(msg.header.tow_ms, 123_456_000);
    assert_eq!(msg.header.constellation(), Some(Constellation::Gps));
    assert_eq!(msg.header.msm_type(), Some(MsmType::Msm4));
    assert_eq!(msg.header.num_sats(), 2);
    assert_eq!(msg.header.num_sigs(), 3);
    assert_eq!(msg.header.num_cells(), 3);
    assert!(msg.header.sat_present(2) && msg.header.sat_present(7));
    assert!(msg.header.sig_present(1) && msg.header.sig_present(5) && msg.header.sig_present(9));

    let sats = msg.satellites();
    assert_eq!(sats[0].rough_range_ms, 70.5);
    // the invalid rough range is stored as received
    assert_eq!(sats[1].rough_range_ms, 255.0);

    let cells = msg.signals();
    assert_eq!(cells.len(), 3);

    // cell 0: (sat 3, first signal), fully valid
    let c0 = &cells[0];
    assert_eq!(c0.pseudorange_ms, 70.5 + 1000.0 * C_1_2P24);
    assert_eq!(c0.carrier_phase_ms, 70.5 + 2000.0 * C_1_2P29);
    assert_eq!(c0.lock_time_s, 0.512);
    assert!(c0.hca_indicator);
    assert_eq!(c0.cnr_db_hz, 40.0);
    assert!(c0.flags.contains(ObsFlags::VALID_PR));
    assert!(c0.flags.contains(ObsFlags::VALID_CP));
    assert!(c0.flags.contains(ObsFlags::VALID_LOCK));
    assert!(c0.flags.contains(ObsFlags::VALID_CNR));
    // MSM4 carries no rates
    assert!(!c0.flags.contains(ObsFlags::VALID_DOP));
    assert_eq!(c0.range_rate_m_s, 0.0);

    // cell 1: (sat 3, third signal), phase sentinel
    let c1 = &cells[1];
    assert!(c1.flags.contains(ObsFlags::VALID_PR));
    assert!(!c1.flags.contains(ObsFlags::VALID_CP));
    assert_eq!(c1.carrier_phase_ms, 0.0);
    assert!(!c1.flags.contains(ObsFlags::VALID_CNR));

    // cell 2 belongs to the satellite with the invalid rough range
    let c2 = &cells[2];
    assert!(!c2.flags.contains(ObsFlags::VALID_PR));
    assert!(!c2.flags.contains(ObsFlags::VALID_CP));
    assert_eq!(c2.pseudorange_ms, 0.0);
    assert_eq!(c2.carrier_phase_ms, 0.0);
    // lock time and cnr still come through
    assert_eq!(c2.lock_time_s, 524.288);
    assert_eq!(c2.cnr_db_hz, 63.0);
}

#[test]
fn msm5_glo_rates_and_fcn() {
    let mut w = BitWriter::new();
    w.put(1085, 12);
    w.put(500, 12);
    w.put(5, 3); // day of week, skipped
    w.put(43_200_000, 27); // time of day
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[4], 64);
    put_mask(&mut w, &[0, 1], 32);
    put_mask(&mut w, &[0, 1], 2);

    // satellite block with sat info and rough rates
    w.put(80, 8);
    w.put(9, 4); // FCN as stored (channel +2)
    w.put(256, 10);
    w.put_signed(-100, 14);

    // signal block, 2 cells
    w.put_signed(0, 15);
    w.put_signed(0, 15);
    w.put_signed(0, 22);
    w.put_signed(0, 22);
    w.put(1, 4);
    w.put(1, 4);
    w.put_bit(false);
    w.put_bit(false);
    w.put(30, 6);
    w.put(30, 6);
    w.put_signed(500, 15); // +0.05 m/s
    w.put_signed(-(1 << 14), 15); // rate sentinel
    let buf = w.into_bytes();

    let msg = MsmMessage::decode_msm5(&buf).unwrap();
    assert_eq!(msg.header.tow_ms, 43_200_000);
    assert_eq!(msg.header.constellation(), Some(Constellation::Glo));

    let sat = &msg.satellites()[0];
    assert_eq!(sat.rough_range_ms, 80.25);
    assert_eq!(sat.rough_range_rate_m_s, -100.0);
    assert_eq!(sat.glo_fcn, 9);

    let cells = msg.signals();
    assert_eq!(cells[0].range_rate_m_s, -100.0 + 500.0 * 0.0001);
    assert!(cells[0].flags.contains(ObsFlags::VALID_DOP));
    assert!(!cells[1].flags.contains(ObsFlags::VALID_DOP));
    assert_eq!(cells[1].range_rate_m_s, 0.0);
}

#[test]
fn msm4_glo_fcn_unknown() {
    let mut w = BitWriter::new();
    w.put(1084, 12);
    w.put(500, 12);
    w.put(0, 3);
    w.put(0, 27);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[0], 64);
    put_mask(&mut w, &[0], 32);
    put_mask(&mut w, &[0], 1);

    w.put(100, 8);
    w.put(0, 10);

    w.put_signed(0, 15);
    w.put_signed(0, 22);
    w.put(0, 4);
    w.put_bit(false);
    w.put(20, 6);
    let buf = w.into_bytes();

    let msg = MsmMessage::decode_msm4(&buf).unwrap();
    // MSM4 has no satellite info field to deliver the FCN
    assert_eq!(msg.satellites()[0].glo_fcn, MSM_GLO_FCN_UNKNOWN);
}

#[test]
fn msm7_extended_widths() {
    let mut w = BitWriter::new();
    w.put(1077, 12);
    w.put(0, 12);
    w.put(600_000_000, 30);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[10], 64);
    put_mask(&mut w, &[3], 32);
    put_mask(&mut w, &[0], 1);

    w.put(90, 8);
    w.put(0, 4); // sat info, unused outside GLONASS
    w.put(768, 10);
    w.put_signed(250, 14);

    w.put_signed(-4000, 20);
    w.put_signed(123_456, 24);
    w.put(800, 10); // saturated extended lock
    w.put_bit(true);
    w.put(320, 10); // 20.0 dB-Hz
    w.put_signed(-2500, 15);
    let buf = w.into_bytes();

    let msg = MsmMessage::decode_msm7(&buf).unwrap();
    let sat = &msg.satellites()[0];
    assert_eq!(sat.rough_range_ms, 90.75);
    assert_eq!(sat.rough_range_rate_m_s, 250.0);

    let cell = &msg.signals()[0];
    assert_eq!(cell.pseudorange_ms, 90.75 + -4000.0 * C_1_2P29);
    assert_eq!(cell.carrier_phase_ms, 90.75 + 123_456.0 * C_1_2P31);
    assert_eq!(cell.lock_time_s, 67_108.864);
    assert!(cell.hca_indicator);
    assert_eq!(cell.cnr_db_hz, 20.0);
    assert_eq!(cell.range_rate_m_s, 250.0 + -2500.0 * 0.0001);
    assert!(cell.flags.contains(ObsFlags::VALID_PR));
    assert!(cell.flags.contains(ObsFlags::VALID_CP));
    assert!(cell.flags.contains(ObsFlags::VALID_DOP));
}

#[test]
fn msm7_bds_underflowed_tow_normalises() {
    let mut w = BitWriter::new();
    w.put(1127, 12);
    w.put(0, 12);
    w.put((1 << 30) - 5000, 30); // -5000 ms relative to the week
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[], 64);
    put_mask(&mut w, &[], 32);
    let buf = w.into_bytes();

    let msg = MsmMessage::decode_msm7(&buf).unwrap();
    assert_eq!(msg.header.constellation(), Some(Constellation::Bds));
    assert_eq!(msg.header.tow_ms, RTCM_MAX_TOW_MS + 1 - 5000);
    assert_eq!(msg.header.tow_ms, 604_795_000);
    assert_eq!(msg.satellites().len(), 0);
    assert_eq!(msg.signals().len(), 0);
}

#[test]
fn oversized_cell_mask_is_rejected() {
    let mut w = BitWriter::new();
    w.put(1075, 12);
    w.put(0, 12);
    w.put(0, 30);
    put_msm_fixed(&mut w);
    // 9 satellites x 8 signals = 72 cells, above the 64-cell ceiling
    put_mask(&mut w, &[0, 1, 2, 3, 4, 5, 6, 7, 8], 64);
    put_mask(&mut w, &[0, 1, 2, 3, 4, 5, 6, 7], 32);
    let buf = w.into_bytes();

    assert_eq!(
        MsmMessage::decode_msm5(&buf),
        Err(DecodeError::InvalidField {
            msg: "MSM5",
            field: "cell_mask",
        })
    );
}

#[test]
fn msm_tow_out_of_range_is_rejected() {
    let mut w = BitWriter::new();
    w.put(1074, 12);
    w.put(0, 12);
    w.put(604_800_000, 30);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[], 64);
    put_mask(&mut w, &[], 32);
    let buf = w.into_bytes();

    assert_eq!(
        MsmMessage::decode_msm4(&buf),
        Err(DecodeError::InvalidField {
            msg: "MSM4",
            field: "tow_ms",
        })
    );
}

#[test]
fn msm_flavour_mismatch_is_rejected() {
    let mut w = BitWriter::new();
    w.put(1077, 12);
    w.put(0, 12);
    w.put(0, 30);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[], 64);
    put_mask(&mut w, &[], 32);
    let buf = w.into_bytes();

    assert_eq!(
        MsmMessage::decode_msm4(&buf),
        Err(DecodeError::MessageTypeMismatch {
            decoder: "MSM4",
            msg_num: 1077,
        })
    );
    assert!(MsmMessage::decode_msm7(&buf).is_ok());

    // a non-MSM number never matches any flavour
    let mut w = BitWriter::new();
    w.put(1004, 12);
    let buf = w.into_bytes();
    assert_eq!(
        MsmMessage::decode_msm4(&buf),
        Err(DecodeError::MessageTypeMismatch {
            decoder: "MSM4",
            msg_num: 1004,
        })
    );
}

#[test]
fn dispatch_routes_msm() {
    let mut w = BitWriter::new();
    w.put(1096, 12);
    w.put(0, 12);
    w.put(0, 30);
    put_msm_fixed(&mut w);
    put_mask(&mut w, &[], 64);
    put_mask(&mut w, &[], 32);
    let buf = w.into_bytes();

    let msg = RtcmMessage::decode(&buf).unwrap();
    let RtcmMessage::Msm(msm) = msg else {
        panic!("expected an MSM record");
    };
    assert_eq!(msm.header.msm_type(), Some(MsmType::Msm6));
    assert_eq!(msm.header.constellation(), Some(Constellation::Gal));

    // MSM1-3 are structurally valid but unsupported
    let mut w = BitWriter::new();
    w.put(1071, 12);
    let buf = w.into_bytes();
    assert_eq!(
        RtcmMessage::decode(&buf).unwrap(),
        RtcmMessage::Unknown { msg_num: 1071 }
    );
}
