#![cfg(feature = "serde")]

//! Records serialize to JSON when the `serde` feature is on.

mod common;

use common::{put_obs_header, BitWriter};
use rtcm3::{Msg1005, ObsMessage};

#[test]
fn obs_message_serializes() {
    let mut w = BitWriter::new();
    put_obs_header(&mut w, 1001, 7, 1000, 30, false, 1);
    w.put(3, 6);
    w.put(0, 1);
    w.put(1_500_000, 24);
    w.put_signed(0, 20);
    w.put(10, 7);
    let buf = w.into_bytes();

    let msg = ObsMessage::decode_1001(&buf).unwrap();
    let json: serde_json::Value = serde_json::to_value(msg).unwrap();
    assert_eq!(json["header"]["msg_num"], 1001);
    assert_eq!(json["header"]["stn_id"], 7);
    assert_eq!(json["sats"][0]["sv_id"], 3);
}

#[test]
fn msg_1005_serializes() {
    let mut w = BitWriter::new();
    w.put(1005, 12);
    w.put(777, 12);
    w.put(0, 6);
    w.put(0b1000, 4); // gps only, not a reference station
    w.put_signed(10_000, 38);
    w.put(0, 2); // osc + reserved
    w.put_signed(0, 38);
    w.put(0, 2);
    w.put_signed(0, 38);
    let buf = w.into_bytes();

    let msg = Msg1005::decode(&buf).unwrap();
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"stn_id\":777"));
    assert!(json.contains("\"arp_x\":1.0"));
}
