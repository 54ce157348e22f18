//! Message type 1029: Unicode text string.

use core::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::bits::BitReader;
use crate::constants::RTCM_MAX_PAYLOAD_BYTES;
use crate::error::{DateTimeError, DecodeError};

/// Modified Julian Date epoch, 1858-11-17.
const MJD_EPOCH: (i32, u32, u32) = (1858, 11, 17);

/// Message type 1029: free-form UTF-8 text from the reference station,
/// stamped with the transmission time.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy)]
pub struct Msg1029 {
    pub stn_id: u16,
    /// Modified Julian Day number of the transmission (DF051).
    pub mjd_num: u16,
    /// UTC seconds of day (DF052).
    pub utc_sec_of_day: u32,
    /// Number of Unicode characters in the text (DF138); informational,
    /// may be less than the number of code units.
    pub unicode_chars: u8,
    /// Number of UTF-8 code units that follow (DF139).
    pub utf8_code_units_n: u8,
    pub utf8_code_units: [u8; RTCM_MAX_PAYLOAD_BYTES],
}

impl Default for Msg1029 {
    fn default() -> Self {
        Self {
            stn_id: 0,
            mjd_num: 0,
            utc_sec_of_day: 0,
            unicode_chars: 0,
            utf8_code_units_n: 0,
            utf8_code_units: [0; RTCM_MAX_PAYLOAD_BYTES],
        }
    }
}

impl Msg1029 {
    /// Decodes message type 1029 (Unicode text string).
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(buf);
        let msg_num = reader.unsigned(12) as u16;
        if msg_num != 1029 {
            return Err(DecodeError::MessageTypeMismatch {
                decoder: "1029",
                msg_num,
            });
        }

        let mut msg = Msg1029 {
            stn_id: reader.unsigned(12) as u16,
            mjd_num: reader.unsigned(16) as u16,
            utc_sec_of_day: reader.unsigned(17) as u32,
            unicode_chars: reader.unsigned(7) as u8,
            utf8_code_units_n: reader.unsigned(8) as u8,
            ..Default::default()
        };
        for byte in msg
            .utf8_code_units
            .iter_mut()
            .take(usize::from(msg.utf8_code_units_n))
        {
            *byte = reader.unsigned(8) as u8;
        }
        Ok(msg)
    }

    /// The raw UTF-8 payload.
    pub fn utf8_bytes(&self) -> &[u8] {
        &self.utf8_code_units[..usize::from(self.utf8_code_units_n)]
    }

    /// The payload as text, if it is well-formed UTF-8.
    pub fn text(&self) -> Option<&str> {
        core::str::from_utf8(self.utf8_bytes()).ok()
    }

    /// Transmission time as civil UTC, from the MJD number and the seconds
    /// of day.
    pub fn datetime(&self) -> Result<DateTime<Utc>, DateTimeError> {
        let (y, m, d) = MJD_EPOCH;
        let date = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|epoch| epoch.checked_add_days(Days::new(u64::from(self.mjd_num))))
            .ok_or(DateTimeError::InvalidDate)?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(self.utc_sec_of_day, 0)
            .ok_or(DateTimeError::InvalidTime)?;
        Ok(NaiveDateTime::new(date, time).and_utc())
    }
}

impl fmt::Debug for Msg1029 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Msg1029")
            .field("stn_id", &self.stn_id)
            .field("mjd_num", &self.mjd_num)
            .field("utc_sec_of_day", &self.utc_sec_of_day)
            .field("unicode_chars", &self.unicode_chars)
            .field("utf8_code_units_n", &self.utf8_code_units_n)
            .field("text", &self.text().unwrap_or("<invalid utf-8>"))
            .finish()
    }
}

impl PartialEq for Msg1029 {
    fn eq(&self, other: &Self) -> bool {
        self.stn_id == other.stn_id
            && self.mjd_num == other.mjd_num
            && self.utc_sec_of_day == other.utc_sec_of_day
            && self.unicode_chars == other.unicode_chars
            && self.utf8_bytes() == other.utf8_bytes()
    }
}
