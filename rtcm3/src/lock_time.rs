//! Lock time indicator expansion.
//!
//! RTCM carries the carrier-lock duration in three encodings, each a
//! piecewise-linear ladder that doubles its resolution at every breakpoint.
//! The tables below come straight out of RTCM 10403.3.

/// Expands the 7-bit Lock Time Indicator (DF013, DF019, DF043, DF049) into
/// integer seconds.
///
/// RTCM 10403.3 Table 3.4-2.
pub fn from_lock_ind(lock: u8) -> u32 {
    let lock = u32::from(lock);
    if lock < 24 {
        return lock;
    }
    if lock < 48 {
        return 2 * lock - 24;
    }
    if lock < 72 {
        return 4 * lock - 120;
    }
    if lock < 96 {
        return 8 * lock - 408;
    }
    if lock < 120 {
        return 16 * lock - 1176;
    }
    if lock < 127 {
        return 32 * lock - 3096;
    }
    937
}

/// Expands the 4-bit Lock Time Indicator DF402 into seconds.
///
/// RTCM 10403.3 Table 3.5-74.
pub fn decode_msm_lock_time(lock: u8) -> f64 {
    // The MSB nibble is reserved
    let lock = lock & 0x0f;

    if lock == 0 {
        return 0.0;
    }
    f64::from(32u32 << (lock - 1)) / 1000.0
}

/// Expands the Extended Lock Time Indicator DF407 into milliseconds.
///
/// RTCM 10403.3 Table 3.5-75.
pub fn from_msm_lock_ind_ext(lock: u16) -> u32 {
    let lock = u32::from(lock);
    if lock < 64 {
        return lock;
    }
    if lock < 96 {
        return 2 * lock - 64;
    }
    if lock < 128 {
        return 4 * lock - 256;
    }
    if lock < 160 {
        return 8 * lock - 768;
    }
    if lock < 192 {
        return 16 * lock - 2048;
    }
    if lock < 224 {
        return 32 * lock - 5120;
    }
    if lock < 256 {
        return 64 * lock - 12288;
    }
    if lock < 288 {
        return 128 * lock - 28672;
    }
    if lock < 320 {
        return 256 * lock - 65536;
    }
    if lock < 352 {
        return 512 * lock - 147456;
    }
    if lock < 384 {
        return 1024 * lock - 327680;
    }
    if lock < 416 {
        return 2048 * lock - 720896;
    }
    if lock < 448 {
        return 4096 * lock - 1572864;
    }
    if lock < 480 {
        return 8192 * lock - 3407872;
    }
    if lock < 512 {
        return 16384 * lock - 7340032;
    }
    if lock < 544 {
        return 32768 * lock - 15728640;
    }
    if lock < 576 {
        return 65536 * lock - 33554432;
    }
    if lock < 608 {
        return 131072 * lock - 71303168;
    }
    if lock < 640 {
        return 262144 * lock - 150994944;
    }
    if lock < 672 {
        return 524288 * lock - 318767104;
    }
    if lock < 704 {
        return 1048576 * lock - 671088640;
    }
    67108864
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn legacy_table_is_monotonic_and_saturates() {
        let mut prev = 0;
        for lock in 0..=127u8 {
            let value = from_lock_ind(lock);
            assert!(value >= prev, "table decreased at indicator {lock}");
            prev = value;
        }
        assert_eq!(from_lock_ind(0), 0);
        assert_eq!(from_lock_ind(23), 23);
        assert_eq!(from_lock_ind(24), 24);
        assert_eq!(from_lock_ind(126), 936);
        assert_eq!(from_lock_ind(127), 937);
    }

    #[test]
    fn msm_table_pinned_values() {
        assert_eq!(decode_msm_lock_time(0), 0.0);
        assert_eq!(decode_msm_lock_time(1), 0.032);
        assert_eq!(decode_msm_lock_time(15), 524.288);
        // the reserved nibble is ignored
        assert_eq!(decode_msm_lock_time(0xf0), 0.0);
        assert_eq!(decode_msm_lock_time(0xff), 524.288);
    }

    #[test]
    fn extended_table_is_monotonic_and_saturates() {
        let mut prev = 0;
        for lock in 0..=1023u16 {
            let value = from_msm_lock_ind_ext(lock);
            assert!(value >= prev, "table decreased at indicator {lock}");
            prev = value;
        }
        assert_eq!(from_msm_lock_ind_ext(0), 0);
        assert_eq!(from_msm_lock_ind_ext(63), 63);
        assert_eq!(from_msm_lock_ind_ext(64), 64);
        assert_eq!(from_msm_lock_ind_ext(703), 1048576 * 703 - 671088640);
        for lock in 704..=1023 {
            assert_eq!(from_msm_lock_ind_ext(lock), 67108864);
        }
    }
}
