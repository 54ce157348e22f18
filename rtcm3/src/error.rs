use core::fmt;

/// Error that is possible during message decoding.
///
/// Per-field validity (an observation whose pseudorange was encoded as
/// "absent", for example) is not an error; it travels inside the decoded
/// record via [`crate::ObsFlags`]. These variants mean the whole buffer has
/// to be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The message number in the buffer is not one this decoder handles.
    ///
    /// Callers typically look at `msg_num` and retry with another decoder.
    MessageTypeMismatch {
        decoder: &'static str,
        msg_num: u16,
    },
    /// A field violates a range constraint mandated by the standard.
    InvalidField {
        msg: &'static str,
        field: &'static str,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MessageTypeMismatch { decoder, msg_num } => {
                write!(f, "message number {msg_num} does not match the {decoder} decoder")
            },
            DecodeError::InvalidField { msg, field } => {
                write!(f, "invalid field {field} of message {msg}")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Error raised when converting a 1029 timestamp to civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    InvalidDate,
    InvalidTime,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeError::InvalidDate => f.write_str("invalid date"),
            DateTimeError::InvalidTime => f.write_str("invalid time"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DateTimeError {}
