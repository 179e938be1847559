//! Decoding of `\uXXXX` escapes.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! into a UTF-16 code unit. Surrogate halves are returned as-is; pairing them
//! up is left to [`combine_surrogates`].

use crate::error::LexErrorKind;

/// Accumulates four hexadecimal digits into one UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a single ASCII hex digit into its 0..=15 value.
    #[inline]
    fn hex_val(c: char) -> Option<u16> {
        c.to_digit(16).and_then(|d| u16::try_from(d).ok())
    }

    /// Feeds one digit.
    ///
    /// Returns `Ok(None)` until the fourth digit arrives, then the decoded
    /// code unit, after which the buffer is empty again.
    pub fn feed(&mut self, c: char) -> Result<Option<u16>, LexErrorKind> {
        let d = Self::hex_val(c).ok_or(LexErrorKind::InvalidUnicodeEscape)?;
        debug_assert!(self.len < 4);

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        *self = Self::new();
        Ok(Some(unit))
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Joins a high and a low surrogate into the scalar value they encode.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
