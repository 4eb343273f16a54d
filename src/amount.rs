use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Marker appended to every rendered amount and accepted (optionally) on input.
pub const CURRENCY: char = '$';

/// Errors that can occur when parsing an amount from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount '{0}'")]
    Invalid(String),
    #[error("amount '{0}' has more than {max} decimal places", max = Amount::PRECISION)]
    TooPrecise(String),
    #[error("amount '{0}' is out of range")]
    Overflow(String),
}

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
///
/// Rendered with exactly two decimals and a trailing [`CURRENCY`] marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;
    const PRECISION: usize = 4;

    pub const ZERO: Amount = Amount(0);

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    /// Whole currency units, no fraction.
    ///
    /// Any `i32` scaled by 4 decimal places fits the backing `i64`.
    pub fn from_units(units: i32) -> Self {
        Amount(i64::from(units) * Self::SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `self + rhs`, or `None` if the result is out of range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// `self - rhs`, or `None` if the result is out of range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Largest whole amount not greater than `self`.
    pub fn floor(self) -> Self {
        Amount(self.0.div_euclid(Self::SCALE) * Self::SCALE)
    }

    /// `floor(self) * percent / 100`, or `None` if the result is out of range.
    ///
    /// Exact: a whole unit split in hundredths always fits the scale.
    pub fn percent_of_floor(self, percent: u32) -> Option<Self> {
        self.0
            .div_euclid(Self::SCALE)
            .checked_mul(i64::from(percent))
            .and_then(|v| v.checked_mul(Self::SCALE / 100))
            .map(Amount)
    }

    /// Value in hundredths, rounded half to even.
    fn cents(self) -> i64 {
        let step = (Self::SCALE / 100).unsigned_abs();
        let abs = self.0.unsigned_abs();
        let mut cents = abs / step;
        let rest = abs % step;
        if rest * 2 > step || (rest * 2 == step && cents % 2 == 1) {
            cents += 1;
        }
        // |i64::MIN| / 100 fits
        let cents = cents as i64;
        if self.0 < 0 { -cents } else { cents }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.abs();
        write!(f, "{sign}{}.{:02}{CURRENCY}", abs / 100, abs % 100)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix(CURRENCY).unwrap_or(trimmed).trim_end();
        if number.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, unsigned) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number.strip_prefix('+').unwrap_or(number)),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if frac.len() > Self::PRECISION {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let overflow = || AmountError::Overflow(s.to_string());
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            let digits: i64 = frac.parse().map_err(|_| overflow())?;
            digits * 10_i64.pow((Self::PRECISION - frac.len()) as u32)
        };

        let value = whole
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -value } else { value }))
    }
}
