//! Decimal to Roman numeral conversion.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RomanError {
    #[error("{0} cannot be written as a roman numeral (expected 1..=3999)")]
    OutOfRange(i64),
}

/// Values in descending order, subtractive pairs included.
const NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Render `n` in standard subtractive notation.
pub fn to_roman(n: i64) -> Result<String, RomanError> {
    let mut rest = u32::try_from(n)
        .ok()
        .filter(|v| (1..=3999).contains(v))
        .ok_or(RomanError::OutOfRange(n))?;

    let mut numeral = String::new();
    for (value, symbol) in NUMERALS {
        while rest >= value {
            numeral.push_str(symbol);
            rest -= value;
        }
    }
    Ok(numeral)
}
