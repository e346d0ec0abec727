//! Fixed-width digit sequences used for secrets and guesses

use std::fmt;

/// A code of `width` decimal digits, most significant first
///
/// Guesses may start with zero; secrets never do (the generator enforces
/// the range). Digits are stored individually so scoring never has to
/// re-split the number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    digits: Vec<u8>,
}

impl Code {
    /// Splits `value` into exactly `width` digits, padding with leading zeros.
    pub fn from_value(value: u32, width: u8) -> Self {
        let mut digits = vec![0u8; width as usize];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Self { digits }
    }

    /// Builds a code from digits that are already known to be 0..=9.
    pub(crate) fn from_digits(digits: Vec<u8>) -> Self {
        debug_assert!(digits.iter().all(|d| *d < 10));
        Self { digits }
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn width(&self) -> u8 {
        self.digits.len() as u8
    }

    pub fn value(&self) -> u32 {
        self.digits
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + *digit as u32)
    }

    pub fn digit_sum(&self) -> u32 {
        self.digits.iter().map(|d| *d as u32).sum()
    }

    pub fn is_palindrome(&self) -> bool {
        self.digits.iter().eq(self.digits.iter().rev())
    }

    pub fn has_repeated_digit(&self) -> bool {
        let counts = self.digit_counts();
        counts.iter().any(|count| *count > 1)
    }

    /// Occurrences of each digit value, indexed 0..=9.
    pub fn digit_counts(&self) -> [u8; 10] {
        let mut counts = [0u8; 10];
        for digit in &self.digits {
            counts[*digit as usize] += 1;
        }
        counts
    }

    pub fn reversed(&self) -> Self {
        Self {
            digits: self.digits.iter().rev().copied().collect(),
        }
    }

    /// Adds one to every digit, wrapping 9 to 0.
    pub fn incremented(&self) -> Self {
        Self {
            digits: self.digits.iter().map(|d| (d + 1) % 10).collect(),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in &self.digits {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Smallest value with `width` digits and no leading zero.
pub fn lower_bound(width: u8) -> u32 {
    10u32.pow(width as u32 - 1)
}

/// Largest value with `width` digits.
pub fn upper_bound(width: u8) -> u32 {
    10u32.pow(width as u32) - 1
}

/// The value made of `width` sevens, e.g. 7777 for width 4.
pub fn all_sevens(width: u8) -> u32 {
    upper_bound(width) / 9 * 7
}
