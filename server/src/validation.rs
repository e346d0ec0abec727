//! Guess validation
//!
//! Raw inbound text becomes a [`Code`] only when, after trimming surrounding
//! whitespace (carriage returns included), it is exactly `digit_width` ASCII
//! digits. Anything else is rejected without touching coordinator state.

use crate::code::Code;
use crate::error::ValidationError;

pub fn parse_guess(input: &str, digit_width: u8) -> Result<Code, ValidationError> {
    let trimmed = shared::clean_input(input);

    let length = trimmed.chars().count();
    if length != digit_width as usize {
        return Err(ValidationError::WrongLength {
            expected: digit_width,
            found: length,
        });
    }

    let digits = trimmed
        .bytes()
        .map(|byte| {
            if byte.is_ascii_digit() {
                Ok(byte - b'0')
            } else {
                Err(ValidationError::NonDigit)
            }
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(Code::from_digits(digits))
}
