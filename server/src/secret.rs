//! Secret code generation
//!
//! A secret is derived from a uniform draw by a fixed scramble (reverse on an
//! even digit sum, increment every digit otherwise), palindromes collapse to
//! the all-sevens value, and the difficulty tier filters the result. The rng
//! is a parameter so that a seeded generator reproduces the same secrets.

use crate::code::{all_sevens, lower_bound, upper_bound, Code};
use crate::config::{check_code_shape, Difficulty};
use crate::error::ConfigError;
use log::debug;
use rand::Rng;

/// Draws secrets until one passes the range check and the difficulty filter.
pub fn generate<R: Rng + ?Sized>(
    digit_width: u8,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Code, ConfigError> {
    check_code_shape(digit_width, difficulty)?;

    let min = lower_bound(digit_width);
    let max = upper_bound(digit_width);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let Some(candidate) = scramble(rng.gen_range(min..=max), digit_width) else {
            continue;
        };

        if accepts(difficulty, &candidate) {
            debug!("Generated {} secret after {} draw(s)", difficulty, attempts);
            return Ok(candidate);
        }
    }
}

/// Applies the deterministic part of generation to one draw.
///
/// Returns `None` when the result leaves the digit-width range, i.e. when a
/// leading zero appears after reversing or wrapping.
pub fn scramble(base: u32, digit_width: u8) -> Option<Code> {
    let digits = Code::from_value(base, digit_width);

    let modified = if digits.digit_sum() % 2 == 0 {
        digits.reversed()
    } else {
        digits.incremented()
    };

    let code = if modified.is_palindrome() {
        Code::from_value(all_sevens(digit_width), digit_width)
    } else {
        modified
    };

    let value = code.value();
    (lower_bound(digit_width)..=upper_bound(digit_width))
        .contains(&value)
        .then_some(code)
}

fn accepts(difficulty: Difficulty, code: &Code) -> bool {
    match difficulty {
        Difficulty::Easy => !code.has_repeated_digit(),
        Difficulty::Medium => true,
        Difficulty::Hard => code.has_repeated_digit(),
    }
}
