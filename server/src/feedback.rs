//! Guess scoring and hint selection

use crate::code::Code;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Every clue the server can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    FirstHalfPlacement,
    SecondHalfPlacement,
    MostlyEvenDigits,
    MostlyOddDigits,
    GuessRepeatedMissingDigit,
    SecretRepeatingDigit,
    MostlyHighDigits,
    MostlyLowDigits,
    SumBelowTen,
    SumTenToTwenty,
    SumTwentyToThirty,
    SumAboveThirty,
    IncreasingOrder,
    DecreasingOrder,
    VeryClose,
    GettingCloser,
    StillFar,
    Fallback,
}

impl Hint {
    pub const ALL: [Hint; 18] = [
        Hint::FirstHalfPlacement,
        Hint::SecondHalfPlacement,
        Hint::MostlyEvenDigits,
        Hint::MostlyOddDigits,
        Hint::GuessRepeatedMissingDigit,
        Hint::SecretRepeatingDigit,
        Hint::MostlyHighDigits,
        Hint::MostlyLowDigits,
        Hint::SumBelowTen,
        Hint::SumTenToTwenty,
        Hint::SumTwentyToThirty,
        Hint::SumAboveThirty,
        Hint::IncreasingOrder,
        Hint::DecreasingOrder,
        Hint::VeryClose,
        Hint::GettingCloser,
        Hint::StillFar,
        Hint::Fallback,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            Self::FirstHalfPlacement => {
                "At least 1 of the correctly placed digit(s) are in the FIRST half"
            }
            Self::SecondHalfPlacement => {
                "At least 1 of the correctly placed digit(s) are in the SECOND half"
            }
            Self::MostlyEvenDigits => "The secret contains mostly EVEN digits",
            Self::MostlyOddDigits => "The secret contains mostly ODD digits",
            Self::GuessRepeatedMissingDigit => {
                "Guess repeated a digit that does NOT exist in the secret"
            }
            Self::SecretRepeatingDigit => "The secret contains a repeating digit",
            Self::MostlyHighDigits => "Most digits in the secret are HIGH (5-9)",
            Self::MostlyLowDigits => "Most digits in the secret are LOW (0-4)",
            Self::SumBelowTen => "The sum of the secret digits is lower than 10",
            Self::SumTenToTwenty => "The sum of the secret digits is between 10 and 20",
            Self::SumTwentyToThirty => "The sum of the secret digits is between 20 and 30",
            Self::SumAboveThirty => "The sum of the secret digits is greater than 30",
            Self::IncreasingOrder => "The secret digits are in a strictly INCREASING order",
            Self::DecreasingOrder => "The secret digits are in a strictly DECREASING order",
            Self::VeryClose => "Guess is VERY close overall",
            Self::GettingCloser => "Guess is getting closer",
            Self::StillFar => "Guess is still FAR from the secret",
            Self::Fallback => "You are the best!",
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Result of scoring one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct_place: u8,
    pub wrong_place: u8,
    pub hint: Hint,
}

impl Feedback {
    pub fn is_win(&self, digit_width: u8) -> bool {
        self.correct_place == digit_width
    }
}

/// Scores `guess` against `secret` and picks one hint using `rng`.
///
/// Both codes must have the same width; the coordinator only ever passes a
/// guess parsed with the session's width.
pub fn score<R: Rng + ?Sized>(secret: &Code, guess: &Code, rng: &mut R) -> Feedback {
    let (correct_place, wrong_place) = count_matches(secret, guess);

    Feedback {
        correct_place,
        wrong_place,
        hint: choose_hint(secret, guess, rng),
    }
}

/// Two-pass multiset match: exact positions first, then greedy first-fit.
pub fn count_matches(secret: &Code, guess: &Code) -> (u8, u8) {
    let secret = secret.digits();
    let guess = guess.digits();
    debug_assert_eq!(secret.len(), guess.len());

    let mut used_secret = vec![false; secret.len()];
    let mut used_guess = vec![false; guess.len()];
    let mut correct_place = 0u8;
    let mut wrong_place = 0u8;

    for (i, (s, g)) in secret.iter().zip(guess).enumerate() {
        if s == g {
            correct_place += 1;
            used_secret[i] = true;
            used_guess[i] = true;
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if used_guess[i] {
            continue;
        }
        let found = secret
            .iter()
            .enumerate()
            .position(|(j, s)| !used_secret[j] && s == g);
        if let Some(j) = found {
            wrong_place += 1;
            used_guess[i] = true;
            used_secret[j] = true;
        }
    }

    (correct_place, wrong_place)
}

/// Every hint whose predicate holds for this secret/guess pair, in battery order.
pub fn candidate_hints(secret: &Code, guess: &Code) -> Vec<Hint> {
    let s = secret.digits();
    let g = guess.digits();
    let width = s.len();
    let half = width / 2;
    let mut hints = Vec::new();

    let matched: Vec<usize> = (0..width).filter(|&i| s[i] == g[i]).collect();
    if matched.iter().any(|&i| i < half) {
        hints.push(Hint::FirstHalfPlacement);
    }
    if matched.iter().any(|&i| i >= half) {
        hints.push(Hint::SecondHalfPlacement);
    }

    let even = s.iter().filter(|d| *d % 2 == 0).count();
    if even * 2 > width {
        hints.push(Hint::MostlyEvenDigits);
    }
    if (width - even) * 2 > width {
        hints.push(Hint::MostlyOddDigits);
    }

    let secret_counts = secret.digit_counts();
    let guess_counts = guess.digit_counts();
    if (0..10).any(|d| guess_counts[d] > 1 && secret_counts[d] == 0) {
        hints.push(Hint::GuessRepeatedMissingDigit);
    }
    if (0..10).any(|d| secret_counts[d] > 1 && guess_counts[d] == 1) {
        hints.push(Hint::SecretRepeatingDigit);
    }

    let high = s.iter().filter(|d| **d >= 5).count();
    if high * 2 > width {
        hints.push(Hint::MostlyHighDigits);
    }
    if (width - high) * 2 > width {
        hints.push(Hint::MostlyLowDigits);
    }

    hints.push(sum_bucket(secret.digit_sum()));

    if s.windows(2).all(|pair| pair[0] < pair[1]) {
        hints.push(Hint::IncreasingOrder);
    }
    if s.windows(2).all(|pair| pair[0] > pair[1]) {
        hints.push(Hint::DecreasingOrder);
    }

    hints.push(distance_bucket(total_distance(secret, guess)));

    hints
}

fn choose_hint<R: Rng + ?Sized>(secret: &Code, guess: &Code, rng: &mut R) -> Hint {
    let mut hints = candidate_hints(secret, guess);
    hints.shuffle(rng);
    hints.first().copied().unwrap_or(Hint::Fallback)
}

pub fn sum_bucket(sum: u32) -> Hint {
    match sum {
        0..=9 => Hint::SumBelowTen,
        10..=20 => Hint::SumTenToTwenty,
        21..=30 => Hint::SumTwentyToThirty,
        _ => Hint::SumAboveThirty,
    }
}

/// Sum of absolute per-position digit differences.
pub fn total_distance(secret: &Code, guess: &Code) -> u32 {
    secret
        .digits()
        .iter()
        .zip(guess.digits())
        .map(|(s, g)| s.abs_diff(*g) as u32)
        .sum()
}

pub fn distance_bucket(distance: u32) -> Hint {
    match distance {
        0..=9 => Hint::VeryClose,
        10..=19 => Hint::GettingCloser,
        _ => Hint::StillFar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn code(value: u32, width: u8) -> Code {
        Code::from_value(value, width)
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(count_matches(&code(1234, 4), &code(1234, 4)), (4, 0));
    }

    #[test]
    fn test_full_permutation() {
        assert_eq!(count_matches(&code(1234, 4), &code(4321, 4)), (0, 4));
    }

    #[test]
    fn test_partial_swap() {
        assert_eq!(count_matches(&code(1234, 4), &code(1243, 4)), (2, 2));
    }

    #[test]
    fn test_repeated_digits_counted_as_multiset() {
        // only one 1 in the secret
        assert_eq!(count_matches(&code(1234, 4), &code(1111, 4)), (1, 0));
        assert_eq!(count_matches(&code(1123, 4), &code(3111, 4)), (1, 2));
        assert_eq!(count_matches(&code(1122, 4), &code(2211, 4)), (0, 4));
        assert_eq!(count_matches(&code(5678, 4), &code(1234, 4)), (0, 0));
    }

    #[test]
    fn test_counts_never_exceed_width() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let secret = code(rand::Rng::gen_range(&mut rng, 1000..=9999), 4);
            let guess = code(rand::Rng::gen_range(&mut rng, 0..=9999), 4);
            let (correct, wrong) = count_matches(&secret, &guess);
            assert!(correct + wrong <= 4);
        }
    }

    #[test]
    fn test_score_win_detection() {
        let mut rng = StdRng::seed_from_u64(1);
        let feedback = score(&code(4821, 4), &code(4821, 4), &mut rng);
        assert!(feedback.is_win(4));
        assert_eq!(feedback.wrong_place, 0);

        let feedback = score(&code(4821, 4), &code(4812, 4), &mut rng);
        assert!(!feedback.is_win(4));
    }

    #[test]
    fn test_sum_buckets_are_exhaustive() {
        assert_eq!(sum_bucket(0), Hint::SumBelowTen);
        assert_eq!(sum_bucket(9), Hint::SumBelowTen);
        assert_eq!(sum_bucket(10), Hint::SumTenToTwenty);
        assert_eq!(sum_bucket(20), Hint::SumTenToTwenty);
        assert_eq!(sum_bucket(21), Hint::SumTwentyToThirty);
        assert_eq!(sum_bucket(30), Hint::SumTwentyToThirty);
        assert_eq!(sum_bucket(31), Hint::SumAboveThirty);
        assert_eq!(sum_bucket(72), Hint::SumAboveThirty);
    }

    #[test]
    fn test_distance_buckets() {
        assert_eq!(distance_bucket(0), Hint::VeryClose);
        assert_eq!(distance_bucket(9), Hint::VeryClose);
        assert_eq!(distance_bucket(10), Hint::GettingCloser);
        assert_eq!(distance_bucket(19), Hint::GettingCloser);
        assert_eq!(distance_bucket(20), Hint::StillFar);
        assert_eq!(total_distance(&code(1234, 4), &code(4321, 4)), 8);
        assert_eq!(total_distance(&code(9999, 4), &code(0, 4)), 36);
    }

    #[test]
    fn test_candidates_for_known_pair() {
        // secret 1234, guess 1243: matches at 0 and 1
        let hints = candidate_hints(&code(1234, 4), &code(1243, 4));
        assert_eq!(
            hints,
            vec![
                Hint::FirstHalfPlacement,
                Hint::MostlyLowDigits,
                Hint::SumTenToTwenty,
                Hint::IncreasingOrder,
                Hint::VeryClose,
            ]
        );
    }

    #[test]
    fn test_repetition_candidates() {
        // guess repeats 9, which the secret lacks; secret repeats 1, guessed once
        let hints = candidate_hints(&code(1123, 4), &code(1990, 4));
        assert!(hints.contains(&Hint::GuessRepeatedMissingDigit));
        assert!(hints.contains(&Hint::SecretRepeatingDigit));
        assert_eq!(
            hints
                .iter()
                .filter(|h| **h == Hint::GuessRepeatedMissingDigit)
                .count(),
            1
        );
    }

    #[test]
    fn test_decreasing_and_even() {
        let hints = candidate_hints(&code(8642, 4), &code(1111, 4));
        assert!(hints.contains(&Hint::DecreasingOrder));
        assert!(hints.contains(&Hint::MostlyEvenDigits));
        assert!(!hints.contains(&Hint::IncreasingOrder));
        assert!(!hints.contains(&Hint::FirstHalfPlacement));
    }

    #[test]
    fn test_hint_is_always_from_vocabulary() {
        let mut rng = StdRng::seed_from_u64(11);
        for width in 2..=8u8 {
            let max = crate::code::upper_bound(width);
            let min = crate::code::lower_bound(width);
            for _ in 0..200 {
                let secret = code(rand::Rng::gen_range(&mut rng, min..=max), width);
                let guess = code(rand::Rng::gen_range(&mut rng, 0..=max), width);
                let feedback = score(&secret, &guess, &mut rng);

                assert!(Hint::ALL.contains(&feedback.hint));
                assert_ne!(feedback.hint, Hint::Fallback);
                assert!(!feedback.hint.text().is_empty());
            }
        }
    }

    #[test]
    fn test_same_rng_state_same_feedback() {
        let secret = code(2468, 4);
        let guess = code(2486, 4);

        let first = score(&secret, &guess, &mut StdRng::seed_from_u64(99));
        let second = score(&secret, &guess, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}
