//! Amounts in words using the Indian numbering system
//! (crore / lakh / thousand / hundred).

use thiserror::Error;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Smallest rupee value that no longer fits the 9-digit crore layout.
pub const WORDS_LIMIT: u64 = 1_000_000_000;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum WordsError {
    /// Integer part has ten or more digits.
    #[error("amount {0:.2} overflows crore range")]
    Overflow(f64),
    /// Negative, NaN or infinite input.
    #[error("amount {0} is not a valid quantity")]
    Invalid(f64),
}

/// 0..=99 in words; empty for zero.
fn two_digits(n: u64) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

/// Integer rupees in words, `Zero` for zero. Caller guarantees `< WORDS_LIMIT`.
fn rupees_in_words(rupees: u64) -> String {
    if rupees == 0 {
        return "Zero".to_string();
    }

    let crore = rupees / 10_000_000;
    let lakh = rupees / 100_000 % 100;
    let thousand = rupees / 1_000 % 100;
    let hundreds = rupees / 100 % 10;
    let rest = rupees % 100;

    let mut parts: Vec<String> = Vec::new();
    for (value, unit) in [(crore, "Crore"), (lakh, "Lakh"), (thousand, "Thousand")] {
        if value > 0 {
            parts.push(format!("{} {unit}", two_digits(value)));
        }
    }
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        parts.push(two_digits(rest));
    }

    parts.join(" ")
}

/// Spell out a currency amount, e.g. `150.75` →
/// `"One Hundred Fifty Rupees and Seventy Five Paise Only"`.
///
/// Paise are `round(fraction × 100)`; a fraction that rounds up to a full
/// rupee carries over. Amounts of a billion rupees or more are rejected
/// with [`WordsError::Overflow`].
pub fn number_to_words(amount: f64) -> Result<String, WordsError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(WordsError::Invalid(amount));
    }

    let whole = amount.floor();
    let mut paise = ((amount - whole) * 100.0).round() as u64;
    if whole >= WORDS_LIMIT as f64 {
        return Err(WordsError::Overflow(amount));
    }
    let mut rupees = whole as u64;
    if paise >= 100 {
        rupees += 1;
        paise -= 100;
    }
    if rupees >= WORDS_LIMIT {
        return Err(WordsError::Overflow(amount));
    }

    let mut out = format!("{} Rupees", rupees_in_words(rupees));
    if paise > 0 {
        out.push_str(&format!(" and {} Paise", two_digits(paise)));
    }
    out.push_str(" Only");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(number_to_words(0.0).unwrap(), "Zero Rupees Only");
    }

    #[test]
    fn test_rupees_and_paise() {
        assert_eq!(
            number_to_words(150.75).unwrap(),
            "One Hundred Fifty Rupees and Seventy Five Paise Only"
        );
    }

    #[test]
    fn test_lakh_and_crore() {
        assert_eq!(number_to_words(1_000_000.0).unwrap(), "Ten Lakh Rupees Only");
        assert_eq!(number_to_words(10_000_000.0).unwrap(), "One Crore Rupees Only");
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            number_to_words(1_000_000_000.0),
            Err(WordsError::Overflow(1_000_000_000.0))
        );
        assert!(matches!(
            number_to_words(12_345_678_901.5),
            Err(WordsError::Overflow(_))
        ));
    }

    #[test]
    fn test_largest_supported_amount() {
        assert_eq!(
            number_to_words(999_999_999.0).unwrap(),
            "Ninety Nine Crore Ninety Nine Lakh Ninety Nine Thousand Nine Hundred Ninety Nine Rupees Only"
        );
    }

    #[test]
    fn test_teens_and_single_digits_in_last_segment() {
        assert_eq!(number_to_words(115.0).unwrap(), "One Hundred Fifteen Rupees Only");
        assert_eq!(number_to_words(105.0).unwrap(), "One Hundred Five Rupees Only");
        assert_eq!(number_to_words(15.0).unwrap(), "Fifteen Rupees Only");
        assert_eq!(number_to_words(5.0).unwrap(), "Five Rupees Only");
        assert_eq!(number_to_words(110.0).unwrap(), "One Hundred Ten Rupees Only");
    }

    #[test]
    fn test_round_tens() {
        assert_eq!(number_to_words(20.0).unwrap(), "Twenty Rupees Only");
        assert_eq!(number_to_words(300.0).unwrap(), "Three Hundred Rupees Only");
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(
            number_to_words(1_205_019.0).unwrap(),
            "Twelve Lakh Five Thousand Nineteen Rupees Only"
        );
        assert_eq!(
            number_to_words(35.75).unwrap(),
            "Thirty Five Rupees and Seventy Five Paise Only"
        );
    }

    #[test]
    fn test_paise_only() {
        assert_eq!(
            number_to_words(0.5).unwrap(),
            "Zero Rupees and Fifty Paise Only"
        );
        assert_eq!(number_to_words(0.05).unwrap(), "Zero Rupees and Five Paise Only");
    }

    #[test]
    fn test_paise_carry_into_rupees() {
        assert_eq!(number_to_words(99.999).unwrap(), "One Hundred Rupees Only");
        assert!(matches!(
            number_to_words(999_999_999.999),
            Err(WordsError::Overflow(_))
        ));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(number_to_words(-1.0), Err(WordsError::Invalid(_))));
        assert!(matches!(number_to_words(f64::NAN), Err(WordsError::Invalid(_))));
        assert!(matches!(
            number_to_words(f64::INFINITY),
            Err(WordsError::Invalid(_))
        ));
    }
}
