//! National ID (CPF) formatting.
//!
//! Records store the masked form (`XXX.XXX.XXX-XX`); every comparison goes
//! through [`normalize`] on both sides, so formatting is presentation-only.

/// Number of digits in a complete national ID.
pub const DIGITS: usize = 11;

/// Length of a complete masked national ID, separators included.
pub const MASKED_LEN: usize = 14;

/// Strip every non-digit character.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Progressive mask, applied as the citizen types.
///
/// Digits beyond the eleventh are dropped. Separators appear once the digit
/// count passes 3, 6 and 9.
pub fn mask(raw: &str) -> String {
    let digits: String = normalize(raw).chars().take(DIGITS).collect();
    let n = digits.len();

    if n > 9 {
        format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        )
    } else if n > 6 {
        format!("{}.{}.{}", &digits[..3], &digits[3..6], &digits[6..])
    } else if n > 3 {
        format!("{}.{}", &digits[..3], &digits[3..])
    } else {
        digits
    }
}

/// True when the value carries all eleven digits.
pub fn is_complete(raw: &str) -> bool {
    normalize(raw).len() == DIGITS
}

/// Masked form with all but the last four digits hidden, for logs.
pub fn redact(raw: &str) -> String {
    let masked = mask(raw);
    let total = masked.chars().filter(|c| c.is_ascii_digit()).count();
    let keep_from = total.saturating_sub(4);
    let mut seen = 0;
    masked
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= keep_from {
                    return '*';
                }
            }
            c
        })
        .collect()
}
