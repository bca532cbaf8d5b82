//! Order number checksum.
//!
//! Order numbers are decimal strings protected by the Luhn (mod 10) check digit. Validation is
//! pure and is applied to every number before it reaches a store.

/// Returns `true` when `number` is at least two ASCII digits and passes the Luhn check.
///
/// Starting from the rightmost digit, every second digit is doubled (subtracting 9 when the
/// double exceeds 9) and the total must be a multiple of 10.
///
/// ```
/// use loyalty_ledger::luhn;
///
/// assert!(luhn::is_valid("12345678903"));
/// assert!(!luhn::is_valid("12345678901"));
/// ```
pub fn is_valid(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_numbers() {
        assert!(is_valid("12345678903"));
        assert!(is_valid("9278923470"));
        assert!(is_valid("79927398713"));
        assert!(is_valid("4561261212345467"));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        assert!(!is_valid("1234567890"));
        assert!(!is_valid("12345678901"));
        assert!(!is_valid("4561261212345464"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(!is_valid(""));
        assert!(!is_valid("0"));
        assert!(!is_valid("12a4"));
        assert!(!is_valid("1234567890a"));
        assert!(!is_valid(" 12345678903"));
        assert!(!is_valid("-12345678903"));
        // Full-width digits are not ASCII
        assert!(!is_valid("１２"));
    }

    #[test]
    fn test_all_zero_numbers_pass_checksum() {
        assert!(is_valid("00"));
    }
}
