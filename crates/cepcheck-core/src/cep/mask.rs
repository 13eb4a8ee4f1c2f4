//! Input mask for CEP fields
//!
//! A CEP is eight digits, displayed as `NNNNN-NNN`. The mask is applied to
//! whatever the user typed so far, so partial values stay partial.

/// Number of digits in a complete CEP
pub const CEP_DIGITS: usize = 8;

/// Digits kept before the hyphen
const PREFIX_DIGITS: usize = 5;

/// Strip every character that is not an ASCII digit
pub fn clean_cep(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format raw input as `NNNNN-NNN`
///
/// Up to five digits are returned as-is. Past that, a hyphen follows the fifth
/// digit and anything beyond the eighth digit is dropped.
pub fn mask_cep(raw: &str) -> String {
    let digits = clean_cep(raw);
    if digits.len() <= PREFIX_DIGITS {
        return digits;
    }

    // Only ASCII digits are left, so byte offsets are char offsets
    let end = digits.len().min(CEP_DIGITS);
    format!("{}-{}", &digits[..PREFIX_DIGITS], &digits[PREFIX_DIGITS..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_strips_everything_but_digits() {
        assert_eq!(clean_cep("01310-930"), "01310930");
        assert_eq!(clean_cep(" 01.310 930 "), "01310930");
        assert_eq!(clean_cep("abc"), "");
        // Non-ASCII digits are not CEP digits
        assert_eq!(clean_cep("٠١٢3"), "3");
    }

    #[test]
    fn test_mask_short_values_untouched() {
        assert_eq!(mask_cep(""), "");
        assert_eq!(mask_cep("0"), "0");
        assert_eq!(mask_cep("01310"), "01310");
    }

    #[test]
    fn test_mask_inserts_hyphen_and_truncates() {
        assert_eq!(mask_cep("013109"), "01310-9");
        assert_eq!(mask_cep("01310930"), "01310-930");
        assert_eq!(mask_cep("0131093099"), "01310-930");
        assert_eq!(mask_cep("01310-930"), "01310-930");
    }

    #[test]
    fn test_typed_digit_by_digit() {
        let mut field = String::new();
        for c in "01310930".chars() {
            field.push(c);
            field = mask_cep(&field);
        }
        assert_eq!(field, "01310-930");
    }

    #[test]
    fn test_backspace_over_hyphen() {
        let mut field = mask_cep("013109");
        assert_eq!(field, "01310-9");
        field.pop();
        field = mask_cep(&field);
        assert_eq!(field, "01310");
    }

    proptest! {
        #[test]
        fn prop_mask_shape(input in ".*") {
            let masked = mask_cep(&input);
            prop_assert!(masked.len() <= 9);
            prop_assert!(masked.chars().all(|c| c.is_ascii_digit() || c == '-'));

            match masked.find('-') {
                Some(pos) => {
                    prop_assert_eq!(pos, 5);
                    prop_assert_eq!(masked.matches('-').count(), 1);
                    prop_assert!(masked.len() > 6);
                }
                None => prop_assert!(masked.len() <= 5),
            }
        }

        #[test]
        fn prop_mask_is_idempotent(input in ".*") {
            let once = mask_cep(&input);
            prop_assert_eq!(mask_cep(&once), once.clone());
        }
    }
}
