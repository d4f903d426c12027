//! Identifier validators
//!
//! Each filter returns its input unchanged when it has the right shape and
//! `None` otherwise. Values are never padded, truncated or re-formatted.

/// Keeps a value of exactly 10 characters
pub fn filter_asin(value: &str) -> Option<String> {
    (value.chars().count() == 10).then(|| value.to_string())
}

/// Keeps a value of exactly 10 ASCII digits
pub fn filter_isbn10(value: &str) -> Option<String> {
    all_digits_of_len(value, 10).then(|| value.to_string())
}

/// Keeps a value of exactly 13 ASCII digits
pub fn filter_isbn13(value: &str) -> Option<String> {
    all_digits_of_len(value, 13).then(|| value.to_string())
}

fn all_digits_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn10() {
        assert_eq!(filter_isbn10("1234567890"), Some("1234567890".to_string()));
        assert_eq!(filter_isbn10("123"), None);
        assert_eq!(filter_isbn10("12345678901"), None);
        assert_eq!(filter_isbn10("044631078X"), None);
        assert_eq!(filter_isbn10(""), None);
    }

    #[test]
    fn test_isbn13() {
        assert_eq!(
            filter_isbn13("9780446310789"),
            Some("9780446310789".to_string())
        );
        assert_eq!(filter_isbn13("0446310786"), None);
        assert_eq!(filter_isbn13("978-044631078"), None);
    }

    #[test]
    fn test_asin_checks_length_only() {
        assert_eq!(filter_asin("B00K0OI42W"), Some("B00K0OI42W".to_string()));
        assert_eq!(filter_asin("0446310786"), Some("0446310786".to_string()));
        assert_eq!(filter_asin("B00K0OI42"), None);
        assert_eq!(filter_asin(""), None);
    }
}
