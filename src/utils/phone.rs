// utils/phone.rs
use regex::Regex;

/// Strip everything that is not a digit. Comparison and storage always
/// happen on the normalized form.
pub fn strip_non_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accepted Kenyan formats: 2547xxxxxxxx, 2541xxxxxxxx, 07xxxxxxxx, 01xxxxxxxx.
pub fn is_valid_kenyan_phone(phone: &str) -> bool {
    let digits = strip_non_digits(phone);
    let re = Regex::new(r"^(2547|2541|07|01)\d{8}$").unwrap();
    re.is_match(&digits)
}

/// Normalize a Kenyan phone number to the international 254... form.
/// Returns None when the input is not a recognized Kenyan number.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits = strip_non_digits(phone);

    if !is_valid_kenyan_phone(&digits) {
        return None;
    }

    if let Some(rest) = digits.strip_prefix('0') {
        return Some(format!("254{}", rest));
    }

    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_format() {
        assert_eq!(
            normalize_phone("0712345678"),
            Some("254712345678".to_string())
        );
        assert_eq!(
            normalize_phone("0112345678"),
            Some("254112345678".to_string())
        );
    }

    #[test]
    fn test_normalize_international_format() {
        assert_eq!(
            normalize_phone("254712345678"),
            Some("254712345678".to_string())
        );
        assert_eq!(
            normalize_phone("254112345678"),
            Some("254112345678".to_string())
        );
    }

    #[test]
    fn test_normalize_strips_spacing_and_punctuation() {
        assert_eq!(
            normalize_phone("+254 712 345 678"),
            Some("254712345678".to_string())
        );
        assert_eq!(
            normalize_phone("0712-345-678"),
            Some("254712345678".to_string())
        );
    }

    #[test]
    fn test_same_number_in_any_format_normalizes_identically() {
        let a = normalize_phone("0712345678").unwrap();
        let b = normalize_phone("254712345678").unwrap();
        let c = normalize_phone("+254712345678").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("0812345678"), None); // not an 07/01 prefix
        assert_eq!(normalize_phone("25571234567"), None); // Tanzanian prefix
        assert_eq!(normalize_phone("07123456789"), None); // one digit too many
        assert_eq!(normalize_phone("071234567"), None); // one digit short
    }

    #[test]
    fn test_is_valid_kenyan_phone() {
        assert!(is_valid_kenyan_phone("0712345678"));
        assert!(is_valid_kenyan_phone("254112345678"));
        assert!(!is_valid_kenyan_phone("not a number"));
    }
}
