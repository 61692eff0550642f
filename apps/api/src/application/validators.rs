use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Keeps only ASCII digits ("123.456.789-09" -> "12345678909").
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalizes a CPF to its 11 digits. Returns None when it cannot be one.
pub fn normalize_cpf(value: &str) -> Option<String> {
    let digits = digits_only(value);
    (digits.len() == 11).then_some(digits)
}

/// Normalizes a WhatsApp number to digits, prefixing Brazil's country code
/// when only DDD + number were given.
pub fn normalize_whatsapp(value: &str) -> Option<String> {
    let digits = digits_only(value);
    match digits.len() {
        10 | 11 => Some(format!("55{digits}")),
        12 | 13 => Some(digits),
        _ => None,
    }
}

/// Validates a hex color such as `#6366F1` or `#fff`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validates an object storage path for uploaded assets.
/// Rules:
/// - 1-255 characters, relative (no leading slash)
/// - Segments of ASCII letters, digits, `-`, `_` and `.`
/// - No empty, `.` or `..` segments
pub fn is_valid_asset_path(path: &str) -> bool {
    if path.is_empty() || path.len() > 255 || path.starts_with('/') {
        return false;
    }

    path.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    })
}
