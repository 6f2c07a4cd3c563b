//! Contact validation helpers
//!
//! Loose structural checks used by profile and user forms. The backend is
//! authoritative; these only catch obvious typos before a request is sent.

/// Checks for `local@domain.tld` shape with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Accepts digits, spaces, `-`, `(`, `)` and an optional leading `+`,
/// with at least ten digits overall
pub fn is_valid_phone_number(phone: &str) -> bool {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    if body.is_empty() {
        return false;
    }

    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();

    allowed && digits >= 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_valid_phone_number("+1 (555) 123-4567"));
        assert!(is_valid_phone_number("5551234567"));
        assert!(!is_valid_phone_number("555-1234"));
        assert!(!is_valid_phone_number("555 123 4567 ext"));
        assert!(!is_valid_phone_number("+"));
    }
}
