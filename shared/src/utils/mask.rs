//! Masking helpers for values that must not reach the logs in full

/// Mask an email address for display, keeping the first character of the
/// local part and the whole domain: `alice@bank.com` -> `a****@bank.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}****@{}", first, domain)
        }
        _ => mask_value(email),
    }
}

/// Mask an arbitrary value, keeping only its last four characters
pub fn mask_value(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        "****".to_string()
    } else {
        let tail: String = value.chars().skip(count - 4).collect();
        format!("****{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@bank.com"), "a****@bank.com");
        assert_eq!(mask_email("a@b.com"), "a****@b.com");
    }

    #[test]
    fn test_mask_email_without_at_sign() {
        assert_eq!(mask_email("not-an-email"), "****mail");
        assert_eq!(mask_email("@b.com"), "****.com");
    }

    #[test]
    fn test_mask_short_value() {
        assert_eq!(mask_value("abc"), "****");
        assert_eq!(mask_value(""), "****");
    }
}
