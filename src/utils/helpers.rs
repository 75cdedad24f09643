//! Small shared helpers

/// Extract the domain part of an email address, lowercased.
///
/// Returns `None` when the address has no `@` or an empty domain.
pub fn extract_email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.trim().to_lowercase())
}

/// Default display name for an email/password sign-up: the local part of
/// the address, matching what the platform shows before the user edits it.
pub fn display_name_from_email(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or(email)
        .to_string()
}

/// Normalize a college domain for storage and comparison.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('@').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_email_domain() {
        assert_eq!(
            extract_email_domain("student@svecw.edu.in"),
            Some("svecw.edu.in".to_string())
        );
        assert_eq!(
            extract_email_domain("a@B.EDU"),
            Some("b.edu".to_string())
        );
        assert_eq!(extract_email_domain("no-at-sign"), None);
        assert_eq!(extract_email_domain("@missing.local"), None);
        assert_eq!(extract_email_domain("missing-domain@"), None);
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("ravi@svecw.edu.in"), "ravi");
        assert_eq!(display_name_from_email("plain"), "plain");
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("  SVECW.edu.IN "), "svecw.edu.in");
        assert_eq!(normalize_domain("@iitb.ac.in"), "iitb.ac.in");
    }
}
