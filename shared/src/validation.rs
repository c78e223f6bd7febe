//! Validation utilities for the Crop Advisor platform

// ============================================================================
// Observation Validations
// ============================================================================

/// Parse one numeric form value.
///
/// Surrounding whitespace is ignored. Missing, blank, unparseable and
/// non-finite values are rejected.
pub fn parse_numeric_field(raw: Option<&str>) -> Result<f64, &'static str> {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err("This field is required");
    }

    let parsed: f64 = value.parse().map_err(|_| "Enter a number")?;
    if !parsed.is_finite() {
        return Err("Enter a finite number");
    }
    Ok(parsed)
}

// ============================================================================
// Account Validations
// ============================================================================

/// Maximum username length
pub const USERNAME_MAX_LEN: usize = 150;

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validate username: letters, digits and `@.+-_` only
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("Username is required");
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err("Username must be 150 characters or fewer");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err("Username may contain only letters, digits and @/./+/-/_");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err("Password must be at least 8 characters");
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Password cannot be entirely numeric");
    }
    Ok(())
}

/// Validate that the confirmation matches the password
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password != confirmation {
        return Err("The two password fields didn't match");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Observation Validation Tests
    // ========================================================================

    #[test]
    fn test_parse_numeric_field_valid() {
        assert_eq!(parse_numeric_field(Some("25")), Ok(25.0));
        assert_eq!(parse_numeric_field(Some(" 6.5 ")), Ok(6.5));
        assert_eq!(parse_numeric_field(Some("-3.25")), Ok(-3.25));
        assert_eq!(parse_numeric_field(Some("1e2")), Ok(100.0));
    }

    #[test]
    fn test_parse_numeric_field_missing() {
        assert!(parse_numeric_field(None).is_err());
        assert!(parse_numeric_field(Some("")).is_err());
        assert!(parse_numeric_field(Some("   ")).is_err());
    }

    #[test]
    fn test_parse_numeric_field_invalid() {
        assert_eq!(parse_numeric_field(Some("not-a-number")), Err("Enter a number"));
        assert_eq!(parse_numeric_field(Some("12abc")), Err("Enter a number"));
        assert_eq!(parse_numeric_field(Some("NaN")), Err("Enter a finite number"));
        assert_eq!(parse_numeric_field(Some("inf")), Err("Enter a finite number"));
    }

    // ========================================================================
    // Account Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ramesh").is_ok());
        assert!(validate_username("farmer_01@field.in").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_err()); // Entirely numeric
    }

    #[test]
    fn test_validate_password_confirmation() {
        assert!(validate_password_confirmation("s3cret-pass", "s3cret-pass").is_ok());
        assert!(validate_password_confirmation("s3cret-pass", "s3cret-pasS").is_err());
    }
}
