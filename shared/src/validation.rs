//! Validation utilities shared by request DTOs
//!
//! The password and phone rules mirror what the signup forms enforce on the
//! client side, so server-side rejections carry the same messages.

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength: at least 8 characters with a lowercase, an
/// uppercase, a digit, and a special character.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password should be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password should contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password should contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password should contain at least one digit");
    }
    if !password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)) {
        return Err("Password should contain at least one special character");
    }
    Ok(())
}

/// Validate phone numbers: digits only, 10 to 15 of them.
pub fn validate_phone_number(phone: &str) -> Result<(), &'static str> {
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must be numeric");
    }
    if phone.len() < 10 || phone.len() > 15 {
        return Err("Phone number must be between 10 and 15 digits");
    }
    Ok(())
}

/// `validator`-compatible wrapper for [`validate_password`].
pub fn password_strength(value: &str) -> Result<(), validator::ValidationError> {
    validate_password(value).map_err(|msg| {
        let mut error = validator::ValidationError::new("password");
        error.message = Some(msg.into());
        error
    })
}

/// `validator`-compatible wrapper for [`validate_phone_number`].
pub fn phone_number(value: &str) -> Result<(), validator::ValidationError> {
    validate_phone_number(value).map_err(|msg| {
        let mut error = validator::ValidationError::new("phone_number");
        error.message = Some(msg.into());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strong_password() {
        assert!(validate_password("Str0ng!pass").is_ok());
    }

    #[test]
    fn rejects_weak_passwords() {
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn phone_number_bounds() {
        assert!(validate_phone_number("0123456789").is_ok());
        assert!(validate_phone_number("012345678").is_err());
        assert!(validate_phone_number("0123456789012345").is_err());
        assert!(validate_phone_number("01234abcde").is_err());
    }

    #[test]
    fn email_basics() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("ab.com").is_err());
    }
}
