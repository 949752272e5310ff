/// Username length bounds, counted in characters after trimming.
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;

/// Validate a username: 3-20 characters once surrounding whitespace is removed.
///
/// # Errors
///
/// Returns a descriptive error message if validation fails.
pub fn validate_username(username: &str) -> Result<(), String> {
    let length = username.trim().chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&length) {
        return Err(format!(
            "Username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
        ));
    }
    Ok(())
}

/// Validate email format: `local@domain.tld`, no whitespace.
///
/// # Errors
///
/// Returns a descriptive error message if the email is invalid.
pub fn validate_email(email: &str) -> Result<(), String> {
    const MESSAGE: &str = "Please enter a valid email address";

    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(MESSAGE.to_string());
    }

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(MESSAGE.to_string());
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok {
        return Err(MESSAGE.to_string());
    }
    Ok(())
}
