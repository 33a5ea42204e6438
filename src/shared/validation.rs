use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref UPPERCASE_REGEX: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWERCASE_REGEX: Regex = Regex::new(r"[a-z]").unwrap();
    /// A digit or any non-word character
    static ref DIGIT_OR_SYMBOL_REGEX: Regex = Regex::new(r"[\d\W]").unwrap();

    /// Regex for stored file names served from the static directory
    /// - Valid: "3f2b9c1e-0d7a-4c7e-9f0a-1b2c3d4e5f60.jpg", "1740176-00-A_0_2000.jpg"
    /// - Invalid: "../etc/passwd", ".hidden", "dir/file.png", ""
    pub static ref FILE_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap();
}

/// Password must have an uppercase letter, a lowercase letter and a number or symbol
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = UPPERCASE_REGEX.is_match(password)
        && LOWERCASE_REGEX.is_match(password)
        && DIGIT_OR_SYMBOL_REGEX.is_match(password);

    if strong {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message =
            Some("The password must have a Uppercase, lowercase letter and a number".into());
        Err(err)
    }
}

/// File name that is safe to join onto the storage directory
pub fn is_safe_file_name(name: &str) -> bool {
    FILE_NAME_REGEX.is_match(name) && !name.contains("..")
}
