//! Input rules for usernames, passwords and file names.

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 24;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 24;

/// Maximum file name length.
pub const MAX_FILENAME_LENGTH: usize = 200;

/// Symbols allowed in a password besides latin letters and digits.
const PASSWORD_SYMBOLS: &str = "_!@#$%^&*";

/// Symbols forbidden in a file name.
const FILENAME_FORBIDDEN: &str = "<>:\"/\\|?*";

/// Username is 4-24 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Password is 8-24 characters of `[A-Za-z0-9_!@#$%^&*]`.
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len)
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c))
}

/// File name is 1-200 characters, none of `<>:"/\|?*`, no line breaks.
pub fn is_valid_filename(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_FILENAME_LENGTH).contains(&len)
        && !name
            .chars()
            .any(|c| FILENAME_FORBIDDEN.contains(c) || c == '\n' || c == '\r')
}
