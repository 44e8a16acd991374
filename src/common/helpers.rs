// Helper functions for safe logging and serialization

use serde::{Deserialize, Deserializer};

/// Masks email addresses for safe logging
///
/// # Example
/// ```
/// use auth_store::common::safe_email_log;
///
/// assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if email.len() > 3 && !domain.contains('@') => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks session and verification tokens for safe logging.
/// Shows only the first and last 4 characters.
pub fn safe_token_log(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

/// Deserializes a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`: an absent key stays `None`,
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn deserialize_double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
