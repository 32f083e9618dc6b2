/// Table name rejected before it reaches a SQL statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a plain SQL identifier")]
pub struct InvalidIdentifier(pub String);

/// Accepts `[A-Za-z_][A-Za-z0-9_]*` up to 63 bytes and lowercases it, since
/// unquoted identifiers fold to lower case on the client/server engine.
pub fn validate_identifier(value: &str) -> Result<String, InvalidIdentifier> {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    let valid_head = chars
        .next()
        .is_some_and(|head| head.is_ascii_alphabetic() || head == '_');
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_head && valid_tail && trimmed.len() <= 63 {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(InvalidIdentifier(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_valid_names_to_lowercase() {
        assert_eq!(validate_identifier("Kandydaci").unwrap(), "kandydaci");
        assert_eq!(validate_identifier(" _tmp_2024 ").unwrap(), "_tmp_2024");
    }

    #[test]
    fn rejects_injection_attempts() {
        for raw in ["", "1abc", "kandydaci; DROP TABLE kandydat", "a-b", "\"quoted\""] {
            assert!(validate_identifier(raw).is_err(), "{raw} should be rejected");
        }
        assert!(validate_identifier(&"x".repeat(64)).is_err());
    }
}
