/// Errors raised while validating admin credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing API key")]
    Missing,
    #[error("invalid API key")]
    Invalid,
}

/// Validates a provided API key against the expected key resolved at
/// startup. Admin mutations on the catalog require this to pass.
pub fn validate_api_key(provided: Option<&str>, expected: &str) -> Result<(), AuthError> {
    match provided {
        None => Err(AuthError::Missing),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(AuthError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_expected_key() {
        assert!(validate_api_key(Some("s3cret"), "s3cret").is_ok());
    }

    #[test]
    fn rejects_missing_and_wrong_keys() {
        assert!(matches!(validate_api_key(None, "s3cret"), Err(AuthError::Missing)));
        assert!(matches!(
            validate_api_key(Some("nope"), "s3cret"),
            Err(AuthError::Invalid)
        ));
    }
}
