//! Tile service credential, loaded from the environment.

use std::fmt;

use crate::errors::QuakemapError;

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";

/// Mapbox access token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if the token is empty or whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, QuakemapError> {
        let token: String = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(QuakemapError::MissingCredential(ACCESS_TOKEN_VAR));
        }
        Ok(Self(token.to_string()))
    }

    /// Load the token from `MAPBOX_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if the variable is unset or blank.
    pub fn from_env() -> Result<Self, QuakemapError> {
        let token = std::env::var(ACCESS_TOKEN_VAR)
            .map_err(|_| QuakemapError::MissingCredential(ACCESS_TOKEN_VAR))?;
        Self::new(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_missing() {
        assert!(matches!(
            AccessToken::new(""),
            Err(QuakemapError::MissingCredential(ACCESS_TOKEN_VAR))
        ));
        assert!(matches!(
            AccessToken::new("   \n"),
            Err(QuakemapError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_token_is_trimmed() {
        let token = AccessToken::new("  pk.abc123 ").unwrap();
        assert_eq!(token.as_str(), "pk.abc123");
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("pk.secret").unwrap();
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err = AccessToken::new("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing tile service credential: set MAPBOX_ACCESS_TOKEN"
        );
    }
}
