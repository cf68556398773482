use crate::shared::error::SbomError;
use crate::shared::security::{redact_secrets, REDACTED};
use std::fmt;

/// User key + organization token pair for the inventory service
///
/// `Debug` never prints the values, so credentials can sit inside structs
/// that get logged.
#[derive(Clone)]
pub struct Credentials {
    user_key: String,
    org_token: String,
}

impl Credentials {
    /// # Errors
    /// Returns `SbomError::Usage` when either value is empty
    pub fn new(user_key: impl Into<String>, org_token: impl Into<String>) -> Result<Self, SbomError> {
        let user_key = user_key.into().trim().to_string();
        let org_token = org_token.into().trim().to_string();

        if user_key.is_empty() {
            return Err(SbomError::Usage {
                message: "User key (-u) cannot be empty".to_string(),
            });
        }
        if org_token.is_empty() {
            return Err(SbomError::Usage {
                message: "Organization token (-k) cannot be empty".to_string(),
            });
        }

        Ok(Self {
            user_key,
            org_token,
        })
    }

    pub(crate) fn user_key(&self) -> &str {
        &self.user_key
    }

    pub(crate) fn org_token(&self) -> &str {
        &self.org_token
    }

    /// Replaces both credential values in `message`
    pub fn redact(&self, message: &str) -> String {
        redact_secrets(message, &[&self.user_key, &self.org_token])
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_key", &REDACTED)
            .field("org_token", &REDACTED)
            .finish()
    }
}
