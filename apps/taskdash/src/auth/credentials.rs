use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The access/identity/refresh triple issued by one provider grant.
///
/// Fields are private: a set is only ever built whole (sign-in) or renewed
/// whole (refresh), never patched in place. The serialized form is the
/// persisted store entry: `{"accessToken","idToken","refreshToken"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    access_token: String,
    id_token: String,
    refresh_token: String,
}

impl CredentialSet {
    /// Build a set from a fresh grant. All three credentials must be non-empty.
    pub fn new(
        access_token: impl Into<String>,
        id_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let set = Self {
            access_token: access_token.into(),
            id_token: id_token.into(),
            refresh_token: refresh_token.into(),
        };
        set.validate()?;
        Ok(set)
    }

    /// New set from a refresh grant: new access/identity credentials, this
    /// set's refresh credential carried over unchanged.
    pub fn renewed(
        &self,
        access_token: impl Into<String>,
        id_token: impl Into<String>,
    ) -> Result<Self, AuthError> {
        Self::new(access_token, id_token, self.refresh_token.clone())
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    fn validate(&self) -> Result<(), AuthError> {
        for (name, value) in [
            ("access", &self.access_token),
            ("identity", &self.id_token),
            ("refresh", &self.refresh_token),
        ] {
            if value.is_empty() {
                return Err(AuthError::malformed(format!("empty {name} credential")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_token", &format_args!("<{} bytes>", self.access_token.len()))
            .field("id_token", &format_args!("<{} bytes>", self.id_token.len()))
            .field("refresh_token", &format_args!("<{} bytes>", self.refresh_token.len()))
            .finish()
    }
}
