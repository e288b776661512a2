//! Normalized email address value object

use std::fmt;

use serde::{Deserialize, Serialize};

use ev_shared::utils::email::{is_valid_email, mask_email, normalize_email};

/// An email address in its canonical form (trimmed, lower-cased)
///
/// Every code record and every store lookup is keyed by this form, so
/// `" User@Example.com"` and `"user@example.com"` address the same history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalize and validate a raw address
    ///
    /// Returns `None` if the normalized address is not syntactically valid.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_email(raw) {
            Some(Self(normalize_email(raw)))
        } else {
            None
        }
    }

    /// Normalize a raw address without validating it
    ///
    /// Used on the lookup path, where an invalid address simply matches nothing.
    pub fn normalized(raw: &str) -> Self {
        Self(normalize_email(raw))
    }

    /// The canonical address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logging (e.g. `u***@example.com`)
    pub fn masked(&self) -> String {
        mask_email(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
