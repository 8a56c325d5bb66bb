use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a donation an account sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Donor,
}

impl Role {
    pub fn collection(self) -> &'static str {
        match self {
            Role::User => "users",
            Role::Donor => "donors",
        }
    }

    pub fn cookie_name(self) -> &'static str {
        match self {
            Role::User => "user_jwt",
            Role::Donor => "donor_jwt",
        }
    }

    /// Capitalized noun used in response messages.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Donor => "Donor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Donor => write!(f, "donor"),
        }
    }
}
