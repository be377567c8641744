//! Principal roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of principal categories the clinic recognizes. Supplied by
/// the session layer as a string; anything that does not parse into one of
/// these is denied by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cro,
    Doctor,
    FrontDesk,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Cro, Role::Doctor, Role::FrontDesk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cro => "cro",
            Role::Doctor => "doctor",
            Role::FrontDesk => "front_desk",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "cro" => Ok(Role::Cro),
            "doctor" => Ok(Role::Doctor),
            "front_desk" | "frontdesk" | "front-desk" => Ok(Role::FrontDesk),
            _ => Err(UnknownRole(s.trim().to_string())),
        }
    }
}

/// The session handed us a role string outside the fixed set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{0}' is not a recognized role")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Front_Desk".parse::<Role>().unwrap(), Role::FrontDesk);
        assert_eq!("front-desk".parse::<Role>().unwrap(), Role::FrontDesk);
    }

    #[test]
    fn unknown_roles_do_not_parse() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
