//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account.
///
/// A closed set: unknown role strings are rejected at the boundary rather
/// than carried through as free-form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Ordinary user (the default).
    User,
    /// Registered care/service provider.
    #[serde(rename = "Service-Provider")]
    ServiceProvider,
    /// Security guard account.
    Guard,
    /// Administrator of a single society.
    SocietyAdmin,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "service-provider" | "serviceprovider" => Some(Role::ServiceProvider),
            "guard" => Some(Role::Guard),
            "societyadmin" | "society-admin" => Some(Role::SocietyAdmin),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::ServiceProvider => write!(f, "Service-Provider"),
            Role::Guard => write!(f, "Guard"),
            Role::SocietyAdmin => write!(f, "SocietyAdmin"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("Service-Provider"), Some(Role::ServiceProvider));
        assert_eq!(Role::parse("serviceprovider"), Some(Role::ServiceProvider));
        assert_eq!(Role::parse("SocietyAdmin"), Some(Role::SocietyAdmin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [
            Role::User,
            Role::ServiceProvider,
            Role::Guard,
            Role::SocietyAdmin,
            Role::Admin,
        ] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_role_wire_format() {
        // Serialized strings are part of the HTTP contract.
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"User\"");
        assert_eq!(
            serde_json::to_string(&Role::ServiceProvider).unwrap(),
            "\"Service-Provider\""
        );
        assert_eq!(
            serde_json::to_string(&Role::SocietyAdmin).unwrap(),
            "\"SocietyAdmin\""
        );

        let parsed: Role = serde_json::from_str("\"Service-Provider\"").unwrap();
        assert_eq!(parsed, Role::ServiceProvider);
        assert!(serde_json::from_str::<Role>("\"Superuser\"").is_err());
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::User);
    }
}
