//! User identity and roles.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    Client,
    /// Store administrator.
    Admin,
    /// Administrator that can also promote other users.
    SuperAdmin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Client => 0,
            Role::Admin => 1,
            Role::SuperAdmin => 2,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" | "user" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(()),
        }
    }
}

/// A signed-in user as reported by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
}

impl User {
    /// Whether this user may see admin screens.
    pub fn is_admin(&self) -> bool {
        self.role.has_permission(Role::Admin)
    }

    /// Whether this user may promote other users.
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Name to show in headers, falling back to the email's local part.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_levels() {
        assert!(Role::SuperAdmin.has_permission(Role::Admin));
        assert!(Role::Admin.has_permission(Role::Client));
        assert!(!Role::Client.has_permission(Role::Admin));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!("user".parse::<Role>(), Ok(Role::Client));
    }

    #[test]
    fn test_admin_visibility() {
        assert!(!user(Role::Client).is_admin());
        assert!(user(Role::Admin).is_admin());
        assert!(user(Role::SuperAdmin).is_admin());
        assert!(!user(Role::Admin).is_super_admin());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut u = user(Role::Client);
        u.name = "  ".to_string();
        assert_eq!(u.display_name(), "ada");
    }
}
