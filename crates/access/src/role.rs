use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role assigned to a user by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Operator,
    Employee,
    Accountant,
    Hr,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Operator,
        Role::Employee,
        Role::Accountant,
        Role::Hr,
    ];

    /// The least-privilege role unrecognized input falls back to.
    pub const DEFAULT: Role = Role::Employee;

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
            Role::Employee => "employee",
            Role::Accountant => "accountant",
            Role::Hr => "hr",
        }
    }

    /// Resolve a role claim, falling back to [`Role::DEFAULT`] when it is not
    /// a known role.
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::DEFAULT)
    }

    /// Whether this role is one of `allowed`.
    pub fn is_in(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
