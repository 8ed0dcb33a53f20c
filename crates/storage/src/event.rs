//! Event types for the audit log.

use access::{Capability, Panel, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for an audit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditKind {
    /// Audit session started.
    SessionStart,
    /// Audit session ended.
    SessionEnd,
    /// A single capability was checked.
    CapabilityCheck {
        subject: String,
        role: Role,
        capability: Capability,
        allowed: bool,
    },
    /// Membership in a set of roles was checked.
    RoleSetCheck {
        subject: String,
        role: Role,
        allowed_roles: Vec<Role>,
        allowed: bool,
    },
    /// Access to a dashboard panel was checked.
    PanelCheck {
        subject: String,
        role: Role,
        panel: Panel,
        allowed: bool,
    },
}

impl AuditKind {
    /// Short name stored alongside the event for filtering.
    pub fn name(&self) -> &'static str {
        match self {
            AuditKind::SessionStart => "session_start",
            AuditKind::SessionEnd => "session_end",
            AuditKind::CapabilityCheck { .. } => "capability_check",
            AuditKind::RoleSetCheck { .. } => "role_set_check",
            AuditKind::PanelCheck { .. } => "panel_check",
        }
    }

    /// Outcome of a check; `None` for lifecycle events.
    pub fn allowed(&self) -> Option<bool> {
        match self {
            AuditKind::SessionStart | AuditKind::SessionEnd => None,
            AuditKind::CapabilityCheck { allowed, .. }
            | AuditKind::RoleSetCheck { allowed, .. }
            | AuditKind::PanelCheck { allowed, .. } => Some(*allowed),
        }
    }
}

/// An entry in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    pub kind: AuditKind,
}

impl AuditEvent {
    pub fn new(session_id: SessionId, kind: AuditKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_json_is_tagged() {
        let kind = AuditKind::CapabilityCheck {
            subject: "dana".into(),
            role: Role::Accountant,
            capability: Capability::CanViewPayroll,
            allowed: true,
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["kind"], "capability_check");
        assert_eq!(json["role"], "accountant");
        assert_eq!(json["capability"], "canViewPayroll");
    }

    #[test]
    fn test_allowed_outcome() {
        assert_eq!(AuditKind::SessionStart.allowed(), None);
        let kind = AuditKind::PanelCheck {
            subject: "sam".into(),
            role: Role::Employee,
            panel: Panel::Settings,
            allowed: false,
        };
        assert_eq!(kind.allowed(), Some(false));
        assert_eq!(kind.name(), "panel_check");
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
