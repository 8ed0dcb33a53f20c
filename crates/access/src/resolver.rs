//! Permission resolution over a [`PermissionTable`].
//!
//! Role and capability names arrive as raw strings from the identity
//! provider. Resolution is total: an unrecognized role is treated as
//! [`Role::DEFAULT`], an unrecognized capability is never held.

use crate::{Capability, Panel, PermissionSet, PermissionTable, Role};

/// Answers access questions against one permission table.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    table: PermissionTable,
}

impl Resolver {
    pub fn new(table: PermissionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Permission set for a raw role name.
    pub fn permissions_for(&self, role: &str) -> &PermissionSet {
        self.table.get(Role::resolve(role))
    }

    /// Whether a raw role name holds a raw capability name.
    pub fn has_capability(&self, role: &str, capability: &str) -> bool {
        let Ok(capability) = capability.parse::<Capability>() else {
            return false;
        };
        self.permissions_for(role).allows(capability)
    }

    /// Whether a raw role name is one of `allowed`.
    pub fn is_in_role_set<S: AsRef<str>>(&self, role: &str, allowed: &[S]) -> bool {
        is_in_role_set(role, allowed)
    }

    /// Panels `role` may open, in navigation order.
    pub fn visible_panels(&self, role: Role) -> Vec<Panel> {
        let permissions = self.table.get(role);
        Panel::ALL
            .into_iter()
            .filter(|panel| permissions.can_open(*panel))
            .collect()
    }
}

/// Permission set for a raw role name, using the builtin table.
pub fn permissions_for(role: &str) -> PermissionSet {
    *PermissionTable::BUILTIN.get(Role::resolve(role))
}

/// Whether a raw role name holds a raw capability name, using the builtin
/// table.
pub fn has_capability(role: &str, capability: &str) -> bool {
    let Ok(capability) = capability.parse::<Capability>() else {
        return false;
    };
    permissions_for(role).allows(capability)
}

/// Whether a raw role name is one of `allowed`.
///
/// Unknown names in `allowed` never match.
pub fn is_in_role_set<S: AsRef<str>>(role: &str, allowed: &[S]) -> bool {
    let role = Role::resolve(role);
    allowed
        .iter()
        .filter_map(|name| name.as_ref().parse::<Role>().ok())
        .any(|candidate| candidate == role)
}
