//! Audited access checks.

use crate::{AccessContext, Decision, Error, Result};
use access::{Capability, Panel, Resolver, Role};
use storage::{AuditEvent, AuditKind, AuditStore, SessionId};
use tracing::{debug, info};

/// Answers access questions and records each decision in the audit log.
pub struct Gate {
    pub id: SessionId,
    resolver: Resolver,
    store: Option<AuditStore>,
}

impl Gate {
    /// A gate that does not record decisions.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            id: SessionId::new(),
            resolver,
            store: None,
        }
    }

    /// A gate that records every decision in `store`.
    pub fn audited(resolver: Resolver, store: AuditStore) -> Result<Self> {
        let id = SessionId::new();
        store.append(&AuditEvent::new(id, AuditKind::SessionStart))?;

        Ok(Self {
            id,
            resolver,
            store: Some(store),
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Check whether the context's role holds `capability`.
    pub fn check_capability(
        &self,
        ctx: &AccessContext,
        capability: Capability,
    ) -> Result<Decision> {
        let allowed = self.resolver.table().get(ctx.role).allows(capability);
        debug!(subject = %ctx.subject, role = %ctx.role, %capability, allowed, "capability check");

        self.record(AuditKind::CapabilityCheck {
            subject: ctx.subject.clone(),
            role: ctx.role,
            capability,
            allowed,
        })?;

        Ok(Decision::from_outcome(allowed, || {
            format!("role '{}' lacks {capability}", ctx.role)
        }))
    }

    /// Request a capability, returning an error if denied.
    pub fn require_capability(&self, ctx: &AccessContext, capability: Capability) -> Result<()> {
        match self.check_capability(ctx, capability)? {
            Decision::Allow => Ok(()),
            Decision::Deny { reason } => {
                info!(subject = %ctx.subject, %reason, "access denied");
                Err(Error::Denied(reason))
            }
        }
    }

    /// Check whether the context's role is one of `allowed_roles`.
    pub fn check_role_set(&self, ctx: &AccessContext, allowed_roles: &[Role]) -> Result<Decision> {
        let allowed = ctx.role.is_in(allowed_roles);
        debug!(subject = %ctx.subject, role = %ctx.role, ?allowed_roles, allowed, "role set check");

        self.record(AuditKind::RoleSetCheck {
            subject: ctx.subject.clone(),
            role: ctx.role,
            allowed_roles: allowed_roles.to_vec(),
            allowed,
        })?;

        Ok(Decision::from_outcome(allowed, || {
            let names: Vec<_> = allowed_roles.iter().map(Role::as_str).collect();
            format!("role '{}' is not one of [{}]", ctx.role, names.join(", "))
        }))
    }

    /// Check whether the context's role may open `panel`.
    pub fn check_panel(&self, ctx: &AccessContext, panel: Panel) -> Result<Decision> {
        let required = panel.required_capability();
        let allowed = self.resolver.table().get(ctx.role).can_open(panel);
        debug!(subject = %ctx.subject, role = %ctx.role, %panel, allowed, "panel check");

        self.record(AuditKind::PanelCheck {
            subject: ctx.subject.clone(),
            role: ctx.role,
            panel,
            allowed,
        })?;

        Ok(Decision::from_outcome(allowed, || {
            format!("panel '{panel}' requires {required}, which role '{}' lacks", ctx.role)
        }))
    }

    /// End the gate session.
    pub fn end(self) -> Result<()> {
        if let Some(store) = &self.store {
            store.append(&AuditEvent::new(self.id, AuditKind::SessionEnd))?;
        }
        Ok(())
    }

    fn record(&self, kind: AuditKind) -> Result<()> {
        if let Some(store) = &self.store {
            store.append(&AuditEvent::new(self.id, kind))?;
        }
        Ok(())
    }
}
