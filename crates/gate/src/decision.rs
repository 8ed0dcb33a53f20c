/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub(crate) fn from_outcome(allowed: bool, reason: impl FnOnce() -> String) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny { reason: reason() }
        }
    }
}
