use access::Role;
use tracing::warn;

/// Who is asking: the signed-in subject and the role the identity provider
/// assigned them. Passed explicitly into every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub subject: String,
    pub role: Role,
    fell_back: bool,
}

impl AccessContext {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            fell_back: false,
        }
    }

    /// Build a context from a raw role claim. An unrecognized claim resolves
    /// to [`Role::DEFAULT`].
    pub fn from_claim(subject: impl Into<String>, claim: &str) -> Self {
        let subject = subject.into();
        match claim.parse::<Role>() {
            Ok(role) => Self::new(subject, role),
            Err(_) => {
                warn!(
                    subject = %subject,
                    claim,
                    fallback = %Role::DEFAULT,
                    "unrecognized role claim"
                );
                Self {
                    subject,
                    role: Role::DEFAULT,
                    fell_back: true,
                }
            }
        }
    }

    /// Whether the role claim was unrecognized and replaced by the default.
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_known_claim() {
        let ctx = AccessContext::from_claim("dana", " Accountant ");
        assert_eq!(ctx.role, Role::Accountant);
        assert!(!ctx.fell_back());
    }

    #[test]
    fn test_from_unknown_claim_falls_back() {
        let ctx = AccessContext::from_claim("temp-17", "contractor");
        assert_eq!(ctx.role, Role::DEFAULT);
        assert_eq!(ctx.subject, "temp-17");
        assert!(ctx.fell_back());
    }
}
