//! Per-user access gate for pavefleet.
//!
//! A [`Gate`] answers access questions for an explicit [`AccessContext`]
//! (subject + role) against a [`access::Resolver`], and records each
//! decision in a [`storage::AuditStore`] when one is attached.
//!
//! # Example
//!
//! ```
//! use access::{Capability, Panel, Resolver};
//! use gate::{AccessContext, Gate};
//! use storage::AuditStore;
//!
//! # fn example() -> gate::Result<()> {
//! let gate = Gate::audited(Resolver::default(), AuditStore::in_memory()?)?;
//! let ctx = AccessContext::from_claim("dana", "accountant");
//!
//! gate.require_capability(&ctx, Capability::CanViewPayroll)?;
//! assert!(!gate.check_panel(&ctx, Panel::Fleet)?.is_allowed());
//!
//! gate.end()?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod context;
mod decision;
mod error;
mod gate;

pub use context::AccessContext;
pub use decision::Decision;
pub use error::{Error, Result};
pub use gate::Gate;
