//! SQLite-backed audit log for pavefleet access decisions.
//!
//! Every access check made through a gate is recorded here, so "why could
//! this user open payroll?" can be answered after the fact.
//!
//! # Core Concepts
//!
//! ## AuditStore
//!
//! The [`AuditStore`] wraps a SQLite database and provides methods to append
//! events and query session history.
//!
//! ## AuditEvent
//!
//! An [`AuditEvent`] has a unique ID, the [`SessionId`] of the gate that
//! produced it, a timestamp, and an [`AuditKind`]:
//! - `SessionStart` / `SessionEnd` — gate lifecycle
//! - `CapabilityCheck`, `RoleSetCheck`, `PanelCheck` — one access decision
//!
//! # Example
//!
//! ```no_run
//! use access::{Capability, Role};
//! use storage::{AuditEvent, AuditKind, AuditStore, SessionId};
//!
//! let store = AuditStore::open("audit.db")?;
//! let session_id = SessionId::new();
//! store.append(&AuditEvent::new(session_id, AuditKind::SessionStart))?;
//! store.append(&AuditEvent::new(
//!     session_id,
//!     AuditKind::CapabilityCheck {
//!         subject: "dana".into(),
//!         role: Role::Accountant,
//!         capability: Capability::CanManageFleet,
//!         allowed: false,
//!     },
//! ))?;
//!
//! for summary in store.list_sessions()? {
//!     println!("{}: {} checks, {} denied", summary.id, summary.check_count, summary.denied_count);
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod event;
mod store;

pub use error::{Error, Result};
pub use event::{AuditEvent, AuditKind, SessionId};
pub use store::{AuditStore, SessionSummary};
