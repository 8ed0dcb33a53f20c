//! Role-based access control for the pavefleet dashboard.
//!
//! A closed set of [`Role`]s maps to a fixed [`PermissionSet`] of boolean
//! [`Capability`] flags through a [`PermissionTable`]. The table is built
//! once at startup (the builtin one, or a TOML file) and never mutated.
//!
//! # Example
//!
//! ```
//! use access::{has_capability, is_in_role_set, permissions_for};
//!
//! assert!(has_capability("admin", "canManageSettings"));
//! assert!(!has_capability("employee", "canManageSettings"));
//! assert!(is_in_role_set("hr", &["admin", "hr"]));
//!
//! // Unrecognized roles fall back to least privilege.
//! assert_eq!(permissions_for("contractor"), permissions_for("employee"));
//! ```

mod capability;
mod error;
mod panel;
mod resolver;
mod role;
mod table;

pub use capability::Capability;
pub use error::{Error, Result};
pub use panel::Panel;
pub use resolver::{Resolver, has_capability, is_in_role_set, permissions_for};
pub use role::Role;
pub use table::{PermissionSet, PermissionTable};
