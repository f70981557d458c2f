//! Permission codes and enforcement.

pub mod enforcer;
pub mod permissions;

pub use enforcer::{PermissionSet, require_permission};
pub use permissions::Permission;
