//! Content storage for Classync.
//!
//! This crate provides a storage abstraction for users, workspaces, teams,
//! invitations, classes, projects, and timestamped feedback. Compound
//! operations that must not be observable half-done (cascading deletes,
//! invitation redemption, user deletion) live on the trait so every backend
//! executes them as a unit.

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::*;
pub use traits::*;
