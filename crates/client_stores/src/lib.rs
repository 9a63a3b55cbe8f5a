//! Client-side resource stores for Classync.
//!
//! Each store mirrors one server resource: it calls the REST API, caches the
//! last-fetched collection or entity in memory, and lets observers subscribe
//! to changes. Stores are independent; there are no cross-store transactions,
//! and a failed call leaves the previous cache intact.

mod cache;
mod error;
mod http;
mod stores;

pub use cache::*;
pub use error::*;
pub use http::*;
pub use stores::*;
