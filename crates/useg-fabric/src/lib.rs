//! APIC fabric access.
//!
//! One explicitly passed [`ApicSession`] handle does login and carries the
//! auth token; [`lookup`] resolves the identity tuple against the running
//! fabric and [`commit`] submits the desired-state tree as a single
//! all-or-nothing configuration request. No retries, no rollback: a
//! rejection or timeout is surfaced verbatim.

pub mod commit;
pub mod config;
pub mod lookup;
pub mod session;

pub use commit::{ApicCommitter, Committer};
pub use config::ApicConfig;
pub use lookup::{ApicLookup, FabricLookup};
pub use session::ApicSession;
