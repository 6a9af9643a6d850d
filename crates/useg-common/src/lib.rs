//! Shared types for EPG micro-segmentation.
//!
//! Home of the identity tuple that addresses a base EPG on the fabric, the
//! application-flow shapes produced by the analytics loaders, and the error
//! taxonomy every other crate in the workspace reports through.

pub mod error;
pub mod flow;
pub mod identity;

pub use error::{Result, UsegError};
pub use flow::{Direction, RelationshipGraph, TierFlow, TierMapping};
pub use identity::EpgIdentity;
