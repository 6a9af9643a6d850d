//! Application-flow data sources.
//!
//! Supplies the two inputs the builder treats as already-materialized data:
//! the tier → endpoints mapping and the tier relationship graph. Both come
//! from one of two places behind the same [`FlowProvider`] seam:
//!
//! - static pre-configured JSON files (no application name given), or
//! - a live AppDynamics-style analytics controller (application name given).

pub mod appdynamics;
pub mod loader;
pub mod static_files;

pub use appdynamics::{AppDynamicsClient, AppDynamicsConfig};
pub use loader::{FlowLoader, FlowProvider};
pub use static_files::StaticFlowSource;
