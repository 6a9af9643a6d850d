//! EPG micro-segmentation engine.
//!
//! Turns one flat base EPG into attribute-matched per-tier micro-EPGs wired
//! together by the observed tier relationships, and applies the result as a
//! single atomic configuration change.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     MicroSegmenter                           │
//! │  ┌────────────┐   ┌─────────────┐   ┌─────────────────────┐  │
//! │  │  Fabric    │   │ FlowProvider │  │  build_tree()       │  │
//! │  │  Lookup    │──▶│ (analytics / │─▶│  Tenant → Profile → │  │
//! │  │ (resolve)  │   │ static JSON) │  │  {Base, Tier*}      │  │
//! │  └────────────┘   └─────────────┘   └──────────┬──────────┘  │
//! │                                                ▼             │
//! │                                     Committer (one request)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flow is strictly linear per invocation and carries no state across
//! invocations; concurrent invocations against the same EPG are not
//! coordinated here (last writer wins at the controller).

pub mod builder;
pub mod orchestrator;

pub use builder::{build_tree, BuildInput};
pub use orchestrator::{MicroSegmenter, SegmentationReport};
