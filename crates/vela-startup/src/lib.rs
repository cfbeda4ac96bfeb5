//! Startup routing, readiness orchestration, and dispatch for Vela.
//!
//! Classifies each invocation into exactly one route, gates session launch on
//! a validated credential and model, and overlaps auxiliary subsystem
//! initialization with the credential flow.

/// Collaborator contracts and shared startup value objects.
pub mod runtime_types;
/// Startup configuration derived from CLI flags and environment.
pub mod startup_config;
/// End-to-end startup pipeline from invocation to session launch.
pub mod startup_dispatch;
/// Fatal startup error taxonomy.
pub mod startup_errors;
/// Concurrent readiness tasks and their settled aggregate.
pub mod startup_readiness;
/// Pure invocation classification.
pub mod startup_routing;

pub use runtime_types::*;
pub use startup_config::*;
pub use startup_dispatch::*;
pub use startup_errors::*;
pub use startup_readiness::*;
pub use startup_routing::*;
