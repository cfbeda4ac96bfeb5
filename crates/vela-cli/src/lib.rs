//! CLI argument models and invocation normalization for Vela binaries.
//!
//! Exposes the clap-backed `Cli`, the immutable `InvocationSpec` consumed by
//! startup routing, and host-artifact cleanup.

pub mod cli_args;
pub mod host_artifacts;
pub mod invocation;

pub use cli_args::Cli;
pub use host_artifacts::*;
pub use invocation::*;
