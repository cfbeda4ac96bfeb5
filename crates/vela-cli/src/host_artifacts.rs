//! Cleanup of argv entries injected by single-file packaging hosts.
//!
//! Some bundlers re-exec the binary with the embedded entrypoint path as the
//! first argument. That token is never user input and must not reach routing.

/// Path prefixes that packaging hosts place in front of embedded entrypoints.
pub const HOST_ARTIFACT_PREFIXES: &[&str] = &["/$bunfs/root/", "B:/~BUN/root/", "B:\\~BUN\\root\\"];

/// Returns true when `token` is an embedded-entrypoint path rather than user input.
pub fn is_host_artifact_positional(token: &str) -> bool {
    HOST_ARTIFACT_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

/// Drops a leading host artifact positional, leaving every other token untouched.
pub fn strip_host_artifact_positional(positionals: &[String]) -> &[String] {
    match positionals.split_first() {
        Some((first, rest)) if is_host_artifact_positional(first) => rest,
        _ => positionals,
    }
}
