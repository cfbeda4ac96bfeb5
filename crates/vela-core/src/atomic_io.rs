use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::time_utils::current_unix_timestamp_ms;

/// Replaces `path` with `content` through a sibling staging file and a rename.
///
/// The staging file is removed again when the rename fails.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    if path.is_dir() {
        bail!("destination path '{}' is a directory", path.display());
    }
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("destination path '{}' has no file name", path.display());
    };
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create '{}'", parent.display()))?;

    let staging = parent.join(format!(
        ".{file_name}.tmp-{}-{}",
        std::process::id(),
        current_unix_timestamp_ms()
    ));
    fs::write(&staging, content)
        .with_context(|| format!("failed to write '{}'", staging.display()))?;
    fs::rename(&staging, path)
        .or_else(|error| {
            let _ = fs::remove_file(&staging);
            Err(error)
        })
        .with_context(|| format!("failed to replace '{}'", path.display()))
}
