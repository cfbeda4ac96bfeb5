//! Project file discovery for the session's file context.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;
use vela_startup::{ProjectContext, ProjectContextInitializer};

const DEFAULT_MAX_FILES: usize = 10_000;

fn should_skip_directory(name: &str) -> bool {
    matches!(
        name,
        ".git"
            | ".hg"
            | ".svn"
            | ".vela"
            | "target"
            | "node_modules"
            | "dist"
            | "build"
            | ".venv"
            | "venv"
            | "__pycache__"
            | ".next"
    )
}

#[derive(Debug, Clone, Copy)]
/// Walks the project tree on a blocking thread and records relative paths.
pub(crate) struct FileSystemProjectContext {
    max_files: usize,
}

impl Default for FileSystemProjectContext {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl FileSystemProjectContext {
    #[cfg(test)]
    pub(crate) fn with_max_files(max_files: usize) -> Self {
        Self { max_files }
    }
}

#[async_trait]
impl ProjectContextInitializer for FileSystemProjectContext {
    async fn initialize(&self, project_root: &Path) -> Result<ProjectContext> {
        let root = project_root.to_path_buf();
        let max_files = self.max_files;
        tokio::task::spawn_blocking(move || discover_project_files(&root, max_files))
            .await
            .context("project discovery task failed")?
    }
}

pub(crate) fn discover_project_files(root: &Path, max_files: usize) -> Result<ProjectContext> {
    if !root.is_dir() {
        bail!("project root '{}' is not a directory", root.display());
    }
    let mut files = Vec::new();
    let truncated = collect_project_files_recursive(root, root, max_files, &mut files)?;
    files.sort();
    debug!(root = %root.display(), files = files.len(), truncated, "project files discovered");
    Ok(ProjectContext {
        root: root.to_path_buf(),
        files,
        truncated,
    })
}

fn collect_project_files_recursive(
    root: &Path,
    dir: &Path,
    max_files: usize,
    files: &mut Vec<String>,
) -> Result<bool> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list directory entries for '{}'", dir.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to inspect '{}'", path.display()))?;
        if file_type.is_dir() {
            let name = entry.file_name();
            if should_skip_directory(&name.to_string_lossy()) {
                continue;
            }
            if collect_project_files_recursive(root, &path, max_files, files)? {
                return Ok(true);
            }
        } else if file_type.is_file() {
            if files.len() >= max_files {
                return Ok(true);
            }
            files.push(relative_display(root, &path));
        }
    }
    Ok(false)
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;
    use vela_startup::ProjectContextInitializer;

    use super::{discover_project_files, FileSystemProjectContext};

    #[test]
    fn functional_discover_project_files_skips_vendor_and_state_dirs() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("src/nested")).expect("src");
        fs::create_dir_all(root.join("target/debug")).expect("target");
        fs::create_dir_all(root.join(".vela/pids")).expect("state");
        fs::write(root.join("Cargo.toml"), "[package]").expect("manifest");
        fs::write(root.join("src/main.rs"), "fn main() {}").expect("main");
        fs::write(root.join("src/nested/lib.rs"), "").expect("lib");
        fs::write(root.join("target/debug/vela"), "bin").expect("artifact");
        fs::write(root.join(".vela/pids/1.pid"), "{}").expect("pid");

        let context = discover_project_files(root, 100).expect("discover");
        assert_eq!(
            context.files,
            vec!["Cargo.toml", "src/main.rs", "src/nested/lib.rs"]
        );
        assert!(!context.truncated);
    }

    #[test]
    fn unit_discover_project_files_truncates_at_limit() {
        let temp = tempdir().expect("tempdir");
        for index in 0..5 {
            fs::write(temp.path().join(format!("file-{index}.txt")), "x").expect("write");
        }
        let context = discover_project_files(temp.path(), 3).expect("discover");
        assert_eq!(context.files.len(), 3);
        assert!(context.truncated);
    }

    #[tokio::test]
    async fn regression_missing_root_is_reported_as_error() {
        let temp = tempdir().expect("tempdir");
        let error = FileSystemProjectContext::with_max_files(10)
            .initialize(&temp.path().join("missing"))
            .await
            .expect_err("missing root");
        assert!(error.to_string().contains("is not a directory"));
    }
}
