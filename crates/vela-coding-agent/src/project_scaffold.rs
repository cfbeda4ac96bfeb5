use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use vela_core::{current_unix_timestamp_ms, write_text_atomic};

pub(crate) const PROJECT_MANIFEST_PATH: &str = ".vela/project.json";
const PROJECT_AGENTS_DIR: &str = ".agents";

#[derive(Debug, Serialize)]
struct ProjectManifest<'a> {
    template: &'a str,
    name: &'a str,
    model: &'a str,
    created_unix_ms: u64,
}

fn ensure_empty_target(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        bail!("scaffold target '{}' is not a directory", dir.display());
    }
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read scaffold target '{}'", dir.display()))?;
    if entries.next().is_some() {
        bail!("scaffold target '{}' is not empty", dir.display());
    }
    Ok(())
}

/// Creates a new project from `template`; returns the manifest path.
pub(crate) fn scaffold_project(
    template: &str,
    dir: &Path,
    name: &str,
    model: &str,
) -> Result<PathBuf> {
    ensure_empty_target(dir)?;
    fs::create_dir_all(dir.join(PROJECT_AGENTS_DIR))
        .with_context(|| format!("failed to create project at '{}'", dir.display()))?;
    let manifest = ProjectManifest {
        template,
        name,
        model,
        created_unix_ms: current_unix_timestamp_ms(),
    };
    let payload =
        serde_json::to_string_pretty(&manifest).context("failed to encode project manifest")?;
    let manifest_path = dir.join(PROJECT_MANIFEST_PATH);
    write_text_atomic(&manifest_path, &payload)?;
    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;
    use tempfile::tempdir;

    use super::{scaffold_project, PROJECT_MANIFEST_PATH};

    #[test]
    fn functional_scaffold_project_writes_manifest_and_agents_dir() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("demo");
        let manifest_path =
            scaffold_project("starter", &target, "demo", "models/gemini-2.5-pro").expect("scaffold");

        assert_eq!(manifest_path, target.join(PROJECT_MANIFEST_PATH));
        assert!(target.join(".agents").is_dir());
        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(manifest_path).expect("read")).expect("json");
        assert_eq!(manifest["template"], "starter");
        assert_eq!(manifest["name"], "demo");
        assert_eq!(manifest["model"], "models/gemini-2.5-pro");
        assert!(manifest["created_unix_ms"].as_u64().expect("timestamp") > 0);
    }

    #[test]
    fn regression_scaffold_project_refuses_non_empty_directory() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("keep.txt"), "existing").expect("write");
        let error = scaffold_project("starter", temp.path(), "demo", "m")
            .expect_err("non-empty target should fail");
        assert!(error.to_string().contains("is not empty"));
        assert!(!temp.path().join(PROJECT_MANIFEST_PATH).exists());
    }

    #[test]
    fn unit_scaffold_project_accepts_existing_empty_directory() {
        let temp = tempdir().expect("tempdir");
        scaffold_project("starter", temp.path(), "demo", "m").expect("scaffold");
        assert!(temp.path().join(PROJECT_MANIFEST_PATH).exists());
    }
}
