//! Stale process records under `<state-dir>/pids`.
//!
//! Each running session writes `<pid>.pid` holding its pid and start time.
//! Records whose process is gone, that are older than the age limit, or that
//! cannot be parsed are removed at the next startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vela_core::{current_unix_timestamp_ms, is_older_than_ms, write_text_atomic};
use vela_startup::{CleanupReport, StaleProcessCleanup};

const PID_DIR_NAME: &str = "pids";
const DEFAULT_MAX_RECORD_AGE_MS: u64 = 24 * 60 * 60 * 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProcessRecord {
    pub pid: u32,
    pub started_unix_ms: u64,
}

pub(crate) fn pid_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(PID_DIR_NAME)
}

#[cfg(target_os = "linux")]
fn process_is_alive(pid: u32) -> Option<bool> {
    Some(Path::new("/proc").join(pid.to_string()).exists())
}

#[cfg(not(target_os = "linux"))]
fn process_is_alive(_pid: u32) -> Option<bool> {
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordDisposition {
    Keep,
    Remove,
}

/// Decides whether one pid record stays. The current process is always kept.
pub(crate) fn classify_record(
    record: Option<&ProcessRecord>,
    liveness: Option<bool>,
    current_pid: u32,
    now_ms: u64,
    max_age_ms: u64,
) -> RecordDisposition {
    let Some(record) = record else {
        return RecordDisposition::Remove;
    };
    if record.pid == current_pid {
        return RecordDisposition::Keep;
    }
    if liveness == Some(false) || is_older_than_ms(record.started_unix_ms, now_ms, max_age_ms) {
        return RecordDisposition::Remove;
    }
    RecordDisposition::Keep
}

#[derive(Debug, Clone, Copy)]
/// Public struct `PidFileCleanup` used across Vela components.
pub(crate) struct PidFileCleanup {
    max_record_age_ms: u64,
}

impl Default for PidFileCleanup {
    fn default() -> Self {
        Self {
            max_record_age_ms: DEFAULT_MAX_RECORD_AGE_MS,
        }
    }
}

#[async_trait]
impl StaleProcessCleanup for PidFileCleanup {
    async fn cleanup(&self, state_dir: &Path) -> Result<CleanupReport> {
        let dir = pid_dir(state_dir);
        let max_age_ms = self.max_record_age_ms;
        tokio::task::spawn_blocking(move || remove_stale_records(&dir, max_age_ms))
            .await
            .context("process cleanup task failed")?
    }
}

pub(crate) fn remove_stale_records(dir: &Path, max_age_ms: u64) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();
    if !dir.exists() {
        return Ok(report);
    }
    let now_ms = current_unix_timestamp_ms();
    let current_pid = std::process::id();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read process records in '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list '{}'", dir.display()))?
            .path();
        if path.extension().and_then(|value| value.to_str()) != Some("pid") {
            continue;
        }
        report.inspected += 1;
        let record = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<ProcessRecord>(&raw).ok());
        let liveness = record.as_ref().and_then(|record| process_is_alive(record.pid));
        let disposition =
            classify_record(record.as_ref(), liveness, current_pid, now_ms, max_age_ms);
        if disposition == RecordDisposition::Keep {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                report.removed += 1;
                debug!(record = %path.display(), "removed stale process record");
            }
            Err(error) => warn!(
                record = %path.display(),
                error = %error,
                "failed to remove stale process record"
            ),
        }
    }
    Ok(report)
}

/// Removes the current session's record when dropped.
#[derive(Debug)]
pub(crate) struct SessionProcessGuard {
    path: PathBuf,
}

impl Drop for SessionProcessGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub(crate) fn register_session_process(state_dir: &Path) -> Result<SessionProcessGuard> {
    let pid = std::process::id();
    let path = pid_dir(state_dir).join(format!("{pid}.pid"));
    let record = ProcessRecord {
        pid,
        started_unix_ms: current_unix_timestamp_ms(),
    };
    let payload =
        serde_json::to_string(&record).context("failed to encode session process record")?;
    write_text_atomic(&path, &payload)?;
    Ok(SessionProcessGuard { path })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{
        classify_record, pid_dir, register_session_process, remove_stale_records,
        ProcessRecord, RecordDisposition,
    };

    #[test]
    fn unit_classify_record_uses_liveness_then_age() {
        let record = ProcessRecord {
            pid: 42,
            started_unix_ms: 1_000,
        };
        assert_eq!(
            classify_record(Some(&record), Some(false), 7, 2_000, 10_000),
            RecordDisposition::Remove
        );
        assert_eq!(
            classify_record(Some(&record), Some(true), 7, 5_000, 10_000),
            RecordDisposition::Keep
        );
        assert_eq!(
            classify_record(Some(&record), Some(true), 7, 900_000, 10_000),
            RecordDisposition::Remove
        );
        assert_eq!(
            classify_record(Some(&record), None, 7, 20_000, 10_000),
            RecordDisposition::Remove
        );
        assert_eq!(
            classify_record(Some(&record), None, 7, 5_000, 10_000),
            RecordDisposition::Keep
        );
        assert_eq!(
            classify_record(None, None, 7, 5_000, 10_000),
            RecordDisposition::Remove
        );
        assert_eq!(
            classify_record(Some(&record), Some(false), 42, 5_000, 10_000),
            RecordDisposition::Keep
        );
    }

    #[test]
    fn functional_remove_stale_records_keeps_current_process() {
        let temp = tempdir().expect("tempdir");
        let guard = register_session_process(temp.path()).expect("register");
        let dir = pid_dir(temp.path());
        fs::write(dir.join("garbage.pid"), "not json").expect("garbage");
        fs::write(dir.join("notes.txt"), "ignored").expect("notes");

        let report = remove_stale_records(&dir, 60_000).expect("cleanup");
        assert_eq!(report.inspected, 2);
        assert_eq!(report.removed, 1);
        assert!(dir.join(format!("{}.pid", std::process::id())).exists());
        assert!(dir.join("notes.txt").exists());

        drop(guard);
        assert!(!dir.join(format!("{}.pid", std::process::id())).exists());
    }

    #[test]
    fn unit_remove_stale_records_tolerates_missing_directory() {
        let temp = tempdir().expect("tempdir");
        let report = remove_stale_records(&temp.path().join("absent"), 1).expect("cleanup");
        assert_eq!(report.inspected, 0);
        assert_eq!(report.removed, 0);
    }
}
