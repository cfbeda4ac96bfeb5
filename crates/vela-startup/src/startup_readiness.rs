//! Concurrent readiness tasks.
//!
//! Every task is spawned when the orchestrator starts and runs to completion;
//! there is no cancellation. The aggregate is a settled join: a failing or
//! panicking task degrades its own slot and never short-circuits the others.

use std::future::Future;
use std::pin::Pin;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{AgentDefinitions, CleanupReport, ProjectContext};

/// Joins `futures` and keeps every result in input order.
pub async fn join_settled<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ReadinessTaskKind` values.
pub enum ReadinessTaskKind {
    FileContext,
    ProcessCleanup,
    AgentDefinitions,
}

impl ReadinessTaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessTaskKind::FileContext => "file-context-init",
            ReadinessTaskKind::ProcessCleanup => "process-cleanup",
            ReadinessTaskKind::AgentDefinitions => "agent-load-and-validate",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Public enum `ReadinessValue` used across Vela components.
pub enum ReadinessValue {
    FileContext(ProjectContext),
    ProcessCleanup(CleanupReport),
    AgentDefinitions(AgentDefinitions),
}

pub type ReadinessFuture =
    Pin<Box<dyn Future<Output = anyhow::Result<ReadinessValue>> + Send + 'static>>;

/// One independently executing startup subsystem.
pub struct ReadinessTask {
    pub kind: ReadinessTaskKind,
    pub future: ReadinessFuture,
}

impl ReadinessTask {
    pub fn new<F>(kind: ReadinessTaskKind, future: F) -> Self
    where
        F: Future<Output = anyhow::Result<ReadinessValue>> + Send + 'static,
    {
        Self {
            kind,
            future: Box::pin(future),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Settled result of one task; `Err` carries the degradation reason.
pub struct ReadinessOutcome {
    pub kind: ReadinessTaskKind,
    pub result: Result<ReadinessValue, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ordered outcomes of every readiness task, in launch order.
pub struct ReadinessReport {
    pub outcomes: Vec<ReadinessOutcome>,
}

impl ReadinessReport {
    pub fn project_context(&self) -> Option<&ProjectContext> {
        self.outcomes.iter().find_map(|outcome| match &outcome.result {
            Ok(ReadinessValue::FileContext(context)) => Some(context),
            _ => None,
        })
    }

    pub fn cleanup_report(&self) -> Option<CleanupReport> {
        self.outcomes.iter().find_map(|outcome| match &outcome.result {
            Ok(ReadinessValue::ProcessCleanup(report)) => Some(*report),
            _ => None,
        })
    }

    pub fn agent_definitions(&self) -> Option<&AgentDefinitions> {
        self.outcomes.iter().find_map(|outcome| match &outcome.result {
            Ok(ReadinessValue::AgentDefinitions(definitions)) => Some(definitions),
            _ => None,
        })
    }

    pub fn degraded(&self) -> Vec<ReadinessTaskKind> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .map(|outcome| outcome.kind)
            .collect()
    }

    pub fn is_fully_ready(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Public struct `ReadinessOrchestrator` used across Vela components.
pub struct ReadinessOrchestrator;

impl ReadinessOrchestrator {
    /// Spawns every task immediately. Must be called inside a tokio runtime.
    pub fn start(tasks: Vec<ReadinessTask>) -> ReadinessHandle {
        let running = tasks
            .into_iter()
            .map(|task| (task.kind, tokio::spawn(task.future)))
            .collect::<Vec<_>>();
        info!(tasks = running.len(), "readiness tasks started");
        ReadinessHandle { running }
    }
}

/// Handle to the running tasks; `wait` resolves once every task has settled.
pub struct ReadinessHandle {
    running: Vec<(ReadinessTaskKind, JoinHandle<anyhow::Result<ReadinessValue>>)>,
}

impl ReadinessHandle {
    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub async fn wait(self) -> ReadinessReport {
        let kinds = self
            .running
            .iter()
            .map(|(kind, _)| *kind)
            .collect::<Vec<_>>();
        let settled = join_settled(self.running.into_iter().map(|(_, handle)| async move {
            match handle.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(error)) => Err(format!("{error:#}")),
                Err(join_error) if join_error.is_panic() => {
                    Err("task panicked before completing".to_string())
                }
                Err(join_error) => Err(format!("task did not complete: {join_error}")),
            }
        }))
        .await;

        let outcomes = kinds
            .into_iter()
            .zip(settled)
            .map(|(kind, result)| {
                if let Err(reason) = &result {
                    warn!(
                        task = kind.as_str(),
                        reason = %reason,
                        "readiness task degraded; continuing without it"
                    );
                }
                ReadinessOutcome { kind, result }
            })
            .collect::<Vec<_>>();
        let report = ReadinessReport { outcomes };
        info!(
            degraded = report.degraded().len(),
            "readiness tasks settled"
        );
        report
    }
}
