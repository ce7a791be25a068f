//! Saga - ordered steps with compensations, run without a transaction.
//!
//! A workflow that touches several independently persisted stores is
//! expressed as a list of `{name, action, compensation}` steps. Steps run
//! strictly in order on the caller's task. When one fails, the
//! compensations of every step that already completed run in reverse
//! order. A failing compensation is logged as `RollbackFailed` and the
//! sweep continues; the caller always receives the original error.
//!
//! # Example
//!
//! ```ignore
//! Saga::new("create_session")
//!     .step(
//!         "persist_session",
//!         || async { sessions.save(&key, &session).await.map_err(DomainError::from) },
//!         || async { sessions.delete(&key).await.map_err(DomainError::from) },
//!     )
//!     .run()
//!     .await
//!     .map_err(SagaFailure::into_error)?;
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode};

type StepFn<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<(), DomainError>> + Send + 'a>;

struct Step<'a> {
    name: &'static str,
    action: StepFn<'a>,
    compensation: StepFn<'a>,
}

/// An ordered list of compensable steps.
pub struct Saga<'a> {
    name: &'static str,
    steps: Vec<Step<'a>>,
}

/// Outcome of a saga whose step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaFailure {
    pub saga: &'static str,
    pub failed_step: &'static str,
    /// The step's own error, unchanged.
    pub error: DomainError,
    /// Steps whose compensation succeeded, in the order they ran.
    pub compensated: Vec<&'static str>,
    /// Steps whose compensation failed, with the `RollbackFailed` error.
    pub rollback_failures: Vec<(&'static str, DomainError)>,
}

impl SagaFailure {
    /// True when every completed step was undone.
    pub fn fully_compensated(&self) -> bool {
        self.rollback_failures.is_empty()
    }

    /// The error reported to the caller: the original failure with the
    /// saga and step named. Compensation outcomes are not included.
    pub fn into_error(self) -> DomainError {
        self.error
            .context(format!("{} failed at {}", self.saga, self.failed_step))
            .with_detail("failed_step", self.failed_step)
    }
}

impl<'a> Saga<'a> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Append a step and the action that undoes it.
    pub fn step<A, AF, C, CF>(mut self, name: &'static str, action: A, compensation: C) -> Self
    where
        A: FnOnce() -> AF + Send + 'a,
        AF: Future<Output = Result<(), DomainError>> + Send + 'a,
        C: FnOnce() -> CF + Send + 'a,
        CF: Future<Output = Result<(), DomainError>> + Send + 'a,
    {
        self.steps.push(Step {
            name,
            action: Box::new(move || action().boxed()),
            compensation: Box::new(move || compensation().boxed()),
        });
        self
    }

    /// Append a step only when `include` holds.
    pub fn step_if<A, AF, C, CF>(
        self,
        include: bool,
        name: &'static str,
        action: A,
        compensation: C,
    ) -> Self
    where
        A: FnOnce() -> AF + Send + 'a,
        AF: Future<Output = Result<(), DomainError>> + Send + 'a,
        C: FnOnce() -> CF + Send + 'a,
        CF: Future<Output = Result<(), DomainError>> + Send + 'a,
    {
        if include {
            self.step(name, action, compensation)
        } else {
            self
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute every step in order.
    ///
    /// # Errors
    ///
    /// Returns a [`SagaFailure`] describing the first failed step after
    /// the compensation sweep has run.
    pub async fn run(self) -> Result<(), SagaFailure> {
        let saga = self.name;
        let mut completed: Vec<(&'static str, StepFn<'a>)> = Vec::with_capacity(self.steps.len());

        for step in self.steps {
            tracing::debug!(saga, step = step.name, "Running saga step");
            match (step.action)().await {
                Ok(()) => completed.push((step.name, step.compensation)),
                Err(error) => {
                    tracing::warn!(saga, step = step.name, error = %error, "Saga step failed, compensating");
                    let (compensated, rollback_failures) = Self::compensate(saga, completed).await;
                    return Err(SagaFailure {
                        saga,
                        failed_step: step.name,
                        error,
                        compensated,
                        rollback_failures,
                    });
                }
            }
        }

        tracing::debug!(saga, steps = completed.len(), "Saga committed");
        Ok(())
    }

    async fn compensate(
        saga: &'static str,
        completed: Vec<(&'static str, StepFn<'a>)>,
    ) -> (Vec<&'static str>, Vec<(&'static str, DomainError)>) {
        let mut compensated = Vec::new();
        let mut failures = Vec::new();

        for (name, compensation) in completed.into_iter().rev() {
            match compensation().await {
                Ok(()) => {
                    tracing::debug!(saga, step = name, "Compensated saga step");
                    compensated.push(name);
                }
                Err(e) => {
                    let error = DomainError::new(ErrorCode::RollbackFailed, e.message.clone())
                        .with_detail("step", name)
                        .with_detail("cause", e.code.to_string());
                    tracing::error!(
                        saga,
                        step = name,
                        code = %ErrorCode::RollbackFailed,
                        error = %e,
                        "Compensation failed, state may be inconsistent"
                    );
                    failures.push((name, error));
                }
            }
        }

        (compensated, failures)
    }
}

/// Serializes workflows that write to more than one store.
///
/// Each store orders writes to its own aggregate type only. Handlers that
/// share a lock run validation and every saga step without interleaving,
/// so a step never overwrites a record another workflow changed after
/// this one validated.
#[derive(Debug, Clone, Default)]
pub struct WorkflowLock(Arc<Mutex<()>>);

impl WorkflowLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use; released when the guard drops.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
