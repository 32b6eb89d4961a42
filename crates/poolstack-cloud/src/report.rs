//! Per-step results of a teardown run

use crate::error::{CloudError, Result, Step};
use serde::{Deserialize, Serialize};

/// Outcome of a teardown, one entry per attempted or skipped step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeardownReport {
    /// Steps that removed a resource or found it already gone
    pub succeeded: Vec<StepResult>,

    /// Steps that failed
    pub failed: Vec<StepResult>,

    /// Steps not attempted because an earlier step they depend on failed
    pub skipped: Vec<StepResult>,
}

/// Result of a single teardown step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Step name (e.g. "delete-role")
    pub step: String,

    /// Resource the step acted on
    pub resource: String,

    /// Success or skip message
    pub message: String,

    /// Error message if failed
    pub error: Option<String>,
}

impl TeardownReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn add_success(&mut self, step: Step, resource: impl Into<String>, message: impl Into<String>) {
        self.succeeded.push(StepResult {
            step: step.to_string(),
            resource: resource.into(),
            message: message.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, step: Step, resource: impl Into<String>, error: &CloudError) {
        self.failed.push(StepResult {
            step: step.to_string(),
            resource: resource.into(),
            message: String::new(),
            error: Some(render_chain(error)),
        });
    }

    pub fn add_skipped(&mut self, step: Step, resource: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(StepResult {
            step: step.to_string(),
            resource: resource.into(),
            message: reason.into(),
            error: None,
        });
    }

    /// Turn a report with failures into [`CloudError::Teardown`]
    pub fn into_result(self) -> Result<TeardownReport> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CloudError::Teardown(self))
        }
    }
}

impl std::fmt::Display for TeardownReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} skipped",
            self.succeeded.len(),
            self.failed.len(),
            self.skipped.len()
        )?;
        for failure in &self.failed {
            write!(
                f,
                "; {} {}: {}",
                failure.step,
                failure.resource,
                failure.error.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}

/// Render an error with its whole source chain on one line
fn render_chain(error: &CloudError) -> String {
    use std::error::Error as _;

    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        source = inner.source();
    }
    rendered
}
