//! Error types for stack reconciliation

use crate::report::TeardownReport;
use thiserror::Error;

/// Named step of a create or delete run, used as error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    GetRole,
    CreateRole,
    PutRolePolicy,
    DeleteRolePolicy,
    DeleteRole,
    EnsureRole,
    CreateUserPool,
    FindUserPool,
    DeleteUserPool,
    LoadManifest,
    SaveManifest,
    RemoveManifest,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::GetRole => write!(f, "get-role"),
            Step::CreateRole => write!(f, "create-role"),
            Step::PutRolePolicy => write!(f, "put-role-policy"),
            Step::DeleteRolePolicy => write!(f, "delete-role-policy"),
            Step::DeleteRole => write!(f, "delete-role"),
            Step::EnsureRole => write!(f, "ensure-role"),
            Step::CreateUserPool => write!(f, "create-user-pool"),
            Step::FindUserPool => write!(f, "find-user-pool"),
            Step::DeleteUserPool => write!(f, "delete-user-pool"),
            Step::LoadManifest => write!(f, "load-manifest"),
            Step::SaveManifest => write!(f, "save-manifest"),
            Step::RemoveManifest => write!(f, "remove-manifest"),
        }
    }
}

/// Cloud stack errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource already exists: {0}")]
    ResourceAlreadyExists(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("{step} failed")]
    Step {
        step: Step,
        #[source]
        source: Box<CloudError>,
    },

    #[error(
        "role {arn} ({role_id}) was created but put-role-policy failed; \
         delete it manually or run `poolstack delete`"
    )]
    PolicyAttachFailed {
        arn: String,
        role_id: String,
        #[source]
        source: Box<CloudError>,
    },

    #[error("Teardown incomplete: {0}")]
    Teardown(TeardownReport),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Wrap an error with the name of the step that produced it
    pub fn at(step: Step, source: CloudError) -> Self {
        CloudError::Step {
            step,
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::ResourceNotFound(_))
    }

    /// The outermost step name attached to this error, if any
    pub fn step(&self) -> Option<Step> {
        match self {
            CloudError::Step { step, .. } => Some(*step),
            CloudError::PolicyAttachFailed { .. } => Some(Step::PutRolePolicy),
            _ => None,
        }
    }
}

/// Extension for attaching step context to results
pub trait StepContext<T> {
    fn at_step(self, step: Step) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn at_step(self, step: Step) -> Result<T> {
        self.map_err(|e| CloudError::at(step, e))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
