//! poolstack cloud core
//!
//! Provider-neutral reconciliation of an SMS-capable user pool stack:
//! an IAM role the user pool service may assume, an inline policy letting
//! that role publish SMS, and the user pool wired to the role.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 poolstack CLI                    │
//! │             (poolstack create/delete)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                poolstack-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │            StackOrchestrator              │   │
//! │  │   RoleReconciler      ManifestStore       │   │
//! │  └──────────────────────────────────────────┘   │
//! │  trait RoleApi          trait DirectoryApi      │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │    AWS IAM    │ │ AWS Cognito   │
//! │ (cloud-aws)   │ │ (cloud-aws)   │
//! └───────────────┘ └───────────────┘
//! ```

pub mod error;
pub mod manifest;
pub mod naming;
pub mod orchestrator;
pub mod policy;
pub mod provider;
pub mod reconciler;
pub mod report;
pub mod user_pool;

#[cfg(test)]
mod testing;

// Re-exports
pub use error::{CloudError, Result, Step, StepContext};
pub use manifest::{ManifestStore, Origin, ResourceKind, ResourceRecord, StackManifest};
pub use naming::{PoolName, StackNames};
pub use orchestrator::{StackOrchestrator, StackOutcome};
pub use policy::{PolicyDocument, SMS_EXTERNAL_ID};
pub use provider::{CreateRoleRequest, DirectoryApi, RoleApi, RoleIdentity};
pub use reconciler::{EnsuredRole, ExistingRolePolicy, RoleReconciler};
pub use report::{StepResult, TeardownReport};
pub use user_pool::{UserPoolIdentity, UserPoolSpec, VerifiedAttribute};
