//! AWS provider for poolstack
//!
//! Implements [`RoleApi`](poolstack_cloud::RoleApi) over IAM and
//! [`DirectoryApi`](poolstack_cloud::DirectoryApi) over Cognito user pools.
//!
//! # Requirements
//!
//! - AWS credentials resolvable by the default chain (env vars, shared
//!   config/credentials files, SSO, instance profile)
//! - IAM: `GetRole`, `CreateRole`, `PutRolePolicy`, `DeleteRolePolicy`,
//!   `DeleteRole`, `PassRole` on the SMS role
//! - Cognito: `CreateUserPool`, `ListUserPools`, `DeleteUserPool`
//!
//! # Example
//!
//! ```ignore
//! use poolstack_cloud::{ManifestStore, PoolName, RoleReconciler, StackOrchestrator};
//! use poolstack_cloud_aws::{AwsOptions, AwsProvider};
//!
//! let aws = AwsProvider::connect(&AwsOptions::default()).await;
//! let stack = StackOrchestrator::new(
//!     PoolName::new("hoge-pool")?,
//!     RoleReconciler::new(aws.iam),
//!     aws.cognito,
//!     ManifestStore::new(".poolstack"),
//! )?;
//! stack.create().await?;
//! ```

pub mod cognito;
pub mod config;
pub mod error;
pub mod iam;

pub use cognito::CognitoDirectory;
pub use config::{AwsOptions, load_sdk_config};
pub use error::{AwsError, Result};
pub use iam::IamRoles;

/// IAM and Cognito clients sharing one SDK configuration
#[derive(Debug, Clone)]
pub struct AwsProvider {
    pub iam: IamRoles,
    pub cognito: CognitoDirectory,
    pub region: Option<String>,
}

impl AwsProvider {
    pub async fn connect(options: &AwsOptions) -> Self {
        let sdk_config = load_sdk_config(options).await;
        Self {
            iam: IamRoles::new(aws_sdk_iam::Client::new(&sdk_config)),
            cognito: CognitoDirectory::new(aws_sdk_cognitoidentityprovider::Client::new(
                &sdk_config,
            )),
            region: sdk_config.region().map(|r| r.to_string()),
        }
    }
}
