//! Remote API traits consumed by the reconciler and orchestrator

use crate::error::Result;
use crate::policy::PolicyDocument;
use crate::user_pool::{UserPoolIdentity, UserPoolSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Path prefix for roles assumed by AWS services
pub const SERVICE_ROLE_PATH: &str = "/service-role/";

/// Role management API
///
/// Implementations report a missing role or inline policy as
/// [`CloudError::ResourceNotFound`](crate::CloudError::ResourceNotFound) and
/// every other remote failure as some other variant.
#[async_trait]
pub trait RoleApi: Send + Sync {
    /// Look up a role by name
    async fn get_role(&self, role_name: &str) -> Result<RoleIdentity>;

    /// Create a role with the given trust policy
    async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleIdentity>;

    /// Create or replace an inline policy on a role
    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &PolicyDocument,
    ) -> Result<()>;

    /// Remove an inline policy from a role
    async fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> Result<()>;

    /// Delete a role that has no remaining inline policies
    async fn delete_role(&self, role_name: &str) -> Result<()>;
}

/// User directory management API
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Create a user pool
    async fn create_user_pool(&self, spec: &UserPoolSpec) -> Result<UserPoolIdentity>;

    /// List pools whose name matches exactly
    async fn find_user_pools(&self, pool_name: &str) -> Result<Vec<UserPoolIdentity>>;

    /// Delete a user pool by ID
    async fn delete_user_pool(&self, pool_id: &str) -> Result<()>;
}

/// Stable identity of a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIdentity {
    pub arn: String,
    pub role_id: String,
}

/// Parameters of a create-role call
#[derive(Debug, Clone)]
pub struct CreateRoleRequest {
    pub role_name: String,
    pub path: String,
    pub trust_policy: PolicyDocument,
}

impl CreateRoleRequest {
    pub fn service_role(role_name: impl Into<String>, trust_policy: PolicyDocument) -> Self {
        Self {
            role_name: role_name.into(),
            path: SERVICE_ROLE_PATH.to_string(),
            trust_policy,
        }
    }
}
