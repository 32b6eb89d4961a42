//! Role reconciliation
//!
//! Ensures the SMS role exists with its trust policy and inline permission
//! policy, and tears both down again. Existence of the role is the only
//! thing checked: a role whose trust or permission policy drifted from the
//! documents below is reused as-is.

use crate::error::{CloudError, Result, Step, StepContext};
use crate::manifest::Origin;
use crate::naming::StackNames;
use crate::policy::{PolicyDocument, SMS_EXTERNAL_ID};
use crate::provider::{CreateRoleRequest, RoleApi, RoleIdentity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What `ensure_role` does when the role is already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingRolePolicy {
    /// Return the existing identity without touching the role
    #[default]
    ReuseIfExists,
    /// Fail with [`CloudError::ResourceAlreadyExists`]
    FailIfExists,
}

impl std::fmt::Display for ExistingRolePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExistingRolePolicy::ReuseIfExists => write!(f, "reuse"),
            ExistingRolePolicy::FailIfExists => write!(f, "fail"),
        }
    }
}

impl FromStr for ExistingRolePolicy {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse" | "reuse-if-exists" => Ok(ExistingRolePolicy::ReuseIfExists),
            "fail" | "fail-if-exists" => Ok(ExistingRolePolicy::FailIfExists),
            other => Err(CloudError::InvalidConfig(format!(
                "unknown existing-role policy '{}' (expected 'reuse' or 'fail')",
                other
            ))),
        }
    }
}

/// Role identity plus how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsuredRole {
    Created(RoleIdentity),
    Existing(RoleIdentity),
}

impl EnsuredRole {
    pub fn identity(&self) -> &RoleIdentity {
        match self {
            EnsuredRole::Created(identity) | EnsuredRole::Existing(identity) => identity,
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            EnsuredRole::Created(_) => Origin::Created,
            EnsuredRole::Existing(_) => Origin::Adopted,
        }
    }
}

/// Creates, discovers and deletes the SMS role of a stack
pub struct RoleReconciler<R> {
    api: R,
    existing: ExistingRolePolicy,
    trust_policy: PolicyDocument,
    permission_policy: PolicyDocument,
}

impl<R: RoleApi> RoleReconciler<R> {
    pub fn new(api: R) -> Self {
        Self {
            api,
            existing: ExistingRolePolicy::default(),
            trust_policy: PolicyDocument::sms_trust(SMS_EXTERNAL_ID),
            permission_policy: PolicyDocument::sns_publish(),
        }
    }

    pub fn with_existing_policy(mut self, existing: ExistingRolePolicy) -> Self {
        self.existing = existing;
        self
    }

    /// Make sure the role exists and return its identity
    ///
    /// The role is looked up once. A not-found lookup leads to exactly one
    /// create-role call followed by the inline policy attachment.
    pub async fn ensure_role(&self, names: &StackNames) -> Result<EnsuredRole> {
        match self.api.get_role(&names.role_name).await {
            Ok(identity) => match self.existing {
                ExistingRolePolicy::ReuseIfExists => {
                    tracing::info!(
                        "Role {} already exists, reusing {}",
                        names.role_name,
                        identity.arn
                    );
                    Ok(EnsuredRole::Existing(identity))
                }
                ExistingRolePolicy::FailIfExists => Err(CloudError::ResourceAlreadyExists(
                    format!("role {} ({})", names.role_name, identity.arn),
                )),
            },
            Err(e) if e.is_not_found() => {
                tracing::debug!("Role {} not found, creating", names.role_name);
                self.create_role(names).await.map(EnsuredRole::Created)
            }
            Err(e) => Err(CloudError::at(Step::GetRole, e)),
        }
    }

    async fn create_role(&self, names: &StackNames) -> Result<RoleIdentity> {
        let request = CreateRoleRequest::service_role(&names.role_name, self.trust_policy.clone());
        let identity = self
            .api
            .create_role(&request)
            .await
            .at_step(Step::CreateRole)?;
        tracing::info!("Created role {} ({})", identity.arn, identity.role_id);

        if let Err(e) = self
            .api
            .put_role_policy(&names.role_name, &names.policy_name, &self.permission_policy)
            .await
        {
            tracing::error!(
                arn = %identity.arn,
                role_id = %identity.role_id,
                "Role was created but attaching {} failed: {}",
                names.policy_name,
                e
            );
            return Err(CloudError::PolicyAttachFailed {
                arn: identity.arn,
                role_id: identity.role_id,
                source: Box::new(CloudError::at(Step::PutRolePolicy, e)),
            });
        }
        tracing::info!("Attached inline policy {}", names.policy_name);

        Ok(identity)
    }

    /// Remove the inline policy, then the role
    ///
    /// IAM refuses to delete a role that still has inline policies, so a
    /// failed policy removal stops here. Resources already gone count as
    /// removed.
    pub async fn delete_role(&self, names: &StackNames) -> Result<()> {
        match self
            .api
            .delete_role_policy(&names.role_name, &names.policy_name)
            .await
        {
            Ok(()) => tracing::info!("Deleted inline policy {}", names.policy_name),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Inline policy {} already absent", names.policy_name)
            }
            Err(e) => return Err(CloudError::at(Step::DeleteRolePolicy, e)),
        }

        match self.api.delete_role(&names.role_name).await {
            Ok(()) => tracing::info!("Deleted role {}", names.role_name),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Role {} already absent", names.role_name)
            }
            Err(e) => return Err(CloudError::at(Step::DeleteRole, e)),
        }

        Ok(())
    }
}
