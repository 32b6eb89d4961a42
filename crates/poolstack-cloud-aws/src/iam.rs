//! IAM role management over `aws-sdk-iam`

use crate::error::{AwsError, sdk_error};
use async_trait::async_trait;
use aws_sdk_iam::Client;
use aws_sdk_iam::types::Role;
use poolstack_cloud::{CreateRoleRequest, PolicyDocument, RoleApi, RoleIdentity};

/// IAM-backed [`RoleApi`]
#[derive(Debug, Clone)]
pub struct IamRoles {
    client: Client,
}

impl IamRoles {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn role_identity(role: &Role) -> RoleIdentity {
    RoleIdentity {
        arn: role.arn().to_string(),
        role_id: role.role_id().to_string(),
    }
}

#[async_trait]
impl RoleApi for IamRoles {
    async fn get_role(&self, role_name: &str) -> poolstack_cloud::Result<RoleIdentity> {
        let output = match self.client.get_role().role_name(role_name).send().await {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception())
                {
                    return Err(AwsError::NotFound(format!("role {}", role_name)).into());
                }
                return Err(sdk_error("GetRole", err).into());
            }
        };

        let role = output.role().ok_or(AwsError::MissingField {
            operation: "GetRole",
            field: "Role",
        })?;
        Ok(role_identity(role))
    }

    async fn create_role(
        &self,
        request: &CreateRoleRequest,
    ) -> poolstack_cloud::Result<RoleIdentity> {
        tracing::debug!("CreateRole {} at {}", request.role_name, request.path);
        let output = self
            .client
            .create_role()
            .role_name(&request.role_name)
            .path(&request.path)
            .assume_role_policy_document(request.trust_policy.to_json()?)
            .send()
            .await
            .map_err(|e| sdk_error("CreateRole", e))?;

        let role = output.role().ok_or(AwsError::MissingField {
            operation: "CreateRole",
            field: "Role",
        })?;
        Ok(role_identity(role))
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &PolicyDocument,
    ) -> poolstack_cloud::Result<()> {
        let result = self
            .client
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(document.to_json()?)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Err(AwsError::NotFound(format!("role {}", role_name)).into())
            }
            Err(err) => Err(sdk_error("PutRolePolicy", err).into()),
        }
    }

    async fn delete_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> poolstack_cloud::Result<()> {
        let result = self
            .client
            .delete_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Err(AwsError::NotFound(format!("policy {} on role {}", policy_name, role_name)).into())
            }
            Err(err) => Err(sdk_error("DeleteRolePolicy", err).into()),
        }
    }

    async fn delete_role(&self, role_name: &str) -> poolstack_cloud::Result<()> {
        let result = self.client.delete_role().role_name(role_name).send().await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Err(AwsError::NotFound(format!("role {}", role_name)).into())
            }
            Err(err) => Err(sdk_error("DeleteRole", err).into()),
        }
    }
}
