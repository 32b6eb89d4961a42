//! Cognito user pool management over `aws-sdk-cognitoidentityprovider`

use crate::error::{AwsError, Result, sdk_error};
use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::types::{
    AdminCreateUserConfigType, AttributeDataType, MessageTemplateType, PasswordPolicyType,
    SchemaAttributeType, SmsConfigurationType, StringAttributeConstraintsType,
    UserPoolPolicyType, VerifiedAttributeType,
};
use poolstack_cloud::{DirectoryApi, UserPoolIdentity, UserPoolSpec, VerifiedAttribute};

// ListUserPools upper bound
const LIST_PAGE_SIZE: i32 = 60;

/// Cognito-backed [`DirectoryApi`]
#[derive(Debug, Clone)]
pub struct CognitoDirectory {
    client: Client,
}

impl CognitoDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[allow(deprecated)]
fn admin_create_user_config(spec: &UserPoolSpec) -> AdminCreateUserConfigType {
    let template = &spec.invite_message;
    AdminCreateUserConfigType::builder()
        .allow_admin_create_user_only(spec.admin_create_user_only)
        .invite_message_template(
            MessageTemplateType::builder()
                .email_message(&template.email_message)
                .email_subject(&template.email_subject)
                .sms_message(&template.sms_message)
                .build(),
        )
        .unused_account_validity_days(spec.unused_account_validity_days)
        .build()
}

fn verified_attributes(spec: &UserPoolSpec) -> Vec<VerifiedAttributeType> {
    spec.auto_verified_attributes
        .iter()
        .map(|attr| match attr {
            VerifiedAttribute::Email => VerifiedAttributeType::Email,
            VerifiedAttribute::PhoneNumber => VerifiedAttributeType::PhoneNumber,
        })
        .collect()
}

fn user_pool_policy(spec: &UserPoolSpec) -> UserPoolPolicyType {
    let policy = &spec.password_policy;
    UserPoolPolicyType::builder()
        .password_policy(
            PasswordPolicyType::builder()
                .minimum_length(policy.minimum_length)
                .require_lowercase(policy.require_lowercase)
                .require_uppercase(policy.require_uppercase)
                .require_numbers(policy.require_numbers)
                .require_symbols(policy.require_symbols)
                .build(),
        )
        .build()
}

fn schema(spec: &UserPoolSpec) -> Vec<SchemaAttributeType> {
    spec.schema
        .iter()
        .map(|attr| {
            SchemaAttributeType::builder()
                .name(&attr.name)
                .attribute_data_type(AttributeDataType::String)
                .developer_only_attribute(attr.developer_only)
                .mutable(attr.mutable)
                .required(attr.required)
                .string_attribute_constraints(
                    StringAttributeConstraintsType::builder()
                        .min_length(attr.min_length.to_string())
                        .max_length(attr.max_length.to_string())
                        .build(),
                )
                .build()
        })
        .collect()
}

fn sms_configuration(spec: &UserPoolSpec) -> Result<SmsConfigurationType> {
    let sms = &spec.sms_configuration;
    if sms.sns_caller_arn.is_empty() {
        return Err(AwsError::InvalidInput(
            "SMS configuration needs a role ARN".to_string(),
        ));
    }
    Ok(SmsConfigurationType::builder()
        .sns_caller_arn(&sms.sns_caller_arn)
        .external_id(&sms.external_id)
        .build())
}

#[async_trait]
impl DirectoryApi for CognitoDirectory {
    async fn create_user_pool(
        &self,
        spec: &UserPoolSpec,
    ) -> poolstack_cloud::Result<UserPoolIdentity> {
        tracing::debug!("CreateUserPool {}", spec.pool_name);
        let output = self
            .client
            .create_user_pool()
            .pool_name(&spec.pool_name)
            .admin_create_user_config(admin_create_user_config(spec))
            .set_auto_verified_attributes(Some(verified_attributes(spec)))
            .email_verification_message(&spec.email_verification_message)
            .email_verification_subject(&spec.email_verification_subject)
            .policies(user_pool_policy(spec))
            .set_schema(Some(schema(spec)))
            .sms_authentication_message(&spec.sms_authentication_message)
            .sms_configuration(sms_configuration(spec)?)
            .sms_verification_message(&spec.sms_verification_message)
            .send()
            .await
            .map_err(|e| sdk_error("CreateUserPool", e))?;

        let pool = output.user_pool().ok_or(AwsError::MissingField {
            operation: "CreateUserPool",
            field: "UserPool",
        })?;
        let id = pool.id().ok_or(AwsError::MissingField {
            operation: "CreateUserPool",
            field: "UserPool.Id",
        })?;

        Ok(UserPoolIdentity {
            id: id.to_string(),
            name: pool.name().unwrap_or(spec.pool_name.as_str()).to_string(),
            arn: pool.arn().map(str::to_string),
        })
    }

    async fn find_user_pools(
        &self,
        pool_name: &str,
    ) -> poolstack_cloud::Result<Vec<UserPoolIdentity>> {
        let mut found = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_user_pools()
                .max_results(LIST_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| sdk_error("ListUserPools", e))?;

            for pool in output.user_pools() {
                if pool.name() != Some(pool_name) {
                    continue;
                }
                if let Some(id) = pool.id() {
                    found.push(UserPoolIdentity {
                        id: id.to_string(),
                        name: pool_name.to_string(),
                        arn: None,
                    });
                }
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Found {} user pool(s) named {}", found.len(), pool_name);
        Ok(found)
    }

    async fn delete_user_pool(&self, pool_id: &str) -> poolstack_cloud::Result<()> {
        let result = self
            .client
            .delete_user_pool()
            .user_pool_id(pool_id)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Err(AwsError::NotFound(format!("user pool {}", pool_id)).into())
            }
            Err(err) => Err(sdk_error("DeleteUserPool", err).into()),
        }
    }
}
