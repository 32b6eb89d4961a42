//! User pool creation parameters
//!
//! Everything except the pool name and the SMS role ARN is a fixed constant.

use crate::naming::PoolName;
use crate::policy::SMS_EXTERNAL_ID;
use serde::{Deserialize, Serialize};

const INVITE_MESSAGE: &str = "{username} {####}";
const MESSAGE_SUBJECT: &str = "Your verification code";
const VERIFY_MESSAGE: &str = "{####}";
const UNUSED_ACCOUNT_VALIDITY_DAYS: i32 = 1;
const MIN_PASSWORD_LENGTH: i32 = 6;

/// Contact attribute Cognito verifies automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifiedAttribute {
    Email,
    PhoneNumber,
}

impl std::fmt::Display for VerifiedAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifiedAttribute::Email => write!(f, "email"),
            VerifiedAttribute::PhoneNumber => write!(f, "phone_number"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub email_message: String,
    pub email_subject: String,
    pub sms_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub minimum_length: i32,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_numbers: bool,
    pub require_symbols: bool,
}

/// Custom string attribute in the pool schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringAttribute {
    pub name: String,
    pub required: bool,
    pub mutable: bool,
    pub developer_only: bool,
    pub min_length: u32,
    pub max_length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfiguration {
    pub sns_caller_arn: String,
    pub external_id: String,
}

/// Full parameter bundle for a create-user-pool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolSpec {
    pub pool_name: String,
    /// `false` allows self-service sign-up
    pub admin_create_user_only: bool,
    pub invite_message: MessageTemplate,
    pub unused_account_validity_days: i32,
    pub auto_verified_attributes: Vec<VerifiedAttribute>,
    pub email_verification_message: String,
    pub email_verification_subject: String,
    pub sms_verification_message: String,
    pub sms_authentication_message: String,
    pub password_policy: PasswordPolicy,
    pub schema: Vec<StringAttribute>,
    pub sms_configuration: SmsConfiguration,
}

impl UserPoolSpec {
    pub fn new(pool_name: &PoolName, role_arn: impl Into<String>) -> Self {
        Self {
            pool_name: pool_name.as_str().to_string(),
            admin_create_user_only: false,
            invite_message: MessageTemplate {
                email_message: INVITE_MESSAGE.to_string(),
                email_subject: MESSAGE_SUBJECT.to_string(),
                sms_message: INVITE_MESSAGE.to_string(),
            },
            unused_account_validity_days: UNUSED_ACCOUNT_VALIDITY_DAYS,
            auto_verified_attributes: vec![VerifiedAttribute::Email, VerifiedAttribute::PhoneNumber],
            email_verification_message: VERIFY_MESSAGE.to_string(),
            email_verification_subject: MESSAGE_SUBJECT.to_string(),
            sms_verification_message: VERIFY_MESSAGE.to_string(),
            sms_authentication_message: VERIFY_MESSAGE.to_string(),
            password_policy: PasswordPolicy {
                minimum_length: MIN_PASSWORD_LENGTH,
                require_lowercase: false,
                require_uppercase: false,
                require_numbers: false,
                require_symbols: false,
            },
            schema: vec![StringAttribute {
                name: "user_name".to_string(),
                required: false,
                mutable: false,
                developer_only: false,
                min_length: 3,
                max_length: 64,
            }],
            sms_configuration: SmsConfiguration {
                sns_caller_arn: role_arn.into(),
                external_id: SMS_EXTERNAL_ID.to_string(),
            },
        }
    }
}

/// Identity of a user pool as reported by the directory API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolIdentity {
    pub id: String,
    pub name: String,
    pub arn: Option<String>,
}
