//! Typed IAM policy documents
//!
//! Documents are built as structs and serialized to JSON only when handed to
//! the role API.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const POLICY_VERSION: &str = "2012-10-17";

/// Service principal of the Cognito user pool service
pub const COGNITO_IDP_SERVICE: &str = "cognito-idp.amazonaws.com";

/// External ID shared between the trust policy and the pool's SMS configuration
pub const SMS_EXTERNAL_ID: &str = "31ae2116-0aed-630a-b641-9ca9b0a8c050";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: OneOrMany,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany>,
    /// operator → (condition key → value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    /// Trust policy letting the Cognito user pool service assume the role,
    /// only when it presents `external_id`
    pub fn sms_trust(external_id: &str) -> Self {
        let mut string_equals = BTreeMap::new();
        string_equals.insert("sts:ExternalId".to_string(), external_id.to_string());
        let mut condition = BTreeMap::new();
        condition.insert("StringEquals".to_string(), string_equals);

        Self::new(vec![Statement {
            sid: Some(String::new()),
            effect: Effect::Allow,
            principal: Some(Principal {
                service: COGNITO_IDP_SERVICE.to_string(),
            }),
            action: OneOrMany::One("sts:AssumeRole".to_string()),
            resource: None,
            condition: Some(condition),
        }])
    }

    /// Permission policy allowing the role to publish SNS messages
    pub fn sns_publish() -> Self {
        Self::new(vec![Statement {
            sid: None,
            effect: Effect::Allow,
            principal: None,
            action: OneOrMany::Many(vec!["sns:publish".to_string()]),
            resource: Some(OneOrMany::Many(vec!["*".to_string()])),
            condition: None,
        }])
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sms_trust_wire_format() {
        let doc = PolicyDocument::sms_trust(SMS_EXTERNAL_ID);
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Sid": "",
                    "Effect": "Allow",
                    "Principal": { "Service": "cognito-idp.amazonaws.com" },
                    "Action": "sts:AssumeRole",
                    "Condition": {
                        "StringEquals": {
                            "sts:ExternalId": "31ae2116-0aed-630a-b641-9ca9b0a8c050"
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn test_sns_publish_wire_format() {
        let value: serde_json::Value =
            serde_json::from_str(&PolicyDocument::sns_publish().to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Action": ["sns:publish"],
                    "Resource": ["*"]
                }]
            })
        );
    }

    #[test]
    fn test_external_id_is_parameter() {
        let doc = PolicyDocument::sms_trust("other-id");
        let condition = doc.statement[0].condition.as_ref().unwrap();
        assert_eq!(condition["StringEquals"]["sts:ExternalId"], "other-id");
    }
}
