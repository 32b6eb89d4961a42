//! Pool name validation and derived resource names
//!
//! Every remote resource name is computed from the pool name alone, so a
//! later `delete` finds the same role and policy without any local state.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};

/// Character IAM names may carry but the derived base name drops
pub const SEPARATOR: char = '-';

const ROLE_SUFFIX: &str = "-SMS-Role";
const POLICY_SUFFIX: &str = "-SMS-Policy";

// IAM limits
const MAX_ROLE_NAME_LEN: usize = 64;
const MAX_POLICY_NAME_LEN: usize = 128;

/// Operator-chosen user pool name, used verbatim as the pool's display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolName(String);

impl PoolName {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CloudError::InvalidConfig(
                "pool name must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pool name with every separator removed
    pub fn base_name(&self) -> String {
        self.0.replace(SEPARATOR, "")
    }
}

impl std::fmt::Display for PoolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// IAM names derived from a pool name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackNames {
    pub role_name: String,
    pub policy_name: String,
}

impl StackNames {
    pub fn derive(pool: &PoolName) -> Result<Self> {
        let base = pool.base_name();
        if let Some(invalid) = base.chars().find(|c| !is_iam_name_char(*c)) {
            return Err(CloudError::InvalidConfig(format!(
                "pool name {} contains {:?}, which IAM role names do not allow",
                pool, invalid
            )));
        }
        let names = Self {
            role_name: format!("{}{}", base, ROLE_SUFFIX),
            policy_name: format!("{}{}", base, POLICY_SUFFIX),
        };

        if names.role_name.len() > MAX_ROLE_NAME_LEN {
            return Err(CloudError::InvalidConfig(format!(
                "derived role name {} exceeds {} characters",
                names.role_name, MAX_ROLE_NAME_LEN
            )));
        }
        if names.policy_name.len() > MAX_POLICY_NAME_LEN {
            return Err(CloudError::InvalidConfig(format!(
                "derived policy name {} exceeds {} characters",
                names.policy_name, MAX_POLICY_NAME_LEN
            )));
        }

        Ok(names)
    }
}

/// Characters IAM accepts in role and policy names (`[\w+=,.@-]`)
fn is_iam_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '=' | ',' | '.' | '@' | '-')
}
