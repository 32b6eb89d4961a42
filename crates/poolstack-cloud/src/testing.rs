//! In-memory account implementing both remote APIs, for tests
//!
//! Records every call in order and can be told to fail a given operation.

use crate::error::{CloudError, Result};
use crate::naming::PoolName;
use crate::policy::PolicyDocument;
use crate::provider::{CreateRoleRequest, DirectoryApi, RoleApi, RoleIdentity};
use crate::user_pool::{UserPoolIdentity, UserPoolSpec};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

const ACCOUNT_ID: &str = "123456789012";
const REGION: &str = "us-east-1";

/// A remote call as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRole(String),
    CreateRole(String),
    PutRolePolicy(String, String),
    DeleteRolePolicy(String, String),
    DeleteRole(String),
    CreateUserPool(String),
    FindUserPools(String),
    DeleteUserPool(String),
}

#[derive(Debug, Clone)]
pub struct FakeRole {
    pub identity: RoleIdentity,
    pub path: String,
    pub trust_policy: PolicyDocument,
    pub policies: BTreeMap<String, PolicyDocument>,
}

#[derive(Debug, Default)]
struct Inner {
    roles: BTreeMap<String, FakeRole>,
    pools: BTreeMap<String, UserPoolSpec>,
    calls: Vec<Call>,
    failures: HashSet<String>,
    next_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Record a call and report an injected failure for `operation`
    fn enter(&mut self, call: Call, operation: &str) -> Result<()> {
        self.calls.push(call);
        if self.failures.contains(operation) {
            return Err(CloudError::ApiError(format!(
                "injected failure in {}",
                operation
            )));
        }
        Ok(())
    }

    fn insert_role(&mut self, name: &str, path: &str, trust_policy: PolicyDocument) -> RoleIdentity {
        let identity = RoleIdentity {
            arn: format!("arn:aws:iam::{}:role{}{}", ACCOUNT_ID, path, name),
            role_id: format!("AROA{:016}", self.next_id()),
        };
        self.roles.insert(
            name.to_string(),
            FakeRole {
                identity: identity.clone(),
                path: path.to_string(),
                trust_policy,
                policies: BTreeMap::new(),
            },
        );
        identity
    }
}

/// Shared handle to an in-memory account
#[derive(Debug, Clone, Default)]
pub struct FakeAccount {
    inner: Arc<Mutex<Inner>>,
}

impl FakeAccount {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every later call of `operation` (trait method name) fail
    pub fn fail_on(&self, operation: &str) {
        self.state().failures.insert(operation.to_string());
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Create a role out of band, as if another tool had made it
    pub fn seed_role(&self, name: &str) -> RoleIdentity {
        self.state()
            .insert_role(name, "/", PolicyDocument::new(Vec::new()))
    }

    /// Create a pool out of band and return its ID
    pub fn seed_pool(&self, name: &str) -> Result<String> {
        let spec = UserPoolSpec::new(&PoolName::new(name)?, "");
        let mut state = self.state();
        let id = format!("{}_seed{}", REGION, state.next_id());
        state.pools.insert(id.clone(), spec);
        Ok(id)
    }

    pub fn role(&self, name: &str) -> Option<FakeRole> {
        self.state().roles.get(name).cloned()
    }

    pub fn role_count(&self) -> usize {
        self.state().roles.len()
    }

    pub fn has_policy(&self, role_name: &str, policy_name: &str) -> bool {
        self.state()
            .roles
            .get(role_name)
            .is_some_and(|role| role.policies.contains_key(policy_name))
    }

    pub fn pool(&self, id: &str) -> Option<UserPoolSpec> {
        self.state().pools.get(id).cloned()
    }

    pub fn pool_count(&self) -> usize {
        self.state().pools.len()
    }

    /// No roles and no pools left
    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.roles.is_empty() && state.pools.is_empty()
    }
}

#[async_trait]
impl RoleApi for FakeAccount {
    async fn get_role(&self, role_name: &str) -> Result<RoleIdentity> {
        let mut state = self.state();
        state.enter(Call::GetRole(role_name.to_string()), "get_role")?;
        state
            .roles
            .get(role_name)
            .map(|role| role.identity.clone())
            .ok_or_else(|| CloudError::ResourceNotFound(format!("role {}", role_name)))
    }

    async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleIdentity> {
        let mut state = self.state();
        state.enter(Call::CreateRole(request.role_name.clone()), "create_role")?;
        if state.roles.contains_key(&request.role_name) {
            return Err(CloudError::ResourceAlreadyExists(format!(
                "role {}",
                request.role_name
            )));
        }
        Ok(state.insert_role(&request.role_name, &request.path, request.trust_policy.clone()))
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &PolicyDocument,
    ) -> Result<()> {
        let mut state = self.state();
        state.enter(
            Call::PutRolePolicy(role_name.to_string(), policy_name.to_string()),
            "put_role_policy",
        )?;
        let role = state
            .roles
            .get_mut(role_name)
            .ok_or_else(|| CloudError::ResourceNotFound(format!("role {}", role_name)))?;
        role.policies
            .insert(policy_name.to_string(), document.clone());
        Ok(())
    }

    async fn delete_role_policy(&self, role_name: &str, policy_name: &str) -> Result<()> {
        let mut state = self.state();
        state.enter(
            Call::DeleteRolePolicy(role_name.to_string(), policy_name.to_string()),
            "delete_role_policy",
        )?;
        let role = state
            .roles
            .get_mut(role_name)
            .ok_or_else(|| CloudError::ResourceNotFound(format!("role {}", role_name)))?;
        role.policies
            .remove(policy_name)
            .map(|_| ())
            .ok_or_else(|| CloudError::ResourceNotFound(format!("policy {}", policy_name)))
    }

    async fn delete_role(&self, role_name: &str) -> Result<()> {
        let mut state = self.state();
        state.enter(Call::DeleteRole(role_name.to_string()), "delete_role")?;
        match state.roles.get(role_name) {
            None => Err(CloudError::ResourceNotFound(format!("role {}", role_name))),
            Some(role) if !role.policies.is_empty() => Err(CloudError::ApiError(format!(
                "DeleteConflict: role {} still has inline policies",
                role_name
            ))),
            Some(_) => {
                state.roles.remove(role_name);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl DirectoryApi for FakeAccount {
    async fn create_user_pool(&self, spec: &UserPoolSpec) -> Result<UserPoolIdentity> {
        let mut state = self.state();
        state.enter(Call::CreateUserPool(spec.pool_name.clone()), "create_user_pool")?;
        let id = format!("{}_pool{}", REGION, state.next_id());
        state.pools.insert(id.clone(), spec.clone());
        Ok(UserPoolIdentity {
            arn: Some(format!(
                "arn:aws:cognito-idp:{}:{}:userpool/{}",
                REGION, ACCOUNT_ID, id
            )),
            name: spec.pool_name.clone(),
            id,
        })
    }

    async fn find_user_pools(&self, pool_name: &str) -> Result<Vec<UserPoolIdentity>> {
        let mut state = self.state();
        state.enter(Call::FindUserPools(pool_name.to_string()), "find_user_pools")?;
        Ok(state
            .pools
            .iter()
            .filter(|(_, spec)| spec.pool_name == pool_name)
            .map(|(id, spec)| UserPoolIdentity {
                id: id.clone(),
                name: spec.pool_name.clone(),
                arn: None,
            })
            .collect())
    }

    async fn delete_user_pool(&self, pool_id: &str) -> Result<()> {
        let mut state = self.state();
        state.enter(Call::DeleteUserPool(pool_id.to_string()), "delete_user_pool")?;
        state
            .pools
            .remove(pool_id)
            .map(|_| ())
            .ok_or_else(|| CloudError::ResourceNotFound(format!("user pool {}", pool_id)))
    }
}
