//! Stack orchestration
//!
//! `create` reconciles the SMS role and then creates the user pool wired to
//! it. `delete` walks the same resources in reverse: user pools first, then
//! the inline policy and the role.

use crate::error::{CloudError, Result, Step, StepContext};
use crate::manifest::{ManifestStore, Origin, ResourceKind, ResourceRecord, StackManifest};
use crate::naming::{PoolName, StackNames};
use crate::provider::{DirectoryApi, RoleApi};
use crate::reconciler::{EnsuredRole, RoleReconciler};
use crate::report::TeardownReport;
use crate::user_pool::{UserPoolIdentity, UserPoolSpec};

/// Result of a successful `create`
#[derive(Debug, Clone)]
pub struct StackOutcome {
    pub role: EnsuredRole,
    pub user_pool: UserPoolIdentity,
}

/// Creates and deletes the role + user pool stack of one pool name
pub struct StackOrchestrator<R, D> {
    pool: PoolName,
    names: StackNames,
    reconciler: RoleReconciler<R>,
    directory: D,
    manifests: ManifestStore,
}

impl<R: RoleApi, D: DirectoryApi> StackOrchestrator<R, D> {
    pub fn new(
        pool: PoolName,
        reconciler: RoleReconciler<R>,
        directory: D,
        manifests: ManifestStore,
    ) -> Result<Self> {
        let names = StackNames::derive(&pool)?;
        Ok(Self {
            pool,
            names,
            reconciler,
            directory,
            manifests,
        })
    }

    pub fn pool_name(&self) -> &PoolName {
        &self.pool
    }

    pub fn names(&self) -> &StackNames {
        &self.names
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    /// Ensure the SMS role, then create the user pool that uses it
    pub async fn create(&self) -> Result<StackOutcome> {
        let mut manifest = self
            .manifests
            .load(self.pool.as_str())
            .await
            .at_step(Step::LoadManifest)?;

        let role = self
            .reconciler
            .ensure_role(&self.names)
            .await
            .at_step(Step::EnsureRole)?;
        let identity = role.identity();
        tracing::info!("Role ARN: {}", identity.arn);
        tracing::info!("Role ID: {}", identity.role_id);

        manifest.record(
            ResourceRecord::new(
                ResourceKind::IamRole,
                &identity.arn,
                &self.names.role_name,
                role.origin(),
            )
            .with_attribute("role_id", serde_json::json!(identity.role_id)),
        );
        manifest.record(ResourceRecord::new(
            ResourceKind::IamRolePolicy,
            &self.names.policy_name,
            &self.names.policy_name,
            role.origin(),
        ));
        // Written before the pool call so a failed pool creation still
        // leaves the role on record
        self.manifests
            .save(&manifest)
            .await
            .at_step(Step::SaveManifest)?;

        let existing_pools = manifest.by_kind(ResourceKind::UserPool).len();
        if existing_pools > 0 {
            tracing::warn!(
                "{} user pool(s) named {} already recorded; creating another",
                existing_pools,
                self.pool
            );
        }

        let spec = UserPoolSpec::new(&self.pool, &identity.arn);
        let user_pool = self
            .directory
            .create_user_pool(&spec)
            .await
            .at_step(Step::CreateUserPool)?;
        tracing::info!("Created user pool {} ({})", user_pool.name, user_pool.id);

        let mut record = ResourceRecord::new(
            ResourceKind::UserPool,
            &user_pool.id,
            &user_pool.name,
            Origin::Created,
        );
        if let Some(arn) = &user_pool.arn {
            record = record.with_attribute("arn", serde_json::json!(arn));
        }
        manifest.record(record);
        self.manifests
            .save(&manifest)
            .await
            .at_step(Step::SaveManifest)?;

        Ok(StackOutcome { role, user_pool })
    }

    /// Delete the user pool(s), then the inline policy and role
    ///
    /// Pool deletion and role teardown do not depend on each other, so both
    /// run and their failures are collected. Within role teardown a failed
    /// policy removal blocks role deletion.
    pub async fn delete(&self) -> Result<TeardownReport> {
        let mut manifest = self
            .manifests
            .load(self.pool.as_str())
            .await
            .at_step(Step::LoadManifest)?;
        let mut report = TeardownReport::new();

        for pool_id in self.pools_to_delete(&manifest, &mut report).await {
            match self.directory.delete_user_pool(&pool_id).await {
                Ok(()) => {
                    tracing::info!("Deleted user pool {}", pool_id);
                    report.add_success(Step::DeleteUserPool, &pool_id, "deleted");
                    manifest.forget(&format!("{}:{}", ResourceKind::UserPool, pool_id));
                }
                Err(e) if e.is_not_found() => {
                    tracing::warn!("User pool {} already absent", pool_id);
                    report.add_success(Step::DeleteUserPool, &pool_id, "already absent");
                    manifest.forget(&format!("{}:{}", ResourceKind::UserPool, pool_id));
                }
                Err(e) => {
                    let e = CloudError::at(Step::DeleteUserPool, e);
                    tracing::error!("Failed to delete user pool {}: {}", pool_id, e);
                    report.add_failure(Step::DeleteUserPool, &pool_id, &e);
                }
            }
        }

        let role_name = &self.names.role_name;
        let policy_name = &self.names.policy_name;
        match self.reconciler.delete_role(&self.names).await {
            Ok(()) => {
                report.add_success(Step::DeleteRolePolicy, policy_name, "deleted");
                report.add_success(Step::DeleteRole, role_name, "deleted");
                manifest.forget_kind(ResourceKind::IamRolePolicy);
                manifest.forget_kind(ResourceKind::IamRole);
            }
            Err(e) if e.step() == Some(Step::DeleteRolePolicy) => {
                tracing::error!("Failed to delete inline policy {}: {}", policy_name, e);
                report.add_failure(Step::DeleteRolePolicy, policy_name, &e);
                report.add_skipped(
                    Step::DeleteRole,
                    role_name,
                    "inline policy could not be removed",
                );
            }
            Err(e) => {
                tracing::error!("Failed to delete role {}: {}", role_name, e);
                report.add_success(Step::DeleteRolePolicy, policy_name, "deleted");
                report.add_failure(Step::DeleteRole, role_name, &e);
                manifest.forget_kind(ResourceKind::IamRolePolicy);
            }
        }

        let manifest_path = self
            .manifests
            .manifest_path(self.pool.as_str())
            .display()
            .to_string();
        if manifest.is_empty() {
            if let Err(e) = self.manifests.remove(self.pool.as_str()).await {
                tracing::error!("Failed to remove manifest {}: {}", manifest_path, e);
                report.add_failure(Step::RemoveManifest, &manifest_path, &e);
            }
        } else if let Err(e) = self.manifests.save(&manifest).await {
            tracing::error!("Failed to save manifest {}: {}", manifest_path, e);
            report.add_failure(Step::SaveManifest, &manifest_path, &e);
        }

        report.into_result()
    }

    /// IDs of the pools `delete` should remove
    ///
    /// Recorded pools win. Without a record, a single pool with the exact
    /// name is taken; several are ambiguous and reported as a failure.
    async fn pools_to_delete(
        &self,
        manifest: &StackManifest,
        report: &mut TeardownReport,
    ) -> Vec<String> {
        let recorded: Vec<String> = manifest
            .by_kind(ResourceKind::UserPool)
            .into_iter()
            .map(|record| record.id.clone())
            .collect();
        if !recorded.is_empty() {
            return recorded;
        }

        let name = self.pool.as_str();
        match self.directory.find_user_pools(name).await {
            Ok(pools) if pools.is_empty() => {
                tracing::info!("No user pool named {}", name);
                report.add_success(Step::FindUserPool, name, "no user pool found");
                Vec::new()
            }
            Ok(pools) if pools.len() == 1 => {
                tracing::warn!(
                    "User pool {} not in manifest, found {} by name",
                    name,
                    pools[0].id
                );
                pools.into_iter().map(|pool| pool.id).collect()
            }
            Ok(pools) => {
                let ids: Vec<&str> = pools.iter().map(|pool| pool.id.as_str()).collect();
                let e = CloudError::at(
                    Step::FindUserPool,
                    CloudError::StateError(format!(
                        "{} user pools named {} and none recorded locally ({}); delete them by ID",
                        pools.len(),
                        name,
                        ids.join(", ")
                    )),
                );
                report.add_failure(Step::FindUserPool, name, &e);
                Vec::new()
            }
            Err(e) => {
                let e = CloudError::at(Step::FindUserPool, e);
                report.add_failure(Step::FindUserPool, name, &e);
                Vec::new()
            }
        }
    }

    /// Manifest as recorded by previous runs
    pub async fn status(&self) -> Result<StackManifest> {
        self.manifests
            .load(self.pool.as_str())
            .await
            .at_step(Step::LoadManifest)
    }
}
