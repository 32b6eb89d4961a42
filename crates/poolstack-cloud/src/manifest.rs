//! Local manifest of the resources a stack run created or adopted
//!
//! Stored as `<state_dir>/<pool-name>.json`. Role and policy names are always
//! re-derived from the pool name; the manifest is what lets `delete` find the
//! user pool, whose ID is assigned by the remote service.

use crate::error::{CloudError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_VERSION: u32 = 1;
const MANIFEST_EXT: &str = "json";
const BACKUP_EXT: &str = "json.backup";

/// Kind of remote resource in a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    IamRole,
    IamRolePolicy,
    UserPool,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::IamRole => write!(f, "iam-role"),
            ResourceKind::IamRolePolicy => write!(f, "iam-role-policy"),
            ResourceKind::UserPool => write!(f, "user-pool"),
        }
    }
}

/// Whether this tool created a resource or found it already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Created,
    Adopted,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Created => write!(f, "created"),
            Origin::Adopted => write!(f, "adopted"),
        }
    }
}

/// Remote identifier of one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub kind: ResourceKind,

    /// Remote identifier (role ARN, pool ID, policy name)
    pub id: String,

    /// Resource name
    pub name: String,

    pub origin: Origin,

    /// Extra attributes (role ID, pool ARN, ...)
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,

    pub recorded_at: DateTime<Utc>,
}

impl ResourceRecord {
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        name: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            origin,
            attributes: BTreeMap::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Manifest key (kind:id)
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Manifest of one pool's stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackManifest {
    pub version: u32,

    pub pool_name: String,

    pub updated_at: DateTime<Utc>,

    /// Resources indexed by kind:id
    pub resources: BTreeMap<String, ResourceRecord>,
}

impl StackManifest {
    pub fn new(pool_name: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            pool_name: pool_name.into(),
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Add or refresh a resource
    ///
    /// Re-recording a known resource keeps its original origin and time.
    pub fn record(&mut self, mut record: ResourceRecord) {
        let key = record.key();
        if let Some(previous) = self.resources.get(&key) {
            record.origin = previous.origin;
            record.recorded_at = previous.recorded_at;
        }
        self.resources.insert(key, record);
        self.updated_at = Utc::now();
    }

    pub fn forget(&mut self, key: &str) -> Option<ResourceRecord> {
        let removed = self.resources.remove(key);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Remove every resource of a kind
    pub fn forget_kind(&mut self, kind: ResourceKind) {
        let before = self.resources.len();
        self.resources.retain(|_, record| record.kind != kind);
        if self.resources.len() != before {
            self.updated_at = Utc::now();
        }
    }

    pub fn get(&self, key: &str) -> Option<&ResourceRecord> {
        self.resources.get(key)
    }

    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&ResourceRecord> {
        self.resources
            .values()
            .filter(|record| record.kind == kind)
            .collect()
    }
}

/// Reads and writes stack manifests in a state directory
#[derive(Debug, Clone)]
pub struct ManifestStore {
    state_dir: PathBuf,
}

impl ManifestStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    /// Manifest file path for a pool
    pub fn manifest_path(&self, pool_name: &str) -> PathBuf {
        self.state_dir
            .join(format!("{}.{}", file_stem(pool_name), MANIFEST_EXT))
    }

    fn backup_path(&self, pool_name: &str) -> PathBuf {
        self.state_dir
            .join(format!("{}.{}", file_stem(pool_name), BACKUP_EXT))
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
            tracing::debug!("Created state directory: {}", self.state_dir.display());
        }
        Ok(())
    }

    /// Load a pool's manifest, or an empty one if none was written yet
    pub async fn load(&self, pool_name: &str) -> Result<StackManifest> {
        let path = self.manifest_path(pool_name);
        if !path.exists() {
            tracing::debug!("Manifest not found at {}, starting empty", path.display());
            return Ok(StackManifest::new(pool_name));
        }

        let content = fs::read_to_string(&path).await?;
        let manifest: StackManifest = serde_json::from_str(&content)?;

        if manifest.version > MANIFEST_VERSION {
            return Err(CloudError::StateError(format!(
                "Manifest version {} is newer than supported version {}",
                manifest.version, MANIFEST_VERSION
            )));
        }
        if manifest.pool_name != pool_name {
            return Err(CloudError::StateError(format!(
                "Manifest {} belongs to pool {}, not {}",
                path.display(),
                manifest.pool_name,
                pool_name
            )));
        }

        tracing::debug!("Loaded manifest with {} resources", manifest.resources.len());
        Ok(manifest)
    }

    /// Write a manifest, keeping the previous file as a backup
    pub async fn save(&self, manifest: &StackManifest) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.manifest_path(&manifest.pool_name);
        let backup = self.backup_path(&manifest.pool_name);

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
        }

        let content = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, content).await?;

        tracing::debug!(
            "Saved manifest for {} with {} resources",
            manifest.pool_name,
            manifest.resources.len()
        );
        Ok(())
    }

    /// Remove a pool's manifest and its backup
    pub async fn remove(&self, pool_name: &str) -> Result<()> {
        for path in [self.manifest_path(pool_name), self.backup_path(pool_name)] {
            if path.exists() {
                fs::remove_file(&path).await?;
            }
        }
        tracing::debug!("Removed manifest for {}", pool_name);
        Ok(())
    }
}

/// File-system safe form of a pool name
///
/// Bytes outside `[A-Za-z0-9._-]` are percent-encoded, `%` included, so
/// distinct pool names never share a manifest file.
fn file_stem(pool_name: &str) -> String {
    let mut stem = String::with_capacity(pool_name.len());
    for byte in pool_name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_manifest_save_load() {
        let temp_dir = tempdir().unwrap();
        let store = ManifestStore::new(temp_dir.path());

        let mut manifest = StackManifest::new("hoge-pool");
        manifest.record(
            ResourceRecord::new(
                ResourceKind::UserPool,
                "ap-northeast-1_AbCdEf",
                "hoge-pool",
                Origin::Created,
            )
            .with_attribute("arn", serde_json::json!("arn:aws:cognito-idp:pool")),
        );
        store.save(&manifest).await.unwrap();

        let loaded = store.load("hoge-pool").await.unwrap();
        let pool = loaded.get("user-pool:ap-northeast-1_AbCdEf").unwrap();
        assert_eq!(pool.id, "ap-northeast-1_AbCdEf");
        assert_eq!(
            pool.get_attribute::<String>("arn").as_deref(),
            Some("arn:aws:cognito-idp:pool")
        );
    }

    #[tokio::test]
    async fn test_missing_manifest_is_empty() {
        let temp_dir = tempdir().unwrap();
        let store = ManifestStore::new(temp_dir.path().join("nested"));

        let manifest = store.load("hoge-pool").await.unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.pool_name, "hoge-pool");
    }

    #[tokio::test]
    async fn test_save_keeps_backup_and_remove_clears_both() {
        let temp_dir = tempdir().unwrap();
        let store = ManifestStore::new(temp_dir.path());

        let manifest = StackManifest::new("hoge-pool");
        store.save(&manifest).await.unwrap();
        store.save(&manifest).await.unwrap();
        assert!(store.backup_path("hoge-pool").exists());

        store.remove("hoge-pool").await.unwrap();
        assert!(!store.manifest_path("hoge-pool").exists());
        assert!(!store.backup_path("hoge-pool").exists());
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = ManifestStore::new(temp_dir.path());

        let mut manifest = StackManifest::new("hoge-pool");
        manifest.version = MANIFEST_VERSION + 1;
        store.save(&manifest).await.unwrap();

        let err = store.load("hoge-pool").await.unwrap_err();
        assert!(matches!(err, CloudError::StateError(_)));
    }

    #[test]
    fn test_record_keeps_original_origin() {
        let mut manifest = StackManifest::new("hoge-pool");
        manifest.record(ResourceRecord::new(
            ResourceKind::IamRole,
            "arn:role",
            "hogepool-SMS-Role",
            Origin::Created,
        ));
        manifest.record(ResourceRecord::new(
            ResourceKind::IamRole,
            "arn:role",
            "hogepool-SMS-Role",
            Origin::Adopted,
        ));

        let roles = manifest.by_kind(ResourceKind::IamRole);
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].origin, Origin::Created);

        manifest.forget_kind(ResourceKind::IamRole);
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_manifest_path_is_sanitized() {
        let store = ManifestStore::new("/state");
        assert_eq!(
            store.manifest_path("team/pool one"),
            PathBuf::from("/state/team%2Fpool%20one.json")
        );
        assert_eq!(
            store.manifest_path("hoge-pool"),
            PathBuf::from("/state/hoge-pool.json")
        );
    }

    #[test]
    fn test_manifest_paths_do_not_collide() {
        let store = ManifestStore::new("/state");
        let names = [
            "hoge pool",
            "hoge_pool",
            "hoge+pool",
            "hoge@pool",
            "hoge%20pool",
            "hoge%2520pool",
        ];
        let paths: std::collections::HashSet<PathBuf> =
            names.iter().map(|name| store.manifest_path(name)).collect();
        assert_eq!(paths.len(), names.len());
    }

    #[tokio::test]
    async fn test_similar_pool_names_keep_separate_manifests() {
        let temp_dir = tempdir().unwrap();
        let store = ManifestStore::new(temp_dir.path());

        let mut spaced = StackManifest::new("hoge pool");
        spaced.record(ResourceRecord::new(
            ResourceKind::UserPool,
            "ap-northeast-1_Spaced",
            "hoge pool",
            Origin::Created,
        ));
        store.save(&spaced).await.unwrap();

        let underscored = store.load("hoge_pool").await.unwrap();
        assert!(underscored.is_empty());
        store.save(&underscored).await.unwrap();

        let reloaded = store.load("hoge pool").await.unwrap();
        assert!(reloaded.get("user-pool:ap-northeast-1_Spaced").is_some());
    }
}
