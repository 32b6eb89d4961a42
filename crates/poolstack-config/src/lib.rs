pub mod error;

pub use error::*;

use poolstack_cloud::{ExistingRolePolicy, PoolName};
use std::path::PathBuf;

/// プール名の環境変数
pub const POOL_NAME_VAR: &str = "COGNITO_POOL_NAME";
/// 既存ロールの扱い (reuse / fail)
pub const EXISTING_ROLE_VAR: &str = "COGNITO_EXISTING_ROLE";
/// マニフェストの保存先
pub const STATE_DIR_VAR: &str = "POOLSTACK_STATE_DIR";

pub const DEFAULT_POOL_NAME: &str = "hoge-pool";

/// 実行時設定（プロセス起動時に一度だけ読み込む）
#[derive(Debug, Clone)]
pub struct PoolstackConfig {
    pub pool_name: PoolName,
    pub existing_role: ExistingRolePolicy,
    pub state_dir: PathBuf,
}

/// CLI引数による上書き（環境変数より優先）
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub pool_name: Option<String>,
    pub existing_role: Option<String>,
    pub state_dir: Option<PathBuf>,
}

impl PoolstackConfig {
    /// 環境変数のみから設定を読み込む
    pub fn from_env() -> Result<Self> {
        Self::resolve(Overrides::default())
    }

    /// 以下の優先順位で設定を解決:
    /// 1. CLI引数
    /// 2. 環境変数 (COGNITO_POOL_NAME, COGNITO_EXISTING_ROLE, POOLSTACK_STATE_DIR)
    /// 3. デフォルト値
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let (pool_source, raw_pool) = pick(overrides.pool_name, POOL_NAME_VAR, "--pool-name")
            .unwrap_or_else(|| ("default".to_string(), DEFAULT_POOL_NAME.to_string()));
        let pool_name = PoolName::new(raw_pool).map_err(|e| ConfigError::InvalidValue {
            source_name: pool_source,
            message: e.to_string(),
        })?;

        let existing_role = match pick(overrides.existing_role, EXISTING_ROLE_VAR, "--existing-role")
        {
            Some((source_name, raw)) => {
                raw.parse::<ExistingRolePolicy>()
                    .map_err(|e| ConfigError::InvalidValue {
                        source_name,
                        message: e.to_string(),
                    })?
            }
            None => ExistingRolePolicy::default(),
        };

        let state_dir = match overrides.state_dir {
            Some(dir) => dir,
            None => match std::env::var(STATE_DIR_VAR) {
                Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => default_state_dir()?,
            },
        };

        tracing::debug!(
            "Resolved config: pool={}, existing_role={}, state_dir={}",
            pool_name,
            existing_role,
            state_dir.display()
        );

        Ok(Self {
            pool_name,
            existing_role,
            state_dir,
        })
    }
}

/// CLI引数 → 環境変数 の順で値を取り出し、取得元の名前と一緒に返す
fn pick(cli: Option<String>, var: &str, flag: &str) -> Option<(String, String)> {
    if let Some(value) = cli {
        return Some((flag.to_string(), value));
    }
    std::env::var(var).ok().map(|value| (var.to_string(), value))
}

/// デフォルトの状態ディレクトリ (~/.config/poolstack)
pub fn default_state_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join("poolstack"))
}
