use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "設定ディレクトリが見つかりません。\
        POOLSTACK_STATE_DIR 環境変数または --state-dir で状態ディレクトリを指定してください"
    )]
    ConfigDirNotFound,

    #[error("{source_name} の値が不正です: {message}")]
    InvalidValue {
        source_name: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
