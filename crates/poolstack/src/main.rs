mod commands;

use clap::{Parser, Subcommand};
use poolstack_cloud_aws::AwsOptions;
use poolstack_config::{Overrides, PoolstackConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poolstack")]
#[command(about = "SMS対応のCognitoユーザープールとIAMロールを構築する", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(clap::Args)]
struct GlobalArgs {
    /// ユーザープール名（ロール名・ポリシー名はここから導出）
    /// 省略時は COGNITO_POOL_NAME 環境変数、なければ hoge-pool
    #[arg(long, global = true)]
    pool_name: Option<String>,

    /// 既存ロールの扱い (reuse, fail)
    /// 省略時は COGNITO_EXISTING_ROLE 環境変数、なければ reuse
    #[arg(long, global = true)]
    existing_role: Option<String>,

    /// マニフェストの保存先（POOLSTACK_STATE_DIR 環境変数でも指定可能）
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// AWSリージョン（省略時は標準のプロバイダーチェーン）
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWSプロファイル名
    #[arg(long, global = true)]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// ロール・インラインポリシー・ユーザープールを作成
    Create,
    /// ユーザープール・インラインポリシー・ロールを削除
    Delete,
    /// 記録済みのリソースを表示
    Status,
    /// バージョン情報を表示
    Version,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            pool_name: self.pool_name.clone(),
            existing_role: self.existing_role.clone(),
            state_dir: self.state_dir.clone(),
        }
    }

    fn aws_options(&self) -> AwsOptions {
        AwsOptions {
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 標準出力は人間向けの表示に使うので、ログはstderrへ
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Versionコマンドは設定不要
    if matches!(cli.command, Commands::Version) {
        println!("poolstack {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = PoolstackConfig::resolve(cli.global.overrides())?;

    match cli.command {
        Commands::Create => {
            commands::create::handle(&config, &cli.global.aws_options()).await?;
        }
        Commands::Delete => {
            commands::delete::handle(&config, &cli.global.aws_options()).await?;
        }
        Commands::Status => {
            commands::status::handle(&config).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
