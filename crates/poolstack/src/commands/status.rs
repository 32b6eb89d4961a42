use colored::Colorize;
use poolstack_cloud::{ManifestStore, ResourceKind, StackNames};
use poolstack_config::PoolstackConfig;

/// ローカルのマニフェストだけを読む（AWSには接続しない）
pub async fn handle(config: &PoolstackConfig) -> anyhow::Result<()> {
    let names = StackNames::derive(&config.pool_name)?;
    let store = ManifestStore::new(&config.state_dir);
    let manifest = store.load(config.pool_name.as_str()).await?;

    println!("プール: {}", config.pool_name.as_str().cyan());
    println!("  ロール:   {}", names.role_name);
    println!("  ポリシー: {}", names.policy_name);
    println!(
        "{}",
        format!(
            "  マニフェスト: {}",
            store.manifest_path(config.pool_name.as_str()).display()
        )
        .dimmed()
    );
    println!();

    if manifest.is_empty() {
        println!("{}", "記録されたリソースはありません".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("リソース一覧 ({} 個):", manifest.resources.len()).bold()
    );
    for kind in [
        ResourceKind::IamRole,
        ResourceKind::IamRolePolicy,
        ResourceKind::UserPool,
    ] {
        for record in manifest.by_kind(kind) {
            println!(
                "  • {:<16} {} [{}]",
                kind.to_string(),
                record.id.cyan(),
                record.origin
            );
            if record.name != record.id {
                println!("    名前: {}", record.name);
            }
            println!(
                "    記録日時: {}",
                record.recorded_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }
    println!(
        "{}",
        format!("  最終更新: {}", manifest.updated_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    );
    Ok(())
}
