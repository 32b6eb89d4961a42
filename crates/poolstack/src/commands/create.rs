use super::{connect, print_names};
use colored::Colorize;
use poolstack_cloud::{EnsuredRole, Origin};
use poolstack_cloud_aws::AwsOptions;
use poolstack_config::PoolstackConfig;

pub async fn handle(config: &PoolstackConfig, options: &AwsOptions) -> anyhow::Result<()> {
    println!("{}", "スタックを作成中...".yellow());
    let stack = connect(config, options).await?;
    print_names(&stack);
    println!("既存ロールの扱い: {}", config.existing_role);

    println!();
    let outcome = stack.create().await?;

    let role = outcome.role.identity();
    match &outcome.role {
        EnsuredRole::Created(_) => println!("  ✓ ロールを作成しました"),
        EnsuredRole::Existing(_) => println!("  ℹ 既存のロールを再利用しました"),
    }
    println!("    ARN: {}", role.arn.cyan());
    println!("    ID:  {}", role.role_id);
    if outcome.role.origin() == Origin::Created {
        println!("  ✓ インラインポリシーを付与しました");
    }

    let pool = &outcome.user_pool;
    println!("  ✓ ユーザープールを作成しました");
    println!("    ID:  {}", pool.id.cyan());
    if let Some(arn) = &pool.arn {
        println!("    ARN: {}", arn);
    }

    println!();
    println!("{}", "✓ スタックの作成が完了しました！".green().bold());
    println!(
        "{}",
        format!(
            "  マニフェスト: {}",
            stack
                .manifests()
                .manifest_path(stack.pool_name().as_str())
                .display()
        )
        .dimmed()
    );
    Ok(())
}
