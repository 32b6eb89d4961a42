use super::{connect, print_names};
use colored::Colorize;
use poolstack_cloud::{CloudError, TeardownReport};
use poolstack_cloud_aws::AwsOptions;
use poolstack_config::PoolstackConfig;

pub async fn handle(config: &PoolstackConfig, options: &AwsOptions) -> anyhow::Result<()> {
    println!("{}", "スタックを削除中...".yellow());
    let stack = connect(config, options).await?;
    print_names(&stack);

    println!();
    match stack.delete().await {
        Ok(report) => {
            print_report(&report);
            println!();
            println!("{}", "✓ スタックの削除が完了しました！".green().bold());
            Ok(())
        }
        Err(CloudError::Teardown(report)) => {
            print_report(&report);
            println!();
            println!("{}", "⚠ 一部のリソースを削除できませんでした".red().bold());
            println!(
                "{}",
                "  原因を解消してから再度 delete を実行してください".dimmed()
            );
            anyhow::bail!("削除に失敗しました: {}", report)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_report(report: &TeardownReport) {
    for result in &report.succeeded {
        println!("  ✓ {} {} ({})", result.step, result.resource.cyan(), result.message);
    }
    for result in &report.skipped {
        println!(
            "  ℹ {} {} をスキップ: {}",
            result.step,
            result.resource.cyan(),
            result.message
        );
    }
    for result in &report.failed {
        println!(
            "  ⚠ {} {}: {}",
            result.step,
            result.resource.cyan(),
            result.error.as_deref().unwrap_or("unknown error").red()
        );
    }
}
