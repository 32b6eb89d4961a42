pub mod create;
pub mod delete;
pub mod status;

use colored::Colorize;
use poolstack_cloud::{ManifestStore, RoleReconciler, StackOrchestrator};
use poolstack_cloud_aws::{AwsOptions, AwsProvider, CognitoDirectory, IamRoles};
use poolstack_config::PoolstackConfig;

pub(crate) type AwsStack = StackOrchestrator<IamRoles, CognitoDirectory>;

/// AWSに接続してスタックを組み立てる
pub(crate) async fn connect(
    config: &PoolstackConfig,
    options: &AwsOptions,
) -> anyhow::Result<AwsStack> {
    println!("{}", "AWSに接続中...".blue());
    let aws = AwsProvider::connect(options).await;
    if let Some(region) = &aws.region {
        println!("リージョン: {}", region.cyan());
    }

    let stack = StackOrchestrator::new(
        config.pool_name.clone(),
        RoleReconciler::new(aws.iam).with_existing_policy(config.existing_role),
        aws.cognito,
        ManifestStore::new(&config.state_dir),
    )?;
    Ok(stack)
}

pub(crate) fn print_names(stack: &AwsStack) {
    let names = stack.names();
    println!("プール: {}", stack.pool_name().as_str().cyan());
    println!("  ロール:   {}", names.role_name);
    println!("  ポリシー: {}", names.policy_name);
}
