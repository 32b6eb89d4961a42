//! Shared SDK configuration

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Overrides for the default AWS credential and region chain
#[derive(Debug, Clone, Default)]
pub struct AwsOptions {
    /// Region to use instead of the environment/profile default
    pub region: Option<String>,

    /// Named profile from the shared config files
    pub profile: Option<String>,
}

/// Load SDK configuration, preferring explicit options over the default chain
pub async fn load_sdk_config(options: &AwsOptions) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(options.region.clone().map(Region::new)).or_default_provider();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    if let Some(profile) = &options.profile {
        loader = loader.profile_name(profile);
    }

    let config = loader.load().await;
    tracing::debug!(
        "Loaded AWS config (region: {})",
        config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unset".to_string())
    );
    config
}
