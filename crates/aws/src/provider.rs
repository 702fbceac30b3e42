use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("no AWS region configured; set AWS_REGION, a profile region, or --region")]
    NoRegion,
    #[error("no AWS credentials provider available")]
    NoCredentialsProvider,
    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(String),
}

/// Connection settings layered on top of the standard AWS configuration chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwsProvider {
    pub region: Option<String>,
    pub profile: Option<String>,
    /// S3-compatible endpoint. Implies path-style addressing.
    pub endpoint_url: Option<String>,
}

impl AwsProvider {
    /// Values set on `other` win.
    pub fn merge(self, other: AwsProvider) -> AwsProvider {
        AwsProvider {
            region: other.region.or(self.region),
            profile: other.profile.or(self.profile),
            endpoint_url: other.endpoint_url.or(self.endpoint_url),
        }
    }

    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        loader.load().await
    }

    /// Resolve configuration and credentials, then build an S3 client.
    ///
    /// Credentials are resolved eagerly so a broken chain fails here rather
    /// than on the first request.
    pub async fn connect(&self) -> Result<Client, ProviderError> {
        let sdk = self.load().await;
        let region = sdk.region().ok_or(ProviderError::NoRegion)?;
        let credentials = sdk.credentials_provider().ok_or(ProviderError::NoCredentialsProvider)?;
        credentials
            .provide_credentials()
            .await
            .map_err(|e| ProviderError::Credentials(aws_sdk_s3::error::DisplayErrorContext(&e).to_string()))?;
        tracing::info!(region = %region, profile = ?self.profile, endpoint = ?self.endpoint_url, "aws configuration loaded");

        let mut config = aws_sdk_s3::config::Builder::from(&sdk);
        if self.endpoint_url.is_some() {
            config = config.force_path_style(true);
        }
        Ok(Client::from_conf(config.build()))
    }
}
