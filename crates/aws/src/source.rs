use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;
use s3scan_core::{Cardinality, ConfigSource, SourceError, SubResource};
use serde_json::Value as Json;
use std::error::Error as StdError;
use std::fmt::Debug;

use crate::snapshot::snapshot;

/// [`ConfigSource`] backed by the S3 API.
#[derive(Debug, Clone)]
pub struct S3Source {
    client: Client,
}

impl S3Source {
    pub fn new(client: Client) -> Self { Self { client } }
}

/// Keep the provider's error code when there is one; everything else
/// (dispatch, timeouts, unparseable responses) becomes [`SourceError::Other`].
pub(crate) fn source_error<E, R>(err: SdkError<E, R>) -> SourceError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    match err.code() {
        Some(code) => SourceError::service(code, err.message().unwrap_or_default()),
        None => SourceError::Other(DisplayErrorContext(&err).to_string()),
    }
}

macro_rules! fetch {
    ($req:expr) => {
        snapshot(&$req.send().await.map_err(source_error)?)
    };
}

#[async_trait]
impl ConfigSource for S3Source {
    async fn list_buckets(&self) -> Result<Vec<String>, SourceError> {
        let out = self.client.list_buckets().send().await.map_err(source_error)?;
        Ok(out.buckets().iter().filter_map(|b| b.name().map(str::to_string)).collect())
    }

    async fn get(&self, bucket: &str, kind: SubResource) -> Result<Json, SourceError> {
        let c = &self.client;
        let value = match kind {
            SubResource::Accelerate => fetch!(c.get_bucket_accelerate_configuration().bucket(bucket)),
            SubResource::Acl => fetch!(c.get_bucket_acl().bucket(bucket)),
            SubResource::Cors => fetch!(c.get_bucket_cors().bucket(bucket)),
            SubResource::Encryption => fetch!(c.get_bucket_encryption().bucket(bucket)),
            SubResource::Lifecycle => fetch!(c.get_bucket_lifecycle_configuration().bucket(bucket)),
            SubResource::Location => fetch!(c.get_bucket_location().bucket(bucket)),
            SubResource::Logging => fetch!(c.get_bucket_logging().bucket(bucket)),
            SubResource::Notification => fetch!(c.get_bucket_notification_configuration().bucket(bucket)),
            SubResource::OwnershipControls => fetch!(c.get_bucket_ownership_controls().bucket(bucket)),
            SubResource::Policy => fetch!(c.get_bucket_policy().bucket(bucket)),
            SubResource::PolicyStatus => fetch!(c.get_bucket_policy_status().bucket(bucket)),
            SubResource::Replication => fetch!(c.get_bucket_replication().bucket(bucket)),
            SubResource::RequestPayment => fetch!(c.get_bucket_request_payment().bucket(bucket)),
            SubResource::Tagging => fetch!(c.get_bucket_tagging().bucket(bucket)),
            SubResource::Versioning => fetch!(c.get_bucket_versioning().bucket(bucket)),
            SubResource::Analytics
            | SubResource::IntelligentTiering
            | SubResource::Inventory
            | SubResource::Metrics => {
                return Err(SourceError::WrongCardinality { kind, expected: Cardinality::Single })
            }
        };
        Ok(value)
    }

    /// First page only; the listing calls are not paginated.
    async fn list_ids(&self, bucket: &str, kind: SubResource) -> Result<Vec<String>, SourceError> {
        let c = &self.client;
        let ids = match kind {
            SubResource::Analytics => {
                let out = c.list_bucket_analytics_configurations().bucket(bucket).send().await.map_err(source_error)?;
                out.analytics_configuration_list().iter().map(|cfg| cfg.id().to_string()).collect()
            }
            SubResource::IntelligentTiering => {
                let out = c
                    .list_bucket_intelligent_tiering_configurations()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(source_error)?;
                out.intelligent_tiering_configuration_list().iter().map(|cfg| cfg.id().to_string()).collect()
            }
            SubResource::Inventory => {
                let out = c.list_bucket_inventory_configurations().bucket(bucket).send().await.map_err(source_error)?;
                out.inventory_configuration_list().iter().map(|cfg| cfg.id().to_string()).collect()
            }
            SubResource::Metrics => {
                let out = c.list_bucket_metrics_configurations().bucket(bucket).send().await.map_err(source_error)?;
                out.metrics_configuration_list().iter().map(|cfg| cfg.id().to_string()).collect()
            }
            _ => return Err(SourceError::WrongCardinality { kind, expected: Cardinality::Multi }),
        };
        Ok(ids)
    }

    async fn get_by_id(&self, bucket: &str, kind: SubResource, id: &str) -> Result<Json, SourceError> {
        let c = &self.client;
        let value = match kind {
            SubResource::Analytics => fetch!(c.get_bucket_analytics_configuration().bucket(bucket).id(id)),
            SubResource::IntelligentTiering => {
                fetch!(c.get_bucket_intelligent_tiering_configuration().bucket(bucket).id(id))
            }
            SubResource::Inventory => fetch!(c.get_bucket_inventory_configuration().bucket(bucket).id(id)),
            SubResource::Metrics => fetch!(c.get_bucket_metrics_configuration().bucket(bucket).id(id)),
            _ => return Err(SourceError::WrongCardinality { kind, expected: Cardinality::Multi }),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::Credentials;
    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{BehaviorVersion, Region};

    fn offline_source() -> S3Source {
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .endpoint_url("http://127.0.0.1:1")
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();
        S3Source::new(Client::from_conf(config))
    }

    #[tokio::test]
    async fn multi_valued_kinds_are_rejected_by_get() {
        let source = offline_source();
        let err = source.get("a", SubResource::Inventory).await.unwrap_err();
        assert_eq!(err, SourceError::WrongCardinality { kind: SubResource::Inventory, expected: Cardinality::Single });
    }

    #[tokio::test]
    async fn single_valued_kinds_are_rejected_by_list_ids() {
        let source = offline_source();
        let err = source.list_ids("a", SubResource::Cors).await.unwrap_err();
        assert_eq!(err, SourceError::WrongCardinality { kind: SubResource::Cors, expected: Cardinality::Multi });
        let err = source.get_by_id("a", SubResource::Tagging, "x").await.unwrap_err();
        assert!(matches!(err, SourceError::WrongCardinality { .. }));
    }

    #[tokio::test]
    async fn transport_failures_carry_no_code() {
        let source = offline_source();
        let err = source.get("a", SubResource::Versioning).await.unwrap_err();
        assert!(err.code().is_none(), "{err:?}");
        assert!(!err.is_absence_of(SubResource::Versioning));
    }
}
