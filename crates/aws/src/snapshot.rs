//! Conversion of `aws-sdk-s3` responses into JSON.
//!
//! SDK types carry no `Serialize` impl, so each response shape is spelled out
//! here with the provider's member names. Members the provider left unset are
//! omitted rather than written as `null`.

use aws_sdk_s3::operation::{
    get_bucket_accelerate_configuration::GetBucketAccelerateConfigurationOutput,
    get_bucket_acl::GetBucketAclOutput,
    get_bucket_analytics_configuration::GetBucketAnalyticsConfigurationOutput,
    get_bucket_cors::GetBucketCorsOutput,
    get_bucket_encryption::GetBucketEncryptionOutput,
    get_bucket_intelligent_tiering_configuration::GetBucketIntelligentTieringConfigurationOutput,
    get_bucket_inventory_configuration::GetBucketInventoryConfigurationOutput,
    get_bucket_lifecycle_configuration::GetBucketLifecycleConfigurationOutput,
    get_bucket_location::GetBucketLocationOutput,
    get_bucket_logging::GetBucketLoggingOutput,
    get_bucket_metrics_configuration::GetBucketMetricsConfigurationOutput,
    get_bucket_notification_configuration::GetBucketNotificationConfigurationOutput,
    get_bucket_ownership_controls::GetBucketOwnershipControlsOutput,
    get_bucket_policy::GetBucketPolicyOutput,
    get_bucket_policy_status::GetBucketPolicyStatusOutput,
    get_bucket_replication::GetBucketReplicationOutput,
    get_bucket_request_payment::GetBucketRequestPaymentOutput,
    get_bucket_tagging::GetBucketTaggingOutput,
    get_bucket_versioning::GetBucketVersioningOutput,
};
use aws_sdk_s3::primitives::{DateTime, DateTimeFormat};
use aws_sdk_s3::types::{
    AbortIncompleteMultipartUpload, AccessControlTranslation, AnalyticsAndOperator,
    AnalyticsConfiguration, AnalyticsExportDestination, AnalyticsFilter,
    AnalyticsS3BucketDestination, AnalyticsS3ExportFileFormat, BucketAccelerateStatus,
    BlockedEncryptionTypes, BucketLocationConstraint, BucketLogsPermission, BucketVersioningStatus, CorsRule,
    DeleteMarkerReplication, DeleteMarkerReplicationStatus, Destination, EncryptionConfiguration,
    EncryptionType,
    Event, EventBridgeConfiguration, ExistingObjectReplication, ExistingObjectReplicationStatus,
    ExpirationStatus, FilterRule, FilterRuleName, Grant, Grantee, IntelligentTieringAccessTier,
    IntelligentTieringAndOperator, IntelligentTieringConfiguration, IntelligentTieringFilter,
    IntelligentTieringStatus, InventoryConfiguration, InventoryDestination, InventoryEncryption,
    InventoryFilter, InventoryFormat, InventoryFrequency, InventoryIncludedObjectVersions,
    InventoryOptionalField, InventoryS3BucketDestination, InventorySchedule,
    LambdaFunctionConfiguration, LifecycleExpiration, LifecycleRule, LifecycleRuleAndOperator,
    LifecycleRuleFilter, LoggingEnabled, MetricsAndOperator, MetricsConfiguration, MetricsFilter,
    MetricsStatus, MfaDeleteStatus, NoncurrentVersionExpiration, NoncurrentVersionTransition,
    NotificationConfigurationFilter, ObjectOwnership, Owner, OwnerOverride, OwnershipControls,
    OwnershipControlsRule, PartitionDateSource, PartitionedPrefix, Payer, Permission, PolicyStatus,
    QueueConfiguration, ReplicaModifications, ReplicaModificationsStatus, ReplicationConfiguration,
    ReplicationRule, ReplicationRuleAndOperator, ReplicationRuleFilter, ReplicationRuleStatus,
    ReplicationTime, ReplicationTimeStatus, ReplicationTimeValue, RequestCharged, S3KeyFilter,
    ServerSideEncryption, ServerSideEncryptionByDefault, ServerSideEncryptionConfiguration,
    ServerSideEncryptionRule, SimplePrefix, SourceSelectionCriteria, SseKmsEncryptedObjects,
    SseKmsEncryptedObjectsStatus, Ssekms, Sses3, StorageClass, StorageClassAnalysis,
    StorageClassAnalysisDataExport, StorageClassAnalysisSchemaVersion, Tag, TargetGrant,
    TargetObjectKeyFormat, Metrics, Tiering, TopicConfiguration, Transition,
    TransitionDefaultMinimumObjectSize, TransitionStorageClass, Type,
};
use serde_json::{Map, Value as Json};

/// A value that can appear in a snapshot. `None` means "leave the member out".
pub trait ToJson {
    fn to_json(&self) -> Option<Json>;
}

/// Render a whole response. Never fails: an empty response is `{}`.
pub fn snapshot(value: &impl ToJson) -> Json {
    value.to_json().unwrap_or_else(|| Json::Object(Map::new()))
}

#[derive(Default)]
struct Obj(Map<String, Json>);

impl Obj {
    fn new() -> Self { Self::default() }

    fn put(mut self, key: &str, value: impl ToJson) -> Self {
        if let Some(v) = value.to_json() { self.0.insert(key.to_string(), v); }
        self
    }
}

impl From<Obj> for Json {
    fn from(o: Obj) -> Json { Json::Object(o.0) }
}

impl ToJson for str {
    fn to_json(&self) -> Option<Json> { Some(Json::from(self)) }
}
impl ToJson for String {
    fn to_json(&self) -> Option<Json> { Some(Json::from(self.as_str())) }
}
impl ToJson for bool {
    fn to_json(&self) -> Option<Json> { Some(Json::from(*self)) }
}
impl ToJson for i32 {
    fn to_json(&self) -> Option<Json> { Some(Json::from(*self)) }
}
impl ToJson for i64 {
    fn to_json(&self) -> Option<Json> { Some(Json::from(*self)) }
}
impl ToJson for DateTime {
    fn to_json(&self) -> Option<Json> { self.fmt(DateTimeFormat::DateTime).ok().map(Json::from) }
}
impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self) -> Option<Json> { (**self).to_json() }
}
impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Option<Json> { self.as_ref().and_then(ToJson::to_json) }
}
impl<T: ToJson> ToJson for [T] {
    // The SDK hands back an empty slice for both "absent" and "empty".
    fn to_json(&self) -> Option<Json> {
        if self.is_empty() { return None }
        Some(Json::Array(self.iter().filter_map(ToJson::to_json).collect()))
    }
}

macro_rules! string_enums {
    ($($ty:ty),* $(,)?) => {
        $(impl ToJson for $ty {
            fn to_json(&self) -> Option<Json> { Some(Json::from(self.as_str())) }
        })*
    };
}

macro_rules! objects {
    ($($(#[$attr:meta])* $ty:ty { $($key:literal => $getter:ident),* $(,)? })*) => {
        $($(#[$attr])* impl ToJson for $ty {
            fn to_json(&self) -> Option<Json> {
                Some(Obj::new()$(.put($key, self.$getter()))*.into())
            }
        })*
    };
}

string_enums!(
    AnalyticsS3ExportFileFormat, BucketAccelerateStatus, BucketLocationConstraint,
    BucketLogsPermission, BucketVersioningStatus, DeleteMarkerReplicationStatus, Event,
    ExistingObjectReplicationStatus, ExpirationStatus, FilterRuleName, IntelligentTieringAccessTier,
    IntelligentTieringStatus, InventoryFormat, InventoryFrequency, InventoryIncludedObjectVersions,
    InventoryOptionalField, MetricsStatus, MfaDeleteStatus, ObjectOwnership, OwnerOverride,
    PartitionDateSource, Payer, Permission, ReplicaModificationsStatus, ReplicationRuleStatus,
    ReplicationTimeStatus, RequestCharged, ServerSideEncryption, SseKmsEncryptedObjectsStatus,
    StorageClass, StorageClassAnalysisSchemaVersion, TransitionDefaultMinimumObjectSize,
    TransitionStorageClass, Type, EncryptionType,
);

// Responses.
objects! {
    GetBucketAccelerateConfigurationOutput { "Status" => status, "RequestCharged" => request_charged }
    GetBucketAclOutput { "Owner" => owner, "Grants" => grants }
    GetBucketAnalyticsConfigurationOutput { "AnalyticsConfiguration" => analytics_configuration }
    GetBucketCorsOutput { "CORSRules" => cors_rules }
    GetBucketEncryptionOutput { "ServerSideEncryptionConfiguration" => server_side_encryption_configuration }
    GetBucketIntelligentTieringConfigurationOutput { "IntelligentTieringConfiguration" => intelligent_tiering_configuration }
    GetBucketInventoryConfigurationOutput { "InventoryConfiguration" => inventory_configuration }
    GetBucketLifecycleConfigurationOutput {
        "Rules" => rules,
        "TransitionDefaultMinimumObjectSize" => transition_default_minimum_object_size,
    }
    GetBucketLocationOutput { "LocationConstraint" => location_constraint }
    GetBucketLoggingOutput { "LoggingEnabled" => logging_enabled }
    GetBucketMetricsConfigurationOutput { "MetricsConfiguration" => metrics_configuration }
    GetBucketNotificationConfigurationOutput {
        "TopicConfigurations" => topic_configurations,
        "QueueConfigurations" => queue_configurations,
        "LambdaFunctionConfigurations" => lambda_function_configurations,
        "EventBridgeConfiguration" => event_bridge_configuration,
    }
    GetBucketOwnershipControlsOutput { "OwnershipControls" => ownership_controls }
    GetBucketPolicyOutput { "Policy" => policy }
    GetBucketPolicyStatusOutput { "PolicyStatus" => policy_status }
    GetBucketReplicationOutput { "ReplicationConfiguration" => replication_configuration }
    GetBucketRequestPaymentOutput { "Payer" => payer }
    GetBucketTaggingOutput { "TagSet" => tag_set }
    GetBucketVersioningOutput { "Status" => status, "MFADelete" => mfa_delete }
}

// ACL and shared shapes.
objects! {
    Owner { "DisplayName" => display_name, "ID" => id }
    Grant { "Grantee" => grantee, "Permission" => permission }
    Grantee {
        "DisplayName" => display_name,
        "EmailAddress" => email_address,
        "ID" => id,
        "URI" => uri,
        "Type" => r#type,
    }
    Tag { "Key" => key, "Value" => value }
}

// Analytics.
objects! {
    AnalyticsConfiguration { "Id" => id, "Filter" => filter, "StorageClassAnalysis" => storage_class_analysis }
    AnalyticsAndOperator { "Prefix" => prefix, "Tags" => tags }
    StorageClassAnalysis { "DataExport" => data_export }
    StorageClassAnalysisDataExport { "OutputSchemaVersion" => output_schema_version, "Destination" => destination }
    AnalyticsExportDestination { "S3BucketDestination" => s3_bucket_destination }
    AnalyticsS3BucketDestination {
        "Format" => format,
        "BucketAccountId" => bucket_account_id,
        "Bucket" => bucket,
        "Prefix" => prefix,
    }
}

impl ToJson for AnalyticsFilter {
    fn to_json(&self) -> Option<Json> {
        let obj = match self {
            AnalyticsFilter::Prefix(prefix) => Obj::new().put("Prefix", prefix),
            AnalyticsFilter::Tag(tag) => Obj::new().put("Tag", tag),
            AnalyticsFilter::And(and) => Obj::new().put("And", and),
            _ => Obj::new(),
        };
        Some(obj.into())
    }
}

// CORS and encryption.
objects! {
    CorsRule {
        "ID" => id,
        "AllowedHeaders" => allowed_headers,
        "AllowedMethods" => allowed_methods,
        "AllowedOrigins" => allowed_origins,
        "ExposeHeaders" => expose_headers,
        "MaxAgeSeconds" => max_age_seconds,
    }
    ServerSideEncryptionConfiguration { "Rules" => rules }
    ServerSideEncryptionRule {
        "ApplyServerSideEncryptionByDefault" => apply_server_side_encryption_by_default,
        "BucketKeyEnabled" => bucket_key_enabled,
        "BlockedEncryptionTypes" => blocked_encryption_types,
    }
    BlockedEncryptionTypes { "EncryptionType" => encryption_type }
    ServerSideEncryptionByDefault { "SSEAlgorithm" => sse_algorithm, "KMSMasterKeyID" => kms_master_key_id }
}

// Intelligent-tiering.
objects! {
    IntelligentTieringConfiguration { "Id" => id, "Filter" => filter, "Status" => status, "Tierings" => tierings }
    IntelligentTieringFilter { "Prefix" => prefix, "Tag" => tag, "And" => and }
    IntelligentTieringAndOperator { "Prefix" => prefix, "Tags" => tags }
    Tiering { "Days" => days, "AccessTier" => access_tier }
}

// Inventory.
objects! {
    InventoryConfiguration {
        "Destination" => destination,
        "IsEnabled" => is_enabled,
        "Filter" => filter,
        "Id" => id,
        "IncludedObjectVersions" => included_object_versions,
        "OptionalFields" => optional_fields,
        "Schedule" => schedule,
    }
    InventoryDestination { "S3BucketDestination" => s3_bucket_destination }
    InventoryS3BucketDestination {
        "AccountId" => account_id,
        "Bucket" => bucket,
        "Format" => format,
        "Prefix" => prefix,
        "Encryption" => encryption,
    }
    InventoryEncryption { "SSES3" => sses3, "SSEKMS" => ssekms }
    Sses3 {}
    Ssekms { "KeyId" => key_id }
    InventoryFilter { "Prefix" => prefix }
    InventorySchedule { "Frequency" => frequency }
}

// Lifecycle.
objects! {
    // Rules written before `Filter` existed are scoped by the top-level `Prefix`.
    #[allow(deprecated)]
    LifecycleRule {
        "ID" => id,
        "Prefix" => prefix,
        "Filter" => filter,
        "Status" => status,
        "Expiration" => expiration,
        "Transitions" => transitions,
        "NoncurrentVersionTransitions" => noncurrent_version_transitions,
        "NoncurrentVersionExpiration" => noncurrent_version_expiration,
        "AbortIncompleteMultipartUpload" => abort_incomplete_multipart_upload,
    }
    LifecycleRuleFilter {
        "Prefix" => prefix,
        "Tag" => tag,
        "ObjectSizeGreaterThan" => object_size_greater_than,
        "ObjectSizeLessThan" => object_size_less_than,
        "And" => and,
    }
    LifecycleRuleAndOperator {
        "Prefix" => prefix,
        "Tags" => tags,
        "ObjectSizeGreaterThan" => object_size_greater_than,
        "ObjectSizeLessThan" => object_size_less_than,
    }
    LifecycleExpiration { "Date" => date, "Days" => days, "ExpiredObjectDeleteMarker" => expired_object_delete_marker }
    Transition { "Date" => date, "Days" => days, "StorageClass" => storage_class }
    NoncurrentVersionTransition {
        "NoncurrentDays" => noncurrent_days,
        "StorageClass" => storage_class,
        "NewerNoncurrentVersions" => newer_noncurrent_versions,
    }
    NoncurrentVersionExpiration { "NoncurrentDays" => noncurrent_days, "NewerNoncurrentVersions" => newer_noncurrent_versions }
    AbortIncompleteMultipartUpload { "DaysAfterInitiation" => days_after_initiation }
}

// Logging.
objects! {
    LoggingEnabled {
        "TargetBucket" => target_bucket,
        "TargetGrants" => target_grants,
        "TargetPrefix" => target_prefix,
        "TargetObjectKeyFormat" => target_object_key_format,
    }
    TargetGrant { "Grantee" => grantee, "Permission" => permission }
    TargetObjectKeyFormat { "SimplePrefix" => simple_prefix, "PartitionedPrefix" => partitioned_prefix }
    SimplePrefix {}
    PartitionedPrefix { "PartitionDateSource" => partition_date_source }
}

// Metrics.
objects! {
    MetricsConfiguration { "Id" => id, "Filter" => filter }
    MetricsAndOperator { "Prefix" => prefix, "Tags" => tags, "AccessPointArn" => access_point_arn }
}

impl ToJson for MetricsFilter {
    fn to_json(&self) -> Option<Json> {
        let obj = match self {
            MetricsFilter::Prefix(prefix) => Obj::new().put("Prefix", prefix),
            MetricsFilter::Tag(tag) => Obj::new().put("Tag", tag),
            MetricsFilter::AccessPointArn(arn) => Obj::new().put("AccessPointArn", arn),
            MetricsFilter::And(and) => Obj::new().put("And", and),
            _ => Obj::new(),
        };
        Some(obj.into())
    }
}

// Notification.
objects! {
    TopicConfiguration { "Id" => id, "TopicArn" => topic_arn, "Events" => events, "Filter" => filter }
    QueueConfiguration { "Id" => id, "QueueArn" => queue_arn, "Events" => events, "Filter" => filter }
    LambdaFunctionConfiguration {
        "Id" => id,
        "LambdaFunctionArn" => lambda_function_arn,
        "Events" => events,
        "Filter" => filter,
    }
    NotificationConfigurationFilter { "Key" => key }
    S3KeyFilter { "FilterRules" => filter_rules }
    FilterRule { "Name" => name, "Value" => value }
    EventBridgeConfiguration {}
}

// Ownership controls and policy status.
objects! {
    OwnershipControls { "Rules" => rules }
    OwnershipControlsRule { "ObjectOwnership" => object_ownership }
    PolicyStatus { "IsPublic" => is_public }
}

// Replication.
objects! {
    ReplicationConfiguration { "Role" => role, "Rules" => rules }
    #[allow(deprecated)]
    ReplicationRule {
        "ID" => id,
        "Priority" => priority,
        "Prefix" => prefix,
        "Filter" => filter,
        "Status" => status,
        "SourceSelectionCriteria" => source_selection_criteria,
        "ExistingObjectReplication" => existing_object_replication,
        "Destination" => destination,
        "DeleteMarkerReplication" => delete_marker_replication,
    }
    ReplicationRuleFilter { "Prefix" => prefix, "Tag" => tag, "And" => and }
    ReplicationRuleAndOperator { "Prefix" => prefix, "Tags" => tags }
    SourceSelectionCriteria {
        "SseKmsEncryptedObjects" => sse_kms_encrypted_objects,
        "ReplicaModifications" => replica_modifications,
    }
    SseKmsEncryptedObjects { "Status" => status }
    ReplicaModifications { "Status" => status }
    ExistingObjectReplication { "Status" => status }
    Destination {
        "Bucket" => bucket,
        "Account" => account,
        "StorageClass" => storage_class,
        "AccessControlTranslation" => access_control_translation,
        "EncryptionConfiguration" => encryption_configuration,
        "ReplicationTime" => replication_time,
        "Metrics" => metrics,
    }
    AccessControlTranslation { "Owner" => owner }
    EncryptionConfiguration { "ReplicaKmsKeyID" => replica_kms_key_id }
    ReplicationTime { "Status" => status, "Time" => time }
    ReplicationTimeValue { "Minutes" => minutes }
    Metrics { "Status" => status, "EventThreshold" => event_threshold }
    DeleteMarkerReplication { "Status" => status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_response_is_empty_object() {
        let out = GetBucketVersioningOutput::builder().build();
        assert_eq!(snapshot(&out), json!({}));
    }

    #[test]
    fn versioning_uses_provider_member_names() {
        let out = GetBucketVersioningOutput::builder()
            .status(BucketVersioningStatus::Enabled)
            .mfa_delete(MfaDeleteStatus::Disabled)
            .build();
        assert_eq!(snapshot(&out), json!({ "Status": "Enabled", "MFADelete": "Disabled" }));
    }

    #[test]
    fn acl_nests_grants() {
        let grantee = Grantee::builder()
            .r#type(Type::CanonicalUser)
            .id("abc123")
            .build()
            .expect("grantee");
        let out = GetBucketAclOutput::builder()
            .owner(Owner::builder().id("abc123").build())
            .grants(Grant::builder().grantee(grantee).permission(Permission::FullControl).build())
            .build();

        assert_eq!(
            snapshot(&out),
            json!({
                "Owner": { "ID": "abc123" },
                "Grants": [{
                    "Grantee": { "ID": "abc123", "Type": "CanonicalUser" },
                    "Permission": "FULL_CONTROL"
                }]
            })
        );
    }

    #[test]
    fn cors_rules_keep_order_and_lists() {
        let rule = CorsRule::builder()
            .allowed_origins("https://example.com")
            .allowed_methods("GET")
            .allowed_methods("PUT")
            .max_age_seconds(3600)
            .build()
            .expect("cors rule");
        let out = GetBucketCorsOutput::builder().cors_rules(rule).build();

        assert_eq!(
            snapshot(&out),
            json!({
                "CORSRules": [{
                    "AllowedMethods": ["GET", "PUT"],
                    "AllowedOrigins": ["https://example.com"],
                    "MaxAgeSeconds": 3600
                }]
            })
        );
    }

    #[test]
    fn metrics_union_filter() {
        let config = MetricsConfiguration::builder()
            .id("EntireBucket")
            .filter(MetricsFilter::Prefix("logs/".into()))
            .build()
            .expect("metrics configuration");
        let out = GetBucketMetricsConfigurationOutput::builder().metrics_configuration(config).build();

        assert_eq!(
            snapshot(&out),
            json!({ "MetricsConfiguration": { "Id": "EntireBucket", "Filter": { "Prefix": "logs/" } } })
        );
    }

    #[test]
    fn dates_render_as_rfc3339() {
        let expiration = LifecycleExpiration::builder().date(DateTime::from_secs(0)).days(30).build();
        assert_eq!(snapshot(&expiration), json!({ "Date": "1970-01-01T00:00:00Z", "Days": 30 }));
    }

    #[test]
    fn policy_is_passed_through_as_text() {
        let doc = r#"{"Version":"2012-10-17","Statement":[]}"#;
        let out = GetBucketPolicyOutput::builder().policy(doc).build();
        assert_eq!(snapshot(&out), json!({ "Policy": doc }));

        let status = GetBucketPolicyStatusOutput::builder()
            .policy_status(PolicyStatus::builder().is_public(false).build())
            .build();
        assert_eq!(snapshot(&status), json!({ "PolicyStatus": { "IsPublic": false } }));
    }

    #[test]
    fn location_constraint_is_a_plain_string() {
        let out = GetBucketLocationOutput::builder()
            .location_constraint(BucketLocationConstraint::EuWest1)
            .build();
        assert_eq!(snapshot(&out), json!({ "LocationConstraint": "eu-west-1" }));
    }
    #[test]
    #[allow(deprecated)]
    fn legacy_rule_prefixes_are_kept() {
        let rule = ReplicationRule::builder()
            .prefix("logs/")
            .status(ReplicationRuleStatus::Enabled)
            .destination(Destination::builder().bucket("arn:aws:s3:::dst").build().expect("destination"))
            .build()
            .expect("replication rule");
        assert_eq!(
            snapshot(&rule),
            json!({ "Prefix": "logs/", "Status": "Enabled", "Destination": { "Bucket": "arn:aws:s3:::dst" } })
        );

        let rule = LifecycleRule::builder()
            .prefix("tmp/")
            .status(ExpirationStatus::Enabled)
            .build()
            .expect("lifecycle rule");
        assert_eq!(snapshot(&rule), json!({ "Prefix": "tmp/", "Status": "Enabled" }));
    }

    #[test]
    fn lifecycle_transition_minimum_size() {
        let out = GetBucketLifecycleConfigurationOutput::builder()
            .transition_default_minimum_object_size(TransitionDefaultMinimumObjectSize::AllStorageClasses128K)
            .build();
        assert_eq!(snapshot(&out), json!({ "TransitionDefaultMinimumObjectSize": "all_storage_classes_128K" }));
    }

    #[test]
    fn encryption_rule_blocked_types() {
        let rule = ServerSideEncryptionRule::builder()
            .bucket_key_enabled(true)
            .blocked_encryption_types(BlockedEncryptionTypes::builder().encryption_type(EncryptionType::SseC).build())
            .build();
        assert_eq!(
            snapshot(&rule),
            json!({ "BucketKeyEnabled": true, "BlockedEncryptionTypes": { "EncryptionType": ["SSE-C"] } })
        );
    }
}
