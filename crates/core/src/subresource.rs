use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a sub-resource is read with one call or listed by ID first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality { Single, Multi }

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Cardinality::Single => "single-valued", Cardinality::Multi => "multi-valued" })
    }
}

/// One facet of a bucket's configuration, each backed by its own read call.
///
/// Variant order is the order the collector reads them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubResource {
    Accelerate,
    Acl,
    Analytics,
    Cors,
    Encryption,
    IntelligentTiering,
    Inventory,
    Lifecycle,
    Location,
    Logging,
    Metrics,
    Notification,
    OwnershipControls,
    Policy,
    PolicyStatus,
    Replication,
    RequestPayment,
    Tagging,
    Versioning,
}

/// Static description of a sub-resource: how it is named, how many values it
/// has, and which provider error code means "not configured".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubResourceInfo {
    pub kind: SubResource,
    pub name: &'static str,
    pub report_key: &'static str,
    pub cardinality: Cardinality,
    pub absence_marker: Option<&'static str>,
}

const fn single(kind: SubResource, name: &'static str, report_key: &'static str) -> SubResourceInfo {
    SubResourceInfo { kind, name, report_key, cardinality: Cardinality::Single, absence_marker: None }
}

const fn optional(kind: SubResource, name: &'static str, report_key: &'static str, marker: &'static str) -> SubResourceInfo {
    SubResourceInfo { kind, name, report_key, cardinality: Cardinality::Single, absence_marker: Some(marker) }
}

const fn multi(kind: SubResource, name: &'static str, report_key: &'static str) -> SubResourceInfo {
    SubResourceInfo { kind, name, report_key, cardinality: Cardinality::Multi, absence_marker: None }
}

// Indexed by `SubResource as usize`.
static TABLE: [SubResourceInfo; 19] = [
    single(SubResource::Accelerate, "accelerate", "AccelerateConfig"),
    single(SubResource::Acl, "acl", "ACL"),
    multi(SubResource::Analytics, "analytics", "AnalyticsConfig"),
    optional(SubResource::Cors, "cors", "CORSConfig", "NoSuchCORSConfiguration"),
    single(SubResource::Encryption, "encryption", "EncryptionConfig"),
    multi(SubResource::IntelligentTiering, "intelligent-tiering", "IntelligentTieringConfig"),
    multi(SubResource::Inventory, "inventory", "InventoryConfig"),
    optional(SubResource::Lifecycle, "lifecycle", "LifecycleConfig", "NoSuchLifecycleConfiguration"),
    single(SubResource::Location, "location", "Location"),
    single(SubResource::Logging, "logging", "LoggingConfig"),
    multi(SubResource::Metrics, "metrics", "MetricsConfig"),
    single(SubResource::Notification, "notification", "NotificationConfig"),
    optional(SubResource::OwnershipControls, "ownership-controls", "OwnershipControlsConfig", "OwnershipControlsNotFoundError"),
    optional(SubResource::Policy, "policy", "Policy", "NoSuchBucketPolicy"),
    optional(SubResource::PolicyStatus, "policy-status", "PolicyStatus", "NoSuchBucketPolicy"),
    optional(SubResource::Replication, "replication", "ReplicationConfig", "ReplicationConfigurationNotFoundError"),
    single(SubResource::RequestPayment, "request-payment", "RequestPaymentConfig"),
    optional(SubResource::Tagging, "tagging", "TaggingConfig", "NoSuchTagSet"),
    single(SubResource::Versioning, "versioning", "VersioningConfig"),
];

impl SubResource {
    pub const ALL: [SubResource; 19] = [
        SubResource::Accelerate,
        SubResource::Acl,
        SubResource::Analytics,
        SubResource::Cors,
        SubResource::Encryption,
        SubResource::IntelligentTiering,
        SubResource::Inventory,
        SubResource::Lifecycle,
        SubResource::Location,
        SubResource::Logging,
        SubResource::Metrics,
        SubResource::Notification,
        SubResource::OwnershipControls,
        SubResource::Policy,
        SubResource::PolicyStatus,
        SubResource::Replication,
        SubResource::RequestPayment,
        SubResource::Tagging,
        SubResource::Versioning,
    ];

    pub fn info(self) -> &'static SubResourceInfo { &TABLE[self as usize] }
    pub fn name(self) -> &'static str { self.info().name }
    pub fn report_key(self) -> &'static str { self.info().report_key }
    pub fn cardinality(self) -> Cardinality { self.info().cardinality }
    pub fn absence_marker(self) -> Option<&'static str> { self.info().absence_marker }
    pub fn is_multi(self) -> bool { self.cardinality() == Cardinality::Multi }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
