use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::SubResource;

/// Everything collected for one bucket. Each field holds the provider's
/// response verbatim; `None` means the read returned nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub name: String,
    #[serde(rename = "AccelerateConfig", default)]
    pub accelerate: Option<Json>,
    #[serde(rename = "ACL", default)]
    pub acl: Option<Json>,
    #[serde(rename = "AnalyticsConfig", default)]
    pub analytics: Vec<Json>,
    #[serde(rename = "CORSConfig", default)]
    pub cors: Option<Json>,
    #[serde(rename = "EncryptionConfig", default)]
    pub encryption: Option<Json>,
    #[serde(rename = "IntelligentTieringConfig", default)]
    pub intelligent_tiering: Vec<Json>,
    #[serde(rename = "InventoryConfig", default)]
    pub inventory: Vec<Json>,
    #[serde(rename = "LifecycleConfig", default)]
    pub lifecycle: Option<Json>,
    #[serde(rename = "Location", default)]
    pub location: Option<Json>,
    #[serde(rename = "LoggingConfig", default)]
    pub logging: Option<Json>,
    #[serde(rename = "MetricsConfig", default)]
    pub metrics: Vec<Json>,
    #[serde(rename = "NotificationConfig", default)]
    pub notification: Option<Json>,
    #[serde(rename = "OwnershipControlsConfig", default)]
    pub ownership_controls: Option<Json>,
    #[serde(rename = "Policy", default)]
    pub policy: Option<Json>,
    #[serde(rename = "PolicyStatus", default)]
    pub policy_status: Option<Json>,
    #[serde(rename = "ReplicationConfig", default)]
    pub replication: Option<Json>,
    #[serde(rename = "RequestPaymentConfig", default)]
    pub request_payment: Option<Json>,
    #[serde(rename = "TaggingConfig", default)]
    pub tagging: Option<Json>,
    #[serde(rename = "VersioningConfig", default)]
    pub versioning: Option<Json>,
}

/// Mutable view of the record field that backs a sub-resource.
pub enum Slot<'a> {
    Single(&'a mut Option<Json>),
    Multi(&'a mut Vec<Json>),
}

impl BucketRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn slot(&mut self, kind: SubResource) -> Slot<'_> {
        match kind {
            SubResource::Accelerate => Slot::Single(&mut self.accelerate),
            SubResource::Acl => Slot::Single(&mut self.acl),
            SubResource::Analytics => Slot::Multi(&mut self.analytics),
            SubResource::Cors => Slot::Single(&mut self.cors),
            SubResource::Encryption => Slot::Single(&mut self.encryption),
            SubResource::IntelligentTiering => Slot::Multi(&mut self.intelligent_tiering),
            SubResource::Inventory => Slot::Multi(&mut self.inventory),
            SubResource::Lifecycle => Slot::Single(&mut self.lifecycle),
            SubResource::Location => Slot::Single(&mut self.location),
            SubResource::Logging => Slot::Single(&mut self.logging),
            SubResource::Metrics => Slot::Multi(&mut self.metrics),
            SubResource::Notification => Slot::Single(&mut self.notification),
            SubResource::OwnershipControls => Slot::Single(&mut self.ownership_controls),
            SubResource::Policy => Slot::Single(&mut self.policy),
            SubResource::PolicyStatus => Slot::Single(&mut self.policy_status),
            SubResource::Replication => Slot::Single(&mut self.replication),
            SubResource::RequestPayment => Slot::Single(&mut self.request_payment),
            SubResource::Tagging => Slot::Single(&mut self.tagging),
            SubResource::Versioning => Slot::Single(&mut self.versioning),
        }
    }

    /// Store a read result: replaces a single-valued field, appends to a
    /// multi-valued one.
    pub fn store(&mut self, kind: SubResource, value: Json) {
        match self.slot(kind) {
            Slot::Single(field) => *field = Some(value),
            Slot::Multi(items) => items.push(value),
        }
    }

    /// Snapshot(s) held for `kind`, in stored order.
    pub fn values(&self, kind: SubResource) -> Vec<&Json> {
        fn single(v: &Option<Json>) -> Vec<&Json> { v.iter().collect() }
        match kind {
            SubResource::Accelerate => single(&self.accelerate),
            SubResource::Acl => single(&self.acl),
            SubResource::Analytics => self.analytics.iter().collect(),
            SubResource::Cors => single(&self.cors),
            SubResource::Encryption => single(&self.encryption),
            SubResource::IntelligentTiering => self.intelligent_tiering.iter().collect(),
            SubResource::Inventory => self.inventory.iter().collect(),
            SubResource::Lifecycle => single(&self.lifecycle),
            SubResource::Location => single(&self.location),
            SubResource::Logging => single(&self.logging),
            SubResource::Metrics => self.metrics.iter().collect(),
            SubResource::Notification => single(&self.notification),
            SubResource::OwnershipControls => single(&self.ownership_controls),
            SubResource::Policy => single(&self.policy),
            SubResource::PolicyStatus => single(&self.policy_status),
            SubResource::Replication => single(&self.replication),
            SubResource::RequestPayment => single(&self.request_payment),
            SubResource::Tagging => single(&self.tagging),
            SubResource::Versioning => single(&self.versioning),
        }
    }
}

/// The scan result: bucket records in listing order. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(Vec<BucketRecord>);

impl Report {
    pub fn new() -> Self { Self::default() }
    pub fn push(&mut self, record: BucketRecord) { self.0.push(record) }
    pub fn records(&self) -> &[BucketRecord] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn names(&self) -> impl Iterator<Item = &str> { self.0.iter().map(|r| r.name.as_str()) }
    pub fn get(&self, name: &str) -> Option<&BucketRecord> { self.0.iter().find(|r| r.name == name) }
    pub fn into_records(self) -> Vec<BucketRecord> { self.0 }
}

impl FromIterator<BucketRecord> for Report {
    fn from_iter<I: IntoIterator<Item = BucketRecord>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_routes_by_cardinality() {
        let mut rec = BucketRecord::new("a");
        rec.store(SubResource::Versioning, json!({ "Status": "Enabled" }));
        rec.store(SubResource::Versioning, json!({ "Status": "Suspended" }));
        rec.store(SubResource::Inventory, json!({ "Id": "inv1" }));
        rec.store(SubResource::Inventory, json!({ "Id": "inv2" }));

        assert_eq!(rec.versioning, Some(json!({ "Status": "Suspended" })));
        assert_eq!(rec.values(SubResource::Inventory), vec![&json!({ "Id": "inv1" }), &json!({ "Id": "inv2" })]);
    }

    #[test]
    fn every_kind_has_a_slot_matching_its_cardinality() {
        let mut rec = BucketRecord::new("a");
        for kind in SubResource::ALL {
            let is_multi = matches!(rec.slot(kind), Slot::Multi(_));
            assert_eq!(is_multi, kind.is_multi(), "{kind}");
        }
    }

    #[test]
    fn keys_match_table() {
        let encoded = serde_json::to_value(BucketRecord::new("a")).unwrap();
        let obj = encoded.as_object().unwrap();
        assert_eq!(obj.len(), SubResource::ALL.len() + 1);
        for kind in SubResource::ALL {
            let v = obj.get(kind.report_key()).unwrap_or_else(|| panic!("missing {}", kind.report_key()));
            if kind.is_multi() { assert_eq!(v, &json!([])) } else { assert!(v.is_null()) }
        }
    }

    #[test]
    fn empty_collections_encode_as_arrays() {
        let text = serde_json::to_string(&BucketRecord::new("a")).unwrap();
        assert!(text.contains("\"MetricsConfig\":[]"));
        assert!(text.contains("\"CORSConfig\":null"));
    }
}
