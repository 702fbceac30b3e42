//! In-memory [`ConfigSource`] for exercising the scan pipeline without a
//! provider.

use async_trait::async_trait;
use serde_json::{json, Value as Json};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{Cardinality, ConfigSource, SourceError, SubResource};

/// One call observed by [`FakeSource`]. `kind` is `None` for the bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub bucket: Option<String>,
    pub kind: Option<SubResource>,
    pub id: Option<String>,
}

/// Every bucket has every single-valued sub-resource configured and no
/// multi-valued ones, unless told otherwise.
#[derive(Debug, Default)]
pub struct FakeSource {
    buckets: Vec<String>,
    listing_error: Option<SourceError>,
    ids: HashMap<(String, SubResource), Vec<String>>,
    errors: HashMap<(String, SubResource), SourceError>,
    id_errors: HashMap<(String, SubResource, String), SourceError>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub fn with_buckets(names: &[&str]) -> Self {
        Self { buckets: names.iter().map(|n| n.to_string()).collect(), ..Self::default() }
    }

    pub fn ids(mut self, bucket: &str, kind: SubResource, ids: &[&str]) -> Self {
        self.ids.insert((bucket.to_string(), kind), ids.iter().map(|i| i.to_string()).collect());
        self
    }

    /// Fail `get` (single-valued) or `list_ids` (multi-valued) for `kind`.
    pub fn fail(mut self, bucket: &str, kind: SubResource, err: SourceError) -> Self {
        self.errors.insert((bucket.to_string(), kind), err);
        self
    }

    pub fn fail_id(mut self, bucket: &str, kind: SubResource, id: &str, err: SourceError) -> Self {
        self.id_errors.insert((bucket.to_string(), kind, id.to_string()), err);
        self
    }

    pub fn fail_listing(mut self, err: SourceError) -> Self {
        self.listing_error = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, bucket: Option<&str>, kind: Option<SubResource>, id: Option<&str>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call { bucket: bucket.map(str::to_string), kind, id: id.map(str::to_string) });
        }
    }

    fn check(&self, kind: SubResource, expected: Cardinality) -> Result<(), SourceError> {
        if kind.cardinality() == expected { Ok(()) } else { Err(SourceError::WrongCardinality { kind, expected }) }
    }
}

#[async_trait]
impl ConfigSource for FakeSource {
    async fn list_buckets(&self) -> Result<Vec<String>, SourceError> {
        self.record(None, None, None);
        match &self.listing_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.buckets.clone()),
        }
    }

    async fn get(&self, bucket: &str, kind: SubResource) -> Result<Json, SourceError> {
        self.record(Some(bucket), Some(kind), None);
        self.check(kind, Cardinality::Single)?;
        if let Some(err) = self.errors.get(&(bucket.to_string(), kind)) {
            return Err(err.clone());
        }
        Ok(json!({ "Bucket": bucket, "Kind": kind.name() }))
    }

    async fn list_ids(&self, bucket: &str, kind: SubResource) -> Result<Vec<String>, SourceError> {
        self.record(Some(bucket), Some(kind), None);
        self.check(kind, Cardinality::Multi)?;
        if let Some(err) = self.errors.get(&(bucket.to_string(), kind)) {
            return Err(err.clone());
        }
        Ok(self.ids.get(&(bucket.to_string(), kind)).cloned().unwrap_or_default())
    }

    async fn get_by_id(&self, bucket: &str, kind: SubResource, id: &str) -> Result<Json, SourceError> {
        self.record(Some(bucket), Some(kind), Some(id));
        self.check(kind, Cardinality::Multi)?;
        if let Some(err) = self.id_errors.get(&(bucket.to_string(), kind, id.to_string())) {
            return Err(err.clone());
        }
        Ok(json!({ "Id": id, "Kind": kind.name() }))
    }
}
