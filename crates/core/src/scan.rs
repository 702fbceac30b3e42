use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{BucketRecord, Cardinality, ConfigSource, Report, SourceError, SubResource};

/// Decides which listed buckets get scanned.
pub trait BucketFilter: Send + Sync {
    fn includes(&self, bucket: &str) -> bool;
}

/// Scans every bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllBuckets;

impl BucketFilter for AllBuckets {
    fn includes(&self, _bucket: &str) -> bool { true }
}

/// What to do when a sub-resource read fails for a reason other than the
/// configuration being absent. Applied identically to every sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Log, leave the field empty, record the failure, keep going.
    #[default]
    Continue,
    /// Abort the scan on the first failure.
    FailFast,
}

/// Which call of a sub-resource read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Get,
    ListIds,
    GetById(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Get => f.write_str("get"),
            Step::ListIds => f.write_str("list"),
            Step::GetById(id) => write!(f, "get id={id}"),
        }
    }
}

/// A sub-resource read that failed under [`ErrorPolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub bucket: String,
    pub kind: SubResource,
    pub step: Step,
    pub error: SourceError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}): {}", self.bucket, self.kind, self.step, self.error)
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to list buckets")]
    ListBuckets(#[source] SourceError),
    #[error("failed to read {kind} configuration ({step}) of bucket {bucket}")]
    SubResource {
        bucket: String,
        kind: SubResource,
        step: Step,
        #[source]
        source: SourceError,
    },
}

/// Result of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub report: Report,
    pub excluded: Vec<String>,
    pub failures: Vec<Failure>,
}

impl ScanOutcome {
    pub fn had_errors(&self) -> bool { !self.failures.is_empty() }
}

/// Walks every bucket of a [`ConfigSource`] and reads each sub-resource in
/// [`SubResource::ALL`] order, one call at a time.
pub struct Scanner<'a, S: ConfigSource + ?Sized> {
    source: &'a S,
    filter: &'a dyn BucketFilter,
    policy: ErrorPolicy,
}

impl<'a, S: ConfigSource + ?Sized> Scanner<'a, S> {
    pub fn new(source: &'a S, filter: &'a dyn BucketFilter, policy: ErrorPolicy) -> Self {
        Self { source, filter, policy }
    }

    pub async fn run(&self) -> Result<ScanOutcome, ScanError> {
        let names = self.source.list_buckets().await.map_err(ScanError::ListBuckets)?;
        info!(count = names.len(), "listed buckets");

        let mut outcome = ScanOutcome::default();
        let mut seen = HashSet::new();
        for name in names {
            if name.is_empty() {
                warn!("skipping bucket with empty name");
                continue;
            }
            if !seen.insert(name.clone()) {
                warn!(bucket = %name, "skipping duplicate bucket in listing");
                continue;
            }
            if !self.filter.includes(&name) {
                debug!(bucket = %name, "bucket excluded");
                outcome.excluded.push(name);
                continue;
            }
            let span = info_span!("bucket", bucket = %name);
            let record = self.collect(&name, &mut outcome.failures).instrument(span).await?;
            outcome.report.push(record);
        }

        info!(
            collected = outcome.report.len(),
            excluded = outcome.excluded.len(),
            failures = outcome.failures.len(),
            "scan finished"
        );
        Ok(outcome)
    }

    /// Reads every sub-resource of one bucket into a fresh record.
    pub async fn collect(&self, bucket: &str, failures: &mut Vec<Failure>) -> Result<BucketRecord, ScanError> {
        let mut record = BucketRecord::new(bucket);
        for kind in SubResource::ALL {
            match kind.cardinality() {
                Cardinality::Single => match self.source.get(bucket, kind).await {
                    Ok(value) => record.store(kind, value),
                    Err(err) if err.is_absence_of(kind) => debug!(sub_resource = %kind, "not configured"),
                    Err(err) => self.fail(bucket, kind, Step::Get, err, failures)?,
                },
                Cardinality::Multi => {
                    let ids = match self.source.list_ids(bucket, kind).await {
                        Ok(ids) => ids,
                        Err(err) => {
                            self.fail(bucket, kind, Step::ListIds, err, failures)?;
                            continue;
                        }
                    };
                    debug!(sub_resource = %kind, count = ids.len(), "listed configuration ids");
                    for id in ids {
                        match self.source.get_by_id(bucket, kind, &id).await {
                            Ok(value) => record.store(kind, value),
                            Err(err) => self.fail(bucket, kind, Step::GetById(id), err, failures)?,
                        }
                    }
                }
            }
        }
        Ok(record)
    }

    fn fail(
        &self,
        bucket: &str,
        kind: SubResource,
        step: Step,
        error: SourceError,
        failures: &mut Vec<Failure>,
    ) -> Result<(), ScanError> {
        match self.policy {
            ErrorPolicy::FailFast => Err(ScanError::SubResource { bucket: bucket.to_string(), kind, step, source: error }),
            ErrorPolicy::Continue => {
                warn!(bucket, sub_resource = %kind, step = %step, error = %error, "sub-resource read failed");
                failures.push(Failure { bucket: bucket.to_string(), kind, step, error });
                Ok(())
            }
        }
    }
}
