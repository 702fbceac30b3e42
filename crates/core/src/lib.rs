//! Bucket configuration scanning: the sub-resource table, the per-bucket
//! record, and the pipeline that fills it from a [`ConfigSource`].

mod record;
mod scan;
mod source;
mod subresource;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use record::{BucketRecord, Report, Slot};
pub use scan::{AllBuckets, BucketFilter, ErrorPolicy, Failure, ScanError, ScanOutcome, Scanner, Step};
pub use source::{ConfigSource, SourceError};
pub use subresource::{Cardinality, SubResource, SubResourceInfo};
