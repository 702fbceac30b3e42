//! S3 implementation of [`s3scan_core::ConfigSource`].

pub mod provider;
pub mod snapshot;
pub mod source;

pub use provider::{AwsProvider, ProviderError};
pub use snapshot::{snapshot, ToJson};
pub use source::S3Source;
