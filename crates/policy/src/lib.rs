use s3scan_core::BucketFilter;
use std::collections::BTreeSet;

/// Environment variable holding the comma-separated exclusion list.
pub const EXCLUDED_BUCKETS_ENV: &str = "EXCLUDED_BUCKETS";

/// Bucket names to leave out of a scan. Matching is exact: no trimming, no
/// case folding, no wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    excluded: BTreeSet<String>,
    enabled: bool,
}

impl ExclusionPolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let excluded = names.into_iter().map(Into::into).filter(|n: &String| !n.is_empty()).collect();
        Self { excluded, enabled: true }
    }

    /// Parse a comma-separated list. Empty or absent input excludes nothing.
    pub fn parse(value: Option<&str>) -> Self {
        Self::new(value.unwrap_or_default().split(','))
    }

    pub fn from_env() -> Self {
        let value = std::env::var(EXCLUDED_BUCKETS_ENV).ok();
        let policy = Self::parse(value.as_deref());
        tracing::debug!(count = policy.excluded.len(), "loaded exclusion list from {EXCLUDED_BUCKETS_ENV}");
        policy
    }

    /// A policy that lets every bucket through regardless of the list.
    pub fn disabled() -> Self { Self { excluded: BTreeSet::new(), enabled: false } }

    pub fn with_enabled(mut self, enabled: bool) -> Self { self.enabled = enabled; self }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn excluded(&self) -> impl Iterator<Item = &str> { self.excluded.iter().map(String::as_str) }

    pub fn is_excluded(&self, bucket: &str) -> bool {
        self.enabled && self.excluded.contains(bucket)
    }
}

impl BucketFilter for ExclusionPolicy {
    fn includes(&self, bucket: &str) -> bool { !self.is_excluded(bucket) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_excludes_nothing() {
        for value in [None, Some(""), Some(","), Some(",,")] {
            let policy = ExclusionPolicy::parse(value);
            assert!(!policy.is_excluded(""), "{value:?}");
            assert!(!policy.is_excluded("a"), "{value:?}");
        }
    }

    #[test]
    fn exact_match_only() {
        let policy = ExclusionPolicy::parse(Some("logs,Backups, tmp"));
        assert!(policy.is_excluded("logs"));
        assert!(policy.is_excluded("Backups"));
        assert!(policy.is_excluded(" tmp"));
        assert!(!policy.is_excluded("tmp"));
        assert!(!policy.is_excluded("backups"));
        assert!(!policy.is_excluded("logs-archive"));
        assert!(!policy.is_excluded("log*"));
    }

    #[test]
    fn scenario_middle_bucket_excluded() {
        let policy = ExclusionPolicy::parse(Some("b"));
        let kept: Vec<_> = ["a", "b", "c"].into_iter().filter(|b| policy.includes(b)).collect();
        assert_eq!(kept, vec!["a", "c"]);
    }

    #[test]
    fn disabled_lets_everything_through() {
        let policy = ExclusionPolicy::parse(Some("a,b")).with_enabled(false);
        assert!(policy.includes("a"));
        assert!(ExclusionPolicy::disabled().includes("b"));
    }
}
