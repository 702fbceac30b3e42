use s3scan_core::Report;
use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Where the report goes when nothing else is configured.
pub const DEFAULT_OUTPUT: &str = "bucket_info.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create output file in {}", dir.display())]
    Create { dir: PathBuf, #[source] source: std::io::Error },
    #[error("failed to encode bucket information")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to decode {}", path.display())]
    Decode { path: PathBuf, #[source] source: serde_json::Error },
}

/// Write `report` to `path` as two-space indented JSON.
///
/// The bytes land in a temporary file next to `path` which is renamed over it
/// once complete, so `path` is either the old file or the whole new report.
pub fn write_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp = NamedTempFile::new_in(&dir).map_err(|source| ReportError::Create { dir: dir.clone(), source })?;
    if let Some(perms) = report_permissions(path) {
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|source| ReportError::Write { path: path.to_path_buf(), source })?;
    }

    let mut out = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut out, report).map_err(ReportError::Encode)?;
    out.write_all(b"\n").map_err(|source| ReportError::Write { path: path.to_path_buf(), source })?;
    let tmp = out.into_inner().map_err(|e| ReportError::Write { path: path.to_path_buf(), source: e.into_error() })?;

    tmp.persist(path).map_err(|e| ReportError::Write { path: path.to_path_buf(), source: e.error })?;
    tracing::info!(path = %path.display(), buckets = report.len(), "report written");
    Ok(())
}

/// An existing report keeps its mode; a new one is 0644 on unix instead of
/// the temp file's 0600.
fn report_permissions(path: &Path) -> Option<Permissions> {
    if let Ok(meta) = std::fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

pub fn read_report(path: &Path) -> Result<Report, ReportError> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| ReportError::Decode { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3scan_core::{BucketRecord, SubResource};
    use serde_json::json;

    fn sample() -> Report {
        let mut a = BucketRecord::new("a");
        a.store(SubResource::Versioning, json!({ "Status": "Enabled" }));
        a.store(SubResource::Inventory, json!({ "InventoryConfiguration": { "Id": "inv1" } }));
        a.store(SubResource::Inventory, json!({ "InventoryConfiguration": { "Id": "inv2" } }));
        let mut c = BucketRecord::new("c");
        c.store(SubResource::Policy, json!({ "Policy": "{\"Version\":\"2012-10-17\"}" }));
        [a, c].into_iter().collect()
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bucket_info.json");
        let report = sample();

        write_report(&report, &path).unwrap();
        let back = read_report(&path).unwrap();

        assert_eq!(back, report);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(back.get("c").unwrap().cors.is_none());
    }

    #[test]
    fn two_space_indent_and_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_report(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"name\": \"a\","));
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\"CORSConfig\": null"));
        assert!(text.contains("\"MetricsConfig\": []"));
    }

    #[test]
    fn empty_report_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_report(&Report::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale contents that are longer than the new report will be").unwrap();

        write_report(&Report::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn identical_reports_encode_identically() {
        let dir = tempfile::tempdir().unwrap();
        let (p1, p2) = (dir.path().join("1.json"), dir.path().join("2.json"));
        write_report(&sample(), &p1).unwrap();
        write_report(&sample(), &p2).unwrap();
        assert_eq!(std::fs::read(&p1).unwrap(), std::fs::read(&p2).unwrap());
    }

    #[test]
    fn missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_report(&sample(), &path).unwrap_err();
        assert!(matches!(err, ReportError::Create { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn new_report_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_report(&sample(), &path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "[]").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_report(&sample(), &path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
    }
}
