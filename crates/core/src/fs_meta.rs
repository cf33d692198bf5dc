//! Filesystem metadata provider

use chrono::{DateTime, Utc};
use doc_model::AttributeValue;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Source of filesystem attributes for a location.
pub trait MetadataProvider {
    /// Reads the attribute mapping for `path`, in provider order.
    fn read(&self, path: &Path) -> io::Result<Vec<(String, AttributeValue)>>;
}

/// Reads attributes through `std::fs::metadata`.
///
/// Timestamps the platform does not track are left out rather than failing
/// the whole read.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdMetadataProvider;

impl MetadataProvider for StdMetadataProvider {
    fn read(&self, path: &Path) -> io::Result<Vec<(String, AttributeValue)>> {
        let metadata = fs::metadata(path)?;
        let mut attributes = Vec::new();

        let kind = if metadata.is_file() {
            "file"
        } else if metadata.is_dir() {
            "directory"
        } else {
            "other"
        };
        attributes.push(("type".to_owned(), AttributeValue::from(kind)));
        attributes.push(("size".to_owned(), AttributeValue::Unsigned(metadata.len())));

        for (name, time) in [
            ("modified", metadata.modified()),
            ("accessed", metadata.accessed()),
            ("created", metadata.created()),
        ] {
            if let Ok(time) = time {
                attributes.push((name.to_owned(), date_value(time)));
            }
        }

        attributes
            .push(("readonly".to_owned(), AttributeValue::Bool(metadata.permissions().readonly())));

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            attributes.push(("permissions".to_owned(), AttributeValue::Mode(metadata.mode() & 0o7777)));
            attributes.push(("owner".to_owned(), AttributeValue::Unsigned(u64::from(metadata.uid()))));
            attributes.push(("group".to_owned(), AttributeValue::Unsigned(u64::from(metadata.gid()))));
            attributes.push(("inode".to_owned(), AttributeValue::Unsigned(metadata.ino())));
            attributes.push(("device".to_owned(), AttributeValue::Unsigned(metadata.dev())));
            attributes.push(("links".to_owned(), AttributeValue::Unsigned(metadata.nlink())));
        }

        Ok(attributes)
    }
}

fn date_value(time: SystemTime) -> AttributeValue {
    AttributeValue::Date(DateTime::<Utc>::from(time).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_size_and_type() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("note.pdf");
        fs::write(&path, b"12345").expect("write");

        let attributes = StdMetadataProvider.read(&path).expect("metadata should be readable");

        assert_eq!(attributes[0], ("type".to_owned(), AttributeValue::from("file")));
        assert_eq!(attributes[1], ("size".to_owned(), AttributeValue::Unsigned(5)));
        assert!(attributes.iter().any(|(name, value)| {
            name == "modified" && matches!(value, AttributeValue::Date(_))
        }));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let err = StdMetadataProvider.read(&dir.path().join("absent.pdf")).expect_err("missing");

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
