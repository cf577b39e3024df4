//! S3 event notifications and the file references derived from them.

use crate::error::{OptimError, Result};
use crate::formats::is_supported_key;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One object-store item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileReference {
    pub bucket: String,
    pub key: String,
}

impl FileReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    /// URL-encoded, as delivered by S3
    pub key: String,
}

impl S3Event {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| OptimError::InvalidInput(e.to_string()))
    }

    /// Every record's decoded (bucket, key), unsupported extensions included
    pub fn file_references(&self) -> Vec<FileReference> {
        self.records
            .iter()
            .map(|record| {
                FileReference::new(
                    record.s3.bucket.name.clone(),
                    decode_key(&record.s3.object.key),
                )
            })
            .collect()
    }

    /// Decoded references whose key carries a supported image extension
    pub fn supported_files(&self) -> Vec<FileReference> {
        self.file_references()
            .into_iter()
            .filter(|file| is_supported_key(&file.key))
            .collect()
    }
}

/// Decode an S3 event key: `+` is a space and `%XX` sequences are bytes.
///
/// Invalid UTF-8 after decoding is replaced rather than rejected.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "Records": [
            {"eventName": "ObjectCreated:Put",
             "s3": {"bucket": {"name": "photos"}, "object": {"key": "a.png", "size": 10}}},
            {"s3": {"bucket": {"name": "photos"}, "object": {"key": "b.txt"}}},
            {"s3": {"bucket": {"name": "photos"}, "object": {"key": "summer+holiday%2Fc%C3%A9.jpg"}}}
        ]
    }"#;

    #[test]
    fn test_decode_key() {
        assert_eq!(decode_key("plain.png"), "plain.png");
        assert_eq!(decode_key("my+photo.jpg"), "my photo.jpg");
        assert_eq!(decode_key("dir%2Fa%20b.gif"), "dir/a b.gif");
        assert_eq!(decode_key("plus%2B.png"), "plus+.png");
        assert_eq!(decode_key("caf%C3%A9.webp"), "café.webp");
    }

    #[test]
    fn test_parse_event() {
        let event = S3Event::from_json(EVENT).unwrap();
        assert_eq!(event.records.len(), 3);

        let files = event.file_references();
        assert_eq!(files[0], FileReference::new("photos", "a.png"));
        assert_eq!(files[2].key, "summer holiday/cé.jpg");
    }

    #[test]
    fn test_supported_files_filters_extensions() {
        let event = S3Event::from_json(EVENT).unwrap();
        let keys: Vec<_> = event
            .supported_files()
            .into_iter()
            .map(|file| file.key)
            .collect();
        assert_eq!(keys, vec!["a.png", "summer holiday/cé.jpg"]);
    }

    #[test]
    fn test_invalid_event() {
        assert!(matches!(
            S3Event::from_json("{}"),
            Err(OptimError::InvalidInput(_))
        ));
        assert!(matches!(
            S3Event::from_json(r#"{"Records": [{"s3": {}}]}"#),
            Err(OptimError::InvalidInput(_))
        ));
        assert!(matches!(
            S3Event::from_json("not json"),
            Err(OptimError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(FileReference::new("b", "k.png").to_string(), "b/k.png");
    }
}
