//! Resilient JSONL snapshot loading.
//!
//! Reading a snapshot must survive partial corruption: a single bad line
//! (truncated write, manual edit) loses that record only, not the whole
//! collection. Malformed lines are skipped and reported as warnings with
//! their line numbers.

use crate::error::Result;
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads a JSONL file, skipping malformed lines.
///
/// Each non-empty line is deserialized into `T`. Lines that fail to parse
/// are skipped and reported in the returned warning list with their 1-based
/// line number. Empty and whitespace-only lines are ignored silently.
///
/// # Errors
///
/// Returns an error only if the file itself cannot be opened or read;
/// per-line parse failures are warnings, not errors.
pub async fn read_jsonl_resilient<T>(path: &Path) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
{
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(record) => records.push(record),
            Err(err) => warnings.push(Warning::MalformedLine {
                line_number,
                error: err.to_string(),
            }),
        }
    }

    Ok((records, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        name: String,
    }

    async fn write_fixture(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("records.jsonl");
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn reads_all_valid_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n",
        )
        .await;

        let (records, warnings) = read_jsonl_resilient::<Record>(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(warnings.is_empty());
        assert_eq!(records[1].name, "b");
    }

    #[tokio::test]
    async fn malformed_line_becomes_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "{\"id\":1,\"name\":\"a\"}\nnot json\n{\"id\":3,\"name\":\"c\"}\n",
        )
        .await;

        let (records, warnings) = read_jsonl_resilient::<Record>(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line_number(), 2);
    }

    #[tokio::test]
    async fn blank_lines_are_ignored_without_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "\n{\"id\":1,\"name\":\"a\"}\n   \n").await;

        let (records, warnings) = read_jsonl_resilient::<Record>(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");
        assert!(read_jsonl_resilient::<Record>(&path).await.is_err());
    }
}
