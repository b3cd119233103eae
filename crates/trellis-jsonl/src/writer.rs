//! Atomic JSONL snapshot writing.
//!
//! Snapshots are written with the temp-file-then-rename pattern: data goes
//! to a sibling `.tmp` file first, then a rename replaces the target in one
//! step. On POSIX systems renames within a filesystem are atomic, so a
//! crash mid-write leaves the previous snapshot intact.

use crate::error::Result;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Atomically writes a slice of values to a JSONL file.
///
/// Each value is serialized to one JSON line. The write goes through a
/// temporary sibling file that is renamed over the target on success, so
/// the target is never observed half-written.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, a value fails
/// to serialize, or the final rename fails. On failure the original file
/// (if any) is left unchanged; a stale `.tmp` file may remain and is
/// overwritten by the next successful write.
pub async fn write_jsonl_atomic<T>(path: &Path, values: &[T]) -> Result<()>
where
    T: Serialize,
{
    let temp_path = make_temp_path(path);

    let file = File::create(&temp_path).await?;
    let mut writer = BufWriter::new(file);
    for value in values {
        let line = serde_json::to_string(value)?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;
    drop(writer);

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Builds the temporary sibling path for an atomic write.
///
/// `issues.jsonl` becomes `issues.jsonl.tmp`; a path without an extension
/// gets a plain `.tmp` extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let ext = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => OsString::from("tmp"),
    };
    path.with_extension(ext)
}
