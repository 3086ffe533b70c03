//! Durable file replacement shared by the config layer and the file store.

use anyhow::{Context, Result};
use std::path::Path;
#[cfg(unix)]
use tokio::fs::File;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Replace `path` with `contents` atomically.
///
/// The bytes go to a uuid-named sibling temp file which is fsynced, renamed
/// over `path`, and followed by a directory fsync. The temp file never
/// outlives a failed write. The parent directory must exist.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent_dir = path
        .parent()
        .context("Target path must have a parent directory")?;
    let file_name = path
        .file_name()
        .and_then(|v| v.to_str())
        .context("Target path must have a file name")?;
    let temp_path = parent_dir.join(format!(".{file_name}.tmp-{}", uuid::Uuid::new_v4()));

    if let Err(e) = write_and_replace(&temp_path, path, contents).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    sync_directory(parent_dir).await
}

async fn write_and_replace(temp_path: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(temp_path)
        .await
        .with_context(|| format!("Failed to create temporary file: {}", temp_path.display()))?;
    temp_file
        .write_all(contents)
        .await
        .context("Failed to write temporary file contents")?;
    temp_file
        .sync_all()
        .await
        .context("Failed to fsync temporary file")?;
    drop(temp_file);

    fs::rename(temp_path, path)
        .await
        .with_context(|| format!("Failed to atomically replace {}", path.display()))
}

async fn sync_directory(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let dir = File::open(path)
            .await
            .with_context(|| format!("Failed to open directory for fsync: {}", path.display()))?;
        dir.sync_all()
            .await
            .with_context(|| format!("Failed to fsync directory metadata: {}", path.display()))?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn replaces_existing_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sessions.json");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(entries(tmp.path()), vec!["sessions.json".to_string()]);
    }

    #[tokio::test]
    async fn failed_replace_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the target makes the rename fail after the
        // temp file has been written and synced.
        let target = tmp.path().join("blocked");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(write_atomic(&target, b"data").await.is_err());

        assert_eq!(entries(tmp.path()), vec!["blocked".to_string()]);
        assert_eq!(entries(&target), vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn missing_parent_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent").join("x.json");
        assert!(write_atomic(&path, b"[]").await.is_err());
        assert!(!tmp.path().join("absent").exists());
    }
}
