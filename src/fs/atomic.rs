//! Atomic file writes for carousel session state.
//!
//! Durable state must never be left half-written by a crash or interruption.
//! All writes follow the same pattern:
//!
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically rename over the target file
//!
//! On POSIX, `rename()` is atomic when source and destination share a
//! filesystem; on Windows the target is removed first if the rename reports
//! it already exists. On crash, a stray `.{filename}.tmp` may remain.

use crate::error::{CarouselError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
///
/// The target file is either fully replaced or left untouched; readers never
/// observe a partial write. Parent directories are created as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            CarouselError::User(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;
    replace(&temp_path, path)
}

/// Atomically write a string to a file.
///
/// Convenience wrapper around `atomic_write` for string content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temporary file path in the same directory as the target, so the final
/// rename never crosses a filesystem boundary.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CarouselError::User("invalid file path".to_string()))?;
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        CarouselError::User(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let result = file
        .write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| CarouselError::User(format!("failed to write temporary file: {}", e)));

    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

#[cfg(unix)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        CarouselError::User(format!(
            "failed to atomically replace '{}': {}",
            target.display(),
            e
        ))
    })?;

    // Sync the directory entry so the rename itself is durable.
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

#[cfg(windows)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    // Windows rename fails if the target exists; remove-then-rename is the
    // closest portable approximation without pulling in the Win32 API.
    if target.exists() {
        let _ = fs::remove_file(target);
    }
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        CarouselError::User(format!(
            "failed to replace '{}': {}",
            target.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        atomic_write(&path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn replace_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("images").join("slot_1.png");

        atomic_write(&path, b"\x89PNG").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn temp_file_does_not_linger() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        atomic_write(&path, b"content").unwrap();

        assert!(!temp_dir.path().join(".store.json.tmp").exists());
    }

    #[test]
    fn binary_content_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("image.bin");
        let content: Vec<u8> = (0..=255).collect();

        atomic_write(&path, &content).unwrap();

        assert_eq!(fs::read(&path).unwrap(), content);
    }

    #[test]
    fn string_write_preserves_newlines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshots.ndjson");

        atomic_write_file(&path, "{\"a\":1}\n{\"b\":2}\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"a\":1}\n{\"b\":2}\n"
        );
    }
}
