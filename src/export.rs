//! Archive export for carousel.
//!
//! Bundles the generated images into one downloadable ZIP archive. Present
//! images are taken in ascending slot order and named
//! `image_<1-based slot>.<ext>`; absent slots leave no entry. The archive is
//! built fully in memory and written atomically, so a partially-built
//! archive never reaches disk: either every present image is bundled or the
//! operation fails before producing output.

use crate::error::{CarouselError, Result};
use crate::fs::atomic_write;
use crate::session::Slot;
use chrono::Utc;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Build the export archive in memory.
///
/// Fails with `NoImages` when no slot has a generated image.
pub fn build_archive(slots: &[Slot]) -> Result<Vec<u8>> {
    let present: Vec<(usize, &crate::session::ImageResult)> = slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| slot.image.as_ref().map(|image| (index, image)))
        .collect();

    if present.is_empty() {
        return Err(CarouselError::NoImages);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, image) in &present {
        let name = format!("image_{}.{}", index + 1, image.extension());
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| CarouselError::User(format!("failed to add '{}': {}", name, e)))?;
        writer
            .write_all(&image.bytes)
            .map_err(|e| CarouselError::User(format!("failed to write '{}': {}", name, e)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| CarouselError::User(format!("failed to finalize archive: {}", e)))?;

    info!(entries = present.len(), "archive built");
    Ok(cursor.into_inner())
}

/// Timestamp-qualified default archive filename.
pub fn default_archive_name() -> String {
    format!("carousel_{}.zip", Utc::now().format("%Y%m%d_%H%M%S"))
}

/// Build the archive and write it atomically to `output`, or to a
/// timestamp-named file in `fallback_dir` when no output path is given.
///
/// Returns the path written.
pub fn export(
    slots: &[Slot],
    output: Option<PathBuf>,
    fallback_dir: &Path,
) -> Result<PathBuf> {
    let archive = build_archive(slots)?;
    let path = output.unwrap_or_else(|| fallback_dir.join(default_archive_name()));
    atomic_write(&path, &archive)?;
    Ok(path)
}
