//! ZIP packaging and delivery of exported images
//!
//! Images are stored as `{platform-id}/{filename}` inside one archive. Where
//! the finished archive goes is up to an `ArchiveSink`.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::presets::{sanitize_filename, PlatformExportPreset};
use crate::error::{CanvasError, Result};

/// One encoded image ready for packaging.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub filename: String,
    pub preset: &'static PlatformExportPreset,
    pub bytes: Vec<u8>,
    /// Hex SHA-256 of `bytes`
    pub sha256: String,
}

impl ExportedImage {
    pub fn new(
        filename: impl Into<String>,
        preset: &'static PlatformExportPreset,
        bytes: Vec<u8>,
    ) -> Self {
        let sha256 = hex_digest(&bytes);
        Self {
            filename: filename.into(),
            preset,
            bytes,
            sha256,
        }
    }

    /// Path of this image inside the archive
    pub fn archive_path(&self) -> String {
        format!("{}/{}", self.preset.platform.id(), self.filename)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Build a deflate-compressed ZIP holding every image under its platform folder.
pub fn build_archive(images: &[ExportedImage]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for image in images {
        zip.start_file(image.archive_path(), options)?;
        zip.write_all(&image.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Archive file name: `{base}_multi_platform_{YYYYMMDD_HHMMSS}.zip`.
pub fn archive_filename(base: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_multi_platform_{}.zip",
        sanitize_filename(base),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Destination for finished archives.
pub trait ArchiveSink {
    /// Hand over a finished archive. Returns where it ended up.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes archives into a directory, creating it when needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ArchiveSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| CanvasError::DirectoryCreateError {
                path: self.dir.clone(),
                source: e,
            })?;
        }
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).map_err(|e| CanvasError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps delivered archives in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub delivered: Vec<(String, Vec<u8>)>,
}

impl ArchiveSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.delivered.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::presets::preset_by_id;
    use chrono::TimeZone;
    use std::io::Read;

    #[test]
    fn test_archive_layout() {
        let images = vec![
            ExportedImage::new(
                "a_instagram_story.png",
                preset_by_id("instagram-story").unwrap(),
                vec![1, 2, 3],
            ),
            ExportedImage::new(
                "a_youtube_thumbnail.png",
                preset_by_id("youtube-thumbnail").unwrap(),
                vec![4, 5],
            ),
        ];
        let bytes = build_archive(&images).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = Vec::new();
        archive
            .by_name("youtube/a_youtube_thumbnail.png")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, vec![4, 5]);
        assert!(archive.by_name("instagram/a_instagram_story.png").is_ok());
    }

    #[test]
    fn test_digest() {
        let image = ExportedImage::new("x.png", preset_by_id("instagram-story").unwrap(), b"abc".to_vec());
        assert_eq!(
            image.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_archive_filename() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            archive_filename("봄 sale", at),
            "__sale_multi_platform_20260309_140507.zip"
        );
    }

    #[test]
    fn test_directory_sink_creates_dir() {
        let temp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(temp.path().join("out"));
        let path = sink.deliver("a.zip", b"zip").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"zip");
    }
}
