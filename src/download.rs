//! The download flow: fetch the file from the backend and save it into the
//! download directory, mirroring a browser's save-file behavior (existing
//! files are never overwritten; a ` (N)` suffix is appended instead).

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api;

/// The mutually-exclusive format choice offered by the download panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
  Mp3,
  Mp4,
}

impl DownloadFormat {
  pub const ALL: [DownloadFormat; 2] = [DownloadFormat::Mp3, DownloadFormat::Mp4];

  pub fn label(self) -> &'static str {
    match self {
      DownloadFormat::Mp3 => "mp3",
      DownloadFormat::Mp4 => "mp4",
    }
  }

  pub fn next(self) -> Self {
    // Safety: modular arithmetic over the non-empty const array.
    let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  pub fn from_config(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "mp4" => DownloadFormat::Mp4,
      _ => DownloadFormat::Mp3,
    }
  }
}

/// A file written to the download directory.
#[derive(Debug)]
pub struct SavedFile {
  pub file_name: String,
  pub path: PathBuf,
}

/// Run the whole download flow: fetch from the backend, save to `dir`.
pub async fn fetch_and_save(
  client: &Client,
  server: &str,
  video_url: &str,
  format: DownloadFormat,
  dir: &Path,
) -> Result<SavedFile> {
  let payload = api::download(client, server, video_url, format).await?;
  let saved = write_unique(dir, &payload.file_name, &payload.bytes)?;
  info!(path = %saved.path.display(), bytes = payload.bytes.len(), "download saved");
  Ok(saved)
}

/// Write `bytes` under `dir` as `name`, appending ` (N)` before the extension
/// until the name is free.
fn write_unique(dir: &Path, name: &str, bytes: &[u8]) -> Result<SavedFile> {
  std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

  let (stem, ext) = match name.rsplit_once('.') {
    Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
    _ => (name.to_string(), None),
  };

  let mut candidate = name.to_string();
  let mut n = 1u32;
  while dir.join(&candidate).exists() {
    candidate = match &ext {
      Some(ext) => format!("{} ({}).{}", stem, n, ext),
      None => format!("{} ({})", stem, n),
    };
    n += 1;
  }

  let path = dir.join(&candidate);
  std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
  Ok(SavedFile { file_name: candidate, path })
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- DownloadFormat ---

  #[test]
  fn format_labels() {
    assert_eq!(DownloadFormat::Mp3.label(), "mp3");
    assert_eq!(DownloadFormat::Mp4.label(), "mp4");
  }

  #[test]
  fn format_next_cycles() {
    assert_eq!(DownloadFormat::Mp3.next(), DownloadFormat::Mp4);
    assert_eq!(DownloadFormat::Mp4.next(), DownloadFormat::Mp3);
  }

  #[test]
  fn format_from_config() {
    assert_eq!(DownloadFormat::from_config("mp4"), DownloadFormat::Mp4);
    assert_eq!(DownloadFormat::from_config("MP4"), DownloadFormat::Mp4);
    assert_eq!(DownloadFormat::from_config("mp3"), DownloadFormat::Mp3);
    assert_eq!(DownloadFormat::from_config("flac"), DownloadFormat::Mp3);
  }

  // --- write_unique ---

  #[test]
  fn write_unique_plain_name() {
    let dir = tempfile::tempdir().unwrap();
    let saved = write_unique(dir.path(), "clip.mp4", b"abc").unwrap();
    assert_eq!(saved.file_name, "clip.mp4");
    assert_eq!(std::fs::read(saved.path).unwrap(), b"abc");
  }

  #[test]
  fn write_unique_suffixes_on_collision() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_unique(dir.path(), "clip.mp4", b"one").unwrap();
    let second = write_unique(dir.path(), "clip.mp4", b"two").unwrap();
    let third = write_unique(dir.path(), "clip.mp4", b"three").unwrap();
    assert_eq!(first.file_name, "clip.mp4");
    assert_eq!(second.file_name, "clip (1).mp4");
    assert_eq!(third.file_name, "clip (2).mp4");
    assert_eq!(std::fs::read(second.path).unwrap(), b"two");
  }

  #[test]
  fn write_unique_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    write_unique(dir.path(), "download", b"one").unwrap();
    let second = write_unique(dir.path(), "download", b"two").unwrap();
    assert_eq!(second.file_name, "download (1)");
  }

  #[test]
  fn write_unique_dotfile_keeps_whole_name_as_stem() {
    let dir = tempfile::tempdir().unwrap();
    write_unique(dir.path(), ".hidden", b"one").unwrap();
    let second = write_unique(dir.path(), ".hidden", b"two").unwrap();
    assert_eq!(second.file_name, ".hidden (1)");
  }

  #[test]
  fn write_unique_creates_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("downloads");
    let saved = write_unique(&nested, "clip.mp4", b"abc").unwrap();
    assert!(saved.path.starts_with(&nested));
  }
}
