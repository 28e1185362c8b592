//! JSON job files: the records a generation run needs, with photo paths
//! relative to the job file.

use anyhow::{Context, Result};
use photobook_print::{BookRecord, ExifOrientation, PageRecord, PhotoRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JobFile {
    book: BookRecord,
    pages: Vec<PageRecord>,
    photos: Vec<PhotoEntry>,
}

#[derive(Deserialize)]
struct PhotoEntry {
    id: String,
    path: PathBuf,
    /// Raw EXIF orientation tag (1-8)
    #[serde(default)]
    orientation: Option<u8>,
}

pub struct Job {
    pub book: BookRecord,
    pub pages: Vec<PageRecord>,
    pub photos: Vec<PhotoRecord>,
}

pub async fn load_job(path: &Path) -> Result<Job> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading job file {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_job(&bytes, base).with_context(|| format!("parsing job file {}", path.display()))
}

fn parse_job(bytes: &[u8], base: &Path) -> Result<Job> {
    let file: JobFile = serde_json::from_slice(bytes)?;
    let photos = file
        .photos
        .into_iter()
        .map(|entry| {
            let path = if entry.path.is_absolute() {
                entry.path
            } else {
                base.join(entry.path)
            };
            PhotoRecord::from_path(entry.id, path)
                .with_orientation(ExifOrientation::from_exif(entry.orientation.unwrap_or(1)))
        })
        .collect();

    Ok(Job {
        book: file.book,
        pages: file.pages,
        photos,
    })
}
