use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Local directory receiving uploaded images, served back under `/uploads`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("create uploads dir")
    }

    /// Stored name is the upload time in milliseconds plus the original
    /// extension. Two uploads within the same millisecond collide and the
    /// later one overwrites the earlier.
    pub fn derive_filename(original: &str, at: DateTime<Utc>) -> String {
        match Path::new(original).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", at.timestamp_millis(), ext),
            None => at.timestamp_millis().to_string(),
        }
    }

    /// Writes the body to disk and returns the stored filename.
    pub async fn save(&self, original: &str, body: Bytes) -> anyhow::Result<String> {
        let filename = Self::derive_filename(original, Utc::now());
        tokio::fs::write(self.root.join(&filename), &body)
            .await
            .context("write upload")?;
        Ok(filename)
    }

    pub fn public_url(filename: &str) -> String {
        format!("/uploads/{filename}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_keeps_the_original_extension() {
        let at = Utc.timestamp_millis_opt(1_690_000_000_000).unwrap();
        assert_eq!(
            UploadStore::derive_filename("photo.png", at),
            "1690000000000.png"
        );
    }

    #[test]
    fn filename_without_extension_is_bare_millis() {
        let at = Utc.timestamp_millis_opt(1_690_000_000_000).unwrap();
        assert_eq!(UploadStore::derive_filename("photo", at), "1690000000000");
    }

    #[test]
    fn same_millisecond_uploads_collide() {
        let at = Utc.timestamp_millis_opt(1_690_000_000_000).unwrap();
        assert_eq!(
            UploadStore::derive_filename("a.jpg", at),
            UploadStore::derive_filename("b.jpg", at)
        );
    }

    #[test]
    fn public_url_is_relative_to_uploads() {
        assert_eq!(
            UploadStore::public_url("1690000000000.png"),
            "/uploads/1690000000000.png"
        );
    }

    #[tokio::test]
    async fn save_writes_the_body_to_disk() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", std::process::id()));
        let store = UploadStore::new(&dir);
        store.ensure_dir().await.expect("create dir");

        let filename = store
            .save("pic.jpg", Bytes::from_static(b"not really a jpeg"))
            .await
            .expect("save upload");
        assert!(filename.ends_with(".jpg"));

        let stored = tokio::fs::read(dir.join(&filename)).await.expect("read back");
        assert_eq!(stored, b"not really a jpeg");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
