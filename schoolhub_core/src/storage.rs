//! Local disk storage for school images.
//!
//! Files live flat inside the upload directory and are referenced from the
//! `schools.image` column by their public path, `/schoolImages/<file>`, which
//! the HTTP layer serves straight from the same directory.

use std::{
    io,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix uploaded images are served under.
pub const PUBLIC_PREFIX: &str = "/schoolImages";

/// An image received from a client, not yet written to disk.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Writes the upload under a new time-ordered name and returns its public path.
    pub async fn save(&self, upload: &ImageUpload) -> io::Result<String> {
        let file_name = match upload.file_name.as_deref().and_then(extension_of) {
            Some(ext) => format!("{}.{ext}", Uuid::now_v7()),
            None => Uuid::now_v7().to_string(),
        };

        self.ensure_dir().await?;
        fs::write(self.root.join(&file_name), &upload.data).await?;

        debug!("Stored image {file_name} ({} bytes)", upload.data.len());
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    /// Deletes the file behind a public path. Returns whether a file was removed;
    /// a missing file or a path outside the store is not an error.
    pub async fn remove(&self, public_path: &str) -> io::Result<bool> {
        let Some(path) = self.resolve(public_path) else {
            warn!("Refusing to remove image outside the store: {public_path}");
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Maps `/schoolImages/<file>` to the file on disk.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;

        let is_plain_name = !name.is_empty()
            && name != ".."
            && name != "."
            && !name.contains(['/', '\\']);

        is_plain_name.then(|| self.root.join(name))
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;

    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
