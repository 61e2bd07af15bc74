use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::{config::StorageConfig, errors::ServiceError, utils::generate_random_string};

/// A file persisted under the media root.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Name of the file inside the media root, usable as a public URL path.
    pub stored_name: String,
    pub path: PathBuf,
    pub size_bytes: usize,
}

#[derive(Clone)]
pub struct StorageService {
    media_root: PathBuf,
    max_upload_bytes: usize,
    allowed_content_types: Vec<String>,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            media_root: config.media_root.clone(),
            max_upload_bytes: config.max_upload_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    pub async fn ensure_media_root(&self) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.media_root)
            .await
            .map_err(|err| ServiceError::Internal(format!("Failed to create media root: {err}")))
    }

    pub async fn save_upload(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StoredFile, ServiceError> {
        let content_type = content_type.unwrap_or_default();
        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            return Err(ServiceError::Validation(vec![format!(
                "Unsupported content type '{content_type}'"
            )]));
        }

        if data.len() > self.max_upload_bytes {
            return Err(ServiceError::Validation(vec![format!(
                "File exceeds the maximum size of {} bytes",
                self.max_upload_bytes
            )]));
        }

        let safe_name = sanitize_filename(filename)?;
        let prefix = generate_random_string(8)
            .map_err(|err| ServiceError::Internal(format!("Failed to generate prefix: {err}")))?;
        let stored_name = format!("{prefix}_{safe_name}");
        let path = self.media_root.join(&stored_name);

        self.ensure_media_root().await?;
        fs::write(&path, data)
            .await
            .map_err(|err| ServiceError::Internal(format!("Failed to write upload: {err}")))?;

        info!("✅ Stored upload {} ({} bytes)", stored_name, data.len());

        Ok(StoredFile {
            stored_name,
            path,
            size_bytes: data.len(),
        })
    }

    /// Removes a stored file by its name inside the media root. Missing files
    /// are ignored so callers can retry deletions.
    pub async fn delete_file(&self, stored_name: &str) -> Result<(), ServiceError> {
        let safe_name = sanitize_filename(stored_name)?;
        let path = self.media_root.join(safe_name);

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️ Deleted stored file {}", path.display());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("File {} already gone, nothing to delete", path.display());
                Ok(())
            }
            Err(err) => Err(ServiceError::Internal(format!(
                "Failed to delete stored file: {err}"
            ))),
        }
    }
}

/// Reduces an incoming filename to a single bare component, rejecting
/// anything that could escape the media root.
fn sanitize_filename(filename: &str) -> Result<String, ServiceError> {
    let invalid = || ServiceError::Validation(vec!["Invalid filename".to_string()]);

    let name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;

    // Windows-style separators are not split by `file_name` on unix.
    let name = name.rsplit('\\').next().ok_or_else(invalid)?;

    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid());
    }

    match Path::new(name).components().next() {
        Some(Component::Normal(_)) => Ok(name.to_string()),
        _ => Err(invalid()),
    }
}
