//! QR asset export: fetch the remote bitmap, hand it to a save target
//!
//! Each call to [`QrAssetExporter::export`] is an independent fetch + save
//! cycle. Nothing is cached and no state is shared between concurrent calls;
//! every temporary resource an attempt allocates is released on every exit
//! path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use iuranweb_config::ExportConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::ExportError;
use crate::models::Resident;

// whitespace and path separators both collapse to one underscore
static NAME_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s/\\]+").expect("static regex"));

// ==================== Image Source ====================

/// Raw payload of a fetched image
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Where QR bitmaps come from
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the resource behind `image_ref`
    ///
    /// Transport errors, non-2xx statuses and body read errors are all
    /// reported as [`ExportError::FetchFailed`].
    async fn fetch(&self, image_ref: &str) -> Result<FetchedImage, ExportError>;
}

/// Plain HTTP(S) GET, no auth, no size limit
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, image_ref: &str) -> Result<FetchedImage, ExportError> {
        let response = self
            .client
            .get(image_ref)
            .send()
            .await
            .map_err(|e| ExportError::FetchFailed { reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::FetchFailed {
                reason: format!("HTTP {}", status),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExportError::FetchFailed { reason: e.to_string() })?;

        Ok(FetchedImage { bytes, content_type })
    }
}

// ==================== Save Targets ====================

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedAsset {
    pub file_name: String,
    /// Set when the file landed on the server's disk
    pub location: Option<PathBuf>,
    pub size: usize,
}

/// Host "save as file" primitive
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(&self, bytes: Bytes, file_name: &str) -> Result<SavedAsset, ExportError>;
}

/// Saves into a fixed directory on the server
///
/// Bytes go to a hidden `.part` file first and are renamed into place, so a
/// reader never sees a half-written image.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    directory: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Removes the temporary file unless the save completed
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not remove {}: {}", self.path.display(), e);
                }
            }
        }
    }
}

/// Last line of defence; names built by [`suggested_file_name`] always pass
fn check_file_name(file_name: &str) -> Result<(), ExportError> {
    let bad = file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains(['/', '\\', '\0']);
    if bad {
        return Err(ExportError::SaveFailed {
            reason: format!("unusable file name {:?}", file_name),
        });
    }
    Ok(())
}

#[async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn save(&self, bytes: Bytes, file_name: &str) -> Result<SavedAsset, ExportError> {
        check_file_name(file_name)?;

        let save_err = |e: std::io::Error| ExportError::SaveFailed { reason: e.to_string() };

        tokio::fs::create_dir_all(&self.directory).await.map_err(save_err)?;

        let final_path = self.directory.join(file_name);
        let part_path = self.directory.join(format!(
            ".{}.{}.part",
            file_name,
            iuranweb_utils::generate_id()
        ));
        let guard = PartialFile::new(part_path.clone());

        tokio::fs::write(&part_path, &bytes).await.map_err(save_err)?;
        tokio::fs::rename(&part_path, &final_path).await.map_err(save_err)?;
        guard.disarm();

        Ok(SavedAsset {
            file_name: file_name.to_string(),
            location: Some(final_path),
            size: bytes.len(),
        })
    }
}

/// Bytes and name handed back to the browser as an attachment
#[derive(Debug, Clone)]
pub struct DownloadPayload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Captures the payload so the HTTP layer can answer with a download
#[derive(Debug, Default)]
pub struct BrowserDownload {
    slot: Mutex<Option<DownloadPayload>>,
}

impl BrowserDownload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the captured payload, leaving the slot empty
    pub async fn take(&self) -> Option<DownloadPayload> {
        self.slot.lock().await.take()
    }
}

#[async_trait]
impl SaveTarget for BrowserDownload {
    async fn save(&self, bytes: Bytes, file_name: &str) -> Result<SavedAsset, ExportError> {
        check_file_name(file_name)?;
        let size = bytes.len();
        *self.slot.lock().await = Some(DownloadPayload {
            file_name: file_name.to_string(),
            bytes,
        });
        Ok(SavedAsset {
            file_name: file_name.to_string(),
            location: None,
            size,
        })
    }
}

// ==================== Exporter ====================

/// `{prefix}_{name with whitespace runs as _}_{label}.{extension}`
///
/// Slashes in the name are folded the same way, so any valid resident name
/// yields a usable file name.
pub fn suggested_file_name(prefix: &str, name: &str, label: &str, extension: &str) -> String {
    let name = NAME_BREAK.replace_all(name, "_");
    format!("{}_{}_{}.{}", prefix, name, label, extension)
}

/// Fixed parts of exported file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNaming {
    pub file_prefix: String,
    pub file_extension: String,
}

impl Default for ExportNaming {
    fn default() -> Self {
        Self {
            file_prefix: "QRIS".to_string(),
            file_extension: "png".to_string(),
        }
    }
}

impl From<&ExportConfig> for ExportNaming {
    fn from(config: &ExportConfig) -> Self {
        Self {
            file_prefix: config.file_prefix.clone(),
            file_extension: config.file_extension.clone(),
        }
    }
}

/// Fetches QR images and saves them under derived names
#[derive(Clone)]
pub struct QrAssetExporter {
    source: Arc<dyn ImageSource>,
    naming: ExportNaming,
}

impl QrAssetExporter {
    pub fn new(source: Arc<dyn ImageSource>, naming: ExportNaming) -> Self {
        Self { source, naming }
    }

    pub fn source(&self) -> &Arc<dyn ImageSource> {
        &self.source
    }

    /// File name for a resident under a given transaction label
    pub fn file_name_for(&self, resident: &Resident, label: &str) -> String {
        suggested_file_name(
            &self.naming.file_prefix,
            &resident.name,
            label,
            &self.naming.file_extension,
        )
    }

    /// One fetch + save cycle
    pub async fn export(
        &self,
        image_ref: &str,
        suggested_name: &str,
        target: &dyn SaveTarget,
    ) -> Result<SavedAsset, ExportError> {
        log::info!("exporting QR {} as {}", image_ref, suggested_name);

        let result = match self.source.fetch(image_ref).await {
            Ok(image) => target.save(image.bytes, suggested_name).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(saved) => log::info!("exported {} ({} bytes)", saved.file_name, saved.size),
            Err(e) => log::warn!("export of {} failed [{}]: {}", suggested_name, e.code(), e),
        }
        result
    }

    /// Export the QR of `resident` labelled with `label`
    pub async fn export_resident(
        &self,
        resident: &Resident,
        label: &str,
        target: &dyn SaveTarget,
    ) -> Result<SavedAsset, ExportError> {
        let file_name = self.file_name_for(resident, label);
        self.export(&resident.qr_image_ref, &file_name, target).await
    }
}

impl std::fmt::Debug for QrAssetExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrAssetExporter")
            .field("naming", &self.naming)
            .finish_non_exhaustive()
    }
}

// ==================== Tests ====================
