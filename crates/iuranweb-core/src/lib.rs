//! Resident directory, selection state and QR export for dues collection

pub mod error;
pub mod models;
pub mod directory;
pub mod label;
pub mod selection;
pub mod session;
pub mod export;
pub mod preview;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ExportError, EXPORT_FAILED_NOTICE};
pub use models::Resident;
pub use directory::{filter_residents, DirectorySummary, ResidentDirectory};
pub use label::TransactionIdFormatter;
pub use selection::{ActiveSelection, SelectionController, SelectionState};
pub use session::{SessionSnapshot, SessionStore, ViewSession};
pub use export::{
    BrowserDownload, DirectorySaveTarget, DownloadPayload, ExportNaming, FetchedImage,
    HttpImageSource, ImageSource, QrAssetExporter, SaveTarget, SavedAsset,
};
pub use preview::{load_preview, placeholder_data_uri, PreviewImage};
