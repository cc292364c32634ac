//! QR routes - preview, server-side export and browser download
//!
//! Export failures never touch the session: the selection and the filter
//! query stay as they were and the operator gets a single notice.

pub mod api;
pub mod page;

pub use api::{htmx_qr_export, qr_download, qr_preview};
pub use page::render_export_notice;
