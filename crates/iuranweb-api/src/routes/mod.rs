//! Route modules for the API server
//!
//! - residents: Resident list, search, summary
//! - selection: Detail modal driven by the session's selection
//! - qr: QR preview, export and download
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and HTMX partial responses
//! - page.rs: HTML rendering

pub mod residents;
pub mod selection;
pub mod qr;
