//! Resident routes - list, search and summary
//!
//! Structure:
//! - api.rs: JSON API and HTMX list partial
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_residents,
    api_resident_detail,
    api_summary,
    htmx_residents_list,
    ResidentListResponse,
    SummaryResponse,
};
pub use page::{
    page_residents,
    render_residents_content,
    render_count,
};
