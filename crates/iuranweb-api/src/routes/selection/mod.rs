//! Selection routes - QRIS detail modal
//!
//! The modal is visible exactly while the session's selection is active;
//! opening it selects, closing it dismisses.

pub mod api;
pub mod page;

pub use api::{api_selection, htmx_dismiss, htmx_select, htmx_selection};
pub use page::{render_qris_modal, render_payment_steps};
