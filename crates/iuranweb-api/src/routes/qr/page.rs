//! Export notice fragments

use iuranweb_core::{ExportError, SavedAsset};
use iuranweb_utils::escape_html;

/// Notice shown under the download button after an export attempt
pub fn render_export_notice(result: &Result<SavedAsset, ExportError>) -> String {
    match result {
        Ok(saved) => format!(
            r#"<div class='p-3 rounded-lg bg-emerald-50 text-emerald-800 border border-emerald-200'>QR Code disimpan sebagai <span class='font-mono'>{}</span></div>"#,
            escape_html(&saved.file_name)
        ),
        Err(e) => format!(
            r#"<div class='p-3 rounded-lg bg-red-50 text-red-700 border border-red-200' role='alert'>{}</div>"#,
            escape_html(e.user_notice())
        ),
    }
}
